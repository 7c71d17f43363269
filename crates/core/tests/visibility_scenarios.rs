//! Integration test: drive the controller over an in-memory portfolio page
//! and check the visible state after scrolling, re-entry, and counter ramps.

use folio_core::page::{StaticElement, StaticPage};
use folio_core::{Controller, ControllerConfig};
use folio_protocol::{DomCommand, ElementId, TimerId};

struct Portfolio {
    page: StaticPage,
    links: [ElementId; 3],
    bar: ElementId,
    stat: ElementId,
    image: ElementId,
}

/// Three stacked sections, a skill bar in "resume", a counter in "about",
/// and a lazy image far down the page.
fn portfolio() -> Portfolio {
    let mut page = StaticPage::new(800.0);
    page.add(StaticElement::new("body"));

    let links = [
        page.add(StaticElement::new("#navbar .nav-link").attr("href", "#hero")),
        page.add(StaticElement::new("#navbar .nav-link").attr("href", "#about")),
        page.add(StaticElement::new("#navbar .nav-link").attr("href", "#resume")),
    ];
    page.add(StaticElement::new("section").attr("id", "hero").at(0.0, 600.0));
    page.add(StaticElement::new("section").attr("id", "about").at(600.0, 1000.0));
    page.add(StaticElement::new("section").attr("id", "resume").at(1600.0, 1200.0));

    let stat = page.add(StaticElement::new(".stat-number").text("120+").at(900.0, 60.0));
    let bar = page.add(
        StaticElement::new(".skill-progress")
            .attr("data-width", "75")
            .at(1800.0, 150.0),
    );
    let image = page.add(
        StaticElement::new("img[data-src]")
            .attr("data-src", "assets/img/portfolio-1.jpg")
            .class("lazy")
            .at(3000.0, 300.0),
    );

    Portfolio {
        page,
        links,
        bar,
        stat,
        image,
    }
}

fn tick(controller: &mut Controller, page: &mut StaticPage) -> Vec<DomCommand> {
    let commands = controller.on_tick(page);
    page.apply(&commands);
    commands
}

fn active_links(p: &Portfolio) -> Vec<usize> {
    p.links
        .iter()
        .enumerate()
        .filter(|(_, id)| p.page.element(**id).is_some_and(|e| e.has_class("active")))
        .map(|(i, _)| i)
        .collect()
}

/// Run a counter's interval until it cancels itself, returning every text.
fn run_ramp(controller: &mut Controller, page: &mut StaticPage, stat: ElementId) -> Vec<String> {
    let timer = TimerId::CounterRamp(stat);
    let mut texts = Vec::new();
    for _ in 0..1000 {
        if !page.has_timer(timer) {
            break;
        }
        let commands = controller.on_timer(timer);
        page.apply(&commands);
        texts.push(
            page.element(stat)
                .and_then(|e| e.text_content())
                .unwrap_or_default()
                .to_string(),
        );
    }
    texts
}

#[test]
fn progress_bar_in_view_gets_its_width() {
    let mut page = StaticPage::new(800.0);
    let bar = page.add(
        StaticElement::new(".skill-progress")
            .attr("data-width", "75")
            .at(100.0, 150.0),
    );
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());

    // top = 100 < 800, bottom = 250 > 0
    tick(&mut controller, &mut page);

    let el = page.element(bar).unwrap();
    assert_eq!(el.style("width"), Some("75%"));
    assert!(el.has_class("animated"));
}

#[test]
fn fire_once_elements_trigger_at_most_once() {
    let mut p = portfolio();
    let mut controller = Controller::initialize(&mut p.page, ControllerConfig::default());

    let mut width_writes = 0;
    let mut ramp_starts = 0;
    let mut src_writes = 0;
    // Scroll down, back up, and down again across every element.
    let path = [0.0, 500.0, 1200.0, 2000.0, 2800.0, 1000.0, 0.0, 3000.0, 1500.0];
    for &y in path.iter().chain(path.iter()) {
        p.page.scroll_to(y);
        for cmd in tick(&mut controller, &mut p.page) {
            match cmd {
                DomCommand::SetStyle { target, property, .. }
                    if target == p.bar && property == "width" =>
                {
                    width_writes += 1
                }
                DomCommand::StartInterval { timer, .. } if timer == TimerId::CounterRamp(p.stat) => {
                    ramp_starts += 1
                }
                DomCommand::SetAttribute { target, name, .. } if target == p.image && name == "src" => {
                    src_writes += 1
                }
                _ => {}
            }
        }
    }

    assert_eq!(width_writes, 1);
    assert_eq!(ramp_starts, 1);
    assert_eq!(src_writes, 1);
    assert!(controller.registry().iter().all(|e| e.is_triggered() || !e.kind.is_fire_once()));
}

#[test]
fn elements_below_the_fold_wait() {
    let mut p = portfolio();
    let mut controller = Controller::initialize(&mut p.page, ControllerConfig::default());
    tick(&mut controller, &mut p.page);

    assert_eq!(p.page.element(p.bar).unwrap().style("width"), None);
    assert!(!p.page.has_timer(TimerId::CounterRamp(p.stat)));

    // Counter at 900..960 enters an 800px viewport once scrolled past 100.
    p.page.scroll_to(101.0);
    tick(&mut controller, &mut p.page);
    assert!(p.page.has_timer(TimerId::CounterRamp(p.stat)));
    assert_eq!(p.page.element(p.bar).unwrap().style("width"), None);
}

#[test]
fn nav_link_follows_probe_position() {
    let mut p = portfolio();
    let mut controller = Controller::initialize(&mut p.page, ControllerConfig::default());

    // probe = scrollY + 200
    let cases: &[(f64, &[usize])] = &[
        (0.0, &[0]),
        (399.0, &[0]),
        // 600 is the shared boundary of hero and about; both ranges include it.
        (400.0, &[0, 1]),
        (401.0, &[1]),
        (1399.0, &[1]),
        (1500.0, &[2]),
        (2600.0, &[2]),
        (2601.0, &[]),
        (50.0, &[0]),
        (2000.0, &[2]),
    ];
    for (scroll, expected) in cases {
        p.page.scroll_to(*scroll);
        tick(&mut controller, &mut p.page);
        assert_eq!(active_links(&p), expected.to_vec(), "scrollY = {scroll}");
    }
}

#[test]
fn nav_state_is_independent_of_tick_order() {
    let positions = [2000.0, 0.0, 2700.0, 900.0, 401.0];
    let mut forward = portfolio();
    let mut backward = portfolio();
    let mut ctl_f = Controller::initialize(&mut forward.page, ControllerConfig::default());
    let mut ctl_b = Controller::initialize(&mut backward.page, ControllerConfig::default());

    for &y in &positions {
        forward.page.scroll_to(y);
        tick(&mut ctl_f, &mut forward.page);
    }
    for &y in positions.iter().rev().chain(std::iter::once(&401.0)) {
        backward.page.scroll_to(y);
        tick(&mut ctl_b, &mut backward.page);
    }
    assert_eq!(active_links(&forward), active_links(&backward));
    assert_eq!(active_links(&forward), vec![1]);
}

#[test]
fn stale_active_class_from_markup_is_cleared() {
    let mut page = StaticPage::new(800.0);
    let link = page.add(
        StaticElement::new("#navbar .nav-link")
            .attr("href", "#contact")
            .class("active"),
    );
    page.add(StaticElement::new("section").attr("id", "contact").at(5000.0, 400.0));
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());

    tick(&mut controller, &mut page);
    assert!(!page.element(link).unwrap().has_class("active"));
}

#[test]
fn link_without_section_is_never_active() {
    let mut page = StaticPage::new(800.0);
    let orphan = page.add(StaticElement::new("#navbar .nav-link").attr("href", "#gone"));
    let external = page.add(StaticElement::new("#navbar .nav-link").attr("href", "/blog"));
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());

    for y in [0.0, 500.0, 5000.0] {
        page.scroll_to(y);
        let commands = tick(&mut controller, &mut page);
        assert!(commands
            .iter()
            .all(|c| c.target() != Some(orphan) && c.target() != Some(external)));
    }
}

#[test]
fn counter_ramp_reaches_target_with_suffix() {
    let mut page = StaticPage::new(800.0);
    let stat = page.add(StaticElement::new(".stat-number").text("120+").at(10.0, 40.0));
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());
    tick(&mut controller, &mut page);

    let texts = run_ramp(&mut controller, &mut page, stat);
    let values: Vec<u64> = texts
        .iter()
        .map(|t| t.trim_end_matches('+').parse().unwrap())
        .collect();

    assert!(texts.iter().all(|t| t.ends_with('+')));
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert!(values.iter().all(|&v| v <= 120));
    assert_eq!(texts.last().map(String::as_str), Some("120+"));
    assert!((50..=51).contains(&texts.len()));
    assert_eq!(controller.running_ramps(), 0);
}

#[test]
fn counter_ramp_ignores_further_visibility_changes() {
    let mut page = StaticPage::new(800.0);
    let stat = page.add(StaticElement::new(".stat-number").text("50+").at(10.0, 40.0));
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());
    tick(&mut controller, &mut page);

    // Advance halfway, scroll the counter away and back, then finish.
    for _ in 0..25 {
        let commands = controller.on_timer(TimerId::CounterRamp(stat));
        page.apply(&commands);
    }
    page.scroll_to(2000.0);
    tick(&mut controller, &mut page);
    page.scroll_to(0.0);
    let commands = tick(&mut controller, &mut page);
    assert!(!commands
        .iter()
        .any(|c| matches!(c, DomCommand::StartInterval { .. })));

    let texts = run_ramp(&mut controller, &mut page, stat);
    assert_eq!(texts.last().map(String::as_str), Some("50+"));
}

#[test]
fn lazy_image_swaps_source_once() {
    let mut p = portfolio();
    let mut controller = Controller::initialize(&mut p.page, ControllerConfig::default());

    p.page.scroll_to(2500.0);
    tick(&mut controller, &mut p.page);

    let img = p.page.element(p.image).unwrap();
    assert_eq!(img.get_attribute("src"), img.get_attribute("data-src"));
    assert!(!img.has_class("lazy"));
    // Lazy images are checked on the tick, never handed to the card observer.
    assert!(!p.page.is_unobserved(p.image));

    p.page.scroll_to(0.0);
    tick(&mut controller, &mut p.page);
    p.page.scroll_to(2600.0);
    let commands = tick(&mut controller, &mut p.page);
    assert!(commands.iter().all(|c| c.target() != Some(p.image)));
}

#[test]
fn lazy_image_without_source_still_clears_lazy() {
    let mut page = StaticPage::new(800.0);
    let image = page.add(
        StaticElement::new("img[data-src]")
            .attr("data-src", "")
            .class("lazy")
            .at(100.0, 200.0),
    );
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());

    let commands = tick(&mut controller, &mut page);
    assert!(!commands.contains(&DomCommand::set_attribute(image, "src", "")));
    let img = page.element(image).unwrap();
    assert_eq!(img.get_attribute("src"), None);
    assert!(!img.has_class("lazy"));

    let entry = controller
        .registry()
        .iter()
        .find(|e| e.kind.element() == image)
        .unwrap();
    assert!(entry.is_triggered());

    page.scroll_to(50.0);
    let commands = tick(&mut controller, &mut page);
    assert!(commands.iter().all(|c| c.target() != Some(image)));
}

#[test]
fn resize_can_reveal_elements() {
    let mut page = StaticPage::new(600.0);
    let bar = page.add(
        StaticElement::new(".skill-progress")
            .attr("data-width", "40")
            .at(700.0, 20.0),
    );
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());
    tick(&mut controller, &mut page);
    assert_eq!(page.element(bar).unwrap().style("width"), None);

    page.set_inner_height(900.0);
    tick(&mut controller, &mut page);
    assert_eq!(page.element(bar).unwrap().style("width"), Some("40%"));
}

#[test]
fn back_to_top_and_parallax_follow_scroll() {
    let mut page = StaticPage::new(800.0);
    let button = page.add(StaticElement::new(".back-to-top"));
    let hero = page.add(StaticElement::new(".hero-section").at(0.0, 800.0));
    let mut controller = Controller::initialize(&mut page, ControllerConfig::default());

    tick(&mut controller, &mut page);
    assert!(!page.element(button).unwrap().has_class("active"));
    assert_eq!(
        page.element(hero).unwrap().style("transform"),
        Some("translateY(0px)")
    );

    page.scroll_to(240.0);
    tick(&mut controller, &mut page);
    assert!(page.element(button).unwrap().has_class("active"));
    assert_eq!(
        page.element(hero).unwrap().style("transform"),
        Some("translateY(120px)")
    );
}
