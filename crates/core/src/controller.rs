//! Visibility-driven page controller.
//!
//! The controller owns a registry of categorized elements discovered once at
//! initialization. Every scroll, resize, or load tick it samples the viewport
//! through a [`ViewportProbe`] and answers with the DOM commands needed to
//! bring the page up to date:
//!
//! - navigation links follow the section under `scrollY + probe_offset`,
//!   re-evaluated every tick;
//! - progress bars, stat counters and lazy images fire once, the first time
//!   any part of them is on screen, and never again;
//! - a triggered counter keeps ramping on its own timer, independent of
//!   further ticks.
//!
//! Timers are owned by the host. The controller asks for them with
//! `StartInterval` / `StartTimeout` and is driven through [`Controller::on_timer`].

use std::collections::{BTreeSet, HashMap};

use folio_protocol::{DomCommand, ElementId, LogLevel, Signal, TimerId};

use crate::chrome::{BackToTop, Loader, Parallax};
use crate::config::ControllerConfig;
use crate::counter::{CounterRamp, CounterText};
use crate::form::{ContactFields, ContactForm};
use crate::model::observed::parse_width;
use crate::model::{
    LazyImage, NavLink, Observed, ObservedElement, ProgressBar, StatCounter, TriggerState,
};
use crate::nav::{self, MobileNav};
use crate::page::{DomSource, ViewportProbe};
use crate::theme::ThemeToggle;
use crate::widgets::TypedOptions;

const SIGNALS: [Signal; 3] = [Signal::Scroll, Signal::Resize, Signal::Load];

#[derive(Debug, Clone, PartialEq)]
struct RevealCard {
    card: ElementId,
    revealed: bool,
}

#[derive(Debug)]
pub struct Controller {
    config: ControllerConfig,
    registry: Vec<ObservedElement>,
    reveal_cards: Vec<RevealCard>,
    ramps: HashMap<ElementId, CounterRamp>,
    /// Timers started and not yet cancelled or fired.
    timers: BTreeSet<TimerId>,
    subscriptions: Vec<Signal>,
    body: Option<ElementId>,
    back_to_top: Option<BackToTop>,
    parallax: Option<Parallax>,
    loader: Option<Loader>,
    mobile_nav: Option<MobileNav>,
    contact_form: Option<ContactForm>,
    theme: Option<ThemeToggle>,
    typed: Option<TypedOptions>,
    /// Diagnostics gathered before the first signal; flushed with it.
    pending: Vec<DomCommand>,
    attached: bool,
}

impl Controller {
    /// Query every element category once and build the registry.
    ///
    /// Empty categories are fine. Malformed `data-width` values are logged
    /// and treated as zero; counters without digits are logged and left
    /// untouched.
    pub fn initialize<D: DomSource>(dom: &mut D, config: ControllerConfig) -> Self {
        let selectors = config.selectors.clone();
        let mut pending = Vec::new();
        let mut registry = Vec::new();

        let nav_links = dom.query_all(&selectors.nav_links);
        for &link in &nav_links {
            let href = dom.attribute(link, "href");
            let section = href
                .as_deref()
                .and_then(nav::link_hash)
                .and_then(|hash| dom.query(hash));
            registry.push(ObservedElement::new(Observed::NavLink(NavLink {
                link,
                section,
                active: None,
            })));
        }

        for bar in dom.query_all(&selectors.progress_bars) {
            let width = dom
                .attribute(bar, "data-width")
                .map(|raw| match parse_width(&raw) {
                    Ok(width) => width,
                    Err(err) => {
                        pending.push(DomCommand::log(
                            LogLevel::Warn,
                            format!("progress bar #{}: {err}; using 0", bar.0),
                        ));
                        0.0
                    }
                });
            registry.push(ObservedElement::new(Observed::ProgressBar(ProgressBar {
                bar,
                width,
            })));
        }

        for stat in dom.query_all(&selectors.stat_counters) {
            let raw = dom.text_content(stat).unwrap_or_default();
            match CounterText::parse(&raw) {
                Ok(text) => registry.push(ObservedElement::new(Observed::StatCounter(
                    StatCounter { stat, text },
                ))),
                Err(err) => pending.push(DomCommand::log(
                    LogLevel::Warn,
                    format!("stat counter #{}: {err}; not animated", stat.0),
                )),
            }
        }

        for image in dom.query_all(&selectors.lazy_images) {
            let source = dom
                .attribute(image, "data-src")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            registry.push(ObservedElement::new(Observed::LazyImage(LazyImage {
                image,
                source,
            })));
        }

        let reveal_cards: Vec<RevealCard> = dom
            .query_all(&selectors.reveal_cards)
            .into_iter()
            .map(|card| RevealCard {
                card,
                revealed: false,
            })
            .collect();

        let body = dom.query(&selectors.body);
        let back_to_top = dom
            .query(&selectors.back_to_top)
            .map(|button| BackToTop::new(button, config.back_to_top_threshold));
        let parallax = dom
            .query(&selectors.hero)
            .map(|hero| Parallax::new(hero, config.parallax_factor));
        let loader = dom
            .query(&selectors.loader)
            .map(|loader| Loader::new(loader, config.loader_fade_ms));

        let mobile_nav = match (body, dom.query(&selectors.mobile_nav_toggle)) {
            (Some(body), Some(toggle)) => Some(MobileNav::new(
                body,
                toggle,
                nav_links.first().copied(),
                config.mobile_focus_delay_ms,
            )),
            _ => None,
        };

        let contact_form = dom.query(&selectors.contact_form).map(|form| {
            let submit = dom.query(&config.submit_button_selector());
            ContactForm::new(form, submit, config.submit_delay_ms)
        });

        let typed = match dom.query(&selectors.typed) {
            Some(el) => match dom.attribute(el, "data-typed-items") {
                Some(items) => Some(config.collaborators.typed.with_items(&items)),
                None => {
                    pending.push(DomCommand::log(
                        LogLevel::Warn,
                        "typed text element has no data-typed-items",
                    ));
                    None
                }
            },
            None => None,
        };

        let mut counts = [0usize; 4];
        for entry in &registry {
            let slot = match entry.kind {
                Observed::NavLink(_) => 0,
                Observed::ProgressBar(_) => 1,
                Observed::StatCounter(_) => 2,
                Observed::LazyImage(_) => 3,
            };
            counts[slot] += 1;
        }
        pending.push(DomCommand::log(
            LogLevel::Info,
            format!(
                "observing {} nav links, {} progress bars, {} counters, {} lazy images, {} cards",
                counts[0],
                counts[1],
                counts[2],
                counts[3],
                reveal_cards.len(),
            ),
        ));

        Self {
            config,
            registry,
            reveal_cards,
            ramps: HashMap::new(),
            timers: BTreeSet::new(),
            subscriptions: SIGNALS.to_vec(),
            body,
            back_to_top,
            parallax,
            loader,
            mobile_nav,
            contact_form,
            theme: None,
            typed,
            pending,
            attached: true,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Signals the host must route to [`on_tick`](Self::on_tick)
    /// (and [`on_load`](Self::on_load) for `Load`). Empty after teardown.
    pub fn subscriptions(&self) -> &[Signal] {
        &self.subscriptions
    }

    pub fn registry(&self) -> &[ObservedElement] {
        &self.registry
    }

    /// Elements to hand to the intersection observer for the fade-in.
    pub fn reveal_targets(&self) -> Vec<ElementId> {
        self.reveal_cards.iter().map(|c| c.card).collect()
    }

    /// Typed.js options, if the page has a typed-text element.
    pub fn typed_options(&self) -> Option<&TypedOptions> {
        self.typed.as_ref()
    }

    pub fn contact_form(&self) -> Option<&ContactForm> {
        self.contact_form.as_ref()
    }

    pub fn is_mobile_nav_open(&self) -> bool {
        self.mobile_nav.as_ref().is_some_and(MobileNav::is_open)
    }

    pub fn running_ramps(&self) -> usize {
        self.ramps.len()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Scroll or resize: re-evaluate every observed element.
    pub fn on_tick<P: ViewportProbe>(&mut self, probe: &P) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if self.attached {
            self.collect_tick(probe, &mut commands);
        }
        self.track(commands)
    }

    /// Window load: a regular tick, then the loader fade and the initial
    /// scroll to the URL hash.
    pub fn on_load<P: DomSource + ViewportProbe>(
        &mut self,
        page: &mut P,
        location_hash: Option<&str>,
    ) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if !self.attached {
            return commands;
        }
        self.collect_tick(page, &mut commands);

        if let Some(loader) = &self.loader {
            commands.extend(loader.fade_out());
        }
        if let Some(top) = location_hash
            .and_then(nav::link_hash)
            .and_then(|hash| page.query(hash))
            .and_then(|target| page.offset_span(target))
            .map(|span| span.top)
        {
            commands.push(DomCommand::ScrollTo { top });
        }
        self.track(commands)
    }

    /// A host timer fired.
    pub fn on_timer(&mut self, timer: TimerId) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if !self.attached {
            return commands;
        }

        match timer {
            TimerId::CounterRamp(stat) => match self.ramps.get_mut(&stat) {
                Some(ramp) => {
                    let frame = ramp.tick();
                    commands.push(DomCommand::SetText {
                        target: stat,
                        text: frame.text,
                    });
                    if frame.finished {
                        self.ramps.remove(&stat);
                        commands.push(DomCommand::CancelTimer { timer });
                    }
                }
                None => commands.push(DomCommand::CancelTimer { timer }),
            },
            TimerId::SubmitReset => {
                self.timers.remove(&timer);
                if let Some(form) = &mut self.contact_form {
                    commands.extend(form.on_sent());
                }
            }
            TimerId::LoaderHide => {
                self.timers.remove(&timer);
                if let Some(loader) = &self.loader {
                    commands.push(loader.hide());
                }
            }
            TimerId::FocusNavLink => {
                self.timers.remove(&timer);
                if let Some(mobile_nav) = &self.mobile_nav {
                    commands.extend(mobile_nav.focus_first_link());
                }
            }
        }
        self.track(commands)
    }

    /// Intersection-observer entry for a fade-in card. Fires once per card.
    pub fn on_intersection(&mut self, target: ElementId, is_intersecting: bool) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if !self.attached || !is_intersecting {
            return commands;
        }
        if let Some(card) = self
            .reveal_cards
            .iter_mut()
            .find(|c| c.card == target && !c.revealed)
        {
            card.revealed = true;
            commands.push(DomCommand::add_class(target, "animate-in"));
            commands.push(DomCommand::Unobserve { target });
        }
        commands
    }

    pub fn on_submit(&mut self, fields: &ContactFields, button_label: &str) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if let (true, Some(form)) = (self.attached, &mut self.contact_form) {
            commands.extend(form.on_submit(fields, button_label));
        }
        self.track(commands)
    }

    pub fn on_mobile_nav_toggle(&mut self) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if let (true, Some(mobile_nav)) = (self.attached, &mut self.mobile_nav) {
            commands.extend(mobile_nav.toggle());
        }
        self.track(commands)
    }

    /// Key pressed on the mobile toggle. `None` if the key is not handled.
    pub fn on_mobile_nav_key(&mut self, key: &str) -> Option<Vec<DomCommand>> {
        nav::is_activation_key(key).then(|| self.on_mobile_nav_toggle())
    }

    /// Click anywhere on the page; closes the mobile menu when the click
    /// landed outside both the header and the toggle.
    pub fn on_body_click(&mut self, inside_nav: bool) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if let (true, false, Some(mobile_nav)) = (self.attached, inside_nav, &mut self.mobile_nav)
        {
            commands.extend(mobile_nav.close());
        }
        commands
    }

    /// Click on an in-page link.
    ///
    /// Returns `None` when the browser should follow the link itself (no
    /// fragment, a bare `#`, or a `.scrollto` link whose target is missing).
    /// Otherwise the default action is to be prevented and the returned
    /// commands applied.
    pub fn on_anchor_click<P: DomSource + ViewportProbe>(
        &mut self,
        href: &str,
        closes_nav: bool,
        page: &mut P,
    ) -> Option<Vec<DomCommand>> {
        let hash = nav::link_hash(href)?;
        let top = page
            .query(hash)
            .and_then(|target| page.offset_span(target))
            .map(|span| span.top);
        if closes_nav && top.is_none() {
            return None;
        }

        let mut commands = self.begin();
        if !self.attached {
            return Some(commands);
        }
        if closes_nav && let Some(mobile_nav) = &mut self.mobile_nav {
            commands.extend(mobile_nav.close());
        }
        if let Some(top) = top {
            commands.push(DomCommand::ScrollTo { top });
        }
        Some(commands)
    }

    /// Take over an inserted theme button, restoring the saved mode.
    pub fn attach_theme_toggle(&mut self, button: ElementId, saved: Option<&str>) -> Vec<DomCommand> {
        let mut commands = self.begin();
        let Some(body) = self.body else {
            commands.push(DomCommand::log(
                LogLevel::Warn,
                "theme toggle needs a body element",
            ));
            return commands;
        };
        let (theme, restore) = ThemeToggle::attach(body, button, saved);
        self.theme = Some(theme);
        commands.extend(restore);
        commands
    }

    pub fn on_theme_toggle(&mut self) -> Vec<DomCommand> {
        let mut commands = self.begin();
        if let (true, Some(theme)) = (self.attached, &mut self.theme) {
            commands.extend(theme.toggle());
        }
        commands
    }

    /// Detach from the page: cancel every running timer and drop the signal
    /// subscriptions. Later signals produce no commands.
    pub fn teardown(&mut self) -> Vec<DomCommand> {
        let mut commands = self.begin();
        commands.extend(
            std::mem::take(&mut self.timers)
                .into_iter()
                .map(|timer| DomCommand::CancelTimer { timer }),
        );
        self.ramps.clear();
        self.subscriptions.clear();
        self.attached = false;
        commands
    }

    fn begin(&mut self) -> Vec<DomCommand> {
        std::mem::take(&mut self.pending)
    }

    fn collect_tick<P: ViewportProbe>(&mut self, probe: &P, commands: &mut Vec<DomCommand>) {
        let scroll_y = probe.scroll_y();
        let viewport_height = probe.inner_height();
        let position = scroll_y + self.config.nav_probe_offset;

        for entry in &mut self.registry {
            if let Observed::NavLink(link) = &mut entry.kind {
                update_nav_link(link, position, probe, commands);
                continue;
            }
            if entry.is_triggered() {
                continue;
            }
            let Some(rect) = probe.bounding_rect(entry.kind.element()) else {
                continue;
            };
            if !rect.is_partially_visible(viewport_height) {
                continue;
            }

            entry.state = TriggerState::Triggered;
            trigger(&entry.kind, &self.config, &mut self.ramps, commands);
        }

        if let Some(back_to_top) = &mut self.back_to_top {
            commands.extend(back_to_top.update(scroll_y));
        }
        if let Some(parallax) = &mut self.parallax {
            commands.extend(parallax.update(scroll_y));
        }
    }

    /// Keep the set of live timers in step with what the host was told.
    fn track(&mut self, commands: Vec<DomCommand>) -> Vec<DomCommand> {
        for command in &commands {
            match command {
                DomCommand::StartInterval { timer, .. } | DomCommand::StartTimeout { timer, .. } => {
                    self.timers.insert(*timer);
                }
                DomCommand::CancelTimer { timer } => {
                    self.timers.remove(timer);
                }
                _ => {}
            }
        }
        commands
    }
}

/// Re-entrant: the link is active exactly while the probe position lies in
/// its section. Links without a resolvable section are skipped.
fn update_nav_link<P: ViewportProbe>(
    link: &mut NavLink,
    position: f64,
    probe: &P,
    commands: &mut Vec<DomCommand>,
) {
    let Some(span) = link.section.and_then(|section| probe.offset_span(section)) else {
        return;
    };
    let active = span.contains(position);
    if link.active == Some(active) {
        return;
    }
    link.active = Some(active);
    commands.push(if active {
        DomCommand::add_class(link.link, "active")
    } else {
        DomCommand::remove_class(link.link, "active")
    });
}

/// Terminal effect of a fire-once element.
fn trigger(
    kind: &Observed,
    config: &ControllerConfig,
    ramps: &mut HashMap<ElementId, CounterRamp>,
    commands: &mut Vec<DomCommand>,
) {
    match kind {
        Observed::NavLink(_) => {}
        Observed::ProgressBar(bar) => {
            if let Some(width) = bar.width {
                commands.push(DomCommand::set_style(bar.bar, "width", format!("{width}%")));
            }
            commands.push(DomCommand::add_class(bar.bar, "animated"));
        }
        Observed::StatCounter(stat) => {
            ramps.insert(
                stat.stat,
                CounterRamp::new(stat.text.clone(), config.ramp_steps),
            );
            commands.push(DomCommand::add_class(stat.stat, "animated"));
            commands.push(DomCommand::StartInterval {
                timer: TimerId::CounterRamp(stat.stat),
                period_ms: config.ramp_period_ms,
            });
        }
        Observed::LazyImage(image) => {
            if let Some(source) = &image.source {
                commands.push(DomCommand::set_attribute(image.image, "src", source.clone()));
            }
            commands.push(DomCommand::remove_class(image.image, "lazy"));
        }
    }
}
