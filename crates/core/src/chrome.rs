use folio_protocol::{DomCommand, ElementId, TimerId};

/// "Back to top" button, shown once the page has scrolled past a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct BackToTop {
    button: ElementId,
    threshold: f64,
    active: Option<bool>,
}

impl BackToTop {
    pub fn new(button: ElementId, threshold: f64) -> Self {
        Self {
            button,
            threshold,
            active: None,
        }
    }

    /// Emits a class change only when the visible state flips.
    pub fn update(&mut self, scroll_y: f64) -> Option<DomCommand> {
        let active = scroll_y > self.threshold;
        if self.active == Some(active) {
            return None;
        }
        self.active = Some(active);
        Some(if active {
            DomCommand::add_class(self.button, "active")
        } else {
            DomCommand::remove_class(self.button, "active")
        })
    }
}

/// Hero section that scrolls at a fraction of the page speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Parallax {
    hero: ElementId,
    factor: f64,
    last_offset: Option<f64>,
}

impl Parallax {
    pub fn new(hero: ElementId, factor: f64) -> Self {
        Self {
            hero,
            factor,
            last_offset: None,
        }
    }

    pub fn update(&mut self, scroll_y: f64) -> Option<DomCommand> {
        let offset = scroll_y * self.factor;
        if self.last_offset == Some(offset) {
            return None;
        }
        self.last_offset = Some(offset);
        Some(DomCommand::set_style(
            self.hero,
            "transform",
            format!("translateY({offset}px)"),
        ))
    }
}

/// Full-page loader faded out on load and then removed from layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Loader {
    loader: ElementId,
    fade_ms: u32,
}

impl Loader {
    pub fn new(loader: ElementId, fade_ms: u32) -> Self {
        Self { loader, fade_ms }
    }

    pub fn fade_out(&self) -> Vec<DomCommand> {
        vec![
            DomCommand::set_style(self.loader, "opacity", "0"),
            DomCommand::StartTimeout {
                timer: TimerId::LoaderHide,
                delay_ms: self.fade_ms,
            },
        ]
    }

    pub fn hide(&self) -> DomCommand {
        DomCommand::set_style(self.loader, "display", "none")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_to_top_toggles_on_threshold() {
        let btn = ElementId(4);
        let mut back = BackToTop::new(btn, 100.0);

        // First update always writes, correcting whatever the markup had.
        assert_eq!(back.update(0.0), Some(DomCommand::remove_class(btn, "active")));
        assert_eq!(back.update(100.0), None);
        assert_eq!(back.update(101.0), Some(DomCommand::add_class(btn, "active")));
        assert_eq!(back.update(500.0), None);
        assert_eq!(back.update(20.0), Some(DomCommand::remove_class(btn, "active")));
    }

    #[test]
    fn parallax_moves_at_half_speed() {
        let hero = ElementId(1);
        let mut parallax = Parallax::new(hero, 0.5);
        assert_eq!(
            parallax.update(300.0),
            Some(DomCommand::set_style(hero, "transform", "translateY(150px)"))
        );
        assert_eq!(parallax.update(300.0), None);
    }

    #[test]
    fn loader_fades_then_hides() {
        let loader = Loader::new(ElementId(2), 500);
        let fade = loader.fade_out();
        assert_eq!(fade[0], DomCommand::set_style(ElementId(2), "opacity", "0"));
        assert_eq!(
            fade[1],
            DomCommand::StartTimeout {
                timer: TimerId::LoaderHide,
                delay_ms: 500
            }
        );
        assert_eq!(
            loader.hide(),
            DomCommand::set_style(ElementId(2), "display", "none")
        );
    }
}
