use folio_protocol::{DomCommand, ElementId, TimerId};

/// Extract the `#fragment` of a link target.
///
/// Returns `None` for links without a fragment and for a bare `#`, which
/// point at nothing.
pub fn link_hash(href: &str) -> Option<&str> {
    let start = href.find('#')?;
    let hash = &href[start..];
    (hash.len() > 1).then_some(hash)
}

/// Keys that activate the mobile navigation toggle like a click.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// Collapsible navigation used on narrow screens.
///
/// The open state lives on `body` as `mobile-nav-active` and is mirrored into
/// the toggle's `aria-expanded`.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileNav {
    body: ElementId,
    toggle: ElementId,
    first_link: Option<ElementId>,
    focus_delay_ms: u32,
    open: bool,
}

impl MobileNav {
    pub fn new(
        body: ElementId,
        toggle: ElementId,
        first_link: Option<ElementId>,
        focus_delay_ms: u32,
    ) -> Self {
        Self {
            body,
            toggle,
            first_link,
            focus_delay_ms,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> Vec<DomCommand> {
        if self.open {
            let mut commands = self.close();
            commands.push(DomCommand::Focus {
                target: self.toggle,
            });
            return commands;
        }

        self.open = true;
        let mut commands = vec![
            DomCommand::add_class(self.body, "mobile-nav-active"),
            DomCommand::set_attribute(self.toggle, "aria-expanded", "true"),
        ];
        if self.first_link.is_some() {
            commands.push(DomCommand::StartTimeout {
                timer: TimerId::FocusNavLink,
                delay_ms: self.focus_delay_ms,
            });
        }
        commands
    }

    /// Close without moving focus. No-op when already closed.
    pub fn close(&mut self) -> Vec<DomCommand> {
        if !self.open {
            return Vec::new();
        }
        self.open = false;
        vec![
            DomCommand::remove_class(self.body, "mobile-nav-active"),
            DomCommand::set_attribute(self.toggle, "aria-expanded", "false"),
        ]
    }

    /// Delayed focus after opening; skipped if the menu closed meanwhile.
    pub fn focus_first_link(&self) -> Vec<DomCommand> {
        match self.first_link {
            Some(target) if self.open => vec![DomCommand::Focus { target }],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_extraction() {
        assert_eq!(link_hash("#about"), Some("#about"));
        assert_eq!(link_hash("index.html#resume"), Some("#resume"));
        assert_eq!(link_hash("#"), None);
        assert_eq!(link_hash("/blog"), None);
    }

    #[test]
    fn activation_keys() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Escape"));
    }

    #[test]
    fn open_schedules_focus_and_close_returns_it() {
        let (body, toggle, link) = (ElementId(0), ElementId(1), ElementId(2));
        let mut nav = MobileNav::new(body, toggle, Some(link), 100);

        let opened = nav.toggle();
        assert!(nav.is_open());
        assert!(opened.contains(&DomCommand::add_class(body, "mobile-nav-active")));
        assert!(opened.contains(&DomCommand::set_attribute(toggle, "aria-expanded", "true")));
        assert!(opened.contains(&DomCommand::StartTimeout {
            timer: TimerId::FocusNavLink,
            delay_ms: 100
        }));
        assert_eq!(nav.focus_first_link(), vec![DomCommand::Focus { target: link }]);

        let closed = nav.toggle();
        assert!(!nav.is_open());
        assert_eq!(closed.last(), Some(&DomCommand::Focus { target: toggle }));
        assert!(nav.focus_first_link().is_empty());
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut nav = MobileNav::new(ElementId(0), ElementId(1), None, 100);
        assert!(nav.close().is_empty());
        let opened = nav.toggle();
        assert_eq!(opened.len(), 2);
        assert_eq!(nav.close().len(), 2);
    }
}
