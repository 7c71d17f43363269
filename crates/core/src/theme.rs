use folio_protocol::{DomCommand, ElementId, ThemeMode};

/// Local storage key holding the saved theme.
pub const THEME_KEY: &str = "theme";

pub const DARK_CLASS: &str = "dark-theme";

fn icon_html(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Dark => r#"<i class="bx bx-sun"></i>"#,
        ThemeMode::Light => r#"<i class="bx bx-moon"></i>"#,
    }
}

/// Light/dark switch whose choice survives reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeToggle {
    body: ElementId,
    button: ElementId,
    mode: ThemeMode,
}

impl ThemeToggle {
    /// Attach to an already-inserted button and restore the saved mode.
    /// Only a saved `dark` changes the page; anything else keeps the default.
    pub fn attach(body: ElementId, button: ElementId, saved: Option<&str>) -> (Self, Vec<DomCommand>) {
        let mode = saved
            .and_then(ThemeMode::from_stored)
            .unwrap_or_default();
        let toggle = Self { body, button, mode };

        let mut commands = vec![DomCommand::SetHtml {
            target: button,
            html: icon_html(mode).to_string(),
        }];
        if mode == ThemeMode::Dark {
            commands.push(DomCommand::add_class(body, DARK_CLASS));
        }
        (toggle, commands)
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn toggle(&mut self) -> Vec<DomCommand> {
        self.mode = self.mode.toggled();
        let class = match self.mode {
            ThemeMode::Dark => DomCommand::add_class(self.body, DARK_CLASS),
            ThemeMode::Light => DomCommand::remove_class(self.body, DARK_CLASS),
        };
        vec![
            class,
            DomCommand::SetHtml {
                target: self.button,
                html: icon_html(self.mode).to_string(),
            },
            DomCommand::StoreSetting {
                key: THEME_KEY.to_string(),
                value: self.mode.as_str().to_string(),
            },
        ]
    }
}
