use folio_protocol::{DomCommand, ElementId, TimerId};
use thiserror::Error;

/// Controls read from the contact form, relative to the form element.
pub const NAME_INPUT: &str = r#"input[type="text"]"#;
pub const EMAIL_INPUT: &str = r#"input[type="email"]"#;
pub const SUBJECT_INPUT: &str = r#"input[placeholder="Subject"]"#;
pub const MESSAGE_INPUT: &str = "textarea";
pub const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;

pub const SENDING_LABEL: &str = "Sending...";
pub const THANK_YOU: &str = "Thank you for your message! I will get back to you soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

/// Validation failures. The `Display` text is what the visitor sees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields.")]
    MissingField(FormField),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactFields {
    /// Every field must be non-empty, then the email must look like
    /// `local@domain.tld`. Whitespace counts as content.
    pub fn validate(&self) -> Result<(), FormError> {
        let fields = [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Subject, &self.subject),
            (FormField::Message, &self.message),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, v)| v.is_empty()) {
            return Err(FormError::MissingField(*field));
        }
        if !is_valid_email(&self.email) {
            return Err(FormError::InvalidEmail);
        }
        Ok(())
    }
}

/// Equivalent of `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
pub fn is_valid_email(email: &str) -> bool {
    let plain = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if !plain(local) || !plain(domain) {
        return false;
    }
    // Some dot with text on both sides.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending { original_label: String },
}

/// Contact form with a simulated, always-successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactForm {
    form: ElementId,
    submit: Option<ElementId>,
    delay_ms: u32,
    phase: SubmitPhase,
}

impl ContactForm {
    pub fn new(form: ElementId, submit: Option<ElementId>, delay_ms: u32) -> Self {
        Self {
            form,
            submit,
            delay_ms,
            phase: SubmitPhase::Idle,
        }
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    /// Handle a submit with the current field values and the submit button's
    /// label. Submits while a send is in flight are ignored.
    pub fn on_submit(&mut self, fields: &ContactFields, button_label: &str) -> Vec<DomCommand> {
        if matches!(self.phase, SubmitPhase::Sending { .. }) {
            return Vec::new();
        }
        if let Err(err) = fields.validate() {
            return vec![DomCommand::alert(err.to_string())];
        }

        self.phase = SubmitPhase::Sending {
            original_label: button_label.to_string(),
        };
        let mut commands = Vec::with_capacity(3);
        if let Some(submit) = self.submit {
            commands.push(DomCommand::SetText {
                target: submit,
                text: SENDING_LABEL.to_string(),
            });
            commands.push(DomCommand::SetDisabled {
                target: submit,
                disabled: true,
            });
        }
        commands.push(DomCommand::StartTimeout {
            timer: TimerId::SubmitReset,
            delay_ms: self.delay_ms,
        });
        commands
    }

    /// The simulated round trip finished.
    pub fn on_sent(&mut self) -> Vec<DomCommand> {
        let SubmitPhase::Sending { original_label } =
            std::mem::replace(&mut self.phase, SubmitPhase::Idle)
        else {
            return Vec::new();
        };

        let mut commands = vec![
            DomCommand::alert(THANK_YOU),
            DomCommand::ResetForm { target: self.form },
        ];
        if let Some(submit) = self.submit {
            commands.push(DomCommand::SetText {
                target: submit,
                text: original_label,
            });
            commands.push(DomCommand::SetDisabled {
                target: submit,
                disabled: false,
            });
        }
        commands
    }
}
