#![forbid(unsafe_code)]

//! Contact form backed by a transactional mail relay.
//!
//! The form collects a name, an email address, and a message, then hands the
//! fields to a [`MailRelay`]. There are no retries. Whatever the relay says,
//! the draft is cleared once it has been handed over, and the visitor sees
//! one of two status lines.

use std::fmt;

use tracing::{debug, error};

/// Status line after a successful send.
pub const SENT_TEXT: &str = "Message sent successfully!";
/// Status line after a failed send.
pub const FAILED_TEXT: &str = "Something went wrong. Please try again.";

/// Relay account identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

/// Fields submitted by the visitor, named as the relay template expects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    pub user_name: String,
    pub user_email: String,
    pub message: String,
}

impl ContactMessage {
    /// Template field names paired with their values.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("user_name", self.user_name.as_str()),
            ("user_email", self.user_email.as_str()),
            ("message", self.message.as_str()),
        ]
    }

    /// Every field must be non-blank and the email must look like one.
    pub fn validate(&self) -> Result<(), ContactError> {
        if let Some((name, _)) = self.fields().into_iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ContactError::MissingField(name));
        }
        if !looks_like_email(self.user_email.trim()) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(())
    }
}

/// `local@domain` with no whitespace, the shape a browser email input
/// accepts.
fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// A transactional mail service.
pub trait MailRelay {
    fn send(&mut self, config: &RelayConfig, message: &ContactMessage) -> Result<(), RelayError>;
}

/// Failure reported by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayError {
    message: String,
}

impl RelayError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mail relay error: {}", self.message)
    }
}

impl std::error::Error for RelayError {}

/// Rejected before the relay was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactError {
    MissingField(&'static str),
    InvalidEmail,
}

impl fmt::Display for ContactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "field {name} is required"),
            Self::InvalidEmail => write!(f, "user_email is not a valid email address"),
        }
    }
}

impl std::error::Error for ContactError {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    Sent,
    Failed,
}

impl SubmitStatus {
    /// Status line shown under the form; empty while idle.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Sent => SENT_TEXT,
            Self::Failed => FAILED_TEXT,
        }
    }
}

/// Draft plus last outcome.
#[derive(Debug, Clone)]
pub struct ContactForm {
    config: RelayConfig,
    draft: ContactMessage,
    status: SubmitStatus,
}

impl ContactForm {
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            draft: ContactMessage::default(),
            status: SubmitStatus::Idle,
        }
    }

    #[must_use]
    pub fn draft(&self) -> &ContactMessage {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ContactMessage {
        &mut self.draft
    }

    #[must_use]
    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Validate and send the draft.
    ///
    /// Invalid drafts are returned as errors and left untouched. Otherwise
    /// the relay is called once, the draft is cleared, and the outcome is
    /// recorded in [`status`](Self::status).
    pub fn submit<R: MailRelay + ?Sized>(
        &mut self,
        relay: &mut R,
    ) -> Result<SubmitStatus, ContactError> {
        self.draft.validate()?;
        let outcome = relay.send(&self.config, &self.draft);
        self.draft = ContactMessage::default();
        self.status = match outcome {
            Ok(()) => {
                debug!(template = %self.config.template_id, "contact message sent");
                SubmitStatus::Sent
            }
            Err(err) => {
                error!(
                    template = %self.config.template_id,
                    error = %err,
                    "contact message failed"
                );
                SubmitStatus::Failed
            }
        };
        Ok(self.status)
    }
}
