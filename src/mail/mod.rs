//! Mail delivery
//!
//! - [`Email`]: a rendered digest ready to send
//! - [`Mailer`]: delivery seam, implemented by [`SmtpMailer`] (lettre) and
//!   [`CaptureMailer`] (in-memory, for tests and `--dry-run`)

pub mod smtp;

pub use smtp::SmtpMailer;

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::{Address, Message};

use crate::config::MailConfig;
use crate::error::{DigestError, Result};

/// A plain-text message addressed to one or more receivers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub subject: String,
    pub body: String,
    pub from_name: String,
    pub from_address: String,
    pub to: Vec<String>,
}

impl Email {
    /// Address a message from the configured sender to every receiver
    pub fn from_config(
        config: &MailConfig,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self> {
        let from_address = config
            .sender_email
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DigestError::MissingSetting {
                name: "mail.sender_email".to_string(),
                env: "SENDER_EMAIL".to_string(),
            })?;

        Ok(Self {
            subject: subject.into(),
            body: body.into(),
            from_name: config.sender_name.clone(),
            from_address,
            to: config.receivers.clone(),
        })
    }

    /// Build the MIME message: UTF-8 plain text, `From: Name <addr>`
    pub fn to_message(&self) -> Result<Message> {
        if self.to.is_empty() {
            return Err(DigestError::MailBuild {
                reason: "no receivers".to_string(),
            });
        }

        let from = Mailbox::new(Some(self.from_name.clone()), parse_address(&self.from_address)?);
        let mut builder = Message::builder()
            .from(from)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        for receiver in &self.to {
            builder = builder.to(Mailbox::new(None, parse_address(receiver)?));
        }

        builder
            .body(self.body.clone())
            .map_err(|e| DigestError::MailBuild {
                reason: e.to_string(),
            })
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| DigestError::InvalidAddress {
            address: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Delivers a rendered digest
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;
}

/// Records messages instead of sending them
#[derive(Debug, Default)]
pub struct CaptureMailer {
    sent: Mutex<Vec<Email>>,
}

impl CaptureMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages captured so far
    pub fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Email> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Mailer for CaptureMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        // Same validation as a real send
        email.to_message()?;
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email.clone());
        Ok(())
    }
}
