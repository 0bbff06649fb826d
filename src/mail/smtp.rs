//! SMTP delivery over lettre's tokio transport

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, instrument};

use super::{Email, Mailer};
use crate::config::{MailConfig, SmtpSecurity};
use crate::error::{DigestError, Result};
use crate::util::SMTP_TIMEOUT;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    server: String,
}

impl SmtpMailer {
    /// Connect settings from the `[mail]` section; login is the sender address
    pub fn from_config(config: &MailConfig) -> Result<Self> {
        let username = config
            .sender_email
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DigestError::MissingSetting {
                name: "mail.sender_email".to_string(),
                env: "SENDER_EMAIL".to_string(),
            })?;
        let password = config
            .sender_password
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DigestError::MissingSetting {
                name: "mail.sender_password".to_string(),
                env: "SENDER_PASSWORD".to_string(),
            })?;

        let server = format!("{}:{}", config.smtp_server, config.smtp_port);
        let builder = match config.security {
            SmtpSecurity::Implicit => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_server)
            }
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            }
        }
        .map_err(|e| DigestError::MailSend {
            server: server.clone(),
            reason: e.to_string(),
        })?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self { transport, server })
    }

    pub fn server(&self) -> &str {
        &self.server
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip_all, fields(server = %self.server, receivers = email.to.len()))]
    async fn send(&self, email: &Email) -> Result<()> {
        let message = email.to_message()?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DigestError::MailSend {
                server: self.server.clone(),
                reason: e.to_string(),
            })?;

        info!(subject = %email.subject, "Email sent");
        Ok(())
    }
}
