//! Outbound email.
//!
//! [`MailSender`] is the single mail-sending capability used for both the
//! patient confirmation and the therapist alert. [`SmtpMailer`] opens an SMTP
//! transport for each message and drops it once the message is handed off.

use std::time::Duration;

use async_trait::async_trait;
use eyre::Result;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use uuid::Uuid;

use crate::config::SmtpConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(15);
const MESSAGE_ID_DOMAIN: &str = "trgnexus.com";

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    /// Sender mailbox, e.g. `"TRG Nexus" <noreply@trgnexus.com>`
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub message_id: String,
    /// Final SMTP server reply
    pub response: String,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<SentEmail>;
}

pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<SentEmail> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), MESSAGE_ID_DOMAIN);

        let message = Message::builder()
            .from(email.from.parse::<Mailbox>()?)
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject)
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(email.html)?;

        let transport = self.transport()?;
        let response = transport.send(message).await?;
        let lines: Vec<String> = response.message().map(|line| line.to_string()).collect();

        tracing::debug!("SMTP accepted message {} for {}", message_id, email.to);

        Ok(SentEmail {
            message_id,
            response: format!("{} {}", response.code(), lines.join(" ")),
        })
    }
}
