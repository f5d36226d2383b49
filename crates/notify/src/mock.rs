use async_trait::async_trait;
use mockall::mock;

use crate::mailer::{MailSender, OutgoingEmail, SentEmail};

// Mock mail sender for testing dispatch without an SMTP server
mock! {
    pub MailSender {}

    #[async_trait]
    impl MailSender for MailSender {
        async fn send(&self, email: OutgoingEmail) -> eyre::Result<SentEmail>;
    }
}
