//! # Notification Dispatcher
//!
//! Fans a committed booking out to the patient email, therapist email and
//! WhatsApp channels. The three run concurrently; only the patient email
//! outcome is returned.

use std::sync::Arc;

use eyre::Result;
use serde_json::json;
use tracing::{debug, error, info, warn};
use trgnexus_core::models::delivery::{BookingNotice, DeliveryReport};

use crate::config::NotifyConfig;
use crate::mailer::{MailSender, SmtpMailer};
use crate::templates;
use crate::whatsapp::{WhatsAppClient, normalize_phone};

pub struct NotificationDispatcher {
    mailer: Option<Arc<dyn MailSender>>,
    whatsapp: Option<WhatsAppClient>,
    dashboard_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        mailer: Option<Arc<dyn MailSender>>,
        whatsapp: Option<WhatsAppClient>,
        dashboard_url: impl Into<String>,
    ) -> Self {
        Self {
            mailer,
            whatsapp,
            dashboard_url: dashboard_url.into(),
        }
    }

    /// Wires up the channels whose credentials are present.
    pub fn from_config(config: &NotifyConfig) -> Result<Self> {
        let mailer = config
            .smtp
            .clone()
            .map(|smtp| Arc::new(SmtpMailer::new(smtp)) as Arc<dyn MailSender>);

        let whatsapp = match &config.whatsapp {
            Some(whatsapp) => Some(WhatsAppClient::new(whatsapp.clone())?),
            None => None,
        };

        Ok(Self::new(mailer, whatsapp, config.dashboard_url.clone()))
    }

    pub fn email_configured(&self) -> bool {
        self.mailer.is_some()
    }

    pub fn whatsapp_configured(&self) -> bool {
        self.whatsapp.is_some()
    }

    /// Attempts every channel and reports the patient email outcome.
    pub async fn dispatch(&self, notice: &BookingNotice) -> DeliveryReport {
        info!("Preparing to send notifications for: {}", notice.email);

        let (report, (), ()) = tokio::join!(
            self.notify_patient(notice),
            self.notify_therapist(notice),
            self.notify_whatsapp(notice),
        );

        report
    }

    async fn notify_patient(&self, notice: &BookingNotice) -> DeliveryReport {
        let Some(mailer) = &self.mailer else {
            warn!(
                "SMTP credentials not found. Skipping email sending. (Check SMTP_HOST, SMTP_USER, SMTP_PASS)"
            );
            return DeliveryReport::skipped();
        };

        match mailer.send(templates::patient_confirmation(notice)).await {
            Ok(sent) => {
                info!("Email sent: {}", sent.message_id);
                DeliveryReport::sent(json!({
                    "messageId": sent.message_id,
                    "response": sent.response,
                }))
            }
            Err(err) => {
                error!("Error sending email: {:#}", err);
                DeliveryReport::failed(err.to_string())
            }
        }
    }

    async fn notify_therapist(&self, notice: &BookingNotice) {
        let Some(email) = templates::therapist_alert(notice, &self.dashboard_url) else {
            debug!("No therapist email on booking, skipping therapist alert");
            return;
        };
        let Some(mailer) = &self.mailer else {
            return;
        };

        match mailer.send(email).await {
            Ok(_) => info!("Therapist email sent."),
            Err(err) => error!("Error sending therapist email: {:#}", err),
        }
    }

    async fn notify_whatsapp(&self, notice: &BookingNotice) {
        let Some(client) = &self.whatsapp else {
            info!("WHATSAPP_API_URL not configured. Skipping automatic sending.");
            return;
        };

        let phone = notice
            .phone
            .as_deref()
            .filter(|phone| phone.chars().any(|c| c.is_ascii_digit()));
        let Some(phone) = phone else {
            warn!("Booking for {} has no phone number, skipping WhatsApp", notice.email);
            return;
        };

        let phone = normalize_phone(phone);
        info!("Sending automatic WhatsApp message to: {}", phone);

        match client
            .send_text(&phone, &templates::whatsapp_confirmation(notice))
            .await
        {
            Ok(()) => info!("WhatsApp message sent successfully!"),
            Err(err) => error!("Failed to send WhatsApp: {:#}", err),
        }
    }
}
