//! # Notification Configuration
//!
//! - `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`: outbound mail credentials; all
//!   three must be set for email to be sent
//! - `SMTP_PORT`: SMTP port (default: 587)
//! - `WHATSAPP_API_URL`: endpoint of the WhatsApp sending API
//! - `WHATSAPP_API_TOKEN`: bearer token for that API (optional)
//! - `DASHBOARD_URL`: therapist dashboard linked from alert emails

use std::env;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_DASHBOARD_URL: &str = "https://trg-nexus.vercel.app/dashboard";

#[derive(Debug, Clone, PartialEq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotifyConfig {
    /// `None` when any SMTP credential is missing
    pub smtp: Option<SmtpConfig>,
    /// `None` when no API URL is configured
    pub whatsapp: Option<WhatsAppConfig>,
    pub dashboard_url: String,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let smtp = match (get("SMTP_HOST"), get("SMTP_USER"), get("SMTP_PASS")) {
            (Some(host), Some(user), Some(password)) => Some(SmtpConfig {
                host,
                port: get("SMTP_PORT")
                    .and_then(|port| port.trim().parse().ok())
                    .filter(|port| *port != 0)
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user,
                password,
            }),
            _ => None,
        };

        let whatsapp = get("WHATSAPP_API_URL").map(|api_url| WhatsAppConfig {
            api_url,
            token: get("WHATSAPP_API_TOKEN"),
        });

        let dashboard_url =
            get("DASHBOARD_URL").unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());

        Self {
            smtp,
            whatsapp,
            dashboard_url,
        }
    }
}
