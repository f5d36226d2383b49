//! WhatsApp delivery through a third-party HTTP sending API.

use std::time::Duration;

use eyre::{Result, eyre};
use reqwest::Client;
use serde::Serialize;

use crate::config::WhatsAppConfig;

/// Country code prepended to local (Brazilian) numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "55";
/// Longest digit string still treated as a local number (DDD + 9 digits).
const LOCAL_NUMBER_MAX_DIGITS: usize = 11;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reduces a phone number to digits and adds the country code to local numbers.
///
/// `(11) 98765-4321` becomes `5511987654321`; anything longer than eleven
/// digits is assumed to carry its country code already.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    if digits.len() <= LOCAL_NUMBER_MAX_DIGITS {
        format!("{}{}", DEFAULT_COUNTRY_CODE, digits)
    } else {
        digits
    }
}

#[derive(Debug, Serialize)]
struct SendTextPayload<'a> {
    phone: &'a str,
    message: &'a str,
}

pub struct WhatsAppClient {
    http: Client,
    config: WhatsAppConfig,
}

impl WhatsAppClient {
    pub fn new(config: WhatsAppConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    /// Posts a text message to an already normalized phone number.
    pub async fn send_text(&self, phone: &str, message: &str) -> Result<()> {
        let mut request = self
            .http
            .post(&self.config.api_url)
            .json(&SendTextPayload { phone, message });

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token).header("Client-Token", token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(eyre!("WhatsApp API responded {}: {}", status, error_text));
        }

        Ok(())
    }
}
