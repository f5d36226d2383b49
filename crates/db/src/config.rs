//! Database connection settings.
//!
//! The connection string is read from `trgnexus_POSTGRES_URL`, then
//! `POSTGRES_URL`, then `DATABASE_URL`. Hosted Postgres providers hand out URLs
//! ending in `?sslmode=require`; that parameter is stripped and expressed as
//! [`PgSslMode::Require`] instead, which encrypts the connection without
//! verifying the server certificate.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

pub const DATABASE_URL_VARS: [&str; 3] = ["trgnexus_POSTGRES_URL", "POSTGRES_URL", "DATABASE_URL"];

/// Time allowed for acquiring a connection before the request fails.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    /// Connection string with any `sslmode=require` parameter removed
    pub url: String,
    /// Whether the raw URL asked for an encrypted connection
    pub require_ssl: bool,
    pub connect_timeout: Duration,
}

impl DatabaseSettings {
    pub fn new(raw_url: &str) -> Self {
        let (url, require_ssl) = normalize_connection_string(raw_url);
        Self {
            url,
            require_ssl,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Reads the first non-empty connection string from the environment.
    ///
    /// Returns `None` when no database is configured; callers decide whether
    /// that is fatal.
    pub fn from_env() -> Option<Self> {
        DATABASE_URL_VARS
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|url| !url.trim().is_empty())
            .map(|url| Self::new(url.trim()))
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let options = PgConnectOptions::from_str(&self.url)
            .wrap_err("Invalid Postgres connection string")?;

        Ok(if self.require_ssl {
            options.ssl_mode(PgSslMode::Require)
        } else {
            options
        })
    }
}

/// Removes `sslmode=require` from the query string.
///
/// Returns the rewritten URL and whether the parameter was present.
pub fn normalize_connection_string(raw: &str) -> (String, bool) {
    let Some((base, query)) = raw.split_once('?') else {
        return (raw.to_string(), false);
    };

    let mut require_ssl = false;
    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| {
            if param.eq_ignore_ascii_case("sslmode=require") {
                require_ssl = true;
                false
            } else {
                true
            }
        })
        .collect();

    let url = if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept.join("&"))
    };

    (url, require_ssl)
}
