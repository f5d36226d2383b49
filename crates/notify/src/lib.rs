//! # TRG Nexus notifications
//!
//! Best-effort delivery of booking confirmations. Each channel is attempted
//! independently and a failure is logged, never propagated:
//!
//! - **Patient email**: confirmation sent over SMTP; its outcome is the only
//!   one reported back to the HTTP caller
//! - **Therapist email**: new-booking alert to the assigned therapist
//! - **WhatsApp**: confirmation text through a third-party HTTP API

pub mod config;
pub mod dispatcher;
pub mod mailer;
pub mod mock;
pub mod templates;
pub mod whatsapp;

pub use config::NotifyConfig;
pub use dispatcher::NotificationDispatcher;
