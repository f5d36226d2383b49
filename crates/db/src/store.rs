//! Request-scoped access to the booking tables.
//!
//! A [`StoreConnector`] opens a fresh pool for every booking request and the
//! returned [`BookingStore`] is closed before the response goes out. Handlers
//! only see these traits, which keeps them testable without Postgres.

use async_trait::async_trait;
use eyre::Result;
use trgnexus_core::models::booking::NewBooking;
use uuid::Uuid;

use crate::config::DatabaseSettings;
use crate::models::{DbTherapist, RecordedBooking};
use crate::repositories::{booking, therapist};
use crate::{DbPool, create_pool};

/// Connections per request pool: the therapist lookup and the transaction run
/// one after the other.
const REQUEST_POOL_SIZE: u32 = 1;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_therapist(&self, id: Uuid) -> Result<Option<DbTherapist>>;

    /// Runs the booking transaction and commits it.
    async fn record_booking(&self, booking: &NewBooking) -> Result<RecordedBooking>;

    /// Releases every connection held by the store.
    async fn close(&self);
}

#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn BookingStore>>;
}

pub struct PgBookingStore {
    pool: DbPool,
}

impl PgBookingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn find_therapist(&self, id: Uuid) -> Result<Option<DbTherapist>> {
        therapist::get_therapist_by_id(&self.pool, id).await
    }

    async fn record_booking(&self, new_booking: &NewBooking) -> Result<RecordedBooking> {
        booking::record_booking(&self.pool, new_booking).await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Request pool closed");
    }
}

pub struct PgStoreConnector {
    settings: DatabaseSettings,
}

impl PgStoreConnector {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StoreConnector for PgStoreConnector {
    async fn connect(&self) -> Result<Box<dyn BookingStore>> {
        let pool = create_pool(&self.settings, REQUEST_POOL_SIZE).await?;
        tracing::debug!("Connected to database");
        Ok(Box::new(PgBookingStore::new(pool)))
    }
}
