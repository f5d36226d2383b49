use async_trait::async_trait;
use mockall::mock;
use trgnexus_core::models::booking::NewBooking;
use uuid::Uuid;

use crate::models::{DbTherapist, RecordedBooking};
use crate::store::BookingStore;

// Mock store for testing handlers without Postgres
mock! {
    pub BookingStore {}

    #[async_trait]
    impl BookingStore for BookingStore {
        async fn find_therapist(&self, id: Uuid) -> eyre::Result<Option<DbTherapist>>;

        async fn record_booking(&self, booking: &NewBooking) -> eyre::Result<RecordedBooking>;

        async fn close(&self);
    }
}
