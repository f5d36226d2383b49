pub mod repositories;

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use eyre::{Result, eyre};

use crate::store::{BookingStore, StoreConnector};
pub use repositories::MockBookingStore;

/// Connector that hands out one pre-configured store.
///
/// A second `connect` call, or one on a connector built with
/// [`OnceConnector::unreachable`], fails like an unreachable database.
pub struct OnceConnector {
    store: Mutex<Option<Box<dyn BookingStore>>>,
    connects: AtomicUsize,
}

impl OnceConnector {
    pub fn new(store: impl BookingStore + 'static) -> Self {
        let store: Box<dyn BookingStore> = Box::new(store);
        Self {
            store: Mutex::new(Some(store)),
            connects: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            store: Mutex::new(None),
            connects: AtomicUsize::new(0),
        }
    }

    /// Number of times `connect` has been called.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for OnceConnector {
    async fn connect(&self) -> Result<Box<dyn BookingStore>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.store
            .lock()
            .map_err(|_| eyre!("connector lock poisoned"))?
            .take()
            .ok_or_else(|| eyre!("connection refused"))
    }
}
