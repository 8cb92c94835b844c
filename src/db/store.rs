use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use rusqlite::Connection;

use super::queries::{self, TourFilter, HISTORY_LIMIT};
use crate::models::{Booking, Payment, Tour};

/// Read-only lookups the assistant needs from the booking store.
///
/// "Not found" is an empty result, never an error. Errors are reserved for
/// the store itself failing.
pub trait TravelStore: Send + Sync {
    fn active_tours(&self, limit: usize) -> anyhow::Result<Vec<Tour>>;

    fn search_tours(&self, filter: &TourFilter) -> anyhow::Result<Vec<Tour>>;

    fn booking_by_id(&self, booking_id: &str) -> anyhow::Result<Option<Booking>>;

    fn bookings_by_email(&self, email: &str) -> anyhow::Result<Vec<Booking>>;

    fn bookings_by_phone(&self, phone: &str) -> anyhow::Result<Vec<Booking>>;

    fn payments_for_booking(&self, booking_id: &str) -> anyhow::Result<Vec<Payment>>;

    fn payments_by_email(&self, email: &str) -> anyhow::Result<Vec<Payment>>;
}

pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Holds the connection only for the duration of `f`.
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let db = self
            .db
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&db)
    }
}

impl TravelStore for SqliteStore {
    fn active_tours(&self, limit: usize) -> anyhow::Result<Vec<Tour>> {
        self.with_conn(|db| queries::list_active_tours(db, limit))
    }

    fn search_tours(&self, filter: &TourFilter) -> anyhow::Result<Vec<Tour>> {
        self.with_conn(|db| queries::search_tours(db, filter))
    }

    fn booking_by_id(&self, booking_id: &str) -> anyhow::Result<Option<Booking>> {
        let Some(id) = queries::normalize_booking_id(booking_id) else {
            tracing::debug!("booking id is not a UUID, treating as not found");
            return Ok(None);
        };
        self.with_conn(|db| queries::get_booking_by_id(db, &id))
    }

    fn bookings_by_email(&self, email: &str) -> anyhow::Result<Vec<Booking>> {
        self.with_conn(|db| queries::get_bookings_by_email(db, email, HISTORY_LIMIT))
    }

    fn bookings_by_phone(&self, phone: &str) -> anyhow::Result<Vec<Booking>> {
        self.with_conn(|db| queries::get_bookings_by_phone(db, phone, HISTORY_LIMIT))
    }

    fn payments_for_booking(&self, booking_id: &str) -> anyhow::Result<Vec<Payment>> {
        let Some(id) = queries::normalize_booking_id(booking_id) else {
            return Ok(vec![]);
        };
        self.with_conn(|db| queries::get_payments_for_booking(db, &id))
    }

    fn payments_by_email(&self, email: &str) -> anyhow::Result<Vec<Payment>> {
        self.with_conn(|db| queries::get_payments_by_email(db, email, HISTORY_LIMIT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::tests::seeded_conn;

    #[test]
    fn test_malformed_booking_id_is_not_found() {
        let store = SqliteStore::new(seeded_conn());
        assert!(store.booking_by_id("3f2504e0-zzzz").unwrap().is_none());
        assert!(store.payments_for_booking("nope").unwrap().is_empty());
    }

    #[test]
    fn test_uppercase_booking_id_is_found() {
        let store = SqliteStore::new(seeded_conn());
        let booking = store
            .booking_by_id("3F2504E0-4F89-41D3-9A0C-0305E82C3301")
            .unwrap();
        assert!(booking.is_some());
        assert_eq!(
            store
                .payments_for_booking("3F2504E0-4F89-41D3-9A0C-0305E82C3301")
                .unwrap()
                .len(),
            2
        );
    }
}
