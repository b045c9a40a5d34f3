//! In-memory repositories backing the handler tests and local development.
//! The maps live behind one mutex, so the check-then-insert sequence of an
//! admission is atomic here the same way the row-locked transaction makes it
//! atomic in Postgres.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::{Booking, BookingFilter, NewBooking, NewProperty, Property};
use crate::repository::{BookingRepository, PropertyRepository};

#[derive(Default)]
struct Inner {
    properties: HashMap<Uuid, Property>,
    bookings: HashMap<Uuid, Booking>,
}

/// HashMap-backed implementation of both repositories. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a panicking test, not a recoverable state.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BookingRepository for InMemoryRepository {
    async fn create_booking(&self, booking: NewBooking) -> Result<String, RepositoryError> {
        booking.validate()?;

        let mut inner = self.lock();
        if !inner.properties.contains_key(&booking.property_id) {
            return Err(RepositoryError::PropertyNotFound);
        }

        let conflict = inner.bookings.values().any(|existing| {
            existing.property_id == booking.property_id
                && booking.overlaps(existing.check_in_date, existing.check_out_date)
        });
        if conflict {
            return Err(RepositoryError::Overlap);
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        inner.bookings.insert(
            id,
            Booking {
                id,
                property_id: booking.property_id,
                guest_id: booking.guest_id,
                check_in_date: booking.check_in_date,
                check_out_date: booking.check_out_date,
                total_price_cents: booking.total_price_cents,
                currency: booking.currency,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id.to_string())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, RepositoryError> {
        let Ok(booking_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.lock().bookings.get(&booking_id).cloned())
    }

    async fn delete_booking(&self, id: &str) -> Result<(), RepositoryError> {
        if let Ok(booking_id) = Uuid::parse_str(id) {
            self.lock().bookings.remove(&booking_id);
        }
        Ok(())
    }

    async fn list_bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let property_id = match filter.property_id.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => return Ok(Vec::new()),
            },
            None => None,
        };
        let guest_id = filter.guest_id.filter(|s| !s.is_empty());

        let mut rows: Vec<Booking> = self
            .lock()
            .bookings
            .values()
            .filter(|b| property_id.map_or(true, |id| b.property_id == id))
            .filter(|b| guest_id.as_deref().map_or(true, |g| b.guest_id == g))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl PropertyRepository for InMemoryRepository {
    async fn create_property(&self, property: NewProperty) -> Result<String, RepositoryError> {
        property.validate()?;

        let now = Utc::now();
        let id = Uuid::new_v4();
        self.lock().properties.insert(
            id,
            Property {
                id,
                host_id: property.host_id,
                title: property.title,
                description: property.description,
                price_per_night_cents: property.price_per_night_cents,
                currency: property.currency,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id.to_string())
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>, RepositoryError> {
        let Ok(property_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.lock().properties.get(&property_id).cloned())
    }

    async fn delete_property(&self, id: &str) -> Result<(), RepositoryError> {
        if let Ok(property_id) = Uuid::parse_str(id) {
            let mut inner = self.lock();
            inner.properties.remove(&property_id);
            inner.bookings.retain(|_, b| b.property_id != property_id);
        }
        Ok(())
    }

    async fn list_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        let mut rows: Vec<Property> = self.lock().properties.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
