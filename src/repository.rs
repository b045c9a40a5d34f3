use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::models::{Booking, BookingFilter, NewBooking, NewProperty, Property};

/// BookingRepository gathers the operations the booking handlers need.
///
/// `create_booking` is the admission operation: it either persists the
/// candidate or rejects it, and the set of persisted bookings for a property
/// stays pairwise non-overlapping no matter how many callers race it.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Admit a candidate. Returns the store-generated id on success,
    /// `RepositoryError::Overlap` when the range collides with an existing
    /// booking, and persists nothing on any failure.
    async fn create_booking(&self, booking: NewBooking) -> Result<String, RepositoryError>;

    /// Soft miss: `Ok(None)` when no booking matches the id.
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, RepositoryError>;

    /// Idempotent: deleting an id that does not exist succeeds silently.
    async fn delete_booking(&self, id: &str) -> Result<(), RepositoryError>;

    /// Bookings matching the filter, most recently created first.
    async fn list_bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>, RepositoryError>;
}

/// PropertyRepository covers the property catalog the bookings anchor to.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create_property(&self, property: NewProperty) -> Result<String, RepositoryError>;

    async fn get_property(&self, id: &str) -> Result<Option<Property>, RepositoryError>;

    /// Deletes the property and every booking anchored to it in one atomic
    /// unit: either both disappear or neither does.
    async fn delete_property(&self, id: &str) -> Result<(), RepositoryError>;

    /// All properties, most recently created first.
    async fn list_properties(&self) -> Result<Vec<Property>, RepositoryError>;
}
