use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::schema::{bookings, properties};

/// Booking is the entity that represents a reservation of a property by a
/// guest for a contiguous range of calendar days. The range is half-open:
/// `check_in_date` is occupied, `check_out_date` is not, so a checkout and a
/// check-in may share the same day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    /// Subject of the reserving guest, issued by the identity provider.
    pub guest_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_price_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate booking submitted for admission. The id and the bookkeeping
/// timestamps are assigned at insert time.
#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBooking {
    pub property_id: Uuid,
    pub guest_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_price_cents: i64,
    pub currency: String,
}

impl NewBooking {
    /// Rejects a malformed candidate before any store interaction.
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.property_id.is_nil() {
            return Err(RepositoryError::Validation("property_id must not be empty"));
        }
        if self.guest_id.trim().is_empty() {
            return Err(RepositoryError::Validation("guest_id must not be empty"));
        }
        if self.check_in_date >= self.check_out_date {
            return Err(RepositoryError::Validation(
                "check_in_date must be before check_out_date",
            ));
        }
        if self.total_price_cents < 0 {
            return Err(RepositoryError::Validation(
                "total_price_cents must not be negative",
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(RepositoryError::Validation("currency must not be empty"));
        }
        Ok(())
    }

    /// Half-open overlap test against a stored range: `[a,b)` and `[c,d)`
    /// intersect iff `a < d && c < b`.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in_date < check_out && check_in < self.check_out_date
    }
}

/// BookingFilter narrows a booking listing by property and/or guest. Empty
/// fields match everything.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub property_id: Option<String>,
    pub guest_id: Option<String>,
}

/// Property represents a listing a booking can be anchored to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = properties)]
pub struct Property {
    pub id: Uuid,
    pub host_id: String,
    pub title: String,
    pub description: String,
    pub price_per_night_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = properties)]
pub struct NewProperty {
    pub host_id: String,
    pub title: String,
    pub description: String,
    pub price_per_night_cents: i64,
    pub currency: String,
}

impl NewProperty {
    pub fn validate(&self) -> Result<(), RepositoryError> {
        if self.host_id.trim().is_empty() {
            return Err(RepositoryError::Validation("host_id must not be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(RepositoryError::Validation("title must not be empty"));
        }
        if self.price_per_night_cents < 0 {
            return Err(RepositoryError::Validation(
                "price_per_night_cents must not be negative",
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(RepositoryError::Validation("currency must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate() -> NewBooking {
        NewBooking {
            property_id: Uuid::new_v4(),
            guest_id: "guest-1".to_string(),
            check_in_date: date(2025, 1, 5),
            check_out_date: date(2025, 1, 14),
            total_price_cents: 10_000,
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn valid_candidate_passes() {
        assert!(candidate().validate().is_ok());
    }

    #[test]
    fn reversed_dates_are_rejected() {
        let mut booking = candidate();
        booking.check_in_date = date(2025, 1, 14);
        booking.check_out_date = date(2025, 1, 5);
        assert!(matches!(
            booking.validate(),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn zero_length_range_is_rejected() {
        let mut booking = candidate();
        booking.check_out_date = booking.check_in_date;
        assert!(booking.validate().is_err());
    }

    #[test]
    fn empty_guest_is_rejected() {
        let mut booking = candidate();
        booking.guest_id = "  ".to_string();
        assert!(booking.validate().is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut booking = candidate();
        booking.total_price_cents = -1;
        assert!(booking.validate().is_err());
    }

    #[test]
    fn overlap_is_half_open() {
        let booking = candidate(); // [2025-01-05, 2025-01-14)

        // Sharing a boundary day is not a conflict.
        assert!(!booking.overlaps(date(2025, 1, 1), date(2025, 1, 5)));
        assert!(!booking.overlaps(date(2025, 1, 14), date(2025, 1, 15)));

        // One shared occupied day is.
        assert!(booking.overlaps(date(2025, 1, 13), date(2025, 1, 16)));
        assert!(booking.overlaps(date(2025, 1, 1), date(2025, 1, 6)));
        // Containment in either direction is.
        assert!(booking.overlaps(date(2025, 1, 6), date(2025, 1, 7)));
        assert!(booking.overlaps(date(2025, 1, 1), date(2025, 1, 31)));
    }
}
