//! Postgres-backed repositories. Booking admission is the one operation with
//! a real consistency contract: the overlap check and the insert run inside a
//! single transaction that first takes a row lock on the property, so two
//! concurrent admissions for the same property serialize instead of both
//! passing the check and corrupting the non-overlap invariant.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db;
use crate::error::RepositoryError;
use crate::models::{Booking, BookingFilter, NewBooking, NewProperty, Property};
use crate::repository::{BookingRepository, PropertyRepository};
use crate::schema::{bookings, properties};

pub struct PostgresRepository {
    database_url: String,
}

impl PostgresRepository {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    fn conn(&self) -> Result<PgConnection, RepositoryError> {
        db::establish_connection(&self.database_url).map_err(RepositoryError::from)
    }
}

#[async_trait]
impl BookingRepository for PostgresRepository {
    async fn create_booking(&self, booking: NewBooking) -> Result<String, RepositoryError> {
        booking.validate()?;

        let mut conn = self.conn()?;
        log::info!(
            "creating booking: property_id={} check_in={} check_out={}",
            booking.property_id,
            booking.check_in_date,
            booking.check_out_date
        );

        let id = conn.transaction::<Uuid, RepositoryError, _>(|conn| {
            // Lock the property row for the lifetime of this transaction.
            // Concurrent admissions for the same property queue here, so at
            // most one of them sees a conflict-free window and inserts.
            let locked: Vec<Uuid> = properties::table
                .find(booking.property_id)
                .select(properties::id)
                .for_update()
                .load(conn)?;
            if locked.is_empty() {
                return Err(RepositoryError::PropertyNotFound);
            }

            // Half-open ranges [a,b) and [c,d) overlap iff a < d AND c < b,
            // so a checkout and a check-in may share a calendar day.
            let conflicting: i64 = bookings::table
                .filter(bookings::property_id.eq(booking.property_id))
                .filter(bookings::check_in_date.lt(booking.check_out_date))
                .filter(bookings::check_out_date.gt(booking.check_in_date))
                .count()
                .get_result(conn)?;
            if conflicting > 0 {
                return Err(RepositoryError::Overlap);
            }

            let now = Utc::now();
            let id = diesel::insert_into(bookings::table)
                .values((
                    &booking,
                    bookings::created_at.eq(now),
                    bookings::updated_at.eq(now),
                ))
                .returning(bookings::id)
                .get_result::<Uuid>(conn)?;
            Ok(id)
        })?;

        Ok(id.to_string())
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, RepositoryError> {
        // A string that is not a UUID can never name a row.
        let Ok(booking_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let mut conn = self.conn()?;
        log::info!("getting booking: id={}", id);
        let booking = bookings::table
            .find(booking_id)
            .first::<Booking>(&mut conn)
            .optional()?;
        Ok(booking)
    }

    async fn delete_booking(&self, id: &str) -> Result<(), RepositoryError> {
        let Ok(booking_id) = Uuid::parse_str(id) else {
            return Ok(());
        };

        let mut conn = self.conn()?;
        log::info!("deleting booking: id={}", id);
        diesel::delete(bookings::table.find(booking_id)).execute(&mut conn)?;
        Ok(())
    }

    async fn list_bookings(&self, filter: BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let mut conn = self.conn()?;

        let mut query = bookings::table.into_boxed();
        if let Some(property_id) = filter.property_id.as_deref().filter(|s| !s.is_empty()) {
            match Uuid::parse_str(property_id) {
                Ok(property_id) => query = query.filter(bookings::property_id.eq(property_id)),
                Err(_) => return Ok(Vec::new()),
            }
        }
        if let Some(guest_id) = filter.guest_id.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(bookings::guest_id.eq(guest_id.to_string()));
        }

        let rows = query
            .order(bookings::created_at.desc())
            .load::<Booking>(&mut conn)?;
        Ok(rows)
    }
}

#[async_trait]
impl PropertyRepository for PostgresRepository {
    async fn create_property(&self, property: NewProperty) -> Result<String, RepositoryError> {
        property.validate()?;

        let mut conn = self.conn()?;
        log::info!("creating property: host_id={}", property.host_id);
        let now = Utc::now();
        let id = diesel::insert_into(properties::table)
            .values((
                &property,
                properties::created_at.eq(now),
                properties::updated_at.eq(now),
            ))
            .returning(properties::id)
            .get_result::<Uuid>(&mut conn)?;
        Ok(id.to_string())
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>, RepositoryError> {
        let Ok(property_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let mut conn = self.conn()?;
        log::info!("getting property: id={}", id);
        let property = properties::table
            .find(property_id)
            .first::<Property>(&mut conn)
            .optional()?;
        Ok(property)
    }

    async fn delete_property(&self, id: &str) -> Result<(), RepositoryError> {
        let Ok(property_id) = Uuid::parse_str(id) else {
            return Ok(());
        };

        let mut conn = self.conn()?;
        log::info!("deleting property: id={}", id);
        // The property and its bookings go together or not at all.
        conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::delete(bookings::table.filter(bookings::property_id.eq(property_id)))
                .execute(conn)?;
            diesel::delete(properties::table.find(property_id)).execute(conn)?;
            Ok(())
        })
    }

    async fn list_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        let mut conn = self.conn()?;
        let rows = properties::table
            .order(properties::created_at.desc())
            .load::<Property>(&mut conn)?;
        Ok(rows)
    }
}
