//! Property-rental booking backend. Hosts list properties, guests book them
//! for date ranges, and the admission path guarantees that no two bookings
//! ever occupy overlapping days of the same property — the overlap check and
//! the insert run as one row-locked transaction in Postgres, so the invariant
//! holds under concurrent writers and across horizontally scaled instances.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;
