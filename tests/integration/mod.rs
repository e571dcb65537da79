//! Integration tests
//!
//! Exercise the real router and gateway over an in-memory database.

mod api;
mod database;
mod realtime;
