//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Database test fixtures
//! - Authentication test helpers
//! - An in-process application with a live presence registry

pub mod auth_helpers;
pub mod database;
pub mod test_app;

// Re-export commonly used utilities
pub use auth_helpers::*;
pub use database::*;
pub use test_app::*;
