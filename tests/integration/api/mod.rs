//! API integration tests
//!
//! Integration tests for all REST endpoints

mod chat_test;
mod health_test;
