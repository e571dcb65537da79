//! Test suite for utasks-chat
//!
//! This module organizes all tests

pub mod common;
pub mod integration;
