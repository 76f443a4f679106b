//! Integration tests module
//!
//! This module contains all integration tests for the scabbard CLI commands.

pub mod analyze;
pub mod common;
pub mod config;
pub mod generate;
pub mod validate;
