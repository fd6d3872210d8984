//! # Campus Common Library
//!
//! Shared code for the campus records platform:
//! - Cohort normalization and membership matching
//! - Change-event types for the dashboard push channel
//! - Data models (students, faculty, teaching assignments)
//! - Error types

pub mod cohort;
pub mod error;
pub mod events;
pub mod models;

pub use error::{Error, Result};
