//! Common utilities shared by the staff services.
//!
//! This crate provides:
//! - Unified application error type
//! - Configuration structures
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, ErrorBody, OptionExt};
