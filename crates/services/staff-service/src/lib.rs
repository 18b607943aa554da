//! Staff Service Library
//!
//! Application layer for the company staff core: account registration and
//! login with lockout, employee, department and job title administration,
//! and hierarchical roles. Services are transport-agnostic and can be
//! embedded behind any API surface.

pub mod config;
pub mod dto;
pub mod repository;
pub mod service;

use tracing::info;

use crate::config::StaffServiceConfig;
use crate::service::Services;

/// Initialize logging from `config` and build in-memory backed services.
pub fn bootstrap(config: &StaffServiceConfig) -> common::AppResult<Services> {
    config.validate()?;
    common::telemetry::init_from_config(&config.log);

    info!(
        issuer = %config.jwt.issuer,
        max_failed_attempts = config.lockout.max_failed_attempts,
        max_page_size = config.pagination.max_page_size,
        "Staff services initialized"
    );
    Ok(Services::in_memory(config))
}
