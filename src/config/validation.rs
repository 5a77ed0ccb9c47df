//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts bounded, buffer limit non-zero)
//! - Check referenced files exist
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BackendConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::path::Path;

use crate::config::schema::BackendConfig;

/// Longest timeout accepted, in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &BackendConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let timeouts = [
        ("socket_timeout_ms", config.socket_timeout_ms),
        ("connect_timeout_ms", config.connect_timeout_ms),
        ("connection_request_timeout_ms", config.connection_request_timeout_ms),
    ];
    for (field, value) in timeouts {
        if value > MAX_TIMEOUT_MS {
            errors.push(ValidationError {
                field,
                message: format!("{} exceeds the maximum of {} ms", value, MAX_TIMEOUT_MS),
            });
        }
    }

    if config.max_buffered_chunks == Some(0) {
        errors.push(ValidationError {
            field: "max_buffered_chunks",
            message: "must be at least 1 (leave unset for unbounded)".to_string(),
        });
    }

    if let Some(tls) = &config.tls {
        if !Path::new(&tls.ca_cert_path).exists() {
            errors.push(ValidationError {
                field: "tls.ca_cert_path",
                message: format!("file not found: {}", tls.ca_cert_path),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
