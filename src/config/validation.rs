//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ceilings > 0, addresses and URLs parse)
//! - Enforce the nested deadline hierarchy before any request is served
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{BudgetConfig, RelayConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: String },

    #[error("{section}: fetch ceiling {fetch_ms}ms exceeds overall budget {overall_ms}ms")]
    FetchExceedsBudget {
        section: &'static str,
        fetch_ms: u64,
        overall_ms: u64,
    },

    #[error("{section}: store ceiling {store_ms}ms must be below fetch ceiling {fetch_ms}ms")]
    StoreNotBelowFetch {
        section: &'static str,
        store_ms: u64,
        fetch_ms: u64,
    },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_budget("budget", &config.budget, &mut errors);
    validate_budget("client.budget", &config.client.budget, &mut errors);

    check_url("upstream.url", &config.upstream.url, &mut errors);
    check_url("client.server_url", &config.client.server_url, &mut errors);
    check_address("server.bind_address", &config.server.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.upstream.pair.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "upstream.pair" });
    }
    if config.client.output_path.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "client.output_path" });
    }
    if config.storage.enabled {
        if config.storage.database_url.trim().is_empty() {
            errors.push(ValidationError::Empty { field: "storage.database_url" });
        }
        if config.storage.max_connections == 0 {
            errors.push(ValidationError::Zero {
                field: "storage.max_connections".to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that one budget section describes strictly nested deadlines.
pub fn validate_budget(
    section: &'static str,
    budget: &BudgetConfig,
    errors: &mut Vec<ValidationError>,
) {
    for (name, value) in [
        ("overall_ms", budget.overall_ms),
        ("fetch_ceiling_ms", budget.fetch_ceiling_ms),
        ("store_ceiling_ms", budget.store_ceiling_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero {
                field: format!("{section}.{name}"),
            });
        }
    }

    if budget.fetch_ceiling_ms > budget.overall_ms {
        errors.push(ValidationError::FetchExceedsBudget {
            section,
            fetch_ms: budget.fetch_ceiling_ms,
            overall_ms: budget.overall_ms,
        });
    }
    if budget.store_ceiling_ms >= budget.fetch_ceiling_ms {
        errors.push(ValidationError::StoreNotBelowFetch {
            section,
            store_ms: budget.store_ceiling_ms,
            fetch_ms: budget.fetch_ceiling_ms,
        });
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if url::Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
