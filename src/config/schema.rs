//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the quote relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Serving boundary settings.
    pub server: ServerConfig,

    /// Quotation provider settings.
    pub upstream: UpstreamConfig,

    /// Time budget of one server-side invocation.
    pub budget: BudgetConfig,

    /// Quotation log settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// File-writing client settings.
    pub client: ClientConfig,
}

/// Serving boundary configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Third-party quotation API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Endpoint returning the latest quotation.
    pub url: String,

    /// Currency pair key of the response object (e.g., "USDBRL").
    pub pair: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://economia.awesomeapi.com.br/json/last/USD-BRL".to_string(),
            pair: "USDBRL".to_string(),
        }
    }
}

/// Deadline hierarchy of one invocation, in milliseconds.
///
/// Every stage deadline is `min(remaining budget, stage ceiling)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Whole invocation budget.
    pub overall_ms: u64,

    /// Ceiling of the outbound fetch (header wait and body read).
    pub fetch_ceiling_ms: u64,

    /// Ceiling of the quotation log write. Must stay below the fetch ceiling.
    pub store_ceiling_ms: u64,
}

impl BudgetConfig {
    pub fn overall(&self) -> Duration {
        Duration::from_millis(self.overall_ms)
    }

    pub fn fetch_ceiling(&self) -> Duration {
        Duration::from_millis(self.fetch_ceiling_ms)
    }

    pub fn store_ceiling(&self) -> Duration {
        Duration::from_millis(self.store_ceiling_ms)
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            overall_ms: 1_000,
            fetch_ceiling_ms: 200,
            store_ceiling_ms: 10,
        }
    }
}

/// Quotation log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist every fetched quotation before answering.
    pub enabled: bool,

    /// SQLite connection URL.
    pub database_url: String,

    /// Pool size.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_url: "sqlite://quotation.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// File-writing client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Serving boundary endpoint.
    pub server_url: String,

    /// Artifact written on success.
    pub output_path: String,

    /// Client-side invocation budget.
    pub budget: BudgetConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080/cotacao".to_string(),
            output_path: "cotacao.txt".to_string(),
            budget: BudgetConfig {
                overall_ms: 300,
                fetch_ceiling_ms: 300,
                store_ceiling_ms: 10,
            },
        }
    }
}
