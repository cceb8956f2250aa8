//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, deadline nesting)
//!     → RelayConfig (validated, immutable)
//!     → copied into the pipeline and server at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BudgetConfig, ClientConfig, ObservabilityConfig, RelayConfig, ServerConfig, StorageConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
