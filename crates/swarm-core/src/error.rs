//! Base error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {field}: {value} ({reason})")]
    InvalidConfig {
        field:  &'static str,
        value:  f64,
        reason: &'static str,
    },
}

/// Shorthand result type for `swarm-core`.
pub type CoreResult<T> = Result<T, CoreError>;
