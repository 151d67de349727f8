//! Error types for snapshot construction and configuration validation
//!
//! Everything past construction is infallible: once a [`crate::ResourceSnapshot`]
//! and [`crate::CostSnapshot`] exist, synthesis and aggregation always succeed.

use thiserror::Error;

/// Failure to build a snapshot from collector output
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{snapshot} snapshot is missing required section `{section}`")]
    MissingSection {
        snapshot: &'static str,
        section: &'static str,
    },

    #[error("invalid quantity `{value}`: {reason}")]
    InvalidQuantity { value: String, reason: String },

    #[error("`{field}` must be non-negative, got {value}")]
    NegativeAmount { field: String, value: f64 },

    #[error("failed to decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnapshotError {
    pub(crate) fn invalid_quantity(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQuantity {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Rejected optimizer configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be a finite, non-negative number, got {value}")]
    NotNonNegative { field: &'static str, value: f64 },

    #[error("`{field}` must be within [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("`{field}` must be at least 1.0, got {value}")]
    BufferBelowOne { field: &'static str, value: f64 },
}
