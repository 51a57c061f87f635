//! Persistence layer for daylimit
//!
//! Provides:
//! - The persisted state record (daily limit + usage per day)
//! - A JSON file store with crash-safe atomic saves and self-repairing loads
//! - The append-only activity log

mod activity;
mod json;
mod state;
mod traits;

pub use activity::*;
pub use json::*;
pub use state::*;
pub use traits::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
