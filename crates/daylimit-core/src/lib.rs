//! Day accounting and countdown state machine for daylimit
//!
//! This crate is the heart of daylimit, containing:
//! - Day accounting (per-day usage, persisted on every change)
//! - The session record (today's usage against the daily limit)
//! - The countdown engine (Running -> LoggedOut, one-shot warning, rollover)

mod accounting;
mod engine;
mod events;
mod session;

pub use accounting::*;
pub use engine::*;
pub use events::*;
pub use session::*;

use daylimit_store::StoreError;
use thiserror::Error;

/// Core engine errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// Usage could not be persisted; the run must stop
    #[error("Failed to persist usage: {0}")]
    StateWrite(#[from] StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
