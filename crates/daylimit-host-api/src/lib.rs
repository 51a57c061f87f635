//! Host adapter trait interfaces for daylimit
//!
//! This crate defines the interface between the countdown engine and the
//! platform-specific way of ending the user's session. It contains no
//! platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
