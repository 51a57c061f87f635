//! OS host adapter for daylimit
//!
//! Provides:
//! - Simulated logout (no session change, for trying the tool out)
//! - Windows logoff: `shutdown /l`, falling back to `ExitWindowsEx`
//! - An `UnsupportedPlatform` error everywhere else

mod logout;
#[cfg(windows)]
mod windows;

pub use logout::*;
