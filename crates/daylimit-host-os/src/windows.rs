//! Windows logoff primitives

use std::process::Command;
use tracing::debug;
use windows_sys::Win32::System::Shutdown::{ExitWindowsEx, EWX_LOGOFF};

/// Graceful logoff through the `shutdown` tool.
///
/// No `/f`: applications get the chance to ask the user to save.
pub fn graceful_logoff() -> Result<(), String> {
    let status = Command::new("shutdown")
        .arg("/l")
        .status()
        .map_err(|e| format!("failed to run shutdown /l: {}", e))?;

    debug!(status = %status, "shutdown /l finished");

    if status.success() {
        Ok(())
    } else {
        Err(format!("shutdown /l exited with {}", status))
    }
}

/// Logoff through the Win32 API directly
pub fn api_logoff() -> Result<(), String> {
    // SAFETY: flag-only Win32 call, no pointers are passed
    let ok = unsafe { ExitWindowsEx(EWX_LOGOFF, 0) };

    if ok != 0 {
        Ok(())
    } else {
        Err(format!(
            "ExitWindowsEx failed: {}",
            std::io::Error::last_os_error()
        ))
    }
}
