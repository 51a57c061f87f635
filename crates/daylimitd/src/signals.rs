//! OS signals that count as closing the countdown window

use anyhow::{Context, Result};

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Close requests from the terminal or the session manager
#[cfg(unix)]
pub struct CloseSignals {
    sigint: Signal,
    sigterm: Signal,
    sighup: Signal,
}

#[cfg(unix)]
impl CloseSignals {
    pub fn new() -> Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?,
            sigterm: signal(SignalKind::terminate())
                .context("Failed to create SIGTERM handler")?,
            // Sent when the controlling terminal goes away
            sighup: signal(SignalKind::hangup()).context("Failed to create SIGHUP handler")?,
        })
    }

    /// Wait for the next close request and name its source
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigint.recv() => "SIGINT",
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sighup.recv() => "SIGHUP",
        }
    }
}

#[cfg(windows)]
use tokio::signal::windows::{ctrl_c, ctrl_close, CtrlC, CtrlClose};

/// Close requests from the console
#[cfg(windows)]
pub struct CloseSignals {
    ctrl_c: CtrlC,
    ctrl_close: CtrlClose,
}

#[cfg(windows)]
impl CloseSignals {
    pub fn new() -> Result<Self> {
        Ok(Self {
            ctrl_c: ctrl_c().context("Failed to create Ctrl-C handler")?,
            ctrl_close: ctrl_close().context("Failed to create console close handler")?,
        })
    }

    /// Wait for the next close request and name its source
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.ctrl_c.recv() => "Ctrl-C",
            _ = self.ctrl_close.recv() => "console close",
        }
    }
}
