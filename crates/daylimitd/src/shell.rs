//! Terminal rendering of countdown events
//!
//! Diagnostics go to stderr through tracing; this is the user-facing display
//! on stdout.

use daylimit_core::{CoreEvent, LogoutReason};
use daylimit_host_api::{LogoutError, LogoutMode, LogoutOutcome};
use daylimit_util::{format_hms, format_ms};
use std::io::{self, Write};

const BELL: &str = "\x07";

const SAVE_WORK_NOTICE: &str =
    "Please save your work. You will be logged out automatically when your time runs out.";

/// Stdin commands understood by the running countdown
pub const HELP: &str = "Type 'logout' and press Enter to pause and log out, 'quit' to close.";

pub struct Shell<W: Write> {
    out: W,
    /// The remaining-time line is being redrawn in place
    status_line_open: bool,
}

impl Shell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Shell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            status_line_open: false,
        }
    }

    pub fn banner(&mut self, mode: LogoutMode, enforce_on_close: bool) -> io::Result<()> {
        writeln!(self.out, "Daily Usage Limit - Auto Logout")?;
        if mode == LogoutMode::Simulated {
            writeln!(self.out, "[DRY RUN] Logouts are simulated.")?;
        }
        if enforce_on_close {
            writeln!(self.out, "Closing this window logs you out.")?;
        }
        writeln!(self.out, "{}", HELP)?;
        self.out.flush()
    }

    pub fn render(&mut self, events: &[CoreEvent]) -> io::Result<()> {
        for event in events {
            self.render_event(event)?;
        }
        self.out.flush()
    }

    fn render_event(&mut self, event: &CoreEvent) -> io::Result<()> {
        match event {
            CoreEvent::RemainingChanged {
                remaining,
                used_today,
                daily_limit,
            } => {
                write!(
                    self.out,
                    "\rTime remaining today: {}   Daily limit: {}   •   Used: {} ",
                    format_hms(*remaining),
                    format_hms(*daily_limit),
                    format_hms(*used_today)
                )?;
                self.status_line_open = true;
            }

            CoreEvent::WarningDue { threshold, .. } => {
                self.end_status_line()?;
                writeln!(self.out, "{}", BELL)?;
                writeln!(self.out, "*** Time Running Out ***")?;
                writeln!(self.out, "Less than {} minutes left", format_ms(*threshold))?;
                writeln!(self.out, "{}", SAVE_WORK_NOTICE)?;
            }

            CoreEvent::DayRolledOver { day, remaining, .. } => {
                self.end_status_line()?;
                writeln!(
                    self.out,
                    "New day {}: {} available.",
                    day,
                    format_hms(*remaining)
                )?;
            }

            CoreEvent::LogoutFailed { error, .. } => {
                self.end_status_line()?;
                writeln!(self.out, "*** Logout Failed ***")?;
                match error {
                    LogoutError::UnsupportedPlatform { os } => writeln!(
                        self.out,
                        "This tool can only log off on Windows (running on {}).",
                        os
                    )?,
                    LogoutError::BothFailed { primary, fallback } => {
                        writeln!(self.out, "Failed to log off via both methods.")?;
                        writeln!(self.out, "shutdown error: {}", primary)?;
                        writeln!(self.out, "API error: {}", fallback)?;
                    }
                }
            }

            CoreEvent::LoggedOut { reason, outcome } => {
                self.end_status_line()?;
                let headline = match reason {
                    LogoutReason::LimitExhausted => "Time is up. Logging out.",
                    LogoutReason::Manual => "Paused. Logging out.",
                    LogoutReason::WindowClosed => "Window closed. Logging out.",
                };
                writeln!(self.out, "{}", headline)?;
                match outcome {
                    Some(LogoutOutcome::Simulated) => {
                        writeln!(self.out, "Simulated log off (dry run).")?
                    }
                    Some(outcome) => writeln!(self.out, "Logged off ({}).", outcome)?,
                    None => writeln!(self.out, "The session could not be ended.")?,
                }
            }

            CoreEvent::ExitedWithoutLogout => {
                self.end_status_line()?;
                writeln!(self.out, "Window closed. Exiting without logout.")?;
            }
        }
        Ok(())
    }

    pub fn unknown_command(&mut self, command: &str) -> io::Result<()> {
        self.end_status_line()?;
        writeln!(self.out, "Unknown command '{}'. {}", command, HELP)?;
        self.out.flush()
    }

    /// Prompt shown under a blocking notice
    pub fn press_enter_prompt(&mut self) -> io::Result<()> {
        write!(self.out, "Press Enter to close.")?;
        self.out.flush()
    }

    /// Shown instead of the prompt when stdin has closed
    pub fn notice_unacknowledged(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "Input is closed, so this notice cannot be acknowledged. Closing shortly."
        )?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn end_status_line(&mut self) -> io::Result<()> {
        if self.status_line_open {
            writeln!(self.out)?;
            self.status_line_open = false;
        }
        Ok(())
    }
}
