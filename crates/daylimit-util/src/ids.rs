//! Strongly-typed identifiers for daylimit

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar-day key in `YYYY-MM-DD` form, used to index daily usage
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    /// chrono format string for day keys
    pub const FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
