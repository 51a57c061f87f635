//! Persisted state record and its validating decoder

use daylimit_util::DayKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

const LIMIT_KEY: &str = "dailyLimitSeconds";
const LEGACY_LIMIT_KEY: &str = "daily_limit_seconds";
const USAGE_KEY: &str = "usage";

/// The on-disk record: configured daily budget plus seconds used per day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub daily_limit_seconds: u64,

    #[serde(default)]
    pub usage: BTreeMap<DayKey, u64>,
}

impl PersistedState {
    /// Fresh record with no usage
    pub fn new(daily_limit_seconds: u64) -> Self {
        Self {
            daily_limit_seconds,
            usage: BTreeMap::new(),
        }
    }

    /// Decode a state file, repairing individual fields where possible.
    ///
    /// Only a document that is not JSON, or not a JSON object, is rejected.
    /// A missing or mistyped limit falls back to `default_limit`; a missing
    /// or mistyped usage map becomes empty; usage entries that are not
    /// numbers are dropped, fractional ones are truncated and negative ones
    /// clamp to zero.
    pub fn decode(content: &str, default_limit: u64) -> Result<DecodedState, StateReadError> {
        let value: Value = serde_json::from_str(content)?;
        let Value::Object(object) = value else {
            return Err(StateReadError::NotAnObject);
        };

        let mut repairs = Vec::new();

        let daily_limit_seconds = match decode_limit(&object) {
            Some((limit, legacy)) => {
                if legacy {
                    repairs.push(Repair::LegacyLimitKey);
                }
                limit
            }
            None => {
                repairs.push(Repair::LimitReset);
                default_limit
            }
        };

        let usage = match object.get(USAGE_KEY) {
            Some(Value::Object(entries)) => decode_usage(entries, &mut repairs),
            _ => {
                repairs.push(Repair::UsageReset);
                BTreeMap::new()
            }
        };

        Ok(DecodedState {
            state: Self {
                daily_limit_seconds,
                usage,
            },
            repairs,
        })
    }
}

fn decode_limit(object: &Map<String, Value>) -> Option<(u64, bool)> {
    if let Some(limit) = object.get(LIMIT_KEY).and_then(Value::as_u64) {
        return Some((limit, false));
    }
    object
        .get(LEGACY_LIMIT_KEY)
        .and_then(Value::as_u64)
        .map(|limit| (limit, true))
}

fn decode_usage(entries: &Map<String, Value>, repairs: &mut Vec<Repair>) -> BTreeMap<DayKey, u64> {
    let mut usage = BTreeMap::new();
    for (day, seconds) in entries {
        if let Some(secs) = seconds.as_u64() {
            usage.insert(DayKey::new(day.as_str()), secs);
        } else if seconds.as_i64().is_some() {
            usage.insert(DayKey::new(day.as_str()), 0);
            repairs.push(Repair::UsageEntryClamped(day.clone()));
        } else if let Some(secs) = seconds.as_f64().filter(|s| s.is_finite()) {
            if secs >= 0.0 {
                // Saturating float-to-int cast
                usage.insert(DayKey::new(day.as_str()), secs.trunc() as u64);
                repairs.push(Repair::UsageEntryTruncated(day.clone()));
            } else {
                usage.insert(DayKey::new(day.as_str()), 0);
                repairs.push(Repair::UsageEntryClamped(day.clone()));
            }
        } else {
            repairs.push(Repair::UsageEntryDropped(day.clone()));
        }
    }
    usage
}

/// Result of decoding a state file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedState {
    pub state: PersistedState,
    /// Field-level fixes applied; non-empty means the file should be rewritten
    pub repairs: Vec<Repair>,
}

/// A field-level fix applied while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    LimitReset,
    LegacyLimitKey,
    UsageReset,
    UsageEntryClamped(String),
    UsageEntryTruncated(String),
    UsageEntryDropped(String),
}

impl std::fmt::Display for Repair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repair::LimitReset => write!(f, "{} missing or invalid, reset to default", LIMIT_KEY),
            Repair::LegacyLimitKey => write!(f, "{} migrated to {}", LEGACY_LIMIT_KEY, LIMIT_KEY),
            Repair::UsageReset => write!(f, "{} missing or invalid, reset to empty", USAGE_KEY),
            Repair::UsageEntryClamped(day) => write!(f, "usage for {} was negative, clamped to 0", day),
            Repair::UsageEntryTruncated(day) => {
                write!(f, "usage for {} was fractional, truncated", day)
            }
            Repair::UsageEntryDropped(day) => write!(f, "usage for {} was not a number, dropped", day),
        }
    }
}

/// Reasons a state file is unusable as a whole
#[derive(Debug, Error)]
pub enum StateReadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value is not an object")]
    NotAnObject,
}
