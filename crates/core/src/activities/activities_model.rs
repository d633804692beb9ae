//! Activity domain models.

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// One logged step count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: i64,
    pub steps: i64,
    /// Unix epoch seconds of when the activity happened.
    pub date: i64,
}

impl ActivityRecord {
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    /// Timestamp rendered in the local timezone, as shown in the activity list.
    pub fn display_date(&self) -> String {
        match Local.timestamp_opt(self.date, 0).single() {
            Some(local) => local.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.date.to_string(),
        }
    }
}

/// Input model for logging a new activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub steps: i64,
    pub date: i64,
}

impl NewActivity {
    pub fn new(steps: i64, date: i64) -> Self {
        Self { steps, date }
    }

    /// Stamps the entry with the current time, truncated to whole seconds.
    pub fn now(steps: i64) -> Self {
        Self {
            steps,
            date: Utc::now().timestamp(),
        }
    }

    pub fn into_record(self, id: i64) -> ActivityRecord {
        ActivityRecord {
            id,
            steps: self.steps,
            date: self.date,
        }
    }
}

/// Parses the add-entry form input into a step count.
///
/// The store accepts any integer; this is where non-numeric and non-positive
/// input gets rejected before it reaches the core.
pub fn parse_steps(input: &str) -> Result<i64> {
    let steps: i64 = input
        .trim()
        .parse()
        .map_err(ValidationError::NumberParse)?;
    if steps <= 0 {
        return Err(ValidationError::InvalidInput(format!(
            "steps must be a positive whole number, got {}",
            steps
        ))
        .into());
    }
    Ok(steps)
}

/// Index at which `record` belongs in a list ordered by date descending.
///
/// Ties go in front of existing entries with the same date, matching the
/// store's `date DESC, id DESC` ordering for freshly assigned ids.
pub(crate) fn insertion_index(list: &[ActivityRecord], record: &ActivityRecord) -> usize {
    list.partition_point(|existing| {
        existing.date > record.date || (existing.date == record.date && existing.id > record.id)
    })
}
