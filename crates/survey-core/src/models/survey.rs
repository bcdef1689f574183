use jiff::civil;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use super::status::SurveyStatus;

/// A survey as served by the survey API.
///
/// Only the fields the list view and the quick-edit dialog act on are typed;
/// everything else the API sends is kept in `extra` and written back as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Survey {
    pub survey_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub status: SurveyStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_participants: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_participants: u32,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default = "default_target_gender", deserialize_with = "lenient_gender")]
    pub target_gender: String,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub target_academic_years: Vec<i64>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub target_department_ids: Vec<i64>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Survey {
    pub fn has_participants(&self) -> bool {
        self.current_participants > 0
    }

    /// Calendar day the survey opens, if the API sent a readable start date.
    pub fn start_day(&self) -> Option<civil::Date> {
        self.start_date.as_deref().and_then(calendar_date)
    }

    /// Calendar day the survey closes, if the API sent a readable end date.
    pub fn end_day(&self) -> Option<civil::Date> {
        self.end_date.as_deref().and_then(calendar_date)
    }
}

fn default_target_gender() -> String {
    "all".to_string()
}

/// Extract the calendar date from an API date value.
///
/// Accepts an RFC 3339 timestamp (read in UTC), a civil date-time without
/// offset, or a bare `YYYY-MM-DD` date. Blank input yields `None`.
pub fn calendar_date(raw: &str) -> Option<civil::Date> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = raw.parse::<jiff::Timestamp>() {
        return Some(ts.to_zoned(jiff::tz::TimeZone::UTC).date());
    }
    if let Ok(dt) = raw.parse::<civil::DateTime>() {
        return Some(dt.date());
    }
    raw.parse::<civil::Date>().ok()
}

/// Read `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_gender<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_else(default_target_gender))
}

/// Deserialize an id list whose entries may be numbers or numeric strings.
/// Entries that are neither are dropped; `null` reads as an empty list.
fn lenient_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(coerce_id)
        .collect())
}

fn coerce_id(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
