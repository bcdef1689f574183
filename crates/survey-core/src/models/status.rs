use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Lifecycle state of a survey, as reported by the survey API.
///
/// Observed transitions are `draft -> active -> completed | expired`, with
/// `inactive` reachable from `draft` or `active`. The client never moves a
/// survey between states; it only reads the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", try_from = "String")]
#[ts(export)]
pub enum SurveyStatus {
    Draft,
    Active,
    Completed,
    Inactive,
    Expired,
}

impl SurveyStatus {
    pub const ALL: [SurveyStatus; 5] = [
        SurveyStatus::Draft,
        SurveyStatus::Active,
        SurveyStatus::Completed,
        SurveyStatus::Inactive,
        SurveyStatus::Expired,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SurveyStatus::Draft => "draft",
            SurveyStatus::Active => "active",
            SurveyStatus::Completed => "completed",
            SurveyStatus::Inactive => "inactive",
            SurveyStatus::Expired => "expired",
        }
    }

    /// Human-readable label for summary cards and table badges.
    pub fn label(self) -> &'static str {
        match self {
            SurveyStatus::Draft => "Draft",
            SurveyStatus::Active => "Active",
            SurveyStatus::Completed => "Completed",
            SurveyStatus::Inactive => "Inactive",
            SurveyStatus::Expired => "Expired",
        }
    }

    /// Statuses under which collected responses pin the start date.
    pub fn pins_start_date(self) -> bool {
        matches!(
            self,
            SurveyStatus::Active | SurveyStatus::Expired | SurveyStatus::Completed
        )
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurveyStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SurveyStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for SurveyStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
