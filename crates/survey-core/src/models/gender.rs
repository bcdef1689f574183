use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Audience gender a survey targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TargetGender {
    All,
    Male,
    Female,
}

impl TargetGender {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetGender::All => "all",
            TargetGender::Male => "male",
            TargetGender::Female => "female",
        }
    }

    /// Case-insensitive comparison against the raw value carried by a survey.
    pub fn matches_raw(self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for TargetGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetGender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [TargetGender::All, TargetGender::Male, TargetGender::Female]
            .into_iter()
            .find(|gender| gender.matches_raw(s.trim()))
            .ok_or_else(|| CoreError::UnknownGender(s.to_string()))
    }
}
