//! Quick-edit policy for survey dates and participant targets.
//!
//! [`EditableFields::for_survey`] decides what the dialog may change,
//! [`validate_edit_draft`] checks a draft before anything is sent, and
//! [`build_update_payload`] produces the partial update. The payload builder
//! enforces the start-date lock on its own; disabled inputs in a view are a
//! hint derived from the same [`EditableFields`].

use std::collections::BTreeMap;
use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::survey::calendar_date;
use crate::models::{Survey, SurveyStatus};

/// Which quick-edit inputs are enabled for a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EditableFields {
    pub start_date: bool,
    pub end_date: bool,
    pub required_participants: bool,
}

impl EditableFields {
    /// Once a survey has responses while active, expired or completed, its
    /// start date is pinned. `inactive` surveys may always be rescheduled.
    pub fn for_survey(survey: &Survey) -> Self {
        let locked_by_participation =
            survey.has_participants() && survey.status.pins_start_date();
        Self {
            start_date: !locked_by_participation || survey.status == SurveyStatus::Inactive,
            end_date: true,
            required_participants: true,
        }
    }
}

/// Working copy shown in the quick-edit dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraft {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub required_participants: i64,
}

impl EditDraft {
    pub fn from_survey(survey: &Survey) -> Self {
        Self {
            start_date: survey.start_day(),
            end_date: survey.end_day(),
            required_participants: i64::from(survey.required_participants),
        }
    }

    /// Read a date input. An empty input means "leave unchanged".
    pub fn parse_date_input(input: &str) -> Result<Option<Date>, CoreError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        calendar_date(input)
            .map(Some)
            .ok_or_else(|| CoreError::InvalidDate {
                input: input.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditField {
    StartDate,
    EndDate,
    RequiredParticipants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EditError {
    #[error("required participants must be greater than zero")]
    InvalidParticipantCount,

    #[error("start date must be before end date")]
    InvalidDateRange,
}

/// Validation failures keyed by the input they belong to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<EditField, EditError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: EditField) -> Option<EditError> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EditField, EditError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    fn insert(&mut self, field: EditField, error: EditError) {
        self.0.insert(field, error);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.values().map(|e| e.to_string()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Check a draft before submission. Missing dates are not errors.
pub fn validate_edit_draft(draft: &EditDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if draft.required_participants <= 0 {
        errors.insert(
            EditField::RequiredParticipants,
            EditError::InvalidParticipantCount,
        );
    }

    if let (Some(start), Some(end)) = (draft.start_date, draft.end_date)
        && start >= end
    {
        errors.insert(EditField::EndDate, EditError::InvalidDateRange);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Body of a partial survey update. Absent keys stay unchanged server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PartialUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<Date>,
    pub required_participants: i64,
}

/// Build the update payload for a draft.
///
/// The start date is dropped whenever `editable` says it is locked, no matter
/// what the draft carries.
pub fn build_update_payload(draft: &EditDraft, editable: EditableFields) -> PartialUpdate {
    PartialUpdate {
        start_date: draft.start_date.filter(|_| editable.start_date),
        end_date: draft.end_date,
        required_participants: draft.required_participants,
    }
}
