//! Survey list filter engine.
//!
//! Every criterion in [`FilterState`] is independent and the criteria are
//! ANDed. Filtering never reorders or mutates surveys; the output is always a
//! subsequence of the input.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Survey, SurveyStatus, TargetGender};

/// Which of the two source lists the management view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerScope {
    /// Every survey visible to the signed-in user's role.
    #[default]
    All,
    /// Surveys owned by the signed-in user.
    Mine,
}

/// Status narrowing for the survey table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    /// Surveys with at least one participant. Not a lifecycle status.
    HasResponses,
    Status(SurveyStatus),
}

impl StatusFilter {
    fn admits_status(self, status: SurveyStatus) -> bool {
        match self {
            StatusFilter::All | StatusFilter::HasResponses => true,
            StatusFilter::Status(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    /// Parses the select-box values used by the list view. `"mine"` is the
    /// legacy "owner's list, no status narrowing" value and reads as `All`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" | "mine" => Ok(StatusFilter::All),
            "responses" => Ok(StatusFilter::HasResponses),
            other => other.parse().map(StatusFilter::Status),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "gender", rename_all = "snake_case")]
pub enum GenderFilter {
    #[default]
    All,
    Only(TargetGender),
}

impl FromStr for GenderFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case("all") {
            return Ok(GenderFilter::All);
        }
        s.parse().map(GenderFilter::Only)
    }
}

/// Selection over integer ids (academic years, department ids).
///
/// `Only` with an empty set selects everything, like `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ids", rename_all = "snake_case")]
pub enum IdSelection {
    #[default]
    All,
    Only(BTreeSet<i64>),
    /// Raw inputs held no usable id. Matches no survey.
    Nothing,
}

impl IdSelection {
    /// Selection of exactly `ids`. An empty set selects everything.
    pub fn only(ids: impl IntoIterator<Item = i64>) -> Self {
        let ids: BTreeSet<i64> = ids.into_iter().collect();
        if ids.is_empty() {
            IdSelection::All
        } else {
            IdSelection::Only(ids)
        }
    }

    /// Build a selection from raw select-box values.
    ///
    /// No values, or any value equal to `"all"`, selects everything. Values
    /// that are not integers are dropped; when none is left the result is
    /// [`IdSelection::Nothing`].
    pub fn from_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let inputs: Vec<S> = inputs.into_iter().collect();
        if inputs.is_empty()
            || inputs
                .iter()
                .any(|input| input.as_ref().trim().eq_ignore_ascii_case("all"))
        {
            return IdSelection::All;
        }
        let ids: BTreeSet<i64> = inputs
            .iter()
            .filter_map(|input| input.as_ref().trim().parse().ok())
            .collect();
        if ids.is_empty() {
            IdSelection::Nothing
        } else {
            IdSelection::Only(ids)
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            IdSelection::All => true,
            IdSelection::Only(selected) => selected.is_empty(),
            IdSelection::Nothing => false,
        }
    }

    /// True when `ids` shares at least one element with the selection.
    pub fn matches(&self, ids: &[i64]) -> bool {
        match self {
            IdSelection::All => true,
            IdSelection::Only(selected) if selected.is_empty() => true,
            IdSelection::Only(selected) => ids.iter().any(|id| selected.contains(id)),
            IdSelection::Nothing => false,
        }
    }
}

/// Snapshot of the filters applied to the survey table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_query: String,
    pub owner_scope: OwnerScope,
    pub status: StatusFilter,
    pub gender: GenderFilter,
    pub academic_years: IdSelection,
    pub departments: IdSelection,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    pub fn with_owner_scope(mut self, scope: OwnerScope) -> Self {
        self.owner_scope = scope;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_gender(mut self, gender: GenderFilter) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_academic_years(mut self, years: IdSelection) -> Self {
        self.academic_years = years;
        self
    }

    pub fn with_departments(mut self, departments: IdSelection) -> Self {
        self.departments = departments;
        self
    }

    /// Switch the source list. Status narrowing never survives a scope
    /// change, so a stale status filter cannot hide the whole new list.
    pub fn switch_scope(&mut self, scope: OwnerScope) {
        if self.owner_scope != scope {
            self.owner_scope = scope;
            self.status = StatusFilter::All;
        }
    }

    /// Whether `survey` passes every active criterion.
    pub fn matches(&self, survey: &Survey) -> bool {
        self.matches_query(survey)
            && self.status.admits_status(survey.status)
            && self.matches_responses(survey)
            && self.matches_gender(survey)
            && self.academic_years.matches(&survey.target_academic_years)
            && self.departments.matches(&survey.target_department_ids)
    }

    fn matches_query(&self, survey: &Survey) -> bool {
        let query = self.search_query.to_lowercase();
        query.is_empty() || survey.title.to_lowercase().contains(&query)
    }

    fn matches_responses(&self, survey: &Survey) -> bool {
        self.status != StatusFilter::HasResponses || survey.has_participants()
    }

    fn matches_gender(&self, survey: &Survey) -> bool {
        match self.gender {
            GenderFilter::All => true,
            GenderFilter::Only(gender) => gender.matches_raw(&survey.target_gender),
        }
    }
}

/// Narrow `source` to the surveys matching `state`, keeping source order.
///
/// `state.owner_scope` is not consulted here: the caller picks which list to
/// pass in.
pub fn filter_surveys<'a>(source: &'a [Survey], state: &FilterState) -> Vec<&'a Survey> {
    source.iter().filter(|survey| state.matches(survey)).collect()
}
