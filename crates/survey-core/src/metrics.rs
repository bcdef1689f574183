use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{Survey, SurveyStatus};

/// Figures shown on the summary cards above the survey table.
///
/// Built from the list selected by owner scope, before any table filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurveyMetrics {
    pub total_surveys: usize,
    pub total_responses: u64,
    pub by_status: BTreeMap<SurveyStatus, usize>,
}

impl SurveyMetrics {
    pub fn from_surveys(surveys: &[Survey]) -> Self {
        let mut metrics = SurveyMetrics {
            total_surveys: surveys.len(),
            ..SurveyMetrics::default()
        };
        for survey in surveys {
            metrics.total_responses += u64::from(survey.current_participants);
            *metrics.by_status.entry(survey.status).or_insert(0) += 1;
        }
        metrics
    }

    pub fn count(&self, status: SurveyStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}
