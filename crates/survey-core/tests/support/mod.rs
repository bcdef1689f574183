use survey_core::models::{Survey, SurveyStatus};

pub fn survey(id: i64, status: SurveyStatus, participants: u32, years: &[i64]) -> Survey {
    Survey {
        survey_id: id,
        title: format!("Survey {id}"),
        status,
        current_participants: participants,
        required_participants: 20,
        start_date: None,
        end_date: None,
        target_gender: "all".to_string(),
        target_academic_years: years.to_vec(),
        target_department_ids: Vec::new(),
        extra: serde_json::Map::new(),
    }
}

#[allow(dead_code)]
pub fn ids(surveys: &[&Survey]) -> Vec<i64> {
    surveys.iter().map(|s| s.survey_id).collect()
}
