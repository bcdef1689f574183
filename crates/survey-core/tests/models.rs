mod support;

use survey_core::metrics::SurveyMetrics;
use survey_core::models::{Survey, SurveyStatus};

use support::survey;

#[test]
fn survey_reads_api_json() {
    let json = serde_json::json!({
        "surveyId": 12,
        "title": "Dorm satisfaction",
        "status": "ACTIVE",
        "currentParticipants": 4,
        "requiredParticipants": 30,
        "startDate": "2025-02-01T08:00:00Z",
        "endDate": null,
        "targetGender": "Female",
        "targetAcademicYears": [1, "2", "x", null],
        "targetDepartmentIds": null,
        "points": 15
    });

    let survey: Survey = serde_json::from_value(json).unwrap();
    assert_eq!(survey.status, SurveyStatus::Active);
    assert_eq!(survey.target_academic_years, vec![1, 2]);
    assert!(survey.target_department_ids.is_empty());
    assert_eq!(survey.end_day(), None);
    assert_eq!(survey.extra.get("points"), Some(&serde_json::json!(15)));
}

#[test]
fn null_fields_do_not_sink_the_list() {
    let json = serde_json::json!([
        {
            "surveyId": 1,
            "title": null,
            "status": "draft",
            "currentParticipants": null,
            "requiredParticipants": null,
            "targetGender": null
        },
        { "surveyId": 2, "title": "Canteen menu", "status": "active" }
    ]);

    let surveys: Vec<Survey> = serde_json::from_value(json).unwrap();
    assert_eq!(surveys.len(), 2);
    assert_eq!(surveys[0].title, "");
    assert_eq!(surveys[0].current_participants, 0);
    assert_eq!(surveys[0].required_participants, 0);
    assert_eq!(surveys[0].target_gender, "all");
    assert_eq!(surveys[1].title, "Canteen menu");
}

#[test]
fn unknown_fields_survive_a_round_trip() {
    let json = serde_json::json!({
        "surveyId": 3,
        "title": "Sports week",
        "status": "draft",
        "questions": [{ "text": "Which sport?" }]
    });
    let survey: Survey = serde_json::from_value(json).unwrap();
    assert_eq!(survey.target_gender, "all");

    let back = serde_json::to_value(&survey).unwrap();
    assert_eq!(back["questions"][0]["text"], "Which sport?");
    assert_eq!(back["status"], "draft");
}

#[test]
fn unknown_status_is_rejected() {
    let json = serde_json::json!({ "surveyId": 1, "title": "x", "status": "archived" });
    assert!(serde_json::from_value::<Survey>(json).is_err());
}

#[test]
fn metrics_sum_responses_and_count_statuses() {
    let surveys = vec![
        survey(1, SurveyStatus::Draft, 0, &[]),
        survey(2, SurveyStatus::Active, 10, &[]),
        survey(3, SurveyStatus::Active, 5, &[]),
        survey(4, SurveyStatus::Completed, 40, &[]),
    ];
    let metrics = SurveyMetrics::from_surveys(&surveys);
    assert_eq!(metrics.total_surveys, 4);
    assert_eq!(metrics.total_responses, 55);
    assert_eq!(metrics.count(SurveyStatus::Active), 2);
    assert_eq!(metrics.count(SurveyStatus::Expired), 0);
}
