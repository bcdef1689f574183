mod support;

use assert_matches::assert_matches;
use jiff::civil::date;
use survey_core::error::CoreError;
use survey_core::models::SurveyStatus;
use survey_core::quick_edit::{
    build_update_payload, validate_edit_draft, EditDraft, EditError, EditField, EditableFields,
};

use support::survey;

fn start_editable(status: SurveyStatus, participants: u32) -> bool {
    EditableFields::for_survey(&survey(1, status, participants, &[])).start_date
}

#[test]
fn responses_pin_the_start_date_of_running_or_finished_surveys() {
    assert!(!start_editable(SurveyStatus::Active, 5));
    assert!(!start_editable(SurveyStatus::Expired, 1));
    assert!(!start_editable(SurveyStatus::Completed, 2));
}

#[test]
fn start_date_stays_editable_without_responses_or_when_inactive() {
    assert!(start_editable(SurveyStatus::Draft, 0));
    assert!(start_editable(SurveyStatus::Active, 0));
    assert!(start_editable(SurveyStatus::Inactive, 5));
    assert!(start_editable(SurveyStatus::Draft, 3));
}

#[test]
fn end_date_and_target_are_always_editable() {
    for status in SurveyStatus::ALL {
        let fields = EditableFields::for_survey(&survey(1, status, 9, &[]));
        assert!(fields.end_date);
        assert!(fields.required_participants);
    }
}

#[test]
fn zero_participants_is_rejected() {
    let draft = EditDraft {
        start_date: None,
        end_date: None,
        required_participants: 0,
    };
    let errors = validate_edit_draft(&draft).unwrap_err();
    assert_eq!(
        errors.get(EditField::RequiredParticipants),
        Some(EditError::InvalidParticipantCount)
    );
}

#[test]
fn start_on_or_after_end_is_rejected() {
    let draft = EditDraft {
        start_date: Some(date(2025, 6, 1)),
        end_date: Some(date(2025, 5, 1)),
        required_participants: 10,
    };
    let errors = validate_edit_draft(&draft).unwrap_err();
    assert_eq!(errors.get(EditField::EndDate), Some(EditError::InvalidDateRange));

    let same_day = EditDraft {
        start_date: Some(date(2025, 6, 1)),
        end_date: Some(date(2025, 6, 1)),
        required_participants: 10,
    };
    assert!(validate_edit_draft(&same_day).is_err());
}

#[test]
fn all_failures_are_reported_together() {
    let draft = EditDraft {
        start_date: Some(date(2025, 6, 1)),
        end_date: Some(date(2025, 5, 1)),
        required_participants: -3,
    };
    let errors = validate_edit_draft(&draft).unwrap_err();
    assert_eq!(errors.iter().count(), 2);
}

#[test]
fn missing_start_date_passes() {
    let draft = EditDraft {
        start_date: EditDraft::parse_date_input("").unwrap(),
        end_date: EditDraft::parse_date_input("2025-06-01").unwrap(),
        required_participants: 10,
    };
    assert!(validate_edit_draft(&draft).is_ok());
}

#[test]
fn malformed_date_input_is_an_error() {
    assert_matches!(
        EditDraft::parse_date_input("06/01/2025"),
        Err(CoreError::InvalidDate { .. })
    );
    assert_eq!(
        EditDraft::parse_date_input("2025-06-01T09:30:00Z").unwrap(),
        Some(date(2025, 6, 1))
    );
}

#[test]
fn locked_start_date_is_dropped_from_payload() {
    let draft = EditDraft {
        start_date: Some(date(2025, 1, 1)),
        end_date: Some(date(2025, 2, 1)),
        required_participants: 20,
    };
    let editable = EditableFields {
        start_date: false,
        end_date: true,
        required_participants: true,
    };
    let payload = build_update_payload(&draft, editable);
    assert_eq!(payload.start_date, None);
    assert_eq!(payload.end_date, Some(date(2025, 2, 1)));

    let json = serde_json::to_value(&payload).unwrap();
    assert!(json.get("startDate").is_none());
    assert_eq!(json["endDate"], "2025-02-01");
    assert_eq!(json["requiredParticipants"], 20);
}

#[test]
fn payload_omits_cleared_dates_but_keeps_target() {
    let draft = EditDraft {
        start_date: None,
        end_date: None,
        required_participants: 15,
    };
    let editable = EditableFields::for_survey(&survey(1, SurveyStatus::Draft, 0, &[]));
    let json = serde_json::to_value(build_update_payload(&draft, editable)).unwrap();
    assert_eq!(json, serde_json::json!({ "requiredParticipants": 15 }));
}

#[test]
fn draft_starts_from_survey_values() {
    let mut source = survey(4, SurveyStatus::Active, 0, &[]);
    source.start_date = Some("2025-03-01T00:00:00Z".to_string());
    source.end_date = Some("2025-03-31T23:59:59".to_string());
    source.required_participants = 0;

    let draft = EditDraft::from_survey(&source);
    assert_eq!(draft.start_date, Some(date(2025, 3, 1)));
    assert_eq!(draft.end_date, Some(date(2025, 3, 31)));
    assert_eq!(draft.required_participants, 0);
    assert!(validate_edit_draft(&draft).is_err());
}
