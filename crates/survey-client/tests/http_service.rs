use assert_matches::assert_matches;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};
use survey_auth::session::{Role, Session};
use survey_client::{ClientError, HttpSurveyService, SurveyService};
use survey_core::quick_edit::PartialUpdate;

fn survey_json(id: i64, status: &str) -> Value {
    json!({
        "surveyId": id,
        "title": format!("Survey {id}"),
        "status": status,
        "currentParticipants": 0,
        "requiredParticipants": 10,
        "targetGender": "all",
        "targetAcademicYears": [1],
        "targetDepartmentIds": []
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer test-token")
}

async fn all_surveys(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "missing token" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!([survey_json(1, "draft"), survey_json(2, "active")])),
    )
}

async fn admin_surveys() -> Json<Value> {
    Json(json!({ "data": [survey_json(5, "inactive")] }))
}

async fn update_dates(Path(id): Path<i64>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "survey not found" })),
        );
    }
    let mut survey = survey_json(id, "active");
    survey["requiredParticipants"] = body["requiredParticipants"].clone();
    if let Some(end) = body.get("endDate") {
        survey["endDate"] = end.clone();
    }
    survey["echo"] = body;
    (StatusCode::OK, Json(json!({ "data": survey })))
}

async fn spawn_api() -> String {
    let app = Router::new()
        .route("/surveys", get(all_surveys))
        .route("/surveys/admin", get(admin_surveys))
        .route("/surveys/{id}/dates", patch(update_dates));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn session(role: Role) -> Session {
    Session::new("42", role, "test-token")
}

#[tokio::test]
async fn lists_all_surveys_with_bearer_token() {
    let service = HttpSurveyService::new(spawn_api().await);
    let surveys = service.all_surveys(&session(Role::Admin)).await.unwrap();
    assert_eq!(
        surveys.iter().map(|s| s.survey_id).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[tokio::test]
async fn unwraps_data_envelope_for_owned_surveys() {
    let service = HttpSurveyService::new(spawn_api().await);
    let surveys = service.my_surveys(&session(Role::Admin)).await.unwrap();
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0].survey_id, 5);
}

#[tokio::test]
async fn students_have_no_owned_list() {
    let service = HttpSurveyService::new(spawn_api().await);
    let result = service.my_surveys(&session(Role::Student)).await;
    assert_matches!(result, Err(ClientError::Forbidden(_)));
}

#[tokio::test]
async fn server_message_is_surfaced_on_failure() {
    let service = HttpSurveyService::new(spawn_api().await);
    let anonymous = Session::new("42", Role::Admin, "wrong");
    let err = service.all_surveys(&anonymous).await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 401, .. });
    assert_eq!(err.server_message(), Some("missing token"));
}

#[tokio::test]
async fn update_sends_only_present_keys() {
    let service = HttpSurveyService::new(spawn_api().await);
    let update = PartialUpdate {
        start_date: None,
        end_date: Some(jiff::civil::date(2025, 7, 1)),
        required_participants: 25,
    };
    let survey = service
        .update_survey_dates(&session(Role::Teacher), 9, &update)
        .await
        .unwrap();

    assert_eq!(survey.survey_id, 9);
    assert_eq!(survey.required_participants, 25);
    assert_eq!(survey.end_date.as_deref(), Some("2025-07-01"));
    let echo = &survey.extra["echo"];
    assert!(echo.get("startDate").is_none());
}

#[tokio::test]
async fn update_failure_carries_error_field() {
    let service = HttpSurveyService::new(spawn_api().await);
    let update = PartialUpdate {
        start_date: None,
        end_date: None,
        required_participants: 1,
    };
    let err = service
        .update_survey_dates(&session(Role::Admin), 404, &update)
        .await
        .unwrap_err();
    assert_matches!(err, ClientError::Api { status: 404, .. });
    assert_eq!(err.server_message(), Some("survey not found"));
}
