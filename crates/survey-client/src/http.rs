//! REST implementation of [`SurveyService`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET /surveys`: all surveys visible to the caller
//! - `GET /surveys/admin`, `GET /surveys/teacher`: the caller's own surveys
//! - `PATCH /surveys/{id}/dates`: partial date/target update

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use survey_auth::session::{Role, Session};
use survey_core::models::Survey;
use survey_core::quick_edit::PartialUpdate;

use crate::error::ClientError;
use crate::service::SurveyService;

/// HTTP client for the survey API.
#[derive(Debug, Clone)]
pub struct HttpSurveyService {
    client: reqwest::Client,
    base_url: String,
}

/// The API wraps some payloads as `{"data": ...}` and returns others bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpSurveyService {
    /// * `base_url` - API root, e.g. `https://surveys.uni.example/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Client with a per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn owned_surveys_path(role: Role) -> Result<&'static str, ClientError> {
        match role {
            Role::Admin => Ok("/surveys/admin"),
            Role::Teacher => Ok("/surveys/teacher"),
            Role::Student => Err(ClientError::Forbidden(
                "students do not own surveys".to_string(),
            )),
        }
    }

    async fn get_list(&self, session: &Session, path: &str) -> Result<Vec<Survey>, ClientError> {
        debug!(path, user = %session.user_id, "fetching surveys");
        let response = self
            .client
            .get(self.url(path))
            .header(reqwest::header::AUTHORIZATION, session.bearer())
            .send()
            .await?;

        let surveys: Vec<Survey> = Self::parse_response(response).await?;
        debug!(path, count = surveys.len(), "surveys fetched");
        Ok(surveys)
    }

    // ---- private helpers ----

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), %message, "survey API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.into_inner())
    }
}

/// Pull a human-readable message out of an error body, falling back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .unwrap_or_else(|| body.trim().to_string())
}

impl SurveyService for HttpSurveyService {
    async fn all_surveys(&self, session: &Session) -> Result<Vec<Survey>, ClientError> {
        self.get_list(session, "/surveys").await
    }

    async fn my_surveys(&self, session: &Session) -> Result<Vec<Survey>, ClientError> {
        let path = Self::owned_surveys_path(session.role)?;
        self.get_list(session, path).await
    }

    async fn update_survey_dates(
        &self,
        session: &Session,
        survey_id: i64,
        update: &PartialUpdate,
    ) -> Result<Survey, ClientError> {
        debug!(survey_id, ?update, "updating survey dates");
        let response = self
            .client
            .patch(self.url(&format!("/surveys/{survey_id}/dates")))
            .header(reqwest::header::AUTHORIZATION, session.bearer())
            .json(update)
            .send()
            .await?;

        Self::parse_response(response).await
    }
}
