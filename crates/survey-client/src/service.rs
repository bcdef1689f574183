use std::future::Future;

use survey_auth::session::Session;
use survey_core::models::Survey;
use survey_core::quick_edit::PartialUpdate;

use crate::error::ClientError;

/// Survey operations the management views consume from the survey API.
pub trait SurveyService: Send + Sync {
    /// Every survey visible to the session's role.
    fn all_surveys(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Vec<Survey>, ClientError>> + Send;

    /// Surveys owned by the session's user.
    fn my_surveys(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Vec<Survey>, ClientError>> + Send;

    /// Apply a partial date/target update. Keys absent from `update` are left
    /// unchanged by the server.
    fn update_survey_dates(
        &self,
        session: &Session,
        survey_id: i64,
        update: &PartialUpdate,
    ) -> impl Future<Output = Result<Survey, ClientError>> + Send;
}
