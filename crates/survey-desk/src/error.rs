use thiserror::Error;

use survey_auth::session::Role;
use survey_client::ClientError;
use survey_core::quick_edit::FieldErrors;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("invalid edit: {0}")]
    Validation(#[from] FieldErrors),

    #[error("survey update failed: {0}")]
    UpdateFailed(#[source] ClientError),

    #[error("loading surveys failed: {0}")]
    FetchFailed(#[source] ClientError),

    #[error("survey {0} is not in the current list")]
    SurveyNotFound(i64),

    #[error("no quick-edit dialog is open")]
    NoDialog,

    #[error("a save is already in progress")]
    SaveInFlight,

    #[error("role {0} cannot manage surveys")]
    NotPermitted(Role),
}
