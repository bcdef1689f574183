use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid date: {input:?}")]
    InvalidDate { input: String },

    #[error("unknown survey status: {0}")]
    UnknownStatus(String),

    #[error("unknown target gender: {0}")]
    UnknownGender(String),
}
