//! survey-client
//!
//! Boundary to the external survey API. [`service::SurveyService`] is the
//! seam the desk talks to; [`http::HttpSurveyService`] implements it over
//! the REST API.

pub mod error;
pub mod http;
pub mod service;

pub use error::ClientError;
pub use http::HttpSurveyService;
pub use service::SurveyService;
