//! survey-core
//!
//! Pure survey domain: the survey record as served by the survey API, the
//! list filter engine, summary metrics and the quick-edit policy.
//! No HTTP dependency, this is the shared vocabulary of the survey desk.

pub mod error;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod quick_edit;
