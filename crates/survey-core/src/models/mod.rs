pub mod gender;
pub mod status;
pub mod survey;

pub use gender::TargetGender;
pub use status::SurveyStatus;
pub use survey::Survey;
