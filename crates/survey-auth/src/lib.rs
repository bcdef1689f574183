//! survey-auth
//!
//! Signed-in identity for the survey desk. A [`session::Session`] is built
//! once from the bearer token and passed explicitly to everything that needs
//! the user's role or credentials.

pub mod error;
pub mod jwt;
pub mod session;
