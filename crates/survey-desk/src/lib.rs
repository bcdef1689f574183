//! survey-desk library root.
//!
//! The survey management board and its configuration, exposed so the binary
//! and integration tests drive the same code.

pub mod board;
pub mod config;
pub mod error;
pub mod notice;
