//! Symbis AI Scan - terminal intake client
//!
//! Collects company intake data through a four-step wizard, submits it to
//! the report-generation service and presents the outcome.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod config;

pub use domain::*;
pub use application::*;
