//! Application layer managing state and the submission workflow.
//!
//! This module coordinates between the domain layer and presentation layer,
//! owning the view state machine and running submissions in the background.

pub mod state;
pub mod dispatch;

pub use state::*;
pub use dispatch::*;
