//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the intake wizard, loading and result views using
//! ratatui and translates key presses into application actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
