//! Presentation layer handling terminal UI and user input.
//!
//! Renders the form document with ratatui and maps key presses to
//! application operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
