//! tforms - live formula forms in the terminal
//!
//! A page of labelled inputs whose formula fields recompute on every edit,
//! including a course-row GPA calculator.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
