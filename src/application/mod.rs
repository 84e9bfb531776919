//! Application layer managing state and user workflows.
//!
//! This module sits between the domain layer and the presentation layer,
//! turning key-level intents into document events.

pub mod state;

pub use state::*;
