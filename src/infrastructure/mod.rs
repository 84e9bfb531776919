//! Infrastructure layer providing external service integrations.
//!
//! Page files, configuration, and the system clipboard.

pub mod clipboard;
pub mod config;
pub mod page_loader;

pub use clipboard::*;
pub use config::*;
pub use page_loader::*;
