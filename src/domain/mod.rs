pub mod document;
pub mod models;
pub mod parser;
pub mod services;
pub mod errors;

pub use document::*;
pub use models::*;
pub use services::*;
pub use errors::*;
