use crate::domain::PageSpec;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid page format - {0}")]
    Format(#[from] serde_json::Error),
}

pub struct PageRepository;

impl PageRepository {
    /// Reads a JSON page definition.
    pub fn load_page(path: &Path) -> Result<PageSpec, PageError> {
        let content = fs::read_to_string(path)?;
        let page: PageSpec = serde_json::from_str(&content)?;
        info!(path = %path.display(), nodes = page.body.len(), "page loaded");
        Ok(page)
    }

    /// Loads `path` when given, otherwise the built-in demo page.
    pub fn load_or_demo(path: Option<&Path>) -> Result<PageSpec, PageError> {
        match path {
            Some(path) => Self::load_page(path),
            None => Ok(PageSpec::demo()?),
        }
    }
}
