use std::collections::HashSet;
use std::path::Path;

use crate::error::{AppError, Result};

/// Ordered, read-only list of tracked item identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    ids: Vec<String>,
}

impl Catalog {
    /// Blank identifiers are dropped; a repeated identifier keeps its first slot.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .map(|s| s.into().trim().to_string())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { ids }
    }

    /// Load a catalog from a JSON array of strings.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Catalog(format!("cannot read {}: {e}", path.display())))?;
        let ids: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            AppError::Catalog(format!("{} is not a JSON array of strings: {e}", path.display()))
        })?;
        Ok(Self::new(ids))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
