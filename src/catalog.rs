use std::collections::HashMap;
use std::path::Path;

use crate::error::CatalogError;

/// Translates user-facing labels. Passed explicitly to everything that builds
/// display strings.
pub trait Catalog: Send + Sync {
    fn translate(&self, msgid: &str) -> String;
}

/// Returns every message id unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl Catalog for EnglishCatalog {
    fn translate(&self, msgid: &str) -> String {
        msgid.to_string()
    }
}

/// Message ids mapped to translations, loaded from a flat JSON object.
/// Ids without an entry fall back to themselves.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    messages: HashMap<String, String>,
}

impl JsonCatalog {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path)?;
        let messages: HashMap<String, String> = serde_json::from_slice(&bytes)?;
        tracing::info!("Loaded {} catalog messages from {}", messages.len(), path.display());
        Ok(Self { messages })
    }
}

impl Catalog for JsonCatalog {
    fn translate(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }
}
