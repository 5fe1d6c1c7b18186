//! Fallback item ids, for name cells that carry no hyperlink
//!
//! The file is a JSON object mapping canonical item names to one id or a list
//! of ids (items that share a name across difficulties):
//!
//! ```json
//! { "Titanguard": "45110", "Val'anyr Hammer Shard": ["45038", "45039"] }
//! ```

use crate::error::{LootError, LootResult};
use crate::types::ItemIds;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Text(String),
    Number(u64),
}

impl IdValue {
    fn into_string(self) -> String {
        match self {
            IdValue::Text(s) => s,
            IdValue::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FallbackValue {
    One(IdValue),
    Many(Vec<IdValue>),
}

/// Name -> id(s) table
#[derive(Debug, Clone, Default)]
pub struct FallbackTable {
    entries: HashMap<String, FallbackValue>,
}

impl FallbackTable {
    pub fn from_json(content: &str) -> LootResult<Self> {
        let entries: HashMap<String, FallbackValue> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> LootResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LootError::Config(format!(
                "Failed to open fallback id table {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> ItemIds {
        match self.entries.get(name) {
            Some(FallbackValue::One(id)) => ItemIds::One(id.clone().into_string()),
            Some(FallbackValue::Many(ids)) if !ids.is_empty() => {
                ItemIds::Many(ids.iter().cloned().map(IdValue::into_string).collect())
            }
            _ => ItemIds::NoId,
        }
    }
}

/// Fallback table read from disk on first use
#[derive(Debug)]
pub struct FallbackIds {
    path: PathBuf,
    table: Option<FallbackTable>,
}

impl FallbackIds {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: None,
        }
    }

    /// Already-loaded table (no file access)
    pub fn preloaded(table: FallbackTable) -> Self {
        Self {
            path: PathBuf::new(),
            table: Some(table),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    /// Look up `name`, loading the file if this is the first lookup
    pub fn lookup(&mut self, name: &str) -> LootResult<ItemIds> {
        if self.table.is_none() {
            tracing::debug!(path = %self.path.display(), "loading fallback id table");
            self.table = Some(FallbackTable::load(&self.path)?);
        }
        Ok(self
            .table
            .as_ref()
            .map(|table| table.lookup(name))
            .unwrap_or(ItemIds::NoId))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = r#"{
        "Titanguard": "45110",
        "Val'anyr Hammer Shard": ["45038", "45039"],
        "Mjolnir Runestone": 45506,
        "Empty Entry": []
    }"#;

    #[test]
    fn test_lookup_single_and_many() {
        let table = FallbackTable::from_json(TABLE).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.lookup("Titanguard"), ItemIds::One("45110".to_string()));
        assert_eq!(
            table.lookup("Val'anyr Hammer Shard"),
            ItemIds::Many(vec!["45038".to_string(), "45039".to_string()])
        );
    }

    #[test]
    fn test_lookup_numeric_id() {
        let table = FallbackTable::from_json(TABLE).unwrap();
        assert_eq!(
            table.lookup("Mjolnir Runestone"),
            ItemIds::One("45506".to_string())
        );
    }

    #[test]
    fn test_lookup_missing_and_empty() {
        let table = FallbackTable::from_json(TABLE).unwrap();
        assert_eq!(table.lookup("Unknown Item"), ItemIds::NoId);
        assert_eq!(table.lookup("Empty Entry"), ItemIds::NoId);
    }

    #[test]
    fn test_invalid_json() {
        let result = FallbackTable::from_json("[1, 2, 3]");
        assert!(matches!(result, Err(LootError::Json(_))));
    }

    #[test]
    fn test_lazy_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let mut ids = FallbackIds::new(file.path());
        assert!(!ids.is_loaded());
        assert_eq!(
            ids.lookup("Titanguard").unwrap(),
            ItemIds::One("45110".to_string())
        );
        assert!(ids.is_loaded());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut ids = FallbackIds::new("/nonexistent/backup-loot-table.json");
        assert!(matches!(ids.lookup("Titanguard"), Err(LootError::Config(_))));
    }
}
