//! Merged loot table, keyed by item id in first-seen order

use crate::types::LootEntry;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LootTable {
    entries: Vec<LootEntry>,
    index: HashMap<String, usize>,
}

impl LootTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new item, or append the entry's section to the existing one.
    /// The first-seen item name is kept.
    pub fn merge(&mut self, entry: LootEntry) {
        match self.index.get(&entry.itemid) {
            Some(&pos) => {
                let existing = &mut self.entries[pos];
                if existing.itemname != entry.itemname {
                    tracing::debug!(
                        itemid = %entry.itemid,
                        kept = %existing.itemname,
                        seen = %entry.itemname,
                        "item id seen under another name"
                    );
                }
                existing.sheets.extend(entry.sheets);
            }
            None => {
                self.index.insert(entry.itemid.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, itemid: &str) -> Option<&LootEntry> {
        self.index.get(itemid).map(|&pos| &self.entries[pos])
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &LootEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of sections across all items
    pub fn section_count(&self) -> usize {
        self.entries.iter().map(|e| e.sheets.len()).sum()
    }
}
