use serde::{Deserialize, Serialize};

//==============================================================================
// Sheet Layout
//==============================================================================

/// Column layout of one processed sheet (all indices zero-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    /// Display label written to the output (`sheet` key of each section)
    pub alias: String,
    /// Rows with index <= this value are header rows and are skipped
    pub header_row_count: u32,
    pub item_name_column: u32,
    pub priority_column: u32,
    pub notes_column: u32,
}

impl SheetSpec {
    pub fn new(
        alias: impl Into<String>,
        header_row_count: u32,
        item_name_column: u32,
        priority_column: u32,
        notes_column: u32,
    ) -> Self {
        Self {
            alias: alias.into(),
            header_row_count,
            item_name_column,
            priority_column,
            notes_column,
        }
    }

    /// True if `row` (0-based, absolute) belongs to the header block
    pub fn is_header_row(&self, row: u32) -> bool {
        row <= self.header_row_count
    }
}

//==============================================================================
// Extraction Records
//==============================================================================

/// Cell values pulled from one data row, before any validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub item_name: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
    pub hyperlink: Option<String>,
}

/// Item identifier(s) resolved for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemIds {
    One(String),
    Many(Vec<String>),
    NoId,
}

impl ItemIds {
    pub fn is_none(&self) -> bool {
        match self {
            ItemIds::NoId => true,
            ItemIds::Many(ids) => ids.is_empty(),
            ItemIds::One(_) => false,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            ItemIds::One(id) => vec![id],
            ItemIds::Many(ids) => ids,
            ItemIds::NoId => Vec::new(),
        }
    }
}

impl std::fmt::Display for ItemIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemIds::One(id) => write!(f, "{}", id),
            ItemIds::Many(ids) => write!(f, "[{}]", ids.join(", ")),
            ItemIds::NoId => write!(f, "none"),
        }
    }
}

/// One (sheet, prio, note) occurrence of an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub sheet: String,
    pub prio: String,
    pub note: Option<String>,
}

impl SheetEntry {
    /// Build an entry, replacing `"` in the priority text with `'`
    pub fn new(sheet: impl Into<String>, prio: &str, note: Option<String>) -> Self {
        Self {
            sheet: sheet.into(),
            prio: prio.replace('"', "'"),
            note,
        }
    }
}

/// An item and every sheet it appears on, in processing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootEntry {
    pub itemid: String,
    pub itemname: String,
    pub sheets: Vec<SheetEntry>,
}

impl LootEntry {
    pub fn new(itemid: impl Into<String>, itemname: impl Into<String>, sheet: SheetEntry) -> Self {
        Self {
            itemid: itemid.into(),
            itemname: itemname.into(),
            sheets: vec![sheet],
        }
    }
}
