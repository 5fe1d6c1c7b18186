//! Static configuration: sheet allow-list, ignore-list and name overrides
//!
//! Defaults are compiled in. A YAML file can replace any of the three tables:
//!
//! ```yaml
//! ignore_sheets: [Introduction]
//! sheets:
//!   Physical Loot:
//!     alias: Physical Loot
//!     header_row_count: 1
//!     item_name_column: 2
//!     priority_column: 13
//!     notes_column: 14
//! name_overrides:
//!   "Byrntroll, the Bone Arbiter": "Bryntroll, the Bone Arbiter"
//! ```

use crate::error::{LootError, LootResult};
use crate::types::SheetSpec;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

pub const DEFAULT_WORKBOOK: &str = "sheet.xlsx";
pub const DEFAULT_OUTPUT: &str = "LootTable.lua";
pub const DEFAULT_FALLBACK: &str = "backup-loot-table.json";
pub const DEFAULT_TABLE_NAME: &str = "lootTable";

const IGNORE_SHEETS: &[&str] = &[
    "Introduction",
    "Physical BIS Lists",
    "Caster BIS Lists",
    "Healer BIS Lists",
    "Tank BIS Lists",
    "Fusion Streams",
];

// Typos in the spreadsheet
const NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Byrntroll, the Bone Arbiter", "Bryntroll, the Bone Arbiter"),
    ("Bulwark of Smoldering Steel", "Bulwark of Smouldering Steel"),
    ("Leather Stitched Scourge Parts", "Leather of Stitched Scourge Parts"),
    (
        "Bloodsurge, Kel'thuzad's Blade of Agony",
        "Bloodsurge, Kel'Thuzad's Blade of Agony",
    ),
    ("Devium's Eternall Cold Ring", "Devium's Eternally Cold Ring"),
    ("Binding of the WInd Seeker", "Bindings of the Windseeker"),
    ("Fireguard Spaulders", "Fireguard Shoulders"),
    ("Onyxia Tooth Pendant (Onyxia's Head)", "Onyxia Tooth Pendant"),
    ("Fire Runed Grimiore", "Fire Runed Grimoire"),
    ("Ancient Cornerstone Grimiore", "Ancient Cornerstone Grimoire"),
    ("Dragonslayer's Signet (Head of Ony)", "Dragonslayer's Signet"),
];

/// What happens to a sheet when the workbook is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetDisposition<'a> {
    Ignored,
    Process(&'a SheetSpec),
    NoSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootConfig {
    pub ignore_sheets: Vec<String>,
    pub sheets: BTreeMap<String, SheetSpec>,
    pub name_overrides: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    ignore_sheets: Option<Vec<String>>,
    sheets: Option<BTreeMap<String, SheetSpec>>,
    name_overrides: Option<HashMap<String, String>>,
}

impl Default for LootConfig {
    fn default() -> Self {
        // Columns C (name), N (prio), O (notes); first two rows are headers
        let mut sheets = BTreeMap::new();
        sheets.insert(
            "Physical Loot".to_string(),
            SheetSpec::new("Physical Loot", 1, 2, 13, 14),
        );
        sheets.insert(
            "CasterHealer Loot".to_string(),
            SheetSpec::new("Caster/Healer Loot", 1, 2, 13, 14),
        );

        Self {
            ignore_sheets: IGNORE_SHEETS.iter().map(|s| s.to_string()).collect(),
            sheets,
            name_overrides: NAME_OVERRIDES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl LootConfig {
    /// Load the defaults, replacing any table present in the YAML file at `path`
    pub fn load(path: &Path) -> LootResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> LootResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let mut config = Self::default();

        if let Some(ignore_sheets) = file.ignore_sheets {
            config.ignore_sheets = ignore_sheets;
        }
        if let Some(sheets) = file.sheets {
            config.sheets = sheets;
        }
        if let Some(name_overrides) = file.name_overrides {
            config.name_overrides = name_overrides;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> LootResult<()> {
        for (name, spec) in &self.sheets {
            if spec.alias.trim().is_empty() {
                return Err(LootError::Config(format!("sheet '{}' has an empty alias", name)));
            }
            if self.ignore_sheets.contains(name) {
                return Err(LootError::Config(format!(
                    "sheet '{}' is both ignored and configured",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn disposition(&self, sheet_name: &str) -> SheetDisposition<'_> {
        if self.ignore_sheets.iter().any(|s| s == sheet_name) {
            return SheetDisposition::Ignored;
        }
        match self.sheets.get(sheet_name) {
            Some(spec) => SheetDisposition::Process(spec),
            None => SheetDisposition::NoSpec,
        }
    }

    /// Canonical spelling of `name`, if it is a known typo
    pub fn override_name(&self, name: &str) -> Option<&str> {
        self.name_overrides.get(name).map(String::as_str)
    }
}
