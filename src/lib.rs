//! Lootgen - loot priority spreadsheet to Lua loot table
//!
//! Reads the priority sheets of an .xlsx workbook, resolves each row's item id
//! (from the name cell's hyperlink, or a fallback name → id table), merges the
//! rows of every sheet by item id and writes one Lua table for the addon.
//!
//! # Example
//!
//! ```no_run
//! use royalbit_lootgen::config::LootConfig;
//! use royalbit_lootgen::fallback::FallbackIds;
//! use royalbit_lootgen::pipeline::process_workbook;
//! use royalbit_lootgen::workbook::LootWorkbook;
//! use royalbit_lootgen::writer::render_loot_table;
//!
//! let config = LootConfig::default();
//! let mut workbook = LootWorkbook::open("sheet.xlsx")?;
//! let mut fallback = FallbackIds::new("backup-loot-table.json");
//!
//! let generation = process_workbook(&mut workbook, &config, &mut fallback)?;
//! println!("Items: {}", generation.table.len());
//! println!("Errors: {}", generation.report.errors.len());
//!
//! let lua = render_loot_table(&generation.table, "lootTable")?;
//! # Ok::<(), royalbit_lootgen::error::LootError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod pipeline;
pub mod table;
pub mod types;
pub mod workbook;
pub mod writer;

// Re-export commonly used types
pub use error::{LootError, LootResult};
pub use table::LootTable;
pub use types::{ItemIds, LootEntry, SheetEntry, SheetSpec};
