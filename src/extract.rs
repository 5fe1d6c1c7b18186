//! Row extraction: name, item id(s), prio and notes for one sheet row

use crate::config::LootConfig;
use crate::error::{LootError, LootResult};
use crate::fallback::FallbackIds;
use crate::types::{ItemIds, LootEntry, RawRow, SheetEntry, SheetSpec};
use crate::workbook::Worksheet;
use regex::Regex;
use std::fmt;

//==============================================================================
// Issues
//==============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingSheetSpec,
    MissingName,
    MissingId { name: String },
    MissingPrio { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A skipped sheet or row, kept for the end-of-run summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub sheet: String,
    /// 1-based spreadsheet row, absent for sheet-level issues
    pub row: Option<u32>,
    pub kind: IssueKind,
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self.kind {
            IssueKind::MissingPrio { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match self.row {
            Some(row) => format!("sheet: {}, row: {}", self.sheet, row),
            None => format!("sheet: {}", self.sheet),
        };
        match &self.kind {
            IssueKind::MissingSheetSpec => {
                write!(f, "No sheet spec for sheet {}. Skipping.", self.sheet)
            }
            IssueKind::MissingName => {
                write!(f, "Unable to extract item name ({}). Skipping.", location)
            }
            IssueKind::MissingId { name } => {
                write!(f, "Unable to extract item id for {} ({}). Skipping.", name, location)
            }
            IssueKind::MissingPrio { name } => {
                write!(f, "No prio text for item {} ({}). Skipping.", name, location)
            }
        }
    }
}

/// Warnings and errors accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub warnings: Vec<Issue>,
    pub errors: Vec<Issue>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, issue: Issue) {
        match issue.severity() {
            Severity::Warning => {
                tracing::warn!("{}", issue);
                self.warnings.push(issue);
            }
            Severity::Error => {
                tracing::error!("{}", issue);
                self.errors.push(issue);
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

//==============================================================================
// Extraction
//==============================================================================

/// Result of processing one data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// One entry per resolved item id
    Entries(Vec<LootEntry>),
    Skipped(Issue),
}

pub struct Extractor<'a> {
    config: &'a LootConfig,
    fallback: &'a mut FallbackIds,
    item_link: Regex,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a LootConfig, fallback: &'a mut FallbackIds) -> LootResult<Self> {
        // Links look like https://www.wowhead.com/wotlk/item=45110/titanguard
        let item_link = Regex::new(r"^\S+/item=(\d+)")
            .map_err(|e| LootError::Config(format!("Regex error: {}", e)))?;
        Ok(Self {
            config,
            fallback,
            item_link,
        })
    }

    /// Item id embedded in a hyperlink target, if it has one
    pub fn item_id_from_link(&self, link: &str) -> Option<String> {
        self.item_link
            .captures(link)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Pull the configured cells of `row` (0-based) without validating them
    pub fn read_row(&self, sheet: &Worksheet, spec: &SheetSpec, row: u32) -> RawRow {
        RawRow {
            item_name: sheet.cell_text(row, spec.item_name_column),
            priority: sheet.cell_text(row, spec.priority_column),
            notes: sheet
                .cell_string(row, spec.notes_column)
                .map(|notes| strip_newlines(&notes))
                .filter(|notes| !notes.is_empty()),
            hyperlink: sheet
                .hyperlink(row + 1, spec.item_name_column + 1)
                .map(str::to_string),
        }
    }

    /// Resolve ids from the hyperlink, falling back to the name table
    pub fn resolve_ids(&mut self, name: &str, hyperlink: Option<&str>) -> LootResult<ItemIds> {
        if let Some(link) = hyperlink {
            tracing::debug!(link, "item link");
            if let Some(id) = self.item_id_from_link(link) {
                return Ok(ItemIds::One(id));
            }
            tracing::debug!(link, "link carries no item id");
        }
        tracing::debug!(name, "looking up item id in fallback table");
        self.fallback.lookup(name)
    }

    /// Process one data row. Only fatal conditions (fallback table
    /// unreadable) are returned as errors.
    pub fn extract_row(
        &mut self,
        sheet: &Worksheet,
        spec: &SheetSpec,
        row: u32,
    ) -> LootResult<RowOutcome> {
        let raw = self.read_row(sheet, spec, row);
        let issue = |kind: IssueKind| Issue {
            sheet: sheet.name().to_string(),
            row: Some(row + 1),
            kind,
        };

        let name = match raw.item_name {
            Some(name) => match self.config.override_name(&name) {
                Some(canonical) => {
                    tracing::info!(from = %name, to = canonical, "overriding item name");
                    canonical.to_string()
                }
                None => name,
            },
            None => return Ok(RowOutcome::Skipped(issue(IssueKind::MissingName))),
        };

        let ids = self.resolve_ids(&name, raw.hyperlink.as_deref())?;

        tracing::debug!(
            row = row + 1,
            name = %name,
            ids = %ids,
            prio = raw.priority.as_deref().unwrap_or(""),
            notes = raw.notes.as_deref().unwrap_or(""),
            "row"
        );

        if ids.is_none() {
            return Ok(RowOutcome::Skipped(issue(IssueKind::MissingId { name })));
        }

        let Some(prio) = raw.priority else {
            return Ok(RowOutcome::Skipped(issue(IssueKind::MissingPrio { name })));
        };

        let section = SheetEntry::new(spec.alias.clone(), &prio, raw.notes);
        let entries = ids
            .into_vec()
            .into_iter()
            .map(|id| LootEntry::new(id, name.clone(), section.clone()))
            .collect();
        Ok(RowOutcome::Entries(entries))
    }
}

/// Collapse multi-line text onto one line
pub fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
