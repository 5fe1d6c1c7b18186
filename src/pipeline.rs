//! One pass over the workbook: load, extract, merge

use crate::config::{LootConfig, SheetDisposition};
use crate::error::LootResult;
use crate::extract::{Extractor, Issue, IssueKind, Report, RowOutcome};
use crate::fallback::FallbackIds;
use crate::table::LootTable;
use crate::types::SheetSpec;
use crate::workbook::{LootWorkbook, Worksheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStatus {
    Ignored,
    NoSpec,
    Processed { rows: usize, entries: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub name: String,
    pub status: SheetStatus,
}

/// Everything one run produces
#[derive(Debug, Default)]
pub struct Generation {
    pub table: LootTable,
    pub report: Report,
    pub sheets: Vec<SheetSummary>,
}

/// Walk every sheet in workbook order. Row-level problems land in the
/// report; only loader and fallback-table failures are returned.
pub fn process_workbook(
    workbook: &mut LootWorkbook,
    config: &LootConfig,
    fallback: &mut FallbackIds,
) -> LootResult<Generation> {
    let mut generation = Generation::default();
    let mut extractor = Extractor::new(config, fallback)?;
    let sheet_names = workbook.sheet_names().to_vec();

    for name in sheet_names {
        tracing::info!(sheet = %name, "processing sheet");

        let status = match config.disposition(&name) {
            SheetDisposition::Ignored => {
                tracing::info!(sheet = %name, "ignoring");
                SheetStatus::Ignored
            }
            SheetDisposition::NoSpec => {
                generation.report.record(Issue {
                    sheet: name.clone(),
                    row: None,
                    kind: IssueKind::MissingSheetSpec,
                });
                SheetStatus::NoSpec
            }
            SheetDisposition::Process(spec) => {
                let sheet = workbook.sheet(&name)?;
                let (rows, entries) = process_sheet(
                    &sheet,
                    spec,
                    &mut extractor,
                    &mut generation.table,
                    &mut generation.report,
                )?;
                SheetStatus::Processed { rows, entries }
            }
        };

        generation.sheets.push(SheetSummary { name, status });
    }

    Ok(generation)
}

/// Feed every data row of `sheet` through the extractor into `table`.
/// Returns (data rows seen, entries merged).
pub fn process_sheet(
    sheet: &Worksheet,
    spec: &SheetSpec,
    extractor: &mut Extractor<'_>,
    table: &mut LootTable,
    report: &mut Report,
) -> LootResult<(usize, usize)> {
    let mut rows = 0;
    let mut merged = 0;

    for row in (0..sheet.row_count()).filter(|r| !spec.is_header_row(*r)) {
        rows += 1;
        tracing::debug!(sheet = sheet.name(), row = row + 1, "row");

        match extractor.extract_row(sheet, spec, row)? {
            RowOutcome::Entries(entries) => {
                merged += entries.len();
                for entry in entries {
                    table.merge(entry);
                }
            }
            RowOutcome::Skipped(issue) => report.record(issue),
        }
    }

    tracing::info!(sheet = sheet.name(), rows, entries = merged, "sheet done");
    Ok((rows, merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FallbackTable;
    use crate::workbook::Hyperlinks;
    use calamine::{Data, Range};
    use pretty_assertions::assert_eq;

    fn physical_loot() -> Worksheet {
        let mut range = Range::new((0, 0), (5, 14));
        range.set_value((0, 2), Data::String("Physical Loot".to_string()));
        range.set_value((1, 2), Data::String("Item".to_string()));
        range.set_value((1, 13), Data::String("Prio".to_string()));

        let mut links = Hyperlinks::new();
        // row 3: hyperlinked
        range.set_value((2, 2), Data::String("Titanguard".to_string()));
        range.set_value((2, 13), Data::String("Tank".to_string()));
        links.insert(2, 2, "https://www.wowhead.com/wotlk/item=45110/titanguard");
        // row 4: fallback, two ids
        range.set_value((3, 2), Data::String("Val'anyr Hammer Shard".to_string()));
        range.set_value((3, 13), Data::String("Healer".to_string()));
        // row 5: empty row
        // row 6: no prio
        range.set_value((5, 2), Data::String("Titanguard".to_string()));
        links.insert(5, 2, "https://www.wowhead.com/wotlk/item=45110/titanguard");

        Worksheet::from_parts("Physical Loot", range, links)
    }

    #[test]
    fn test_process_sheet_counts_and_report() {
        let config = LootConfig::default();
        let mut fallback = FallbackIds::preloaded(
            FallbackTable::from_json(r#"{"Val'anyr Hammer Shard": ["45038", "45039"]}"#).unwrap(),
        );
        let mut extractor = Extractor::new(&config, &mut fallback).unwrap();
        let mut table = LootTable::new();
        let mut report = Report::new();
        let sheet = physical_loot();
        let spec = config.sheets["Physical Loot"].clone();

        let (rows, merged) =
            process_sheet(&sheet, &spec, &mut extractor, &mut table, &mut report).unwrap();

        assert_eq!(rows, 4);
        assert_eq!(merged, 3);
        let ids: Vec<_> = table.iter().map(|e| e.itemid.as_str()).collect();
        assert_eq!(ids, vec!["45110", "45038", "45039"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, IssueKind::MissingName);
        assert_eq!(report.errors[0].row, Some(5));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(table.section_count(), 3);
    }
}
