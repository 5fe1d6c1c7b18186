//! End-to-end generation tests against real .xlsx fixtures

use pretty_assertions::assert_eq;
use royalbit_lootgen::cli::run_generate;
use royalbit_lootgen::config::LootConfig;
use royalbit_lootgen::extract::IssueKind;
use royalbit_lootgen::fallback::FallbackIds;
use royalbit_lootgen::pipeline::{process_workbook, SheetStatus};
use royalbit_lootgen::workbook::LootWorkbook;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const NAME_COL: u16 = 2;
const PRIO_COL: u16 = 13;
const NOTES_COL: u16 = 14;

const FALLBACK_JSON: &str = r#"{
    "Bryntroll, the Bone Arbiter": "50415",
    "Val'anyr Hammer Shard": ["45038", "45039"]
}"#;

fn titanguard_link() -> &'static str {
    "https://www.wowhead.com/wotlk/item=45110/titanguard"
}

fn headers(sheet: &mut Worksheet, title: &str) {
    sheet.write_string(0, NAME_COL, title).unwrap();
    sheet.write_string(1, NAME_COL, "Item").unwrap();
    sheet.write_string(1, PRIO_COL, "Prio").unwrap();
    sheet.write_string(1, NOTES_COL, "Notes").unwrap();
}

/// Workbook shaped like the guild export: an ignored intro sheet, the two
/// loot sheets and one sheet nobody configured.
fn build_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sheet.xlsx");
    let mut workbook = Workbook::new();

    let intro = workbook.add_worksheet();
    intro.set_name("Introduction").unwrap();
    intro
        .write_url_with_text(5, NAME_COL, "https://www.wowhead.com/wotlk/item=1/x", "Decoy")
        .unwrap();
    intro.write_string(5, PRIO_COL, "Everyone").unwrap();

    let physical = workbook.add_worksheet();
    physical.set_name("Physical Loot").unwrap();
    headers(physical, "Physical Loot");
    // row 3
    physical
        .write_url_with_text(2, NAME_COL, titanguard_link(), "Titanguard")
        .unwrap();
    physical.write_string(2, PRIO_COL, "Tank").unwrap();
    // row 4: typo, no link -> override + fallback
    physical
        .write_string(3, NAME_COL, "Byrntroll, the Bone Arbiter")
        .unwrap();
    physical
        .write_string(3, PRIO_COL, "Warrior \"MT\" > Death Knight")
        .unwrap();
    physical
        .write_string(3, NOTES_COL, "Check attendance\nbefore awarding")
        .unwrap();
    // row 5: link without an item id, not in fallback
    physical
        .write_url_with_text(4, NAME_COL, "https://www.wowhead.com/wotlk/zone=4273", "Ulduar Token")
        .unwrap();
    physical.write_string(4, PRIO_COL, "Any").unwrap();
    // row 6: no prio
    physical.write_string(5, NAME_COL, "Val'anyr Hammer Shard").unwrap();

    let caster = workbook.add_worksheet();
    caster.set_name("CasterHealer Loot").unwrap();
    headers(caster, "Caster/Healer Loot");
    // row 3: same id as Physical Loot, different spelling
    caster
        .write_url_with_text(2, NAME_COL, titanguard_link(), "Titan Guard")
        .unwrap();
    caster.write_string(2, PRIO_COL, "Paladin").unwrap();
    caster.write_string(2, NOTES_COL, "Holy only").unwrap();
    // row 4: fallback with two ids
    caster.write_string(3, NAME_COL, "Val'anyr Hammer Shard").unwrap();
    caster.write_string(3, PRIO_COL, "Healer").unwrap();

    let schedule = workbook.add_worksheet();
    schedule.set_name("Raid Schedule").unwrap();
    schedule.write_string(2, NAME_COL, "Wednesday").unwrap();

    workbook.save(&path).unwrap();
    path
}

fn write_fallback(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("backup-loot-table.json");
    fs::write(&path, FALLBACK_JSON).unwrap();
    path
}

#[test]
fn test_workbook_lists_sheets_in_order() {
    let dir = TempDir::new().unwrap();
    let workbook = LootWorkbook::open(build_workbook(&dir)).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        &["Introduction", "Physical Loot", "CasterHealer Loot", "Raid Schedule"]
    );
}

#[test]
fn test_workbook_reads_hyperlinks() {
    let dir = TempDir::new().unwrap();
    let mut workbook = LootWorkbook::open(build_workbook(&dir)).unwrap();
    let sheet = workbook.sheet("Physical Loot").unwrap();

    assert_eq!(sheet.hyperlink(3, 3), Some(titanguard_link()));
    assert_eq!(sheet.hyperlink(4, 3), None);
    assert_eq!(sheet.cell_text(2, 2), Some("Titanguard".to_string()));
}

#[test]
fn test_process_workbook_merges_across_sheets() {
    let dir = TempDir::new().unwrap();
    let mut workbook = LootWorkbook::open(build_workbook(&dir)).unwrap();
    let mut fallback = FallbackIds::new(write_fallback(&dir));
    let config = LootConfig::default();

    let generation = process_workbook(&mut workbook, &config, &mut fallback).unwrap();
    let table = &generation.table;

    let ids: Vec<_> = table.iter().map(|e| e.itemid.as_str()).collect();
    assert_eq!(ids, vec!["45110", "50415", "45038", "45039"]);

    let titanguard = table.get("45110").unwrap();
    assert_eq!(titanguard.itemname, "Titanguard");
    let sheets: Vec<_> = titanguard.sheets.iter().map(|s| s.sheet.as_str()).collect();
    assert_eq!(sheets, vec!["Physical Loot", "Caster/Healer Loot"]);
    assert_eq!(titanguard.sheets[0].note, None);
    assert_eq!(titanguard.sheets[1].note.as_deref(), Some("Holy only"));

    let bryntroll = table.get("50415").unwrap();
    assert_eq!(bryntroll.itemname, "Bryntroll, the Bone Arbiter");
    assert_eq!(bryntroll.sheets[0].prio, "Warrior 'MT' > Death Knight");
    assert_eq!(
        bryntroll.sheets[0].note.as_deref(),
        Some("Check attendancebefore awarding")
    );

    // Qualifying rows: Titanguard x2, Bryntroll, Val'anyr (two ids)
    assert_eq!(table.section_count(), 5);
    // Nothing from the ignored sheet
    assert!(table.get("1").is_none());
}

#[test]
fn test_process_workbook_report() {
    let dir = TempDir::new().unwrap();
    let mut workbook = LootWorkbook::open(build_workbook(&dir)).unwrap();
    let mut fallback = FallbackIds::new(write_fallback(&dir));
    let config = LootConfig::default();

    let generation = process_workbook(&mut workbook, &config, &mut fallback).unwrap();
    let report = &generation.report;

    let errors: Vec<_> = report.errors.iter().map(|e| &e.kind).collect();
    assert_eq!(
        errors,
        vec![
            &IssueKind::MissingId {
                name: "Ulduar Token".to_string()
            },
            &IssueKind::MissingSheetSpec,
        ]
    );
    assert_eq!(report.errors[0].row, Some(5));
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        report.warnings[0].kind,
        IssueKind::MissingPrio {
            name: "Val'anyr Hammer Shard".to_string()
        }
    );

    let statuses: Vec<_> = generation.sheets.iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        vec![
            SheetStatus::Ignored,
            SheetStatus::Processed { rows: 4, entries: 2 },
            SheetStatus::Processed { rows: 2, entries: 3 },
            SheetStatus::NoSpec,
        ]
    );
}

#[test]
fn test_missing_fallback_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut workbook = LootWorkbook::open(build_workbook(&dir)).unwrap();
    let mut fallback = FallbackIds::new(dir.path().join("missing.json"));

    let result = process_workbook(&mut workbook, &LootConfig::default(), &mut fallback);
    assert!(result.is_err());
}

#[test]
fn test_generate_output_file() {
    let dir = TempDir::new().unwrap();
    let workbook = build_workbook(&dir);
    let fallback = write_fallback(&dir);
    let output = dir.path().join("LootTable.lua");

    run_generate(&workbook, &output, &fallback, None, "lootTable").unwrap();

    let lua = fs::read_to_string(&output).unwrap();
    let lines: Vec<_> = lua.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "lootTable = {");
    assert_eq!(
        lines[1],
        "{[\"itemid\"] = \"45110\", [\"itemname\"] = \"Titanguard\", [\"sections\"] = \
         {{[\"sheet\"] = \"Physical Loot\", [\"prio\"] = \"Tank\"},\
         {[\"sheet\"] = \"Caster/Healer Loot\", [\"prio\"] = \"Paladin\", [\"note\"] = \"Holy only\"},}},"
    );
    assert_eq!(
        lines[2],
        "{[\"itemid\"] = \"50415\", [\"itemname\"] = \"Bryntroll, the Bone Arbiter\", [\"sections\"] = \
         {{[\"sheet\"] = \"Physical Loot\", [\"prio\"] = \"Warrior 'MT' > Death Knight\", \
         [\"note\"] = \"Check attendancebefore awarding\"},}},"
    );
    assert!(lines[3].starts_with("{[\"itemid\"] = \"45038\", [\"itemname\"] = \"Val'anyr Hammer Shard\""));
    assert!(lines[4].starts_with("{[\"itemid\"] = \"45039\""));
    assert_eq!(lines[5], "}");
}

#[test]
fn test_generate_with_config_ignoring_everything() {
    let dir = TempDir::new().unwrap();
    let workbook = build_workbook(&dir);
    let config = dir.path().join("lootgen.yaml");
    fs::write(
        &config,
        "ignore_sheets: [Introduction, Physical Loot, CasterHealer Loot, Raid Schedule]\nsheets: {}\n",
    )
    .unwrap();
    let output = dir.path().join("LootTable.lua");

    // No sheet is processed, so the fallback file is never opened
    let generation = run_generate(
        &workbook,
        &output,
        &dir.path().join("missing.json"),
        Some(config.as_path()),
        "LootPrio",
    )
    .unwrap();

    assert!(generation.table.is_empty());
    assert!(generation.report.is_clean());
    assert_eq!(fs::read_to_string(&output).unwrap(), "LootPrio = {\n}\n");
}
