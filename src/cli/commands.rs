use crate::config::{LootConfig, SheetDisposition};
use crate::error::LootResult;
use crate::extract::Report;
use crate::fallback::FallbackIds;
use crate::pipeline::{self, Generation, SheetStatus};
use crate::workbook::LootWorkbook;
use crate::writer;
use colored::Colorize;
use std::path::{Path, PathBuf};

fn load_config(config: Option<&Path>) -> LootResult<LootConfig> {
    match config {
        Some(path) => LootConfig::load(path),
        None => Ok(LootConfig::default()),
    }
}

/// Read the workbook, merge every sheet and write the Lua table.
/// The output is written even when nothing was collected.
pub fn run_generate(
    workbook: &Path,
    output: &Path,
    fallback: &Path,
    config: Option<&Path>,
    table_name: &str,
) -> LootResult<Generation> {
    let config = load_config(config)?;
    let mut book = LootWorkbook::open(workbook)?;
    let mut fallback = FallbackIds::new(fallback);

    let generation = pipeline::process_workbook(&mut book, &config, &mut fallback)?;

    tracing::info!(output = %output.display(), items = generation.table.len(), "writing loot table");
    writer::write_loot_table(output, &generation.table, table_name)?;
    Ok(generation)
}

/// Summary lines: warnings first, then errors
fn summary_lines(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.warnings.is_empty() {
        lines.push("Warnings encountered:".to_string());
        lines.extend(report.warnings.iter().map(|w| format!("WARNING: {}", w)));
    }
    if !report.errors.is_empty() {
        lines.push("Errors encountered:".to_string());
        lines.extend(report.errors.iter().map(|e| format!("ERROR: {}", e)));
    }
    lines
}

/// Execute the generate command
pub fn generate(
    workbook: PathBuf,
    output: PathBuf,
    fallback: PathBuf,
    config: Option<PathBuf>,
    table_name: String,
) -> LootResult<()> {
    println!("{}", "🔥 Lootgen - Generating loot table".bold().green());
    println!("   Workbook: {}", workbook.display());
    println!("   Output:   {}\n", output.display());

    let generation = run_generate(
        &workbook,
        &output,
        &fallback,
        config.as_deref(),
        &table_name,
    )?;

    for sheet in &generation.sheets {
        match sheet.status {
            SheetStatus::Ignored => {
                println!("   ⏭️  {} {}", sheet.name, "(ignored)".dimmed());
            }
            SheetStatus::NoSpec => {
                println!("   ❌ {} {}", sheet.name, "(no sheet spec)".red());
            }
            SheetStatus::Processed { rows, entries } => {
                println!(
                    "   📊 {}: {} rows, {} entries",
                    sheet.name.bright_blue(),
                    rows,
                    entries
                );
            }
        }
    }
    println!();

    println!("{}", "✅ Done!".bold().green());
    println!(
        "   {} items, {} sections → {}\n",
        generation.table.len(),
        generation.table.section_count(),
        output.display()
    );

    let report = &generation.report;
    for line in summary_lines(report) {
        if line.starts_with("WARNING") {
            println!("{}", line.yellow());
        } else if line.starts_with("ERROR") {
            println!("{}", line.red());
        } else {
            println!("{}", line.bold());
        }
    }
    if report.is_clean() {
        println!("{}", "No warnings or errors.".green());
    }

    Ok(())
}

/// Execute the sheets command
pub fn sheets(workbook: PathBuf, config: Option<PathBuf>) -> LootResult<()> {
    let config = load_config(config.as_deref())?;
    let book = LootWorkbook::open(&workbook)?;

    println!("{}", "📖 Lootgen - Workbook sheets".bold().green());
    println!("   Workbook: {}\n", book.path().display());

    for line in sheet_lines(&config, book.sheet_names()) {
        println!("   {}", line);
    }
    Ok(())
}

fn sheet_lines(config: &LootConfig, names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| match config.disposition(name) {
            SheetDisposition::Ignored => format!("{} - ignored", name),
            SheetDisposition::NoSpec => format!("{} - no sheet spec", name),
            SheetDisposition::Process(spec) => format!("{} - processed as '{}'", name, spec.alias),
        })
        .collect()
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
