use anyhow::Context;
use clap::{Parser, Subcommand};
use royalbit_lootgen::cli;
use royalbit_lootgen::config::{
    DEFAULT_FALLBACK, DEFAULT_OUTPUT, DEFAULT_TABLE_NAME, DEFAULT_WORKBOOK,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lootgen")]
#[command(about = "Turn the loot priority spreadsheet into the addon's Lua loot table.")]
#[command(long_about = "Lootgen - Loot priority spreadsheet → Lua loot table

STEPS:
  1. Download the Google sheet as xlsx and save it as sheet.xlsx
  2. Run 'lootgen generate'
  3. Review LootTable.lua; if it looks good, copy it to the root of the addon

COMMANDS:
  generate  - Build LootTable.lua from the workbook
  sheets    - Show which sheets would be processed

Set RUST_LOG=royalbit_lootgen=debug for per-row output.")]
#[command(version)]
struct Cli {
    /// Show per-row progress (same as RUST_LOG=royalbit_lootgen=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the Lua loot table from the workbook.

Every sheet is visited in workbook order. Ignored sheets are skipped, sheets
without a column layout are reported as errors, and every data row of the
remaining sheets is extracted and merged by item id.

Item ids come from the hyperlink on the item name cell (.../item=<id>/...),
falling back to the name → id table when the cell has no usable link.

Rows without an item name or id are reported as errors, rows without prio
text as warnings. Both are skipped, and the output is written regardless.

EXAMPLES:
  lootgen generate
  lootgen generate export.xlsx -o LootTable.lua --config sheets.yaml")]
    /// Build the Lua loot table from the workbook
    Generate {
        /// Path to the workbook (.xlsx)
        #[arg(default_value = DEFAULT_WORKBOOK)]
        workbook: PathBuf,

        /// Output Lua file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Fallback name → item id table (JSON)
        #[arg(short, long, default_value = DEFAULT_FALLBACK, env = "LOOTGEN_FALLBACK")]
        fallback: PathBuf,

        /// YAML file replacing the built-in sheet layout, ignore-list or name overrides
        #[arg(short, long, env = "LOOTGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Name of the global Lua table
        #[arg(long, default_value = DEFAULT_TABLE_NAME)]
        table_name: String,
    },

    /// Show how each sheet in the workbook would be handled
    Sheets {
        /// Path to the workbook (.xlsx)
        #[arg(default_value = DEFAULT_WORKBOOK)]
        workbook: PathBuf,

        /// YAML configuration file
        #[arg(short, long, env = "LOOTGEN_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "royalbit_lootgen=debug"
    } else {
        "royalbit_lootgen=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            workbook,
            output,
            fallback,
            config,
            table_name,
        } => cli::generate(workbook.clone(), output, fallback, config, table_name)
            .with_context(|| format!("generating loot table from {}", workbook.display())),

        Commands::Sheets { workbook, config } => cli::sheets(workbook.clone(), config)
            .with_context(|| format!("reading sheets of {}", workbook.display())),
    }
}
