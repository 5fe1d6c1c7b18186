//! Workbook loader - sheet names, cell values and hyperlink targets

mod hyperlinks;

pub use hyperlinks::{Hyperlinks, PackageReader};

use crate::error::{LootError, LootResult};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Read-only handle on an .xlsx workbook
pub struct LootWorkbook {
    path: PathBuf,
    xlsx: Xlsx<BufReader<File>>,
    package: PackageReader<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl LootWorkbook {
    /// Open the workbook; failure here aborts the run
    pub fn open<P: AsRef<Path>>(path: P) -> LootResult<Self> {
        let path = path.as_ref().to_path_buf();
        let xlsx: Xlsx<_> = open_workbook(&path).map_err(|e| {
            LootError::Workbook(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let package = PackageReader::new(BufReader::new(File::open(&path)?))?;
        let sheet_names = xlsx.sheet_names().to_vec();

        Ok(Self {
            path,
            xlsx,
            package,
            sheet_names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Load a whole sheet: cell values plus hyperlink targets
    pub fn sheet(&mut self, name: &str) -> LootResult<Worksheet> {
        let cells = self
            .xlsx
            .worksheet_range(name)
            .map_err(|e| LootError::Workbook(format!("Failed to read sheet '{}': {}", name, e)))?;
        let hyperlinks = self.package.sheet_hyperlinks(name)?;
        Ok(Worksheet::from_parts(name, cells, hyperlinks))
    }
}

/// One loaded sheet. Row and column indices are absolute (row 0 is the
/// first spreadsheet row) regardless of where the used range starts.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    cells: Range<Data>,
    hyperlinks: Hyperlinks,
}

impl Worksheet {
    pub fn from_parts(name: impl Into<String>, cells: Range<Data>, hyperlinks: Hyperlinks) -> Self {
        Self {
            name: name.into(),
            cells,
            hyperlinks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows up to and including the last used one
    pub fn row_count(&self) -> u32 {
        self.cells.end().map(|(row, _)| row + 1).unwrap_or(0)
    }

    /// Cell rendered as text; empty and error cells are absent
    pub fn cell_text(&self, row: u32, col: u32) -> Option<String> {
        self.cells.get_value((row, col)).and_then(data_to_text)
    }

    /// Cell text only if the cell holds a string
    pub fn cell_string(&self, row: u32, col: u32) -> Option<String> {
        match self.cells.get_value((row, col)) {
            Some(Data::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Hyperlink target of a cell, addressed 1-based like the spreadsheet UI
    pub fn hyperlink(&self, row: u32, column: u32) -> Option<&str> {
        if row == 0 || column == 0 {
            return None;
        }
        self.hyperlinks.get(row - 1, column - 1)
    }
}

fn data_to_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_float(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Integral floats lose their fraction (`45110.0` -> `45110`)
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
