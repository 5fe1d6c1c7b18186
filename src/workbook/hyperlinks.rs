//! Hyperlink targets from the xlsx package
//!
//! calamine reads cell values only, so hyperlinks are resolved from the raw
//! parts: `xl/workbook.xml` maps sheet names to relationship ids, the workbook
//! rels map those to worksheet parts, and each worksheet's `<hyperlinks>`
//! block points at its own rels for the external target.

use crate::error::{LootError, LootResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// External hyperlink targets of one worksheet, keyed by 0-based (row, col)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hyperlinks {
    targets: HashMap<(u32, u32), String>,
}

impl Hyperlinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: u32, col: u32, target: impl Into<String>) {
        self.targets.insert((row, col), target.into());
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&str> {
        self.targets.get(&(row, col)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Relationship {
    target: String,
    external: bool,
}

/// Reader over the xlsx zip package, resolving worksheet parts by sheet name
pub struct PackageReader<R: Read + Seek> {
    archive: ZipArchive<R>,
    sheet_parts: HashMap<String, String>,
}

impl<R: Read + Seek> PackageReader<R> {
    pub fn new(reader: R) -> LootResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let workbook_xml = read_part(&mut archive, WORKBOOK_PART)?
            .ok_or_else(|| LootError::Workbook(format!("missing {}", WORKBOOK_PART)))?;
        let rels_xml = read_part(&mut archive, WORKBOOK_RELS_PART)?
            .ok_or_else(|| LootError::Workbook(format!("missing {}", WORKBOOK_RELS_PART)))?;

        let rels = parse_relationships(&rels_xml)?;
        let mut sheet_parts = HashMap::new();
        for (name, rid) in parse_workbook_sheets(&workbook_xml)? {
            if let Some(rel) = rels.get(&rid) {
                sheet_parts.insert(name, resolve_part("xl/", &rel.target));
            }
        }

        Ok(Self {
            archive,
            sheet_parts,
        })
    }

    /// Hyperlinks of `sheet_name`; empty when the sheet has none
    pub fn sheet_hyperlinks(&mut self, sheet_name: &str) -> LootResult<Hyperlinks> {
        let part = self.sheet_parts.get(sheet_name).cloned().ok_or_else(|| {
            LootError::Workbook(format!("no worksheet part for sheet '{}'", sheet_name))
        })?;

        let sheet_xml = read_part(&mut self.archive, &part)?
            .ok_or_else(|| LootError::Workbook(format!("missing {}", part)))?;
        let refs = parse_hyperlink_refs(&sheet_xml)?;
        if refs.is_empty() {
            return Ok(Hyperlinks::new());
        }

        let rels = match read_part(&mut self.archive, &rels_part_for(&part))? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let mut links = Hyperlinks::new();
        for (reference, rid) in refs {
            // Internal (location-only) links have no target
            let Some(rel) = rid.and_then(|rid| rels.get(&rid)) else {
                continue;
            };
            if !rel.external {
                continue;
            }
            let Some(((r1, c1), (r2, c2))) = parse_range(&reference) else {
                tracing::warn!(sheet = sheet_name, reference = %reference, "unreadable hyperlink ref");
                continue;
            };
            for row in r1..=r2 {
                for col in c1..=c2 {
                    links.insert(row, col, rel.target.clone());
                }
            }
        }
        Ok(links)
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> LootResult<Option<String>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            Ok(Some(content))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`
fn rels_part_for(part: &str) -> String {
    match part.rfind('/') {
        Some(idx) => format!("{}_rels/{}.rels", &part[..=idx], &part[idx + 1..]),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part
fn resolve_part(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}{}", base_dir, target),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn attributes(e: &BytesStart<'_>) -> LootResult<HashMap<Vec<u8>, String>> {
    let mut out = HashMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.to_string();
        out.insert(attr.key.local_name().as_ref().to_vec(), value);
    }
    Ok(out)
}

/// (sheet name, relationship id) pairs in workbook order
fn parse_workbook_sheets(xml: &str) -> LootResult<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                let mut attrs = attributes(&e)?;
                if let (Some(name), Some(rid)) = (
                    attrs.remove(b"name".as_slice()),
                    attrs.remove(b"id".as_slice()),
                ) {
                    sheets.push((name, rid));
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

fn parse_relationships(xml: &str) -> LootResult<HashMap<String, Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut attrs = attributes(&e)?;
                let Some(id) = attrs.remove(b"Id".as_slice()) else {
                    continue;
                };
                let external = attrs
                    .get(b"TargetMode".as_slice())
                    .is_some_and(|mode| mode.eq_ignore_ascii_case("External"));
                let target = attrs.remove(b"Target".as_slice()).unwrap_or_default();
                rels.insert(id, Relationship { target, external });
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// (cell ref, relationship id) of every `<hyperlink>` in a worksheet
fn parse_hyperlink_refs(xml: &str) -> LootResult<Vec<(String, Option<String>)>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut refs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"hyperlink" => {
                let mut attrs = attributes(&e)?;
                if let Some(reference) = attrs.remove(b"ref".as_slice()) {
                    refs.push((reference, attrs.remove(b"id".as_slice())));
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(refs)
}

/// `C3` -> (2, 2), zero-based
fn parse_a1(a1: &str) -> Option<(u32, u32)> {
    let a1 = a1.trim().replace('$', "");
    let split = a1.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = a1.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        col = col.checked_mul(26)? + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

fn parse_range(reference: &str) -> Option<((u32, u32), (u32, u32))> {
    match reference.split_once(':') {
        Some((start, end)) => Some((parse_a1(start)?, parse_a1(end)?)),
        None => {
            let cell = parse_a1(reference)?;
            Some((cell, cell))
        }
    }
}
