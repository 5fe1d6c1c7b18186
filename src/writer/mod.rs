//! Lua table writer
//!
//! Output layout, one item per line:
//!
//! ```text
//! lootTable = {
//! {["itemid"] = "45110", ["itemname"] = "Titanguard", ["sections"] = {{["sheet"] = "Physical Loot", ["prio"] = "Tank"},}},
//! }
//! ```

use crate::error::{LootError, LootResult};
use crate::table::LootTable;
use crate::types::{LootEntry, SheetEntry};
use std::fs;
use std::path::Path;

/// Appends Lua literal fragments; all quoting goes through [`LuaWriter::string`]
#[derive(Debug, Default)]
pub struct LuaWriter {
    out: String,
}

impl LuaWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&mut self, fragment: &str) -> &mut Self {
        self.out.push_str(fragment);
        self
    }

    /// Double-quoted string literal with Lua escapes
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.out.push('"');
        for ch in value.chars() {
            match ch {
                '\\' => self.out.push_str("\\\\"),
                '"' => self.out.push_str("\\\""),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if c.is_control() && (c as u32) < 0x80 => {
                    self.out.push_str(&format!("\\{:03}", c as u32));
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
        self
    }

    /// `["key"] = "value"`
    pub fn field(&mut self, key: &str, value: &str) -> &mut Self {
        self.raw("[").string(key).raw("] = ").string(value)
    }

    /// `["key"] = ` ahead of a nested table
    pub fn key(&mut self, key: &str) -> &mut Self {
        self.raw("[").string(key).raw("] = ")
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// True if `name` can be used as a global Lua variable name
pub fn is_lua_identifier(name: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if",
        "in", "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
    ];
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !KEYWORDS.contains(&name)
}

fn write_section(w: &mut LuaWriter, section: &SheetEntry) {
    w.raw("{").field("sheet", &section.sheet);
    w.raw(", ").field("prio", &section.prio);
    if let Some(note) = &section.note {
        w.raw(", ").field("note", note);
    }
    w.raw("},");
}

fn write_item(w: &mut LuaWriter, entry: &LootEntry) {
    w.raw("{").field("itemid", &entry.itemid);
    w.raw(", ").field("itemname", &entry.itemname);
    w.raw(", ").key("sections").raw("{");
    for section in &entry.sheets {
        write_section(w, section);
    }
    w.raw("}},\n");
}

/// Render the whole table as `<table_name> = { ... }`
pub fn render_loot_table(table: &LootTable, table_name: &str) -> LootResult<String> {
    if !is_lua_identifier(table_name) {
        return Err(LootError::Config(format!(
            "'{}' is not a valid Lua identifier",
            table_name
        )));
    }

    let mut w = LuaWriter::new();
    w.raw(table_name).raw(" = {\n");
    for entry in table.iter() {
        write_item(&mut w, entry);
    }
    w.raw("}\n");
    Ok(w.finish())
}

pub fn write_loot_table(path: &Path, table: &LootTable, table_name: &str) -> LootResult<()> {
    let lua = render_loot_table(table, table_name)?;
    fs::write(path, lua)?;
    Ok(())
}
