// Rust source exposing the icon font handle and an `Icon` enum over its glyphs

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::model::glyph::GlyphCatalog;
use crate::pipeline::fs_ops::ensure_parent;

pub const ENUM_NAME: &str = "Icon";

pub fn generate_source(font_name: &str, catalog: &GlyphCatalog) -> String {
    let mut src = format!(
        "pub const FONT: iced::Font = iced::Font::with_name({:?});\n",
        font_name
    );

    src.push_str(&format!("pub enum {} {{\n", ENUM_NAME));
    for entry in catalog.iter() {
        src.push_str(&format!("    {},\n", entry.name));
    }
    src.push_str("}\n");

    src.push_str(&format!("impl {} {{\n", ENUM_NAME));
    src.push_str("    pub fn as_char(&self) -> char {\n");
    src.push_str("        match self {\n");
    for entry in catalog.iter() {
        src.push_str(&format!(
            "            {}::{} => '\\u{{{:04X}}}',\n",
            ENUM_NAME, entry.name, entry.code_point
        ));
    }
    src.push_str("        }\n");
    src.push_str("    }\n");
    src.push_str("}\n");

    src
}

pub fn write_source(path: &Path, font_name: &str, catalog: &GlyphCatalog) -> Result<()> {
    ensure_parent(path)
        .with_context(|| format!("Failed to create directory for {}", path.display()))?;
    fs::write(path, generate_source(font_name, catalog))
        .with_context(|| format!("Failed to write {}", path.display()))
}
