// SVG glyph directory to TrueType icon font plus generated Rust bindings

pub mod codegen;
pub mod glyph_name;
pub mod outline;
pub mod tables;

use anyhow::{Context, Result};
use kurbo::BezPath;
use std::fs;
use std::path::Path;

use crate::model::glyph::GlyphCatalog;
use crate::pipeline::fs_ops::ensure_parent;

pub use glyph_name::{catalog_from_dir, glyph_name};
pub use tables::{FontInfo, Glyph};

pub const UNITS_PER_EM: u16 = 1000;
pub const ASCENT: i16 = 800;
pub const DESCENT: i16 = 200;
pub const GLYPH_ADVANCE: u16 = 1000;

/// Font under construction. Glyph 0 is always `.notdef`.
#[derive(Clone, Debug)]
pub struct IconFont {
    info: FontInfo,
    glyphs: Vec<Glyph>,
}

impl IconFont {
    pub fn new(font_name: &str) -> Self {
        Self {
            info: FontInfo {
                family_name: font_name.to_string(),
                full_name: font_name.to_string(),
                postscript_name: postscript_name(font_name),
                units_per_em: UNITS_PER_EM,
                ascent: ASCENT,
                descent: DESCENT,
            },
            glyphs: vec![Glyph {
                code_point: None,
                advance_width: GLYPH_ADVANCE,
                outline: BezPath::new(),
            }],
        }
    }

    pub fn info(&self) -> &FontInfo {
        &self.info
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn add_glyph(&mut self, code_point: u32, outline: BezPath) {
        self.glyphs.push(Glyph {
            code_point: Some(code_point),
            advance_width: GLYPH_ADVANCE,
            outline,
        });
    }

    pub fn import_svg(&mut self, code_point: u32, svg_path: &Path) -> Result<()> {
        let outline =
            outline::import_outlines(svg_path, self.info.units_per_em, self.info.ascent)?;
        self.add_glyph(code_point, outline);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        tables::to_ttf(&self.info, &self.glyphs)
    }

    pub fn generate(&self, font_path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        ensure_parent(font_path)
            .with_context(|| format!("Failed to create directory for {}", font_path.display()))?;
        fs::write(font_path, bytes)
            .with_context(|| format!("Failed to write {}", font_path.display()))
    }
}

/// PostScript names are printable ASCII without spaces or delimiters, at most 63 chars.
pub fn postscript_name(font_name: &str) -> String {
    let name: String = font_name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .take(63)
        .collect();
    if name.is_empty() {
        "Untitled".to_string()
    } else {
        name
    }
}

pub fn build_icons_font<F>(
    icons_dir: &Path,
    font_path: &Path,
    rs_path: &Path,
    font_name: &str,
    mut log_fn: F,
) -> Result<GlyphCatalog>
where
    F: FnMut(String),
{
    let catalog = catalog_from_dir(icons_dir)?;
    let mut font = IconFont::new(font_name);

    for entry in catalog.iter() {
        font.import_svg(entry.code_point, &entry.source)?;
        log_fn(format!(
            "Imported {} as {} (U+{:04X})",
            entry.source.display(),
            entry.name,
            entry.code_point
        ));
    }

    codegen::write_source(rs_path, font_name, &catalog)?;
    log_fn(format!(
        "Wrote {} glyph bindings -> {}",
        catalog.len(),
        rs_path.display()
    ));

    font.generate(font_path)?;
    log_fn(format!("Generated font -> {}", font_path.display()));

    Ok(catalog)
}
