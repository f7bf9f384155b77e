// Glyph directory scanning and glyph name derivation

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::model::glyph::GlyphCatalog;

pub const GLYPH_EXTENSION: &str = "svg";

/// Title-cases a word: a letter is upper-cased when it does not follow
/// another letter and lower-cased when it does.
pub fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for c in word.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// `arrow-left` -> `ArrowLeft`
pub fn glyph_name(stem: &str) -> String {
    stem.split('-').map(title_case).collect()
}

/// Non-recursive listing of the glyph files in `dir`, sorted by file name.
pub fn scan_glyph_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("Glyph directory {} does not exist", dir.display()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || is_hidden(path) {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == GLYPH_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Assigns code points to `files` in order; rejects names that collide or are empty.
pub fn build_catalog(files: &[PathBuf]) -> Result<GlyphCatalog> {
    let mut catalog = GlyphCatalog::new();
    let mut seen: HashMap<String, &Path> = HashMap::new();

    for path in files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid glyph file name: {}", path.display()))?;

        let name = glyph_name(stem);
        if name.is_empty() {
            return Err(anyhow!("Glyph file {} has an empty name", path.display()));
        }
        if let Some(previous) = seen.insert(name.clone(), path) {
            return Err(anyhow!(
                "Glyph name {} is produced by both {} and {}",
                name,
                previous.display(),
                path.display()
            ));
        }

        catalog.push(name, path.clone());
    }

    Ok(catalog)
}

pub fn catalog_from_dir(dir: &Path) -> Result<GlyphCatalog> {
    build_catalog(&scan_glyph_dir(dir)?)
}
