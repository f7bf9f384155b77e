// Runs the asset build steps in order: hicolor set, raw RGBA dump, icon font

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::{BuildPaths, Config};
use crate::model::glyph::GlyphCatalog;
use crate::pipeline::{hicolor, iconfont, rgba};

#[derive(Clone, Debug)]
pub struct BuildReport {
    pub pngs: Vec<PathBuf>,
    pub rgba_dimensions: (u32, u32),
    pub catalog: GlyphCatalog,
}

pub fn run_build<F>(config: &Config, asset_dir: &Path, mut log_fn: F) -> Result<BuildReport>
where
    F: FnMut(String),
{
    config.validate()?;
    let paths = config.resolve(asset_dir)?;
    run_with_paths(&paths, &config.sizes, &config.font_name, &mut log_fn)
}

pub fn run_with_paths<F>(
    paths: &BuildPaths,
    sizes: &[u32],
    font_name: &str,
    mut log_fn: F,
) -> Result<BuildReport>
where
    F: FnMut(String),
{
    log_fn(format!(
        "Building hicolor icons from {}",
        paths.app_icon.display()
    ));
    let pngs = hicolor::build_hicolor_set(&paths.app_icon, &paths.hicolor_dir, sizes, &mut log_fn)
        .context("Hicolor icon set failed")?;

    let rgba_dimensions = rgba::build_rgba(&paths.rgba_source, &paths.rgba_output)
        .context("RGBA extraction failed")?;
    log_fn(format!(
        "Wrote {}x{} RGBA pixels -> {}",
        rgba_dimensions.0,
        rgba_dimensions.1,
        paths.rgba_output.display()
    ));

    log_fn(format!("Packaging icon font from {}", paths.icons_dir.display()));
    let catalog = iconfont::build_icons_font(
        &paths.icons_dir,
        &paths.font_output,
        &paths.source_output,
        font_name,
        &mut log_fn,
    )
    .context("Icon font build failed")?;

    Ok(BuildReport {
        pngs,
        rgba_dimensions,
        catalog,
    })
}
