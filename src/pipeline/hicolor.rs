// Renders one SVG application icon into a freedesktop hicolor theme tree

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use super::fs_ops::{copy_file, ensure_dir};
use super::png_writer::{pixmap_to_image, write_png};

pub const HICOLOR_SIZES: &[u32] = &[
    16, 22, 24, 32, 36, 44, 48, 64, 72, 96, 128, 150, 192, 256, 310, 512,
];

/// `<root>/<size>x<size>/apps`
pub fn size_dir(output_root: &Path, size: u32) -> PathBuf {
    output_root.join(format!("{}x{}", size, size)).join("apps")
}

/// `<root>/scalable/apps`
pub fn scalable_dir(output_root: &Path) -> PathBuf {
    output_root.join("scalable").join("apps")
}

pub fn icon_name(svg_path: &Path) -> Result<&str> {
    svg_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Invalid icon file name: {}", svg_path.display()))
}

pub fn load_svg(svg_path: &Path) -> Result<usvg::Tree> {
    let data = fs::read(svg_path)
        .with_context(|| format!("Failed to read {}", svg_path.display()))?;
    usvg::Tree::from_data(&data, &usvg::Options::default())
        .with_context(|| format!("Failed to parse SVG {}", svg_path.display()))
}

/// Renders `tree` stretched to exactly `size` x `size` pixels.
pub fn render_square(tree: &usvg::Tree, size: u32) -> Result<tiny_skia::Pixmap> {
    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| anyhow!("Failed to create {}x{} pixmap", size, size))?;

    let svg_size = tree.size();
    let scale_x = size as f32 / svg_size.width();
    let scale_y = size as f32 / svg_size.height();
    let transform = tiny_skia::Transform::from_scale(scale_x, scale_y);

    resvg::render(tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

pub fn build_hicolor_set<F>(
    svg_path: &Path,
    output_root: &Path,
    sizes: &[u32],
    mut log_fn: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(String),
{
    if let Some(bad) = sizes.iter().find(|&&s| s == 0) {
        return Err(anyhow!("Invalid icon size {}", bad));
    }

    let name = icon_name(svg_path)?;
    let tree = load_svg(svg_path)?;

    let mut written = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let dir = size_dir(output_root, size);
        ensure_dir(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let pixmap = render_square(&tree, size)?;
        let png_path = dir.join(format!("{}.png", name));
        write_png(&pixmap_to_image(&pixmap), &png_path)
            .with_context(|| format!("Failed to write {}", png_path.display()))?;

        log_fn(format!("Rendered {}x{} -> {}", size, size, png_path.display()));
        written.push(png_path);
    }

    let scalable = scalable_dir(output_root).join(format!("{}.svg", name));
    copy_file(svg_path, &scalable)?;
    log_fn(format!("Copied scalable icon -> {}", scalable.display()));

    Ok(written)
}
