use anyhow::Result;
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::Path;

pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Converts a premultiplied pixmap into a straight-alpha RGBA image.
pub fn pixmap_to_image(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
