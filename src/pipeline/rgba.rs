// Raw RGBA8 dump of a raster image: no header, row-major, straight alpha

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::fs_ops::ensure_parent;

/// Decodes `image_path`, writes its RGBA8 bytes to `rgba_path` and returns the
/// image dimensions, which the consumer has to know out of band.
pub fn build_rgba(image_path: &Path, rgba_path: &Path) -> Result<(u32, u32)> {
    let image = image::open(image_path)
        .with_context(|| format!("Failed to decode {}", image_path.display()))?
        .to_rgba8();
    let dimensions = image.dimensions();

    ensure_parent(rgba_path)
        .with_context(|| format!("Failed to create directory for {}", rgba_path.display()))?;
    fs::write(rgba_path, image.into_raw())
        .with_context(|| format!("Failed to write {}", rgba_path.display()))?;

    Ok(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_buffer_is_width_height_four() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("icon.png");
        let mut img = RgbaImage::new(5, 3);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(4, 2, Rgba([9, 8, 7, 6]));
        img.save(&png).unwrap();

        let out = dir.path().join("icon.rgba");
        let dims = build_rgba(&png, &out).unwrap();
        assert_eq!(dims, (5, 3));

        let data = fs::read(&out).unwrap();
        assert_eq!(data.len(), 5 * 3 * 4);
        assert_eq!(&data[0..4], &[1, 2, 3, 4]);
        assert_eq!(&data[data.len() - 4..], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_rgb_input_gets_opaque_alpha() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("rgb.png");
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        img.save(&png).unwrap();

        let out = dir.path().join("rgb.rgba");
        build_rgba(&png, &out).unwrap();

        let data = fs::read(&out).unwrap();
        assert_eq!(data.len(), 16);
        assert_eq!(&data[4..8], &[10, 20, 30, 255]);
        assert!(data.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("one.png");
        RgbaImage::new(1, 1).save(&png).unwrap();

        let out = dir.path().join("one.rgba");
        fs::write(&out, vec![0xAA; 64]).unwrap();

        build_rgba(&png, &out).unwrap();
        assert_eq!(fs::read(&out).unwrap().len(), 4);
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempdir().unwrap();
        let result = build_rgba(&dir.path().join("nope.png"), &dir.path().join("out.rgba"));
        assert!(result.is_err());
    }
}
