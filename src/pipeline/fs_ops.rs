use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn ensure_dir<P: AsRef<Path>>(p: P) -> std::io::Result<()> {
    if !p.as_ref().exists() {
        fs::create_dir_all(&p)?;
    }
    Ok(())
}

pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Copies `src` to `dst` byte for byte, replacing whatever is at `dst`.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    ensure_parent(dst)
        .with_context(|| format!("Failed to create directory for {}", dst.display()))?;
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))
}
