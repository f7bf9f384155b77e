use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::hicolor::{HICOLOR_SIZES, icon_name, size_dir};

pub const CONFIG_FILE_NAME: &str = "assets.toml";

/// Asset build settings. Relative paths are resolved against the asset directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app_icon: PathBuf,
    pub hicolor_dir: PathBuf,
    pub sizes: Vec<u32>,
    pub rgba_size: u32,
    pub rgba_output: PathBuf,
    pub icons_dir: PathBuf,
    pub font_output: PathBuf,
    pub source_output: PathBuf,
    pub font_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_icon: PathBuf::from("akron.svg"),
            hicolor_dir: PathBuf::from("hicolor"),
            sizes: HICOLOR_SIZES.to_vec(),
            rgba_size: 64,
            rgba_output: PathBuf::from("akron.rgba"),
            icons_dir: PathBuf::from("icons"),
            font_output: PathBuf::from("icons.ttf"),
            source_output: PathBuf::from("icons.rs"),
            font_name: "icons".to_string(),
        }
    }
}

/// Absolute locations of every build input and output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildPaths {
    pub app_icon: PathBuf,
    pub hicolor_dir: PathBuf,
    pub rgba_source: PathBuf,
    pub rgba_output: PathBuf,
    pub icons_dir: PathBuf,
    pub font_output: PathBuf,
    pub source_output: PathBuf,
}

impl Config {
    /// Reads `<asset_dir>/assets.toml` when present, defaults otherwise.
    pub fn load(asset_dir: &Path) -> Result<Self> {
        let path = asset_dir.join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sizes.contains(&0) {
            return Err(anyhow!("Icon sizes must be non-zero"));
        }
        if !self.sizes.contains(&self.rgba_size) {
            return Err(anyhow!(
                "rgba_size {} is not one of the rendered sizes {:?}",
                self.rgba_size,
                self.sizes
            ));
        }
        if self.font_name.trim().is_empty() {
            return Err(anyhow!("font_name cannot be empty"));
        }
        Ok(())
    }

    pub fn resolve(&self, asset_dir: &Path) -> Result<BuildPaths> {
        let hicolor_dir = asset_dir.join(&self.hicolor_dir);
        let name = icon_name(&self.app_icon)?;
        let rgba_source = size_dir(&hicolor_dir, self.rgba_size).join(format!("{}.png", name));

        Ok(BuildPaths {
            app_icon: asset_dir.join(&self.app_icon),
            hicolor_dir,
            rgba_source,
            rgba_output: asset_dir.join(&self.rgba_output),
            icons_dir: asset_dir.join(&self.icons_dir),
            font_output: asset_dir.join(&self.font_output),
            source_output: asset_dir.join(&self.source_output),
        })
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
