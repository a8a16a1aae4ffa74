use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputScale {
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    #[default]
    X2,
    #[serde(rename = "3x")]
    X3,
    #[serde(rename = "4x")]
    X4,
}

impl OutputScale {
    pub fn factor(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X3 => 3,
            Self::X4 => 4,
        }
    }

    pub fn from_factor(factor: u32) -> Option<Self> {
        match factor {
            1 => Some(Self::X1),
            2 => Some(Self::X2),
            3 => Some(Self::X3),
            4 => Some(Self::X4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub scale: OutputScale,
    /// Where screenshots go when `--output` is not given.
    pub output_dir: Option<PathBuf>,
    pub frames: u32,
    /// Rows of the 256-line raster written to PNGs, starting at the top.
    pub visible_rows: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: OutputScale::default(),
            output_dir: None,
            frames: 1,
            visible_rows: 256,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("cloud9").join("render.toml");
        }
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("cloud9").join("render.toml");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("cloud9")
            .join("render.toml");
    }

    PathBuf::from("render.toml")
}

pub fn load_from_file(path: &Path) -> RenderConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return RenderConfig::default(),
    };

    match toml::from_str::<RenderConfig>(&text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(
                "Failed to parse render config {}: {e}; using defaults",
                path.display()
            );
            RenderConfig::default()
        }
    }
}

pub fn save_to_file(path: &Path, cfg: &RenderConfig) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let text = toml::to_string_pretty(cfg).unwrap_or_else(|_| String::new());
    std::fs::write(path, text)?;
    info!("Saved render config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_from_file(&dir.path().join("absent.toml"));
        assert_eq!(cfg, RenderConfig::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "scale = [").unwrap();
        assert_eq!(load_from_file(&path), RenderConfig::default());
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("render.toml");
        let cfg = RenderConfig {
            scale: OutputScale::X3,
            output_dir: Some(PathBuf::from("shots")),
            frames: 4,
            visible_rows: 232,
        };
        save_to_file(&path, &cfg).unwrap();
        assert_eq!(load_from_file(&path), cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.toml");
        std::fs::write(&path, "scale = \"4x\"\n").unwrap();
        let cfg = load_from_file(&path);
        assert_eq!(cfg.scale, OutputScale::X4);
        assert_eq!(cfg.frames, 1);
    }
}
