//! Captured video scenes.
//!
//! A scene is a small TOML file pointing at raw dumps taken from a running
//! board (video banks, palette RAM, sprite RAM, sprite graphics) plus the
//! control latch values and an optional list of bus writes to replay before
//! rendering. Relative paths are resolved against the scene file.

use std::path::{Path, PathBuf};

use cloud9_core::{
    bitmap::{BANK_STORAGE_SIZE, WINDOW_BASE, WINDOW_SIZE},
    bus::VideoBus,
    palette::PALETTE_RAM_SIZE,
    registers::ControlLatches,
    snapshot::VideoSnapshot,
    sprites::{SPRITE_RAM_SIZE, SpriteGfx, TILE_BYTES},
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: expected {expected} bytes, found {actual}", .path.display())]
    DumpSize {
        path: PathBuf,
        expected: &'static str,
        actual: usize,
    },

    #[error("{}: sprite gfx length {len} is not a multiple of {}", .path.display(), TILE_BYTES)]
    GfxLength { path: PathBuf, len: usize },
}

/// Control latch values; unset latches keep their power-on value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatchValues {
    pub auto_inc_x: Option<u8>,
    pub auto_inc_y: Option<u8>,
    pub both_banks: Option<u8>,
    pub vram_bank: Option<u8>,
    pub color_bank: Option<u8>,
}

impl LatchValues {
    fn apply(&self, latches: &mut ControlLatches) {
        let fields = [
            (self.auto_inc_x, &mut latches.auto_inc_x),
            (self.auto_inc_y, &mut latches.auto_inc_y),
            (self.both_banks, &mut latches.both_banks),
            (self.vram_bank, &mut latches.vram_bank),
            (self.color_bank, &mut latches.color_bank),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

/// On-disk scene description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub vram0: Option<PathBuf>,
    pub vram1: Option<PathBuf>,
    pub palette: Option<PathBuf>,
    pub sprite_ram: Option<PathBuf>,
    pub sprite_gfx: Option<PathBuf>,
    /// `[address, value]` pairs replayed through the video bus.
    pub writes: Vec<(u32, u8)>,
    pub latches: LatchValues,
}

/// A scene with every dump loaded.
pub struct Scene {
    pub snapshot: VideoSnapshot,
    pub writes: Vec<(u32, u8)>,
    pub sprite_ram: Vec<u8>,
    pub gfx: SpriteGfx,
}

fn read_file(path: &Path) -> Result<Vec<u8>, SceneError> {
    std::fs::read(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Expand a bank dump (window-sized or full storage) to full storage.
fn bank_storage(path: &Path, data: Vec<u8>) -> Result<Vec<u8>, SceneError> {
    match data.len() {
        BANK_STORAGE_SIZE => Ok(data),
        WINDOW_SIZE => {
            let mut storage = vec![0u8; BANK_STORAGE_SIZE];
            storage[WINDOW_BASE..].copy_from_slice(&data);
            Ok(storage)
        }
        actual => Err(SceneError::DumpSize {
            path: path.to_path_buf(),
            expected: "0x3A00 or 0x4000",
            actual,
        }),
    }
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: SceneFile = toml::from_str(&text).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_file(&file, base)
    }

    pub fn from_file(file: &SceneFile, base: &Path) -> Result<Self, SceneError> {
        let resolve = |p: &PathBuf| base.join(p);
        let mut snapshot = VideoSnapshot::default();

        for (bank, dump) in [&file.vram0, &file.vram1].into_iter().enumerate() {
            snapshot.vram[bank] = match dump {
                Some(p) => {
                    let p = resolve(p);
                    let data = read_file(&p)?;
                    debug!("bank {bank}: {} bytes from {}", data.len(), p.display());
                    bank_storage(&p, data)?
                }
                None => vec![0u8; BANK_STORAGE_SIZE],
            };
        }

        snapshot.palette_ram = match &file.palette {
            Some(p) => {
                let p = resolve(p);
                let data = read_file(&p)?;
                if data.len() != PALETTE_RAM_SIZE {
                    return Err(SceneError::DumpSize {
                        path: p,
                        expected: "0x80",
                        actual: data.len(),
                    });
                }
                data
            }
            None => vec![0u8; PALETTE_RAM_SIZE],
        };

        file.latches.apply(&mut snapshot.latches);

        let sprite_ram = match &file.sprite_ram {
            Some(p) => {
                let p = resolve(p);
                let mut data = read_file(&p)?;
                if data.len() < SPRITE_RAM_SIZE {
                    return Err(SceneError::DumpSize {
                        path: p,
                        expected: "at least 0x80",
                        actual: data.len(),
                    });
                }
                data.truncate(SPRITE_RAM_SIZE);
                data
            }
            None => Vec::new(),
        };

        let gfx = match &file.sprite_gfx {
            Some(p) => {
                let p = resolve(p);
                let data = read_file(&p)?;
                if data.len() % TILE_BYTES != 0 {
                    return Err(SceneError::GfxLength {
                        path: p,
                        len: data.len(),
                    });
                }
                SpriteGfx::from_packed(&data)
            }
            None => SpriteGfx::new(),
        };

        info!(
            "scene loaded: {} sprite tiles, {} scripted writes",
            gfx.len(),
            file.writes.len()
        );

        Ok(Self {
            snapshot,
            writes: file.writes.clone(),
            sprite_ram,
            gfx,
        })
    }

    /// Restore the captured state into `bus`, then replay scripted writes.
    pub fn apply(&self, bus: &mut VideoBus) {
        bus.video.restore(&self.snapshot);
        for &(addr, value) in &self.writes {
            if !bus.write_byte(addr, value) {
                warn!("scripted write to unmapped address {addr:05X} ignored");
            }
        }
    }
}
