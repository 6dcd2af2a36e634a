//! Sprite sheet registry.
//!
//! Sprite sheets are immutable once loaded and shared between every entity
//! spawned from them through an `Arc`. Per-entity playback state lives in the
//! [`Sprite`](crate::components::sprite::Sprite) component instead.
//!
//! # Configuration Format
//!
//! ```json
//! [
//!   {
//!     "name": "hero",
//!     "texture": "hero.png",
//!     "tile_width": 16,
//!     "tile_height": 24,
//!     "modes": [
//!       { "name": "idle", "default": true, "frames": [[0, 300], [1, 300]] },
//!       { "name": "run", "frames": [[2, 100], [3, 100], [4, 100]] },
//!       { "name": "fall", "frames": [[5, 200]] }
//!     ]
//!   }
//! ]
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::animation::{AnimationFrame, ClipDef};
use crate::error::LoadError;

/// Raw clip definition as read from the sprite configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeDef {
    pub name: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default = "default_looped")]
    pub looped: bool,
    /// `[tile, duration_ms]` pairs.
    pub frames: Vec<[u64; 2]>,
}

fn default_looped() -> bool {
    true
}

/// Raw sprite sheet definition as read from the sprite configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteDef {
    pub name: String,
    pub texture: Option<String>,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Atlas columns; derived from the texture width at draw time when absent.
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub modes: Vec<ModeDef>,
}

/// Immutable sprite sheet shared by all entities that use it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub name: String,
    /// Texture key; `None` means nothing can be drawn.
    pub texture: Option<String>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: Option<u32>,
    pub modes: FxHashMap<String, ClipDef>,
    pub default_mode: Option<String>,
}

impl SpriteSheet {
    /// Build a sheet without any animation mode (a static sprite).
    pub fn new(
        name: impl Into<String>,
        texture: Option<String>,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        Self {
            name: name.into(),
            texture,
            frame_width,
            frame_height,
            columns: None,
            modes: FxHashMap::default(),
            default_mode: None,
        }
    }

    /// Add a mode. The first mode added, or any flagged `default`, becomes the default.
    pub fn with_mode(mut self, name: impl Into<String>, clip: ClipDef, default: bool) -> Self {
        let name = name.into();
        if default || self.default_mode.is_none() {
            self.default_mode = Some(name.clone());
        }
        self.modes.insert(name, clip);
        self
    }

    /// Convert a raw definition. `texture_dir` is joined to relative texture paths.
    pub fn from_def(def: SpriteDef, texture_dir: &Path) -> Result<Self, LoadError> {
        let texture = def
            .texture
            .map(|t| texture_dir.join(t).to_string_lossy().into_owned());
        let mut sheet = SpriteSheet::new(def.name, texture, def.tile_width, def.tile_height);
        sheet.columns = def.columns;

        let mut explicit_default = None;
        for mode in def.modes {
            let frames = mode
                .frames
                .iter()
                .map(|&[tile, ms]| {
                    u32::try_from(tile)
                        .map(|tile| AnimationFrame::new(tile, ms))
                        .map_err(|_| LoadError::InvalidFrameTile {
                            sprite: sheet.name.clone(),
                            mode: mode.name.clone(),
                            tile,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if frames.is_empty() {
                warn!(
                    "Sprite '{}' mode '{}' has no frames, it will render nothing",
                    sheet.name, mode.name
                );
            }
            if mode.default {
                explicit_default = Some(mode.name.clone());
            }
            sheet = sheet.with_mode(mode.name, ClipDef::new(frames, mode.looped), false);
        }
        if explicit_default.is_some() {
            sheet.default_mode = explicit_default;
        }
        Ok(sheet)
    }

    pub fn clip(&self, name: &str) -> Option<&ClipDef> {
        self.modes.get(name)
    }

    /// Atlas columns, using the atlas width when the sheet does not set them.
    pub fn columns_for_atlas(&self, atlas_width: Option<i32>) -> u32 {
        let derived = atlas_width
            .filter(|_| self.frame_width > 0)
            .map(|w| (w.max(0) as u32) / self.frame_width);
        self.columns.or(derived).unwrap_or(1).max(1)
    }
}

/// Registry of loaded sprite sheets by name.
#[derive(Resource, Debug, Default)]
pub struct SpriteStore {
    pub map: FxHashMap<String, Arc<SpriteSheet>>,
}

impl SpriteStore {
    pub fn new() -> Self {
        SpriteStore {
            map: FxHashMap::default(),
        }
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<Arc<SpriteSheet>> {
        self.map.get(key.as_ref()).cloned()
    }

    pub fn insert(&mut self, sheet: SpriteSheet) {
        self.map.insert(sheet.name.clone(), Arc::new(sheet));
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Texture keys referenced by the loaded sheets.
    pub fn texture_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .map
            .values()
            .filter_map(|s| s.texture.clone())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Parse the JSON sprite configuration.
    pub fn from_json(json: &str, texture_dir: &Path, path: &Path) -> Result<Self, LoadError> {
        let defs: Vec<SpriteDef> =
            serde_json::from_str(json).map_err(|e| LoadError::json(path, e))?;
        if defs.is_empty() {
            return Err(LoadError::NoSprites {
                path: path.to_path_buf(),
            });
        }
        let mut store = SpriteStore::new();
        for def in defs {
            store.insert(SpriteSheet::from_def(def, texture_dir)?);
        }
        Ok(store)
    }

    /// Load the sprite configuration from disk. Missing file is an error.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let store = Self::from_json(&json, dir, path)?;
        info!("Loaded {} sprite sheets from {}", store.len(), path.display());
        Ok(store)
    }
}
