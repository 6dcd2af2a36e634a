//! Load-time error type.
//!
//! Everything that can go wrong while reading a scene, its sprite sheets or
//! its entity templates ends up as a [`LoadError`]. Per-frame problems never
//! use this type; they are logged and recovered where they happen.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("layer '{layer}' has {actual} cells, expected {expected}")]
    LayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
    #[error("tileset '{name}' references external file '{source_file}', only embedded tilesets are supported")]
    ExternalTileset { name: String, source_file: String },
    #[error("tileset '{name}' has no image")]
    TilesetWithoutImage { name: String },
    #[error("invalid tile size {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    #[error("map of {width}x{height} tiles of {tile_width}x{tile_height} is too large")]
    MapTooLarge {
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    },
    #[error("sprite '{sprite}' mode '{mode}' uses out of range tile {tile}")]
    InvalidFrameTile {
        sprite: String,
        mode: String,
        tile: u64,
    },
    #[error("no sprite sheets defined in {path}")]
    NoSprites { path: PathBuf },
    #[error("entity template '{template}' references unknown sprite '{sprite}'")]
    UnknownSprite { template: String, sprite: String },
    #[error("texture '{key}' could not be loaded: {reason}")]
    Texture { key: String, reason: String },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        LoadError::Json {
            path: path.into(),
            source,
        }
    }
}
