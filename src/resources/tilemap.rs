//! Tiled map loading.
//!
//! Reads the subset of the Tiled JSON format the engine understands and turns
//! it into a [`Scene`] plus the list of objects to spawn into it:
//!
//! - `tilelayer` layers named `background`, `terrain`, `objects`,
//!   `collision` or `foreground`
//! - `imagelayer` layers named `s_background2`, `s_background` or
//!   `s_foreground`, with an optional `parallaxx` factor
//! - `objectgroup` layers; each object whose `type` (or `class`) names an
//!   entity template becomes a [`SpawnRequest`]
//! - embedded tilesets only
//!
//! Anything else is logged and skipped. Image paths are relative to the map.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::resources::scene::{
    ParallaxLayer, ParallaxSlot, Scene, TileCell, TileLayerKind, Tileset,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TiledMap {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TiledTileset {
    pub firstgid: u32,
    #[serde(default)]
    pub name: String,
    /// Set for external `.tsj` tilesets, which are not supported.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub imagewidth: u32,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub tilecount: u32,
    #[serde(default)]
    pub columns: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TiledLayer {
    Tilelayer {
        name: String,
        #[serde(default)]
        data: Vec<u32>,
    },
    Imagelayer {
        name: String,
        #[serde(default)]
        image: String,
        #[serde(default)]
        parallaxx: Option<f32>,
    },
    Objectgroup {
        name: String,
        #[serde(default)]
        objects: Vec<TiledObject>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TiledObject {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Tiled 1.9+ renamed `type` to `class`.
    #[serde(default)]
    pub class: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

impl TiledObject {
    /// Template name this object asks for.
    pub fn template(&self) -> &str {
        if self.kind.is_empty() {
            &self.class
        } else {
            &self.kind
        }
    }
}

/// An object from the map that should be spawned once the scene is live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub template: String,
    pub x: i32,
    pub y: i32,
}

impl TiledMap {
    pub fn from_json(json: &str, path: &Path) -> Result<Self, LoadError> {
        serde_json::from_str(json).map_err(|e| LoadError::json(path, e))
    }
}

/// Build a scene from a parsed map. `map_dir` is joined to image paths.
pub fn build_scene(
    map: &TiledMap,
    map_dir: &Path,
) -> Result<(Scene, Vec<SpawnRequest>), LoadError> {
    let too_large = || LoadError::MapTooLarge {
        width: map.width,
        height: map.height,
        tile_width: map.tilewidth,
        tile_height: map.tileheight,
    };
    // pixel sizes are used as i32 scene coordinates
    let width_px = pixel_extent(map.width, map.tilewidth).ok_or_else(too_large)?;
    let height_px = pixel_extent(map.height, map.tileheight).ok_or_else(too_large)?;
    let mut scene = Scene::new(width_px, height_px, map.tilewidth, map.tileheight)?;

    for ts in &map.tilesets {
        if let Some(source) = &ts.source {
            return Err(LoadError::ExternalTileset {
                name: ts.name.clone(),
                source_file: source.clone(),
            });
        }
        let Some(image) = &ts.image else {
            return Err(LoadError::TilesetWithoutImage {
                name: ts.name.clone(),
            });
        };
        let tile_width = if ts.tilewidth > 0 { ts.tilewidth } else { map.tilewidth };
        let tile_height = if ts.tileheight > 0 { ts.tileheight } else { map.tileheight };
        let columns = if ts.columns > 0 {
            ts.columns
        } else {
            (ts.imagewidth / tile_width).max(1)
        };
        scene.add_tileset(Tileset {
            name: ts.name.clone(),
            texture: resolve_path(map_dir, image),
            first_gid: ts.firstgid,
            tile_count: ts.tilecount,
            columns,
            tile_width,
            tile_height,
        });
    }

    let mut spawns = Vec::new();
    for layer in &map.layers {
        match layer {
            TiledLayer::Tilelayer { name, data } => match TileLayerKind::from_name(name) {
                Some(kind) => {
                    let cells = data.iter().copied().map(TileCell::from_raw).collect();
                    scene.set_layer(kind, cells)?;
                    debug!("Loaded tile layer '{}'", name);
                }
                None => warn!("Ignoring unknown tile layer '{}'", name),
            },
            TiledLayer::Imagelayer {
                name,
                image,
                parallaxx,
            } => match ParallaxSlot::from_name(name) {
                Some(slot) if !image.is_empty() => {
                    scene.set_parallax(
                        slot,
                        ParallaxLayer {
                            texture: resolve_path(map_dir, image),
                            factor: parallaxx.unwrap_or_else(|| slot.default_factor()),
                        },
                    );
                }
                Some(_) => warn!("Image layer '{}' has no image", name),
                None => warn!("Ignoring unknown image layer '{}'", name),
            },
            TiledLayer::Objectgroup { name, objects } => {
                for obj in objects {
                    let template = obj.template();
                    if template.is_empty() {
                        debug!(
                            "Object '{}' in group '{}' has no type, skipping",
                            obj.name, name
                        );
                        continue;
                    }
                    spawns.push(SpawnRequest {
                        template: template.to_string(),
                        x: obj.x.round() as i32,
                        y: obj.y.round() as i32,
                    });
                }
            }
            TiledLayer::Other => warn!("Ignoring unsupported map layer type"),
        }
    }

    Ok((scene, spawns))
}

/// Read and build a map from disk.
pub fn load_map_file(path: impl AsRef<Path>) -> Result<(Scene, Vec<SpawnRequest>), LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let map = TiledMap::from_json(&json, path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let (scene, spawns) = build_scene(&map, dir)?;
    info!(
        "Loaded map {} ({}x{} tiles, {} tilesets, {} objects)",
        path.display(),
        map.width,
        map.height,
        scene.tilesets().len(),
        spawns.len()
    );
    Ok((scene, spawns))
}

fn pixel_extent(tiles: u32, tile_size: u32) -> Option<u32> {
    tiles
        .checked_mul(tile_size)
        .filter(|px| i32::try_from(*px).is_ok())
}

fn resolve_path(dir: &Path, file: &str) -> String {
    dir.join(file).to_string_lossy().into_owned()
}
