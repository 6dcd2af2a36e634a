//! Scene resource.
//!
//! A [`Scene`] owns everything that is loaded once per level and not mutated
//! by logic steps: up to five tile layers, up to three parallax image layers,
//! the tilesets that resolve tile gids to textures and the [`CollisionMap`].
//! The only fields that change while playing are the scroll offsets and the
//! object id counter. Scene objects themselves are ECS entities tagged with
//! [`SceneObject`](crate::components::sceneobject::SceneObject).

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::canvas::Flip;
use crate::components::bodyrect::BodyRect;
use crate::components::physics::Direction;
use crate::error::LoadError;
use crate::resources::collisionmap::CollisionMap;

const FLIPPED_HORIZONTALLY: u32 = 0x8000_0000;
const FLIPPED_VERTICALLY: u32 = 0x4000_0000;
const FLIPPED_DIAGONALLY: u32 = 0x2000_0000;
const GID_MASK: u32 = !(FLIPPED_HORIZONTALLY | FLIPPED_VERTICALLY | FLIPPED_DIAGONALLY);

/// One cell of a tile layer. `gid == 0` is an empty cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileCell {
    pub gid: u32,
    pub flip: Flip,
}

impl TileCell {
    pub fn new(gid: u32) -> Self {
        Self {
            gid,
            flip: Flip::NONE,
        }
    }

    /// Split a raw map gid into the tile id and its flip bits.
    pub fn from_raw(raw: u32) -> Self {
        Self {
            gid: raw & GID_MASK,
            flip: Flip {
                horizontal: raw & FLIPPED_HORIZONTALLY != 0,
                vertical: raw & FLIPPED_VERTICALLY != 0,
                diagonal: raw & FLIPPED_DIAGONALLY != 0,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gid == 0
    }
}

/// The five tile layers a scene knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileLayerKind {
    Background,
    Terrain,
    Objects,
    Collision,
    Foreground,
}

impl TileLayerKind {
    /// Layer kind for a map layer name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "background" => Some(TileLayerKind::Background),
            "terrain" => Some(TileLayerKind::Terrain),
            "objects" => Some(TileLayerKind::Objects),
            "collision" => Some(TileLayerKind::Collision),
            "foreground" => Some(TileLayerKind::Foreground),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TileLayerKind::Background => "background",
            TileLayerKind::Terrain => "terrain",
            TileLayerKind::Objects => "objects",
            TileLayerKind::Collision => "collision",
            TileLayerKind::Foreground => "foreground",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub kind: TileLayerKind,
    /// Row-major cells, `grid_width * grid_height` of them.
    pub cells: Vec<TileCell>,
}

/// The three parallax image slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParallaxSlot {
    /// `s_background2`, farthest back.
    Back2,
    /// `s_background`.
    Back1,
    /// `s_foreground`, drawn over everything.
    Fore,
}

impl ParallaxSlot {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "s_background2" => Some(ParallaxSlot::Back2),
            "s_background" => Some(ParallaxSlot::Back1),
            "s_foreground" => Some(ParallaxSlot::Fore),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParallaxSlot::Back2 => "s_background2",
            ParallaxSlot::Back1 => "s_background",
            ParallaxSlot::Fore => "s_foreground",
        }
    }

    /// Scroll factor used when the map does not give one.
    pub fn default_factor(self) -> f32 {
        match self {
            ParallaxSlot::Back2 => 0.25,
            ParallaxSlot::Back1 => 0.5,
            ParallaxSlot::Fore => 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer {
    pub texture: String,
    /// Horizontal scroll multiplier relative to the scene scroll.
    pub factor: f32,
}

/// A tileset embedded in the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub name: String,
    pub texture: String,
    pub first_gid: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Tileset {
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }

    /// Tileset-local index of `gid`. Only meaningful when [`Self::contains`] holds.
    pub fn local(&self, gid: u32) -> u32 {
        gid - self.first_gid
    }
}

/// Scene edge a box was clipped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Resource, Debug, Clone)]
pub struct Scene {
    pub tile_width: u32,
    pub tile_height: u32,
    pub width_px: u32,
    pub height_px: u32,
    layers: FxHashMap<TileLayerKind, TileLayer>,
    parallax: FxHashMap<ParallaxSlot, ParallaxLayer>,
    /// Sorted by `first_gid`.
    tilesets: Vec<Tileset>,
    collision: CollisionMap,
    pub scroll_x: i32,
    pub scroll_y: i32,
    next_object_id: u64,
}

impl Scene {
    /// Empty scene of `width_px`×`height_px` pixels on a grid of `tile_width`×`tile_height`.
    pub fn new(
        width_px: u32,
        height_px: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Result<Self, LoadError> {
        if tile_width == 0 || tile_height == 0 {
            return Err(LoadError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        let (gw, gh) = grid_dims(width_px, height_px, tile_width, tile_height);
        Ok(Self {
            tile_width,
            tile_height,
            width_px,
            height_px,
            layers: FxHashMap::default(),
            parallax: FxHashMap::default(),
            tilesets: Vec::new(),
            collision: CollisionMap::new(gw, gh, tile_width, tile_height),
            scroll_x: 0,
            scroll_y: 0,
            next_object_id: 0,
        })
    }

    /// Grid size in tiles, rounded up.
    pub fn grid_size(&self) -> (u32, u32) {
        grid_dims(
            self.width_px,
            self.height_px,
            self.tile_width,
            self.tile_height,
        )
    }

    pub fn cell_count(&self) -> usize {
        let (w, h) = self.grid_size();
        w as usize * h as usize
    }

    /// Install a tile layer. The collision layer also rebuilds the collision map.
    pub fn set_layer(&mut self, kind: TileLayerKind, cells: Vec<TileCell>) -> Result<(), LoadError> {
        let expected = self.cell_count();
        if cells.len() != expected {
            return Err(LoadError::LayerSize {
                layer: kind.name().to_string(),
                expected,
                actual: cells.len(),
            });
        }
        if kind == TileLayerKind::Collision {
            let (gw, gh) = self.grid_size();
            self.collision = CollisionMap::from_gids(
                gw,
                gh,
                self.tile_width,
                self.tile_height,
                cells.iter().map(|c| c.gid),
            );
        }
        self.layers.insert(kind, TileLayer { kind, cells });
        Ok(())
    }

    pub fn layer(&self, kind: TileLayerKind) -> Option<&TileLayer> {
        self.layers.get(&kind)
    }

    pub fn set_parallax(&mut self, slot: ParallaxSlot, layer: ParallaxLayer) {
        self.parallax.insert(slot, layer);
    }

    pub fn parallax(&self, slot: ParallaxSlot) -> Option<&ParallaxLayer> {
        self.parallax.get(&slot)
    }

    pub fn add_tileset(&mut self, tileset: Tileset) {
        let at = self
            .tilesets
            .partition_point(|t| t.first_gid <= tileset.first_gid);
        self.tilesets.insert(at, tileset);
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    /// Owning tileset and local index for `gid`; `None` for 0 or an unowned gid.
    pub fn resolve_gid(&self, gid: u32) -> Option<(&Tileset, u32)> {
        if gid == 0 {
            return None;
        }
        let idx = self.tilesets.partition_point(|t| t.first_gid <= gid);
        let tileset = self.tilesets[..idx].last()?;
        tileset
            .contains(gid)
            .then(|| (tileset, tileset.local(gid)))
    }

    pub fn collision(&self) -> &CollisionMap {
        &self.collision
    }

    pub fn collides_ground(&self, rect: &BodyRect) -> bool {
        self.collision.collides_ground(rect)
    }

    pub fn collides_wall(&self, direction: Direction, rect: &BodyRect) -> bool {
        self.collision.collides_wall(direction, rect)
    }

    /// Clip `rect` into the scene bounds, returning every edge it was pushed off.
    pub fn clamp_rect(&self, rect: &mut BodyRect) -> Vec<Edge> {
        let mut clipped = Vec::new();
        let max_x = (self.width_px as i32 - rect.w).max(0);
        let max_y = (self.height_px as i32 - rect.h).max(0);
        if rect.x < 0 {
            rect.x = 0;
            clipped.push(Edge::Left);
        } else if rect.x > max_x {
            rect.x = max_x;
            clipped.push(Edge::Right);
        }
        if rect.y < 0 {
            rect.y = 0;
            clipped.push(Edge::Top);
        } else if rect.y > max_y {
            rect.y = max_y;
            clipped.push(Edge::Bottom);
        }
        clipped
    }

    /// Hand out the next scene-local object id.
    pub fn allocate_object_id(&mut self) -> u64 {
        let id = self.next_object_id;
        self.next_object_id += 1;
        id
    }

    /// Keep the scroll offsets inside `[0, scene size - viewport]`.
    pub fn clamp_scroll(&mut self, viewport: (i32, i32)) {
        let max_x = (self.width_px as i32 - viewport.0).max(0);
        let max_y = (self.height_px as i32 - viewport.1).max(0);
        self.scroll_x = self.scroll_x.clamp(0, max_x);
        self.scroll_y = self.scroll_y.clamp(0, max_y);
    }

    /// Every texture the scene draws from, deduplicated.
    pub fn texture_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tilesets
            .iter()
            .map(|t| t.texture.clone())
            .chain(self.parallax.values().map(|p| p.texture.clone()))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

fn grid_dims(width_px: u32, height_px: u32, tile_width: u32, tile_height: u32) -> (u32, u32) {
    (
        width_px.div_ceil(tile_width.max(1)),
        height_px.div_ceil(tile_height.max(1)),
    )
}
