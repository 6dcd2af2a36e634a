//! Renderer boundary.
//!
//! Scene rendering only talks to a [`Canvas`]: blit a sub-rectangle of a
//! texture, fill a rectangle, draw a line of text. The raylib backend lives in
//! [`crate::platform`]; [`RecordingCanvas`] keeps a list of the issued draw
//! calls and is used by headless runs and tests.

use rustc_hash::FxHashMap;

/// Flip flags for a blit. `diagonal` is carried through from the tilemap but
/// only horizontal and vertical flips are applied by the raylib backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl Flip {
    pub const NONE: Flip = Flip {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    pub fn horizontal() -> Self {
        Flip {
            horizontal: true,
            ..Flip::NONE
        }
    }
}

/// Source rectangle inside a texture, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SrcRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl SrcRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Frame `index` of a grid atlas with `columns` columns of `w`×`h` cells.
    pub fn grid_cell(index: u32, columns: u32, w: u32, h: u32) -> Self {
        let columns = columns.max(1);
        let col = index % columns;
        let row = index / columns;
        Self {
            x: (col * w) as i32,
            y: (row * h) as i32,
            w: w as i32,
            h: h as i32,
        }
    }
}

/// RGBA colour.
pub type Rgba = [u8; 4];

pub trait Canvas {
    /// Size of the drawable area in pixels.
    fn viewport_size(&self) -> (i32, i32);

    /// Size of a loaded texture, `None` when the key is not loaded.
    fn texture_size(&self, texture: &str) -> Option<(i32, i32)>;

    /// Blit `src` of `texture` with its top-left corner at `(dst_x, dst_y)`.
    /// Unknown textures are a no-op.
    fn draw_image(&mut self, texture: &str, src: SrcRect, dst_x: i32, dst_y: i32, flip: Flip);

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba);

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: i32, color: Rgba);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Image {
        texture: String,
        src: SrcRect,
        dst_x: i32,
        dst_y: i32,
        flip: Flip,
    },
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgba,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
    },
}

/// Canvas that records every draw call instead of rasterising.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub width: i32,
    pub height: i32,
    pub textures: FxHashMap<String, (i32, i32)>,
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            textures: FxHashMap::default(),
            calls: Vec::new(),
        }
    }

    pub fn with_texture(mut self, key: impl Into<String>, width: i32, height: i32) -> Self {
        self.textures.insert(key.into(), (width, height));
        self
    }

    /// Texture keys of the recorded image blits, consecutive repeats collapsed.
    pub fn texture_sequence(&self) -> Vec<String> {
        let mut seq: Vec<String> = Vec::new();
        for call in &self.calls {
            if let DrawCall::Image { texture, .. } = call {
                if seq.last() != Some(texture) {
                    seq.push(texture.clone());
                }
            }
        }
        seq
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Image { .. }))
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn viewport_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn texture_size(&self, texture: &str) -> Option<(i32, i32)> {
        self.textures.get(texture).copied()
    }

    fn draw_image(&mut self, texture: &str, src: SrcRect, dst_x: i32, dst_y: i32, flip: Flip) {
        if !self.textures.contains_key(texture) {
            return;
        }
        self.calls.push(DrawCall::Image {
            texture: texture.to_string(),
            src,
            dst_x,
            dst_y,
            flip,
        });
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        self.calls.push(DrawCall::Rect { x, y, w, h, color });
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, _size: i32, _color: Rgba) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}
