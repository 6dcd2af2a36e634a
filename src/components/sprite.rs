use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::warn;

use crate::canvas::{Canvas, Flip, SrcRect};
use crate::components::animation::AnimationClip;
use crate::resources::spritestore::SpriteSheet;

/// Sprite is a shared sheet plus this entity's playback state.
/// The sheet is never mutated; switching modes only replaces the local clip cursor.
#[derive(Component, Clone, Debug)]
pub struct Sprite {
    pub sheet: Arc<SpriteSheet>,
    mode: String,
    /// Last name passed to `set_mode`; differs from `mode` after a fallback.
    requested: String,
    clip: AnimationClip,
    pub flip_h: bool,
    /// Set after warning about a texture the canvas does not have.
    missing_warned: bool,
}

impl Sprite {
    /// Create a sprite playing the sheet's default mode.
    pub fn new(sheet: Arc<SpriteSheet>) -> Self {
        let mut sprite = Self {
            sheet,
            mode: String::new(),
            requested: String::new(),
            clip: AnimationClip::empty(),
            flip_h: false,
            missing_warned: false,
        };
        if let Some(default) = sprite.sheet.default_mode.clone() {
            sprite.set_mode(&default);
        }
        sprite
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Switch to mode `name`, falling back to the default mode and then to an
    /// empty clip. Re-selecting the active mode keeps its cursor.
    pub fn set_mode(&mut self, name: &str) {
        if self.mode == name || self.requested == name {
            return;
        }
        self.requested = name.to_string();
        if let Some(def) = self.sheet.clip(name) {
            self.mode = name.to_string();
            self.clip = AnimationClip::new(def.clone());
            return;
        }

        let default = self.sheet.default_mode.as_deref();
        match default.and_then(|d| self.sheet.clip(d).map(|c| (d, c))) {
            Some((default_name, def)) => {
                warn!(
                    "Sprite '{}' has no mode '{}', using default '{}'",
                    self.sheet.name, name, default_name
                );
                if self.mode != default_name {
                    self.mode = default_name.to_string();
                    self.clip = AnimationClip::new(def.clone());
                }
            }
            None => {
                warn!(
                    "Sprite '{}' has no mode '{}' and no default mode",
                    self.sheet.name, name
                );
                self.mode = name.to_string();
                self.clip = AnimationClip::empty();
            }
        }
    }

    /// Atlas tile visible at `now_ms`. Sheets without modes show tile 0.
    pub fn current_tile(&mut self, now_ms: u64) -> Option<u32> {
        if self.sheet.modes.is_empty() {
            return Some(0);
        }
        self.clip.current_frame(now_ms)
    }

    /// Blit the current frame with its top-left corner at `(x, y)`.
    pub fn render(&mut self, canvas: &mut dyn Canvas, x: i32, y: i32, flip: Flip, now_ms: u64) {
        if !self.texture_ready(canvas) {
            return;
        }
        let tile = self.current_tile(now_ms);
        self.blit(canvas, tile, x, y, flip);
    }

    /// Like [`Sprite::render`] but holds the frame under the cursor.
    pub fn render_held(&mut self, canvas: &mut dyn Canvas, x: i32, y: i32, flip: Flip) {
        if !self.texture_ready(canvas) {
            return;
        }
        let tile = if self.sheet.modes.is_empty() {
            Some(0)
        } else {
            self.clip.held_frame()
        };
        self.blit(canvas, tile, x, y, flip);
    }

    /// True when the canvas can draw this sheet's texture. Warns once per
    /// sprite until the texture shows up.
    fn texture_ready(&mut self, canvas: &dyn Canvas) -> bool {
        let ready = match self.sheet.texture.as_deref() {
            Some(texture) => canvas.texture_size(texture).is_some(),
            None => false,
        };
        if ready {
            self.missing_warned = false;
        } else if !self.missing_warned {
            self.missing_warned = true;
            match &self.sheet.texture {
                Some(texture) => warn!(
                    "Sprite '{}' texture '{}' is not loaded, skipping draw",
                    self.sheet.name, texture
                ),
                None => warn!("Sprite '{}' has no texture, skipping draw", self.sheet.name),
            }
        }
        ready
    }

    fn blit(&self, canvas: &mut dyn Canvas, tile: Option<u32>, x: i32, y: i32, flip: Flip) {
        let (Some(texture), Some(tile)) = (self.sheet.texture.as_deref(), tile) else {
            return;
        };
        let columns = self
            .sheet
            .columns_for_atlas(canvas.texture_size(texture).map(|(w, _)| w));
        let src = SrcRect::grid_cell(
            tile,
            columns,
            self.sheet.frame_width,
            self.sheet.frame_height,
        );
        canvas.draw_image(texture, src, x, y, flip);
    }
}
