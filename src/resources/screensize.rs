//! Viewport size resource.
//!
//! The size of the render target in pixels. Camera follow keeps the player
//! inside it and the scene renderer culls tiles against it.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub w: i32,
    pub h: i32,
}

impl ScreenSize {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    pub fn as_tuple(&self) -> (i32, i32) {
        (self.w, self.h)
    }
}
