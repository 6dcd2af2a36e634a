//! Collision box component.
//!
//! [`BodyRect`] is the authoritative position and size of a scene object in
//! integer pixels. Physics moves it, collision tests read it and the renderer
//! anchors the sprite to it.

use bevy_ecs::prelude::Component;

/// Axis-aligned box in scene pixels, `(x, y)` being the top-left corner.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BodyRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BodyRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Center point of the box.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = BodyRect::new(10, 20, 16, 24);
        assert_eq!(r.right(), 26);
        assert_eq!(r.bottom(), 44);
        assert_eq!(r.center(), (18, 32));
    }
}
