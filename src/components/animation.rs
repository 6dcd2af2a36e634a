//! Animation clip playback.
//!
//! A [`ClipDef`] is the immutable description of a clip (frames and loop
//! flag) shared by every entity using the same sprite sheet. An
//! [`AnimationClip`] pairs a `ClipDef` with a per-entity cursor and answers
//! "which frame is visible right now".

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One frame of a clip: the atlas tile index and how long it stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub tile: u32,
    pub duration_ms: u64,
}

impl AnimationFrame {
    pub fn new(tile: u32, duration_ms: u64) -> Self {
        Self { tile, duration_ms }
    }
}

/// Immutable clip data. Cloning is cheap, the frames are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipDef {
    pub frames: Arc<[AnimationFrame]>,
    pub looped: bool,
}

impl ClipDef {
    pub fn new(frames: impl Into<Arc<[AnimationFrame]>>, looped: bool) -> Self {
        Self {
            frames: frames.into(),
            looped,
        }
    }

    /// A clip with no frames. Queries on it always return `None`.
    pub fn empty() -> Self {
        Self {
            frames: Arc::from(Vec::<AnimationFrame>::new()),
            looped: false,
        }
    }
}

/// Clip plus playback cursor.
///
/// The expiry of the current frame is initialised lazily on the first
/// query, so a clip created at load time starts counting when it is first
/// drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    def: ClipDef,
    index: usize,
    expires_at_ms: Option<u64>,
}

impl AnimationClip {
    pub fn new(def: ClipDef) -> Self {
        Self {
            def,
            index: 0,
            expires_at_ms: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(ClipDef::empty())
    }

    pub fn len(&self) -> usize {
        self.def.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.def.frames.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// True once a one-shot clip has reached its last frame.
    pub fn is_finished(&self) -> bool {
        !self.def.looped && !self.is_empty() && self.index + 1 == self.len()
    }

    /// Rewind to the first frame; the clock restarts on the next query.
    pub fn reset(&mut self) {
        self.index = 0;
        self.expires_at_ms = None;
    }

    /// Frame tile under the cursor, without touching the clock.
    pub fn held_frame(&self) -> Option<u32> {
        self.def.frames.get(self.index).map(|f| f.tile)
    }

    /// Frame tile visible at `now_ms`, advancing the cursor by at most one
    /// frame when the current one has expired.
    pub fn current_frame(&mut self, now_ms: u64) -> Option<u32> {
        let frames = &self.def.frames;
        if frames.is_empty() {
            return None;
        }

        let expires_at = *self
            .expires_at_ms
            .get_or_insert_with(|| now_ms.saturating_add(frames[self.index].duration_ms));

        if now_ms >= expires_at {
            let last = self.index + 1 == frames.len();
            if last && !self.def.looped {
                // one-shot clips hold the last frame
                self.expires_at_ms = Some(u64::MAX);
            } else {
                self.index = (self.index + 1) % frames.len();
                self.expires_at_ms =
                    Some(now_ms.saturating_add(frames[self.index].duration_ms));
            }
        }

        Some(frames[self.index].tile)
    }
}
