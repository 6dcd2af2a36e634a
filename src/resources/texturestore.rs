//! Loaded raylib textures keyed by asset path.
//!
//! Owned by the raylib platform. Keys are the same strings scenes and sprite
//! sheets use to name their images, so a draw call can look its texture up
//! directly. A key that failed to load is simply absent.

use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn new() -> Self {
        TextureStore {
            map: FxHashMap::default(),
        }
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Texture2D> {
        self.map.get(key.as_ref())
    }

    pub fn insert(&mut self, key: impl Into<String>, texture: Texture2D) {
        self.map.insert(key.into(), texture);
    }

    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.map.contains_key(key.as_ref())
    }

    /// Size of a loaded texture in pixels.
    pub fn size(&self, key: impl AsRef<str>) -> Option<(i32, i32)> {
        self.get(key).map(|t| (t.width, t.height))
    }

    /// Drop every texture not in `keep`.
    pub fn retain_keys(&mut self, keep: &[String]) {
        self.map.retain(|k, _| keep.iter().any(|kk| kk == k));
    }
}
