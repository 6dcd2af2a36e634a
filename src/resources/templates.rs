//! Entity templates.
//!
//! Map objects only carry a type name and a position; everything else about
//! the entity comes from a template of the same name.
//!
//! ```json
//! {
//!   "hero":  { "sprite": "hero", "width": 12, "height": 22, "gravity": 1,
//!              "momentum": 4, "energy": 100, "player": true },
//!   "slime": { "sprite": "slime", "width": 16, "height": 12, "gravity": 1,
//!              "energy": 10, "energy_drain": 1 }
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::resources::spritestore::SpriteStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTemplate {
    /// Sprite sheet name; `None` spawns an invisible object.
    #[serde(default)]
    pub sprite: Option<String>,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub gravity: i32,
    /// Horizontal speed while a direction is held. Defaults to `[game] momentum`.
    #[serde(default)]
    pub momentum: Option<i32>,
    /// Energy bar size; absent means the entity has no energy.
    #[serde(default)]
    pub energy: Option<u32>,
    #[serde(default)]
    pub energy_drain: u32,
    #[serde(default)]
    pub player: bool,
}

#[derive(Resource, Debug, Default, Clone)]
pub struct TemplateStore {
    pub map: FxHashMap<String, EntityTemplate>,
}

impl TemplateStore {
    pub fn new() -> Self {
        TemplateStore {
            map: FxHashMap::default(),
        }
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&EntityTemplate> {
        self.map.get(key.as_ref())
    }

    pub fn insert(&mut self, key: impl Into<String>, template: EntityTemplate) {
        self.map.insert(key.into(), template);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn from_json(json: &str, path: &Path) -> Result<Self, LoadError> {
        let map: FxHashMap<String, EntityTemplate> =
            serde_json::from_str(json).map_err(|e| LoadError::json(path, e))?;
        Ok(TemplateStore { map })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let store = Self::from_json(&json, path)?;
        info!("Loaded {} entity templates from {}", store.len(), path.display());
        Ok(store)
    }

    /// Every template's sprite must exist in `sprites`.
    pub fn validate(&self, sprites: &SpriteStore) -> Result<(), LoadError> {
        let mut names: Vec<&String> = self.map.keys().collect();
        names.sort();
        for name in names {
            if let Some(sprite) = &self.map[name].sprite
                && sprites.get(sprite).is_none()
            {
                return Err(LoadError::UnknownSprite {
                    template: name.clone(),
                    sprite: sprite.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::spritestore::SpriteSheet;

    const TEMPLATES: &str = r#"{
        "hero": { "sprite": "hero", "width": 12, "height": 22, "gravity": 1, "momentum": 4,
                  "energy": 100, "player": true },
        "crate": { "width": 16, "height": 16 }
    }"#;

    #[test]
    fn test_parses_templates_with_defaults() {
        let store = TemplateStore::from_json(TEMPLATES, Path::new("t.json")).unwrap();
        let hero = store.get("hero").unwrap();
        assert!(hero.player);
        assert_eq!(hero.energy, Some(100));
        let crate_t = store.get("crate").unwrap();
        assert_eq!(crate_t.sprite, None);
        assert_eq!(crate_t.gravity, 0);
        assert_eq!(crate_t.momentum, None);
        assert!(!crate_t.player);
    }

    #[test]
    fn test_validate_reports_unknown_sprite() {
        let store = TemplateStore::from_json(TEMPLATES, Path::new("t.json")).unwrap();
        let err = store.validate(&SpriteStore::new()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSprite { ref sprite, .. } if sprite == "hero"));

        let mut sprites = SpriteStore::new();
        sprites.insert(SpriteSheet::new("hero", None, 16, 16));
        assert!(store.validate(&sprites).is_ok());
    }
}
