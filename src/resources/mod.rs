//! ECS resources and the data they are loaded from.
//!
//! This module groups the long-lived data inserted into the world and read
//! by systems, plus the loaders that produce it.
//!
//! Overview
//! - `collisionmap` – tile occupancy grid and the ground/wall tests
//! - `gameconfig` – INI-backed settings (render size, loop timing, assets)
//! - `gamestate` – current mode, pending transition and pause sources
//! - `input` – logical keys and their raylib bindings
//! - `scene` – the loaded level: tile layers, parallax, tilesets, scroll
//! - `screensize` – viewport size in render pixels
//! - `spritestore` – shared sprite sheets by name
//! - `templates` – entity templates referenced by map objects
//! - `texturestore` – loaded raylib textures keyed by path
//! - `tilemap` – Tiled JSON map format and scene construction
//! - `worldtime` – loop time and step/frame counters
pub mod collisionmap;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod scene;
pub mod screensize;
pub mod spritestore;
pub mod templates;
pub mod texturestore;
pub mod tilemap;
pub mod worldtime;
