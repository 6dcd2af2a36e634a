//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 320
//! height = 240
//!
//! [window]
//! width = 960
//! height = 720
//! title = tilerunner
//!
//! [game]
//! step_ms = 300
//! fps = 29.97
//! gravity = 1
//! momentum = 4
//! intro_ms = 2000
//!
//! [assets]
//! map = assets/level1.json
//! sprites = assets/sprites.json
//! entities = assets/entities.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_RENDER_WIDTH: u32 = 320;
const DEFAULT_RENDER_HEIGHT: u32 = 240;
const DEFAULT_WINDOW_WIDTH: u32 = 960;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_WINDOW_TITLE: &str = "tilerunner";
const DEFAULT_STEP_MS: u64 = 300;
const DEFAULT_FPS: f64 = 29.97;
const DEFAULT_GRAVITY_RATE: i32 = 1;
const DEFAULT_MOMENTUM: i32 = 4;
const DEFAULT_INTRO_MS: u64 = 2000;
const DEFAULT_MAP_PATH: &str = "assets/level1.json";
const DEFAULT_SPRITES_PATH: &str = "assets/sprites.json";
const DEFAULT_ENTITIES_PATH: &str = "assets/entities.json";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// Stores render resolution, window settings, loop timing, physics tuning
/// and asset paths.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Internal render width in pixels (the viewport).
    pub render_width: u32,
    /// Internal render height in pixels.
    pub render_height: u32,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    pub window_title: String,
    /// Logic step interval in milliseconds.
    pub step_ms: u64,
    /// Draw rate cap.
    pub fps: f64,
    /// Global gravity multiplier.
    pub gravity_rate: i32,
    /// Momentum for templates that don't set their own.
    pub momentum: i32,
    /// How long the intro stays up before the title.
    pub intro_ms: u64,
    pub map_path: PathBuf,
    pub sprites_path: PathBuf,
    pub entities_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            step_ms: DEFAULT_STEP_MS,
            fps: DEFAULT_FPS,
            gravity_rate: DEFAULT_GRAVITY_RATE,
            momentum: DEFAULT_MOMENTUM,
            intro_ms: DEFAULT_INTRO_MS,
            map_path: PathBuf::from(DEFAULT_MAP_PATH),
            sprites_path: PathBuf::from(DEFAULT_SPRITES_PATH),
            entities_path: PathBuf::from(DEFAULT_ENTITIES_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Draw interval in milliseconds derived from `fps`.
    pub fn draw_interval_ms(&self) -> u64 {
        if self.fps <= 0.0 {
            0
        } else {
            (1000.0 / self.fps).round() as u64
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} render, {}x{} window, step={}ms, fps={}, map={}",
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.step_ms,
            self.fps,
            self.map_path.display()
        );

        Ok(())
    }

    /// Load configuration from an INI string.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [render] section
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.window_title = title;
        }

        // [game] section
        if let Some(step) = config.getuint("game", "step_ms").ok().flatten() {
            self.step_ms = step;
        }
        if let Some(fps) = config.getfloat("game", "fps").ok().flatten() {
            self.fps = fps;
        }
        if let Some(gravity) = config.getint("game", "gravity").ok().flatten() {
            self.gravity_rate = gravity as i32;
        }
        if let Some(momentum) = config.getint("game", "momentum").ok().flatten() {
            self.momentum = momentum as i32;
        }
        if let Some(intro) = config.getuint("game", "intro_ms").ok().flatten() {
            self.intro_ms = intro;
        }

        // [assets] section
        if let Some(map) = config.get("assets", "map") {
            self.map_path = PathBuf::from(map);
        }
        if let Some(sprites) = config.get("assets", "sprites") {
            self.sprites_path = PathBuf::from(sprites);
        }
        if let Some(entities) = config.get("assets", "entities") {
            self.entities_path = PathBuf::from(entities);
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [render] section
        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "title", Some(self.window_title.clone()));

        // [game] section
        config.set("game", "step_ms", Some(self.step_ms.to_string()));
        config.set("game", "fps", Some(self.fps.to_string()));
        config.set("game", "gravity", Some(self.gravity_rate.to_string()));
        config.set("game", "momentum", Some(self.momentum.to_string()));
        config.set("game", "intro_ms", Some(self.intro_ms.to_string()));

        // [assets] section
        config.set("assets", "map", Some(self.map_path.display().to_string()));
        config.set(
            "assets",
            "sprites",
            Some(self.sprites_path.display().to_string()),
        );
        config.set(
            "assets",
            "entities",
            Some(self.entities_path.display().to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Viewport size in render pixels.
    pub fn render_size(&self) -> (i32, i32) {
        (self.render_width as i32, self.render_height as i32)
    }
}
