//! tilerunner main entry point.
//!
//! A small 2D tile game engine written in Rust using:
//! - **raylib** for windowing, textures, input and drawing
//! - **bevy_ecs** for the scene objects and the logic step
//!
//! # Startup
//!
//! 1. Read `config.ini` (defaults when missing) and apply CLI overrides
//! 2. Load the sprite sheets and entity templates; failure exits with status 1
//! 3. Open the window and hand the world to the game loop
//! 4. The loop shows the intro, then the title; Enter loads the map
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use tilerunner::game::{init_world, load_scene_from_files};
use tilerunner::gameloop::GameLoop;
use tilerunner::platform::RaylibPlatform;
use tilerunner::resources::gameconfig::GameConfig;
use tilerunner::resources::spritestore::SpriteStore;
use tilerunner::resources::templates::TemplateStore;

/// tilerunner 2D tile engine
#[derive(Parser)]
#[command(version, about = "A small 2D tile-based game engine")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Map to load instead of the one in the configuration.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Logic step interval in milliseconds.
    #[arg(long, value_name = "MS")]
    step_ms: Option<u64>,

    /// Write the effective configuration back to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }
    if let Some(map) = cli.map {
        config.map_path = map;
    }
    if let Some(step_ms) = cli.step_ms {
        config.step_ms = step_ms;
    }
    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    let sprites = match SpriteStore::load_from_file(&config.sprites_path) {
        Ok(sprites) => sprites,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let templates = match TemplateStore::load_from_file(&config.entities_path) {
        Ok(templates) => templates,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = templates.validate(&sprites) {
        error!("{}", e);
        std::process::exit(1);
    }

    let platform = match RaylibPlatform::new(&config) {
        Ok(platform) => platform,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let map_path = config.map_path.clone();
    let world = init_world(config, sprites, templates);
    let loader = Box::new(move |world: &mut bevy_ecs::world::World| {
        load_scene_from_files(world, &map_path)
    });

    info!("Starting tilerunner");
    let mut game = GameLoop::new(world, platform, loader);
    game.run();
}
