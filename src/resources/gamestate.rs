//! High-level game state resources.
//!
//! These resources track the authoritative current mode of the game, any
//! pending transition requested by input handlers, and the set of active
//! pause sources. See [`crate::gameloop::GameLoop`] for
//! how a transition is applied.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;

/// Discrete high-level modes the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    #[default]
    None,
    Intro,
    Title,
    Scene,
    ScenePaused,
}

/// Representation of a requested next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(GameStates),
}

/// Authoritative current game state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
    /// Loop time at which `current` was entered.
    entered_at_ms: u64,
}

impl GameState {
    /// Create a new state initialized to [`GameStates::None`].
    pub fn new() -> Self {
        GameState {
            current: GameStates::None,
            entered_at_ms: 0,
        }
    }
    /// Read-only access to the current state.
    pub fn get(&self) -> GameStates {
        self.current
    }
    /// Update the current state immediately.
    pub fn set(&mut self, state: GameStates, now_ms: u64) {
        self.current = state;
        self.entered_at_ms = now_ms;
    }
    /// Milliseconds spent in the current state.
    pub fn time_in_state(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.entered_at_ms)
    }
    /// True in `Scene` and `ScenePaused`.
    pub fn in_scene(&self) -> bool {
        matches!(self.current, GameStates::Scene | GameStates::ScenePaused)
    }
}

/// Intent to change to a new game state.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    /// Create a new value initialized to [`NextGameStates::Unchanged`].
    pub fn new() -> Self {
        NextGameState {
            next: NextGameStates::Unchanged,
        }
    }

    /// Get the current transition request.
    pub fn get(&self) -> NextGameStates {
        self.next
    }

    /// Request a transition to `next` by marking it as pending.
    pub fn set(&mut self, next: GameStates) {
        self.next = NextGameStates::Pending(next);
    }

    /// Take the pending request, leaving [`NextGameStates::Unchanged`].
    pub fn take(&mut self) -> Option<GameStates> {
        match std::mem::take(&mut self.next) {
            NextGameStates::Pending(state) => Some(state),
            NextGameStates::Unchanged => None,
        }
    }
}

/// Present once something asked the game loop to stop.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct QuitRequested;

/// Pause source held while the in-game menu is open.
pub const MENU_PAUSE_SOURCE: &str = "menu";
/// Pause source held while the window is unfocused.
pub const FOCUS_PAUSE_SOURCE: &str = "focus";

/// Active pause sources. The scene is paused while any source is present and
/// only the source that paused it can release it.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseSources {
    sources: FxHashSet<String>,
}

impl PauseSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `source`. Returns true if it was not already held.
    pub fn pause(&mut self, source: &str) -> bool {
        self.sources.insert(source.to_string())
    }

    /// Release `source`. Returns true if it was held.
    pub fn unpause(&mut self, source: &str) -> bool {
        self.sources.remove(source)
    }

    pub fn toggle(&mut self, source: &str) {
        if !self.unpause(source) {
            self.pause(source);
        }
    }

    pub fn is_paused(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn holds(&self, source: &str) -> bool {
        self.sources.contains(source)
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }
}
