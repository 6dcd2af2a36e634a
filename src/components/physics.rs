//! Per-entity motion state.
//!
//! [`Physics`] holds the held [`Directions`], visual [`Facing`], horizontal
//! momentum and gravity factor, and an explicit [`MotionState`]. The physics
//! system reads and updates it once per logic step; input handlers call
//! [`Physics::add_direction`] / [`Physics::remove_direction`].
//!
//! The animation mode an entity should show is derived from this state by
//! [`Physics::motion_mode`], never the other way round.

use bevy_ecs::prelude::Component;

/// A single direction key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn bit(self) -> u8 {
        match self {
            Direction::Left => Directions::LEFT.0,
            Direction::Right => Directions::RIGHT.0,
            Direction::Up => Directions::UP.0,
            Direction::Down => Directions::DOWN.0,
        }
    }

    /// The direction on the same axis pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Bitset of held directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Directions(u8);

impl Directions {
    pub const NONE: Directions = Directions(0);
    pub const LEFT: Directions = Directions(1);
    pub const RIGHT: Directions = Directions(1 << 1);
    pub const UP: Directions = Directions(1 << 2);
    pub const DOWN: Directions = Directions(1 << 3);

    pub fn contains(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn remove(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held horizontal direction, if any.
    pub fn horizontal(self) -> Option<Direction> {
        if self.contains(Direction::Left) {
            Some(Direction::Left)
        } else if self.contains(Direction::Right) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MotionState {
    #[default]
    Grounded,
    Falling,
}

pub const MODE_IDLE: &str = "idle";
pub const MODE_RUN: &str = "run";
pub const MODE_FALL: &str = "fall";

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Physics {
    pub directions: Directions,
    pub facing: Facing,
    /// Current horizontal speed in pixels per logic step.
    pub momentum: i32,
    /// Momentum applied when a direction is pressed.
    pub base_momentum: i32,
    /// Gravity factor; 0 disables falling.
    pub gravity: i32,
    pub state: MotionState,
}

impl Default for Physics {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Physics {
    pub fn new(base_momentum: i32, gravity: i32) -> Self {
        Self {
            directions: Directions::NONE,
            facing: Facing::Right,
            momentum: 0,
            base_momentum,
            gravity,
            state: MotionState::Grounded,
        }
    }

    pub fn is_falling(&self) -> bool {
        self.state == MotionState::Falling
    }

    /// Press `dir`: the opposite direction on the same axis is released first,
    /// so the most recent press always wins.
    pub fn add_direction(&mut self, dir: Direction) {
        self.directions.remove(dir.opposite());
        self.directions.insert(dir);
        match dir {
            Direction::Left => self.facing = Facing::Left,
            Direction::Right => self.facing = Facing::Right,
            Direction::Up | Direction::Down => {}
        }
        self.momentum = self.base_momentum;
    }

    /// Release `dir`. Momentum drops to zero only when nothing is held.
    pub fn remove_direction(&mut self, dir: Direction) {
        self.directions.remove(dir);
        if self.directions.is_empty() {
            self.momentum = 0;
        }
    }

    /// Signed horizontal displacement for this step.
    pub fn lateral_step(&self) -> i32 {
        match self.directions.horizontal() {
            Some(Direction::Left) => -self.momentum,
            Some(_) => self.momentum,
            None => 0,
        }
    }

    /// Animation mode matching the current state.
    pub fn motion_mode(&self) -> &'static str {
        if self.is_falling() {
            MODE_FALL
        } else if self.directions.horizontal().is_some() {
            MODE_RUN
        } else {
            MODE_IDLE
        }
    }
}
