//! Tile-resolution occupancy grid.
//!
//! Built once from the scene's `collision` tile layer (any non-zero gid is
//! solid) and read by the ground and wall tests during logic steps. Cells
//! outside the grid are reported as solid, so both map edges and the area
//! below the map behave like walls and floor.

use crate::components::bodyrect::BodyRect;
use crate::components::physics::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollisionMap {
    width: u32,
    height: u32,
    tile_width: i32,
    tile_height: i32,
    cells: Vec<bool>,
}

impl CollisionMap {
    /// Empty grid of `width`×`height` tiles.
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width,
            height,
            tile_width: tile_width.max(1) as i32,
            tile_height: tile_height.max(1) as i32,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// Grid from row-major gids; `gids.len()` must equal `width * height`.
    pub fn from_gids(
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        gids: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut map = Self::new(width, height, tile_width, tile_height);
        for (cell, gid) in map.cells.iter_mut().zip(gids) {
            *cell = gid != 0;
        }
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_solid(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = solid;
        }
    }

    /// Solid test in tile coordinates; anything outside the grid is solid.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return true;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Tile columns covered by the box (at least one).
    fn column_span(&self, rect: &BodyRect) -> (i32, i32) {
        let first = rect.x.div_euclid(self.tile_width);
        let last = (rect.right() - 1).div_euclid(self.tile_width).max(first);
        (first, last)
    }

    /// Tile rows covered by the box (at least one).
    fn row_span(&self, rect: &BodyRect) -> (i32, i32) {
        let first = rect.y.div_euclid(self.tile_height);
        let last = (rect.bottom() - 1).div_euclid(self.tile_height).max(first);
        (first, last)
    }

    /// True when any cell of the row directly below the box is solid.
    pub fn collides_ground(&self, rect: &BodyRect) -> bool {
        let row = rect.bottom().div_euclid(self.tile_height);
        if row < 0 {
            return false;
        }
        let (first, last) = self.column_span(rect);
        (first..=last).any(|x| self.column_in_range(x) && self.is_solid(x, row))
            || row >= self.height as i32
    }

    /// True when any cell of the column just past the box's leading edge is
    /// solid. Only horizontal directions can hit walls.
    pub fn collides_wall(&self, direction: Direction, rect: &BodyRect) -> bool {
        let column = match direction {
            Direction::Right => rect.right().div_euclid(self.tile_width),
            Direction::Left => (rect.x - 1).div_euclid(self.tile_width),
            Direction::Up | Direction::Down => return false,
        };
        let (first, last) = self.row_span(rect);
        (first..=last).any(|y| self.is_solid(column, y.max(0)))
    }

    fn column_in_range(&self, x: i32) -> bool {
        x >= 0 && x < self.width as i32
    }

    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }
}
