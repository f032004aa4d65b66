//! Toroidal cell grid
//!
//! Owns all positional occupancy. Coordinates wrap on both axes, so every
//! lookup is total: callers never see an out-of-bounds position.

use glam::{IVec2, UVec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::Direction;
use super::cell::{BonusKind, Cell};
use super::pick_weighted;
use crate::error::ArenaError;

/// Bonus draw table, one entry per outcome with its weight out of 50.
/// `None` means nothing spawns this tick.
pub const BONUS_DRAWS: [(Option<BonusKind>, u32); 3] = [
    (None, 46),
    (Some(BonusKind::Good), 2),
    (Some(BonusKind::Mild), 2),
];

/// Inclusive axis-aligned rectangle of wall cells.
/// Corners may lie outside the grid; those cells are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallRect {
    pub bottom_left: IVec2,
    pub top_right: IVec2,
}

impl WallRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            bottom_left: IVec2::new(x0, y0),
            top_right: IVec2::new(x1, y1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    /// Row-major, row 0 at the bottom
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Result<Self, ArenaError> {
        if width == 0 || height == 0 {
            return Err(ArenaError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    fn index(&self, pos: UVec2) -> usize {
        let x = pos.x % self.width;
        let y = pos.y % self.height;
        (y * self.width + x) as usize
    }

    pub fn get(&self, pos: UVec2) -> Cell {
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: UVec2, cell: Cell) {
        let i = self.index(pos);
        self.cells[i] = cell;
    }

    pub fn clear(&mut self, pos: UVec2) {
        self.set(pos, Cell::Empty);
    }

    /// Wrap an arbitrary signed coordinate onto the torus
    pub fn wrap(&self, pos: IVec2) -> UVec2 {
        UVec2::new(
            pos.x.rem_euclid(self.width as i32) as u32,
            pos.y.rem_euclid(self.height as i32) as u32,
        )
    }

    /// Cell `distance` steps from `pos` along `dir`, wrapping around edges
    pub fn offset(&self, pos: UVec2, dir: Direction, distance: u32) -> UVec2 {
        let target = pos.as_ivec2() + dir.delta() * distance as i32;
        self.wrap(target)
    }

    /// Neighbouring cell along `dir`
    pub fn step(&self, pos: UVec2, dir: Direction) -> UVec2 {
        self.offset(pos, dir, 1)
    }

    /// Pick a random start, then scan row by row (wrapping on both axes)
    /// for the first empty cell. `None` when the grid is full.
    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<UVec2> {
        let start_x = rng.random_range(0..self.width);
        let start_y = rng.random_range(0..self.height);
        for dy in 0..self.height {
            let y = (start_y + dy) % self.height;
            for dx in 0..self.width {
                let x = (start_x + dx) % self.width;
                let pos = UVec2::new(x, y);
                if self.get(pos).is_empty() {
                    return Some(pos);
                }
            }
        }
        None
    }

    /// Turn every in-range cell of `rect` into wall. Returns how many cells were set.
    pub fn place_wall(&mut self, rect: WallRect) -> usize {
        let lo = rect.bottom_left.min(rect.top_right).max(IVec2::ZERO);
        let hi = rect
            .bottom_left
            .max(rect.top_right)
            .min(IVec2::new(self.width as i32 - 1, self.height as i32 - 1));
        let mut placed = 0;
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                self.set(UVec2::new(x as u32, y as u32), Cell::Wall);
                placed += 1;
            }
        }
        placed
    }

    /// Maybe drop a bonus on a random empty cell.
    /// Returns where and what was placed; `None` if the draw was empty or
    /// the grid has no room.
    pub fn spawn_bonus<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(UVec2, BonusKind)> {
        let kind = pick_weighted(rng, &BONUS_DRAWS)?;
        match self.random_empty_cell(rng) {
            Some(pos) => {
                self.set(pos, Cell::bonus(kind));
                Some((pos, kind))
            }
            None => {
                log::warn!("No empty cell for {:?} bonus, skipping", kind);
                None
            }
        }
    }

    /// Number of cells matching `pred`
    pub fn count(&self, pred: impl Fn(&Cell) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}
