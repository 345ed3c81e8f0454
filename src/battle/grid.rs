//! Sphere grid for the puzzle half of the battle.
//!
//! Storage is a flat vector addressed by `x + y * GRID_W`; every piece of
//! game logic addresses cells by `(x, y)` and goes through [`Grid::get`],
//! which returns `None` outside the board instead of panicking.

use serde::Serialize;

use super::rng::{pick, RandomSource};

pub const GRID_W: usize = 8;
pub const GRID_H: usize = 9;

/// Resource kinds a sphere can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SphereType {
    Red,
    Cyan,
    Green,
    Yellow,
    Key,
}

pub const SPHERE_TYPES: [SphereType; 5] = [
    SphereType::Red,
    SphereType::Cyan,
    SphereType::Green,
    SphereType::Yellow,
    SphereType::Key,
];

impl SphereType {
    /// Position in [`SPHERE_TYPES`]; used to index per-type counters.
    pub fn index(self) -> usize {
        match self {
            SphereType::Red => 0,
            SphereType::Cyan => 1,
            SphereType::Green => 2,
            SphereType::Yellow => 3,
            SphereType::Key => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SphereType::Red => "Red",
            SphereType::Cyan => "Cyan",
            SphereType::Green => "Green",
            SphereType::Yellow => "Yellow",
            SphereType::Key => "Key",
        }
    }
}

/// Cardinal direction on the grid. Up is towards row 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    /// Delta (dx, dy) for this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// In-bounds grid coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub x: usize,
    pub y: usize,
}

impl GridPos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn index(self) -> usize {
        self.x + self.y * GRID_W
    }

    pub fn in_bounds(self) -> bool {
        self.x < GRID_W && self.y < GRID_H
    }

    /// Neighbour one step in `direction`, or `None` when that leaves the grid.
    pub fn step(self, direction: Direction) -> Option<GridPos> {
        let (dx, dy) = direction.delta();
        let nx = self.x as i32 + dx;
        let ny = self.y as i32 + dy;
        if nx < 0 || ny < 0 || nx >= GRID_W as i32 || ny >= GRID_H as i32 {
            return None;
        }
        Some(GridPos::new(nx as usize, ny as usize))
    }

    /// Move by (dx, dy), clamped to the grid.
    pub fn clamped_offset(self, dx: i32, dy: i32) -> GridPos {
        let nx = (self.x as i32 + dx).clamp(0, GRID_W as i32 - 1) as usize;
        let ny = (self.y as i32 + dy).clamp(0, GRID_H as i32 - 1) as usize;
        GridPos::new(nx, ny)
    }
}

/// A single board cell. `sphere` is only `None` between clear and refill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub pos: GridPos,
    pub sphere: Option<SphereType>,
}

impl Cell {
    pub fn index(&self) -> usize {
        self.pos.index()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Option<SphereType>>,
}

impl Grid {
    /// Build a grid from rows, top row first. Missing cells stay empty.
    pub fn from_rows(rows: &[[Option<SphereType>; GRID_W]]) -> Self {
        let mut grid = Self::empty();
        for (y, row) in rows.iter().enumerate().take(GRID_H) {
            for (x, sphere) in row.iter().enumerate() {
                grid.cells[x + y * GRID_W] = *sphere;
            }
        }
        grid
    }

    pub fn empty() -> Self {
        Self {
            cells: vec![None; GRID_W * GRID_H],
        }
    }

    /// Fill every cell with a uniformly chosen sphere, row by row.
    pub fn random(rng: &mut dyn RandomSource) -> Self {
        let mut grid = Self::empty();
        for y in 0..GRID_H {
            for x in 0..GRID_W {
                grid.cells[x + y * GRID_W] = pick(rng, &SPHERE_TYPES);
            }
        }
        grid
    }

    /// Cell at (x, y), or `None` outside `[0, GRID_W) x [0, GRID_H)`.
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= GRID_W as i32 || y >= GRID_H as i32 {
            return None;
        }
        let pos = GridPos::new(x as usize, y as usize);
        Some(Cell {
            pos,
            sphere: self.cells[pos.index()],
        })
    }

    pub fn at(&self, pos: GridPos) -> Option<Cell> {
        self.get(pos.x as i32, pos.y as i32)
    }

    /// Sphere at `pos`; `None` for empty or out-of-bounds cells.
    pub fn sphere(&self, pos: GridPos) -> Option<SphereType> {
        self.at(pos).and_then(|c| c.sphere)
    }

    /// Write a cell. Returns false (and does nothing) outside the grid.
    pub fn set(&mut self, x: usize, y: usize, sphere: Option<SphereType>) -> bool {
        let pos = GridPos::new(x, y);
        if !pos.in_bounds() {
            return false;
        }
        self.cells[pos.index()] = sphere;
        true
    }

    /// Exchange the contents of two cells.
    pub fn swap(&mut self, a: GridPos, b: GridPos) -> bool {
        if !a.in_bounds() || !b.in_bounds() {
            return false;
        }
        self.cells.swap(a.index(), b.index());
        true
    }

    /// Column `x`, top to bottom.
    pub fn column(&self, x: usize) -> Vec<Option<SphereType>> {
        (0..GRID_H).map(|y| self.cells[x + y * GRID_W]).collect()
    }

    pub fn set_column(&mut self, x: usize, column: &[Option<SphereType>]) {
        for (y, sphere) in column.iter().enumerate().take(GRID_H) {
            self.cells[x + y * GRID_W] = *sphere;
        }
    }

    /// All cells in storage order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().enumerate().map(|(i, sphere)| Cell {
            pos: GridPos::new(i % GRID_W, i / GRID_W),
            sphere: *sphere,
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}
