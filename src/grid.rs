use serde::{Deserialize, Serialize};

/// A cell on the canvas, in grid units (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step (dx, dy); rows grow downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// The rectangle of the canvas in which the snake may move and food may appear.
///
/// A bordered layout is an inset rectangle; the default covers the whole canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayArea {
    pub origin: Position,
    pub width: u16,
    pub height: u16,
}

impl PlayArea {
    pub fn new(origin: Position, width: u16, height: u16) -> Self {
        Self { origin, width, height }
    }

    pub fn full(width: u16, height: u16) -> Self {
        Self::new(Position::new(0, 0), width, height)
    }

    /// Shrinks a `width` x `height` canvas by `inset` cells on every side.
    pub fn inset(width: u16, height: u16, inset: u16) -> Self {
        let margin = inset.saturating_mul(2);
        Self::new(
            Position::new(inset as i32, inset as i32),
            width.saturating_sub(margin),
            height.saturating_sub(margin),
        )
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.origin.x
            && pos.x < self.origin.x + self.width as i32
            && pos.y >= self.origin.y
            && pos.y < self.origin.y + self.height as i32
    }

    pub fn center(&self) -> Position {
        Position::new(
            self.origin.x + self.width as i32 / 2,
            self.origin.y + self.height as i32 / 2,
        )
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let (ox, oy) = (self.origin.x, self.origin.y);
        let width = self.width as i32;
        (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Position::new(ox + x, oy + y)))
    }

    /// Maps an index in `0..cell_count()` to its cell, row by row.
    pub fn cell_at(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new(
            self.origin.x + (index % width) as i32,
            self.origin.y + (index / width) as i32,
        )
    }
}
