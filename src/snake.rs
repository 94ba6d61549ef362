use std::collections::{HashSet, VecDeque};

use crate::grid::{Direction, Position};
use MoveResult::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Position, old_head: Position, old_tail: Option<Position> },
    /// No facing yet; nothing moved.
    Idle,
    SelfCollision,
}

impl MoveResult {
    pub fn is_collision(&self) -> bool {
        matches!(self, SelfCollision)
    }
}

/// The snake's body, head first.
///
/// `occupied` mirrors `body` so membership checks stay O(1). Both are only
/// touched through `push_head` and `pop_tail`.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    occupied: HashSet<Position>,
    target_len: usize,
    facing: Option<Direction>,
    next_facing: Option<Direction>,
}

impl Snake {
    /// Lays `length` segments in a straight line behind `head`.
    ///
    /// A stationary snake is laid out as if it were facing right.
    pub fn new(head: Position, length: usize, facing: Option<Direction>) -> Self {
        let behind = facing.unwrap_or(Direction::Right).opposite();
        let segments = (0..length.max(1) as i32)
            .map(|i| {
                let (dx, dy) = behind.delta();
                Position::new(head.x + dx * i, head.y + dy * i)
            })
            .collect();

        Self::build(segments, facing)
    }

    /// Builds a snake from explicit segments, head first. Returns `None` for an
    /// empty or self-overlapping body.
    pub fn from_segments(segments: Vec<Position>, facing: Option<Direction>) -> Option<Self> {
        let unique: HashSet<_> = segments.iter().copied().collect();
        if segments.is_empty() || unique.len() != segments.len() {
            return None;
        }

        Some(Self::build(segments.into(), facing))
    }

    fn build(body: VecDeque<Position>, facing: Option<Direction>) -> Self {
        let occupied = body.iter().copied().collect();
        let target_len = body.len();
        Snake { body, occupied, target_len, facing, next_facing: None }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> + '_ {
        self.body.iter()
    }

    pub fn occupied(&self) -> &HashSet<Position> {
        &self.occupied
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.occupied.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Length once every pending growth has been applied.
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn facing(&self) -> Option<Direction> {
        self.facing
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.next_facing
    }

    /// Buffers `direction` for the next step. Reversals are ignored; a later
    /// call before the step replaces an earlier one.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.is_reversal(direction) {
            return;
        }

        self.next_facing = Some(direction);
    }

    fn is_reversal(&self, direction: Direction) -> bool {
        match self.facing {
            Some(facing) => facing.is_opposite(direction),
            // Stationary: only the neck is behind us.
            None => self.body.get(1) == Some(&self.head().offset(direction)),
        }
    }

    /// Where the head would land on the next step, if the snake is moving.
    pub fn next_head(&self) -> Option<Position> {
        self.next_facing.or(self.facing).map(|dir| self.head().offset(dir))
    }

    pub fn grow(&mut self) {
        self.target_len += 1;
    }

    /// Advances one cell. On self-collision nothing is mutated.
    pub fn step(&mut self) -> MoveResult {
        let direction = match self.next_facing.or(self.facing) {
            Some(dir) => dir,
            None => return Idle,
        };

        let old_head = self.head();
        let new_head = old_head.offset(direction);
        if self.collides(new_head) {
            return SelfCollision;
        }

        self.facing = Some(direction);
        self.next_facing = None;

        let old_tail = if self.tail_vacates() { self.pop_tail() } else { None };
        self.push_head(new_head);

        Moved { new_head, old_head, old_tail }
    }

    /// The tail only moves out of the way when no growth is pending.
    fn tail_vacates(&self) -> bool {
        self.body.len() >= self.target_len
    }

    fn collides(&self, pos: Position) -> bool {
        self.occupied.contains(&pos) && !(pos == self.tail() && self.tail_vacates())
    }

    fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
        self.occupied.insert(pos);
    }

    fn pop_tail(&mut self) -> Option<Position> {
        let tail = self.body.pop_back()?;
        self.occupied.remove(&tail);
        Some(tail)
    }
}
