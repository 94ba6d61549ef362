use std::io;

use crate::game::{GameState, Phase};
use crate::grid::{Direction, Position};

/// What occupies a cell on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Empty,
    Head(Option<Direction>),
    Body,
    Food,
    Border,
    Dead,
}

/// How a line of text is meant to stand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Status,
    /// Something the player has to act on, like a paused game
    Notice,
}

/// A surface addressed in canvas cells.
pub trait Canvas {
    fn draw_cell(&mut self, pos: Position, role: CellRole) -> io::Result<()>;
    fn draw_label(&mut self, pos: Position, text: &str, role: LabelRole) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

/// Draws a game onto a canvas: border, board, and the score line above it.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Renderer
    }

    pub fn render<C: Canvas>(&self, canvas: &mut C, state: &GameState) -> io::Result<()> {
        self.render_border(canvas, state)?;
        self.render_board(canvas, state)?;
        self.render_status(canvas, state)?;
        canvas.present()
    }

    pub fn role_at(&self, state: &GameState, pos: Position) -> CellRole {
        let snake = state.snake();
        let dead = matches!(state.phase(), Phase::GameOver(reason) if !reason.is_win());

        if snake.contains(pos) {
            if dead {
                CellRole::Dead
            } else if pos == snake.head() {
                CellRole::Head(snake.facing())
            } else {
                CellRole::Body
            }
        } else if state.food() == Some(pos) {
            CellRole::Food
        } else {
            CellRole::Empty
        }
    }

    fn render_board<C: Canvas>(&self, canvas: &mut C, state: &GameState) -> io::Result<()> {
        for pos in state.area().cells() {
            canvas.draw_cell(pos, self.role_at(state, pos))?;
        }
        Ok(())
    }

    fn render_border<C: Canvas>(&self, canvas: &mut C, state: &GameState) -> io::Result<()> {
        let area = state.area();
        let (left, top) = (area.origin.x - 1, area.origin.y - 1);
        let right = area.origin.x + area.width as i32;
        let bottom = area.origin.y + area.height as i32;

        for x in left..=right {
            canvas.draw_cell(Position::new(x, top), CellRole::Border)?;
            canvas.draw_cell(Position::new(x, bottom), CellRole::Border)?;
        }
        for y in area.origin.y..bottom {
            canvas.draw_cell(Position::new(left, y), CellRole::Border)?;
            canvas.draw_cell(Position::new(right, y), CellRole::Border)?;
        }
        Ok(())
    }

    fn render_status<C: Canvas>(&self, canvas: &mut C, state: &GameState) -> io::Result<()> {
        let area = state.area();
        let text = status_line(state);
        let width = area.width as usize + 2;
        let padded = format!("{:<width$}", text, width = width);
        let role = match state.phase() {
            Phase::Paused => LabelRole::Notice,
            _ => LabelRole::Status,
        };
        canvas.draw_label(Position::new(area.origin.x - 1, area.origin.y - 2), &padded, role)
    }
}

pub fn status_line(state: &GameState) -> String {
    let suffix = match state.phase() {
        Phase::Paused => "  [paused]",
        _ => "",
    };
    format!("Score: {}  High score: {}{}", state.score(), state.high_score(), suffix)
}
