use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Pause,
    Restart,
    Confirm,
    Quit,
    None,
}

pub fn translate_key(key: &KeyEvent) -> Command {
    if is_ctrl_c(key) {
        return Command::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Command::Move(Direction::Right),

        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Command::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Enter | KeyCode::Char(' ') => Command::Confirm,
        KeyCode::Char('q') | KeyCode::Char('Q') => Command::Quit,

        _ => Command::None,
    }
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}
