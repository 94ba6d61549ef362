use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::style::Stylize;
use crossterm::{cursor, execute, queue, style, terminal};

use crate::grid::{Direction, Position};
use crate::render::{Canvas, CellRole, LabelRole};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const IDLE_HEAD_CHAR: char = '@';
/// Marks buffer cells holding styled text, so plain text always repaints them.
const STYLED_CELL: char = '\0';

/// Screen cell of canvas cell (0, 0): one column for the left border, one row
/// for the score line and one for the top border.
const CANVAS_OFFSET: (i32, i32) = (1, 2);

type ScreenCoords = (u16, u16);

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: ScreenCoords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    /// Canvas cells that fit on screen around the border and score line.
    pub fn canvas_size(&self) -> (u16, u16) {
        (
            self.width.saturating_sub(2 * CANVAS_OFFSET.0 as u16),
            self.height.saturating_sub(CANVAS_OFFSET.1 as u16 + 1),
        )
    }

    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        loop {
            match read()? {
                Event::Key(ev) if ev.kind == KeyEventKind::Press => return Ok(ev),
                _ => {}
            }
        }
    }

    /// Drains every key event that is already queued.
    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(ev) if ev.kind == KeyEventKind::Press => events.push(ev),
                _ => {}
            }
        }

        Ok(events)
    }

    pub fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) + 2) as u16;
        let top_left = (
            (self.width / 2).saturating_sub(msg_width / 2),
            (self.height / 2).saturating_sub(msg_height / 2),
        );

        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> io::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back what the message was covering
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(idx) = self.index((x, y)) {
                    let ch = match self.screen[idx] {
                        STYLED_CELL => ' ',
                        ch => ch,
                    };
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    /// Prints `ch` and remembers it, skipping cells that already show it.
    pub fn print_at(&mut self, pos: ScreenCoords, ch: char) -> io::Result<()> {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };
        if self.screen[idx] == ch {
            return Ok(());
        }

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        self.screen[idx] = ch;
        Ok(())
    }

    /// Prints `ch` in reverse video. The cell is always redrawn.
    pub fn print_styled_at(&mut self, pos: ScreenCoords, ch: char) -> io::Result<()> {
        let idx = match self.index(pos) {
            Some(idx) => idx,
            None => return Ok(()),
        };

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::PrintStyledContent(ch.reverse()))?;
        self.screen[idx] = STYLED_CELL;
        Ok(())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn index(&self, pos: ScreenCoords) -> Option<usize> {
        if pos.0 < self.width && pos.1 < self.height {
            Some(self.width as usize * pos.1 as usize + pos.0 as usize)
        } else {
            None
        }
    }

    fn to_screen(&self, pos: Position) -> Option<ScreenCoords> {
        let (x, y) = (pos.x + CANVAS_OFFSET.0, pos.y + CANVAS_OFFSET.1);
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((x as u16, y as u16))
    }

    // Messages are drawn without touching the buffer, so hiding them can
    // restore whatever was underneath.
    fn print_at_no_save(&mut self, pos: ScreenCoords, ch: char) -> io::Result<()> {
        if self.index(pos).is_none() {
            return Ok(());
        }
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}

impl Canvas for TermManager {
    fn draw_cell(&mut self, pos: Position, role: CellRole) -> io::Result<()> {
        match self.to_screen(pos) {
            Some(screen_pos) => self.print_at(screen_pos, glyph(role)),
            None => Ok(()),
        }
    }

    fn draw_label(&mut self, pos: Position, text: &str, role: LabelRole) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let screen_pos = match self.to_screen(Position::new(pos.x + i as i32, pos.y)) {
                Some(screen_pos) => screen_pos,
                None => continue,
            };
            match role {
                LabelRole::Status => self.print_at(screen_pos, ch)?,
                LabelRole::Notice => self.print_styled_at(screen_pos, ch)?,
            }
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.flush()
    }
}

pub fn glyph(role: CellRole) -> char {
    match role {
        CellRole::Empty => ' ',
        CellRole::Head(facing) => head_char(facing),
        CellRole::Body => SNAKE_BODY_CHAR,
        CellRole::Food => FOOD_CHAR,
        CellRole::Border => '#',
        CellRole::Dead => DEAD_SNAKE_CHAR,
    }
}

fn head_char(facing: Option<Direction>) -> char {
    match facing {
        Some(Direction::Up) => '^',
        Some(Direction::Down) => 'v',
        Some(Direction::Left) => '<',
        Some(Direction::Right) => '>',
        None => IDLE_HEAD_CHAR,
    }
}
