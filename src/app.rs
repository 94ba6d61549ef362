use std::io;
use std::thread::sleep;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::food::FoodSpawner;
use crate::game::{GameOverReason, GameState, Phase, TickResult};
use crate::highscore::HighScoreStore;
use crate::input::{translate_key, Command};
use crate::render::Renderer;
use crate::term::TermManager;

const POLL_INTERVAL_MS: u64 = 5;
const MIN_CANVAS: (u16, u16) = (4, 4);

enum Flow {
    Restart,
    Quit,
}

/// The terminal front end: reads keys, ticks the game at the configured pace
/// and draws it.
pub struct App {
    settings: Settings,
    state: GameState,
    store: Box<dyn HighScoreStore>,
    saved_high_score: u32,
    term: TermManager,
    renderer: Renderer,
}

impl App {
    pub fn new(mut settings: Settings, store: Box<dyn HighScoreStore>, seed: Option<u64>) -> Result<Self> {
        let term = TermManager::new()?;
        let (width, height) = term.canvas_size();
        if width < MIN_CANVAS.0 || height < MIN_CANVAS.1 {
            return Err(Error::TerminalTooSmall {
                width,
                height,
                min_width: MIN_CANVAS.0 + 2,
                min_height: MIN_CANVAS.1 + 3,
            });
        }

        if settings.fit_terminal {
            settings.game.canvas_width = width;
            settings.game.canvas_height = height;
        } else if settings.game.canvas_width > width || settings.game.canvas_height > height {
            return Err(Error::TerminalTooSmall {
                width,
                height,
                min_width: settings.game.canvas_width + 2,
                min_height: settings.game.canvas_height + 3,
            });
        }
        settings.validate()?;

        let spawner = seed.map(FoodSpawner::seeded).unwrap_or_default();
        let high_score = store.load();
        let state = GameState::with_spawner(settings.game.clone(), spawner, high_score);

        Ok(App {
            settings,
            state,
            store,
            saved_high_score: high_score,
            term,
            renderer: Renderer::new(),
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.term.setup()?;
        let result = self.run_games();
        self.save_high_score();
        let restored = self.term.restore();
        finish_run(result, restored)
    }

    fn run_games(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            match self.play()? {
                Flow::Restart => self.state.reset(),
                Flow::Quit => return Ok(()),
            }
        }
    }

    /// Returns false if the player quit right away.
    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "Esc or P to pause, R to restart",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(translate_key(&key) != Command::Quit)
    }

    fn play(&mut self) -> Result<Flow> {
        self.term.clear()?;
        self.state.start();
        self.renderer.render(&mut self.term, &self.state)?;
        info!(high_score = self.state.high_score(), "new game");

        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key in self.term.read_key_events_queue()? {
                match translate_key(&key) {
                    Command::Move(dir) => self.state.set_direction(dir),
                    Command::Pause => self.toggle_pause()?,
                    Command::Restart => return Ok(Flow::Restart),
                    Command::Quit => return Ok(Flow::Quit),
                    Command::Confirm | Command::None => {}
                }
            }

            if !self.state.is_running() {
                continue;
            }

            let snake = self.state.snake();
            let heading = snake.pending_direction().or(snake.facing());
            if last_step.elapsed() < self.settings.speed.interval(self.state.foods_eaten(), heading) {
                continue;
            }
            last_step = Instant::now();

            let result = self.state.tick();
            self.renderer.render(&mut self.term, &self.state)?;

            if let TickResult::GameOver { reason, score } = result {
                self.save_high_score();
                return self.game_over(reason, score);
            }
        }
    }

    fn game_over(&mut self, reason: GameOverReason, score: u32) -> Result<Flow> {
        let title = if reason.is_win() { "You won!" } else { "Game over!" };
        let score_line = format!("Score: {}", score);
        let high_line = format!("High score: {}", self.state.high_score());

        self.term.show_message(&[
            title,
            &score_line,
            &high_line,
            "",
            "Press any key to play again,",
            "or Q to quit.",
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        match translate_key(&key) {
            Command::Quit => Ok(Flow::Quit),
            _ => Ok(Flow::Restart),
        }
    }

    fn toggle_pause(&mut self) -> Result<()> {
        self.state.toggle_pause();
        if self.state.is_running() {
            self.term.hide_message()?;
        } else if self.state.phase() == Phase::Paused {
            self.renderer.render(&mut self.term, &self.state)?;
            self.term.show_message(&["Paused", "Press Esc to resume", "or Q to quit"])?;
        }
        Ok(())
    }

    fn save_high_score(&mut self) {
        let high_score = self.state.high_score();
        if high_score <= self.saved_high_score {
            return;
        }

        match self.store.save(high_score) {
            Ok(()) => self.saved_high_score = high_score,
            Err(err) => error!(%err, "failed to save high score"),
        }
    }
}

/// A failed game loop is reported before a failed terminal restore.
fn finish_run(result: Result<()>, restored: io::Result<()>) -> Result<()> {
    match (result, restored) {
        (Err(err), Err(restore_err)) => {
            error!(%restore_err, "failed to restore the terminal");
            Err(err)
        }
        (result, restored) => {
            result?;
            Ok(restored?)
        }
    }
}
