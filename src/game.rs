use tracing::{debug, info};

use crate::config::GameConfig;
use crate::food::FoodSpawner;
use crate::grid::{Direction, PlayArea, Position};
use crate::snake::{MoveResult, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
    /// No free cell left for food: the player won.
    BoardFull,
}

impl GameOverReason {
    pub fn is_win(&self) -> bool {
        matches!(self, GameOverReason::BoardFull)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    Continue(u32),
    GameOver { reason: GameOverReason, score: u32 },
}

/// One game of snake: the snake, the food, and the score.
///
/// The high score is only held in memory here; loading and saving it is up to
/// whoever owns the state.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    area: PlayArea,
    snake: Snake,
    food: Option<Position>,
    spawner: FoodSpawner,
    score: u32,
    high_score: u32,
    foods_eaten: u32,
    steps: u64,
    phase: Phase,
}

impl GameState {
    pub fn new(config: GameConfig, high_score: u32) -> Self {
        Self::with_spawner(config, FoodSpawner::new(), high_score)
    }

    pub fn with_spawner(config: GameConfig, spawner: FoodSpawner, high_score: u32) -> Self {
        let area = config.play_area();
        let snake = initial_snake(&config, &area);
        let mut state = GameState {
            config,
            area,
            snake,
            food: None,
            spawner,
            score: 0,
            high_score,
            foods_eaten: 0,
            steps: 0,
            phase: Phase::NotStarted,
        };
        state.food = state.spawner.spawn(state.snake.occupied(), &state.area);
        state
    }

    /// Starts from an arbitrary snake. Food is spawned unless given; a given
    /// food cell must not lie on the snake.
    pub fn with_snake(
        config: GameConfig,
        snake: Snake,
        food: Option<Position>,
        spawner: FoodSpawner,
    ) -> Self {
        let mut state = Self::with_spawner(config, spawner, 0);
        state.snake = snake;
        state.food = match food {
            Some(pos) if !state.snake.contains(pos) => Some(pos),
            _ => state.spawner.spawn(state.snake.occupied(), &state.area),
        };
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn area(&self) -> &PlayArea {
        &self.area
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn foods_eaten(&self) -> u32 {
        self.foods_eaten
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted {
            info!(area = ?self.area, "game started");
            self.phase = Phase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    /// A direction before the first tick also starts the game.
    pub fn set_direction(&mut self, direction: Direction) {
        match self.phase {
            Phase::NotStarted => {
                self.start();
                self.snake.set_direction(direction);
            }
            Phase::Running => self.snake.set_direction(direction),
            Phase::Paused | Phase::GameOver(_) => {}
        }
    }

    /// Puts a fresh snake in the middle and clears the score. The high score
    /// is kept.
    pub fn reset(&mut self) {
        self.snake = initial_snake(&self.config, &self.area);
        self.food = self.spawner.spawn(self.snake.occupied(), &self.area);
        self.score = 0;
        self.foods_eaten = 0;
        self.steps = 0;
        self.phase = Phase::NotStarted;
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Advances the game by one cell.
    ///
    /// Only a running game changes; a finished game keeps reporting its
    /// result until it is reset.
    pub fn tick(&mut self) -> TickResult {
        match self.phase {
            Phase::Running => {}
            Phase::GameOver(reason) => return TickResult::GameOver { reason, score: self.score },
            Phase::NotStarted | Phase::Paused => return TickResult::Continue(self.score),
        }

        // The body never leaves the area, so a head outside it cannot be a
        // self-collision as well.
        if let Some(next) = self.snake.next_head() {
            if !self.area.contains(next) {
                return self.finish(GameOverReason::WallCollision);
            }
        }

        match self.snake.step() {
            MoveResult::SelfCollision => return self.finish(GameOverReason::SelfCollision),
            MoveResult::Idle => return TickResult::Continue(self.score),
            MoveResult::Moved { new_head, .. } => {
                self.steps += 1;
                if self.food == Some(new_head) && self.eat() {
                    return self.finish(GameOverReason::BoardFull);
                }
            }
        }

        TickResult::Continue(self.score)
    }

    /// Returns true when no food can be placed anymore.
    fn eat(&mut self) -> bool {
        self.score = self.score.saturating_add(self.config.food_reward);
        self.foods_eaten += 1;
        self.snake.grow();
        if self.score > self.high_score {
            self.high_score = self.score;
        }

        self.food = self.spawner.spawn(self.snake.occupied(), &self.area);
        debug!(score = self.score, food = ?self.food, "food eaten");

        // Once the pending growth covers every cell the board is won, even if
        // the tail still leaves a gap this tick.
        if self.snake.target_len() >= self.area.cell_count() {
            self.food = None;
        }
        self.food.is_none()
    }

    fn finish(&mut self, reason: GameOverReason) -> TickResult {
        info!(?reason, score = self.score, high_score = self.high_score, "game over");
        self.phase = Phase::GameOver(reason);
        TickResult::GameOver { reason, score: self.score }
    }
}

fn initial_snake(config: &GameConfig, area: &PlayArea) -> Snake {
    Snake::new(area.center(), config.initial_length, config.initial_direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::*;

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn running(config: GameConfig, snake: Snake, food: Position) -> GameState {
        let mut state = GameState::with_snake(config, snake, Some(food), FoodSpawner::seeded(42));
        state.start();
        state
    }

    #[test]
    fn test_new_game() {
        let state = GameState::with_spawner(GameConfig::new(10, 10), FoodSpawner::seeded(1), 30);
        assert_eq!(state.phase(), Phase::NotStarted);
        assert_eq!(state.score(), 0);
        assert_eq!(state.high_score(), 30);
        assert_eq!(state.snake().head(), p(5, 5));
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().facing(), None);

        let food = state.food().unwrap();
        assert!(!state.snake().contains(food));
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut state = GameState::with_spawner(
            GameConfig { initial_direction: Some(Right), ..GameConfig::new(10, 10) },
            FoodSpawner::seeded(1),
            0,
        );
        assert_eq!(state.tick(), TickResult::Continue(0));
        assert_eq!(state.snake().head(), p(5, 5));
    }

    #[test]
    fn test_direction_starts_game() {
        let mut state = GameState::with_spawner(GameConfig::new(10, 10), FoodSpawner::seeded(1), 0);
        state.set_direction(Up);
        assert_eq!(state.phase(), Phase::Running);
        state.tick();
        assert_eq!(state.snake().head(), p(5, 4));
    }

    #[test]
    fn test_stationary_tick_is_idle() {
        let mut state = GameState::with_spawner(GameConfig::new(10, 10), FoodSpawner::seeded(1), 0);
        state.start();
        assert_eq!(state.tick(), TickResult::Continue(0));
        assert_eq!(state.snake().head(), p(5, 5));
        assert_eq!(state.steps(), 0);
    }

    #[test]
    fn test_eating_scores_and_grows() {
        let snake = Snake::new(p(5, 5), 1, Some(Right));
        let mut state = running(GameConfig::new(10, 10), snake, p(6, 5));

        assert_eq!(state.tick(), TickResult::Continue(10));
        assert_eq!(state.snake().head(), p(6, 5));
        assert_eq!(state.snake().target_len(), 2);
        assert_eq!(state.foods_eaten(), 1);
        assert_eq!(state.high_score(), 10);

        let food = state.food().unwrap();
        assert!(!state.snake().contains(food));
    }

    #[test]
    fn test_high_score_only_rises() {
        let snake = Snake::new(p(5, 5), 1, Some(Right));
        let mut state = GameState::with_snake(
            GameConfig::new(10, 10),
            snake,
            Some(p(6, 5)),
            FoodSpawner::seeded(3),
        );
        state.high_score = 50;
        state.start();
        state.tick();
        assert_eq!(state.score(), 10);
        assert_eq!(state.high_score(), 50);
    }

    #[test]
    fn test_wall_collision_in_inset_area() {
        let config = GameConfig { inset: 2, ..GameConfig::new(10, 10) };
        let snake = Snake::new(p(2, 5), 1, Some(Left));
        let mut state = running(config, snake, p(6, 6));

        assert_eq!(
            state.tick(),
            TickResult::GameOver { reason: GameOverReason::WallCollision, score: 0 }
        );
        assert_eq!(state.snake().head(), p(2, 5));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let snake = Snake::from_segments(
            vec![p(5, 5), p(6, 5), p(6, 6), p(5, 6), p(4, 6)],
            Some(Left),
        )
        .unwrap();
        let mut state = running(GameConfig::new(10, 10), snake, p(0, 0));
        state.set_direction(Down);

        assert_eq!(
            state.tick(),
            TickResult::GameOver { reason: GameOverReason::SelfCollision, score: 0 }
        );
        assert_eq!(state.phase(), Phase::GameOver(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_tick_after_game_over_is_inert() {
        let snake = Snake::new(p(0, 5), 2, Some(Left));
        let mut state = running(GameConfig::new(10, 10), snake, p(6, 6));
        let first = state.tick();

        let before: Vec<_> = state.snake().segments().copied().collect();
        let food = state.food();
        for _ in 0..3 {
            assert_eq!(state.tick(), first);
        }
        assert_eq!(state.snake().segments().copied().collect::<Vec<_>>(), before);
        assert_eq!(state.food(), food);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_pause_suspends_ticks() {
        let snake = Snake::new(p(5, 5), 1, Some(Right));
        let mut state = running(GameConfig::new(10, 10), snake, p(0, 0));
        state.toggle_pause();
        assert_eq!(state.phase(), Phase::Paused);

        state.set_direction(Down);
        state.tick();
        assert_eq!(state.snake().head(), p(5, 5));
        assert_eq!(state.snake().pending_direction(), None);

        state.toggle_pause();
        state.tick();
        assert_eq!(state.snake().head(), p(6, 5));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let snake = Snake::new(p(5, 5), 1, Some(Right));
        let mut state = running(GameConfig::new(10, 10), snake, p(6, 5));
        state.tick();
        state.set_direction(Down);
        state.reset();

        assert_eq!(state.phase(), Phase::NotStarted);
        assert_eq!(state.score(), 0);
        assert_eq!(state.high_score(), 10);
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.snake().target_len(), 1);
        assert_eq!(state.snake().pending_direction(), None);
        assert!(!state.snake().contains(state.food().unwrap()));

        state.restart();
        assert!(state.is_running());
    }

    #[test]
    fn test_huge_reward_saturates_score() {
        let config = GameConfig { food_reward: u32::MAX / 2 + 1, ..GameConfig::new(4, 1) };
        assert!(config.validate().is_ok());

        // Growth already pending, so the cell behind stays covered and the
        // second food can only land ahead.
        let mut snake = Snake::new(p(0, 0), 1, Some(Right));
        snake.grow();
        let mut state = running(config, snake, p(1, 0));
        assert_eq!(state.tick(), TickResult::Continue(u32::MAX / 2 + 1));

        let result = loop {
            match state.tick() {
                TickResult::Continue(_) => continue,
                over => break over,
            }
        };
        assert_eq!(
            result,
            TickResult::GameOver { reason: GameOverReason::BoardFull, score: u32::MAX }
        );
        assert_eq!(state.foods_eaten(), 2);
        assert_eq!(state.high_score(), u32::MAX);
    }

    #[test]
    fn test_board_full_is_a_win() {
        let config = GameConfig::new(2, 2);
        let snake = Snake::from_segments(vec![p(0, 1), p(0, 0), p(1, 0)], Some(Down)).unwrap();
        let mut state = running(config, snake, p(1, 1));
        state.set_direction(Right);

        let result = state.tick();
        assert_eq!(result, TickResult::GameOver { reason: GameOverReason::BoardFull, score: 10 });
        assert!(GameOverReason::BoardFull.is_win());
        assert_eq!(state.food(), None);
    }
}
