use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use snake::config::GameConfig;
use snake::food::FoodSpawner;
use snake::highscore::{FileHighScoreStore, HighScoreStore};
use snake::snake::Snake;
use snake::{Direction, GameOverReason, GameState, Phase, Position, TickResult};

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn started(config: GameConfig, snake: Snake, food: Position) -> GameState {
    let mut state = GameState::with_snake(config, snake, Some(food), FoodSpawner::seeded(17));
    state.start();
    state
}

#[test]
fn test_eating_food_in_front() {
    let snake = Snake::new(p(5, 5), 1, Some(Direction::Right));
    let mut state = started(GameConfig::new(10, 10), snake, p(6, 5));

    assert_eq!(state.tick(), TickResult::Continue(10));
    assert_eq!(state.snake().head(), p(6, 5));
    assert_eq!(state.score(), 10);
    assert_eq!(state.snake().target_len(), 2);

    // The growth shows up on the next move.
    state.tick();
    assert_eq!(state.snake().len(), 2);
}

#[test]
fn test_reversal_keeps_heading() {
    let snake =
        Snake::from_segments(vec![p(5, 5), p(4, 5), p(3, 5)], Some(Direction::Right)).unwrap();
    let mut state = started(GameConfig::new(10, 10), snake, p(0, 0));

    state.set_direction(Direction::Left);
    assert_eq!(state.tick(), TickResult::Continue(0));
    assert_eq!(state.snake().head(), p(6, 5));
    assert_eq!(state.snake().facing(), Some(Direction::Right));
}

#[test]
fn test_wall_ends_game_with_score_kept() {
    let snake = Snake::new(p(0, 5), 1, Some(Direction::Left));
    let mut state = started(GameConfig::new(10, 10), snake, p(7, 7));

    assert_eq!(
        state.tick(),
        TickResult::GameOver { reason: GameOverReason::WallCollision, score: 0 }
    );
    assert_eq!(state.phase(), Phase::GameOver(GameOverReason::WallCollision));
}

#[test]
fn test_filling_the_board_wins() {
    let snake = Snake::from_segments(vec![p(0, 1), p(0, 0), p(1, 0)], Some(Direction::Down)).unwrap();
    let mut state = started(GameConfig::new(2, 2), snake, p(1, 1));
    state.set_direction(Direction::Right);

    match state.tick() {
        TickResult::GameOver { reason, score } => {
            assert!(reason.is_win());
            assert_eq!(score, 10);
        }
        other => panic!("expected a win, got {:?}", other),
    }
    assert_eq!(state.high_score(), 10);
}

#[test]
fn test_spawner_reports_full_board() {
    let snake = Snake::from_segments(vec![p(0, 1), p(0, 0), p(1, 0)], Some(Direction::Down)).unwrap();
    let mut state = started(GameConfig::new(2, 2), snake, p(1, 1));
    state.set_direction(Direction::Right);
    state.tick();

    let mut occupied: HashSet<_> = state.snake().occupied().clone();
    occupied.insert(p(1, 0));
    assert_eq!(FoodSpawner::seeded(1).spawn(&occupied, state.area()), None);
}

#[test]
fn test_inset_walls() {
    let config = GameConfig { inset: 3, ..GameConfig::new(12, 12) };
    let mut state = GameState::with_spawner(config, FoodSpawner::seeded(2), 0);
    state.start();
    state.set_direction(Direction::Up);

    let mut ticks = 0;
    let result = loop {
        ticks += 1;
        match state.tick() {
            TickResult::Continue(_) if ticks < 100 => continue,
            other => break other,
        }
    };

    // Center row 6, top row of the play area 3: three moves, then the wall.
    assert!(matches!(result, TickResult::GameOver { reason: GameOverReason::WallCollision, .. }));
    assert_eq!(state.snake().head(), p(6, 3));
}

#[test]
fn test_random_play_keeps_invariants() {
    let config = GameConfig {
        initial_length: 3,
        initial_direction: Some(Direction::Right),
        ..GameConfig::new(8, 6)
    };
    let mut state = GameState::with_spawner(config, FoodSpawner::seeded(99), 0);
    let mut rng = StdRng::seed_from_u64(1234);
    state.start();

    let mut games = 0;
    let mut best = 0;
    for _ in 0..5_000 {
        if let Some(dir) = Direction::ALL.choose(&mut rng) {
            state.set_direction(*dir);
        }

        match state.tick() {
            TickResult::Continue(score) => {
                let segments: Vec<_> = state.snake().segments().copied().collect();
                let unique: HashSet<_> = segments.iter().copied().collect();
                assert_eq!(unique.len(), segments.len(), "snake overlaps itself");
                assert_eq!(&unique, state.snake().occupied());
                assert!(segments.iter().all(|pos| state.area().contains(*pos)));

                let food = state.food().expect("food while the board has room");
                assert!(!state.snake().contains(food));
                assert!(state.area().contains(food));
                best = best.max(score);
            }
            TickResult::GameOver { score, .. } => {
                let before: Vec<_> = state.snake().segments().copied().collect();
                assert_eq!(state.tick(), TickResult::GameOver { reason: reason_of(&state), score });
                assert_eq!(state.snake().segments().copied().collect::<Vec<_>>(), before);

                games += 1;
                state.restart();
                assert_eq!(state.score(), 0);
            }
        }
    }

    assert!(games > 0);
    assert!(state.high_score() >= best);
}

fn reason_of(state: &GameState) -> GameOverReason {
    match state.phase() {
        Phase::GameOver(reason) => reason,
        other => panic!("not finished: {:?}", other),
    }
}

#[test]
fn test_high_score_survives_restart_of_process() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileHighScoreStore::new(dir.path().join("highscore.txt"));
    assert_eq!(store.load(), 0);

    let snake = Snake::new(p(5, 5), 1, Some(Direction::Right));
    let mut state =
        GameState::with_snake(GameConfig::new(10, 10), snake, Some(p(6, 5)), FoodSpawner::seeded(4));
    state.start();
    state.tick();
    store.save(state.high_score()).unwrap();

    let state = GameState::with_spawner(GameConfig::new(10, 10), FoodSpawner::seeded(4), store.load());
    assert_eq!(state.high_score(), 10);
    assert_eq!(state.score(), 0);
}
