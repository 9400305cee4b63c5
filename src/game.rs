use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::food::pick_random_free_cell;
use crate::input::Direction;
use crate::observer::{FoodObserver, SnakeObserver};
use crate::point::{Bounds, Point};
use crate::snake::Snake;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
    Victory,
}

/// Why a game ended in a loss.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    Obstacle,
    SelfCollision,
}

/// What occupies a single board cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CellKind {
    Obstacle,
    SnakeHead,
    SnakeBody,
    Food,
    Empty,
}

/// Complete state of one game on a fixed toroidal board.
pub struct Game {
    bounds: Bounds,
    snake: Snake,
    obstacles: HashSet<Point>,
    food: Option<Point>,
    score: u32,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    tick_count: u64,
    rng: StdRng,
    food_observer: Option<Box<dyn FoodObserver>>,
}

impl Game {
    /// Creates an obstacle-free game seeded from the OS.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self::with_obstacles(bounds, [], StdRng::from_entropy())
    }

    /// Creates a deterministic obstacle-free game for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: Bounds, seed: u64) -> Self {
        Self::with_obstacles(bounds, [], StdRng::seed_from_u64(seed))
    }

    /// Creates a game with a static obstacle set and the default one-cell snake.
    #[must_use]
    pub fn with_obstacles(
        bounds: Bounds,
        obstacles: impl IntoIterator<Item = Point>,
        rng: StdRng,
    ) -> Self {
        Self::from_parts(Snake::new(bounds), obstacles, rng)
    }

    /// Creates a game around an existing snake.
    ///
    /// Food is placed after the obstacles are in, so it never starts on one.
    /// Panics if an obstacle overlaps the snake.
    #[must_use]
    pub fn from_parts(
        snake: Snake,
        obstacles: impl IntoIterator<Item = Point>,
        mut rng: StdRng,
    ) -> Self {
        let bounds = snake.bounds();
        let obstacles: HashSet<Point> = obstacles.into_iter().collect();
        assert!(
            obstacles.iter().all(|obstacle| !snake.contains(*obstacle)),
            "obstacles must not overlap the snake"
        );

        let food = pick_random_free_cell(&mut rng, bounds, &snake, &obstacles);
        debug!(?food, obstacles = obstacles.len(), "initial food placed");

        Self {
            bounds,
            snake,
            obstacles,
            food,
            score: 0,
            status: GameStatus::Playing,
            death_reason: None,
            tick_count: 0,
            rng,
            food_observer: None,
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// Returns `false` once the game has ended, either on this tick or
    /// earlier. Ticking a finished game changes nothing.
    pub fn tick(&mut self, requested: Option<Direction>) -> bool {
        if self.status != GameStatus::Playing {
            debug!(status = ?self.status, "tick ignored on finished game");
            return false;
        }

        self.tick_count += 1;

        if let Some(direction) = requested {
            let _ = self.snake.update_direction(direction);
        }

        let next = self.snake.next_head();

        if self.obstacles.contains(&next) {
            self.end(DeathReason::Obstacle);
            return false;
        }

        if Some(next) == self.food {
            self.score += 1;
            self.snake.grow(next);
            self.food =
                pick_random_free_cell(&mut self.rng, self.bounds, &self.snake, &self.obstacles);
            if self.food.is_none() {
                self.status = GameStatus::Victory;
                info!(score = self.score, ticks = self.tick_count, "board filled, victory");
            } else {
                debug!(food = ?self.food, score = self.score, "food eaten");
            }

            self.notify_food();
            return self.status == GameStatus::Playing;
        }

        // The tail leaves before the collision check, so chasing it is legal.
        let _ = self.snake.remove_tail();
        if self.snake.contains(next) {
            self.end(DeathReason::SelfCollision);
            return false;
        }

        self.snake.grow(next);
        true
    }

    fn end(&mut self, reason: DeathReason) {
        self.status = GameStatus::GameOver;
        self.death_reason = Some(reason);
        info!(
            ?reason,
            score = self.score,
            length = self.snake.len(),
            ticks = self.tick_count,
            "game over"
        );
    }

    /// Reports what occupies `(x, y)`, wrapping the coordinates onto the board.
    #[must_use]
    pub fn classify(&self, x: i32, y: i32) -> CellKind {
        let point = self.bounds.point(x, y);

        if self.obstacles.contains(&point) {
            CellKind::Obstacle
        } else if self.snake.contains(point) {
            if point == self.snake.head() {
                CellKind::SnakeHead
            } else {
                CellKind::SnakeBody
            }
        } else if Some(point) == self.food {
            CellKind::Food
        } else {
            CellKind::Empty
        }
    }

    /// Replaces the food position and notifies the food observer.
    ///
    /// No occupancy check is made; scenarios may place food anywhere.
    pub fn set_food(&mut self, food: Option<Point>) {
        self.food = food;
        self.notify_food();
    }

    /// Registers the food observer and immediately reports the current food.
    pub fn set_food_observer(&mut self, observer: Box<dyn FoodObserver>) {
        self.food_observer = Some(observer);
        self.notify_food();
    }

    /// Registers the observer for snake growth and tail removal.
    pub fn set_snake_observer(&mut self, observer: Box<dyn SnakeObserver>) {
        self.snake.set_observer(observer);
    }

    /// Registers one shared observer for both snake and food notifications.
    pub fn set_observer<O>(&mut self, observer: Rc<RefCell<O>>)
    where
        O: SnakeObserver + FoodObserver + 'static,
    {
        self.set_snake_observer(Box::new(Rc::clone(&observer)));
        self.set_food_observer(Box::new(observer));
    }

    fn notify_food(&mut self) {
        if let Some(mut observer) = self.food_observer.take() {
            observer.on_food_changed(self, self.food);
            self.food_observer = Some(observer);
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    #[must_use]
    pub fn is_victory(&self) -> bool {
        self.status == GameStatus::Victory
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    #[must_use]
    pub fn current_direction(&self) -> Direction {
        self.snake.direction()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn food(&self) -> Option<Point> {
        self.food
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn obstacles(&self) -> &HashSet<Point> {
        &self.obstacles
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("bounds", &self.bounds)
            .field("snake", &self.snake)
            .field("obstacles", &self.obstacles.len())
            .field("food", &self.food)
            .field("score", &self.score)
            .field("status", &self.status)
            .field("death_reason", &self.death_reason)
            .field("tick_count", &self.tick_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::input::Direction;
    use crate::observer::{CellEvent, EventLog};
    use crate::point::Bounds;
    use crate::snake::Snake;

    use super::{CellKind, DeathReason, Game, GameStatus};

    fn game_with(snake: Snake, obstacles: Vec<crate::point::Point>) -> Game {
        Game::from_parts(snake, obstacles, StdRng::seed_from_u64(11))
    }

    #[test]
    fn new_game_places_food_off_the_snake() {
        let game = Game::new_with_seed(Bounds::new(10, 10), 1);

        let food = game.food().expect("fresh board has room for food");
        assert!(!game.snake().contains(food));
        assert_eq!(game.score(), 0);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn plain_move_keeps_length() {
        let bounds = Bounds::new(10, 10);
        let mut game = game_with(Snake::new(bounds), vec![]);
        game.set_food(Some(bounds.point(9, 9)));

        assert!(game.tick(None));

        assert_eq!(game.snake().head(), bounds.point(1, 5));
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn eating_grows_and_scores_once() {
        let bounds = Bounds::new(10, 10);
        let mut game = game_with(Snake::new(bounds), vec![]);
        game.set_food(Some(bounds.point(1, 5)));

        assert!(game.tick(None));
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake().len(), 2);
        assert_ne!(game.food(), Some(bounds.point(1, 5)));

        game.set_food(Some(bounds.point(9, 9)));
        assert!(game.tick(None));
        assert_eq!(game.score(), 1);
        assert_eq!(game.snake().len(), 2);
    }

    #[test]
    fn obstacle_ends_game_without_victory() {
        let bounds = Bounds::new(5, 5);
        let mut game = game_with(Snake::new(bounds), vec![bounds.point(1, 2)]);

        assert!(!game.tick(None));

        assert!(game.is_game_over());
        assert!(!game.is_victory());
        assert_eq!(game.death_reason(), Some(DeathReason::Obstacle));
    }

    #[test]
    fn obstacle_check_runs_before_food() {
        let bounds = Bounds::new(5, 5);
        let mut game = game_with(Snake::new(bounds), vec![bounds.point(1, 2)]);
        game.set_food(Some(bounds.point(1, 2)));

        assert!(!game.tick(None));

        assert_eq!(game.score(), 0);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.death_reason(), Some(DeathReason::Obstacle));
    }

    #[test]
    fn running_into_body_is_self_collision() {
        let bounds = Bounds::new(6, 6);
        let snake = Snake::from_segments(
            bounds,
            vec![
                bounds.point(3, 2),
                bounds.point(3, 3),
                bounds.point(2, 3),
                bounds.point(1, 3),
                bounds.point(1, 2),
                bounds.point(2, 2),
            ],
            Direction::Left,
        );
        let mut game = game_with(snake, vec![]);
        game.set_food(Some(bounds.point(5, 5)));

        assert!(!game.tick(Some(Direction::Down)));

        assert_eq!(game.status(), GameStatus::GameOver);
        assert_eq!(game.death_reason(), Some(DeathReason::SelfCollision));
    }

    #[test]
    fn reversal_request_is_ignored() {
        let bounds = Bounds::new(10, 10);
        let mut game = game_with(Snake::new(bounds), vec![]);
        game.set_food(Some(bounds.point(9, 9)));

        assert!(game.tick(Some(Direction::Left)));

        assert_eq!(game.current_direction(), Direction::Right);
        assert_eq!(game.snake().head(), bounds.point(1, 5));
    }

    #[test]
    fn tick_after_game_over_is_a_no_op() {
        let bounds = Bounds::new(5, 5);
        let mut game = game_with(Snake::new(bounds), vec![bounds.point(1, 2)]);
        assert!(!game.tick(None));
        let ticks = game.tick_count();

        assert!(!game.tick(Some(Direction::Up)));

        assert_eq!(game.tick_count(), ticks);
        assert_eq!(game.current_direction(), Direction::Right);
        assert_eq!(game.snake().head(), bounds.point(0, 2));
    }

    #[test]
    fn filling_the_board_is_victory() {
        let bounds = Bounds::new(3, 1);
        let snake = Snake::from_segments(bounds, vec![bounds.point(0, 0)], Direction::Right);
        let mut game = game_with(snake, vec![bounds.point(2, 0)]);
        assert_eq!(game.food(), Some(bounds.point(1, 0)));

        assert!(!game.tick(None));

        assert!(game.is_game_over());
        assert!(game.is_victory());
        assert_eq!(game.food(), None);
        assert_eq!(game.score(), 1);
        assert_eq!(game.death_reason(), None);
    }

    #[test]
    fn classify_reports_every_cell_kind() {
        let bounds = Bounds::new(5, 5);
        let snake = Snake::from_segments(
            bounds,
            vec![bounds.point(0, 0), bounds.point(1, 0)],
            Direction::Right,
        );
        let mut game = game_with(snake, vec![bounds.point(4, 4)]);
        game.set_food(Some(bounds.point(2, 2)));

        assert_eq!(game.classify(4, 4), CellKind::Obstacle);
        assert_eq!(game.classify(-1, -1), CellKind::Obstacle);
        assert_eq!(game.classify(1, 0), CellKind::SnakeHead);
        assert_eq!(game.classify(0, 0), CellKind::SnakeBody);
        assert_eq!(game.classify(2, 2), CellKind::Food);
        assert_eq!(game.classify(3, 3), CellKind::Empty);
    }

    #[test]
    fn notifications_follow_tick_order() {
        let bounds = Bounds::new(6, 6);
        let log = Rc::new(RefCell::new(EventLog::new()));
        let mut game = game_with(Snake::new(bounds), vec![]);
        game.set_food(Some(bounds.point(1, 3)));
        game.set_observer(Rc::clone(&log));
        assert_eq!(
            log.borrow_mut().drain(),
            vec![CellEvent::FoodChanged(Some(bounds.point(1, 3)))]
        );

        game.tick(None);
        let eat = log.borrow_mut().drain();
        assert_eq!(eat[0], CellEvent::SnakeGrew(bounds.point(1, 3)));
        assert!(matches!(eat[1], CellEvent::FoodChanged(Some(_))));
        assert_eq!(eat.len(), 2);

        game.set_food(Some(bounds.point(5, 5)));
        log.borrow_mut().drain();
        game.tick(None);
        assert_eq!(
            log.borrow_mut().drain(),
            vec![
                CellEvent::TailRemoved(bounds.point(0, 3)),
                CellEvent::SnakeGrew(bounds.point(2, 3)),
            ]
        );
    }

    #[test]
    fn body_stays_unique_over_a_long_run() {
        let bounds = Bounds::new(7, 5);
        let mut game = Game::new_with_seed(bounds, 3);
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

        for step in 0..500 {
            let requested = (step % 3 == 0).then(|| turns[(step / 3) % turns.len()]);
            if !game.tick(requested) {
                break;
            }

            let unique: HashSet<_> = game.snake().segments().collect();
            assert_eq!(unique.len(), game.snake().len());
        }
    }

    #[test]
    #[should_panic(expected = "obstacles must not overlap the snake")]
    fn obstacle_on_snake_is_rejected() {
        let bounds = Bounds::new(4, 4);
        let _ = game_with(Snake::new(bounds), vec![bounds.point(0, 2)]);
    }
}
