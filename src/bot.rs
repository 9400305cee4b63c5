//! Reactive autopilot.
//!
//! The bot only looks at the four cells around the head. It avoids immediate
//! collisions and otherwise heads for the food along a shared row or column;
//! it never plans a path around obstacles further away.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::game::Game;
use crate::input::Direction;

/// Tie-break order when exactly one neighbour is safe.
const SINGLE_EXIT_PRECEDENCE: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Anything that can pick the direction for the next tick.
pub trait Controller {
    fn next_direction(&mut self, game: &Game) -> Option<Direction>;
}

/// [`choose_direction`] with its own RNG and mutation probability.
#[derive(Debug, Clone)]
pub struct Bot {
    mutation_probability: f64,
    rng: StdRng,
}

impl Bot {
    #[must_use]
    pub fn new(mutation_probability: f64) -> Self {
        Self::with_rng(mutation_probability, StdRng::from_entropy())
    }

    #[must_use]
    pub fn new_with_seed(mutation_probability: f64, seed: u64) -> Self {
        Self::with_rng(mutation_probability, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(mutation_probability: f64, rng: StdRng) -> Self {
        Self {
            mutation_probability,
            rng,
        }
    }
}

impl Controller for Bot {
    fn next_direction(&mut self, game: &Game) -> Option<Direction> {
        choose_direction(game, self.mutation_probability, &mut self.rng)
    }
}

/// Picks a direction for the next tick from the cells around the head.
///
/// `None` means "keep going": the food is diagonal to the head (or gone) and
/// no mutation fired.
pub fn choose_direction<R: Rng + ?Sized>(
    game: &Game,
    mutation_probability: f64,
    rng: &mut R,
) -> Option<Direction> {
    let unsafe_directions = unsafe_directions(game);

    match unsafe_directions.len() {
        4 => Some(Direction::Left),
        3 => SINGLE_EXIT_PRECEDENCE
            .into_iter()
            .find(|direction| !unsafe_directions.contains(direction)),
        2 => {
            let safe: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|direction| !unsafe_directions.contains(direction))
                .collect();
            safe.choose(rng).copied()
        }
        _ => {
            if mutation_fires(mutation_probability, rng) {
                let reverse = game.current_direction().opposite();
                let candidates: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|direction| *direction != reverse)
                    .collect();
                return candidates.choose(rng).copied();
            }

            toward_food(game)
        }
    }
}

/// Directions whose neighbour cell is snake or obstacle.
#[must_use]
pub fn unsafe_directions(game: &Game) -> Vec<Direction> {
    let head = game.snake().head();
    let bounds = game.bounds();

    Direction::ALL
        .into_iter()
        .filter(|direction| {
            let neighbour = head.step(*direction, bounds);
            game.snake().contains(neighbour) || game.obstacles().contains(&neighbour)
        })
        .collect()
}

// Roll is uniform in [0, 1) and compared with `<=`; zero never mutates.
fn mutation_fires<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> bool {
    if probability <= 0.0 {
        return false;
    }

    rng.gen_range(0.0..1.0) <= probability
}

fn toward_food(game: &Game) -> Option<Direction> {
    let food = game.food()?;
    let head = game.snake().head();

    if head.x() == food.x() {
        if head.y() > food.y() {
            return Some(Direction::Up);
        }
        if head.y() < food.y() {
            return Some(Direction::Down);
        }
    } else if head.y() == food.y() {
        if head.x() > food.x() {
            return Some(Direction::Left);
        }
        if head.x() < food.x() {
            return Some(Direction::Right);
        }
    }

    None
}
