use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::bot::{Bot, Controller};
use crate::config::GameConfig;
use crate::game::{DeathReason, Game, GameStatus};

/// How a single unattended game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameSummary {
    pub score: u32,
    pub length: usize,
    pub ticks: u64,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
}

impl GameSummary {
    fn from_game(game: &Game) -> Self {
        Self {
            score: game.score(),
            length: game.snake().len(),
            ticks: game.tick_count(),
            status: game.status(),
            death_reason: game.death_reason(),
        }
    }
}

/// Plays one game with `controller` until it ends or `max_ticks` pass.
pub fn play<C: Controller + ?Sized>(
    game: &mut Game,
    controller: &mut C,
    max_ticks: u64,
) -> GameSummary {
    while !game.is_game_over() && game.tick_count() < max_ticks {
        let direction = controller.next_direction(game);
        game.tick(direction);
    }

    GameSummary::from_game(game)
}

/// Plays `games` bot games from `config` and logs a line per game.
///
/// With a configured seed, game `n` uses `seed + n` for both board and bot,
/// so a whole batch is reproducible.
pub fn run_bot_games(config: &GameConfig, games: u32, max_ticks: u64) -> Vec<GameSummary> {
    (0..games)
        .map(|round| {
            let (mut game, mut bot) = match config.seed {
                Some(seed) => {
                    let seed = seed.wrapping_add(u64::from(round));
                    let game = Game::with_obstacles(
                        config.bounds(),
                        config.obstacle_points(),
                        StdRng::seed_from_u64(seed),
                    );
                    let bot = Bot::new_with_seed(config.bot.mutation_probability, seed);
                    (game, bot)
                }
                None => (config.build_game(), Bot::new(config.bot.mutation_probability)),
            };

            let summary = play(&mut game, &mut bot, max_ticks);
            info!(
                round,
                score = summary.score,
                length = summary.length,
                ticks = summary.ticks,
                status = ?summary.status,
                reason = ?summary.death_reason,
                "bot game finished"
            );
            summary
        })
        .collect()
}
