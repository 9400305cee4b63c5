use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{CellKind, Game};
use crate::point::{Bounds, Point};
use crate::snake::Snake;

/// Default board width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 30;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 30;

/// Base tick interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 120;

/// Minimum tick interval in milliseconds.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Chance per decision that the bot wanders off instead of chasing food.
pub const DEFAULT_MUTATION_PROBABILITY: f64 = 0.01;

/// One obstacle cell; coordinates wrap onto the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub x: i32,
    pub y: i32,
}

/// Autopilot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub enabled: bool,
    pub mutation_probability: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mutation_probability: DEFAULT_MUTATION_PROBABILITY,
        }
    }
}

/// Everything needed to start a session, loadable from JSON.
///
/// Missing fields fall back to their defaults, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub obstacles: Vec<ObstacleSpec>,
    pub seed: Option<u64>,
    pub tick_interval_ms: u64,
    pub bot: BotConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            obstacles: Vec::new(),
            seed: None,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            bot: BotConfig::default(),
        }
    }
}

impl GameConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the values a [`Game`] would otherwise reject by panicking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }

        if !(0.0..=1.0).contains(&self.bot.mutation_probability) {
            return Err(ConfigError::MutationProbability(
                self.bot.mutation_probability,
            ));
        }

        if self.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::TickInterval {
                min: MIN_TICK_INTERVAL_MS,
                actual: self.tick_interval_ms,
            });
        }

        let start = Snake::new(self.bounds()).head();
        if let Some(spec) = self
            .obstacles
            .iter()
            .find(|spec| self.bounds().point(spec.x, spec.y) == start)
        {
            return Err(ConfigError::ObstacleOnSnakeStart {
                x: spec.x,
                y: spec.y,
            });
        }

        Ok(())
    }

    /// Board bounds. Call [`GameConfig::validate`] first.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Obstacle cells wrapped onto the board.
    #[must_use]
    pub fn obstacle_points(&self) -> Vec<Point> {
        let bounds = self.bounds();
        self.obstacles
            .iter()
            .map(|spec| bounds.point(spec.x, spec.y))
            .collect()
    }

    /// Builds a fresh game, seeded when a seed is configured.
    #[must_use]
    pub fn build_game(&self) -> Game {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Game::with_obstacles(self.bounds(), self.obstacle_points(), rng)
    }
}

/// Colours used by the terminal renderer.
#[derive(Debug)]
pub struct Theme {
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub obstacle: Color,
    pub play_bg: Color,
    pub border_fg: Color,
    pub hud_score: Color,
    pub hud_muted: Color,
}

impl Theme {
    /// Returns the fill colour for a cell.
    #[must_use]
    pub fn cell_color(&self, kind: CellKind) -> Color {
        match kind {
            CellKind::Obstacle => self.obstacle,
            CellKind::SnakeHead => self.snake_head,
            CellKind::SnakeBody => self.snake_body,
            CellKind::Food => self.food,
            CellKind::Empty => self.play_bg,
        }
    }
}

/// Classic green-on-black theme.
pub const THEME_CLASSIC: Theme = Theme {
    snake_head: Color::White,
    snake_body: Color::Green,
    food: Color::Red,
    obstacle: Color::DarkGray,
    play_bg: Color::Black,
    border_fg: Color::White,
    hud_score: Color::Yellow,
    hud_muted: Color::DarkGray,
};
