use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use torus_snake::bot::{Bot, Controller};
use torus_snake::config::{GameConfig, THEME_CLASSIC};
use torus_snake::error::AppError;
use torus_snake::game::{Game, GameStatus};
use torus_snake::headless::run_bot_games;
use torus_snake::input::{Direction, GameInput, InputHandler};
use torus_snake::renderer::{self, CellCanvas, HudInfo};
use torus_snake::telemetry::{LogSink, TracingSubscriber};
use torus_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Seed for food placement and the bot.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the bot driving.
    #[arg(long)]
    bot: bool,

    /// Probability in [0, 1] that the bot makes a random move.
    #[arg(long)]
    mutation: Option<f64>,

    /// Milliseconds between ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Run bot games without a terminal UI and log the results.
    #[arg(long)]
    headless: bool,

    /// Number of games to play in headless mode.
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Tick cap per headless game.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,

    /// Write logs here. The terminal UI logs nowhere without it.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("torus-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;

    let (sink, fallback) = match (&cli.log_file, cli.headless) {
        (Some(path), _) => (LogSink::File(path.clone()), "debug"),
        (None, true) => (LogSink::Stderr, "info"),
        (None, false) => (LogSink::Disabled, "info"),
    };
    TracingSubscriber::new()
        .rust_log_fallback(fallback)
        .sink(sink)
        .set_global_default()
        .map_err(AppError::Logging)?;

    info!(
        width = config.width,
        height = config.height,
        obstacles = config.obstacles.len(),
        seed = ?config.seed,
        "starting"
    );

    if cli.headless {
        let summaries = run_bot_games(&config, cli.games, cli.max_ticks);
        let best = summaries.iter().map(|summary| summary.score).max().unwrap_or(0);
        let victories = summaries
            .iter()
            .filter(|summary| summary.status == GameStatus::Victory)
            .count();
        info!(games = summaries.len(), best, victories, "headless run complete");
        return Ok(());
    }

    run_terminal(&config)
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, AppError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(mutation) = cli.mutation {
        config.bot.mutation_probability = mutation;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    config.bot.enabled |= cli.bot;

    config.validate()?;
    Ok(config)
}

fn new_session(config: &GameConfig) -> (Game, Rc<RefCell<CellCanvas>>) {
    let mut game = config.build_game();
    let canvas = Rc::new(RefCell::new(CellCanvas::from_game(&game)));
    game.set_observer(Rc::clone(&canvas));
    (game, canvas)
}

fn run_terminal(config: &GameConfig) -> Result<(), AppError> {
    install_panic_hook();
    let mut terminal = TerminalSession::enter()?;
    let mut input = InputHandler::new();

    let mut bot = match config.seed {
        Some(seed) => Bot::new_with_seed(config.bot.mutation_probability, seed),
        None => Bot::new(config.bot.mutation_probability),
    };
    let mut bot_enabled = config.bot.enabled;
    let mut paused = false;
    let mut pending: Option<Direction> = None;

    let (mut game, mut canvas) = new_session(config);
    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            renderer::render(
                frame,
                &canvas.borrow(),
                &game,
                HudInfo {
                    bot_enabled,
                    paused,
                    theme: &THEME_CLASSIC,
                },
            );
        })?;

        let timeout = tick_interval.saturating_sub(last_tick.elapsed());
        if let Some(game_input) = input.poll_input(timeout)? {
            match game_input {
                GameInput::Quit => break,
                GameInput::Direction(direction) => pending = Some(direction),
                GameInput::ToggleBot => bot_enabled = !bot_enabled,
                GameInput::Pause if !game.is_game_over() => paused = !paused,
                GameInput::Restart if game.is_game_over() => {
                    (game, canvas) = new_session(config);
                    pending = None;
                    paused = false;
                }
                GameInput::Pause | GameInput::Restart => {}
            }
        }

        if last_tick.elapsed() < tick_interval {
            continue;
        }
        last_tick = Instant::now();

        if paused || game.is_game_over() {
            continue;
        }

        let direction = if bot_enabled {
            bot.next_direction(&game)
        } else {
            pending.take()
        };

        game.tick(direction);
    }

    Ok(())
}
