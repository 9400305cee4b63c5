//! Snake on a toroidal board.
//!
//! The simulation core is [`game::Game`] with its [`snake::Snake`],
//! [`point`] coordinates, [`food`] placement and the reactive [`bot`].
//! Renderers follow the board through the [`observer`] traits. The
//! terminal front-end modules (`input`, `renderer`, `terminal_runtime`)
//! are thin consumers of that API.

pub mod bot;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod headless;
pub mod input;
pub mod observer;
pub mod point;
pub mod renderer;
pub mod snake;
pub mod telemetry;
pub mod terminal_runtime;
