//! Game scheduler: fixed-timestep simulation with interpolated rendering.
//!
//! # Invariants
//! - Lifecycle runs `NotStarted -> Running -> Stopped`; `Stopped` is terminal.
//! - No tick, render or hook firing happens after the game stops.
//! - Within a tick every snapshot is taken before any node integrates.
//! - A renderer error ends the session; it is never retried.
//!
//! [`Game`] is single-threaded and deterministic through
//! [`Game::tick_with_delta`] and [`Game::render_with_alpha`]. [`GameRunner`]
//! drives it on a simulation thread at the configured rate.

mod config;
mod game;
mod runner;
mod timing;

pub use config::{ConfigError, GameConfig};
pub use game::{FrameReport, Game, GameError, GameState, StopReason, TickPhase, TickReport};
pub use runner::GameRunner;
pub use timing::{TickStats, TickTimer};

pub fn crate_info() -> &'static str {
    "cadence-game v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("game"));
    }
}
