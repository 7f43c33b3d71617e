//! Core engine types: card IDs, configuration, RNG, board state, errors.
//!
//! This module contains the building blocks every other module leans on.
//! Hosts tune the board via `BoardConfig` rather than modifying the core.

pub mod config;
pub mod entity;
pub mod error;
pub mod rng;
pub mod state;

pub use config::BoardConfig;
pub use entity::CardId;
pub use error::{EngineError, EngineResult};
pub use rng::{GameRng, RngCheckpoint};
pub use state::BoardState;
