//! Space Duel - local two-player ship duel
//!
//! The simulation core lives in [`game`]; [`app`] wires it to a frame clock,
//! [`input`] produces intents and [`store`] keeps players and finished matches.

pub mod app;
pub mod config;
pub mod game;
pub mod input;
pub mod store;
pub mod util;
