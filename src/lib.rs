//! pokeview - browse the PokéAPI catalog in the terminal
//!
//! The library holds everything but terminal setup, so flows can be driven
//! from tests.

pub mod action;
pub mod api;
pub mod config;
pub mod effect;
pub mod error;
pub mod logging;
pub mod persist;
pub mod reducer;
pub mod routing;
pub mod runner;
pub mod state;
pub mod theme;
pub mod ui;
