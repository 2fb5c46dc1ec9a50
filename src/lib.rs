//! Savanna animal simulation on a bounded grid.
//!
//! A [`simulation::Simulation`] owns its animals and advances them one tick
//! at a time: every living animal senses its neighbourhood, its species picks
//! an action, births are flushed and the dead are removed. Species come from
//! a [`species::SpeciesRegistry`] filled from JSON catalogs, and the whole
//! population round-trips through [`checkpoint::state::SimulationSnapshot`].

pub mod animal;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod session;
pub mod simulation;
pub mod species;
pub mod stats;
pub mod world;

pub use error::{SimError, SimResult};
pub use simulation::Simulation;
