//! Species: configured animal kinds and the registry that builds animals from them.
//!
//! Built-in and externally supplied species share one seam, the [`Species`]
//! trait. Most species are plain data ([`ConfiguredSpecies`]): a
//! [`SpeciesConfig`] plus the ordered list of behavior policies they run.

pub mod catalog;
pub mod registry;

use crate::animal::behavior::{self, Action, Policy};
use crate::animal::Animal;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use catalog::{AnimalCatalog, SpeciesEntry};
pub use registry::SpeciesRegistry;

pub const DEFAULT_GRAZING_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diet {
    Herbivore,
    Carnivore,
}

impl Diet {
    pub fn default_policies(self) -> Vec<Policy> {
        match self {
            Diet::Herbivore => vec![Policy::Graze, Policy::Flee],
            Diet::Carnivore => vec![Policy::Hunt],
        }
    }
}

/// Fully resolved per-species parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub symbol: char,
    pub vision_range: u32,
    pub movement_speed: u32,
    pub max_health: f64,
    pub power_level: i32,
    pub diet: Diet,
    pub digestion_time: Option<u32>,
    pub grazing_threshold: Option<f64>,
    pub health_drain_per_move: f64,
    /// Consecutive ticks two partners must stay in range before a birth.
    pub reproduction_threshold: u32,
    pub reproduction_range: f64,
    /// Tried in order each tick; wandering is the fallback.
    pub policies: Vec<Policy>,
}

impl SpeciesConfig {
    pub fn grazing_threshold(&self) -> f64 {
        self.grazing_threshold.unwrap_or(DEFAULT_GRAZING_THRESHOLD)
    }

    pub fn digestion_time(&self) -> u32 {
        self.digestion_time.unwrap_or(0)
    }

    /// Rejects values that health bookkeeping cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_health.is_finite() || self.max_health < 0.0 {
            return Err(format!("max_health {} must be a non-negative number", self.max_health));
        }
        if !self.health_drain_per_move.is_finite() || self.health_drain_per_move < 0.0 {
            return Err(format!(
                "health_drain_per_move {} must be a non-negative number",
                self.health_drain_per_move
            ));
        }
        if let Some(threshold) = self.grazing_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(format!("grazing_threshold {} must lie in [0, 1]", threshold));
            }
        }
        if !self.reproduction_range.is_finite() || self.reproduction_range < 0.0 {
            return Err(format!(
                "reproduction_range {} must be a non-negative number",
                self.reproduction_range
            ));
        }
        Ok(())
    }
}

/// The narrow contract every species, built-in or external, satisfies.
pub trait Species: Send + Sync + fmt::Debug {
    /// Registry key, also written into saved animal state.
    fn id(&self) -> &str;

    fn config(&self) -> &SpeciesConfig;

    /// Chooses this tick's action. `visible` holds the living animals within
    /// vision range of `me`.
    fn act(&self, me: &Animal, visible: &[&Animal], rng: &mut dyn RngCore) -> Action;

    /// Hook run on every freshly constructed animal of this species.
    fn birth(&self, _newborn: &mut Animal) {}
}

/// A species defined entirely by configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredSpecies {
    id: String,
    config: SpeciesConfig,
}

impl ConfiguredSpecies {
    pub fn new(id: impl Into<String>, config: SpeciesConfig) -> Self {
        Self {
            id: id.into(),
            config,
        }
    }
}

impl Species for ConfiguredSpecies {
    fn id(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &SpeciesConfig {
        &self.config
    }

    fn act(&self, me: &Animal, visible: &[&Animal], rng: &mut dyn RngCore) -> Action {
        behavior::resolve(&self.config.policies, me, visible, rng)
    }
}
