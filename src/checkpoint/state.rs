//! Persistable form of a simulation: plain data, no behavior.

use crate::animal::Animal;
use crate::world::position::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalState {
    pub species_id: String,
    pub position: Position,
    pub health: f64,
    pub alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digestion_remaining: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub tick_count: u64,
    pub animals: Vec<AnimalState>,
}

impl From<&Animal> for AnimalState {
    fn from(animal: &Animal) -> Self {
        Self {
            species_id: animal.species_id().to_string(),
            position: animal.position,
            health: animal.health.current(),
            alive: animal.alive,
            digestion_remaining: animal
                .config()
                .digestion_time
                .map(|_| animal.digestion_remaining),
        }
    }
}

impl SimulationSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(blob: &str) -> serde_json::Result<Self> {
        serde_json::from_str(blob)
    }
}
