pub mod behavior;
pub mod health;
pub mod movement;
pub mod reproduction;

use crate::species::{Species, SpeciesConfig};
use crate::world::position::Position;
use health::Health;
use reproduction::ProximityTracker;
use std::sync::Arc;

pub type AnimalId = u64;

#[derive(Debug, Clone)]
pub struct Animal {
    pub id: AnimalId,
    pub species: Arc<dyn Species>,
    pub position: Position,
    pub health: Health,
    pub alive: bool,
    pub digestion_remaining: u32,
    pub tracker: ProximityTracker,
}

impl Animal {
    pub fn new(id: AnimalId, species: Arc<dyn Species>, position: Position) -> Self {
        let health = Health::new(species.config().max_health);
        Self {
            id,
            species,
            position,
            health,
            alive: true,
            digestion_remaining: 0,
            tracker: ProximityTracker::default(),
        }
    }

    pub fn species_id(&self) -> &str {
        self.species.id()
    }

    pub fn config(&self) -> &SpeciesConfig {
        self.species.config()
    }

    pub fn symbol(&self) -> char {
        self.config().symbol
    }

    pub fn power_level(&self) -> i32 {
        self.config().power_level
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn same_species(&self, other: &Animal) -> bool {
        self.species_id() == other.species_id()
    }

    pub fn distance_to(&self, other: &Animal) -> f64 {
        self.position.distance_to(&other.position)
    }

    /// Every other living animal within vision range.
    pub fn vision<'a>(&self, population: &'a [Animal]) -> Vec<&'a Animal> {
        let range = self.config().vision_range as f64;
        population
            .iter()
            .filter(|other| {
                other.id != self.id && other.alive && self.distance_to(other) <= range
            })
            .collect()
    }

    /// Living same-species animals close enough to count towards a birth.
    pub fn partners_in_range(&self, population: &[Animal]) -> Vec<AnimalId> {
        let range = self.config().reproduction_range;
        population
            .iter()
            .filter(|other| {
                other.id != self.id
                    && other.alive
                    && self.same_species(other)
                    && self.distance_to(other) <= range
            })
            .map(|other| other.id)
            .collect()
    }

    /// Successful kill: full health and a digestion cooldown.
    pub fn feed(&mut self) {
        self.digestion_remaining = self.config().digestion_time();
        self.health.restore_full();
    }
}
