use crate::animal::Animal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub tick: u64,
    pub population: usize,
    pub species_counts: BTreeMap<String, usize>,
    pub avg_health: f64,
    /// Mean of current/max health, so species with different maxima compare.
    pub avg_health_ratio: f64,
    pub total_births: u64,
    pub total_deaths: u64,
}

impl SimulationMetrics {
    pub fn compute(tick: u64, animals: &[Animal], total_births: u64, total_deaths: u64) -> Self {
        let living: Vec<&Animal> = animals.iter().filter(|a| a.is_alive()).collect();
        let population = living.len();

        let mut species_counts = BTreeMap::new();
        for animal in &living {
            *species_counts
                .entry(animal.species_id().to_string())
                .or_insert(0) += 1;
        }

        if population == 0 {
            return Self {
                tick,
                population: 0,
                species_counts,
                avg_health: 0.0,
                avg_health_ratio: 0.0,
                total_births,
                total_deaths,
            };
        }

        let total_health: f64 = living.iter().map(|a| a.health.current()).sum();
        let total_ratio: f64 = living.iter().map(|a| a.health.ratio()).sum();

        Self {
            tick,
            population,
            species_counts,
            avg_health: total_health / population as f64,
            avg_health_ratio: total_ratio / population as f64,
            total_births,
            total_deaths,
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.population == 0
    }

    /// `Antelope=2 Lion=1` style summary for log lines.
    pub fn species_summary(&self) -> String {
        self.species_counts
            .iter()
            .map(|(id, count)| format!("{}={}", id, count))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesRegistry;
    use crate::world::position::Position;

    #[test]
    fn test_metrics_empty_population() {
        let metrics = SimulationMetrics::compute(100, &[], 3, 4);

        assert_eq!(metrics.tick, 100);
        assert_eq!(metrics.population, 0);
        assert_eq!(metrics.avg_health, 0.0);
        assert!(metrics.species_counts.is_empty());
        assert!(metrics.is_extinct());
    }

    #[test]
    fn test_metrics_with_animals() {
        let registry = SpeciesRegistry::with_builtins();
        let lion = registry.create(1, "Lion", Position::new(0, 0)).unwrap();
        let mut antelope = registry.create(2, "Antelope", Position::new(1, 1)).unwrap();
        antelope.health.set(5.0);
        let mut corpse = registry.create(3, "Antelope", Position::new(2, 2)).unwrap();
        corpse.kill();

        let metrics = SimulationMetrics::compute(7, &[lion, antelope, corpse], 10, 5);

        assert_eq!(metrics.population, 2);
        assert_eq!(metrics.species_counts["Lion"], 1);
        assert_eq!(metrics.species_counts["Antelope"], 1);
        assert_eq!(metrics.avg_health, 10.0);
        assert_eq!(metrics.avg_health_ratio, 0.75);
        assert_eq!(metrics.total_births, 10);
        assert_eq!(metrics.total_deaths, 5);
        assert_eq!(metrics.species_summary(), "Antelope=1 Lion=1");
    }
}
