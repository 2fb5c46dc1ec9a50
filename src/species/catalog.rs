use super::{Diet, SpeciesConfig};
use crate::animal::behavior::Policy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The human-editable species document (`animals.json`), keyed by species id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimalCatalog {
    pub default_vision_range: u32,
    pub health_drain_per_move: f64,
    pub reproduction_proximity_counter: u32,
    pub reproduction_range: f64,
    pub animals: BTreeMap<String, SpeciesEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub symbol: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_range: Option<u32>,
    pub movement_speed: u32,
    pub max_health: f64,
    pub power_level: i32,
    pub diet: Diet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digestion_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grazing_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_drain_per_move: Option<f64>,
    /// Overrides the diet's default policy chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<Policy>>,
}

impl Default for AnimalCatalog {
    fn default() -> Self {
        Self {
            default_vision_range: 4,
            health_drain_per_move: 0.5,
            reproduction_proximity_counter: 3,
            reproduction_range: 1.5,
            animals: BTreeMap::new(),
        }
    }
}

impl AnimalCatalog {
    /// Antelope and Lion, the species every simulation starts with.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog.animals.insert(
            "Antelope".to_string(),
            SpeciesEntry {
                symbol: 'A',
                vision_range: Some(4),
                movement_speed: 1,
                max_health: 10.0,
                power_level: 0,
                diet: Diet::Herbivore,
                digestion_time: None,
                grazing_threshold: Some(0.5),
                health_drain_per_move: None,
                policies: None,
            },
        );
        catalog.animals.insert(
            "Lion".to_string(),
            SpeciesEntry {
                symbol: 'L',
                vision_range: Some(5),
                movement_speed: 2,
                max_health: 15.0,
                power_level: 2,
                diet: Diet::Carnivore,
                digestion_time: Some(2),
                grazing_threshold: None,
                health_drain_per_move: None,
                policies: None,
            },
        );
        catalog
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let catalog = serde_json::from_str(&content)?;
        Ok(catalog)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fills in catalog-wide defaults for one entry.
    pub fn resolve(&self, entry: &SpeciesEntry) -> SpeciesConfig {
        SpeciesConfig {
            symbol: entry.symbol,
            vision_range: entry.vision_range.unwrap_or(self.default_vision_range),
            movement_speed: entry.movement_speed,
            max_health: entry.max_health,
            power_level: entry.power_level,
            diet: entry.diet,
            digestion_time: entry.digestion_time,
            grazing_threshold: entry.grazing_threshold,
            health_drain_per_move: entry
                .health_drain_per_move
                .unwrap_or(self.health_drain_per_move),
            reproduction_threshold: self.reproduction_proximity_counter,
            reproduction_range: self.reproduction_range,
            policies: entry
                .policies
                .clone()
                .unwrap_or_else(|| entry.diet.default_policies()),
        }
    }

    pub fn resolved(&self) -> impl Iterator<Item = (&str, SpeciesConfig)> + '_ {
        self.animals
            .iter()
            .map(move |(id, entry)| (id.as_str(), self.resolve(entry)))
    }
}
