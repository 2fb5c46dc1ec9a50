use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub simulation: SimulationConfig,
    pub population: PopulationConfig,
    pub checkpoint: CheckpointConfig,
    pub sessions: SessionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    pub empty_glyph: char,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub ticks_per_second: u64,
    pub log_interval_ticks: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Animals placed on a fresh grid, by species id.
    pub initial: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
    pub directory: String,
    pub keep_last_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    pub count: usize,
    pub id_prefix: String,
}

impl SimulationConfig {
    /// Wall-clock time between ticks, never shorter than one millisecond.
    pub fn tick_period(&self) -> Duration {
        let millis = 1000 / self.ticks_per_second.max(1);
        Duration::from_millis(millis.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut initial = BTreeMap::new();
        initial.insert("Antelope".to_string(), 2);
        initial.insert("Lion".to_string(), 1);

        Self {
            world: WorldConfig {
                width: 20,
                height: 20,
                empty_glyph: '.',
            },
            simulation: SimulationConfig {
                ticks_per_second: 2,
                log_interval_ticks: 20,
                seed: None,
            },
            population: PopulationConfig { initial },
            checkpoint: CheckpointConfig {
                enabled: true,
                interval_seconds: 300,
                directory: "checkpoints".to_string(),
                keep_last_n: 10,
            },
            sessions: SessionsConfig {
                count: 1,
                id_prefix: "session".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A small, seeded configuration with no starting animals.
    pub fn for_tests(width: usize, height: usize, seed: u64) -> Self {
        let mut config = Self::default();
        config.world.width = width;
        config.world.height = height;
        config.simulation.seed = Some(seed);
        config.population.initial.clear();
        config.checkpoint.enabled = false;
        config
    }
}
