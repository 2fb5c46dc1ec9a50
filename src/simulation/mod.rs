pub mod births;
pub mod tick;

use crate::animal::{Animal, AnimalId};
use crate::checkpoint::state::{AnimalState, SimulationSnapshot};
use crate::config::Config;
use crate::error::{SimError, SimResult};
use crate::species::SpeciesRegistry;
use crate::stats::SimulationMetrics;
use crate::world::position::Position;
use crate::world::Grid;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::Arc;

pub use tick::TickOutcome;

/// One independent savanna: the population it owns, its clock and its RNG.
///
/// Every mutation goes through `&mut self`, so a single simulation has
/// exactly one writer. Callers that share it wrap it in a mutex.
#[derive(Debug)]
pub struct Simulation {
    width: usize,
    height: usize,
    empty_glyph: char,
    registry: Arc<SpeciesRegistry>,
    population: Vec<Animal>,
    initial_population: BTreeMap<String, usize>,
    tick: u64,
    next_animal_id: AnimalId,
    total_births: u64,
    total_deaths: u64,
    rng: StdRng,
}

impl Simulation {
    pub fn new(config: &Config, registry: Arc<SpeciesRegistry>) -> Self {
        let rng = match config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            width: config.world.width,
            height: config.world.height,
            empty_glyph: config.world.empty_glyph,
            registry,
            population: Vec::new(),
            initial_population: config.population.initial.clone(),
            tick: 0,
            next_animal_id: 1,
            total_births: 0,
            total_deaths: 0,
            rng,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Empties the grid and rewinds the clock. Identities keep counting up.
    pub fn initialize(&mut self) {
        self.population.clear();
        self.tick = 0;
        self.total_births = 0;
        self.total_deaths = 0;
    }

    /// Places the configured starting animals at random empty cells.
    /// Returns how many were placed.
    pub fn populate(&mut self) -> usize {
        let mut placed = 0;
        let initial: Vec<(String, usize)> = self
            .initial_population
            .iter()
            .map(|(id, count)| (id.clone(), *count))
            .collect();

        for (species_id, count) in initial {
            for _ in 0..count {
                match self.add_animal(&species_id) {
                    Ok(_) => placed += 1,
                    Err(SimError::GridFull) => {
                        log::warn!("Grid full after placing {} animals", placed);
                        return placed;
                    }
                    Err(e) => {
                        log::warn!("Cannot place {}: {}", species_id, e);
                        break;
                    }
                }
            }
        }

        placed
    }

    /// Adds an animal at a uniformly random empty cell.
    pub fn add_animal(&mut self, species_id: &str) -> SimResult<AnimalId> {
        if self.registry.get(species_id).is_none() {
            return Err(SimError::UnknownSpecies(species_id.to_string()));
        }

        let position =
            Grid::new(self.width, self.height, &self.population).random_empty_cell(&mut self.rng)?;
        self.spawn(species_id, position)
    }

    /// Adds an animal at a chosen cell. Other species may already stand there.
    pub fn place_animal(&mut self, species_id: &str, position: Position) -> SimResult<AnimalId> {
        let grid = self.grid();
        if !grid.is_valid(position) {
            return Err(SimError::OutOfBounds(position));
        }
        if grid.has_living_species_at(position, species_id) {
            return Err(SimError::CellOccupied(position));
        }

        self.spawn(species_id, position)
    }

    fn spawn(&mut self, species_id: &str, position: Position) -> SimResult<AnimalId> {
        let id = self.next_animal_id;
        let animal = self.registry.create(id, species_id, position)?;
        self.next_animal_id += 1;
        self.population.push(animal);
        Ok(id)
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            tick_count: self.tick,
            animals: self.population.iter().map(AnimalState::from).collect(),
        }
    }

    /// Replaces the population with the saved one. States that cannot be
    /// rebuilt, fall outside the grid or stack on a living animal of the
    /// same species are dropped. Returns how many animals were restored.
    pub fn restore(&mut self, snapshot: &SimulationSnapshot) -> usize {
        self.population.clear();
        self.tick = snapshot.tick_count;
        self.total_births = 0;
        self.total_deaths = 0;

        for state in &snapshot.animals {
            let grid = self.grid();
            if !grid.is_valid(state.position) {
                log::warn!(
                    "Dropping saved {}: {}",
                    state.species_id,
                    SimError::OutOfBounds(state.position)
                );
                continue;
            }
            if state.alive && grid.has_living_species_at(state.position, &state.species_id) {
                log::warn!(
                    "Dropping saved {}: {}",
                    state.species_id,
                    SimError::CellOccupied(state.position)
                );
                continue;
            }

            if let Some(animal) = self.registry.create_from_state(self.next_animal_id, state) {
                self.next_animal_id += 1;
                self.population.push(animal);
            }
        }

        log::info!(
            "Restored {} of {} animals at tick {}",
            self.population.len(),
            snapshot.animals.len(),
            self.tick
        );
        self.population.len()
    }

    /// `height` rows of `width` glyphs. Each living animal is drawn at its
    /// position clamped into the grid; where species share a cell the
    /// strongest one is drawn.
    pub fn render_grid(&self) -> Vec<Vec<char>> {
        let mut rows = vec![vec![self.empty_glyph; self.width]; self.height];
        if self.width == 0 || self.height == 0 {
            return rows;
        }
        let mut drawn_power: Vec<Vec<Option<i32>>> = vec![vec![None; self.width]; self.height];
        let max_x = self.width as i32 - 1;
        let max_y = self.height as i32 - 1;

        for animal in self.population.iter().filter(|a| a.alive) {
            let x = animal.position.x.clamp(0, max_x) as usize;
            let y = animal.position.y.clamp(0, max_y) as usize;
            if drawn_power[y][x].map_or(true, |power| animal.power_level() > power) {
                rows[y][x] = animal.symbol();
                drawn_power[y][x] = Some(animal.power_level());
            }
        }

        rows
    }

    pub fn render_text(&self) -> String {
        self.render_grid()
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn metrics(&self) -> SimulationMetrics {
        SimulationMetrics::compute(
            self.tick,
            &self.population,
            self.total_births,
            self.total_deaths,
        )
    }

    pub fn grid(&self) -> Grid<'_> {
        Grid::new(self.width, self.height, &self.population)
    }

    pub fn population(&self) -> &[Animal] {
        &self.population
    }

    pub fn animal(&self, id: AnimalId) -> Option<&Animal> {
        self.population.iter().find(|a| a.id == id)
    }

    pub fn animal_mut(&mut self, id: AnimalId) -> Option<&mut Animal> {
        self.population.iter_mut().find(|a| a.id == id)
    }

    pub fn living_count(&self) -> usize {
        self.population.iter().filter(|a| a.alive).count()
    }

    pub fn registry(&self) -> &Arc<SpeciesRegistry> {
        &self.registry
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_births(&self) -> u64 {
        self.total_births
    }

    pub fn total_deaths(&self) -> u64 {
        self.total_deaths
    }
}
