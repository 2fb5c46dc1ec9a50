use super::{AnimalCatalog, ConfiguredSpecies, Species};
use crate::animal::health::Health;
use crate::animal::{Animal, AnimalId};
use crate::checkpoint::state::AnimalState;
use crate::error::{SimError, SimResult};
use crate::world::position::Position;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maps species ids to their implementation and guards glyph uniqueness.
///
/// First registrant wins: later species that reuse an id or a symbol are
/// rejected, so built-ins registered up front cannot be shadowed.
#[derive(Debug, Default, Clone)]
pub struct SpeciesRegistry {
    species: BTreeMap<String, Arc<dyn Species>>,
    symbols: HashMap<char, String>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.extend_from_catalog(&AnimalCatalog::builtin(), "built-in");
        registry
    }

    pub fn register(&mut self, species: Arc<dyn Species>) -> SimResult<()> {
        let id = species.id().to_string();
        let symbol = species.config().symbol;

        species
            .config()
            .validate()
            .map_err(|reason| SimError::InvalidSpecies { id: id.clone(), reason })?;
        if self.species.contains_key(&id) {
            return Err(SimError::DuplicateSpecies(id));
        }
        if let Some(existing) = self.symbols.get(&symbol) {
            return Err(SimError::SymbolCollision {
                symbol,
                existing: existing.clone(),
                rejected: id,
            });
        }

        self.symbols.insert(symbol, id.clone());
        self.species.insert(id, species);
        Ok(())
    }

    /// Registers every entry of `catalog`, logging and skipping rejects.
    /// Returns how many species were added.
    pub fn extend_from_catalog(&mut self, catalog: &AnimalCatalog, source: &str) -> usize {
        let mut added = 0;
        for (id, config) in catalog.resolved() {
            match self.register(Arc::new(ConfiguredSpecies::new(id, config))) {
                Ok(()) => {
                    log::debug!("Registered species {} from {}", id, source);
                    added += 1;
                }
                Err(e) => {
                    log::warn!("Skipping species {} from {}: {}", id, source, e);
                }
            }
        }
        added
    }

    /// Registers every `*.json` catalog fragment in `dir`, in file name order.
    /// Unreadable fragments are logged and skipped. Returns how many species
    /// were added.
    pub fn load_plugins<P: AsRef<Path>>(&mut self, dir: P) -> usize {
        let dir = dir.as_ref();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("No plugin directory at {:?}: {}", dir, e);
                return 0;
            }
        };

        let mut fragments: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        fragments.sort();

        let mut added = 0;
        for path in fragments {
            match AnimalCatalog::load_from_file(&path) {
                Ok(catalog) => {
                    added += self.extend_from_catalog(&catalog, &path.display().to_string());
                }
                Err(e) => {
                    log::warn!("Skipping plugin {:?}: {}", path, e);
                }
            }
        }
        added
    }

    pub fn get(&self, species_id: &str) -> Option<&Arc<dyn Species>> {
        self.species.get(species_id)
    }

    pub fn by_symbol(&self, symbol: char) -> Option<&Arc<dyn Species>> {
        self.symbols.get(&symbol).and_then(|id| self.species.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn create(&self, id: AnimalId, species_id: &str, position: Position) -> SimResult<Animal> {
        let species = self
            .get(species_id)
            .ok_or_else(|| SimError::UnknownSpecies(species_id.to_string()))?;

        let mut animal = Animal::new(id, species.clone(), position);
        species.birth(&mut animal);
        Ok(animal)
    }

    /// Rebuilds an animal from saved state. Failures are logged and yield `None`.
    pub fn create_from_state(&self, id: AnimalId, state: &AnimalState) -> Option<Animal> {
        match self.try_create_from_state(id, state) {
            Ok(animal) => Some(animal),
            Err(e) => {
                log::warn!("Dropping saved animal of type '{}': {}", state.species_id, e);
                None
            }
        }
    }

    fn try_create_from_state(&self, id: AnimalId, state: &AnimalState) -> SimResult<Animal> {
        if state.species_id.trim().is_empty() {
            return Err(SimError::MalformedState("missing species id".to_string()));
        }

        let mut animal = self.create(id, &state.species_id, state.position)?;

        let max = animal.config().max_health;
        animal.health = Health::from_saved(state.health, max).ok_or_else(|| {
            SimError::MalformedState(format!("health {} is not a number", state.health))
        })?;
        // A depleted animal cannot stay alive.
        animal.alive = state.alive && !animal.health.is_depleted();

        if animal.config().digestion_time.is_some() {
            animal.digestion_remaining = state.digestion_remaining.unwrap_or(0);
        }

        Ok(animal)
    }
}
