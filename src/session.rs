//! Independent simulations keyed by session id.
//!
//! Each session sits behind its own mutex, so one session's tick never
//! waits on another's. [`SessionManager::update_all`] ticks them in parallel.

use crate::config::Config;
use crate::error::{SimError, SimResult};
use crate::simulation::{Simulation, TickOutcome};
use crate::species::SpeciesRegistry;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

pub type SharedSimulation = Arc<Mutex<Simulation>>;

pub struct SessionManager {
    config: Config,
    registry: Arc<SpeciesRegistry>,
    sessions: RwLock<HashMap<String, SharedSimulation>>,
}

impl SessionManager {
    pub fn new(config: Config, registry: Arc<SpeciesRegistry>) -> Self {
        Self {
            config,
            registry,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SpeciesRegistry> {
        &self.registry
    }

    /// Returns the session, creating and populating a fresh one if needed.
    pub fn get_or_create(&self, id: &str) -> SimResult<SharedSimulation> {
        if let Some(existing) = self.get(id)? {
            return Ok(existing);
        }

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SimError::SessionPoisoned("session table".to_string()))?;

        // Another caller may have won the race between the two locks.
        if let Some(existing) = sessions.get(id) {
            return Ok(existing.clone());
        }

        let mut simulation = Simulation::new(&self.config, self.registry.clone());
        if let Some(seed) = self.config.simulation.seed {
            simulation.reseed(seed.wrapping_add(sessions.len() as u64));
        }
        let placed = simulation.populate();
        log::info!("Created session {} with {} animals", id, placed);

        let shared = Arc::new(Mutex::new(simulation));
        sessions.insert(id.to_string(), shared.clone());
        Ok(shared)
    }

    pub fn get(&self, id: &str) -> SimResult<Option<SharedSimulation>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SimError::SessionPoisoned("session table".to_string()))?;
        Ok(sessions.get(id).cloned())
    }

    /// Installs a prepared simulation, replacing any session with that id.
    pub fn insert(&self, id: &str, simulation: Simulation) -> SimResult<SharedSimulation> {
        let shared = Arc::new(Mutex::new(simulation));
        self.sessions
            .write()
            .map_err(|_| SimError::SessionPoisoned("session table".to_string()))?
            .insert(id.to_string(), shared.clone());
        Ok(shared)
    }

    pub fn remove(&self, id: &str) -> SimResult<bool> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SimError::SessionPoisoned("session table".to_string()))?;
        Ok(sessions.remove(id).is_some())
    }

    pub fn active_ids(&self) -> SimResult<Vec<String>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SimError::SessionPoisoned("session table".to_string()))?;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Runs `f` against one session under its lock.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut Simulation) -> R) -> SimResult<R> {
        let shared = self
            .get(id)?
            .ok_or_else(|| SimError::UnknownSession(id.to_string()))?;
        let mut simulation = shared
            .lock()
            .map_err(|_| SimError::SessionPoisoned(id.to_string()))?;
        Ok(f(&mut simulation))
    }

    /// Ticks every session once, in parallel. Results come back sorted by id.
    pub fn update_all(&self) -> SimResult<Vec<(String, SimResult<TickOutcome>)>> {
        let sessions: Vec<(String, SharedSimulation)> = {
            let table = self
                .sessions
                .read()
                .map_err(|_| SimError::SessionPoisoned("session table".to_string()))?;
            table.iter().map(|(id, s)| (id.clone(), s.clone())).collect()
        };

        let mut results: Vec<(String, SimResult<TickOutcome>)> = sessions
            .par_iter()
            .map(|(id, shared)| {
                let result = match shared.lock() {
                    Ok(mut simulation) => Ok(simulation.tick()),
                    Err(_) => {
                        log::error!("Session {} is poisoned, skipping tick", id);
                        Err(SimError::SessionPoisoned(id.clone()))
                    }
                };
                (id.clone(), result)
            })
            .collect();

        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }
}
