use super::births::{BirthQueue, BirthRequest};
use super::Simulation;
use crate::animal::behavior::Action;
use crate::animal::AnimalId;
use crate::error::{SimError, SimResult};
use crate::world::position::Direction;
use crate::world::Grid;
use std::collections::HashMap;

/// What happened during one call to [`Simulation::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub acted: usize,
    pub births: usize,
    pub deaths: usize,
    /// The act phase stopped early because a due birth found the grid full.
    pub grid_full: bool,
}

impl Simulation {
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        // The population vector keeps its order and length until the flush,
        // so indices taken here stay valid for the whole act phase.
        let action_set: Vec<usize> = self
            .population
            .iter()
            .enumerate()
            .filter(|(_, a)| a.alive)
            .map(|(index, _)| index)
            .collect();
        let index_of: HashMap<AnimalId, usize> = self
            .population
            .iter()
            .enumerate()
            .map(|(index, a)| (a.id, index))
            .collect();

        let mut births = BirthQueue::new();

        for index in action_set {
            if !self.population[index].alive {
                continue;
            }

            match self.act_one(index, &index_of, &mut births) {
                Ok(()) => outcome.acted += 1,
                Err(SimError::GridFull) => {
                    log::warn!(
                        "Grid full during tick {}, skipping remaining actions",
                        self.tick
                    );
                    outcome.grid_full = true;
                    break;
                }
                Err(e) => {
                    log::warn!(
                        "Animal {} failed to act: {}",
                        self.population[index].id,
                        e
                    );
                }
            }
        }

        outcome.births = self.flush_births(&mut births);
        outcome.deaths = self.reap();
        self.tick += 1;

        outcome
    }

    fn act_one(
        &mut self,
        index: usize,
        index_of: &HashMap<AnimalId, usize>,
        births: &mut BirthQueue,
    ) -> SimResult<()> {
        self.update_reproduction(index, births)?;

        let action = {
            let me = &self.population[index];
            let visible = me.vision(&self.population);
            me.species.act(me, &visible, &mut self.rng)
        };

        match action {
            Action::Digest => {
                let me = &mut self.population[index];
                me.digestion_remaining = me.digestion_remaining.saturating_sub(1);
            }
            Action::Graze => {
                self.population[index].health.restore_full();
            }
            Action::Flee(direction) | Action::Wander(direction) => {
                self.move_animal(index, direction);
            }
            Action::Chase { direction, prey } => {
                self.move_animal(index, direction);
                if let Some(&prey_index) = index_of.get(&prey) {
                    self.try_catch(index, prey_index);
                }
            }
        }

        self.check_health_bounds(index)
    }

    fn update_reproduction(&mut self, index: usize, births: &mut BirthQueue) -> SimResult<()> {
        let (own_id, partners, threshold) = {
            let me = &self.population[index];
            (
                me.id,
                me.partners_in_range(&self.population),
                me.config().reproduction_threshold,
            )
        };

        let due = self.population[index]
            .tracker
            .observe(own_id, &partners, threshold);

        for partner in due {
            let grid = Grid::new(self.width, self.height, &self.population);
            if grid.is_saturated() {
                return Err(SimError::GridFull);
            }

            let me = &self.population[index];
            match births.site_near(&grid, me.position) {
                Some(position) => {
                    log::debug!(
                        "Animals {} and {} request a {} at {}",
                        own_id,
                        partner,
                        me.species_id(),
                        position
                    );
                    births.push(BirthRequest {
                        species_id: me.species_id().to_string(),
                        position,
                        parent: own_id,
                    });
                }
                None => {
                    log::debug!("No room for a newborn next to animal {}", own_id);
                }
            }
        }

        Ok(())
    }

    fn move_animal(&mut self, index: usize, direction: Direction) {
        let plan = {
            let grid = Grid::new(self.width, self.height, &self.population);
            self.population[index].plan_move(&grid, direction)
        };

        let animal = &mut self.population[index];
        animal.apply_move(&plan);
        if plan.exhausted {
            log::debug!(
                "{} {} died of exhaustion at {}",
                animal.species_id(),
                animal.id,
                animal.position
            );
        }
    }

    /// A hunter that survives its move and ends on the prey's cell eats it.
    fn try_catch(&mut self, hunter_index: usize, prey_index: usize) {
        let caught = {
            let hunter = &self.population[hunter_index];
            let prey = &self.population[prey_index];
            hunter.alive
                && prey.alive
                && hunter.position == prey.position
                && hunter.power_level() > prey.power_level()
        };
        if !caught {
            return;
        }

        let prey = &mut self.population[prey_index];
        prey.kill();
        let prey_id = prey.id;

        let hunter = &mut self.population[hunter_index];
        hunter.feed();
        log::debug!(
            "{} {} caught animal {} at {}",
            hunter.species_id(),
            hunter.id,
            prey_id,
            hunter.position
        );
    }

    fn check_health_bounds(&mut self, index: usize) -> SimResult<()> {
        let animal = &mut self.population[index];
        if let Some(offending) = animal.health.enforce_bounds() {
            let violation = SimError::InvariantViolation(format!(
                "animal {} health {} outside [0, {}]",
                animal.id,
                offending,
                animal.health.max()
            ));
            debug_assert!(false, "{}", violation);
            log::error!("{}, clamped", violation);
        }
        Ok(())
    }

    fn flush_births(&mut self, births: &mut BirthQueue) -> usize {
        let mut born = 0;

        for request in births.drain() {
            let site = {
                let grid = Grid::new(self.width, self.height, &self.population);
                if grid.is_occupied(request.position) {
                    grid.empty_adjacent_cell(request.position)
                } else {
                    Some(request.position)
                }
            };

            let Some(position) = site else {
                log::debug!(
                    "Dropping {} newborn of animal {}: no free cell near {}",
                    request.species_id,
                    request.parent,
                    request.position
                );
                continue;
            };

            match self.spawn(&request.species_id, position) {
                Ok(id) => {
                    log::debug!("{} {} born at {}", request.species_id, id, position);
                    born += 1;
                }
                Err(e) => {
                    log::warn!("Newborn of animal {} not added: {}", request.parent, e);
                }
            }
        }

        self.total_births += born as u64;
        born
    }

    fn reap(&mut self) -> usize {
        let before = self.population.len();
        self.population.retain(|a| a.alive);
        let deaths = before - self.population.len();
        self.total_deaths += deaths as u64;
        deaths
    }
}
