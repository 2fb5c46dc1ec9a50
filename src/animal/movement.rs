use super::Animal;
use crate::world::position::{Direction, Position};
use crate::world::Grid;

/// Outcome of walking `movement_speed` sub-steps in one direction,
/// worked out against a read-only grid before anything is mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovePlan {
    pub destination: Position,
    pub steps: u32,
    pub health_after: f64,
    pub exhausted: bool,
}

impl Animal {
    pub fn plan_move(&self, grid: &Grid<'_>, direction: Direction) -> MovePlan {
        let drain = self.config().health_drain_per_move;
        let mut destination = self.position;
        let mut health = self.health.current();
        let mut steps = 0;
        let mut exhausted = false;

        for _ in 0..self.config().movement_speed {
            let candidate = destination.step(direction);
            if !grid.is_valid(candidate) {
                break;
            }
            // Same-species cells are impassable; other species can be shared.
            if grid.has_living_species_at(candidate, self.species_id()) {
                break;
            }

            destination = candidate;
            steps += 1;
            health = (health - drain).max(0.0);
            if health <= 0.0 {
                exhausted = true;
                break;
            }
        }

        MovePlan {
            destination,
            steps,
            health_after: health,
            exhausted,
        }
    }

    pub fn apply_move(&mut self, plan: &MovePlan) {
        self.position = plan.destination;
        self.health.set(plan.health_after);
        if plan.exhausted {
            self.kill();
        }
    }
}
