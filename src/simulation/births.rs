use crate::animal::AnimalId;
use crate::world::position::Position;
use crate::world::Grid;

#[derive(Debug, Clone, PartialEq)]
pub struct BirthRequest {
    pub species_id: String,
    pub position: Position,
    pub parent: AnimalId,
}

/// Births requested during the act phase. Nothing joins the population
/// until the engine flushes the queue after every animal has acted.
#[derive(Debug, Default)]
pub struct BirthQueue {
    pending: Vec<BirthRequest>,
}

impl BirthQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: BirthRequest) {
        self.pending.push(request);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_reserved(&self, pos: Position) -> bool {
        self.pending.iter().any(|r| r.position == pos)
    }

    /// First neighbour of `pos` that is neither occupied nor already promised
    /// to an earlier newborn this tick.
    pub fn site_near(&self, grid: &Grid<'_>, pos: Position) -> Option<Position> {
        grid.neighbors(pos)
            .into_iter()
            .find(|candidate| !grid.is_occupied(*candidate) && !self.is_reserved(*candidate))
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, BirthRequest> {
        self.pending.drain(..)
    }
}
