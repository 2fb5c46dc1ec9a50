pub mod position;

use crate::animal::Animal;
use crate::error::{SimError, SimResult};
use position::{Direction, Position};
use rand::Rng;
use std::collections::HashSet;

/// Reject-and-resample budget for [`Grid::random_empty_cell`].
pub const MAX_PLACEMENT_ATTEMPTS: usize = 1000;

/// Read-only spatial view over a population the simulation owns.
///
/// Only living animals occupy cells. Several animals of different species
/// may share one cell.
#[derive(Debug, Clone, Copy)]
pub struct Grid<'a> {
    width: i32,
    height: i32,
    animals: &'a [Animal],
}

impl<'a> Grid<'a> {
    pub fn new(width: usize, height: usize, animals: &'a [Animal]) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            animals,
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn capacity(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_valid(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn occupant_at(&self, pos: Position) -> Option<&'a Animal> {
        self.animals
            .iter()
            .find(|a| a.alive && a.position == pos)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.occupant_at(pos).is_some()
    }

    pub fn has_living_species_at(&self, pos: Position, species_id: &str) -> bool {
        self.animals
            .iter()
            .any(|a| a.alive && a.position == pos && a.species_id() == species_id)
    }

    pub fn living_count(&self) -> usize {
        self.animals.iter().filter(|a| a.alive).count()
    }

    pub fn is_full(&self) -> bool {
        self.living_count() >= self.capacity()
    }

    /// True when every cell holds at least one living animal. Unlike
    /// [`Grid::is_full`] this accounts for species sharing cells.
    pub fn is_saturated(&self) -> bool {
        let occupied: HashSet<Position> = self
            .animals
            .iter()
            .filter(|a| a.alive && self.is_valid(a.position))
            .map(|a| a.position)
            .collect();
        occupied.len() >= self.capacity()
    }

    pub fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<Position> {
        if self.capacity() == 0 || self.is_full() {
            return Err(SimError::GridFull);
        }

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = Position::new(
                rng.gen_range(0..self.width),
                rng.gen_range(0..self.height),
            );
            if !self.is_occupied(candidate) {
                return Ok(candidate);
            }
        }

        Err(SimError::GridFull)
    }

    /// First free neighbour in [`Direction::ALL`] order.
    pub fn empty_adjacent_cell(&self, pos: Position) -> Option<Position> {
        self.neighbors(pos)
            .into_iter()
            .find(|candidate| !self.is_occupied(*candidate))
    }

    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        Direction::ALL
            .iter()
            .map(|&d| pos.step(d))
            .filter(|candidate| self.is_valid(*candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{test_support, ConfiguredSpecies};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn antelope(id: u64, x: i32, y: i32) -> Animal {
        let species = Arc::new(ConfiguredSpecies::new(
            "Antelope",
            test_support::herbivore('A', 0),
        ));
        Animal::new(id, species, Position::new(x, y))
    }

    fn fill(width: i32, height: i32) -> Vec<Animal> {
        let mut animals = Vec::new();
        for y in 0..height {
            for x in 0..width {
                animals.push(antelope(animals.len() as u64, x, y));
            }
        }
        animals
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(10, 5, &[]);
        assert!(grid.is_valid(Position::new(0, 0)));
        assert!(grid.is_valid(Position::new(9, 4)));
        assert!(!grid.is_valid(Position::new(10, 4)));
        assert!(!grid.is_valid(Position::new(9, 5)));
        assert!(!grid.is_valid(Position::new(-1, 0)));
        assert_eq!(grid.capacity(), 50);
    }

    #[test]
    fn test_occupancy_ignores_dead() {
        let mut dead = antelope(2, 3, 3);
        dead.kill();
        let animals = vec![antelope(1, 1, 1), dead];
        let grid = Grid::new(10, 10, &animals);

        assert!(grid.is_occupied(Position::new(1, 1)));
        assert_eq!(grid.occupant_at(Position::new(1, 1)).map(|a| a.id), Some(1));
        assert!(!grid.is_occupied(Position::new(3, 3)));
        assert_eq!(grid.living_count(), 1);
    }

    #[test]
    fn test_neighbors() {
        let grid = Grid::new(10, 10, &[]);
        assert_eq!(grid.neighbors(Position::new(5, 5)).len(), 8);
        assert_eq!(grid.neighbors(Position::new(0, 0)).len(), 3);
        assert_eq!(grid.neighbors(Position::new(9, 9)).len(), 3);
        assert_eq!(grid.neighbors(Position::new(0, 5)).len(), 5);
    }

    #[test]
    fn test_empty_adjacent_cell_scan_order() {
        let animals = vec![antelope(1, 5, 5)];
        let grid = Grid::new(10, 10, &animals);
        assert_eq!(grid.empty_adjacent_cell(Position::new(5, 5)), Some(Position::new(5, 4)));

        let animals = vec![antelope(1, 5, 4), antelope(2, 5, 6)];
        let grid = Grid::new(10, 10, &animals);
        assert_eq!(grid.empty_adjacent_cell(Position::new(5, 5)), Some(Position::new(4, 5)));
    }

    #[test]
    fn test_empty_adjacent_cell_none_when_surrounded() {
        let animals = fill(3, 3);
        let grid = Grid::new(3, 3, &animals);
        assert_eq!(grid.empty_adjacent_cell(Position::new(1, 1)), None);

        let grid = Grid::new(1, 1, &[]);
        assert_eq!(grid.empty_adjacent_cell(Position::new(0, 0)), None);
    }

    #[test]
    fn test_random_empty_cell() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut animals = fill(4, 4);
        animals.retain(|a| a.position != Position::new(2, 3));
        let grid = Grid::new(4, 4, &animals);

        for _ in 0..10 {
            assert_eq!(grid.random_empty_cell(&mut rng), Ok(Position::new(2, 3)));
        }
    }

    #[test]
    fn test_random_empty_cell_full_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let animals = fill(4, 4);
        let grid = Grid::new(4, 4, &animals);
        assert!(grid.is_full());
        assert_eq!(grid.random_empty_cell(&mut rng), Err(SimError::GridFull));
    }

    #[test]
    fn test_saturation_counts_cells_not_animals() {
        let lion = |id: u64, x: i32, y: i32| {
            let species = Arc::new(ConfiguredSpecies::new("Lion", test_support::carnivore('L', 2)));
            Animal::new(id, species, Position::new(x, y))
        };
        let animals = vec![
            antelope(1, 0, 0),
            antelope(2, 1, 0),
            lion(3, 0, 0),
            lion(4, 1, 0),
        ];
        let grid = Grid::new(2, 2, &animals);

        assert!(grid.is_full());
        assert!(!grid.is_saturated());

        let animals = fill(2, 2);
        assert!(Grid::new(2, 2, &animals).is_saturated());
    }

    #[test]
    fn test_random_empty_cell_zero_sized() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = Grid::new(0, 0, &[]);
        assert_eq!(grid.random_empty_cell(&mut rng), Err(SimError::GridFull));
    }
}
