use super::{Animal, AnimalId};
use crate::world::position::Direction;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// A decision policy. Each either claims the tick with an [`Action`] or
/// passes, letting the next policy in the chain decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    Graze,
    Flee,
    Hunt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Skip the tick while a previous meal is digested.
    Digest,
    /// Heal to full without moving.
    Graze,
    Flee(Direction),
    Chase { direction: Direction, prey: AnimalId },
    Wander(Direction),
}

impl Policy {
    pub fn decide(self, me: &Animal, visible: &[&Animal]) -> Option<Action> {
        match self {
            Policy::Graze => graze(me, visible),
            Policy::Flee => flee(me, visible),
            Policy::Hunt => hunt(me, visible),
        }
    }
}

/// First policy to claim the tick wins, otherwise a random step.
pub fn resolve(policies: &[Policy], me: &Animal, visible: &[&Animal], rng: &mut dyn RngCore) -> Action {
    policies
        .iter()
        .find_map(|policy| policy.decide(me, visible))
        .unwrap_or_else(|| Action::Wander(Direction::random(rng)))
}

fn threats<'a>(me: &'a Animal, visible: &'a [&'a Animal]) -> impl Iterator<Item = &'a Animal> + 'a {
    visible
        .iter()
        .copied()
        .filter(move |other| other.alive && other.power_level() > me.power_level())
}

fn closest<'a>(me: &Animal, candidates: impl Iterator<Item = &'a Animal>) -> Option<&'a Animal> {
    candidates.min_by(|a, b| {
        me.distance_to(a)
            .partial_cmp(&me.distance_to(b))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    })
}

pub fn flee(me: &Animal, visible: &[&Animal]) -> Option<Action> {
    let threat = closest(me, threats(me, visible))?;
    Some(Action::Flee(Direction::away_from(me.position, threat.position)))
}

pub fn hunt(me: &Animal, visible: &[&Animal]) -> Option<Action> {
    if me.digestion_remaining > 0 {
        return Some(Action::Digest);
    }

    let prey = closest(
        me,
        visible
            .iter()
            .copied()
            .filter(|other| other.alive && other.power_level() < me.power_level()),
    )?;

    Some(Action::Chase {
        direction: Direction::towards(me.position, prey.position),
        prey: prey.id,
    })
}

pub fn graze(me: &Animal, visible: &[&Animal]) -> Option<Action> {
    let hungry = me.health.below_fraction(me.config().grazing_threshold());
    if hungry && threats(me, visible).next().is_none() {
        Some(Action::Graze)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::{test_support, ConfiguredSpecies, SpeciesConfig};
    use crate::world::position::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn animal(id: AnimalId, species: &str, config: SpeciesConfig, x: i32, y: i32) -> Animal {
        Animal::new(
            id,
            Arc::new(ConfiguredSpecies::new(species, config)),
            Position::new(x, y),
        )
    }

    fn antelope(id: AnimalId, x: i32, y: i32) -> Animal {
        animal(id, "Antelope", test_support::herbivore('A', 0), x, y)
    }

    fn lion(id: AnimalId, x: i32, y: i32) -> Animal {
        animal(id, "Lion", test_support::carnivore('L', 2), x, y)
    }

    #[test]
    fn test_flee_from_closest_threat() {
        let me = antelope(1, 5, 5);
        let near = lion(2, 7, 5);
        let far = lion(3, 5, 9);

        let action = flee(&me, &[&far, &near]);
        assert_eq!(action, Some(Action::Flee(Direction::Left)));
    }

    #[test]
    fn test_flee_ignores_equal_and_weaker() {
        let me = antelope(1, 5, 5);
        let peer = antelope(2, 6, 5);
        assert_eq!(flee(&me, &[&peer]), None);
    }

    #[test]
    fn test_flee_ignores_dead_threat() {
        let me = antelope(1, 5, 5);
        let mut corpse = lion(2, 6, 5);
        corpse.kill();
        assert_eq!(flee(&me, &[&corpse]), None);
    }

    #[test]
    fn test_hunt_digesting_claims_tick() {
        let mut me = lion(1, 5, 5);
        me.digestion_remaining = 2;
        let prey = antelope(2, 6, 5);

        assert_eq!(hunt(&me, &[&prey]), Some(Action::Digest));
    }

    #[test]
    fn test_hunt_chases_closest_weaker() {
        let me = lion(1, 5, 5);
        let near = antelope(2, 5, 7);
        let far = antelope(3, 9, 5);

        assert_eq!(
            hunt(&me, &[&far, &near]),
            Some(Action::Chase {
                direction: Direction::Down,
                prey: 2
            })
        );
    }

    #[test]
    fn test_hunt_without_prey_passes() {
        let me = lion(1, 5, 5);
        let rival = lion(2, 6, 5);
        assert_eq!(hunt(&me, &[&rival]), None);
        assert_eq!(hunt(&me, &[]), None);
    }

    #[test]
    fn test_graze_when_hungry_and_safe() {
        let mut me = antelope(1, 5, 5);
        me.health.set(4.0);
        assert_eq!(graze(&me, &[]), Some(Action::Graze));

        let peer = antelope(2, 6, 5);
        assert_eq!(graze(&me, &[&peer]), Some(Action::Graze));
    }

    #[test]
    fn test_no_graze_with_threat_or_full_health() {
        let mut me = antelope(1, 5, 5);
        assert_eq!(graze(&me, &[]), None);

        me.health.set(4.0);
        let predator = lion(2, 8, 5);
        assert_eq!(graze(&me, &[&predator]), None);
    }

    #[test]
    fn test_resolve_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut me = antelope(1, 5, 5);
        me.health.set(4.0);
        let predator = lion(2, 5, 7);
        let chain = [Policy::Graze, Policy::Flee];

        assert_eq!(resolve(&chain, &me, &[], &mut rng), Action::Graze);
        assert_eq!(
            resolve(&chain, &me, &[&predator], &mut rng),
            Action::Flee(Direction::Up)
        );
    }

    #[test]
    fn test_resolve_falls_back_to_wander() {
        let mut rng = StdRng::seed_from_u64(1);
        let me = lion(1, 5, 5);
        let action = resolve(&[Policy::Hunt], &me, &[], &mut rng);
        assert!(matches!(action, Action::Wander(_)));
    }

    #[test]
    fn test_flee_before_hunt_for_middle_tier() {
        let mut rng = StdRng::seed_from_u64(1);
        let me = animal(1, "Hyena", test_support::carnivore('H', 1), 5, 5);
        let prey = antelope(2, 6, 5);
        let predator = lion(3, 5, 3);
        let chain = [Policy::Flee, Policy::Hunt];

        assert_eq!(
            resolve(&chain, &me, &[&prey, &predator], &mut rng),
            Action::Flee(Direction::Down)
        );
        assert_eq!(
            resolve(&chain, &me, &[&prey], &mut rng),
            Action::Chase {
                direction: Direction::Right,
                prey: 2
            }
        );
    }
}
