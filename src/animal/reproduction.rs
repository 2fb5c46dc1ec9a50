use super::AnimalId;
use std::collections::HashMap;

/// Consecutive-tick proximity counters, one per same-species partner.
#[derive(Debug, Clone, Default)]
pub struct ProximityTracker {
    counters: HashMap<AnimalId, u32>,
}

impl ProximityTracker {
    /// Records one tick of proximity with `partners` and returns the partners
    /// for which `own_id` must request a birth this tick.
    ///
    /// A first sighting only starts the count; later sightings increment it.
    /// When a count reaches `threshold` it resets to zero and, if `own_id` is
    /// the lower of the pair, the partner is reported. Partners missing from
    /// this tick's list are dropped.
    pub fn observe(&mut self, own_id: AnimalId, partners: &[AnimalId], threshold: u32) -> Vec<AnimalId> {
        let mut births = Vec::new();

        for &partner in partners {
            match self.counters.get_mut(&partner) {
                None => {
                    self.counters.insert(partner, 1);
                }
                Some(count) => {
                    *count += 1;
                    if *count >= threshold {
                        if own_id < partner {
                            births.push(partner);
                        }
                        *count = 0;
                    }
                }
            }
        }

        self.counters.retain(|id, _| partners.contains(id));

        births
    }

    pub fn count(&self, partner: AnimalId) -> Option<u32> {
        self.counters.get(&partner).copied()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_starts_count() {
        let mut tracker = ProximityTracker::default();
        assert!(tracker.observe(1, &[2], 3).is_empty());
        assert_eq!(tracker.count(2), Some(1));
    }

    #[test]
    fn test_lower_id_requests_birth_at_threshold() {
        let mut tracker = ProximityTracker::default();

        assert!(tracker.observe(1, &[2], 3).is_empty());
        assert!(tracker.observe(1, &[2], 3).is_empty());
        assert_eq!(tracker.observe(1, &[2], 3), vec![2]);
        assert_eq!(tracker.count(2), Some(0));
    }

    #[test]
    fn test_higher_id_never_requests() {
        let mut tracker = ProximityTracker::default();

        for _ in 0..9 {
            assert!(tracker.observe(5, &[2], 3).is_empty());
        }
        // The counter still cycles on the passive side.
        assert_eq!(tracker.count(2), Some(0));
    }

    #[test]
    fn test_one_birth_per_window() {
        let mut lower = ProximityTracker::default();
        let mut higher = ProximityTracker::default();
        let mut births = 0;

        for _ in 0..9 {
            births += lower.observe(1, &[2], 3).len();
            births += higher.observe(2, &[1], 3).len();
        }

        assert_eq!(births, 3);
    }

    #[test]
    fn test_leaving_range_drops_counter() {
        let mut tracker = ProximityTracker::default();

        tracker.observe(1, &[2, 3], 3);
        tracker.observe(1, &[2, 3], 3);
        assert_eq!(tracker.len(), 2);

        tracker.observe(1, &[3], 3);
        assert_eq!(tracker.count(2), None);
        assert_eq!(tracker.count(3), Some(0));

        // Coming back restarts from scratch.
        tracker.observe(1, &[2, 3], 3);
        assert_eq!(tracker.count(2), Some(1));
    }

    #[test]
    fn test_empty_partner_list_clears() {
        let mut tracker = ProximityTracker::default();
        tracker.observe(1, &[2], 3);
        tracker.observe(1, &[], 3);
        assert!(tracker.is_empty());
    }
}
