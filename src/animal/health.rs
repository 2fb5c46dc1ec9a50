use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f64,
    max: f64,
}

/// Maximum health never goes negative or non-finite, so clamping into
/// `[0, max]` cannot panic.
fn usable_max(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max
    } else {
        0.0
    }
}

impl Health {
    pub fn new(max: f64) -> Self {
        let max = usable_max(max);
        Self { current: max, max }
    }

    /// Builds a health value from persisted state, clamped into `[0, max]`.
    /// Non-finite values are rejected.
    pub fn from_saved(current: f64, max: f64) -> Option<Self> {
        if !current.is_finite() {
            return None;
        }
        let max = usable_max(max);
        Some(Self {
            current: current.clamp(0.0, max),
            max,
        })
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Removes `amount`, never going below zero. Returns false once depleted.
    pub fn drain(&mut self, amount: f64) -> bool {
        self.current = (self.current - amount).max(0.0);
        !self.is_depleted()
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    pub fn set(&mut self, value: f64) {
        self.current = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, self.max)
        };
    }

    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    pub fn below_fraction(&self, fraction: f64) -> bool {
        self.current < self.max * fraction
    }

    /// Pulls an out-of-range value back into bounds and reports what it was.
    pub fn enforce_bounds(&mut self) -> Option<f64> {
        if (0.0..=self.max).contains(&self.current) {
            return None;
        }
        let offending = self.current;
        self.current = if offending.is_nan() {
            0.0
        } else {
            offending.clamp(0.0, self.max)
        };
        Some(offending)
    }
}
