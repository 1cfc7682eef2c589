//! Physical state of an agent: where it is and how much energy it has left.

use game_core::WorldPoint;

/// Energy meter clamped to `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Energy {
    current: f32,
    max: f32,
}

impl Energy {
    /// A full meter.
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn with_current(current: f32, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Removes `amount` and returns what is left.
    pub fn deplete(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount.max(0.0)).max(0.0);
        self.current
    }

    pub fn replenish(&mut self) {
        self.current = self.max;
    }

    /// Strictly below `threshold`.
    pub fn is_low(&self, threshold: f32) -> bool {
        self.current < threshold
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: WorldPoint,
    pub energy: Energy,
}

impl Body {
    pub fn new(position: WorldPoint, energy: Energy) -> Self {
        Self { position, energy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_clamps_at_both_ends() {
        let mut energy = Energy::with_current(150.0, 100.0);
        assert_eq!(energy.current(), 100.0);

        assert_eq!(energy.deplete(30.0), 70.0);
        assert!(!energy.is_low(70.0));
        assert!(energy.is_low(70.5));

        energy.deplete(500.0);
        assert!(energy.is_depleted());
        energy.replenish();
        assert_eq!(energy.current(), 100.0);
    }
}
