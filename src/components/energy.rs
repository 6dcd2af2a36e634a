//! Energy resource for characters.
//!
//! [`Energy`] clamps into `[0, max]`. [`Energy::deplete`] reports the
//! transition to zero exactly once, so the system layer can fire
//! [`EnergyDepletedEvent`](crate::events::energy::EnergyDepletedEvent)
//! without repeats while the value stays at zero.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Energy {
    pub current: u32,
    pub max: u32,
    /// Amount removed every logic step.
    pub drain_per_step: u32,
}

impl Energy {
    /// Full energy bar of size `max`.
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            drain_per_step: 0,
        }
    }

    pub fn with_drain(mut self, drain_per_step: u32) -> Self {
        self.drain_per_step = drain_per_step;
        self
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Fraction of the bar that is filled, in `[0, 1]`.
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    pub fn recover(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Returns true only when this call moved the value from above zero to zero.
    pub fn deplete(&mut self, amount: u32) -> bool {
        let was_positive = self.current > 0;
        self.current = self.current.saturating_sub(amount);
        was_positive && self.current == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recover_clamps_to_max() {
        let mut e = Energy::new(10);
        e.deplete(4);
        e.recover(100);
        assert_eq!(e.current, 10);
    }

    #[test]
    fn test_deplete_clamps_to_zero() {
        let mut e = Energy::new(10);
        e.deplete(25);
        assert_eq!(e.current, 0);
    }

    #[test]
    fn test_depletion_reported_once_per_transition() {
        let mut e = Energy::new(5);
        assert!(!e.deplete(3));
        assert!(e.deplete(3));
        assert!(!e.deplete(3));
        assert!(!e.deplete(0));
        e.recover(1);
        assert!(e.deplete(1));
    }

    #[test]
    fn test_ratio() {
        let mut e = Energy::new(4);
        e.deplete(1);
        assert!((e.ratio() - 0.75).abs() < f32::EPSILON);
        assert_eq!(Energy::new(0).ratio(), 0.0);
    }
}
