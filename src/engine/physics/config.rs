// Physics tuning - shared by every integrator

use crate::engine::game_loop::{FIXED_TIMESTEP, MAX_TICKS_PER_FRAME};

/// Integrator tuning constants
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    // Timing
    /// Length of one physics tick in seconds
    pub tick_period: f32,
    /// Most ticks a single frame may run
    pub max_ticks_per_frame: u32,

    // Contact classification
    /// Contacts whose normal aligns with "up" by more than this count as ground
    pub slope_threshold: f32,

    // Contact memory, in ticks
    /// Ticks a ground contact keeps the body grounded
    pub ground_refresh: u32,
    /// Ticks a wall contact keeps the body walled
    pub wall_refresh: u32,
    /// Ticks a ceiling contact keeps vertical position pinned
    pub ceiling_refresh: u32,
}

/// The tuning the game ships with
pub const BASE_CONFIG: PhysicsConfig = PhysicsConfig {
    tick_period: FIXED_TIMESTEP,
    max_ticks_per_frame: MAX_TICKS_PER_FRAME,

    // Roughly 66 degrees from flat still walks
    slope_threshold: 0.4,

    ground_refresh: 2,
    wall_refresh: 3,
    ceiling_refresh: 6,
};

impl Default for PhysicsConfig {
    fn default() -> Self {
        BASE_CONFIG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PhysicsConfig::default();
        assert_eq!(config, BASE_CONFIG);
        assert_eq!(config.slope_threshold, 0.4);
        assert_eq!(config.ground_refresh, 2);
        assert_eq!(config.ceiling_refresh, 6);
    }

    #[test]
    fn test_refresh_windows_are_positive() {
        let config = PhysicsConfig::default();
        assert!(config.ground_refresh > 0);
        assert!(config.wall_refresh > 0);
        assert!(config.ceiling_refresh > 0);
        assert!(config.tick_period > 0.0);
    }
}
