// Fixed timestep accounting
//
// Converts variable frame time into a whole number of fixed simulation ticks.
// Leftover time stays in the accumulator for the next frame, so the
// simulation advances identically regardless of frame rate.

/// Default simulation rate (30 ticks per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 30.0;

/// Maximum number of ticks per frame to prevent spiral of death
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// Length of one tick in seconds
    period: f32,

    /// Accumulated time not yet consumed by ticks
    accumulator: f32,

    /// Tick cap per call to `advance`
    max_ticks: u32,

    /// Inactive timers discard time instead of accumulating it
    active: bool,

    /// Total ticks produced
    tick_count: u64,
}

impl FixedTimestep {
    /// Create an active timestep with the given period and tick cap
    pub fn new(period: f32, max_ticks: u32) -> Self {
        Self {
            period,
            accumulator: 0.0,
            max_ticks,
            active: true,
            tick_count: 0,
        }
    }

    /// Feed one frame's elapsed time, returns the number of fixed ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        // Inactive timers don't accumulate time
        if !self.active {
            self.accumulator = 0.0;
            return 0;
        }

        self.accumulator += dt.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.period && ticks < self.max_ticks {
            self.accumulator -= self.period;
            ticks += 1;
        }

        if ticks == self.max_ticks && self.accumulator >= self.period {
            log::warn!(
                "Fixed timestep capped at {} ticks, {:.3}s carried over",
                self.max_ticks,
                self.accumulator
            );
        }

        self.tick_count += ticks as u64;
        ticks
    }

    /// Total ticks produced
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate or deactivate; deactivating drops accumulated time
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            if !active {
                self.accumulator = 0.0;
            }
            log::debug!(
                "Fixed timestep {}",
                if active { "activated" } else { "deactivated" }
            );
        }
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FIXED_TIMESTEP, MAX_TICKS_PER_FRAME)
    }
}
