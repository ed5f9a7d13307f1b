/// Monotonic tick counter. Tick 0 is "before the first tick".
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
}

impl SimClock {
    /// Create a clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick. Returns the new tick number.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        assert_eq!(SimClock::new().tick(), 0);
    }

    #[test]
    fn clock_advance_increments() {
        let mut clock = SimClock::new();
        clock.advance();
        clock.advance();
        assert_eq!(clock.advance(), 3);
        assert_eq!(clock.tick(), 3);
    }
}
