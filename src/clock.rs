use std::time::Instant;

/// Frame clock: hands out wall-clock deltas for camera damping and
/// animation advancement.
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Seconds elapsed since the previous tick; advances the clock.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tick_measures_elapsed_time() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();
        assert!(delta >= 0.009 && delta <= 0.050);
    }

    #[test]
    fn tick_resets_the_baseline() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        let _ = clock.tick();
        let delta = clock.tick();
        assert!(delta < 0.005);
    }
}
