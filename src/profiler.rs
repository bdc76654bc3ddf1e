use std::time::Instant;

#[derive(Debug, Clone, Copy)]
pub struct BenchClock {
    start: Instant,
}

impl BenchClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Logs named phases of a run, and the total when dropped.
pub struct Profiler {
    clock: BenchClock,
    curr: Option<Step>,
}

struct Step {
    clock: BenchClock,
    name: String,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            clock: BenchClock::start(),
            curr: None,
        }
    }

    pub fn step(&mut self, step_name: &str) {
        self.finish();
        debug!("{} - START", step_name);
        self.curr = Some(Step {
            clock: BenchClock::start(),
            name: step_name.to_string(),
        });
    }

    /// Closes the current step, returning its duration.
    pub fn finish(&mut self) -> Option<u64> {
        let step = self.curr.take()?;
        let elapsed = step.clock.elapsed_micros();
        debug!("{} - STOP {} µs", step.name, elapsed);
        Some(elapsed)
    }

    pub fn total(&mut self) -> u64 {
        self.finish();
        let elapsed = self.clock.elapsed_micros();
        debug!("TOTAL - {} µs", elapsed);
        elapsed
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Profiler {
    fn drop(&mut self) {
        self.finish();
    }
}
