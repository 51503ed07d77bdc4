use std::time::Duration;

/// Rolling window of tick execution times.
#[derive(Debug, Clone)]
pub struct TickTimer {
    history: Vec<Duration>,
    next: usize,
    filled: bool,
    overruns: u64,
    budget: Duration,
}

/// Summary of the timer window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub samples: usize,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
    /// Ticks whose execution exceeded the budget, over the whole session.
    pub overruns: u64,
}

impl TickTimer {
    /// Keep the last `capacity` samples; ticks longer than `budget` count as overruns.
    pub fn new(capacity: usize, budget: Duration) -> Self {
        Self {
            history: vec![Duration::ZERO; capacity.max(1)],
            next: 0,
            filled: false,
            overruns: 0,
            budget,
        }
    }

    /// Record one tick's execution time.
    pub fn record(&mut self, elapsed: Duration) {
        if elapsed > self.budget {
            self.overruns += 1;
            tracing::debug!(?elapsed, budget = ?self.budget, "tick overran its budget");
        }
        self.history[self.next] = elapsed;
        self.next = (self.next + 1) % self.history.len();
        if self.next == 0 {
            self.filled = true;
        }
    }

    fn window(&self) -> &[Duration] {
        if self.filled {
            &self.history
        } else {
            &self.history[..self.next]
        }
    }

    pub fn stats(&self) -> TickStats {
        let window = self.window();
        if window.is_empty() {
            return TickStats {
                overruns: self.overruns,
                ..TickStats::default()
            };
        }
        let total: Duration = window.iter().sum();
        TickStats {
            samples: window.len(),
            average: total / window.len() as u32,
            min: window.iter().copied().min().unwrap_or_default(),
            max: window.iter().copied().max().unwrap_or_default(),
            overruns: self.overruns,
        }
    }
}
