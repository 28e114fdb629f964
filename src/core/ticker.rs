//! Fixed-interval tick source for the live status reducer.

use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    pub interval: Duration,
    /// Stop after this many ticks. `None` runs until the callback breaks.
    pub max_ticks: Option<u64>,
}

impl Ticker {
    pub fn new(interval: Duration, max_ticks: Option<u64>) -> Self {
        Self {
            interval,
            max_ticks,
        }
    }

    /// Call `on_tick(n)` once per interval, starting immediately. Ticks are
    /// scheduled against a fixed deadline so a slow callback does not drift
    /// the cadence; missed ticks are skipped, not replayed.
    ///
    /// Returns the number of ticks delivered.
    pub fn run<E, F>(&self, mut on_tick: F) -> Result<u64, E>
    where
        F: FnMut(u64) -> Result<ControlFlow<()>, E>,
    {
        let mut delivered = 0u64;
        let mut deadline = Instant::now();

        loop {
            if self.max_ticks.is_some_and(|max| delivered >= max) {
                break;
            }

            delivered += 1;
            if on_tick(delivered)?.is_break() {
                break;
            }

            if self.max_ticks.is_some_and(|max| delivered >= max) {
                break;
            }

            deadline += self.interval;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }

        Ok(delivered)
    }
}
