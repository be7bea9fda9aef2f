//! Background worker that keeps the activity log moving

use chrono::{DateTime, Utc};
use std::time::Instant;
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::handlers::AppState;

/// Appends one generated log entry per tick and prunes expired rate-limit windows
pub struct LogFeeder {
    state: AppState,
    interval: Duration,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTick {
    /// Log buffer size after the append
    pub logs: usize,
    /// Rate-limit windows dropped
    pub pruned: usize,
}

impl LogFeeder {
    /// Create a feeder ticking every `interval`
    pub fn new(state: AppState, interval: Duration) -> Self {
        Self { state, interval }
    }

    /// Run one cycle at `now`
    pub fn tick(&self, now: DateTime<Utc>) -> FeedTick {
        self.tick_at(now, Instant::now())
    }

    /// Run one cycle, stamping the entry with `now` and pruning windows expired by `clock`
    pub fn tick_at(&self, now: DateTime<Utc>, clock: Instant) -> FeedTick {
        let entry = self.state.source.log_entry(now);
        let logs = {
            let mut store = self.state.logs_mut();
            store.append(entry);
            store.len()
        };
        let pruned = self.state.rate_limiter.prune(clock);

        FeedTick { logs, pruned }
    }

    /// Run until Ctrl+C
    pub async fn run(self) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately.
        ticker.tick().await;

        tracing::info!("Log feeder started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let result = self.tick(Utc::now());
                    tracing::debug!(logs = result.logs, pruned = result.pruned, "Feed tick");
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping log feeder");
                    break;
                }
            }
        }
    }

    /// Run exactly `cycles` ticks, then return
    pub async fn run_cycles(&self, cycles: usize) -> Vec<FeedTick> {
        let mut ticker = interval(self.interval);
        ticker.tick().await;

        let mut ticks = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            ticker.tick().await;
            ticks.push(self.tick(Utc::now()));
        }
        ticks
    }
}
