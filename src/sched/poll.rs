use std::time::{Duration, Instant};

use log::{debug, warn};
use serde_json::Value;

use crate::fetch::{FetchHandle, FetchState, GraphFetcher};

#[derive(Debug)]
pub enum PollOutcome {
    Fetched(Value),
    /// Null payload or failed call: a transient no-op.
    Empty,
    TimedOut,
}

/// Timing state machine for the periodic trustview fetch. `start` arms the
/// fetch delay and the timeout together — the timeout is deliberately
/// re-armed even when the fetch is still a full interval away, bounding
/// worst-case staleness to timeout + interval.
pub struct PollScheduler {
    refresh_interval: Duration,
    timeout_interval: Duration,
    fetch_deadline: Option<Instant>,
    timeout_deadline: Option<Instant>,
    last_fetch_started: Option<Instant>,
    in_flight: Option<Box<dyn FetchHandle>>,
}

impl PollScheduler {
    pub fn new(refresh_interval: Duration, timeout_interval: Duration) -> Self {
        Self {
            refresh_interval,
            timeout_interval,
            fetch_deadline: None,
            timeout_deadline: None,
            last_fetch_started: None,
            in_flight: None,
        }
    }

    pub fn start(&mut self, now: Instant, immediate: bool) {
        self.fetch_deadline = Some(if immediate {
            now
        } else {
            now + self.refresh_interval
        });
        self.timeout_deadline = Some(now + self.timeout_interval);
    }

    pub fn stop(&mut self) {
        self.fetch_deadline = None;
        self.timeout_deadline = None;
        if let Some(handle) = &mut self.in_flight {
            handle.cancel();
        }
        self.in_flight = None;
    }

    pub fn is_running(&self) -> bool {
        self.fetch_deadline.is_some() || self.timeout_deadline.is_some() || self.in_flight.is_some()
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.fetch_deadline, self.timeout_deadline) {
            (Some(fetch), Some(timeout)) => Some(fetch.min(timeout)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    pub fn tick(&mut self, now: Instant, fetcher: &mut dyn GraphFetcher) -> Option<PollOutcome> {
        // The timeout fires regardless of whether a fetch is outstanding,
        // and wins a same-instant race against a completed one.
        if let Some(deadline) = self.timeout_deadline
            && now >= deadline
        {
            if let Some(handle) = &mut self.in_flight {
                handle.cancel();
            }
            self.in_flight = None;
            self.start(now, false);
            debug!("trustview fetch timed out; next poll in {:?}", self.refresh_interval);
            return Some(PollOutcome::TimedOut);
        }

        if let Some(deadline) = self.fetch_deadline
            && now >= deadline
        {
            self.fetch_deadline = None;
            // Guard against duplicate triggers: skip unless a full refresh
            // interval has passed since the last attempt started.
            let due = self
                .last_fetch_started
                .is_none_or(|started| now.duration_since(started) >= self.refresh_interval);
            if due {
                if let Some(handle) = &mut self.in_flight {
                    handle.cancel();
                }
                self.last_fetch_started = Some(now);
                self.in_flight = Some(fetcher.fetch());
            }
        }

        if let Some(handle) = &mut self.in_flight {
            match handle.poll() {
                FetchState::Pending => {}
                FetchState::Ready(Some(value)) => {
                    self.in_flight = None;
                    return Some(PollOutcome::Fetched(value));
                }
                FetchState::Ready(None) => {
                    self.in_flight = None;
                    return Some(PollOutcome::Empty);
                }
                FetchState::Failed(error) => {
                    self.in_flight = None;
                    warn!("trustview fetch failed: {error}");
                    return Some(PollOutcome::Empty);
                }
                FetchState::Cancelled => {
                    self.in_flight = None;
                }
            }
        }

        None
    }
}
