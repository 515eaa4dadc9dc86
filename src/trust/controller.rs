use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::fetch::GraphFetcher;
use crate::sched::{AnimationDriver, AnimationTick, PollOutcome, PollScheduler};

use super::compare::positions_changed;
use super::interpolate::{interpolate_positions, progress_fraction};
use super::parse::{TrustPayload, parse_payload};
use super::snapshot::{GraphSnapshot, PositionMap};

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(1000);
pub const TIMEOUT_INTERVAL: Duration = Duration::from_millis(5000);
pub const MAX_FRAMES: u32 = 3;
pub const ANIMATION_DURATION: Duration = Duration::from_millis(3000);

/// Orchestrates the poll/animate cycle. The UI layer only forwards
/// wall-clock ticks and reads the display state back.
pub struct GraphController<F: GraphFetcher> {
    fetcher: F,
    poll: PollScheduler,
    animation: AnimationDriver,
    snapshot: Option<GraphSnapshot>,
    positions: Option<PositionMap>,
    previous_positions: Option<PositionMap>,
    display_positions: Option<PositionMap>,
    bootstrap_percent: Option<u32>,
    status_line: String,
}

impl<F: GraphFetcher> GraphController<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            poll: PollScheduler::new(REFRESH_INTERVAL, TIMEOUT_INTERVAL),
            animation: AnimationDriver::new(MAX_FRAMES, ANIMATION_DURATION),
            snapshot: None,
            positions: None,
            previous_positions: None,
            display_positions: None,
            bootstrap_percent: None,
            status_line: String::new(),
        }
    }

    pub fn start(&mut self, now: Instant) {
        debug!("trust graph polling started");
        self.poll.start(now, true);
    }

    pub fn stop(&mut self) {
        self.poll.stop();
        self.animation.stop();
        debug!("trust graph polling stopped");
    }

    pub fn is_running(&self) -> bool {
        self.poll.is_running() || self.animation.is_running()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    pub fn has_in_flight(&self) -> bool {
        self.poll.has_in_flight()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.poll.next_deadline(), self.animation.next_deadline()) {
            (Some(poll), Some(frame)) => Some(poll.min(frame)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    /// Returns true when the displayed positions changed and the canvas
    /// should repaint.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.poll.tick(now, &mut self.fetcher) {
            Some(PollOutcome::Fetched(value)) => match parse_payload(&value) {
                Ok(payload) => self.apply_payload(now, payload),
                Err(error) => {
                    // Fail this one cycle and keep polling; never surfaced
                    // to the user as an error.
                    warn!("skipping malformed trustview payload: {error:#}");
                    self.poll.start(now, false);
                }
            },
            Some(PollOutcome::Empty) => {}
            Some(PollOutcome::TimedOut) => {}
            None => {}
        }

        let mut redraw = false;
        match self.animation.tick(now) {
            Some(AnimationTick::Frame(frame_count)) => {
                if let (Some(snapshot), Some(target)) = (&self.snapshot, &self.positions) {
                    let progress = progress_fraction(frame_count, self.animation.max_frames());
                    self.display_positions = Some(interpolate_positions(
                        &snapshot.node_ids,
                        target,
                        self.previous_positions.as_ref(),
                        progress,
                    ));
                    redraw = true;
                }
            }
            Some(AnimationTick::Finished) => {
                self.poll.start(now, false);
            }
            None => {}
        }
        redraw
    }

    fn apply_payload(&mut self, now: Instant, payload: TrustPayload) {
        self.bootstrap_percent =
            Some(((payload.bootstrap_progress * 100.0) as i64).clamp(0, 100) as u32);
        self.status_line = format!(
            "Transactions: {} | Peers: {}",
            payload.num_tx,
            payload.positions.len()
        );

        let previous = self.positions.take();
        let changed = positions_changed(previous.as_ref(), &payload.positions);
        self.previous_positions = previous;
        self.positions = Some(payload.positions);
        self.snapshot = Some(payload.snapshot);

        if changed {
            debug!("trust graph layout changed; starting transition");
            self.animation.arm(now);
        } else {
            self.poll.start(now, false);
        }
    }

    pub fn view(&self) -> Option<(&GraphSnapshot, &PositionMap)> {
        match (&self.snapshot, &self.display_positions) {
            (Some(snapshot), Some(positions)) => Some((snapshot, positions)),
            _ => None,
        }
    }

    /// `None` until the first successful fetch; the progress bar also
    /// hides once this reaches 100.
    pub fn bootstrap_percent(&self) -> Option<u32> {
        self.bootstrap_percent
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }
}
