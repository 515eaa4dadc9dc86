mod animation;
mod poll;

pub use animation::{AnimationDriver, AnimationTick};
pub use poll::{PollOutcome, PollScheduler};
