mod compare;
mod controller;
mod interpolate;
mod parse;
mod snapshot;

pub use compare::positions_changed;
pub use controller::{GraphController, TIMEOUT_INTERVAL};
pub use interpolate::{interpolate_positions, progress_fraction};
pub use parse::{TrustPayload, parse_payload};
pub use snapshot::{GraphSnapshot, PositionMap};
