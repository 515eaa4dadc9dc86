use std::collections::HashSet;

use super::snapshot::PositionMap;

/// Fallback target for nodes that vanished from the new layout.
pub const TARGET_ANCHOR: (f64, f64) = (0.0, 0.0);
/// Fallback origin for nodes that appeared in the new layout.
pub const PREVIOUS_ANCHOR: (f64, f64) = (0.0, 1.0);

// frame_count runs from max_frames down to 1, so the first rendered frame
// is already 1/max_frames of the way toward the target and the last one
// sits exactly on it.
pub fn progress_fraction(frame_count: u32, max_frames: u32) -> f64 {
    1.0 - (f64::from(frame_count) - 1.0) / f64::from(max_frames)
}

/// Straight-line interpolation per node, covering exactly the ids in
/// `node_ids`. Nodes missing from `target` head for the target anchor;
/// nodes missing from `previous` set off from the previous anchor. With no
/// previous generation at all the target positions are returned as-is.
/// Inputs are never mutated.
pub fn interpolate_positions(
    node_ids: &HashSet<String>,
    target: &PositionMap,
    previous: Option<&PositionMap>,
    progress: f64,
) -> PositionMap {
    let Some(previous) = previous else {
        return node_ids
            .iter()
            .filter_map(|id| target.get(id).map(|&pos| (id.clone(), pos)))
            .collect();
    };

    node_ids
        .iter()
        .map(|id| {
            let (tx, ty) = target.get(id).copied().unwrap_or(TARGET_ANCHOR);
            let (px, py) = previous.get(id).copied().unwrap_or(PREVIOUS_ANCHOR);
            let actual = (px + (tx - px) * progress, py + (ty - py) * progress);
            (id.clone(), actual)
        })
        .collect()
}
