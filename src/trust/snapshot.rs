use std::collections::{HashMap, HashSet};

/// Node positions in the normalized unit square, keyed by peer id.
pub type PositionMap = HashMap<String, (f64, f64)>;

#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    pub root_id: String,
    pub node_ids: HashSet<String>,
    pub edges: Vec<(String, String)>,
}
