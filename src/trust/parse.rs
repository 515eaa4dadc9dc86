use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::snapshot::{GraphSnapshot, PositionMap};

#[derive(Clone, Debug)]
pub struct TrustPayload {
    pub snapshot: GraphSnapshot,
    pub positions: PositionMap,
    pub bootstrap_progress: f64,
    pub num_tx: u64,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    graph_data: RawGraphData,
    #[serde(default)]
    positions: HashMap<String, [f64; 2]>,
    #[serde(default)]
    node_id: Value,
    #[serde(default)]
    bootstrap: RawBootstrap,
    #[serde(default)]
    num_tx: u64,
}

// node-link format as emitted by networkx; node ids may be strings
// or bare integers, so they come in as raw values.
#[derive(Debug, Deserialize)]
struct RawGraphData {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: Value,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    source: Value,
    target: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawBootstrap {
    #[serde(default)]
    progress: f64,
}

pub fn parse_payload(raw: &Value) -> Result<TrustPayload> {
    let payload = RawPayload::deserialize(raw)
        .context("trustview payload does not match the expected schema")?;

    let root_id = id_string(&payload.node_id)
        .ok_or_else(|| anyhow!("trustview payload carries no usable node_id"))?;

    let mut node_ids = HashSet::with_capacity(payload.graph_data.nodes.len());
    for node in &payload.graph_data.nodes {
        if let Some(id) = id_string(&node.id) {
            node_ids.insert(id);
        }
    }

    let mut edges = Vec::with_capacity(payload.graph_data.links.len());
    for link in &payload.graph_data.links {
        if let (Some(source), Some(target)) = (id_string(&link.source), id_string(&link.target)) {
            edges.push((source, target));
        }
    }

    if node_ids.is_empty() {
        return Err(anyhow!("trustview payload contains an empty graph"));
    }

    let positions = payload
        .positions
        .into_iter()
        .map(|(id, [x, y])| (id, (x, y)))
        .collect::<PositionMap>();

    Ok(TrustPayload {
        snapshot: GraphSnapshot {
            root_id,
            node_ids,
            edges,
        },
        positions,
        bootstrap_progress: payload.bootstrap.progress,
        num_tx: payload.num_tx,
    })
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
