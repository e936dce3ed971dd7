use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::builder::ClosTopology;
use super::node::NodeId;
use super::paths::ServerPaths;

/// Node label format used in the exported payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// Tier digit followed by the index, e.g. tier 1 index 12 -> "112".
    /// Unambiguous because tiers never exceed a single digit.
    #[default]
    Compact,
    /// Tier and index separated by a colon, e.g. "1:12"
    Delimited,
}

impl FromStr for LabelStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "delimited" => Ok(Self::Delimited),
            other => Err(format!("unknown label style: {}", other)),
        }
    }
}

pub fn label(id: NodeId, style: LabelStyle) -> String {
    match style {
        LabelStyle::Compact => format!("{}{}", id.tier, id.index),
        LabelStyle::Delimited => format!("{}:{}", id.tier, id.index),
    }
}

/// Derived counts reported alongside the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub levels: u32,
    pub num_core: u32,
    pub num_agg: u32,
    pub num_tor: u32,
    pub num_servers: u32,
    pub num_switches: u32,
    pub max_servers: u32,
    pub disconnected_pairs: usize,
}

/// Serializable view of a built fabric and its server paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyPayload {
    /// Tier -> labels sorted by index, for every tier 0..=levels
    pub topo: BTreeMap<u32, Vec<String>>,
    /// Node label -> neighbor labels
    pub connections: BTreeMap<String, Vec<String>>,
    /// "<source>-<destination>" -> [from, to] hop pairs
    pub paths: BTreeMap<String, Vec<[String; 2]>>,
    pub summary: TopologySummary,
}

impl TopologyPayload {
    pub fn from_topology(topology: &ClosTopology, server_paths: &ServerPaths, style: LabelStyle) -> Self {
        let fabric = topology.fabric();

        let topo = (0..=topology.levels())
            .map(|t| {
                let labels = fabric
                    .nodes_in_tier(t as u8)
                    .into_iter()
                    .map(|id| label(id, style))
                    .collect();
                (t, labels)
            })
            .collect();

        let connections = fabric
            .nodes()
            .map(|node| {
                let neighbors = node.neighbors().map(|n| label(n, style)).collect();
                (label(node.id, style), neighbors)
            })
            .collect();

        let paths = server_paths
            .paths
            .iter()
            .map(|((source, destination), path)| {
                let key = format!("{}-{}", label(*source, style), label(*destination, style));
                let hops = path
                    .hops()
                    .into_iter()
                    .map(|(from, to)| [label(from, style), label(to, style)])
                    .collect();
                (key, hops)
            })
            .collect();

        let layout = topology.layout();
        let summary = TopologySummary {
            levels: layout.levels,
            num_core: layout.num_core,
            num_agg: layout.num_agg,
            num_tor: layout.num_tor,
            num_servers: layout.num_servers,
            num_switches: layout.num_switches,
            max_servers: layout.max_servers,
            disconnected_pairs: server_paths.disconnected.len(),
        };

        Self {
            topo,
            connections,
            paths,
            summary,
        }
    }
}
