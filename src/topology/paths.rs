use std::collections::{BTreeMap, HashSet, VecDeque};

use rayon::prelude::*;

use super::builder::ClosTopology;
use super::fabric::Fabric;
use super::node::NodeId;

/// A simple path through the fabric, source first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path(Vec<NodeId>);

impl Path {
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// Number of edges traversed
    pub fn hop_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn source(&self) -> NodeId {
        self.0[0]
    }

    pub fn destination(&self) -> NodeId {
        self.0[self.0.len() - 1]
    }

    /// Consecutive node pairs: [n0,n1,n2] -> [(n0,n1),(n1,n2)]
    pub fn hops(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes().windows(2).map(|w| (w[0], w[1])).collect()
    }
}

/// Result of searching a single server pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    Found(Path),
    Disconnected { source: NodeId, destination: NodeId },
}

/// How the all-pairs search is scheduled. Both modes produce identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Sequential,
    Parallel,
}

/// Shortest paths for every unordered pair of distinct servers
#[derive(Debug, Clone, Default)]
pub struct ServerPaths {
    /// Keyed by (source, destination) with source the lower-indexed server
    pub paths: BTreeMap<(NodeId, NodeId), Path>,
    pub disconnected: Vec<(NodeId, NodeId)>,
}

/// Breadth-first search over partial paths.
///
/// Paths leave the queue in order of length, so the first one ending at
/// `destination` has the minimum hop count. A node is expanded at most once.
/// Returns `None` when either endpoint is missing or the two are disconnected.
pub fn shortest_path(fabric: &Fabric, source: NodeId, destination: NodeId) -> Option<Path> {
    if !fabric.contains(source) || !fabric.contains(destination) {
        return None;
    }
    if source == destination {
        return Some(Path(vec![source]));
    }

    let mut active: VecDeque<Vec<NodeId>> = VecDeque::new();
    let mut seen: HashSet<NodeId> = HashSet::new();
    active.push_back(vec![source]);

    while let Some(current) = active.pop_front() {
        let last = current[current.len() - 1];
        if last == destination {
            return Some(Path(current));
        }
        if !seen.insert(last) {
            continue;
        }
        for next in fabric.neighbors(last) {
            if !seen.contains(&next) {
                let mut extended = Vec::with_capacity(current.len() + 1);
                extended.extend_from_slice(&current);
                extended.push(next);
                active.push_back(extended);
            }
        }
    }
    None
}

fn search_pair(fabric: &Fabric, source: NodeId, destination: NodeId) -> PathOutcome {
    match shortest_path(fabric, source, destination) {
        Some(path) => PathOutcome::Found(path),
        None => PathOutcome::Disconnected {
            source,
            destination,
        },
    }
}

/// Compute a shortest path for each unordered pair of distinct servers.
///
/// Each pair is searched once, in ascending server order; the reverse pair
/// is never recorded. Disconnected pairs are logged and collected rather
/// than aborting the run.
pub fn all_server_paths(topology: &ClosTopology, mode: SearchMode) -> ServerPaths {
    let servers = topology.servers();
    let fabric = topology.fabric();

    let pairs: Vec<(NodeId, NodeId)> = servers
        .iter()
        .enumerate()
        .flat_map(|(i, a)| servers[i + 1..].iter().map(move |b| (*a, *b)))
        .collect();

    let outcomes: Vec<PathOutcome> = match mode {
        SearchMode::Sequential => pairs
            .iter()
            .map(|&(a, b)| search_pair(fabric, a, b))
            .collect(),
        SearchMode::Parallel => pairs
            .par_iter()
            .map(|&(a, b)| search_pair(fabric, a, b))
            .collect(),
    };

    let mut result = ServerPaths::default();
    for outcome in outcomes {
        match outcome {
            PathOutcome::Found(path) => {
                result
                    .paths
                    .insert((path.source(), path.destination()), path);
            }
            PathOutcome::Disconnected {
                source,
                destination,
            } => {
                tracing::warn!("No path found between servers {} and {}", source, destination);
                result.disconnected.push((source, destination));
            }
        }
    }

    tracing::debug!(
        "Computed {} server paths ({} disconnected pairs, longest {} hops)",
        result.paths.len(),
        result.disconnected.len(),
        result.paths.values().map(Path::hop_count).max().unwrap_or(0)
    );
    result
}
