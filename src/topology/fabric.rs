use std::collections::BTreeMap;

use super::node::{Node, NodeId};
use super::TopologyError;

/// Undirected graph of fabric nodes, keyed by their stable `NodeId` handle.
///
/// Adjacency lives on each node record; every edge is stored on both
/// endpoints so either side can walk it.
#[derive(Debug, Clone, Default)]
pub struct Fabric {
    nodes: BTreeMap<NodeId, Node>,
}

impl Fabric {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns false if a node with the same id already exists.
    pub fn add_node(&mut self, id: NodeId) -> bool {
        if self.nodes.contains_key(&id) {
            return false;
        }
        self.nodes.insert(id, Node::new(id));
        true
    }

    /// Remove a node after detaching it from all of its neighbors.
    /// Returns false if the node was not present.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.remove(&id) else {
            return false;
        };
        for adjacent in node.neighbors {
            if let Some(other) = self.nodes.get_mut(&adjacent) {
                other.neighbors.remove(&id);
            }
        }
        true
    }

    /// Connect two nodes in both directions. Connecting an existing pair is a no-op.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<(), TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop(a));
        }
        if !self.nodes.contains_key(&b) {
            return Err(TopologyError::UnknownNode(b));
        }
        self.nodes
            .get_mut(&a)
            .ok_or(TopologyError::UnknownNode(a))?
            .neighbors
            .insert(b);
        if let Some(node) = self.nodes.get_mut(&b) {
            node.neighbors.insert(a);
        }
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Neighbors of `id` in ascending order; empty for unknown nodes
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.get(&id).into_iter().flat_map(|n| n.neighbors())
    }

    /// All nodes of a tier, sorted by index
    pub fn nodes_in_tier(&self, tier: u8) -> Vec<NodeId> {
        self.nodes
            .range(NodeId::new(tier, 0)..=NodeId::new(tier, u32::MAX))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.degree()).sum::<usize>() / 2
    }
}
