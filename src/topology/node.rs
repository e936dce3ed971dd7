use std::collections::BTreeSet;
use std::fmt;

/// Canonical tier numbers, counted upwards from the servers
pub mod tier {
    pub const SERVER: u8 = 0;
    pub const TOR: u8 = 1;
    pub const AGG: u8 = 2;
    pub const CORE: u8 = 3;

    pub fn name(tier: u8) -> &'static str {
        match tier {
            SERVER => "server",
            TOR => "tor",
            AGG => "aggregation",
            CORE => "core",
            _ => "unknown",
        }
    }
}

/// Stable handle for a node: its tier plus its position within the tier.
///
/// Ordering is by tier first, then index, which is the listing order used
/// everywhere a deterministic sequence of nodes is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub tier: u8,
    pub index: u32,
}

impl NodeId {
    pub const fn new(tier: u8, index: u32) -> Self {
        Self { tier, index }
    }

    pub const fn server(index: u32) -> Self {
        Self::new(tier::SERVER, index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tier, self.index)
    }
}

/// A node record in the fabric arena
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub(super) neighbors: BTreeSet<NodeId>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            neighbors: BTreeSet::new(),
        }
    }

    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbors.iter().copied()
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}
