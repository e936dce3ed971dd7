//! Clos fabric model: tier sizing, deterministic wiring and server-to-server
//! shortest paths.
//!
//! The flow is `ClosParams` -> `ClosTopology::build` (sizing + wiring) ->
//! `all_server_paths` -> `TopologyPayload` for the HTTP layer.

mod builder;
mod export;
mod fabric;
mod node;
mod paths;
mod wiring;

pub use builder::{ClosLayout, ClosParams, ClosTopology};
pub use export::{LabelStyle, TopologyPayload};
pub use paths::{all_server_paths, SearchMode};

use node::NodeId;

/// Errors raised while building or mutating a fabric
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
}

impl TopologyError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}
