use serde::Deserialize;

use crate::topology::ClosParams;

/// Query parameters for `GET /topo`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyQuery {
    pub levels: u32,
    pub num_servers: u32,
    pub switch_degree: u32,
    pub uplink_num: u32,
}

impl From<&TopologyQuery> for ClosParams {
    fn from(q: &TopologyQuery) -> Self {
        ClosParams::new(q.levels, q.num_servers, q.switch_degree, q.uplink_num)
    }
}
