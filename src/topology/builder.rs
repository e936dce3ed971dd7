use super::fabric::Fabric;
use super::node::{tier, NodeId};
use super::{wiring, TopologyError};

/// Structural parameters of a Clos fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosParams {
    /// Fabric depth; bounds the server count and the tiers listed in exports
    pub levels: u32,
    /// Requested server count, clamped to what the fabric can host
    pub servers: u32,
    /// Total ports per switch (uplinks + downlinks)
    pub switch_degree: u32,
    /// Ports per switch facing the core
    pub uplinks: u32,
}

impl ClosParams {
    pub fn new(levels: u32, servers: u32, switch_degree: u32, uplinks: u32) -> Self {
        Self {
            levels,
            servers,
            switch_degree,
            uplinks,
        }
    }

    /// Reject parameter sets that cannot describe a fabric
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.levels < 1 || self.levels > u8::MAX as u32 {
            return Err(TopologyError::invalid(format!(
                "levels must be between 1 and {}, got {}",
                u8::MAX,
                self.levels
            )));
        }
        if self.switch_degree < 2 {
            return Err(TopologyError::invalid(format!(
                "switchDegree must be at least 2, got {}",
                self.switch_degree
            )));
        }
        if self.uplinks < 1 {
            return Err(TopologyError::invalid("uplinkNum must be at least 1"));
        }
        if self.uplinks >= self.switch_degree {
            return Err(TopologyError::invalid(format!(
                "uplinkNum ({}) must be smaller than switchDegree ({})",
                self.uplinks, self.switch_degree
            )));
        }
        Ok(())
    }
}

/// Per-tier sizes derived from `ClosParams`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosLayout {
    pub levels: u32,
    pub switch_degree: u32,
    pub downlinks: u32,
    pub max_servers: u32,
    pub num_servers: u32,
    pub pod_size: u32,
    pub num_core: u32,
    pub num_agg: u32,
    pub num_tor: u32,
    pub num_switches: u32,
}

impl ClosLayout {
    /// Derive tier sizes.
    ///
    /// A single level is a bare ToR layer; any deeper fabric gets the full
    /// core/aggregation/ToR stack. Servers past ToR capacity (levels > 3)
    /// are created but left unwired.
    pub fn derive(params: &ClosParams) -> Result<Self, TopologyError> {
        params.validate()?;

        let overflow = || TopologyError::invalid("parameters produce a fabric too large to model");

        let degree = params.switch_degree;
        let downlinks = degree - params.uplinks;
        let max_servers = downlinks
            .checked_pow(params.levels - 1)
            .and_then(|n| n.checked_mul(degree))
            .ok_or_else(overflow)?;
        let num_servers = params.servers.min(max_servers);

        let pod_size = params.uplinks;
        let num_core = if params.levels >= 2 {
            pod_size.checked_mul(params.uplinks).ok_or_else(overflow)?
        } else {
            0
        };
        let num_agg = if params.levels >= 2 {
            pod_size.checked_mul(degree).ok_or_else(overflow)?
        } else {
            0
        };
        let num_tor = downlinks.checked_mul(degree).ok_or_else(overflow)?;
        let num_switches = num_core
            .checked_add(num_agg)
            .and_then(|n| n.checked_add(num_tor))
            .ok_or_else(overflow)?;

        Ok(Self {
            levels: params.levels,
            switch_degree: degree,
            downlinks,
            max_servers,
            num_servers,
            pod_size,
            num_core,
            num_agg,
            num_tor,
            num_switches,
        })
    }

    /// Node count for a tier, zero for tiers without switches
    pub fn tier_size(&self, t: u8) -> u32 {
        match t {
            tier::SERVER => self.num_servers,
            tier::TOR => self.num_tor,
            tier::AGG => self.num_agg,
            tier::CORE => self.num_core,
            _ => 0,
        }
    }
}

/// A sized and wired Clos fabric
#[derive(Debug, Clone)]
pub struct ClosTopology {
    params: ClosParams,
    layout: ClosLayout,
    fabric: Fabric,
}

impl ClosTopology {
    /// Size the tiers, create every node and wire the fabric
    pub fn build(params: ClosParams) -> Result<Self, TopologyError> {
        let layout = ClosLayout::derive(&params)?;
        let mut fabric = Fabric::new();

        for t in (tier::SERVER..=tier::CORE).rev() {
            let count = layout.tier_size(t);
            for index in 0..count {
                fabric.add_node(NodeId::new(t, index));
            }
            tracing::debug!("Added {} {} nodes", count, tier::name(t));
        }

        wiring::wire(&mut fabric, &layout)?;

        tracing::debug!(
            "Built fabric: numCore={} numAgg={} numTor={} numServers={} nodes={} edges={}",
            layout.num_core,
            layout.num_agg,
            layout.num_tor,
            layout.num_servers,
            fabric.node_count(),
            fabric.edge_count()
        );

        Ok(Self {
            params,
            layout,
            fabric,
        })
    }

    pub fn params(&self) -> &ClosParams {
        &self.params
    }

    pub fn layout(&self) -> &ClosLayout {
        &self.layout
    }

    pub fn fabric(&self) -> &Fabric {
        &self.fabric
    }

    pub fn levels(&self) -> u32 {
        self.layout.levels
    }

    /// Server nodes sorted by index
    pub fn servers(&self) -> Vec<NodeId> {
        self.fabric.nodes_in_tier(tier::SERVER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_parameters() {
        for params in [
            ClosParams::new(0, 4, 4, 2),
            ClosParams::new(256, 4, 4, 2),
            ClosParams::new(3, 4, 0, 0),
            ClosParams::new(3, 4, 1, 1),
            ClosParams::new(3, 4, 4, 0),
            ClosParams::new(3, 4, 4, 4),
            ClosParams::new(3, 4, 4, 5),
        ] {
            assert!(
                matches!(
                    ClosTopology::build(params),
                    Err(TopologyError::InvalidParameters(_))
                ),
                "expected {:?} to be rejected",
                params
            );
        }
    }

    #[test]
    fn test_layout_derivation() {
        let layout = ClosLayout::derive(&ClosParams::new(3, 100, 4, 2)).unwrap();
        assert_eq!(layout.downlinks, 2);
        assert_eq!(layout.max_servers, 16);
        assert_eq!(layout.num_servers, 16);
        assert_eq!(layout.pod_size, 2);
        assert_eq!(layout.num_core, 4);
        assert_eq!(layout.num_agg, 8);
        assert_eq!(layout.num_tor, 8);
        assert_eq!(layout.num_switches, 20);
    }

    #[test]
    fn test_server_count_clamped() {
        let clamped = ClosTopology::build(ClosParams::new(3, 4, 2, 1)).unwrap();
        assert_eq!(clamped.layout().max_servers, 2);
        assert_eq!(clamped.servers().len(), 2);

        let exact = ClosTopology::build(ClosParams::new(3, 5, 4, 2)).unwrap();
        assert_eq!(exact.servers().len(), 5);
    }

    #[test]
    fn test_switch_count_and_tiers() {
        for params in [
            ClosParams::new(3, 16, 4, 2),
            ClosParams::new(3, 10, 6, 2),
            ClosParams::new(2, 8, 4, 1),
            ClosParams::new(1, 3, 3, 1),
        ] {
            let topo = ClosTopology::build(params).unwrap();
            let layout = topo.layout();
            assert_eq!(
                layout.num_switches,
                layout.num_core + layout.num_agg + layout.num_tor
            );
            assert_eq!(
                topo.fabric().node_count() as u32,
                layout.num_switches + layout.num_servers
            );
            let top = if params.levels == 1 { tier::TOR } else { tier::CORE };
            assert!(topo.fabric().nodes().all(|n| n.id.tier <= top));
        }
    }

    #[test]
    fn test_single_level_has_no_core_or_agg() {
        let topo = ClosTopology::build(ClosParams::new(1, 10, 4, 1)).unwrap();
        let layout = topo.layout();
        assert_eq!(layout.num_core, 0);
        assert_eq!(layout.num_agg, 0);
        assert_eq!(layout.num_tor, 12);
        assert_eq!(layout.max_servers, 4);
        assert_eq!(layout.num_servers, 4);
        assert!(topo.fabric().nodes_in_tier(tier::CORE).is_empty());
        assert!(topo.fabric().nodes_in_tier(tier::AGG).is_empty());
    }

    #[test]
    fn test_two_levels_keeps_core() {
        let topo = ClosTopology::build(ClosParams::new(2, 100, 4, 2)).unwrap();
        assert_eq!(topo.layout().num_core, 4);
        assert_eq!(topo.layout().num_agg, 8);
        assert_eq!(topo.layout().max_servers, 8);
        assert_eq!(topo.fabric().nodes_in_tier(tier::CORE).len(), 4);
    }

    #[test]
    fn test_deep_fabric_accepted() {
        let topo = ClosTopology::build(ClosParams::new(4, 8, 4, 2)).unwrap();
        let layout = topo.layout();
        assert_eq!(layout.max_servers, 32);
        assert_eq!(layout.num_servers, 8);
        assert_eq!(layout.num_switches, 20);
        assert_eq!(topo.levels(), 4);

        let full = ClosTopology::build(ClosParams::new(4, 100, 4, 2)).unwrap();
        assert_eq!(full.servers().len(), 32);
        // 8 ToRs with 2 downlinks each: servers 16.. have no ToR
        assert_eq!(full.fabric().neighbors(NodeId::server(15)).count(), 1);
        assert_eq!(full.fabric().neighbors(NodeId::server(16)).count(), 0);
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert!(matches!(
            ClosLayout::derive(&ClosParams::new(3, 1, u32::MAX, 1)),
            Err(TopologyError::InvalidParameters(_))
        ));
    }
}
