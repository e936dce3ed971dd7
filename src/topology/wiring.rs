use super::builder::ClosLayout;
use super::fabric::Fabric;
use super::node::{tier, NodeId};
use super::TopologyError;

/// Wire every tier of a freshly sized fabric, top-down.
///
/// A single-level fabric has no aggregation or core, so only the ToR pass runs.
pub fn wire(fabric: &mut Fabric, layout: &ClosLayout) -> Result<(), TopologyError> {
    if layout.num_core > 0 && layout.num_agg > 0 {
        wire_core_to_agg(fabric, layout)?;
        tracing::debug!("Wired core to agg");
    }
    if layout.num_agg > 0 {
        wire_agg_to_tor(fabric, layout)?;
        tracing::debug!("Wired agg to tor");
    }
    wire_tor_to_servers(fabric, layout)?;
    tracing::debug!("Wired tor to servers");
    Ok(())
}

/// Each core switch fans out round-robin to one aggregation switch per pod
fn wire_core_to_agg(fabric: &mut Fabric, layout: &ClosLayout) -> Result<(), TopologyError> {
    for i in 0..layout.num_core {
        for j in 0..layout.switch_degree {
            let agg = (i as u64 + j as u64 * layout.pod_size as u64) % layout.num_agg as u64;
            fabric.add_edge(
                NodeId::new(tier::CORE, i),
                NodeId::new(tier::AGG, agg as u32),
            )?;
        }
    }
    Ok(())
}

/// Aggregation switches are grouped in pods of `pod_size`; every switch in a
/// pod connects to the pod's block of `downlinks` ToR switches.
fn wire_agg_to_tor(fabric: &mut Fabric, layout: &ClosLayout) -> Result<(), TopologyError> {
    let pod_size = layout.pod_size as u64;
    let downlinks = layout.downlinks as u64;
    for base in (0..layout.num_agg as u64).step_by(pod_size as usize) {
        let tor_base = base * downlinks / pod_size;
        for j in 0..pod_size {
            for k in 0..downlinks {
                fabric.add_edge(
                    NodeId::new(tier::AGG, (base + j) as u32),
                    NodeId::new(tier::TOR, (tor_base + k) as u32),
                )?;
            }
        }
    }
    Ok(())
}

/// ToR `i` serves the contiguous server range `i*downlinks .. (i+1)*downlinks`,
/// truncated at the clamped server count.
fn wire_tor_to_servers(fabric: &mut Fabric, layout: &ClosLayout) -> Result<(), TopologyError> {
    let downlinks = layout.downlinks as u64;
    for i in 0..layout.num_tor {
        for j in 0..downlinks {
            let server = i as u64 * downlinks + j;
            if server >= layout.num_servers as u64 {
                break;
            }
            fabric.add_edge(NodeId::new(tier::TOR, i), NodeId::server(server as u32))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::topology::{ClosParams, ClosTopology};

    use super::*;

    fn neighbors_in(fabric: &Fabric, id: NodeId, t: u8) -> Vec<u32> {
        fabric
            .neighbors(id)
            .filter(|n| n.tier == t)
            .map(|n| n.index)
            .collect()
    }

    #[test]
    fn test_minimal_fabric_wiring() {
        // levels=3, servers=4, degree=2, uplinks=1: one core, two agg, two tor, two servers
        let topo = ClosTopology::build(ClosParams::new(3, 4, 2, 1)).unwrap();
        let fabric = topo.fabric();

        assert_eq!(neighbors_in(fabric, NodeId::new(tier::CORE, 0), tier::AGG), vec![0, 1]);
        for agg in 0..2 {
            let id = NodeId::new(tier::AGG, agg);
            assert_eq!(neighbors_in(fabric, id, tier::TOR), vec![agg]);
            assert_eq!(neighbors_in(fabric, id, tier::CORE), vec![0]);
        }
        for tor in 0..2 {
            let id = NodeId::new(tier::TOR, tor);
            assert_eq!(neighbors_in(fabric, id, tier::SERVER), vec![tor]);
        }
        assert_eq!(fabric.edge_count(), 6);
    }

    #[test]
    fn test_pods_share_tor_blocks() {
        // degree=4, uplinks=2: pods of two agg switches, each pod owns two ToRs
        let topo = ClosTopology::build(ClosParams::new(3, 16, 4, 2)).unwrap();
        let fabric = topo.fabric();

        assert_eq!(neighbors_in(fabric, NodeId::new(tier::AGG, 0), tier::TOR), vec![0, 1]);
        assert_eq!(neighbors_in(fabric, NodeId::new(tier::AGG, 1), tier::TOR), vec![0, 1]);
        assert_eq!(neighbors_in(fabric, NodeId::new(tier::AGG, 2), tier::TOR), vec![2, 3]);
        assert_eq!(neighbors_in(fabric, NodeId::new(tier::AGG, 7), tier::TOR), vec![6, 7]);

        // core i reaches agg (i + 2j) mod 8 for j in 0..4
        assert_eq!(
            neighbors_in(fabric, NodeId::new(tier::CORE, 1), tier::AGG),
            vec![1, 3, 5, 7]
        );
        assert_eq!(
            neighbors_in(fabric, NodeId::new(tier::CORE, 2), tier::AGG),
            vec![0, 2, 4, 6]
        );
    }

    #[test]
    fn test_tor_server_truncation() {
        let topo = ClosTopology::build(ClosParams::new(3, 5, 4, 2)).unwrap();
        let fabric = topo.fabric();
        assert_eq!(neighbors_in(fabric, NodeId::new(tier::TOR, 0), tier::SERVER), vec![0, 1]);
        assert_eq!(neighbors_in(fabric, NodeId::new(tier::TOR, 2), tier::SERVER), vec![4]);
        assert!(neighbors_in(fabric, NodeId::new(tier::TOR, 3), tier::SERVER).is_empty());
        for s in 0..5 {
            assert_eq!(fabric.neighbors(NodeId::server(s)).count(), 1);
        }
    }

    #[test]
    fn test_no_orphaned_switches() {
        for params in [
            ClosParams::new(3, 1, 2, 1),
            ClosParams::new(3, 16, 4, 2),
            ClosParams::new(3, 7, 6, 3),
            ClosParams::new(3, 50, 5, 1),
            ClosParams::new(2, 3, 4, 2),
            ClosParams::new(4, 32, 4, 2),
        ] {
            let topo = ClosTopology::build(params).unwrap();
            for t in [tier::AGG, tier::TOR] {
                for id in topo.fabric().nodes_in_tier(t) {
                    assert!(
                        topo.fabric().neighbors(id).count() > 0,
                        "{} orphaned for {:?}",
                        id,
                        params
                    );
                }
            }
        }
    }

    #[test]
    fn test_edges_only_between_adjacent_tiers() {
        let topo = ClosTopology::build(ClosParams::new(3, 30, 6, 2)).unwrap();
        for node in topo.fabric().nodes() {
            for n in node.neighbors() {
                assert_eq!((node.id.tier as i32 - n.tier as i32).abs(), 1);
            }
        }
    }
}
