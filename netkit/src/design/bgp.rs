// netkit: Multi-Layer Network Models and Design Rules
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # BGP
//!
//! Builds the directed overlays `ebgp` and `bgp`. eBGP sessions follow the layer 3 links between
//! routers of different ASes. iBGP sessions are derived from the `ibgp_role` of each router, and
//! from its route reflector clusters, and are established between the loopback zero interfaces.

use super::layer3::LAYER3;
use super::routing_enabled;
use crate::model::{AttrValue, Attributes, EdgeRef, InterfaceRef, NetworkModel, NodeRef, INPUT, LOOPBACK_ZERO};
use crate::propagate::{copy_int_attr_from, copy_node_attr_from};
use crate::Error;

use log::*;
use maplit::btreemap;

/// Name of the eBGP overlay
pub const EBGP: &str = "ebgp";
/// Name of the combined BGP overlay
pub const BGP: &str = "bgp";

/// Regular iBGP speaker, part of the full mesh.
pub const PEER: &str = "Peer";
/// Top level route reflector
pub const RR: &str = "RR";
/// Hierarchical route reflector, client of an RR and reflector of its own clients
pub const HRR: &str = "HRR";
/// Route reflector client
pub const RRC: &str = "RRC";
/// Router which does not participate in iBGP
pub const DISABLED: &str = "Disabled";

/// # eBGP
///
/// Builds the directed overlay `ebgp`, containing all routers of `layer3`, and an edge in both
/// directions for every layer 3 link between routers of different ASes. All edges have
/// `type = "ebgp"`.
pub fn build_ebgp(model: &mut NetworkModel) -> Result<(), Error> {
    let (routers, links) = {
        let l3 = model.overlay(LAYER3)?;
        let links: Vec<(EdgeRef, Option<AttrValue>)> = l3
            .edges()
            .into_iter()
            .filter(|e| e.src().is_router() && e.dst().is_router())
            .filter(|e| e.src().asn() != e.dst().asn())
            .map(|e| (e.to_ref(), e.get("multipoint").cloned()))
            .collect();
        let routers: Vec<NodeRef> = l3.routers().into_iter().map(|n| n.to_ref()).collect();
        (routers, links)
    };
    model.add_overlay(EBGP, true, false)?.copy_nodes_from(&routers, Attributes::new())?;
    copy_int_attr_from(model, LAYER3, EBGP, "multipoint", None, None, None, None)?;
    let mut g = model.overlay_mut(EBGP)?;
    let mut sessions = Vec::new();
    for (link, multipoint) in links {
        let mut attrs = btreemap! {"type".to_string() => AttrValue::from("ebgp")};
        if let Some(m) = multipoint {
            attrs.insert("multipoint".to_string(), m);
        }
        sessions.extend(g.copy_edges_from(&[link], true, attrs)?);
    }
    info!("{} eBGP sessions", sessions.len());
    Ok(())
}

/// Router taking part in iBGP
#[derive(Debug, Clone)]
struct Speaker {
    node: NodeRef,
    role: String,
    rr_cluster: Option<AttrValue>,
    hrr_cluster: Option<AttrValue>,
}

impl Speaker {
    fn is(&self, role: &str) -> bool {
        self.role == role
    }
}

/// Both clusters are set and equal.
fn same_cluster(a: &Option<AttrValue>, b: &Option<AttrValue>) -> bool {
    a.is_some() && a == b
}

/// iBGP sessions of the routers in a single AS, as `(src, dst, direction)`.
///
/// - Peers and RRs form a full mesh (`over`).
/// - RRs peer `down` with RRCs and HRRs of the same `rr_cluster`, which peer `up` with them.
/// - HRRs peer `down` with RRCs of the same `hrr_cluster` which are in no `rr_cluster`, and those
///   RRCs peer `up` with the HRR.
fn ibgp_sessions(speakers: &[Speaker]) -> Vec<(NodeRef, NodeRef, &'static str)> {
    let with_role = |role: &str| speakers.iter().filter(|s| s.is(role)).collect::<Vec<_>>();
    let (peers, rrs, hrrs, rrcs) = (with_role(PEER), with_role(RR), with_role(HRR), with_role(RRC));

    let invalid: Vec<String> = rrcs
        .iter()
        .filter(|r| r.rr_cluster.is_some() && r.hrr_cluster.is_some())
        .map(|r| r.node.to_string())
        .collect();
    if !invalid.is_empty() {
        warn!(
            "RRCs can only have either a rr_cluster or hrr_cluster set, using rr_cluster for: {}",
            invalid.join(", ")
        );
    }

    let mut sessions: Vec<(&Speaker, &Speaker, &'static str)> = Vec::new();
    let mesh: Vec<&Speaker> = peers.iter().chain(rrs.iter()).copied().collect();
    for &s in mesh.iter() {
        for &t in mesh.iter() {
            sessions.push((s, t, "over"));
        }
    }
    for &s in rrs.iter() {
        for &t in rrcs.iter().chain(hrrs.iter()).filter(|t| same_cluster(&s.rr_cluster, &t.rr_cluster)) {
            sessions.push((s, t, "down"));
        }
    }
    for &s in hrrs.iter() {
        for &t in rrs.iter().filter(|t| same_cluster(&s.rr_cluster, &t.rr_cluster)) {
            sessions.push((s, t, "up"));
        }
        for &t in rrcs.iter().filter(|t| t.rr_cluster.is_none()) {
            if same_cluster(&s.hrr_cluster, &t.hrr_cluster) {
                sessions.push((s, t, "down"));
            }
        }
    }
    for &s in rrcs.iter() {
        for &t in rrs.iter().filter(|t| same_cluster(&s.rr_cluster, &t.rr_cluster)) {
            sessions.push((s, t, "up"));
        }
        if s.rr_cluster.is_none() {
            for &t in hrrs.iter().filter(|t| same_cluster(&s.hrr_cluster, &t.hrr_cluster)) {
                sessions.push((s, t, "up"));
            }
        }
    }

    sessions
        .into_iter()
        .filter(|(s, t, _)| s.node != t.node)
        .map(|(s, t, d)| (s.node.clone(), t.node.clone(), d))
        .collect()
}

/// # iBGP
///
/// Adds the iBGP sessions to the `bgp` overlay. The role of each router is read from `ibgp_role`
/// of `input` (defaults to `Peer`), its clusters from `ibgp_l3_cluster` (stored as `rr_cluster`)
/// and `ibgp_l2_cluster` (stored as `hrr_cluster`). Routers with role `Disabled` get no sessions.
/// Sessions have `type = "ibgp"`, and a `direction` (`over`, `up` or `down`).
pub fn build_ibgp(model: &mut NetworkModel) -> Result<(), Error> {
    copy_node_attr_from(model, INPUT, BGP, "ibgp_role", None, None, None, None)?;
    copy_node_attr_from(model, INPUT, BGP, "ibgp_l2_cluster", Some("hrr_cluster"), None, None, None)?;
    copy_node_attr_from(model, INPUT, BGP, "ibgp_l3_cluster", Some("rr_cluster"), None, None, None)?;

    let mut g = model.overlay_mut(BGP)?;
    let roleless: Vec<NodeRef> = g
        .view()
        .nodes()
        .into_iter()
        .filter(|n| n.get("ibgp_role").is_none())
        .map(|n| n.to_ref())
        .collect();
    for node in roleless.iter() {
        g.set_node_attr(node, "ibgp_role", PEER)?;
    }

    let groups: Vec<Vec<Speaker>> = {
        let view = g.view();
        let (disabled, speakers): (Vec<_>, Vec<_>) =
            view.nodes().into_iter().partition(|n| n.get("ibgp_role").map(|r| *r == DISABLED).unwrap_or(false));
        match disabled.len() {
            0 => {}
            n if n < 10 => info!(
                "Skipping iBGP for iBGP disabled nodes: {}",
                disabled.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(", ")
            ),
            _ => info!("Skipping iBGP for more than 10 iBGP disabled nodes"),
        }

        let rr_mismatch: Vec<String> = speakers
            .iter()
            .filter(|n| n.get("ibgp_role").map(|r| *r == RR).unwrap_or(false) && n.get("rr_cluster").is_none())
            .map(|n| n.to_string())
            .collect();
        if !rr_mismatch.is_empty() {
            warn!("Some routers are set as RR but have no rr_cluster: {}", rr_mismatch.join(", "));
        }
        let hrr_mismatch: Vec<String> = speakers
            .iter()
            .filter(|n| n.get("ibgp_role").map(|r| *r == HRR).unwrap_or(false) && n.get("hrr_cluster").is_none())
            .map(|n| n.to_string())
            .collect();
        if !hrr_mismatch.is_empty() {
            warn!("Some routers are set as HRR but have no hrr_cluster: {}", hrr_mismatch.join(", "));
        }

        view.groupby("asn", Some(&speakers[..]))
            .into_iter()
            .map(|(_, members)| {
                members
                    .iter()
                    .map(|n| Speaker {
                        node: n.to_ref(),
                        role: n.get("ibgp_role").and_then(|r| r.as_str()).unwrap_or(PEER).to_string(),
                        rr_cluster: n.get("rr_cluster").cloned(),
                        hrr_cluster: n.get("hrr_cluster").cloned(),
                    })
                    .collect()
            })
            .collect()
    };

    let name = g.name().to_string();
    for speakers in groups.iter() {
        for (src, dst, direction) in ibgp_sessions(speakers) {
            let pair = (
                InterfaceRef::new(name.as_str(), src.id, LOOPBACK_ZERO),
                InterfaceRef::new(name.as_str(), dst.id, LOOPBACK_ZERO),
            );
            g.create_edges_from(
                &[pair],
                false,
                btreemap! {
                    "type".to_string() => AttrValue::from("ibgp"),
                    "direction".to_string() => AttrValue::from(direction),
                },
            )?;
        }
    }
    debug!("{}: {} sessions", name, g.view().edge_count());
    Ok(())
}

/// # BGP
///
/// Builds `ebgp` (see [`build_ebgp`]) and the combined overlay `bgp`, which holds all routers of
/// `layer3`, the eBGP sessions and the iBGP sessions (see [`build_ibgp`]). Nodes with an eBGP
/// session, and the interfaces of eBGP sessions, are flagged with `ebgp`. Every interface is
/// flagged as `multipoint` if one of its edges is. Nothing is built if routing is disabled.
pub fn build_bgp(model: &mut NetworkModel) -> Result<(), Error> {
    if !routing_enabled(model)? {
        info!("Routing disabled, not configuring BGP");
        return Ok(());
    }
    build_ebgp(model)?;

    let (routers, sessions) = {
        let ebgp = model.overlay(EBGP)?;
        (ebgp.node_refs(), ebgp.edge_refs())
    };
    let mut g = model.add_overlay(BGP, true, false)?;
    g.copy_nodes_from(&routers, Attributes::new())?;
    g.add_edges_from(&sessions, &["type", "multipoint"], Attributes::new())?;
    copy_node_attr_from(model, INPUT, BGP, "custom_config_bgp", Some("custom_config"), None, None, None)?;

    let mut g = model.overlay_mut(BGP)?;
    let (speakers, interfaces) = {
        let view = g.view();
        let ebgp_edges: Vec<_> =
            view.edges().into_iter().filter(|e| e.get("type").map(|t| *t == "ebgp").unwrap_or(false)).collect();
        let mut speakers: Vec<NodeRef> = ebgp_edges.iter().map(|e| e.src().to_ref()).collect();
        speakers.sort();
        speakers.dedup();
        let interfaces: Vec<InterfaceRef> =
            ebgp_edges.iter().flat_map(|e| e.interfaces()).map(|i| i.to_ref()).collect();
        (speakers, interfaces)
    };
    g.update_nodes(&speakers, &btreemap! {"ebgp".to_string() => AttrValue::from(true)})?;
    for interface in interfaces.iter() {
        g.set_interface_attr(interface, "ebgp", true)?;
    }

    let multipoint: Vec<(InterfaceRef, bool)> = g
        .view()
        .nodes()
        .iter()
        .flat_map(|n| n.interfaces())
        .map(|i| {
            let flag = i.edges().iter().any(|e| e.get("multipoint").map(|m| m.is_truthy()).unwrap_or(false));
            (i.to_ref(), flag)
        })
        .collect();
    for (interface, flag) in multipoint {
        g.set_interface_attr(&interface, "multipoint", flag)?;
    }

    build_ibgp(model)
}

#[cfg(test)]
mod test {
    use super::*;

    fn speaker(id: &str, role: &str, rr: Option<i64>, hrr: Option<i64>) -> Speaker {
        Speaker {
            node: NodeRef::new(BGP, id),
            role: role.to_string(),
            rr_cluster: rr.map(AttrValue::from),
            hrr_cluster: hrr.map(AttrValue::from),
        }
    }

    fn pairs(sessions: &[(NodeRef, NodeRef, &str)], direction: &str) -> Vec<(String, String)> {
        let mut p: Vec<(String, String)> = sessions
            .iter()
            .filter(|(_, _, d)| *d == direction)
            .map(|(s, t, _)| (s.id.to_string(), t.id.to_string()))
            .collect();
        p.sort();
        p
    }

    #[test]
    fn full_mesh() {
        let speakers = vec![speaker("r1", PEER, None, None), speaker("r2", PEER, None, None), speaker("r3", PEER, None, None)];
        let sessions = ibgp_sessions(&speakers);
        assert_eq!(sessions.len(), 6);
        assert!(sessions.iter().all(|(_, _, d)| *d == "over"));
    }

    #[test]
    fn route_reflection() {
        let speakers = vec![
            speaker("rr", RR, Some(1), None),
            speaker("hrr", HRR, Some(1), Some(7)),
            speaker("c1", RRC, Some(1), None),
            speaker("c2", RRC, None, Some(7)),
            speaker("c3", RRC, None, Some(8)),
        ];
        let sessions = ibgp_sessions(&speakers);
        assert!(pairs(&sessions, "over").is_empty());
        assert_eq!(
            pairs(&sessions, "down"),
            vec![("hrr".to_string(), "c2".to_string()), ("rr".to_string(), "c1".to_string()), ("rr".to_string(), "hrr".to_string())]
        );
        assert_eq!(
            pairs(&sessions, "up"),
            vec![("c1".to_string(), "rr".to_string()), ("c2".to_string(), "hrr".to_string()), ("hrr".to_string(), "rr".to_string())]
        );
    }
}
