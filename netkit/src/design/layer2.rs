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

//! Layer 2: broadcast domains

use super::layer1::LAYER1;
use super::{mark_multipoint, shifted};
use crate::algorithms::{explode_nodes, split_edges};
use crate::model::{AttrValue, EdgeRef, NetworkModel, Node, NodeRef, ToRefs, PHY};
use crate::propagate::{copy_node_attr_from, neigh_attr, neigh_average, neigh_equal, neigh_most_frequent};
use crate::Error;

use log::*;
use maplit::btreemap;
use std::collections::BTreeMap;

/// Name of the layer 2 overlay
pub const LAYER2: &str = "layer2";
/// Name of the layer 2 connectivity overlay
pub const LAYER2_CONN: &str = "layer2_conn";
/// Name of the layer 2 broadcast overlay
pub const LAYER2_BC: &str = "layer2_bc";

/// # Layer 2
///
/// Builds the following overlays:
///
/// - `layer2`: nodes and edges of `layer1`, with collision domains turned into broadcast domains.
/// - `layer2_conn`: same as `layer2`, but broadcast domains are exploded into direct
///   `multipoint` links.
/// - `layer2_bc`: layer 3 devices and switches with the links of `layer2_conn`, where every link
///   between two layer 3 devices is split by a broadcast domain node `cd_<a>_<b>`. Switches are
///   broadcast domains themselves.
///
/// The topology is checked with [`check_layer2`] in between.
pub fn build_layer2(model: &mut NetworkModel) -> Result<(), Error> {
    build_layer2_base(model)?;
    build_layer2_conn(model)?;
    check_layer2(model)?;
    build_layer2_broadcast(model)
}

fn build_layer2_base(model: &mut NetworkModel) -> Result<(), Error> {
    let (nodes, edges, domains, multi_edge) = {
        let l1 = model.overlay(LAYER1)?;
        let domains = l1.nodes_with("collision_domain").to_refs();
        (l1.node_refs(), l1.edge_refs(), domains, l1.is_multigraph())
    };
    let mut l2 = model.add_overlay(LAYER2, false, multi_edge)?;
    l2.copy_nodes_from(&nodes, BTreeMap::new())?;
    l2.copy_edges_from(&edges, false, BTreeMap::new())?;
    l2.update_nodes(
        &domains,
        &btreemap! {
            "broadcast_domain".to_string() => true.into(),
            "device_type".to_string() => "broadcast_domain".into(),
        },
    )?;
    copy_node_attr_from(model, LAYER1, LAYER2, "asn", None, Some(&domains[..]), None, None)
}

fn build_layer2_conn(model: &mut NetworkModel) -> Result<(), Error> {
    let (nodes, edges, multi_edge) = {
        let l2 = model.overlay(LAYER2)?;
        (l2.node_refs(), l2.edge_refs(), l2.is_multigraph())
    };
    model.add_overlay(LAYER2_CONN, false, multi_edge)?.copy_nodes_from(&nodes, BTreeMap::new())?;
    copy_node_attr_from(model, LAYER2, LAYER2_CONN, "broadcast_domain", None, None, None, None)?;

    let mut conn = model.overlay_mut(LAYER2_CONN)?;
    conn.copy_edges_from(&edges, false, BTreeMap::new())?;
    let domains = conn.view().nodes_with("broadcast_domain").to_refs();
    let exploded = explode_nodes(&mut conn, &domains, &[])?;
    mark_multipoint(&mut conn, &exploded)
}

/// # Layer 2 sanity checks
///
/// Warns about switches in `layer2` which connect both devices of the same AS (IGP) and devices
/// of different ASes (eBGP), and about parallel edges between a switch and a device. Returns the
/// warnings.
pub fn check_layer2(model: &NetworkModel) -> Result<Vec<String>, Error> {
    let l2 = model.overlay(LAYER2)?;
    let mut warnings = Vec::new();
    let mut switches = l2.switches();
    switches.sort();

    for switch in switches.iter() {
        let mut neigh_asns: BTreeMap<i64, usize> = BTreeMap::new();
        for asn in switch.neighbors().iter().filter_map(|n| n.asn()) {
            *neigh_asns.entry(asn).or_default() += 1;
        }
        let is_igp = neigh_asns.values().any(|c| *c > 1);
        let is_ebgp = neigh_asns.len() > 1;
        if is_igp && is_ebgp {
            warnings.push(format!("Switch {} contains both IGP and eBGP neighbors", switch));
        }
    }

    for switch in switches.iter() {
        let mut neighbors: Vec<Node> = switch.neighbors();
        neighbors.sort();
        for neighbor in neighbors {
            let src = [switch.id()];
            let dst = [neighbor.id()];
            let parallel = l2.edges_filtered(Some(&src[..]), Some(&dst[..]), &[]).len();
            if parallel > 1 {
                warnings.push(format!(
                    "There are multiple parallel edges ({}) between {} and device {}",
                    parallel, switch, neighbor
                ));
            }
        }
    }

    for w in warnings.iter() {
        warn!("{}", w);
    }
    Ok(warnings)
}

fn build_layer2_broadcast(model: &mut NetworkModel) -> Result<(), Error> {
    let (devices, switches, edges, multi_edge) = {
        let l2 = model.overlay(LAYER2)?;
        let conn = model.overlay(LAYER2_CONN)?;
        (l2.l3devices().to_refs(), l2.switches().to_refs(), conn.edge_refs(), conn.is_multigraph())
    };
    let mut bc = model.add_overlay(LAYER2_BC, false, multi_edge)?;
    bc.copy_nodes_from(&devices, BTreeMap::new())?;
    bc.copy_nodes_from(&switches, BTreeMap::new())?;
    bc.copy_edges_from(&edges, false, BTreeMap::new())?;

    let to_split: Vec<EdgeRef> = bc
        .view()
        .edges()
        .into_iter()
        .filter(|e| e.src().is_l3device() && e.dst().is_l3device())
        .map(|e| e.to_ref())
        .collect();
    for edge in to_split.iter() {
        bc.set_edge_attr(edge, "split", true)?;
    }
    let created: Vec<NodeRef> = split_edges(&mut bc, &to_split, &["split"], "cd_")?;

    type Placement = (NodeRef, Option<AttrValue>, Option<AttrValue>, Option<AttrValue>, Option<AttrValue>);
    let placement: Vec<Placement> = {
        let view = bc.view();
        let phy = bc.model().overlay(PHY)?;
        created
            .iter()
            .map(|n| {
                let host = if neigh_equal(&view, n, "host", Some(&phy)) {
                    neigh_attr(&view, n, "host", Some(&phy)).into_iter().next().flatten()
                } else {
                    None
                };
                (
                    n.clone(),
                    shifted(neigh_average(&view, n, "x", Some(&phy))),
                    shifted(neigh_average(&view, n, "y", Some(&phy))),
                    neigh_most_frequent(&view, n, "asn", Some(&phy), false),
                    host,
                )
            })
            .collect()
    };
    for (node, x, y, asn, host) in placement {
        for (key, value) in vec![("x", x), ("y", y), ("asn", asn), ("host", host)] {
            if let Some(value) = value {
                bc.set_node_attr(&node, key, value)?;
            }
        }
    }

    let flag = btreemap! {"broadcast_domain".to_string() => AttrValue::from(true)};
    bc.update_nodes(&switches, &flag)?;
    bc.update_nodes(&created, &flag)?;
    bc.update_nodes(&created, &btreemap! {"device_type".to_string() => "broadcast_domain".into()})?;
    info!("Built {} with {} broadcast domains", LAYER2_BC, created.len() + switches.len());

    let mut phy = model.overlay_mut(PHY)?;
    phy.update_nodes(&switches, &flag)
}
