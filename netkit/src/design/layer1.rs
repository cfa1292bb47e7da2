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

//! Layer 1: collision domains

use super::{mark_multipoint, shifted};
use crate::algorithms::{aggregate_nodes, explode_nodes, split_edges};
use crate::model::{Attributes, EdgeRef, NetworkModel, NodeRef, ToRefs, PHY};
use crate::propagate::{neigh_average, neigh_most_frequent};
use crate::Error;

use log::*;
use maplit::btreemap;

/// Name of the layer 1 overlay
pub const LAYER1: &str = "layer1";
/// Name of the layer 1 connectivity overlay
pub const LAYER1_CONN: &str = "layer1_conn";

/// # Layer 1
///
/// Builds `layer1` and `layer1_conn`:
///
/// - `layer1` contains the nodes and edges of `phy`. Adjacent hubs are aggregated, and all
///   remaining hubs are flagged as `collision_domain`. Every point-to-point edge (not touching a
///   hub) is split by a new `collision_domain` node with the id `cd_<a>_<b>`. Its position is the
///   average position of its neighbors (plus `0.1`), and its `asn` the most frequent `asn` of its
///   neighbors.
/// - `layer1_conn` contains the same nodes, but the collision domains are exploded into direct
///   `multipoint` links.
///
/// Both overlays are multigraphs if `phy` is one.
pub fn build_layer1(model: &mut NetworkModel) -> Result<(), Error> {
    build_layer1_base(model)?;
    split_ptp(model)?;
    build_layer1_conn(model)
}

fn build_layer1_base(model: &mut NetworkModel) -> Result<(), Error> {
    let (nodes, edges, multi_edge) = {
        let phy = model.overlay(PHY)?;
        (phy.node_refs(), phy.edge_refs(), phy.is_multigraph())
    };
    let mut l1 = model.add_overlay(LAYER1, false, multi_edge)?;
    l1.add_nodes_from(&nodes, &[], Attributes::new())?;
    l1.add_edges_from(&edges, &[], Attributes::new())?;

    let hubs = l1.view().hubs().to_refs();
    aggregate_nodes(&mut l1, &hubs)?;
    let hubs = l1.view().hubs().to_refs();
    l1.update_nodes(&hubs, &btreemap! {"collision_domain".to_string() => true.into()})?;
    Ok(())
}

fn split_ptp(model: &mut NetworkModel) -> Result<(), Error> {
    let mut l1 = model.overlay_mut(LAYER1)?;
    let to_split: Vec<EdgeRef> = l1
        .view()
        .edges()
        .into_iter()
        .filter(|e| !(e.src().is_hub() || e.dst().is_hub()))
        .map(|e| e.to_ref())
        .collect();
    for edge in to_split.iter() {
        l1.set_edge_attr(edge, "split", true)?;
    }

    let created: Vec<NodeRef> = split_edges(&mut l1, &to_split, &["split"], "cd_")?;
    debug!("Created {} collision domains", created.len());
    l1.update_nodes(
        &created,
        &btreemap! {
            "device_type".to_string() => "collision_domain".into(),
            "collision_domain".to_string() => true.into(),
        },
    )?;

    let placement: Vec<_> = {
        let view = l1.view();
        let phy = l1.model().overlay(PHY)?;
        created
            .iter()
            .map(|n| {
                (
                    n.clone(),
                    shifted(neigh_average(&view, n, "x", Some(&phy))),
                    shifted(neigh_average(&view, n, "y", Some(&phy))),
                    neigh_most_frequent(&view, n, "asn", Some(&phy), false),
                )
            })
            .collect()
    };
    for (node, x, y, asn) in placement {
        for (key, value) in vec![("x", x), ("y", y), ("asn", asn)] {
            if let Some(value) = value {
                l1.set_node_attr(&node, key, value)?;
            }
        }
    }
    Ok(())
}

fn build_layer1_conn(model: &mut NetworkModel) -> Result<(), Error> {
    let (nodes, edges, multi_edge) = {
        let l1 = model.overlay(LAYER1)?;
        (l1.node_refs(), l1.edge_refs(), l1.is_multigraph())
    };
    let mut conn = model.add_overlay(LAYER1_CONN, false, multi_edge)?;
    conn.add_nodes_from(&nodes, &["collision_domain"], Attributes::new())?;
    conn.add_edges_from(&edges, &[], Attributes::new())?;

    let domains = conn.view().nodes_with("collision_domain").to_refs();
    let exploded = explode_nodes(&mut conn, &domains, &[])?;
    mark_multipoint(&mut conn, &exploded)
}
