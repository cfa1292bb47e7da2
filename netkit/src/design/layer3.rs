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

//! Layer 3: logical connectivity between layer 3 devices

use super::layer2::LAYER2_CONN;
use super::mark_multipoint;
use crate::algorithms::{aggregate_nodes, explode_nodes};
use crate::model::{NetworkModel, ToRefs, INPUT};
use crate::propagate::copy_node_attr_from;
use crate::Error;

use std::collections::BTreeMap;

/// Name of the layer 3 overlay
pub const LAYER3: &str = "layer3";

/// # Layer 3
///
/// Builds `layer3` from `layer2_conn` and the switches of `input`. Adjacent switches are
/// aggregated, and the remaining switches are exploded into direct `multipoint` links between the
/// devices they connect. Without switches, `layer3` has the same nodes and edges as
/// `layer2_conn`.
pub fn build_layer3(model: &mut NetworkModel) -> Result<(), Error> {
    let (nodes, edges, switches, multi_edge) = {
        let conn = model.overlay(LAYER2_CONN)?;
        let input = model.overlay(INPUT)?;
        (conn.node_refs(), conn.edge_refs(), input.switches().to_refs(), conn.is_multigraph())
    };
    model.add_overlay(LAYER3, false, multi_edge)?.copy_nodes_from(&nodes, BTreeMap::new())?;
    copy_node_attr_from(model, LAYER2_CONN, LAYER3, "label", None, None, None, None)?;
    model.overlay_mut(LAYER3)?.copy_nodes_from(&switches, BTreeMap::new())?;
    copy_node_attr_from(model, INPUT, LAYER3, "asn", None, Some(&switches[..]), None, None)?;

    let mut l3 = model.overlay_mut(LAYER3)?;
    l3.add_edges_from(&edges, &[], BTreeMap::new())?;
    let switches = l3.view().switches().to_refs();
    aggregate_nodes(&mut l3, &switches)?;
    let switches = l3.view().switches().to_refs();
    let exploded = explode_nodes(&mut l3, &switches, &[])?;
    mark_multipoint(&mut l3, &exploded)
}
