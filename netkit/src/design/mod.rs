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

//! # Design Builders
//!
//! Builders deriving the protocol overlays from the physical topology. Each builder reads the
//! overlays created by the previous ones, so they must run in the following order (which is what
//! [`build_network`] does):
//!
//! 1. [`build_phy`]: `phy` from `input`, after allocating the input interfaces.
//! 2. [`build_layer1`]: `layer1` (collision domains) and `layer1_conn`.
//! 3. [`build_layer2`]: `layer2` (broadcast domains), `layer2_conn` and `layer2_bc`.
//! 4. [`build_layer3`]: `layer3`, where switches are aggregated and exploded.
//! 5. [`build_igp`]: `ospf`, `eigrp`, `isis`, `rip` and the summary overlay `igp`.
//! 6. [`build_bgp`]: `ebgp`, `bgp` (with the iBGP sessions).
//!
//! The builders only read conventional attributes set by the loader on `input`: `asn`,
//! `device_type`, `igp`, `ospf_area`, `ibgp_role`, `ibgp_l2_cluster`, `ibgp_l3_cluster`, `x` and
//! `y`. Routing protocols are only configured if the `phy` data has `enable_routing` set.

mod bgp;
mod igp;
mod layer1;
mod layer2;
mod layer3;

pub use bgp::{build_bgp, build_ebgp, build_ibgp};
pub use igp::{build_eigrp, build_igp, build_isis, build_ospf, build_rip};
pub use layer1::build_layer1;
pub use layer2::{build_layer2, check_layer2};
pub use layer3::build_layer3;

use crate::model::{AttrValue, Attributes, EdgeRef, NetworkModel, OverlayMut, INPUT, PHY};
use crate::Error;

use log::*;

/// Node attributes copied from `input` into `phy`.
pub const PHY_ATTRS: [&str; 10] = [
    "label",
    "asn",
    "device_type",
    "device_subtype",
    "platform",
    "host",
    "syntax",
    "igp",
    "x",
    "y",
];

/// Build `phy` from `input`. The input interfaces are allocated first (unless the loader did so),
/// such that every physical edge is bound to one interface on each side. The `enable_routing` flag
/// of the input data is carried over, and defaults to `true`.
pub fn build_phy(model: &mut NetworkModel) -> Result<(), Error> {
    model.overlay_mut(INPUT)?.allocate_input_interfaces()?;
    let (nodes, edges, enable_routing) = {
        let input = model.overlay(INPUT)?;
        let enable_routing = input.data().get("enable_routing").map(|v| v.is_truthy()).unwrap_or(true);
        (input.node_refs(), input.edge_refs(), enable_routing)
    };
    let mut phy = model.overlay_mut(PHY)?;
    phy.add_nodes_from(&nodes, &PHY_ATTRS, Attributes::new())?;
    phy.add_edges_from(&edges, &[], Attributes::new())?;
    phy.set_data("enable_routing", enable_routing)?;
    info!("Built phy with {} nodes and {} edges", nodes.len(), edges.len());
    Ok(())
}

/// Run all builders on a model whose `input` overlay is populated. `phy` is built only if it is
/// still empty.
pub fn build_network(model: &mut NetworkModel) -> Result<(), Error> {
    if model.overlay(PHY)?.is_empty() {
        build_phy(model)?;
    }
    build_layer1(model)?;
    build_layer2(model)?;
    build_layer3(model)?;
    build_igp(model)?;
    build_bgp(model)?;
    Ok(())
}

/// Returns `true` if routing protocols should be configured.
pub(crate) fn routing_enabled(model: &NetworkModel) -> Result<bool, Error> {
    Ok(model.overlay(PHY)?.data().get("enable_routing").map(|v| v.is_truthy()).unwrap_or(false))
}

/// Flag edges (created by exploding a shared medium) and their interfaces as `multipoint`.
pub(crate) fn mark_multipoint(overlay: &mut OverlayMut<'_>, edges: &[EdgeRef]) -> Result<(), Error> {
    for edge in edges {
        overlay.set_edge_attr(edge, "multipoint", true)?;
        overlay.apply_to_interfaces(edge, "multipoint")?;
    }
    Ok(())
}

/// Coordinate of a node inserted between its neighbors: their average, shifted by `0.1`.
pub(crate) fn shifted(value: Option<AttrValue>) -> Option<AttrValue> {
    value.and_then(|v| v.as_float()).map(|v| AttrValue::Float(v + 0.1))
}
