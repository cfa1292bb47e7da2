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

//! Networks for testing
//!
//! Every example network returns a model with the `input` overlay populated, and `phy` built
//! from it (see [`build_phy`](crate::design::build_phy)). The remaining overlays can be derived
//! with [`build_network`](crate::design::build_network).

use crate::model::{AttrValue, Attributes, NetworkModel, NodeRef, OverlayMut};

use maplit::btreemap;

mod housenet;
pub use housenet::HouseNet;

mod mixednet;
pub use mixednet::MixedNet;

mod multiedgenet;
pub use multiedgenet::MultiEdgeNet;

mod multiasnet;
pub use multiasnet::MultiAsNet;

/// Trait for easier access to example networks.
pub trait ExampleNetwork {
    /// Get the model with `input` and `phy` prepared.
    fn model() -> NetworkModel;
}

/// Add a device to the `input` overlay.
fn device(
    input: &mut OverlayMut<'_>,
    id: &str,
    device_type: &str,
    asn: i64,
    pos: (i64, i64),
    mut attrs: Attributes,
) -> NodeRef {
    attrs.insert("device_type".to_string(), AttrValue::from(device_type));
    attrs.insert("asn".to_string(), AttrValue::from(asn));
    attrs.insert("x".to_string(), AttrValue::from(pos.0));
    attrs.insert("y".to_string(), AttrValue::from(pos.1));
    input.create_node(id, attrs).unwrap()
}

/// Add an OSPF router to the `input` overlay.
fn router(input: &mut OverlayMut<'_>, id: &str, asn: i64, pos: (i64, i64)) -> NodeRef {
    device(input, id, "router", asn, pos, btreemap! {"igp".to_string() => AttrValue::from("ospf")})
}

/// Add links between the given pairs of nodes to the `input` overlay.
fn links(input: &mut OverlayMut<'_>, pairs: &[(&str, &str)]) {
    for (a, b) in pairs {
        input.add_edge(*a, *b, Attributes::new()).unwrap();
    }
}
