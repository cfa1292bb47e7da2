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

#![deny(missing_docs, missing_debug_implementations)]

//! # Network Model
//!
//! A model is a set of named overlays (graphs) over a shared set of node ids. Each overlay has
//! its own nodes, edges and attributes, and can be directed and/or allow parallel edges. The
//! overlays `input` and `phy` always exist: `input` holds the topology as loaded, and `phy` is the
//! canonical source of interface data.
//!
//! ## Views and references
//!
//! Reading is done through views ([`Overlay`], [`Node`], [`Edge`], [`Interface`]) which borrow the
//! model. Mutation goes through [`OverlayMut`], which takes owned references ([`NodeRef`],
//! [`EdgeRef`], [`InterfaceRef`]). Both views and references compare by structural identity only,
//! ignoring the overlay they come from: `r1` in `phy` is equal to `r1` in `input`.
//!
//! ## Soft absence
//!
//! Looking up an overlay that does not exist is an error ([`Error::OverlayNotFound`](crate::Error)).
//! Everything else that is missing (nodes, edges, interfaces, attributes) is returned as `None` or
//! as an empty list, and construction steps that cannot be performed are skipped, logged and
//! recorded as [`Diagnostic`].
//!
//! ## Example usage
//!
//! ```rust
//! use netkit::model::{AttrValue, Attributes, NetworkModel};
//! use maplit::btreemap;
//!
//! fn main() -> Result<(), netkit::Error> {
//!     let mut model = NetworkModel::new();
//!
//!     let mut input = model.overlay_mut("input")?;
//!     for (name, asn) in &[("r1", 1), ("r2", 1), ("r3", 2)] {
//!         input.create_node(*name, btreemap! {
//!             "asn".to_string() => AttrValue::from(*asn),
//!             "device_type".to_string() => AttrValue::from("router"),
//!         })?;
//!     }
//!     input.add_edge("r1", "r2", Attributes::new())?;
//!     input.add_edge("r2", "r3", Attributes::new())?;
//!     input.allocate_input_interfaces()?;
//!
//!     // build phy from input
//!     let nodes = model.overlay("input")?.node_refs();
//!     let edges = model.overlay("input")?.edge_refs();
//!     let mut phy = model.overlay_mut("phy")?;
//!     phy.add_nodes_from(&nodes, &["asn", "device_type"], Attributes::new())?;
//!     phy.add_edges_from(&edges, &[], Attributes::new())?;
//!
//!     let phy = model.overlay("phy")?;
//!     let r2 = phy.node("r2").unwrap();
//!     assert_eq!(r2.degree(), 2);
//!     assert_eq!(r2.interfaces().len(), 3);
//!     assert_eq!(r2.loopback_zero().category(), Some("loopback"));
//!     assert_eq!(phy.edge("r2", "r1").unwrap().src_int().unwrap().description(), Some("r2 to r1"));
//!     Ok(())
//! }
//! ```

pub(crate) mod config;
pub(crate) mod construct;
pub(crate) mod edge;
pub(crate) mod graph;
pub(crate) mod interface;
pub(crate) mod network;
pub(crate) mod node;
pub(crate) mod overlay;
pub(crate) mod types;

pub use config::ModelConfig;
pub use construct::OverlayMut;
pub use edge::{Edge, EdgeRef};
pub use interface::{Interface, InterfaceRef, LOOPBACK, PHYSICAL};
pub use network::{NetworkModel, INPUT, PHY};
pub use node::{Node, NodeRef, FALLTHROUGH_ATTRS};
pub use overlay::{EdgeLookup, NodeLookup, Overlay, Subgraph, ToRefs};
pub use types::{
    natural_cmp, AttrValue, Attributes, Diagnostic, EdgeKey, InterfaceId, NodeId, ValueType,
    LOOPBACK_ZERO, RESERVED_KEYS,
};
