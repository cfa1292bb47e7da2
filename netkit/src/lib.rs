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

#![deny(missing_docs)]

//! # NetKit: Multi-Overlay Network Model
//! This is a library for modelling a network as a set of annotated graphs (*overlays*) over one
//! shared set of devices, and for deriving protocol overlays (OSPF, iBGP, layer 3, ...) from a
//! physical topology.
//!
//! Every overlay has its own nodes, edges and attributes, but nodes, edges and interfaces are
//! identified across all overlays by their ids. This allows a builder to take a node from `phy`,
//! and look up the same device in `ospf`, or to copy the interface bindings of an edge from one
//! overlay into the next.
//!
//! ## Structure
//!
//! This library is structured in the following way:
//!
//! - **[`Model`](model)**: The overlay store ([`NetworkModel`](model::NetworkModel)), the read-only
//!   views ([`Overlay`](model::Overlay), [`Node`](model::Node), [`Edge`](model::Edge),
//!   [`Interface`](model::Interface)), and the construction API
//!   ([`OverlayMut`](model::OverlayMut)).
//!
//! - **[`Algorithms`](algorithms)**: Graph transformations used to reshape overlays: aggregating
//!   connected nodes into one device, exploding a device into a clique of its neighbors, splitting
//!   edges, and some queries (components, boundary nodes, shortest paths).
//!
//! - **[`Propagate`](propagate)**: Copy attributes between overlays (with type coercion and
//!   defaults), and aggregate the attribute values of neighbors.
//!
//! - **[`Design`](design)**: Builders deriving the layer 1, layer 2, layer 3, IGP and BGP
//!   overlays from `phy`.
//!
//! - **[`ExampleNetworks`](example_networks)**: Collection of prepared topologies.
//!
//! - **[`Printer`](printer)**: Human readable dumps of overlays.
//!
//! ## Usage
//!
//! ```
//! use netkit::design::build_network;
//! use netkit::example_networks::{ExampleNetwork, HouseNet};
//! use netkit::Error;
//!
//! fn main() -> Result<(), Error> {
//!     // prepare the model with `input` and `phy`
//!     let mut model = HouseNet::model();
//!
//!     // derive all protocol overlays
//!     build_network(&mut model)?;
//!
//!     let ospf = model.overlay("ospf")?;
//!     assert_eq!(ospf.len(), 5);
//!     Ok(())
//! }
//! ```

// test modules
pub mod example_networks;
mod test;

pub mod algorithms;
pub mod design;
mod error;
pub mod model;
pub mod printer;
pub mod propagate;

pub use error::Error;
