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

//! # Graph Transformations
//!
//! Algorithms which reshape an overlay while keeping the interface bindings of all edges
//! consistent. They are used by the [design builders](crate::design) to remove shared media
//! (hubs, switches, collision domains) from a protocol view, or to insert such nodes.
//!
//! - [`aggregate_nodes`]: merge each connected group of nodes into a single device.
//! - [`explode_nodes`]: replace a node by a clique of edges between its neighbors.
//! - [`split`] / [`split_edges`]: insert a new node into an edge.
//! - [`connected_subgraphs`], [`boundary_nodes`] and [`shortest_path`]: read-only queries.
//!
//! All transformations take the [construction API](crate::model::OverlayMut) of the overlay, and
//! return owned references to what they created. Nodes and edges which are not part of the
//! overlay are skipped.

mod aggregate;
mod components;
mod explode;
mod split;

pub use aggregate::aggregate_nodes;
pub use components::{boundary_nodes, connected_subgraphs, shortest_path};
pub use explode::explode_nodes;
pub use split::{split, split_edges};
