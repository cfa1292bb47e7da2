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

//! # Edges

use super::graph::{EdgeIdx, NodeIdx, OverlayGraph};
use super::interface::Interface;
use super::network::NetworkModel;
use super::node::Node;
use super::types::{natural_cmp, AttrValue, Attributes, EdgeKey, InterfaceId, NodeId};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Owned reference to an edge. Equality and hashing use `(src, dst, key)`, the overlay is ignored.
#[derive(Debug, Clone)]
pub struct EdgeRef {
    /// Overlay in which the reference was created
    pub overlay: String,
    /// Source node
    pub src: NodeId,
    /// Destination node
    pub dst: NodeId,
    /// Key of the edge (`0` on overlays without parallel edges)
    pub key: EdgeKey,
}

impl EdgeRef {
    /// Create a new edge reference
    pub fn new<S: Into<String>, A: Into<NodeId>, B: Into<NodeId>>(
        overlay: S,
        src: A,
        dst: B,
        key: EdgeKey,
    ) -> Self {
        Self { overlay: overlay.into(), src: src.into(), dst: dst.into(), key }
    }
}

impl PartialEq for EdgeRef {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src && self.dst == other.dst && self.key == other.key
    }
}

impl Eq for EdgeRef {}

impl Hash for EdgeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.src.hash(state);
        self.dst.hash(state);
        self.key.hash(state);
    }
}

impl PartialEq<(&str, &str)> for EdgeRef {
    fn eq(&self, other: &(&str, &str)) -> bool {
        self.src == other.0 && self.dst == other.1
    }
}

impl PartialOrd for EdgeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(self.src.as_str(), other.src.as_str())
            .then_with(|| natural_cmp(self.dst.as_str(), other.dst.as_str()))
            .then(self.key.cmp(&other.key))
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.src, self.dst)
    }
}

/// View onto an edge, oriented from `src` to `dst`. Edges of undirected overlays can be viewed in
/// both orientations.
#[derive(Clone, Copy)]
pub struct Edge<'a> {
    pub(crate) model: &'a NetworkModel,
    pub(crate) graph: &'a OverlayGraph,
    pub(crate) idx: EdgeIdx,
    pub(crate) src: NodeIdx,
    pub(crate) dst: NodeIdx,
}

impl<'a> Edge<'a> {
    /// View in the stored orientation
    pub(crate) fn stored(model: &'a NetworkModel, graph: &'a OverlayGraph, idx: EdgeIdx) -> Option<Self> {
        let (src, dst) = graph.endpoints(idx)?;
        Some(Self { model, graph, idx, src, dst })
    }

    /// View oriented away from `from`, which must be an endpoint.
    pub(crate) fn oriented_from(
        model: &'a NetworkModel,
        graph: &'a OverlayGraph,
        idx: EdgeIdx,
        from: NodeIdx,
    ) -> Option<Self> {
        let dst = graph.opposite(idx, from)?;
        Some(Self { model, graph, idx, src: from, dst })
    }

    pub(crate) fn reversed(self) -> Self {
        Self { src: self.dst, dst: self.src, ..self }
    }

    /// Source node
    pub fn src(&self) -> Node<'a> {
        Node::new(self.model, self.graph, self.src)
    }

    /// Destination node
    pub fn dst(&self) -> Node<'a> {
        Node::new(self.model, self.graph, self.dst)
    }

    /// Key of the edge
    pub fn key(&self) -> EdgeKey {
        self.graph.edge(self.idx).key
    }

    /// Name of the overlay this view belongs to
    pub fn overlay_name(&self) -> &'a str {
        &self.graph.name
    }

    /// Read an attribute
    pub fn get(&self, key: &str) -> Option<&'a AttrValue> {
        self.attrs().get(key)
    }

    /// All attributes
    pub fn attrs(&self) -> &'a Attributes {
        &self.graph.edge(self.idx).attrs
    }

    /// Raw interface bindings: node id to the interface id the edge is bound to.
    pub fn ports(&self) -> &'a BTreeMap<NodeId, InterfaceId> {
        &self.graph.edge(self.idx).ports
    }

    fn bound_interface(&self, node: NodeIdx) -> Option<Interface<'a>> {
        let id = self.ports().get(self.graph.id(node))?;
        Node::new(self.model, self.graph, node).interface(*id)
    }

    /// Interface of the source bound to this edge
    pub fn src_int(&self) -> Option<Interface<'a>> {
        self.bound_interface(self.src)
    }

    /// Interface of the destination bound to this edge
    pub fn dst_int(&self) -> Option<Interface<'a>> {
        self.bound_interface(self.dst)
    }

    /// Both bound interfaces (source first)
    pub fn interfaces(&self) -> Vec<Interface<'a>> {
        self.src_int().into_iter().chain(self.dst_int()).collect()
    }

    /// Returns `true` if the overlay allows parallel edges
    pub fn is_multigraph(&self) -> bool {
        self.graph.multigraph
    }

    /// Returns `true` if there are other edges between the same two nodes.
    pub fn is_parallel(&self) -> bool {
        self.graph.edges_between(self.src, self.dst).len() > 1
    }

    /// The same edge in another overlay. The key is only used if the other overlay is a
    /// multigraph.
    pub fn in_overlay(&self, overlay: &str) -> Option<Edge<'a>> {
        let graph = self.model.graph(overlay)?;
        let src = graph.index(self.graph.id(self.src).as_str())?;
        let dst = graph.index(self.graph.id(self.dst).as_str())?;
        let key = if graph.multigraph { Some(self.key()) } else { None };
        let idx = graph.find_edge(src, dst, key)?;
        Some(Edge { model: self.model, graph, idx, src, dst })
    }

    /// Owned reference to this edge
    pub fn to_ref(&self) -> EdgeRef {
        EdgeRef::new(
            self.graph.name.as_str(),
            self.graph.id(self.src),
            self.graph.id(self.dst),
            self.key(),
        )
    }
}

impl<'a> PartialEq for Edge<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.graph.id(self.src) == other.graph.id(other.src)
            && self.graph.id(self.dst) == other.graph.id(other.dst)
            && self.key() == other.key()
    }
}

impl<'a> Eq for Edge<'a> {}

impl<'a> Hash for Edge<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.id(self.src).hash(state);
        self.graph.id(self.dst).hash(state);
        self.key().hash(state);
    }
}

impl<'a> PartialEq<EdgeRef> for Edge<'a> {
    fn eq(&self, other: &EdgeRef) -> bool {
        *self.graph.id(self.src) == other.src
            && *self.graph.id(self.dst) == other.dst
            && self.key() == other.key
    }
}

impl<'a> PartialEq<(&str, &str)> for Edge<'a> {
    fn eq(&self, other: &(&str, &str)) -> bool {
        self.graph.id(self.src) == other.0 && self.graph.id(self.dst) == other.1
    }
}

impl<'a> PartialOrd for Edge<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Edge<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.src()
            .cmp(&other.src())
            .then_with(|| self.dst().cmp(&other.dst()))
            .then_with(|| self.key().cmp(&other.key()))
    }
}

impl<'a> fmt::Display for Edge<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.graph.id(self.src), self.graph.id(self.dst))
    }
}

impl<'a> fmt::Debug for Edge<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.graph.multigraph {
            write!(f, "({}, {}, {})", self.graph.id(self.src), self.graph.id(self.dst), self.key())
        } else {
            write!(f, "({}, {})", self.graph.id(self.src), self.graph.id(self.dst))
        }
    }
}
