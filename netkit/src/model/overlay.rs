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

//! # Read-only overlay view

use super::edge::{Edge, EdgeRef};
use super::graph::{NodeIdx, OverlayGraph};
use super::interface::{Interface, InterfaceRef};
use super::network::NetworkModel;
use super::node::{Node, NodeRef};
use super::types::{AttrValue, Attributes, Diagnostic, EdgeKey, NodeId};

use itertools::Itertools;
use log::*;
use std::fmt;

/// How to find a node in an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeLookup {
    /// Node with exactly this id
    Id(NodeId),
    /// First node (in insertion order) whose label is equal to this string
    Label(String),
    /// Node with the same id as the reference, possibly taken from a different overlay
    Ref(NodeRef),
}

/// How to find an edge in an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeLookup {
    /// Edge with the same endpoints as the reference. The key is only used on multigraphs.
    Ref(EdgeRef),
    /// Edge between two nodes. Without a key, the edge with the smallest key is returned.
    Endpoints {
        /// Source node
        src: NodeId,
        /// Destination node
        dst: NodeId,
        /// Key of the edge
        key: Option<EdgeKey>,
    },
    /// Edge bound to both interfaces
    Interfaces(InterfaceRef, InterfaceRef),
}

/// Conversion of a list of views into owned references.
pub trait ToRefs {
    /// The owned reference type
    type Ref;
    /// Convert all views into owned references
    fn to_refs(&self) -> Vec<Self::Ref>;
}

impl<'a> ToRefs for [Node<'a>] {
    type Ref = NodeRef;
    fn to_refs(&self) -> Vec<NodeRef> {
        self.iter().map(|n| n.to_ref()).collect()
    }
}

impl<'a> ToRefs for [Edge<'a>] {
    type Ref = EdgeRef;
    fn to_refs(&self) -> Vec<EdgeRef> {
        self.iter().map(|e| e.to_ref()).collect()
    }
}

impl<'a> ToRefs for [Interface<'a>] {
    type Ref = InterfaceRef;
    fn to_refs(&self) -> Vec<InterfaceRef> {
        self.iter().map(|i| i.to_ref()).collect()
    }
}

/// # Overlay
///
/// Read-only view onto a single overlay of the [`NetworkModel`]. All queries return views which
/// borrow the model. Missing nodes, edges and interfaces are reported as `None` or as empty lists.
#[derive(Clone, Copy)]
pub struct Overlay<'a> {
    model: &'a NetworkModel,
    graph: &'a OverlayGraph,
}

impl<'a> Overlay<'a> {
    pub(crate) fn new(model: &'a NetworkModel, graph: &'a OverlayGraph) -> Self {
        Self { model, graph }
    }

    /// Name of the overlay
    pub fn name(&self) -> &'a str {
        &self.graph.name
    }

    /// The model owning the overlay
    pub fn model(&self) -> &'a NetworkModel {
        self.model
    }

    /// Returns `true` if the overlay is directed
    pub fn is_directed(&self) -> bool {
        self.graph.directed
    }

    /// Returns `true` if the overlay allows parallel edges
    pub fn is_multigraph(&self) -> bool {
        self.graph.multigraph
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Returns `true` if the overlay contains no nodes
    pub fn is_empty(&self) -> bool {
        self.graph.len() == 0
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the node is part of the overlay.
    pub fn contains<N: AsRef<str>>(&self, node: N) -> bool {
        self.graph.contains(node.as_ref())
    }

    fn wrap(&self, idx: NodeIdx) -> Node<'a> {
        Node::new(self.model, self.graph, idx)
    }

    /// Node with the given id
    pub fn node<N: AsRef<str>>(&self, id: N) -> Option<Node<'a>> {
        self.graph.index(id.as_ref()).map(|idx| self.wrap(idx))
    }

    /// Resolve a [`NodeLookup`].
    pub fn lookup_node(&self, lookup: &NodeLookup) -> Option<Node<'a>> {
        let result = match lookup {
            NodeLookup::Id(id) => self.node(id),
            NodeLookup::Ref(r) => self.node(&r.id),
            NodeLookup::Label(label) => self.nodes().into_iter().find(|n| n.label() == *label),
        };
        if result.is_none() {
            debug!("Unable to find node {:?} in {}", lookup, self.name());
        }
        result
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> Vec<Node<'a>> {
        self.graph.node_indices().into_iter().map(|idx| self.wrap(idx)).collect()
    }

    /// Owned references to all nodes, in insertion order.
    pub fn node_refs(&self) -> Vec<NodeRef> {
        self.nodes().to_refs()
    }

    /// All nodes matching every attribute filter.
    pub fn nodes_where(&self, filters: &[(&str, AttrValue)]) -> Vec<Node<'a>> {
        self.nodes()
            .into_iter()
            .filter(|n| filters.iter().all(|(k, v)| n.get(k) == Some(v)))
            .collect()
    }

    /// All nodes where the attribute is set to a truthy value.
    pub fn nodes_with(&self, flag: &str) -> Vec<Node<'a>> {
        self.nodes()
            .into_iter()
            .filter(|n| n.get(flag).map(|v| v.is_truthy()).unwrap_or(false))
            .collect()
    }

    /// All routers
    pub fn routers(&self) -> Vec<Node<'a>> {
        self.nodes().into_iter().filter(|n| n.is_router()).collect()
    }

    /// All switches
    pub fn switches(&self) -> Vec<Node<'a>> {
        self.nodes().into_iter().filter(|n| n.is_switch()).collect()
    }

    /// All servers
    pub fn servers(&self) -> Vec<Node<'a>> {
        self.nodes().into_iter().filter(|n| n.is_server()).collect()
    }

    /// All hubs
    pub fn hubs(&self) -> Vec<Node<'a>> {
        self.nodes().into_iter().filter(|n| n.is_hub()).collect()
    }

    /// All layer 3 devices (routers, servers and firewalls)
    pub fn l3devices(&self) -> Vec<Node<'a>> {
        self.nodes().into_iter().filter(|n| n.is_l3device()).collect()
    }

    /// Edge between `src` and `dst` with the smallest key.
    pub fn edge<A: AsRef<str>, B: AsRef<str>>(&self, src: A, dst: B) -> Option<Edge<'a>> {
        self.find_edge(src.as_ref(), dst.as_ref(), None)
    }

    /// Edge between `src` and `dst` with the given key.
    pub fn edge_with_key<A: AsRef<str>, B: AsRef<str>>(
        &self,
        src: A,
        dst: B,
        key: EdgeKey,
    ) -> Option<Edge<'a>> {
        self.find_edge(src.as_ref(), dst.as_ref(), Some(key))
    }

    fn find_edge(&self, src: &str, dst: &str, key: Option<EdgeKey>) -> Option<Edge<'a>> {
        let s = self.graph.index(src)?;
        let d = self.graph.index(dst)?;
        let idx = self.graph.find_edge(s, d, key)?;
        Some(Edge { model: self.model, graph: self.graph, idx, src: s, dst: d })
    }

    /// Resolve an [`EdgeLookup`].
    pub fn lookup_edge(&self, lookup: &EdgeLookup) -> Option<Edge<'a>> {
        match lookup {
            EdgeLookup::Ref(r) => {
                let key = if self.is_multigraph() { Some(r.key) } else { None };
                self.find_edge(r.src.as_str(), r.dst.as_str(), key)
            }
            EdgeLookup::Endpoints { src, dst, key } => {
                self.find_edge(src.as_str(), dst.as_str(), *key)
            }
            EdgeLookup::Interfaces(a, b) => {
                let s = self.graph.index(a.node.as_str())?;
                let d = self.graph.index(b.node.as_str())?;
                self.graph
                    .edges_between(s, d)
                    .into_iter()
                    .find(|e| {
                        let ports = &self.graph.edge(*e).ports;
                        ports.get(&a.node) == Some(&a.id) && ports.get(&b.node) == Some(&b.id)
                    })
                    .map(|idx| Edge { model: self.model, graph: self.graph, idx, src: s, dst: d })
            }
        }
    }

    /// Returns `true` if there is an edge between `src` and `dst`.
    pub fn has_edge<A: AsRef<str>, B: AsRef<str>>(&self, src: A, dst: B) -> bool {
        self.edge(src, dst).is_some()
    }

    /// All edges, in the orientation they were created, and in insertion order.
    pub fn edges(&self) -> Vec<Edge<'a>> {
        self.graph
            .edge_indices()
            .into_iter()
            .filter_map(|e| Edge::stored(self.model, self.graph, e))
            .collect()
    }

    /// Owned references to all edges
    pub fn edge_refs(&self) -> Vec<EdgeRef> {
        self.edges().to_refs()
    }

    /// All edges matching every attribute filter.
    pub fn edges_where(&self, filters: &[(&str, AttrValue)]) -> Vec<Edge<'a>> {
        self.edges_filtered::<&str>(None, None, filters)
    }

    /// Edges filtered by their endpoints and attributes.
    ///
    /// If `src` is given, only edges leaving these nodes are returned (oriented away from them).
    /// If `dst` is given, only edges whose destination is one of these nodes are kept. Finally,
    /// every attribute filter must match (AND semantics).
    pub fn edges_filtered<N: AsRef<str>>(
        &self,
        src: Option<&[N]>,
        dst: Option<&[N]>,
        filters: &[(&str, AttrValue)],
    ) -> Vec<Edge<'a>> {
        let candidates: Vec<Edge<'a>> = match src {
            Some(src) => src
                .iter()
                .filter_map(|n| self.node(n))
                .flat_map(|n| n.edges())
                .collect(),
            None => self.edges(),
        };
        candidates
            .into_iter()
            .filter(|e| match dst {
                Some(dst) => dst.iter().any(|n| e.dst() == n.as_ref()),
                None => true,
            })
            .filter(|e| filters.iter().all(|(k, v)| e.get(k) == Some(v)))
            .collect()
    }

    /// Interface referenced by `interface`, if both the node and the interface exist.
    pub fn interface(&self, interface: &InterfaceRef) -> Option<Interface<'a>> {
        self.node(&interface.node)?.interface(interface.id)
    }

    /// Group nodes by the value of an attribute. Groups are ordered by value, nodes without the
    /// attribute come first (with the key `None`). If `nodes` is `None`, all nodes are grouped.
    pub fn groupby(
        &self,
        attr: &str,
        nodes: Option<&[Node<'a>]>,
    ) -> Vec<(Option<AttrValue>, Vec<Node<'a>>)> {
        let nodes: Vec<Node<'a>> = match nodes {
            Some(n) => n.to_vec(),
            None => self.nodes(),
        };
        let mut groups: Vec<(Option<AttrValue>, Vec<Node<'a>>)> = Vec::new();
        for node in nodes {
            let value = node.get(attr).cloned();
            match groups.iter_mut().find(|(k, _)| *k == value) {
                Some((_, members)) => members.push(node),
                None => groups.push((value, vec![node])),
            }
        }
        groups.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        groups
    }

    /// Distinct values of an attribute over all nodes, in order of first appearance.
    pub fn unique_attr(&self, attr: &str) -> Vec<AttrValue> {
        let mut values: Vec<AttrValue> = Vec::new();
        for v in self.nodes().iter().filter_map(|n| n.get(attr)) {
            if !values.contains(v) {
                values.push(v.clone());
            }
        }
        values
    }

    /// Graph-level data of the overlay
    pub fn data(&self) -> &'a Attributes {
        &self.graph.data
    }

    /// Skipped construction steps recorded so far
    pub fn diagnostics(&self) -> &'a [Diagnostic] {
        &self.graph.diagnostics
    }

    /// Induced subgraph on the given nodes. Nodes which are not part of the overlay are ignored.
    pub fn subgraph<N: AsRef<str>>(&self, nodes: &[N]) -> Subgraph<'a> {
        let members: Vec<NodeIdx> = nodes
            .iter()
            .filter_map(|n| self.graph.index(n.as_ref()))
            .unique()
            .collect();
        Subgraph { overlay: *self, members }
    }

    /// Internal storage
    pub(crate) fn graph(&self) -> &'a OverlayGraph {
        self.graph
    }
}

impl<'a> fmt::Display for Overlay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graph.name)
    }
}

impl<'a> fmt::Debug for Overlay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Overlay({}, {} nodes, {} edges)",
            self.graph.name,
            self.graph.len(),
            self.graph.edge_count()
        )
    }
}

/// Read-only induced subgraph of an overlay.
#[derive(Debug, Clone)]
pub struct Subgraph<'a> {
    overlay: Overlay<'a>,
    members: Vec<NodeIdx>,
}

impl<'a> Subgraph<'a> {
    /// Nodes of the subgraph, in the order they were given.
    pub fn nodes(&self) -> Vec<Node<'a>> {
        self.members.iter().map(|idx| self.overlay.wrap(*idx)).collect()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the subgraph contains no nodes
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `true` if the node is part of the subgraph
    pub fn contains<N: AsRef<str>>(&self, node: N) -> bool {
        match self.overlay.graph.index(node.as_ref()) {
            Some(idx) => self.members.contains(&idx),
            None => false,
        }
    }

    /// Edges with both endpoints in the subgraph
    pub fn edges(&self) -> Vec<Edge<'a>> {
        self.overlay
            .edges()
            .into_iter()
            .filter(|e| self.members.contains(&e.src) && self.members.contains(&e.dst))
            .collect()
    }

    /// The overlay this subgraph is taken from
    pub fn overlay(&self) -> Overlay<'a> {
        self.overlay
    }
}
