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

//! # Nodes
//!
//! [`Node`] is a borrowed view onto a node of an overlay, and [`NodeRef`] an owned reference which
//! can be kept across mutations.
//!
//! Two nodes are equal if they have the same id, **regardless of the overlay** they were obtained
//! from. Builders rely on this to compare and look up nodes across overlays:
//!
//! ```
//! use netkit::example_networks::{ExampleNetwork, HouseNet};
//!
//! let model = HouseNet::model();
//! let phy = model.overlay("phy").unwrap();
//! let input = model.overlay("input").unwrap();
//! assert_eq!(phy.node("r1").unwrap(), input.node("r1").unwrap());
//! ```

use super::edge::Edge;
use super::graph::{NodeIdx, OverlayGraph};
use super::interface::Interface;
use super::network::{NetworkModel, INPUT, PHY};
use super::overlay::Overlay;
use super::types::{natural_cmp, AttrValue, Attributes, InterfaceId, NodeId, LOOPBACK_ZERO};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Node attributes which are read from `phy` if they are not set on the overlay itself.
pub const FALLTHROUGH_ATTRS: [&str; 4] = ["asn", "device_type", "device_subtype", "platform"];

/// Owned reference to a node. Equality, hashing and ordering only use the node id.
#[derive(Debug, Clone)]
pub struct NodeRef {
    /// Overlay in which the reference was created
    pub overlay: String,
    /// Id of the node
    pub id: NodeId,
}

impl NodeRef {
    /// Create a new node reference
    pub fn new<S: Into<String>, N: Into<NodeId>>(overlay: S, id: N) -> Self {
        Self { overlay: overlay.into(), id: id.into() }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(self.id.as_str(), other.id.as_str())
    }
}

impl PartialEq<&str> for NodeRef {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

impl AsRef<str> for NodeRef {
    fn as_ref(&self) -> &str {
        self.id.as_str()
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// View onto a node of an overlay.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    pub(crate) model: &'a NetworkModel,
    pub(crate) graph: &'a OverlayGraph,
    pub(crate) idx: NodeIdx,
}

impl<'a> Node<'a> {
    pub(crate) fn new(model: &'a NetworkModel, graph: &'a OverlayGraph, idx: NodeIdx) -> Self {
        Self { model, graph, idx }
    }

    /// Id of the node
    pub fn id(&self) -> &'a NodeId {
        self.graph.id(self.idx)
    }

    /// Name of the overlay this view belongs to
    pub fn overlay_name(&self) -> &'a str {
        &self.graph.name
    }

    /// Overlay this view belongs to
    pub fn overlay(&self) -> Overlay<'a> {
        Overlay::new(self.model, self.graph)
    }

    /// Label of the node: the `label` attribute if it is set, or the id otherwise.
    pub fn label(&self) -> String {
        match self.get("label") {
            Some(l) => l.to_string(),
            None => self.id().to_string(),
        }
    }

    /// All attributes stored on this overlay
    pub fn attrs(&self) -> &'a Attributes {
        &self.graph.node(self.idx).attrs
    }

    /// Nodes used to resolve fallthrough attributes: this node, followed by the same node in `phy`
    /// (unless this is `phy` or `input`).
    pub fn resolution_chain(&self) -> Vec<Node<'a>> {
        let mut chain = vec![*self];
        if self.graph.name != PHY && self.graph.name != INPUT {
            if let Some(phy) = self.phy() {
                chain.push(phy);
            }
        }
        chain
    }

    /// Read an attribute. The attributes in [`FALLTHROUGH_ATTRS`] are read from `phy` when they
    /// are missing on this overlay.
    pub fn get(&self, key: &str) -> Option<&'a AttrValue> {
        if FALLTHROUGH_ATTRS.contains(&key) {
            self.resolution_chain().into_iter().find_map(|n| n.attrs().get(key))
        } else {
            self.attrs().get(key)
        }
    }

    /// Returns `true` if the attribute can be read (see [`Node::get`]).
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// AS number of the node
    pub fn asn(&self) -> Option<i64> {
        self.get("asn").and_then(|v| v.as_int())
    }

    /// Device type of the node
    pub fn device_type(&self) -> Option<&'a str> {
        self.get("device_type").and_then(|v| v.as_str())
    }

    fn is_device_type(&self, device_type: &str) -> bool {
        self.device_type() == Some(device_type)
    }

    /// Returns `true` if the node is a router
    pub fn is_router(&self) -> bool {
        self.is_device_type("router")
    }

    /// Returns `true` if the node is a switch
    pub fn is_switch(&self) -> bool {
        self.is_device_type("switch")
    }

    /// Returns `true` if the node is a server
    pub fn is_server(&self) -> bool {
        self.is_device_type("server")
    }

    /// Returns `true` if the node is a hub
    pub fn is_hub(&self) -> bool {
        self.is_device_type("hub")
    }

    /// Returns `true` if the node is a firewall
    pub fn is_firewall(&self) -> bool {
        self.is_device_type("firewall")
    }

    /// Returns `true` if the node is a router, a server or a firewall
    pub fn is_l3device(&self) -> bool {
        self.is_router() || self.is_server() || self.is_firewall()
    }

    /// Fully qualified name: `label.asn`
    pub fn fqdn(&self) -> String {
        match self.asn() {
            Some(asn) => format!("{}.{}", self.label(), asn),
            None => self.label(),
        }
    }

    /// Number of incident edges
    pub fn degree(&self) -> usize {
        self.graph.incident_edges(self.idx).len()
    }

    /// Neighbors of the node (following outgoing edges on directed overlays)
    pub fn neighbors(&self) -> Vec<Node<'a>> {
        self.graph.neighbors(self.idx).into_iter().map(|n| self.with_idx(n)).collect()
    }

    /// Edges of the node, oriented away from the node. On directed overlays, these are the
    /// outgoing edges only.
    pub fn edges(&self) -> Vec<Edge<'a>> {
        self.graph
            .out_edges(self.idx)
            .into_iter()
            .filter_map(|e| Edge::oriented_from(self.model, self.graph, e, self.idx))
            .collect()
    }

    /// All incident edges regardless of their direction, oriented away from the node.
    pub fn incident_edges(&self) -> Vec<Edge<'a>> {
        self.graph
            .incident_edges(self.idx)
            .into_iter()
            .filter_map(|e| Edge::oriented_from(self.model, self.graph, e, self.idx))
            .collect()
    }

    /// Incoming edges of the node, oriented towards the node.
    pub fn in_edges(&self) -> Vec<Edge<'a>> {
        self.graph
            .in_edges(self.idx)
            .into_iter()
            .filter_map(|e| {
                Edge::oriented_from(self.model, self.graph, e, self.idx).map(|e| e.reversed())
            })
            .collect()
    }

    /// All interfaces, loopbacks first, then ordered by id.
    pub fn interfaces(&self) -> Vec<Interface<'a>> {
        let mut interfaces: Vec<Interface<'a>> = self
            .graph
            .node(self.idx)
            .ports
            .keys()
            .map(|i| Interface::new(self.model, self.graph, self.idx, *i))
            .collect();
        interfaces.sort_by_key(|i| (!i.is_loopback(), i.id()));
        interfaces
    }

    /// All physical interfaces
    pub fn physical_interfaces(&self) -> Vec<Interface<'a>> {
        self.interfaces().into_iter().filter(|i| i.is_physical()).collect()
    }

    /// All loopback interfaces, including loopback zero
    pub fn loopback_interfaces(&self) -> Vec<Interface<'a>> {
        self.interfaces().into_iter().filter(|i| i.is_loopback()).collect()
    }

    /// The loopback zero interface, present on every node.
    pub fn loopback_zero(&self) -> Interface<'a> {
        Interface::new(self.model, self.graph, self.idx, LOOPBACK_ZERO)
    }

    /// Interface with the given id, or `None` if the node has no such interface.
    pub fn interface(&self, id: InterfaceId) -> Option<Interface<'a>> {
        let interface = Interface::new(self.model, self.graph, self.idx, id);
        if interface.exists() {
            Some(interface)
        } else {
            None
        }
    }

    /// First interface whose description (or `id` attribute) matches.
    pub fn interface_by_description(&self, description: &str) -> Option<Interface<'a>> {
        self.interfaces().into_iter().find(|i| {
            i.description() == Some(description)
                || i.get("id").and_then(|v| v.as_str()) == Some(description)
        })
    }

    /// Projection of this node into another overlay. Returns `None` if the overlay does not exist
    /// or the node is not part of it.
    pub fn in_overlay(&self, overlay: &str) -> Option<Node<'a>> {
        let graph = self.model.graph(overlay)?;
        let idx = graph.index(self.id().as_str())?;
        Some(Node::new(self.model, graph, idx))
    }

    /// Projection of this node into `phy`
    pub fn phy(&self) -> Option<Node<'a>> {
        self.in_overlay(PHY)
    }

    /// Owned reference to this node
    pub fn to_ref(&self) -> NodeRef {
        NodeRef::new(self.graph.name.as_str(), self.id())
    }

    fn with_idx(&self, idx: NodeIdx) -> Node<'a> {
        Node::new(self.model, self.graph, idx)
    }
}

impl<'a> AsRef<str> for Node<'a> {
    fn as_ref(&self) -> &str {
        self.id().as_str()
    }
}

impl<'a> PartialEq for Node<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<'a> Eq for Node<'a> {}

impl<'a> Hash for Node<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

impl<'a> PartialEq<NodeRef> for Node<'a> {
    fn eq(&self, other: &NodeRef) -> bool {
        *self.id() == other.id
    }
}

impl<'a> PartialEq<Node<'a>> for NodeRef {
    fn eq(&self, other: &Node<'a>) -> bool {
        self.id == *other.id()
    }
}

impl<'a> PartialEq<&str> for Node<'a> {
    fn eq(&self, other: &&str) -> bool {
        self.id() == other
    }
}

impl<'a> PartialEq<str> for Node<'a> {
    fn eq(&self, other: &str) -> bool {
        self.id() == other
    }
}

impl<'a> PartialOrd for Node<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Node<'a> {
    /// Nodes are ordered by their AS number first, and by the natural order of their labels second,
    /// such that `r2 < r10`.
    fn cmp(&self, other: &Self) -> Ordering {
        if self.id() == other.id() {
            return Ordering::Equal;
        }
        self.asn()
            .cmp(&other.asn())
            .then_with(|| natural_cmp(&self.label(), &other.label()))
            .then_with(|| self.id().cmp(other.id()))
    }
}

impl<'a> fmt::Display for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl<'a> fmt::Debug for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
