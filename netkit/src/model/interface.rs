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

//! # Interfaces
//!
//! Interfaces live in the port map of their node. Every overlay except `phy` and `input` resolves
//! attributes it does not store itself from the same interface in `phy`.

use super::edge::Edge;
use super::graph::{NodeIdx, OverlayGraph};
use super::network::{NetworkModel, INPUT, PHY};
use super::node::Node;
use super::types::{AttrValue, Attributes, InterfaceId, NodeId, LOOPBACK_ZERO};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Category of loopback interfaces
pub const LOOPBACK: &str = "loopback";
/// Category of physical interfaces
pub const PHYSICAL: &str = "physical";

/// Owned reference to an interface. Equality and hashing only use the node id and the interface
/// id, the overlay is ignored.
#[derive(Debug, Clone)]
pub struct InterfaceRef {
    /// Overlay in which the reference was created
    pub overlay: String,
    /// Node of the interface
    pub node: NodeId,
    /// Interface id on the node
    pub id: InterfaceId,
}

impl InterfaceRef {
    /// Create a new interface reference
    pub fn new<S: Into<String>, N: Into<NodeId>>(overlay: S, node: N, id: InterfaceId) -> Self {
        Self { overlay: overlay.into(), node: node.into(), id }
    }
}

impl PartialEq for InterfaceRef {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.id == other.id
    }
}

impl Eq for InterfaceRef {}

impl Hash for InterfaceRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.node)
    }
}

/// View onto an interface of a node in an overlay.
#[derive(Clone, Copy)]
pub struct Interface<'a> {
    pub(crate) model: &'a NetworkModel,
    pub(crate) graph: &'a OverlayGraph,
    pub(crate) node: NodeIdx,
    pub(crate) id: InterfaceId,
}

impl<'a> Interface<'a> {
    pub(crate) fn new(
        model: &'a NetworkModel,
        graph: &'a OverlayGraph,
        node: NodeIdx,
        id: InterfaceId,
    ) -> Self {
        Self { model, graph, node, id }
    }

    /// Id of the interface on its node
    pub fn id(&self) -> InterfaceId {
        self.id
    }

    /// Node owning the interface
    pub fn node(&self) -> Node<'a> {
        Node::new(self.model, self.graph, self.node)
    }

    /// Name of the overlay this view belongs to
    pub fn overlay_name(&self) -> &'a str {
        &self.graph.name
    }

    /// Attributes stored on this overlay (without fallthrough), or `None` if the interface does
    /// not exist.
    pub fn attrs(&self) -> Option<&'a Attributes> {
        self.graph.node(self.node).ports.get(&self.id)
    }

    /// Returns `true` if the interface exists on the node in this overlay.
    pub fn exists(&self) -> bool {
        self.attrs().is_some()
    }

    /// Read an attribute stored on this overlay only.
    pub fn get_local(&self, key: &str) -> Option<&'a AttrValue> {
        self.attrs().and_then(|a| a.get(key))
    }

    /// The chain of interfaces used to resolve attributes: this interface, followed by the same
    /// interface in `phy`. `phy` and `input` do not fall through.
    pub fn resolution_chain(&self) -> Vec<Interface<'a>> {
        let mut chain = vec![*self];
        if self.graph.name != PHY && self.graph.name != INPUT {
            if let Some(phy) = self.phy() {
                chain.push(phy);
            }
        }
        chain
    }

    /// Read an attribute, falling through to `phy` if it is not set on this overlay.
    pub fn get(&self, key: &str) -> Option<&'a AttrValue> {
        self.resolution_chain().into_iter().find_map(|i| i.get_local(key))
    }

    /// Description of the interface
    pub fn description(&self) -> Option<&'a str> {
        self.get("description").and_then(|v| v.as_str())
    }

    /// Category of the interface. Interface `0` is always a loopback.
    pub fn category(&self) -> Option<&'a str> {
        if self.id == LOOPBACK_ZERO {
            Some(LOOPBACK)
        } else {
            self.get("category").and_then(|v| v.as_str())
        }
    }

    /// Returns `true` if the interface is a loopback
    pub fn is_loopback(&self) -> bool {
        self.category() == Some(LOOPBACK)
    }

    /// Returns `true` if the interface is physical
    pub fn is_physical(&self) -> bool {
        self.category() == Some(PHYSICAL)
    }

    /// Returns `true` if this is loopback zero
    pub fn is_loopback_zero(&self) -> bool {
        self.id == LOOPBACK_ZERO && self.is_loopback()
    }

    /// All edges of the node which are bound to this interface.
    pub fn edges(&self) -> Vec<Edge<'a>> {
        let node_id = self.graph.id(self.node);
        self.node()
            .edges()
            .into_iter()
            .filter(|e| e.ports().get(node_id) == Some(&self.id))
            .collect()
    }

    /// Interfaces on the other side of the bound edges.
    pub fn neighbors(&self) -> Vec<Interface<'a>> {
        self.edges().into_iter().filter_map(|e| e.dst_int()).collect()
    }

    /// Returns `true` if at least one edge is bound to this interface.
    pub fn is_bound(&self) -> bool {
        !self.edges().is_empty()
    }

    /// The same interface in a different overlay, or `None` if either the node or the interface
    /// does not exist there.
    pub fn in_overlay(&self, overlay: &str) -> Option<Interface<'a>> {
        let node = self.node().in_overlay(overlay)?;
        node.interface(self.id)
    }

    /// The same interface in `phy`
    pub fn phy(&self) -> Option<Interface<'a>> {
        self.in_overlay(PHY)
    }

    /// Owned reference to this interface
    pub fn to_ref(&self) -> InterfaceRef {
        InterfaceRef::new(self.graph.name.as_str(), self.graph.id(self.node), self.id)
    }
}

impl<'a> PartialEq for Interface<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.graph.id(self.node) == other.graph.id(other.node)
    }
}

impl<'a> Eq for Interface<'a> {}

impl<'a> Hash for Interface<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.id(self.node).hash(state);
        self.id.hash(state);
    }
}

impl<'a> PartialEq<InterfaceRef> for Interface<'a> {
    fn eq(&self, other: &InterfaceRef) -> bool {
        self.id == other.id && *self.graph.id(self.node) == other.node
    }
}

impl<'a> PartialOrd for Interface<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a> Ord for Interface<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.node().cmp(&other.node()).then(self.id.cmp(&other.id))
    }
}

impl<'a> fmt::Display for Interface<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get("id").or_else(|| self.get("description")) {
            Some(name) => write!(f, "{}.{}", name, self.graph.id(self.node)),
            None => write!(f, "{}.{}", self.id, self.graph.id(self.node)),
        }
    }
}

impl<'a> fmt::Debug for Interface<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface({}: {}.{})", self.graph.name, self.id, self.graph.id(self.node))
    }
}
