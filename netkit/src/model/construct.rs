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

//! # Overlay Construction API
//!
//! [`OverlayMut`] is the only way to change an overlay. Since it holds a mutable borrow of the
//! whole model, nodes and edges of other overlays are passed in as owned references
//! ([`NodeRef`], [`EdgeRef`], [`InterfaceRef`]), which are resolved in the overlay they name.

use super::edge::EdgeRef;
use super::graph::{EdgeIdx, NodeIdx, OverlayGraph};
use super::interface::{InterfaceRef, PHYSICAL};
use super::network::{NetworkModel, INPUT};
use super::node::NodeRef;
use super::overlay::Overlay;
use super::types::{check_key, AttrValue, Attributes, Diagnostic, InterfaceId, NodeId};
use crate::Error;

use log::*;
use std::collections::BTreeMap;

/// # Construction API of an overlay
///
/// Obtained with [`NetworkModel::overlay_mut`] or [`NetworkModel::add_overlay`].
///
/// ```
/// use netkit::model::{Attributes, InterfaceRef, NetworkModel};
///
/// fn main() -> Result<(), netkit::Error> {
///     let mut model = NetworkModel::new();
///     let mut g = model.add_overlay("ospf", false, false)?;
///     let a = g.create_node("a", Attributes::new())?;
///     let b = g.create_node("b", Attributes::new())?;
///     let a1 = g.add_interface(&a.id, Some("a to b"), Attributes::new()).unwrap();
///     let b1 = g.add_interface(&b.id, Some("b to a"), Attributes::new()).unwrap();
///     let e = g.create_edge(&a1, &b1, Attributes::new())?.unwrap();
///     assert_eq!(e, ("a", "b"));
///
///     // edges to missing nodes are skipped, not rejected
///     let c1 = InterfaceRef::new("ospf", "c", 1);
///     assert!(g.create_edge(&a1, &c1, Attributes::new())?.is_none());
///     assert_eq!(g.view().diagnostics().len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct OverlayMut<'a> {
    model: &'a mut NetworkModel,
    index: usize,
}

impl<'a> OverlayMut<'a> {
    pub(crate) fn new(model: &'a mut NetworkModel, index: usize) -> Self {
        Self { model, index }
    }

    fn graph(&self) -> &OverlayGraph {
        self.model.graph_at(self.index)
    }

    fn graph_mut(&mut self) -> &mut OverlayGraph {
        self.model.graph_at_mut(self.index)
    }

    /// Name of the overlay
    pub fn name(&self) -> &str {
        &self.graph().name
    }

    /// Read-only view onto this overlay
    pub fn view(&self) -> Overlay<'_> {
        Overlay::new(&*self.model, self.graph())
    }

    /// Read-only access to the whole model
    pub fn model(&self) -> &NetworkModel {
        &*self.model
    }

    /// Remove and return all diagnostics recorded so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.graph_mut().diagnostics)
    }

    /// Log and record a skipped step.
    fn skipped(&mut self, diagnostic: Diagnostic) {
        let level = if self.model.config().warn_on_skip { Level::Warn } else { Level::Debug };
        log!(level, "{}: skipped {:?}", self.name(), diagnostic);
        self.graph_mut().push_diagnostic(diagnostic);
    }

    fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.graph().index(id)
    }

    fn resolve_edge(&self, edge: &EdgeRef) -> Option<EdgeIdx> {
        let graph = self.graph();
        let src = graph.index(edge.src.as_str())?;
        let dst = graph.index(edge.dst.as_str())?;
        let key = if graph.multigraph { Some(edge.key) } else { None };
        graph.find_edge(src, dst, key)
    }

    fn edge_ref(&self, idx: EdgeIdx, src: NodeIdx, dst: NodeIdx) -> EdgeRef {
        let graph = self.graph();
        EdgeRef::new(graph.name.as_str(), graph.id(src), graph.id(dst), graph.edge(idx).key)
    }

    // ---------------------------------------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------------------------------------

    /// Add a node with the given attributes. The interfaces are initialized as described on
    /// [`NetworkModel`]. If the node already exists, only its attributes are updated.
    pub fn create_node<N: Into<NodeId>>(&mut self, id: N, attrs: Attributes) -> Result<NodeRef, Error> {
        for key in attrs.keys() {
            check_key(key)?;
        }
        let id: NodeId = id.into();
        let ports = self.model.initial_ports(self.name(), id.as_str());
        let (_, inserted) = self.graph_mut().insert_node(id.clone(), attrs, ports);
        if !inserted {
            trace!("{}: node {} already present", self.name(), id);
        }
        Ok(NodeRef::new(self.name(), id))
    }

    /// Add a node taken from another overlay. The `label` attribute is copied if set.
    pub fn copy_node(&mut self, node: &NodeRef, attrs: Attributes) -> Result<NodeRef, Error> {
        self.add_node_retain(node, &["label"], attrs)
    }

    fn add_node_retain(
        &mut self,
        node: &NodeRef,
        retain: &[&str],
        attrs: Attributes,
    ) -> Result<NodeRef, Error> {
        let mut data = self.source_node_attrs(node, retain);
        data.extend(attrs);
        self.create_node(node.id.clone(), data)
    }

    /// Retained attributes of a node in the overlay named by the reference.
    fn source_node_attrs(&self, node: &NodeRef, retain: &[&str]) -> Attributes {
        let mut data = Attributes::new();
        if retain.is_empty() {
            return data;
        }
        if let Some(src) = self.model.graph(&node.overlay) {
            if let Some(idx) = src.index(node.id.as_str()) {
                let attrs = &src.node(idx).attrs;
                for key in retain {
                    if let Some(v) = attrs.get(*key) {
                        data.insert(key.to_string(), v.clone());
                    }
                }
            }
        }
        data
    }

    /// Add all nodes with the given ids, each with the same attributes.
    pub fn create_nodes_from<N: AsRef<str>>(
        &mut self,
        ids: &[N],
        attrs: Attributes,
    ) -> Result<Vec<NodeRef>, Error> {
        ids.iter().map(|id| self.create_node(id.as_ref(), attrs.clone())).collect()
    }

    /// Copy all nodes from other overlays (see [`OverlayMut::copy_node`]).
    pub fn copy_nodes_from(&mut self, nodes: &[NodeRef], attrs: Attributes) -> Result<Vec<NodeRef>, Error> {
        nodes.iter().map(|n| self.copy_node(n, attrs.clone())).collect()
    }

    /// Add all nodes, copying the attributes listed in `retain` from the overlay of each
    /// reference. Nodes already present are updated, never duplicated.
    pub fn add_nodes_from(
        &mut self,
        nodes: &[NodeRef],
        retain: &[&str],
        attrs: Attributes,
    ) -> Result<Vec<NodeRef>, Error> {
        nodes.iter().map(|n| self.add_node_retain(n, retain, attrs.clone())).collect()
    }

    /// Remove a node and all its edges. Returns `false` if the node was not found.
    pub fn remove_node<N: AsRef<str>>(&mut self, id: N) -> bool {
        let id = id.as_ref();
        if self.graph_mut().remove_node(id) {
            true
        } else {
            self.skipped(Diagnostic::NodeNotFound(id.into()));
            false
        }
    }

    /// Remove all nodes. Returns the number of removed nodes.
    pub fn remove_nodes_from<N: AsRef<str>>(&mut self, ids: &[N]) -> usize {
        ids.iter().filter(|id| self.remove_node(id)).count()
    }

    /// Set a node attribute. A missing node is skipped and recorded.
    pub fn set_node_attr<N: AsRef<str>, V: Into<AttrValue>>(
        &mut self,
        node: N,
        key: &str,
        value: V,
    ) -> Result<(), Error> {
        check_key(key)?;
        match self.index_of(node.as_ref()) {
            Some(idx) => {
                self.graph_mut().node_mut(idx).attrs.insert(key.to_string(), value.into());
            }
            None => self.skipped(Diagnostic::NodeNotFound(node.as_ref().into())),
        }
        Ok(())
    }

    /// Remove a node attribute, returning the old value.
    pub fn unset_node_attr<N: AsRef<str>>(&mut self, node: N, key: &str) -> Option<AttrValue> {
        let idx = self.index_of(node.as_ref())?;
        self.graph_mut().node_mut(idx).attrs.remove(key)
    }

    /// Set the same attributes on all given nodes.
    pub fn update_nodes<N: AsRef<str>>(&mut self, nodes: &[N], attrs: &Attributes) -> Result<(), Error> {
        for node in nodes {
            for (key, value) in attrs {
                self.set_node_attr(node, key, value.clone())?;
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Interfaces
    // ---------------------------------------------------------------------------------------------

    /// Add a physical interface to a node, using the first free id starting from `1`. Returns
    /// `None` if the node does not exist.
    pub fn add_interface<N: AsRef<str>>(
        &mut self,
        node: N,
        description: Option<&str>,
        attrs: Attributes,
    ) -> Option<InterfaceRef> {
        let mut data = Attributes::new();
        if let Some(d) = description {
            data.insert("description".to_string(), d.into());
        }
        data.insert("category".to_string(), PHYSICAL.into());
        data.extend(attrs);
        self.add_interface_with(node, data)
    }

    /// Add an interface with exactly the given attributes (used for loopbacks and other
    /// categories).
    pub fn add_interface_with<N: AsRef<str>>(&mut self, node: N, attrs: Attributes) -> Option<InterfaceRef> {
        let node = node.as_ref();
        let idx = match self.index_of(node) {
            Some(idx) => idx,
            None => {
                self.skipped(Diagnostic::NodeNotFound(node.into()));
                return None;
            }
        };
        let ports = &mut self.graph_mut().node_mut(idx).ports;
        let mut id: InterfaceId = 1;
        while ports.contains_key(&id) {
            id += 1;
        }
        ports.insert(id, attrs);
        Some(InterfaceRef::new(self.name(), node, id))
    }

    /// Set an interface attribute. Missing nodes or interfaces are skipped and recorded.
    pub fn set_interface_attr<V: Into<AttrValue>>(
        &mut self,
        interface: &InterfaceRef,
        key: &str,
        value: V,
    ) -> Result<(), Error> {
        check_key(key)?;
        let idx = match self.index_of(interface.node.as_str()) {
            Some(idx) => idx,
            None => {
                self.skipped(Diagnostic::NodeNotFound(interface.node.clone()));
                return Ok(());
            }
        };
        match self.graph_mut().node_mut(idx).ports.get_mut(&interface.id) {
            Some(attrs) => {
                attrs.insert(key.to_string(), value.into());
            }
            None => self.skipped(Diagnostic::InterfaceNotFound {
                node: interface.node.clone(),
                interface: interface.id,
            }),
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------------------------------

    /// Insert an edge if both endpoints exist. Otherwise, the edge is skipped (or rejected, if the
    /// model is configured with `strict_edges`).
    pub(crate) fn insert_edge(
        &mut self,
        src: &NodeId,
        dst: &NodeId,
        key: Option<u32>,
        attrs: Attributes,
        ports: BTreeMap<NodeId, InterfaceId>,
    ) -> Result<Option<EdgeRef>, Error> {
        for k in attrs.keys() {
            check_key(k)?;
        }
        match (self.index_of(src.as_str()), self.index_of(dst.as_str())) {
            (Some(s), Some(d)) => {
                let idx = self.graph_mut().insert_edge(s, d, key, attrs, ports);
                Ok(Some(self.edge_ref(idx, s, d)))
            }
            _ => {
                if self.model.config().strict_edges {
                    return Err(Error::MissingEndpoint {
                        overlay: self.name().to_string(),
                        src: src.to_string(),
                        dst: dst.to_string(),
                    });
                }
                self.skipped(Diagnostic::EdgeSkipped { src: src.clone(), dst: dst.clone() });
                Ok(None)
            }
        }
    }

    /// Add an edge between two nodes without binding it to any interface. On multigraphs, a new
    /// parallel edge is created.
    pub fn add_edge<A: Into<NodeId>, B: Into<NodeId>>(
        &mut self,
        src: A,
        dst: B,
        attrs: Attributes,
    ) -> Result<Option<EdgeRef>, Error> {
        self.insert_edge(&src.into(), &dst.into(), None, attrs, BTreeMap::new())
    }

    /// Add an edge between two interfaces, binding the edge to both. On multigraphs, the next free
    /// key is allocated. Returns `None` if an endpoint is missing in this overlay.
    pub fn create_edge(
        &mut self,
        src: &InterfaceRef,
        dst: &InterfaceRef,
        attrs: Attributes,
    ) -> Result<Option<EdgeRef>, Error> {
        let mut ports = BTreeMap::new();
        ports.insert(src.node.clone(), src.id);
        ports.insert(dst.node.clone(), dst.id);
        self.insert_edge(&src.node, &dst.node, None, attrs, ports)
    }

    /// Create edges between pairs of interfaces. On directed overlays, `bidirectional` also creates
    /// the reverse edge.
    pub fn create_edges_from(
        &mut self,
        pairs: &[(InterfaceRef, InterfaceRef)],
        bidirectional: bool,
        attrs: Attributes,
    ) -> Result<Vec<EdgeRef>, Error> {
        let mut result = Vec::new();
        for (src, dst) in pairs {
            result.extend(self.create_edge(src, dst, attrs.clone())?);
            if bidirectional && self.graph().directed {
                result.extend(self.create_edge(dst, src, attrs.clone())?);
            }
        }
        Ok(result)
    }

    /// Copy an edge from the overlay named by the reference. Only interface bindings of nodes
    /// present in this overlay are kept. Multigraphs keep the key of the source edge, such that
    /// copying the same edge twice does not produce parallel edges.
    pub fn copy_edge(&mut self, edge: &EdgeRef, reverse: bool, attrs: Attributes) -> Result<Option<EdgeRef>, Error> {
        self.add_edge_retain(edge, reverse, &[], attrs)
    }

    fn add_edge_retain(
        &mut self,
        edge: &EdgeRef,
        reverse: bool,
        retain: &[&str],
        attrs: Attributes,
    ) -> Result<Option<EdgeRef>, Error> {
        let (mut data, source_ports) = self.source_edge_data(edge, retain)?;
        data.extend(attrs);
        let mut ports = BTreeMap::new();
        for (node, interface) in source_ports {
            if self.graph().contains(node.as_str()) {
                ports.insert(node, interface);
            } else {
                self.skipped(Diagnostic::BindingDropped { node, interface });
            }
        }
        let (src, dst) = if reverse { (&edge.dst, &edge.src) } else { (&edge.src, &edge.dst) };
        let key = if self.graph().multigraph { Some(edge.key) } else { None };
        self.insert_edge(src, dst, key, data, ports)
    }

    /// Retained attributes and port bindings of an edge in the overlay named by the reference.
    fn source_edge_data(
        &self,
        edge: &EdgeRef,
        retain: &[&str],
    ) -> Result<(Attributes, BTreeMap<NodeId, InterfaceId>), Error> {
        let src = self
            .model
            .graph(&edge.overlay)
            .ok_or_else(|| Error::OverlayNotFound(edge.overlay.clone()))?;
        let mut data = Attributes::new();
        let mut ports = BTreeMap::new();
        let found = match (src.index(edge.src.as_str()), src.index(edge.dst.as_str())) {
            (Some(s), Some(d)) => {
                let key = if src.multigraph { Some(edge.key) } else { None };
                src.find_edge(s, d, key)
            }
            _ => None,
        };
        match found {
            Some(idx) => {
                let e = src.edge(idx);
                for key in retain {
                    if let Some(v) = e.attrs.get(*key) {
                        data.insert(key.to_string(), v.clone());
                    }
                }
                ports = e.ports.clone();
            }
            None => debug!("{}: source edge {} not found in {}", self.name(), edge, edge.overlay),
        }
        Ok((data, ports))
    }

    /// Copy all edges, copying the attributes listed in `retain`. Edges with missing endpoints
    /// are skipped. Returns the references of all added (or updated) edges.
    pub fn add_edges_from(
        &mut self,
        edges: &[EdgeRef],
        retain: &[&str],
        attrs: Attributes,
    ) -> Result<Vec<EdgeRef>, Error> {
        let mut result = Vec::new();
        for edge in edges {
            result.extend(self.add_edge_retain(edge, false, retain, attrs.clone())?);
        }
        Ok(result)
    }

    /// Copy all edges (see [`OverlayMut::copy_edge`]). On directed overlays, `bidirectional` also
    /// adds each edge in the reverse direction.
    pub fn copy_edges_from(
        &mut self,
        edges: &[EdgeRef],
        bidirectional: bool,
        attrs: Attributes,
    ) -> Result<Vec<EdgeRef>, Error> {
        let mut result = Vec::new();
        for edge in edges {
            result.extend(self.copy_edge(edge, false, attrs.clone())?);
            if bidirectional && self.graph().directed {
                result.extend(self.copy_edge(edge, true, attrs.clone())?);
            }
        }
        Ok(result)
    }

    /// Remove an edge. Returns `false` if the edge was not found.
    pub fn remove_edge(&mut self, edge: &EdgeRef) -> bool {
        match self.resolve_edge(edge) {
            Some(idx) => self.graph_mut().remove_edge(idx),
            None => {
                self.skipped(Diagnostic::EdgeNotFound { src: edge.src.clone(), dst: edge.dst.clone() });
                false
            }
        }
    }

    /// Remove all edges. Returns the number of removed edges.
    pub fn remove_edges_from(&mut self, edges: &[EdgeRef]) -> usize {
        edges.iter().filter(|e| self.remove_edge(e)).count()
    }

    /// Set an edge attribute. A missing edge is skipped and recorded.
    pub fn set_edge_attr<V: Into<AttrValue>>(
        &mut self,
        edge: &EdgeRef,
        key: &str,
        value: V,
    ) -> Result<(), Error> {
        check_key(key)?;
        match self.resolve_edge(edge) {
            Some(idx) => {
                self.graph_mut().edge_mut(idx).attrs.insert(key.to_string(), value.into());
            }
            None => {
                self.skipped(Diagnostic::EdgeNotFound { src: edge.src.clone(), dst: edge.dst.clone() })
            }
        }
        Ok(())
    }

    /// Bind an edge to an interface of one of its endpoints.
    pub fn bind_interface(&mut self, edge: &EdgeRef, interface: &InterfaceRef) -> bool {
        match self.resolve_edge(edge) {
            Some(idx) => {
                self.graph_mut().edge_mut(idx).ports.insert(interface.node.clone(), interface.id);
                true
            }
            None => {
                self.skipped(Diagnostic::EdgeNotFound { src: edge.src.clone(), dst: edge.dst.clone() });
                false
            }
        }
    }

    /// Copy the value of an edge attribute onto both interfaces the edge is bound to. If the edge
    /// does not have the attribute, nothing is changed.
    pub fn apply_to_interfaces(&mut self, edge: &EdgeRef, key: &str) -> Result<(), Error> {
        let (value, ports) = match self.resolve_edge(edge) {
            Some(idx) => {
                let e = self.graph().edge(idx);
                (e.attrs.get(key).cloned(), e.ports.clone())
            }
            None => return Ok(()),
        };
        if let Some(value) = value {
            let name = self.name().to_string();
            for (node, interface) in ports {
                self.set_interface_attr(&InterfaceRef::new(name.as_str(), node, interface), key, value.clone())?;
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // Graph data
    // ---------------------------------------------------------------------------------------------

    /// Set a graph-level attribute of the overlay.
    pub fn set_data<V: Into<AttrValue>>(&mut self, key: &str, value: V) -> Result<(), Error> {
        check_key(key)?;
        self.graph_mut().data.insert(key.to_string(), value.into());
        Ok(())
    }

    /// Allocate interfaces on the `input` overlay: every node gets its loopback zero, and for every
    /// edge (in sorted order), both endpoints get a new interface described as `"<src> to <dst>"`,
    /// which is bound to the edge. Nothing happens if every edge is already bound on both sides,
    /// or if the `interfaces_allocated` flag is set in the graph data.
    pub fn allocate_input_interfaces(&mut self) -> Result<(), Error> {
        if self.name() != INPUT {
            debug!("Tried to allocate interfaces on {}", self.name());
            return Ok(());
        }
        let view = self.view();
        let edges = {
            let mut edges = view.edges();
            edges.sort();
            edges
        };
        let already = !edges.is_empty() && edges.iter().all(|e| e.ports().len() == 2);
        let flagged = view.data().get("interfaces_allocated").map(|v| v.is_truthy()).unwrap_or(false);
        if already || flagged {
            debug!("Input interfaces allocated");
            return Ok(());
        }
        info!("Automatically assigning input interfaces");
        let labels: Vec<(EdgeRef, String, String)> = edges
            .iter()
            .map(|e| (e.to_ref(), e.src().label(), e.dst().label()))
            .collect();
        for (edge, src_label, dst_label) in labels {
            let src_desc = format!("{} to {}", src_label, dst_label);
            let dst_desc = format!("{} to {}", dst_label, src_label);
            let src_int = self.add_interface(&edge.src, Some(src_desc.as_str()), Attributes::new());
            let dst_int = self.add_interface(&edge.dst, Some(dst_desc.as_str()), Attributes::new());
            for interface in src_int.iter().chain(dst_int.iter()) {
                self.bind_interface(&edge, interface);
            }
        }
        Ok(())
    }
}
