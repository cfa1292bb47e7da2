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

//! # Overlay Graph Storage
//!
//! Raw storage of a single overlay. Undirected overlays store every edge once, in the orientation
//! it was created with; all queries treat both orientations alike. Since the `StableGraph` reuses
//! freed slots, iteration order is defined by an insertion sequence number, not by the index.

use super::types::{Attributes, Diagnostic, EdgeKey, InterfaceId, NodeId};
use petgraph::prelude::*;
use petgraph::stable_graph::StableGraph;
use std::collections::{BTreeMap, HashMap};

type IndexType = u32;
/// Index of a node in the overlay graph
pub(crate) type NodeIdx = NodeIndex<IndexType>;
/// Index of an edge in the overlay graph
pub(crate) type EdgeIdx = EdgeIndex<IndexType>;

/// Data stored for each node
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub id: NodeId,
    pub seq: u64,
    pub attrs: Attributes,
    pub ports: BTreeMap<InterfaceId, Attributes>,
}

/// Data stored for each edge
#[derive(Debug, Clone)]
pub(crate) struct EdgeData {
    pub key: EdgeKey,
    pub seq: u64,
    pub attrs: Attributes,
    pub ports: BTreeMap<NodeId, InterfaceId>,
}

/// A single overlay
#[derive(Debug, Clone)]
pub(crate) struct OverlayGraph {
    pub name: String,
    pub directed: bool,
    pub multigraph: bool,
    pub data: Attributes,
    pub diagnostics: Vec<Diagnostic>,
    graph: StableGraph<NodeData, EdgeData, Directed, IndexType>,
    indices: HashMap<NodeId, NodeIdx>,
    next_seq: u64,
}

impl OverlayGraph {
    pub fn new(name: &str, directed: bool, multigraph: bool) -> Self {
        Self {
            name: name.to_string(),
            directed,
            multigraph,
            data: Attributes::new(),
            diagnostics: Vec::new(),
            graph: StableGraph::default(),
            indices: HashMap::new(),
            next_seq: 0,
        }
    }

    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index(&self, id: &str) -> Option<NodeIdx> {
        self.indices.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.indices.contains_key(id)
    }

    pub fn node(&self, idx: NodeIdx) -> &NodeData {
        &self.graph[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut NodeData {
        &mut self.graph[idx]
    }

    pub fn edge(&self, idx: EdgeIdx) -> &EdgeData {
        &self.graph[idx]
    }

    pub fn edge_mut(&mut self, idx: EdgeIdx) -> &mut EdgeData {
        &mut self.graph[idx]
    }

    pub fn id(&self, idx: NodeIdx) -> &NodeId {
        &self.graph[idx].id
    }

    /// Returns the stored orientation of an edge.
    pub fn endpoints(&self, idx: EdgeIdx) -> Option<(NodeIdx, NodeIdx)> {
        self.graph.edge_endpoints(idx)
    }

    /// All nodes in insertion order
    pub fn node_indices(&self) -> Vec<NodeIdx> {
        let mut nodes: Vec<NodeIdx> = self.graph.node_indices().collect();
        nodes.sort_by_key(|n| self.graph[*n].seq);
        nodes
    }

    /// All edges in insertion order
    pub fn edge_indices(&self) -> Vec<EdgeIdx> {
        let mut edges: Vec<EdgeIdx> = self.graph.edge_indices().collect();
        edges.sort_by_key(|e| self.graph[*e].seq);
        edges
    }

    /// Adds a node, or updates the attributes of the node if it already exists. In the latter
    /// case, the ports are left untouched. Returns the index and whether the node was new.
    pub fn insert_node(
        &mut self,
        id: NodeId,
        attrs: Attributes,
        ports: BTreeMap<InterfaceId, Attributes>,
    ) -> (NodeIdx, bool) {
        if let Some(idx) = self.index(id.as_str()) {
            self.graph[idx].attrs.extend(attrs);
            return (idx, false);
        }
        let seq = self.seq();
        let idx = self.graph.add_node(NodeData { id: id.clone(), seq, attrs, ports });
        self.indices.insert(id, idx);
        (idx, true)
    }

    /// Removes a node together with all its edges.
    pub fn remove_node(&mut self, id: &str) -> bool {
        match self.indices.remove(id) {
            Some(idx) => self.graph.remove_node(idx).is_some(),
            None => false,
        }
    }

    fn collect_edges(&self, idx: NodeIdx, dirs: &[Direction]) -> Vec<EdgeIdx> {
        let mut edges: Vec<EdgeIdx> = dirs
            .iter()
            .flat_map(|d| self.graph.edges_directed(idx, *d).map(|e| e.id()))
            .collect();
        edges.sort_by_key(|e| self.graph[*e].seq);
        edges.dedup();
        edges
    }

    /// Edges leaving the node. On undirected overlays, these are all incident edges.
    pub fn out_edges(&self, idx: NodeIdx) -> Vec<EdgeIdx> {
        if self.directed {
            self.collect_edges(idx, &[Outgoing])
        } else {
            self.collect_edges(idx, &[Outgoing, Incoming])
        }
    }

    /// Edges entering the node. On undirected overlays, these are all incident edges.
    pub fn in_edges(&self, idx: NodeIdx) -> Vec<EdgeIdx> {
        if self.directed {
            self.collect_edges(idx, &[Incoming])
        } else {
            self.collect_edges(idx, &[Outgoing, Incoming])
        }
    }

    /// All incident edges, regardless of the direction.
    pub fn incident_edges(&self, idx: NodeIdx) -> Vec<EdgeIdx> {
        self.collect_edges(idx, &[Outgoing, Incoming])
    }

    /// Returns the opposite endpoint of an edge, seen from `idx`.
    pub fn opposite(&self, edge: EdgeIdx, idx: NodeIdx) -> Option<NodeIdx> {
        self.endpoints(edge).map(|(a, b)| if a == idx { b } else { a })
    }

    /// All edges between `a` and `b` (in the direction `a -> b` on directed overlays), sorted by
    /// their key.
    pub fn edges_between(&self, a: NodeIdx, b: NodeIdx) -> Vec<EdgeIdx> {
        let mut edges: Vec<EdgeIdx> = self
            .out_edges(a)
            .into_iter()
            .filter(|e| self.opposite(*e, a) == Some(b))
            .filter(|e| !self.directed || self.endpoints(*e).map(|(s, _)| s) == Some(a))
            .collect();
        edges.sort_by_key(|e| self.graph[*e].key);
        edges
    }

    /// Find a single edge between `a` and `b`. If no key is given, the edge with the smallest key
    /// is returned.
    pub fn find_edge(&self, a: NodeIdx, b: NodeIdx, key: Option<EdgeKey>) -> Option<EdgeIdx> {
        let edges = self.edges_between(a, b);
        match key {
            Some(k) => edges.into_iter().find(|e| self.graph[*e].key == k),
            None => edges.into_iter().next(),
        }
    }

    /// Next free key between `a` and `b`: start with the number of existing parallel edges, and
    /// increment until no edge uses that key.
    pub fn next_key(&self, a: NodeIdx, b: NodeIdx) -> EdgeKey {
        let keys: Vec<EdgeKey> =
            self.edges_between(a, b).into_iter().map(|e| self.graph[e].key).collect();
        let mut key = keys.len() as EdgeKey;
        while keys.contains(&key) {
            key += 1;
        }
        key
    }

    /// Adds an edge from `src` to `dst`.
    ///
    /// - On simple overlays, an existing edge between both nodes is updated with the new
    ///   attributes and bindings.
    /// - On multigraphs, an explicit key updates the edge with that key if it exists. Without a
    ///   key, the next free key is allocated.
    pub fn insert_edge(
        &mut self,
        src: NodeIdx,
        dst: NodeIdx,
        key: Option<EdgeKey>,
        attrs: Attributes,
        ports: BTreeMap<NodeId, InterfaceId>,
    ) -> EdgeIdx {
        let existing = if self.multigraph {
            key.and_then(|k| self.find_edge(src, dst, Some(k)))
        } else {
            self.find_edge(src, dst, None)
        };
        if let Some(idx) = existing {
            let data = &mut self.graph[idx];
            data.attrs.extend(attrs);
            data.ports.extend(ports);
            return idx;
        }
        let key = match (self.multigraph, key) {
            (false, _) => 0,
            (true, Some(k)) => k,
            (true, None) => self.next_key(src, dst),
        };
        let seq = self.seq();
        self.graph.add_edge(src, dst, EdgeData { key, seq, attrs, ports })
    }

    pub fn remove_edge(&mut self, idx: EdgeIdx) -> bool {
        self.graph.remove_edge(idx).is_some()
    }

    /// Neighbors following the outgoing edges (all incident edges on undirected overlays), in the
    /// order of the edges, without duplicates.
    pub fn neighbors(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        let mut result: Vec<NodeIdx> = Vec::new();
        for e in self.out_edges(idx) {
            let other = if self.directed {
                self.endpoints(e).map(|(_, b)| b)
            } else {
                self.opposite(e, idx)
            };
            if let Some(n) = other {
                if !result.contains(&n) {
                    result.push(n);
                }
            }
        }
        result
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn n(g: &mut OverlayGraph, id: &str) -> NodeIdx {
        g.insert_node(id.into(), Attributes::new(), BTreeMap::new()).0
    }

    #[test]
    fn undirected_lookup() {
        let mut g = OverlayGraph::new("test", false, false);
        let a = n(&mut g, "a");
        let b = n(&mut g, "b");
        let e = g.insert_edge(a, b, None, Attributes::new(), BTreeMap::new());
        assert_eq!(g.find_edge(b, a, None), Some(e));
        assert_eq!(g.find_edge(a, b, None), Some(e));
        // a second insertion only updates the edge
        let e2 = g.insert_edge(b, a, None, Attributes::new(), BTreeMap::new());
        assert_eq!(e, e2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.neighbors(b), vec![a]);
    }

    #[test]
    fn directed_lookup() {
        let mut g = OverlayGraph::new("test", true, false);
        let a = n(&mut g, "a");
        let b = n(&mut g, "b");
        let e = g.insert_edge(a, b, None, Attributes::new(), BTreeMap::new());
        assert_eq!(g.find_edge(a, b, None), Some(e));
        assert_eq!(g.find_edge(b, a, None), None);
        assert_eq!(g.neighbors(a), vec![b]);
        assert!(g.neighbors(b).is_empty());
        assert_eq!(g.incident_edges(b), vec![e]);
    }

    #[test]
    fn multigraph_keys() {
        let mut g = OverlayGraph::new("test", false, true);
        let a = n(&mut g, "a");
        let b = n(&mut g, "b");
        let e0 = g.insert_edge(a, b, None, Attributes::new(), BTreeMap::new());
        let e1 = g.insert_edge(b, a, None, Attributes::new(), BTreeMap::new());
        assert_eq!(g.edge(e0).key, 0);
        assert_eq!(g.edge(e1).key, 1);
        g.remove_edge(e0);
        // one edge left with key 1, so len = 1 collides and is skipped
        let e2 = g.insert_edge(a, b, None, Attributes::new(), BTreeMap::new());
        assert_eq!(g.edge(e2).key, 2);
        // explicit key updates instead of duplicating
        let e3 = g.insert_edge(a, b, Some(1), Attributes::new(), BTreeMap::new());
        assert_eq!(e3, e1);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn insertion_order_survives_slot_reuse() {
        let mut g = OverlayGraph::new("test", false, false);
        n(&mut g, "a");
        n(&mut g, "b");
        g.remove_node("a");
        n(&mut g, "c");
        let ids: Vec<&str> = g.node_indices().into_iter().map(|i| g.id(i).as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
