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

//! Component queries

use crate::model::{Node, Overlay};

use itertools::Itertools;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// # Connected Subgraphs
///
/// Decompose the subgraph induced by `nodes` (or the whole overlay, if `nodes` is `None`) into
/// connected components. On directed overlays, strongly connected components are computed.
///
/// The members of each component keep the order in which they appear in `nodes` (insertion order
/// for the whole overlay), and the components are ordered by their first member. Unknown node ids
/// are ignored.
pub fn connected_subgraphs<'a, N: AsRef<str>>(
    overlay: &Overlay<'a>,
    nodes: Option<&[N]>,
) -> Vec<Vec<Node<'a>>> {
    let graph = overlay.graph();
    let members: Vec<_> = match nodes {
        Some(nodes) => nodes.iter().filter_map(|n| graph.index(n.as_ref())).unique().collect(),
        None => graph.node_indices(),
    };
    let position: HashMap<_, usize> = members.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    let mut components: Vec<Vec<usize>> = if graph.directed {
        let mut sub: DiGraph<(), ()> = DiGraph::with_capacity(members.len(), 0);
        members.iter().for_each(|_| {
            sub.add_node(());
        });
        for (i, n) in members.iter().enumerate() {
            for m in graph.neighbors(*n) {
                if let Some(j) = position.get(&m) {
                    sub.add_edge(NodeIndex::new(i), NodeIndex::new(*j), ());
                }
            }
        }
        kosaraju_scc(&sub)
            .into_iter()
            .map(|c| c.into_iter().map(|n| n.index()).sorted().collect())
            .collect()
    } else {
        let mut uf: UnionFind<usize> = UnionFind::new(members.len());
        for (i, n) in members.iter().enumerate() {
            for m in graph.neighbors(*n) {
                if let Some(j) = position.get(&m) {
                    uf.union(i, *j);
                }
            }
        }
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, label) in uf.into_labeling().into_iter().enumerate() {
            groups.entry(label).or_default().push(i);
        }
        groups.into_iter().map(|(_, c)| c).collect()
    };
    components.sort_by_key(|c| c.first().copied());

    components
        .into_iter()
        .map(|c| c.into_iter().map(|i| Node::new(overlay.model(), graph, members[i])).collect())
        .collect()
}

/// # Boundary Nodes
///
/// Nodes of `nodes` which have at least one edge leaving the set (outgoing edges on directed
/// overlays). Every node is returned at most once, in the order of `nodes`.
pub fn boundary_nodes<'a, N: AsRef<str>>(overlay: &Overlay<'a>, nodes: &[N]) -> Vec<Node<'a>> {
    let members: Vec<Node<'a>> = nodes.iter().filter_map(|n| overlay.node(n)).unique().collect();
    let set: HashSet<Node<'a>> = members.iter().copied().collect();
    members.into_iter().filter(|n| n.neighbors().iter().any(|x| !set.contains(x))).collect()
}

/// # Shortest Path
///
/// Unweighted shortest path from `src` to `dst` (following edge directions on directed overlays),
/// computed with a breadth-first search. The path contains both endpoints. If either node does not
/// exist, or if `dst` cannot be reached, the path is empty.
pub fn shortest_path<'a, A: AsRef<str>, B: AsRef<str>>(
    overlay: &Overlay<'a>,
    src: A,
    dst: B,
) -> Vec<Node<'a>> {
    let graph = overlay.graph();
    let (src, dst) = match (graph.index(src.as_ref()), graph.index(dst.as_ref())) {
        (Some(s), Some(d)) => (s, d),
        _ => return Vec::new(),
    };

    let mut predecessor = HashMap::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(src);
    queue.push_back(src);
    while let Some(current) = queue.pop_front() {
        if current == dst {
            break;
        }
        for next in graph.neighbors(current) {
            if visited.insert(next) {
                predecessor.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    if !visited.contains(&dst) {
        return Vec::new();
    }
    let mut path = vec![dst];
    let mut current = dst;
    while let Some(prev) = predecessor.get(&current) {
        path.push(*prev);
        current = *prev;
    }
    path.reverse();
    path.into_iter().map(|n| Node::new(overlay.model(), graph, n)).collect()
}
