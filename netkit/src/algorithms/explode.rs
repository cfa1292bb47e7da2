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

//! Explosion of nodes into cliques

use crate::model::{Attributes, EdgeRef, InterfaceId, NodeId, OverlayMut};
use crate::Error;

use itertools::Itertools;
use log::*;
use std::collections::BTreeMap;

/// Edge between two former neighbors of an exploded node.
#[derive(Debug)]
struct Shortcut {
    src: NodeId,
    dst: NodeId,
    attrs: Attributes,
    ports: BTreeMap<NodeId, InterfaceId>,
}

/// # Explode Nodes
///
/// Replace each node in `nodes` by direct edges between its neighbors. For every unordered pair of
/// distinct edges `(e1, e2)` of the node (with `e1 < e2`, both oriented away from the node), an
/// edge from the neighbor of `e1` to the neighbor of `e2` is created, unless both neighbors are the
/// same node. Self-loops of the node are ignored. The new edge carries the attributes listed in
/// `retain` (read from `e1`, then `e2`), and the interface bindings of both neighbors. Finally, the
/// node is removed.
///
/// A node with `n` distinct neighbors is replaced by `n * (n - 1) / 2` edges. On directed
/// overlays, the direction of the original edges is ignored. Nodes are exploded one after the
/// other, so exploding two adjacent nodes connects the neighbors of both.
///
/// Returns the references to all created edges.
pub fn explode_nodes<N: AsRef<str>>(
    overlay: &mut OverlayMut<'_>,
    nodes: &[N],
    retain: &[&str],
) -> Result<Vec<EdgeRef>, Error> {
    let mut added = Vec::new();
    for node in nodes {
        let node = node.as_ref();
        let shortcuts: Vec<Shortcut> = {
            let view = overlay.view();
            let node = match view.node(node) {
                Some(n) => n,
                None => {
                    debug!("{}: cannot explode missing node {}", view.name(), node);
                    continue;
                }
            };
            node.incident_edges()
                .into_iter()
                .filter(|e| e.dst() != node)
                .sorted()
                .tuple_combinations()
                .filter(|(e1, e2)| e1.dst() != e2.dst())
                .map(|(e1, e2)| {
                    let (src, dst) = (e1.dst(), e2.dst());
                    let mut attrs = Attributes::new();
                    for e in [&e1, &e2].iter() {
                        for key in retain {
                            if let Some(v) = e.get(key) {
                                attrs.insert(key.to_string(), v.clone());
                            }
                        }
                    }
                    let mut ports = BTreeMap::new();
                    if let Some(i) = e1.ports().get(src.id()) {
                        ports.insert(src.id().clone(), *i);
                    }
                    if let Some(i) = e2.ports().get(dst.id()) {
                        ports.insert(dst.id().clone(), *i);
                    }
                    Shortcut { src: src.id().clone(), dst: dst.id().clone(), attrs, ports }
                })
                .collect()
        };
        debug!("{}: exploding {} into {} edges", overlay.name(), node, shortcuts.len());
        for s in shortcuts {
            added.extend(overlay.insert_edge(&s.src, &s.dst, None, s.attrs, s.ports)?);
        }
        overlay.remove_node(node);
    }
    Ok(added)
}
