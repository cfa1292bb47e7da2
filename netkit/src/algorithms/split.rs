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

//! Splitting edges by inserting a node

use crate::model::{Attributes, EdgeLookup, EdgeRef, InterfaceId, NodeId, NodeRef, OverlayMut};
use crate::Error;

use log::*;
use std::collections::BTreeMap;

/// Split a single edge. See [`split_edges`].
pub fn split(
    overlay: &mut OverlayMut<'_>,
    edge: &EdgeRef,
    retain: &[&str],
    id_prepend: &str,
) -> Result<Option<NodeRef>, Error> {
    let (stored, new_id, attrs, src_port, dst_port) = {
        let view = overlay.view();
        let e = match view.lookup_edge(&EdgeLookup::Ref(edge.clone())) {
            Some(e) => e,
            None => {
                debug!("{}: cannot split missing edge {}", view.name(), edge);
                return Ok(None);
            }
        };
        let (src, dst) = (e.src(), e.dst());
        let (a, b) = if view.is_directed() || src <= dst { (src, dst) } else { (dst, src) };
        let mut new_id = format!("{}{}_{}", id_prepend, a.id(), b.id());
        if view.is_multigraph() {
            new_id.push_str(&format!("_{}", e.key()));
        }
        let mut attrs = Attributes::new();
        for key in retain {
            if let Some(v) = e.get(key) {
                attrs.insert(key.to_string(), v.clone());
            }
        }
        let src_port: Option<InterfaceId> = e.ports().get(src.id()).copied();
        let dst_port: Option<InterfaceId> = e.ports().get(dst.id()).copied();
        (e.to_ref(), NodeId::new(new_id), attrs, src_port, dst_port)
    };

    let node = overlay.create_node(new_id.clone(), Attributes::new())?;
    let int_a = overlay.add_interface(&new_id, None, Attributes::new());
    let int_b = overlay.add_interface(&new_id, None, Attributes::new());
    overlay.remove_edge(&stored);

    let mut ports = BTreeMap::new();
    ports.extend(src_port.map(|p| (stored.src.clone(), p)));
    ports.extend(int_a.map(|i| (new_id.clone(), i.id)));
    overlay.insert_edge(&stored.src, &new_id, None, attrs.clone(), ports)?;

    let mut ports = BTreeMap::new();
    ports.extend(int_b.map(|i| (new_id.clone(), i.id)));
    ports.extend(dst_port.map(|p| (stored.dst.clone(), p)));
    overlay.insert_edge(&new_id, &stored.dst, None, attrs, ports)?;

    Ok(Some(node))
}

/// # Split Edges
///
/// Insert a new node into each edge `(src, dst)`. The original edge is replaced by the edges
/// `(src, new)` and `(new, dst)`, both carrying the attributes listed in `retain`. The new node
/// gets two physical interfaces, one bound to each new edge, while `src` and `dst` keep their
/// original interface bindings.
///
/// The id of the new node is `{id_prepend}{a}_{b}`, where `(a, b)` are the endpoints sorted by
/// their [ordering](crate::model::Node#impl-Ord) on undirected overlays, such that splitting
/// `(a, b)` or `(b, a)` results in the same id. On multigraphs, the key of the edge is appended
/// (`_{key}`). Missing edges are skipped.
///
/// Returns the references to the created nodes.
pub fn split_edges(
    overlay: &mut OverlayMut<'_>,
    edges: &[EdgeRef],
    retain: &[&str],
    id_prepend: &str,
) -> Result<Vec<NodeRef>, Error> {
    let mut added = Vec::new();
    for edge in edges {
        added.extend(split(overlay, edge, retain, id_prepend)?);
    }
    Ok(added)
}
