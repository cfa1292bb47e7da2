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

//! Aggregation of connected nodes into a single device

use super::components::connected_subgraphs;
use crate::model::{Attributes, EdgeRef, InterfaceId, NodeId, NodeRef, OverlayMut, ToRefs};
use crate::Error;

use log::*;
use std::collections::{BTreeMap, HashSet};

/// Edge from a removed member to a node outside of the component.
#[derive(Debug)]
struct ExternalEdge {
    neighbor: NodeId,
    incoming: bool,
    neighbor_port: Option<InterfaceId>,
    attrs: Attributes,
}

/// Component which is merged into `base`.
#[derive(Debug)]
struct Merge {
    base: NodeRef,
    removed: Vec<NodeRef>,
    external: Vec<ExternalEdge>,
}

/// # Aggregate Nodes
///
/// Partition `nodes` into the connected components of the subgraph they induce (strongly
/// connected components on directed overlays), and merge every component with more than one
/// member into a single node.
///
/// The surviving node (the *base*) is the last member of the component, in the order given by
/// `nodes`. Callers which need a specific base must therefore sort `nodes` accordingly. For every
/// edge from another member to a node outside the component, the base gets a new physical
/// interface, and the edge is re-created between this interface and the interface of the external
/// node, keeping its attributes. On directed overlays, both outgoing and incoming edges are moved,
/// and keep their direction. Afterwards, all other members are removed, which drops the edges
/// inside the component.
///
/// Returns the references to all re-created edges.
pub fn aggregate_nodes<N: AsRef<str>>(
    overlay: &mut OverlayMut<'_>,
    nodes: &[N],
) -> Result<Vec<EdgeRef>, Error> {
    let merges: Vec<Merge> = {
        let view = overlay.view();
        let directed = view.is_directed();
        let mut merges = Vec::new();
        for mut component in connected_subgraphs(&view, Some(nodes)) {
            let base = match component.pop() {
                Some(base) if !component.is_empty() => base,
                _ => continue,
            };
            let members: HashSet<&NodeId> =
                component.iter().map(|n| n.id()).chain(std::iter::once(base.id())).collect();
            let external = component
                .iter()
                .flat_map(|n| {
                    let incoming = if directed { n.in_edges() } else { Vec::new() };
                    n.edges()
                        .into_iter()
                        .map(|e| (e, false))
                        .chain(incoming.into_iter().map(|e| (e.reversed(), true)))
                })
                .filter(|(e, _)| !members.contains(e.dst().id()))
                .map(|(e, incoming)| ExternalEdge {
                    neighbor: e.dst().id().clone(),
                    incoming,
                    neighbor_port: e.ports().get(e.dst().id()).copied(),
                    attrs: e.attrs().clone(),
                })
                .collect();
            merges.push(Merge { base: base.to_ref(), removed: component.to_refs(), external });
        }
        merges
    };

    let mut added: Vec<EdgeRef> = Vec::new();
    for merge in merges {
        debug!("{}: retaining {}, removing {:?}", overlay.name(), merge.base, merge.removed);
        for edge in merge.external {
            let mut ports = BTreeMap::new();
            if let Some(interface) = overlay.add_interface(&merge.base.id, None, Attributes::new()) {
                ports.insert(merge.base.id.clone(), interface.id);
            }
            if let Some(port) = edge.neighbor_port {
                ports.insert(edge.neighbor.clone(), port);
            }
            let (src, dst) = if edge.incoming {
                (&edge.neighbor, &merge.base.id)
            } else {
                (&merge.base.id, &edge.neighbor)
            };
            if let Some(e) = overlay.insert_edge(src, dst, None, edge.attrs, ports)? {
                if !added.contains(&e) {
                    added.push(e);
                }
            }
        }
        overlay.remove_nodes_from(&merge.removed);
    }
    Ok(added)
}
