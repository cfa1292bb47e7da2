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

//! # Attribute Propagation
//!
//! Functions to copy attributes from one overlay into another, and to aggregate the attributes of
//! the neighbors of a node. Builders use them to pull data from `input` or `phy` into the overlay
//! they construct.
//!
//! Copying never creates nodes, edges or interfaces. Elements which are missing in the destination
//! overlay are skipped, and so are elements whose source value is missing while no default is
//! given. Both cases are logged at debug level. A value which cannot be coerced into the requested
//! [`ValueType`] is an error.

use crate::model::types::check_key;
use crate::model::{
    AttrValue, Attributes, Edge, EdgeLookup, EdgeRef, InterfaceRef, NetworkModel, Node, NodeId,
    NodeRef, Overlay, OverlayMut, ValueType,
};
use crate::Error;

use itertools::Itertools;
use log::*;
use std::cmp::Ordering;

fn resolve_value(
    value: Option<&AttrValue>,
    value_type: Option<ValueType>,
    default: Option<&AttrValue>,
) -> Result<Option<AttrValue>, Error> {
    match (value.or(default), value_type) {
        (Some(v), Some(t)) => t.coerce(v).map(Some),
        (Some(v), None) => Ok(Some(v.clone())),
        (None, _) => Ok(None),
    }
}

/// # Copy Node Attributes
///
/// Copy the attribute `src_attr` of every node in `src` (or only of `nodes`, if given) to the
/// attribute `dst_attr` (or `src_attr`) of the same node in `dst`. The value is read from the
/// attributes stored on `src` itself. If it is missing, `default` is used instead.
///
/// ```
/// use netkit::example_networks::{ExampleNetwork, HouseNet};
/// use netkit::propagate::copy_node_attr_from;
/// use netkit::model::ValueType;
///
/// let mut model = HouseNet::model();
/// let refs = model.overlay("phy").unwrap().node_refs();
/// model.add_overlay("ospf", false, false).unwrap().copy_nodes_from(&refs, Default::default()).unwrap();
///
/// copy_node_attr_from(&mut model, "input", "ospf", "x", Some("pos_x"), None, Some(ValueType::Int), None).unwrap();
/// assert!(model.overlay("ospf").unwrap().node("r1").unwrap().get("pos_x").is_some());
/// ```
#[allow(clippy::too_many_arguments)]
pub fn copy_node_attr_from(
    model: &mut NetworkModel,
    src: &str,
    dst: &str,
    src_attr: &str,
    dst_attr: Option<&str>,
    nodes: Option<&[NodeRef]>,
    value_type: Option<ValueType>,
    default: Option<AttrValue>,
) -> Result<(), Error> {
    let dst_attr = dst_attr.unwrap_or(src_attr);
    check_key(dst_attr)?;
    let values: Vec<(NodeId, AttrValue)> = {
        let src_overlay = model.overlay(src)?;
        let nodes: Vec<Node> = match nodes {
            Some(nodes) => nodes.iter().filter_map(|n| src_overlay.node(&n.id)).collect(),
            None => src_overlay.nodes(),
        };
        let mut values = Vec::with_capacity(nodes.len());
        for node in nodes {
            match resolve_value(node.attrs().get(src_attr), value_type, default.as_ref())? {
                Some(v) => values.push((node.id().clone(), v)),
                None => debug!("Unable to copy node attribute {} for {} in {}", src_attr, node, src),
            }
        }
        values
    };

    let mut dst_overlay = model.overlay_mut(dst)?;
    for (node, value) in values {
        if dst_overlay.view().contains(&node) {
            dst_overlay.set_node_attr(&node, dst_attr, value)?;
        }
    }
    Ok(())
}

/// # Copy Edge Attributes
///
/// Copy the attribute `src_attr` of every edge in `src` (or only of `edges`, if given) to the
/// same edge in `dst`. Edges are matched by their endpoints, and by their key if `dst` is a
/// multigraph. Edges which were created by aggregating or exploding nodes have no counterpart in
/// the source overlay, and are therefore never reached.
#[allow(clippy::too_many_arguments)]
pub fn copy_edge_attr_from(
    model: &mut NetworkModel,
    src: &str,
    dst: &str,
    src_attr: &str,
    dst_attr: Option<&str>,
    edges: Option<&[EdgeRef]>,
    value_type: Option<ValueType>,
    default: Option<AttrValue>,
) -> Result<(), Error> {
    let dst_attr = dst_attr.unwrap_or(src_attr);
    check_key(dst_attr)?;
    let values: Vec<(EdgeRef, AttrValue)> = {
        let src_overlay = model.overlay(src)?;
        let edges: Vec<Edge> = match edges {
            Some(edges) => {
                edges.iter().filter_map(|e| src_overlay.lookup_edge(&EdgeLookup::Ref(e.clone()))).collect()
            }
            None => src_overlay.edges(),
        };
        let mut values = Vec::with_capacity(edges.len());
        for edge in edges {
            match resolve_value(edge.get(src_attr), value_type, default.as_ref())? {
                Some(v) => values.push((edge.to_ref(), v)),
                None => debug!("Unable to copy edge attribute {} for {} in {}", src_attr, edge, src),
            }
        }
        values
    };

    let mut dst_overlay = model.overlay_mut(dst)?;
    for (edge, value) in values {
        if dst_overlay.view().lookup_edge(&EdgeLookup::Ref(edge.clone())).is_some() {
            dst_overlay.set_edge_attr(&edge, dst_attr, value)?;
        } else {
            debug!("Unable to set edge attribute on {} in {}", edge, dst);
        }
    }
    Ok(())
}

/// # Copy Interface Attributes
///
/// Copy the attribute `src_attr` of every interface of every node in `src` (or of `nodes`) to
/// the interface with the same id of the same node in `dst`. The source value is read with
/// fallthrough to `phy`.
#[allow(clippy::too_many_arguments)]
pub fn copy_int_attr_from(
    model: &mut NetworkModel,
    src: &str,
    dst: &str,
    src_attr: &str,
    dst_attr: Option<&str>,
    nodes: Option<&[NodeRef]>,
    value_type: Option<ValueType>,
    default: Option<AttrValue>,
) -> Result<(), Error> {
    let dst_attr = dst_attr.unwrap_or(src_attr);
    check_key(dst_attr)?;
    let values: Vec<(InterfaceRef, AttrValue)> = {
        let src_overlay = model.overlay(src)?;
        let dst_overlay = model.overlay(dst)?;
        let nodes: Vec<Node> = match nodes {
            Some(nodes) => nodes.iter().filter_map(|n| src_overlay.node(&n.id)).collect(),
            None => src_overlay.nodes(),
        };
        let mut values = Vec::new();
        for interface in nodes.iter().filter(|n| dst_overlay.contains(n.id())).flat_map(|n| n.interfaces()) {
            let target = interface.to_ref();
            if dst_overlay.interface(&target).is_none() {
                continue;
            }
            match resolve_value(interface.get(src_attr), value_type, default.as_ref())? {
                Some(v) => values.push((target, v)),
                None => debug!("Unable to copy interface attribute {} for {}", src_attr, interface),
            }
        }
        values
    };

    let mut dst_overlay = model.overlay_mut(dst)?;
    for (interface, value) in values {
        dst_overlay.set_interface_attr(&interface, dst_attr, value)?;
    }
    Ok(())
}

/// Set the attributes on all `nodes` (or all nodes of the overlay) which do not have them set
/// yet. Nodes added later are not affected.
pub fn set_node_default(
    overlay: &mut OverlayMut<'_>,
    nodes: Option<&[NodeRef]>,
    attrs: &Attributes,
) -> Result<(), Error> {
    let missing: Vec<(NodeId, &String, &AttrValue)> = {
        let view = overlay.view();
        let nodes: Vec<Node> = match nodes {
            Some(nodes) => nodes.iter().filter_map(|n| view.node(&n.id)).collect(),
            None => view.nodes(),
        };
        nodes
            .iter()
            .flat_map(|n| {
                attrs
                    .iter()
                    .filter(move |(k, _)| !n.attrs().contains_key(k.as_str()))
                    .map(move |(k, v)| (n.id().clone(), k, v))
            })
            .collect()
    };
    for (node, key, value) in missing {
        overlay.set_node_attr(&node, key, value.clone())?;
    }
    Ok(())
}

/// # Most frequent value
///
/// Returns the value which appears most often. Ties are broken in favor of the smallest value.
/// Returns `None` if `values` is empty.
///
/// ```
/// use netkit::propagate::most_frequent;
///
/// assert_eq!(most_frequent(&[3, 1, 3, 2, 1]), Some(1));
/// assert_eq!(most_frequent(&[3, 1, 3]), Some(3));
/// assert_eq!(most_frequent::<u32>(&[]), None);
/// ```
pub fn most_frequent<T: PartialOrd + Clone>(values: &[T]) -> Option<T> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mut best: Option<(usize, T)> = None;
    for (value, group) in &sorted.iter().group_by(|v| *v) {
        let count = group.count();
        if best.as_ref().map(|(c, _)| count > *c).unwrap_or(true) {
            best = Some((count, value.clone()));
        }
    }
    if best.is_none() {
        debug!("Unable to compute the most frequent value of an empty list");
    }
    best.map(|(_, v)| v)
}

/// Values of `attr` of all neighbors of `node` in `overlay`. The values are read from
/// `attribute_graph` if given, in which case neighbors missing in that overlay are skipped.
pub fn neigh_attr<'a, N: AsRef<str>>(
    overlay: &Overlay<'a>,
    node: N,
    attr: &str,
    attribute_graph: Option<&Overlay<'a>>,
) -> Vec<Option<AttrValue>> {
    let attribute_graph = attribute_graph.unwrap_or(overlay);
    match overlay.node(node) {
        Some(node) => node
            .neighbors()
            .into_iter()
            .filter_map(|n| attribute_graph.node(n.id()))
            .map(|n| n.get(attr).cloned())
            .collect(),
        None => Vec::new(),
    }
}

/// # Most frequent neighbor value
///
/// Returns the [most frequent](most_frequent) value of `attr` among the neighbors of `node`.
/// Neighbors without the attribute are ignored, unless `allow_none` is set. In that case, a
/// missing value counts as the smallest value, and `None` is returned if it is the most frequent.
pub fn neigh_most_frequent<'a, N: AsRef<str>>(
    overlay: &Overlay<'a>,
    node: N,
    attr: &str,
    attribute_graph: Option<&Overlay<'a>>,
    allow_none: bool,
) -> Option<AttrValue> {
    let values = neigh_attr(overlay, node, attr, attribute_graph);
    if allow_none {
        most_frequent(&values).flatten()
    } else {
        let values: Vec<AttrValue> = values.into_iter().flatten().collect();
        most_frequent(&values)
    }
}

/// # Average neighbor value
///
/// If the value of `attr` of every neighbor can be read as a number, the arithmetic mean is
/// returned (as float). Otherwise, the [most frequent](most_frequent) value is returned. Returns
/// `None` if the node has no neighbors.
pub fn neigh_average<'a, N: AsRef<str>>(
    overlay: &Overlay<'a>,
    node: N,
    attr: &str,
    attribute_graph: Option<&Overlay<'a>>,
) -> Option<AttrValue> {
    let values = neigh_attr(overlay, node, attr, attribute_graph);
    if values.is_empty() {
        return None;
    }
    let numbers: Option<Vec<f64>> = values
        .iter()
        .map(|v| v.as_ref().and_then(|v| ValueType::Float.coerce(v).ok()).and_then(|v| v.as_float()))
        .collect();
    match numbers {
        Some(numbers) => Some(AttrValue::Float(numbers.iter().sum::<f64>() / numbers.len() as f64)),
        None => most_frequent(&values).flatten(),
    }
}

/// Returns `true` if all neighbors of `node` have the same value of `attr` (read from
/// `attribute_graph`, if given). A node without neighbors returns `false`.
pub fn neigh_equal<'a, N: AsRef<str>>(
    overlay: &Overlay<'a>,
    node: N,
    attr: &str,
    attribute_graph: Option<&Overlay<'a>>,
) -> bool {
    let values = neigh_attr(overlay, node, attr, attribute_graph);
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn most_frequent_ties() {
        assert_eq!(most_frequent(&["b", "a", "b", "a"]), Some("a"));
        assert_eq!(most_frequent(&["b", "a", "b"]), Some("b"));
        assert_eq!(most_frequent(&[AttrValue::from(2), AttrValue::from(2.0), AttrValue::from(1)]), Some(AttrValue::Int(2)));
    }

    #[test]
    fn most_frequent_with_none() {
        assert_eq!(most_frequent(&[None, Some(1), None]), Some(None));
        assert_eq!(most_frequent(&[None, Some(1), Some(1)]), Some(Some(1)));
    }
}
