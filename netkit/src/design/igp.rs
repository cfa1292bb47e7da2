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

//! # Interior Gateway Protocols
//!
//! Builders for the `ospf`, `eigrp`, `isis` and `rip` overlays, and the summary overlay `igp`.
//! A node takes part in a protocol if the `igp` attribute in `phy` names the protocol. Links
//! between different ASes are removed from all IGP overlays.

use super::layer3::LAYER3;
use super::{mark_multipoint, routing_enabled};
use crate::algorithms::{aggregate_nodes, explode_nodes};
use crate::model::{
    AttrValue, Attributes, EdgeRef, InterfaceRef, NetworkModel, Node, NodeRef, OverlayMut, ToRefs,
    ValueType, INPUT, PHY,
};
use crate::propagate::{copy_edge_attr_from, copy_int_attr_from, copy_node_attr_from};
use crate::Error;

use log::*;
use maplit::btreemap;
use std::net::Ipv4Addr;

/// Name of the summary overlay
pub const IGP: &str = "igp";
/// Names of the IGP overlays, in the order they are built.
pub const IGP_PROTOCOLS: [&str; 4] = ["ospf", "eigrp", "isis", "rip"];

/// Router type of OSPF routers with interfaces only in area 0.
pub const BACKBONE: &str = "backbone";
/// Router type of OSPF routers with interfaces only in a single area other than 0.
pub const INTERNAL: &str = "internal";
/// Router type of OSPF routers with interfaces in area 0 and other areas.
pub const BACKBONE_ABR: &str = "backbone ABR";
/// Router type of OSPF routers spanning multiple areas without area 0.
pub const INVALID: &str = "INVALID";

/// Build all IGP overlays, and the summary overlay `igp`, which contains the nodes and edges of
/// every protocol overlay, tagged with the protocol in the `igp` attribute.
pub fn build_igp(model: &mut NetworkModel) -> Result<(), Error> {
    build_ospf(model)?;
    build_eigrp(model)?;
    build_isis(model)?;
    build_rip(model)?;

    model.add_overlay(IGP, false, false)?;
    for protocol in IGP_PROTOCOLS.iter() {
        let (nodes, edges) = {
            let g = model.overlay(protocol)?;
            (g.node_refs(), g.edge_refs())
        };
        let tag: Attributes = btreemap! {"igp".to_string() => AttrValue::from(*protocol)};
        let mut igp = model.overlay_mut(IGP)?;
        igp.add_nodes_from(&nodes, &[], tag.clone())?;
        igp.add_edges_from(&edges, &[], tag)?;
    }
    Ok(())
}

/// Create the overlay `name`, and fill it with the nodes of `layer3` running the protocol `igp`
/// and the edges between them. Returns `false` (leaving the overlay empty) if no node runs the
/// protocol, or if routing is disabled.
fn populate(model: &mut NetworkModel, name: &str, igp: &str) -> Result<bool, Error> {
    model.add_overlay(name, false, false)?;
    let runs_igp = |v: Option<&AttrValue>| v.map(|v| *v == igp).unwrap_or(false);

    if !model.overlay(PHY)?.nodes().iter().any(|n| runs_igp(n.get("igp"))) {
        debug!("No {} nodes", name);
        return Ok(false);
    }
    if !routing_enabled(model)? {
        info!("Routing disabled, not configuring {}", name);
        return Ok(false);
    }

    let (nodes, edges): (Vec<NodeRef>, Vec<EdgeRef>) = {
        let l3 = model.overlay(LAYER3)?;
        let member = |n: &Node| runs_igp(n.phy().and_then(|p| p.get("igp")));
        let nodes = l3.nodes().into_iter().filter(|n| member(n)).map(|n| n.to_ref()).collect();
        let edges = l3
            .edges()
            .into_iter()
            .filter(|e| member(&e.src()) && member(&e.dst()))
            .map(|e| e.to_ref())
            .collect();
        (nodes, edges)
    };
    let mut g = model.overlay_mut(name)?;
    g.add_nodes_from(&nodes, &[], Attributes::new())?;
    g.add_edges_from(&edges, &[], Attributes::new())?;
    let config = format!("custom_config_{}", name);
    copy_int_attr_from(model, LAYER3, name, "multipoint", None, None, None, None)?;
    copy_node_attr_from(model, INPUT, name, &config, Some("custom_config"), None, None, None)?;
    info!("{}: {} nodes, {} links", name, nodes.len(), model.overlay(name)?.edge_count());
    Ok(true)
}

/// Remove all links between nodes of different ASes.
fn remove_inter_as_links(g: &mut OverlayMut<'_>) {
    let links: Vec<EdgeRef> = g
        .view()
        .edges()
        .into_iter()
        .filter(|e| e.src().asn() != e.dst().asn())
        .map(|e| e.to_ref())
        .collect();
    let removed = g.remove_edges_from(&links);
    debug!("{}: removed {} inter-AS links", g.name(), removed);
}

/// Copy the edge attribute `key` onto both interfaces of every edge.
fn edge_attr_to_interfaces(g: &mut OverlayMut<'_>, keys: &[&str]) -> Result<(), Error> {
    let edges = g.view().edge_refs();
    for edge in edges.iter() {
        for key in keys {
            g.apply_to_interfaces(edge, key)?;
        }
    }
    Ok(())
}

fn is_area_zero(area: &AttrValue) -> bool {
    *area == 0 || *area == "0.0.0.0"
}

/// Normalize a configured OSPF area: integers (or integer strings) are kept as integers, dotted
/// quads as strings. Everything else is replaced by `default`.
fn normalize_area(node: &NodeRef, area: Option<&AttrValue>, default: &AttrValue) -> AttrValue {
    let area = match area {
        Some(a) if a.is_truthy() && *a != "None" => a,
        _ => return default.clone(),
    };
    if let Ok(a) = ValueType::Int.coerce(area) {
        return a;
    }
    match area.as_str().map(|s| s.trim().parse::<Ipv4Addr>()) {
        Some(Ok(ip)) => AttrValue::Str(ip.to_string()),
        _ => {
            warn!("{}: invalid OSPF area {}, using default of {}", node, area, default);
            default.clone()
        }
    }
}

/// Area of a link between two routers. Links inside an area get that area, links between area 0
/// and another area get the other area. Links between two different non-zero areas get none.
fn link_area(src: &AttrValue, dst: &AttrValue) -> Option<AttrValue> {
    if src == dst {
        Some(src.clone())
    } else if is_area_zero(src) {
        Some(dst.clone())
    } else if is_area_zero(dst) {
        Some(src.clone())
    } else {
        None
    }
}

/// Router type derived from the areas of its links, and from its own area.
fn router_type(node: &NodeRef, areas: &[AttrValue], area: &AttrValue) -> &'static str {
    let has_zero = areas.iter().any(is_area_zero);
    match areas.len() {
        0 => BACKBONE,
        1 if has_zero => BACKBONE,
        1 => INTERNAL,
        _ if has_zero => BACKBONE_ABR,
        _ if is_area_zero(area) => {
            debug!("{} belongs to area {} but has no area zero interfaces", node, area);
            BACKBONE_ABR
        }
        _ => {
            warn!("{} spans multiple areas but is not a member of area 0", node);
            INVALID
        }
    }
}

/// # OSPF
///
/// Builds the `ospf` overlay from `layer3`:
///
/// 1. Physical interfaces get a cost of `1`.
/// 2. The area of every router is read from `ospf_area` of `input`. Missing or invalid areas are
///    replaced by area `0` (written as `"0.0.0.0"` if any router uses this notation).
/// 3. Links get the area as described in [`link_area`], and a cost of `1` unless `ospf_cost` is
///    set on the `input` link.
/// 4. Routers are classified as `backbone`, `internal`, `backbone ABR` or `INVALID`, and get the
///    list of their link areas in `areas`.
/// 5. Link cost, area and `multipoint` are copied to the bound interfaces. The loopback zero gets
///    the area of the router, and a cost of `0`. The `process_id` is the AS number.
pub fn build_ospf(model: &mut NetworkModel) -> Result<(), Error> {
    if !populate(model, "ospf", "ospf")? {
        return Ok(());
    }
    remove_inter_as_links(&mut model.overlay_mut("ospf")?);
    copy_node_attr_from(model, INPUT, "ospf", "ospf_area", Some("area"), None, None, None)?;
    copy_edge_attr_from(model, INPUT, "ospf", "ospf_cost", Some("cost"), None, Some(ValueType::Int), None)?;

    let mut g = model.overlay_mut("ospf")?;

    let physical: Vec<InterfaceRef> =
        g.view().nodes().iter().flat_map(|n| n.physical_interfaces()).map(|i| i.to_ref()).collect();
    for interface in physical.iter() {
        g.set_interface_attr(interface, "cost", 1)?;
    }

    // router areas
    let areas: Vec<(NodeRef, AttrValue)> = {
        let view = g.view();
        let default = if view.nodes().iter().any(|n| n.get("area").map(|a| *a == "0.0.0.0").unwrap_or(false)) {
            AttrValue::from("0.0.0.0")
        } else {
            AttrValue::from(0)
        };
        view.nodes()
            .iter()
            .map(|n| {
                let r = n.to_ref();
                let area = normalize_area(&r, n.get("area"), &default);
                (r, area)
            })
            .collect()
    };
    for (node, area) in areas.iter() {
        g.set_node_attr(node, "area", area.clone())?;
    }

    // link areas and costs
    let links: Vec<(EdgeRef, Option<AttrValue>, bool)> = g
        .view()
        .edges()
        .iter()
        .map(|e| {
            let area = match (e.src().get("area"), e.dst().get("area")) {
                (Some(s), Some(d)) => link_area(s, d),
                _ => None,
            };
            (e.to_ref(), area, e.get("cost").map(|c| c.is_truthy()).unwrap_or(false))
        })
        .collect();
    for (edge, area, has_cost) in links {
        if let Some(area) = area {
            g.set_edge_attr(&edge, "area", area)?;
        }
        if !has_cost {
            g.set_edge_attr(&edge, "cost", 1)?;
        }
    }

    // router types
    let types: Vec<(NodeRef, Vec<AttrValue>, &str)> = {
        let view = g.view();
        view.nodes()
            .iter()
            .map(|n| {
                let mut link_areas: Vec<AttrValue> = Vec::new();
                for area in n.edges().iter().filter_map(|e| e.get("area")) {
                    if !link_areas.contains(area) {
                        link_areas.push(area.clone());
                    }
                }
                let r = n.to_ref();
                let area = n.get("area").cloned().unwrap_or_else(|| AttrValue::from(0));
                let t = router_type(&r, &link_areas, &area);
                (r, link_areas, t)
            })
            .collect()
    };
    let uses_int = types.iter().any(|(_, a, _)| a.iter().any(|x| matches!(x, AttrValue::Int(0))));
    let uses_ip = types.iter().any(|(_, a, _)| a.iter().any(|x| *x == "0.0.0.0"));
    if uses_int && uses_ip {
        warn!("Using both area 0 and area 0.0.0.0");
    }
    for (node, link_areas, t) in types {
        g.set_node_attr(&node, "areas", link_areas)?;
        g.set_node_attr(&node, "type", t)?;
    }

    edge_attr_to_interfaces(&mut g, &["cost", "area", "multipoint"])?;

    for (node, area) in areas {
        let asn = g.view().node(&node).and_then(|n| n.get("asn").cloned());
        let lo = InterfaceRef::new("ospf", node.id.clone(), 0);
        g.set_interface_attr(&lo, "area", area)?;
        g.set_interface_attr(&lo, "cost", 0)?;
        if let Some(asn) = asn {
            g.set_node_attr(&node, "process_id", asn)?;
        }
    }
    Ok(())
}

/// Shared builder of the metric based protocols (EIGRP, IS-IS and RIP): inter-AS links are
/// removed, every link (and its interfaces) gets a `metric` of `1`, and the `process_id` of every
/// node is its AS number.
fn build_metric_igp(
    model: &mut NetworkModel,
    name: &str,
    igp: &str,
    merge_switches: bool,
) -> Result<(), Error> {
    if !populate(model, name, igp)? {
        return Ok(());
    }
    let mut g = model.overlay_mut(name)?;

    if merge_switches {
        let switches = g.view().switches().to_refs();
        aggregate_nodes(&mut g, &switches)?;
        let switches = g.view().switches().to_refs();
        let exploded = explode_nodes(&mut g, &switches, &[])?;
        mark_multipoint(&mut g, &exploded)?;
    }
    remove_inter_as_links(&mut g);

    let asns: Vec<(NodeRef, Option<AttrValue>)> =
        g.view().nodes().iter().map(|n| (n.to_ref(), n.get("asn").cloned())).collect();
    for (node, asn) in asns {
        if let Some(asn) = asn {
            g.set_node_attr(&node, "process_id", asn)?;
        }
    }
    let links = g.view().edge_refs();
    for edge in links.iter() {
        g.set_edge_attr(edge, "metric", 1)?;
    }
    edge_attr_to_interfaces(&mut g, &["metric", "multipoint"])
}

/// Build the `eigrp` overlay for nodes with `igp = "eigrp"`. Switches left in the topology are
/// aggregated and exploded.
pub fn build_eigrp(model: &mut NetworkModel) -> Result<(), Error> {
    build_metric_igp(model, "eigrp", "eigrp", true)
}

/// Build the `isis` overlay for nodes with `igp = "isis"`.
pub fn build_isis(model: &mut NetworkModel) -> Result<(), Error> {
    build_metric_igp(model, "isis", "isis", false)
}

/// Build the `rip` overlay for nodes with `igp = "rip-v2"`.
pub fn build_rip(model: &mut NetworkModel) -> Result<(), Error> {
    build_metric_igp(model, "rip", "rip-v2", false)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn areas() {
        let r = NodeRef::new("ospf", "r1");
        let zero = AttrValue::from(0);
        assert_eq!(normalize_area(&r, None, &zero), zero);
        assert_eq!(normalize_area(&r, Some(&"None".into()), &zero), zero);
        assert_eq!(normalize_area(&r, Some(&"12".into()), &zero), AttrValue::Int(12));
        assert_eq!(normalize_area(&r, Some(&"0.0.0.1".into()), &zero), AttrValue::from("0.0.0.1"));
        assert_eq!(normalize_area(&r, Some(&"backbone".into()), &zero), zero);
    }

    #[test]
    fn link_areas() {
        let (a0, a1, a2) = (AttrValue::from(0), AttrValue::from(1), AttrValue::from(2));
        assert_eq!(link_area(&a1, &a1), Some(a1.clone()));
        assert_eq!(link_area(&a0, &a1), Some(a1.clone()));
        assert_eq!(link_area(&a2, &a0), Some(a2.clone()));
        assert_eq!(link_area(&a1, &a2), None);
    }

    #[test]
    fn router_types() {
        let r = NodeRef::new("ospf", "r1");
        let (a0, a1, a2) = (AttrValue::from(0), AttrValue::from(1), AttrValue::from(2));
        assert_eq!(router_type(&r, &[], &a1), BACKBONE);
        assert_eq!(router_type(&r, &[a0.clone()], &a0), BACKBONE);
        assert_eq!(router_type(&r, &[a1.clone()], &a1), INTERNAL);
        assert_eq!(router_type(&r, &[a0.clone(), a1.clone()], &a1), BACKBONE_ABR);
        assert_eq!(router_type(&r, &[a1.clone(), a2.clone()], &a0), BACKBONE_ABR);
        assert_eq!(router_type(&r, &[a1, a2.clone()], &a2), INVALID);
    }
}
