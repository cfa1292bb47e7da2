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

//! Test the overlays of the model and the construction API.

use super::init_logging;
use crate::design::build_phy;
use crate::model::{
    natural_cmp, AttrValue, Attributes, Diagnostic, ModelConfig, NetworkModel, NodeLookup, NodeRef,
    INPUT, PHY,
};
use crate::Error;
use lazy_static::lazy_static;
use maplit::btreemap;
use std::cmp::Ordering;

lazy_static! {
    static ref AS1: Attributes = btreemap! {"asn".to_string() => AttrValue::from(1)};
    static ref AS2: Attributes = btreemap! {"asn".to_string() => AttrValue::from(2)};
}

/// # Test network
///
/// ```text
/// a ---- b ---- c      AS 1: a, b, d
///        |             AS 2: c
///        d
/// ```
fn get_test_model() -> NetworkModel {
    init_logging();
    let mut model = NetworkModel::new();
    let mut input = model.overlay_mut(INPUT).unwrap();
    input.create_node("a", AS1.clone()).unwrap();
    input.create_node("b", AS1.clone()).unwrap();
    input.create_node("c", AS2.clone()).unwrap();
    input.create_node("d", AS1.clone()).unwrap();
    input.add_edge("a", "b", Attributes::new()).unwrap();
    input.add_edge("b", "c", Attributes::new()).unwrap();
    input.add_edge("b", "d", Attributes::new()).unwrap();
    build_phy(&mut model).unwrap();
    model
}

#[test]
fn default_overlays() {
    let model = NetworkModel::new();
    assert_eq!(model.overlay_names(), vec![INPUT, PHY]);
    assert!(model.overlay(PHY).unwrap().is_empty());
    assert!(!model.overlay(INPUT).unwrap().is_directed());
    assert_eq!(model.overlay("ospf").unwrap_err(), Error::OverlayNotFound("ospf".to_string()));
}

#[test]
fn add_overlay_twice() {
    let mut model = NetworkModel::new();
    model.add_overlay("ospf", false, false).unwrap();
    assert_eq!(
        model.add_overlay("ospf", true, false).unwrap_err(),
        Error::OverlayExists("ospf".to_string())
    );
    assert_eq!(model.overlay_names(), vec![INPUT, PHY, "ospf"]);
    assert!(!model.overlay("ospf").unwrap().is_directed());
}

#[test]
fn reserved_attributes() {
    let mut model = get_test_model();
    let mut phy = model.overlay_mut(PHY).unwrap();
    let attrs = btreemap! {"_ports".to_string() => AttrValue::from(1)};
    assert_eq!(phy.create_node("x", attrs).unwrap_err(), Error::ReservedAttribute("_ports".to_string()));
    assert!(phy.set_node_attr("a", "_interfaces", 1).is_err());
    assert!(!phy.view().contains("x"));
}

#[test]
fn phy_is_built_from_input() {
    let model = get_test_model();
    let phy = model.overlay(PHY).unwrap();
    assert_eq!(phy.len(), 4);
    assert_eq!(phy.edge_count(), 3);
    assert_eq!(phy.node("c").unwrap().asn(), Some(2));
    assert!(phy.data().get("enable_routing").unwrap().is_truthy());
    // loopback zero and one interface per edge
    assert_eq!(phy.node("b").unwrap().interfaces().len(), 4);
    assert_eq!(phy.node("a").unwrap().interfaces().len(), 2);
}

#[test]
fn node_identity_and_order() {
    let model = get_test_model();
    let phy = model.overlay(PHY).unwrap();
    let input = model.overlay(INPUT).unwrap();
    assert_eq!(phy.node("a").unwrap(), input.node("a").unwrap());
    assert_ne!(phy.node("a").unwrap(), phy.node("b").unwrap());

    // ordered by asn first, then by label
    let mut nodes = phy.nodes();
    nodes.sort();
    assert_eq!(nodes, vec!["a", "b", "d", "c"]);
    assert_eq!(phy.node("c").unwrap().fqdn(), "c.2");
}

#[test]
fn attribute_fallthrough() {
    let mut model = get_test_model();
    let refs = model.overlay(PHY).unwrap().node_refs();
    let mut phy = model.overlay_mut(PHY).unwrap();
    phy.set_node_attr("c", "device_type", "router").unwrap();
    phy.set_node_attr("c", "color", "red").unwrap();
    model.add_overlay("ospf", false, false).unwrap().copy_nodes_from(&refs, Attributes::new()).unwrap();

    let ospf = model.overlay("ospf").unwrap();
    let c = ospf.node("c").unwrap();
    assert!(c.attrs().is_empty());
    assert_eq!(c.asn(), Some(2));
    assert!(c.is_router());
    assert_eq!(c.get("color"), None);
    assert_eq!(ospf.routers(), vec!["c"]);

    // local values shadow phy
    let mut ospf = model.overlay_mut("ospf").unwrap();
    ospf.set_node_attr("c", "asn", 3).unwrap();
    assert_eq!(ospf.view().node("c").unwrap().asn(), Some(3));
    assert_eq!(model.overlay(PHY).unwrap().node("c").unwrap().asn(), Some(2));
}

#[test]
fn skipped_edges_are_recorded() {
    let mut model = get_test_model();
    let mut g = model.add_overlay("ospf", false, false).unwrap();
    g.create_node("a", Attributes::new()).unwrap();
    assert_eq!(g.add_edge("a", "b", Attributes::new()).unwrap(), None);
    assert_eq!(
        g.view().diagnostics(),
        &[Diagnostic::EdgeSkipped { src: "a".into(), dst: "b".into() }]
    );
    assert_eq!(g.take_diagnostics().len(), 1);
    assert!(g.view().diagnostics().is_empty());
    assert_eq!(g.view().edge_count(), 0);
}

#[test]
fn strict_edges() {
    let mut model = NetworkModel::with_config(ModelConfig { strict_edges: true, ..Default::default() });
    let mut input = model.overlay_mut(INPUT).unwrap();
    input.create_node("a", Attributes::new()).unwrap();
    assert_eq!(
        input.add_edge("a", "b", Attributes::new()).unwrap_err(),
        Error::MissingEndpoint { overlay: INPUT.to_string(), src: "a".to_string(), dst: "b".to_string() }
    );
}

#[test]
fn multigraph_keys() {
    let mut model = NetworkModel::new();
    let mut g = model.add_overlay("multi", false, true).unwrap();
    g.create_nodes_from(&["a", "b"], Attributes::new()).unwrap();
    let e0 = g.add_edge("a", "b", Attributes::new()).unwrap().unwrap();
    let e1 = g.add_edge("b", "a", Attributes::new()).unwrap().unwrap();
    assert_eq!((e0.key, e1.key), (0, 1));
    assert_eq!(g.view().edge_count(), 2);
    assert!(g.view().edge_with_key("a", "b", 1).is_some());
    assert!(g.view().edge("a", "b").unwrap().is_parallel());

    // copying keeps the key, and copying twice does not duplicate the edge
    let nodes = g.view().node_refs();
    let mut copy = model.add_overlay("copy", false, true).unwrap();
    copy.copy_nodes_from(&nodes, Attributes::new()).unwrap();
    copy.copy_edge(&e1, false, Attributes::new()).unwrap();
    copy.copy_edge(&e1, false, Attributes::new()).unwrap();
    assert_eq!(copy.view().edge_count(), 1);
    assert_eq!(copy.view().edges()[0].key(), 1);
}

#[test]
fn simple_graph_updates_edges() {
    let mut model = get_test_model();
    let mut phy = model.overlay_mut(PHY).unwrap();
    let e = phy.add_edge("b", "a", btreemap! {"speed".to_string() => AttrValue::from(10)}).unwrap();
    assert_eq!(e.unwrap(), ("b", "a"));
    let phy = model.overlay(PHY).unwrap();
    assert_eq!(phy.edge_count(), 3);
    assert_eq!(phy.edge("a", "b").unwrap().get("speed"), Some(&AttrValue::Int(10)));
}

#[test]
fn directed_overlay() {
    let mut model = get_test_model();
    let nodes = model.overlay(PHY).unwrap().node_refs();
    let mut g = model.add_overlay("bgp", true, false).unwrap();
    g.copy_nodes_from(&nodes, Attributes::new()).unwrap();
    g.add_edge("a", "b", Attributes::new()).unwrap();
    let bgp = g.view();
    assert!(bgp.has_edge("a", "b"));
    assert!(!bgp.has_edge("b", "a"));
    assert_eq!(bgp.node("a").unwrap().neighbors(), vec!["b"]);
    assert!(bgp.node("b").unwrap().neighbors().is_empty());
    assert_eq!(bgp.node("b").unwrap().in_edges(), vec![("a", "b")]);
    assert_eq!(bgp.node("b").unwrap().degree(), 1);
}

#[test]
fn queries() {
    let mut model = get_test_model();
    let mut phy = model.overlay_mut(PHY).unwrap();
    phy.set_node_attr("a", "label", "Alpha").unwrap();
    let edge = phy.view().edge("b", "c").unwrap().to_ref();
    phy.set_edge_attr(&edge, "ebgp", true).unwrap();

    let phy = model.overlay(PHY).unwrap();
    let from_b = phy.edges_filtered(Some(&["b"][..]), None, &[]);
    assert_eq!(from_b.len(), 3);
    assert!(from_b.iter().all(|e| e.src() == "b"));
    assert_eq!(phy.edges_filtered(Some(&["b"][..]), Some(&["a", "d"][..]), &[]).len(), 2);
    assert_eq!(phy.edges_where(&[("ebgp", true.into())]), vec![("b", "c")]);
    assert_eq!(phy.nodes_where(&[("asn", 1.into())]), vec!["a", "b", "d"]);

    let groups = phy.groupby("asn", None);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, Some(AttrValue::Int(1)));
    assert_eq!(groups[0].1, vec!["a", "b", "d"]);
    assert_eq!(groups[1].1, vec!["c"]);
    assert_eq!(phy.unique_attr("asn"), vec![AttrValue::Int(1), AttrValue::Int(2)]);

    assert_eq!(phy.lookup_node(&NodeLookup::Label("Alpha".to_string())).unwrap(), "a");
    assert!(phy.lookup_node(&NodeLookup::Label("a".to_string())).is_none());

    let sub = phy.subgraph(&["a", "b", "c", "x"]);
    assert_eq!(sub.len(), 3);
    assert_eq!(sub.edges().len(), 2);
}

#[test]
fn remove_nodes_and_edges() {
    let mut model = get_test_model();
    let mut phy = model.overlay_mut(PHY).unwrap();
    assert!(phy.remove_node("b"));
    assert!(!phy.remove_node("b"));
    assert_eq!(phy.view().edge_count(), 0);
    assert_eq!(phy.view().nodes(), vec!["a", "c", "d"]);
    assert_eq!(phy.view().diagnostics(), &[Diagnostic::NodeNotFound("b".into())]);
    // input is untouched
    assert_eq!(model.overlay(INPUT).unwrap().edge_count(), 3);
}

#[test]
fn label_order_is_total() {
    let numbers = [1, 2, 5, 9, 10, 12];
    let mut labels: Vec<String> = Vec::new();
    for x in numbers.iter() {
        labels.push(format!("a{}", x));
        labels.push(format!("a{}c", x));
        for y in numbers.iter() {
            labels.push(format!("a{}b{}", x, y));
        }
    }
    for a in labels.iter() {
        for b in labels.iter() {
            assert_eq!(natural_cmp(a, b), natural_cmp(b, a).reverse());
            for c in labels.iter() {
                if natural_cmp(a, b) != Ordering::Greater && natural_cmp(b, c) != Ordering::Greater {
                    assert_ne!(natural_cmp(a, c), Ordering::Greater, "{} {} {}", a, b, c);
                }
            }
        }
    }

    let mut nodes: Vec<NodeRef> = ["a10", "a9b9", "a5", "a10b1", "a2c", "a2"]
        .iter()
        .map(|id| NodeRef::new(PHY, *id))
        .collect();
    nodes.sort();
    assert_eq!(nodes, vec!["a10b1", "a2c", "a9b9", "a2", "a5", "a10"]);
}
