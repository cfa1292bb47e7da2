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

//! Test copying attributes between overlays, and the neighbor aggregations.

use super::init_logging;
use crate::design::build_phy;
use crate::model::{AttrValue, Attributes, EdgeRef, NetworkModel, NodeRef, ValueType, INPUT, PHY};
use crate::propagate::*;
use crate::Error;
use assert_approx_eq::assert_approx_eq;
use maplit::btreemap;

/// # Test network
///
/// ```text
/// a ---- b ---- c      AS 1: a, b, d (ospf)
///        |             AS 2: c (isis)
///        d
/// ```
///
/// The overlay `ospf` contains `a`, `b` and `d`, and all edges between them. The edge `a-b` has
/// cost `5`, and `b-d` has cost `"7"` on the input.
fn get_test_model() -> NetworkModel {
    init_logging();
    let mut model = NetworkModel::new();
    let mut input = model.overlay_mut(INPUT).unwrap();
    input
        .create_node(
            "a",
            btreemap! {
                "asn".to_string() => AttrValue::from(1),
                "x".to_string() => AttrValue::from("10"),
                "igp".to_string() => AttrValue::from("ospf"),
                "ospf_area".to_string() => AttrValue::from("0"),
                "role".to_string() => AttrValue::from("rr"),
            },
        )
        .unwrap();
    input
        .create_node(
            "b",
            btreemap! {
                "asn".to_string() => AttrValue::from(1),
                "x".to_string() => AttrValue::from(20),
                "igp".to_string() => AttrValue::from("ospf"),
                "ospf_area".to_string() => AttrValue::from(1),
            },
        )
        .unwrap();
    input
        .create_node(
            "c",
            btreemap! {
                "asn".to_string() => AttrValue::from(2),
                "x".to_string() => AttrValue::from(40),
                "igp".to_string() => AttrValue::from("isis"),
            },
        )
        .unwrap();
    input
        .create_node(
            "d",
            btreemap! {
                "asn".to_string() => AttrValue::from(1),
                "x".to_string() => AttrValue::from(40),
                "igp".to_string() => AttrValue::from("ospf"),
            },
        )
        .unwrap();
    input.add_edge("a", "b", btreemap! {"cost".to_string() => AttrValue::from(5)}).unwrap();
    input.add_edge("b", "c", Attributes::new()).unwrap();
    input.add_edge("b", "d", btreemap! {"cost".to_string() => AttrValue::from("7")}).unwrap();
    build_phy(&mut model).unwrap();

    let (nodes, edges) = {
        let phy = model.overlay(PHY).unwrap();
        let nodes: Vec<NodeRef> = phy.node_refs().into_iter().filter(|n| n.id != "c").collect();
        (nodes, phy.edge_refs())
    };
    let mut ospf = model.add_overlay("ospf", false, false).unwrap();
    ospf.copy_nodes_from(&nodes, Attributes::new()).unwrap();
    ospf.copy_edges_from(&edges, false, Attributes::new()).unwrap();
    model
}

#[test]
fn copy_node_attributes() {
    let mut model = get_test_model();
    copy_node_attr_from(&mut model, INPUT, "ospf", "ospf_area", Some("area"), None, Some(ValueType::Int), None)
        .unwrap();
    {
        let ospf = model.overlay("ospf").unwrap();
        assert_eq!(ospf.node("a").unwrap().get("area"), Some(&AttrValue::Int(0)));
        assert_eq!(ospf.node("b").unwrap().get("area"), Some(&AttrValue::Int(1)));
        assert_eq!(ospf.node("d").unwrap().get("area"), None);
        // nodes are never created
        assert!(!ospf.contains("c"));
        assert_eq!(ospf.node("a").unwrap().get("ospf_area"), None);
    }

    let d = [NodeRef::new(INPUT, "d")];
    copy_node_attr_from(&mut model, INPUT, "ospf", "ospf_area", Some("area"), Some(&d[..]), None, Some(5.into()))
        .unwrap();
    let ospf = model.overlay("ospf").unwrap();
    assert_eq!(ospf.node("d").unwrap().get("area"), Some(&AttrValue::Int(5)));
    assert_eq!(ospf.node("b").unwrap().get("area"), Some(&AttrValue::Int(1)));
}

#[test]
fn copy_node_attributes_invalid() {
    let mut model = get_test_model();
    let result = copy_node_attr_from(&mut model, INPUT, PHY, "role", None, None, Some(ValueType::Int), None);
    match result {
        Err(Error::InvalidValue { target, .. }) => assert_eq!(target, ValueType::Int),
        r => panic!("Expected InvalidValue, got {:?}", r),
    }
    // nothing is written on failure
    assert_eq!(model.overlay(PHY).unwrap().node("a").unwrap().get("role"), None);

    assert_eq!(
        copy_node_attr_from(&mut model, INPUT, "bgp", "asn", None, None, None, None),
        Err(Error::OverlayNotFound("bgp".to_string()))
    );
}

#[test]
fn copy_edge_attributes() {
    let mut model = get_test_model();
    copy_edge_attr_from(&mut model, INPUT, "ospf", "cost", None, None, Some(ValueType::Int), Some(1.into()))
        .unwrap();
    {
        let ospf = model.overlay("ospf").unwrap();
        assert_eq!(ospf.edge_count(), 2);
        assert_eq!(ospf.edge("a", "b").unwrap().get("cost"), Some(&AttrValue::Int(5)));
        assert_eq!(ospf.edge("d", "b").unwrap().get("cost"), Some(&AttrValue::Int(7)));
        assert!(!ospf.contains("c"));
    }

    let edges = [EdgeRef::new(INPUT, "b", "a", 0)];
    copy_edge_attr_from(&mut model, INPUT, "ospf", "cost", Some("weight"), Some(&edges[..]), None, None).unwrap();
    let ospf = model.overlay("ospf").unwrap();
    assert_eq!(ospf.edge("a", "b").unwrap().get("weight"), Some(&AttrValue::Int(5)));
    assert_eq!(ospf.edge("b", "d").unwrap().get("weight"), None);
}

#[test]
fn copy_interface_attributes() {
    let mut model = get_test_model();
    let a1 = crate::model::InterfaceRef::new(PHY, "a", 1);
    model.overlay_mut(PHY).unwrap().set_interface_attr(&a1, "speed", 100).unwrap();

    copy_int_attr_from(&mut model, PHY, "ospf", "speed", None, None, None, None).unwrap();
    // descriptions are read with fallthrough to phy
    copy_int_attr_from(&mut model, "ospf", "ospf", "description", Some("name"), None, None, None).unwrap();

    let ospf = model.overlay("ospf").unwrap();
    let a = ospf.node("a").unwrap();
    assert_eq!(a.interface(1).unwrap().get_local("speed"), Some(&AttrValue::Int(100)));
    assert_eq!(a.loopback_zero().get_local("speed"), None);
    assert_eq!(ospf.node("b").unwrap().interface(1).unwrap().get_local("speed"), None);
    assert_eq!(a.interface(1).unwrap().get_local("name"), Some(&AttrValue::from("a to b")));
    assert_eq!(a.loopback_zero().get_local("name"), Some(&AttrValue::from("loopback")));
}

#[test]
fn node_defaults() {
    let mut model = get_test_model();
    copy_node_attr_from(&mut model, INPUT, "ospf", "ospf_area", Some("area"), None, Some(ValueType::Int), None)
        .unwrap();
    let defaults: Attributes = btreemap! {
        "area".to_string() => AttrValue::from(0),
        "cost".to_string() => AttrValue::from(1),
    };
    let mut ospf = model.overlay_mut("ospf").unwrap();
    set_node_default(&mut ospf, Some(&[NodeRef::new("ospf", "b")][..]), &defaults).unwrap();
    assert_eq!(ospf.view().node("b").unwrap().get("area"), Some(&AttrValue::Int(1)));
    assert_eq!(ospf.view().node("b").unwrap().get("cost"), Some(&AttrValue::Int(1)));
    assert_eq!(ospf.view().node("d").unwrap().get("cost"), None);

    set_node_default(&mut ospf, None, &defaults).unwrap();
    let ospf = model.overlay("ospf").unwrap();
    assert_eq!(ospf.node("d").unwrap().get("area"), Some(&AttrValue::Int(0)));
    assert!(ospf.nodes().iter().all(|n| n.get("cost") == Some(&AttrValue::Int(1))));
}

#[test]
fn neighbor_values() {
    let model = get_test_model();
    let phy = model.overlay(PHY).unwrap();

    match neigh_average(&phy, "b", "x", None) {
        Some(AttrValue::Float(x)) => assert_approx_eq!(x, 30.0),
        v => panic!("Expected a float, got {:?}", v),
    }
    assert_eq!(neigh_average(&phy, "b", "igp", None), Some(AttrValue::from("ospf")));
    assert_eq!(neigh_most_frequent(&phy, "b", "x", None, false), Some(AttrValue::Int(40)));
    assert_eq!(neigh_attr(&phy, "a", "x", None), vec![Some(AttrValue::Int(20))]);

    assert!(!neigh_equal(&phy, "b", "asn", None));
    assert!(neigh_equal(&phy, "c", "asn", None));
    assert!(!neigh_equal(&phy, "x", "asn", None));
    assert_eq!(neigh_average(&phy, "x", "asn", None), None);
}

#[test]
fn neighbor_values_from_other_overlay() {
    let mut model = get_test_model();
    copy_node_attr_from(&mut model, INPUT, "ospf", "ospf_area", Some("area"), None, Some(ValueType::Int), None)
        .unwrap();
    let phy = model.overlay(PHY).unwrap();
    let ospf = model.overlay("ospf").unwrap();
    // c is not part of ospf, and d has no area
    assert_eq!(neigh_attr(&phy, "b", "area", Some(&ospf)), vec![Some(AttrValue::Int(0)), None]);
    assert_eq!(neigh_most_frequent(&phy, "b", "area", Some(&ospf), false), Some(AttrValue::Int(0)));
    assert_eq!(neigh_most_frequent(&phy, "b", "area", Some(&ospf), true), None);
    assert_eq!(neigh_average(&phy, "b", "area", Some(&ospf)), None);
}
