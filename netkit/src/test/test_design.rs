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

//! Test the design builders on the example networks.

use super::init_logging;
use crate::design::*;
use crate::example_networks::*;
use crate::model::{AttrValue, Attributes, NetworkModel, Overlay, INPUT, PHY};
use maplit::btreemap;

fn build<T: ExampleNetwork>() -> NetworkModel {
    init_logging();
    let mut model = T::model();
    build_network(&mut model).unwrap();
    model
}

fn size(g: &Overlay) -> (usize, usize) {
    (g.len(), g.edge_count())
}

fn sizes(model: &NetworkModel, names: &[&str]) -> Vec<(usize, usize)> {
    names.iter().map(|n| size(&model.overlay(n).unwrap())).collect()
}

#[test]
fn housenet_layers() {
    let model = build::<HouseNet>();
    assert_eq!(
        sizes(&model, &["phy", "layer1", "layer1_conn", "layer2", "layer2_conn", "layer2_bc", "layer3"]),
        vec![(5, 6), (11, 12), (5, 6), (11, 12), (5, 6), (11, 12), (5, 6)]
    );

    let l1 = model.overlay("layer1").unwrap();
    let mut domains: Vec<String> = l1.nodes_with("collision_domain").iter().map(|n| n.to_string()).collect();
    domains.sort();
    assert_eq!(domains, vec!["cd_r1_r2", "cd_r1_r3", "cd_r2_r3", "cd_r2_r4", "cd_r3_r5", "cd_r4_r5"]);
    let cd = l1.node("cd_r2_r4").unwrap();
    assert_eq!(cd.device_type(), Some("collision_domain"));
    assert_eq!(cd.asn(), Some(1));
    assert_eq!(cd.get("x"), Some(&AttrValue::Float(150.1)));
    assert_eq!(cd.get("y"), Some(&AttrValue::Float(0.1)));
    assert_eq!(cd.physical_interfaces().len(), 2);
    assert!(l1.edges().iter().all(|e| e.get("split") == Some(&AttrValue::Bool(true))));

    // collision domains are replaced by multipoint links
    let conn = model.overlay("layer1_conn").unwrap();
    assert!(conn.edges().iter().all(|e| e.get("multipoint").map(|m| m.is_truthy()).unwrap_or(false)));
    assert!(conn.has_edge("r2", "r4"));

    let l2 = model.overlay("layer2").unwrap();
    assert_eq!(l2.nodes_with("broadcast_domain").len(), 6);
    assert_eq!(l2.node("cd_r3_r5").unwrap().device_type(), Some("broadcast_domain"));
    assert_eq!(model.overlay("layer2_bc").unwrap().nodes_with("broadcast_domain").len(), 6);

    // interfaces of phy survive all transformations
    let l3 = model.overlay("layer3").unwrap();
    let e = l3.edge("r2", "r4").unwrap();
    assert_eq!(e.src_int().unwrap().description(), Some("r2 to r4"));
    assert_eq!(e.dst_int().unwrap().description(), Some("r4 to r2"));
    assert!(check_layer2(&model).unwrap().is_empty());
}

#[test]
fn housenet_routing() {
    let model = build::<HouseNet>();
    assert_eq!(sizes(&model, &["ospf", "igp", "ebgp", "bgp"]), vec![(5, 4), (5, 4), (5, 4), (5, 12)]);
    for name in &["eigrp", "isis", "rip"] {
        assert!(model.overlay(name).unwrap().is_empty());
    }

    let ospf = model.overlay("ospf").unwrap();
    assert!(!ospf.has_edge("r2", "r4"));
    for node in ospf.nodes() {
        assert_eq!(node.get("area"), Some(&AttrValue::Int(0)));
        assert_eq!(node.get("type"), Some(&AttrValue::from("backbone")));
        assert_eq!(node.get("process_id"), node.get("asn"));
        assert_eq!(node.loopback_zero().get("cost"), Some(&AttrValue::Int(0)));
    }
    assert_eq!(ospf.node("r1").unwrap().get("areas"), Some(&AttrValue::from(vec![0])));
    let e = ospf.edge("r1", "r2").unwrap();
    assert_eq!(e.get("cost"), Some(&AttrValue::Int(1)));
    assert_eq!(e.get("area"), Some(&AttrValue::Int(0)));
    assert_eq!(e.src_int().unwrap().get("area"), Some(&AttrValue::Int(0)));
    assert_eq!(e.src_int().unwrap().get("cost"), Some(&AttrValue::Int(1)));

    let igp = model.overlay("igp").unwrap();
    assert!(igp.nodes().iter().all(|n| n.get("igp") == Some(&AttrValue::from("ospf"))));

    let ebgp = model.overlay("ebgp").unwrap();
    assert!(ebgp.is_directed());
    assert!(ebgp.has_edge("r2", "r4") && ebgp.has_edge("r4", "r2"));
    assert!(ebgp.has_edge("r3", "r5") && ebgp.has_edge("r5", "r3"));

    let bgp = model.overlay("bgp").unwrap();
    assert_eq!(bgp.edges_where(&[("type", "ebgp".into())]).len(), 4);
    assert_eq!(bgp.edges_where(&[("type", "ibgp".into())]).len(), 8);
    assert_eq!(bgp.edges_where(&[("direction", "over".into())]).len(), 8);
    let session = bgp.edge("r1", "r3").unwrap();
    assert_eq!(session.src_int().unwrap().id(), 0);
    assert_eq!(session.dst_int().unwrap().id(), 0);
    assert!(!bgp.has_edge("r1", "r4"));

    assert_eq!(bgp.node("r2").unwrap().get("ebgp"), Some(&AttrValue::Bool(true)));
    assert_eq!(bgp.node("r1").unwrap().get("ebgp"), None);
    assert_eq!(bgp.node("r1").unwrap().get("ibgp_role"), Some(&AttrValue::from("Peer")));
    let r2_ebgp = bgp.edge("r2", "r4").unwrap().src_int().unwrap();
    assert_eq!(r2_ebgp.description(), Some("r2 to r4"));
    assert_eq!(r2_ebgp.get("ebgp"), Some(&AttrValue::Bool(true)));
    assert_eq!(r2_ebgp.get("multipoint"), Some(&AttrValue::Bool(false)));
}

#[test]
fn mixednet() {
    let model = build::<MixedNet>();
    assert!(check_layer2(&model).unwrap().is_empty());
    assert_eq!(model.overlay(PHY).unwrap().node("sw1").unwrap().get("broadcast_domain"), Some(&AttrValue::Bool(true)));
    assert_eq!(sizes(&model, &["layer2_conn", "layer2_bc"]), vec![(5, 6), (9, 10)]);

    // the switch is exploded in layer 3
    let l3 = model.overlay("layer3").unwrap();
    assert_eq!(size(&l3), (4, 4));
    assert!(!l3.contains("sw1"));
    assert!(l3.contains("s1"));
    let e = l3.edge("r1", "r2").unwrap();
    assert_eq!(e.get("multipoint"), Some(&AttrValue::Bool(true)));
    assert_eq!(e.src_int().unwrap().get("multipoint"), Some(&AttrValue::Bool(true)));

    // servers do not run an IGP, nor BGP
    let ospf = model.overlay("ospf").unwrap();
    assert_eq!(size(&ospf), (3, 3));
    assert!(!ospf.contains("s1"));
    assert_eq!(size(&model.overlay("ebgp").unwrap()), (3, 0));
    assert_eq!(size(&model.overlay("bgp").unwrap()), (3, 6));
}

#[test]
fn multiedgenet() {
    let model = build::<MultiEdgeNet>();
    let l1 = model.overlay("layer1").unwrap();
    assert!(l1.is_multigraph());
    let mut domains: Vec<String> = l1.nodes_with("collision_domain").iter().map(|n| n.to_string()).collect();
    domains.sort();
    assert_eq!(domains, vec!["cd_r1_r2_0", "cd_r1_r2_1", "cd_r2_r3_0"]);

    let l3 = model.overlay("layer3").unwrap();
    assert!(l3.is_multigraph());
    assert_eq!(size(&l3), (3, 3));
    let parallel = l3.edges_filtered(Some(&["r1"][..]), Some(&["r2"][..]), &[]);
    assert_eq!(parallel.len(), 2);
    assert_ne!(parallel[0].src_int(), parallel[1].src_int());

    // protocol overlays are simple graphs
    let ospf = model.overlay("ospf").unwrap();
    assert!(!ospf.is_multigraph());
    assert_eq!(size(&ospf), (3, 2));
}

#[test]
fn multiasnet() {
    let model = build::<MultiAsNet>();
    assert_eq!(
        sizes(&model, &["layer3", "ospf", "isis", "eigrp", "rip", "igp", "ebgp", "bgp"]),
        vec![(10, 10), (4, 3), (3, 3), (3, 2), (0, 0), (10, 8), (10, 4), (10, 20)]
    );
    let igp = model.overlay("igp").unwrap();
    assert_eq!(igp.node("r5").unwrap().get("igp"), Some(&AttrValue::from("isis")));
    assert_eq!(igp.node("r9").unwrap().get("igp"), Some(&AttrValue::from("eigrp")));
    assert_eq!(igp.edge("r8", "r9").unwrap().get("igp"), Some(&AttrValue::from("eigrp")));
    assert!(!igp.has_edge("r7", "r8"));

    let isis = model.overlay("isis").unwrap();
    assert_eq!(isis.node("r6").unwrap().get("process_id"), Some(&AttrValue::Int(2)));
    let e = isis.edge("r5", "r6").unwrap();
    assert_eq!(e.get("metric"), Some(&AttrValue::Int(1)));
    assert_eq!(e.dst_int().unwrap().get("metric"), Some(&AttrValue::Int(1)));

    let bgp = model.overlay("bgp").unwrap();
    let direction = |src: &str, dst: &str| bgp.edge(src, dst).and_then(|e| e.get("direction").cloned());
    // AS 1: route reflection
    for client in &["r2", "r3", "r4"] {
        assert_eq!(direction("r1", *client), Some(AttrValue::from("down")));
        assert_eq!(direction(*client, "r1"), Some(AttrValue::from("up")));
    }
    assert!(!bgp.has_edge("r2", "r3"));
    // AS 2: full mesh
    assert_eq!(direction("r5", "r7"), Some(AttrValue::from("over")));
    assert_eq!(direction("r7", "r6"), Some(AttrValue::from("over")));
    // AS 3: hierarchical route reflection
    assert_eq!(direction("r8", "r9"), Some(AttrValue::from("down")));
    assert_eq!(direction("r9", "r8"), Some(AttrValue::from("up")));
    assert_eq!(direction("r9", "r10"), Some(AttrValue::from("down")));
    assert_eq!(direction("r10", "r9"), Some(AttrValue::from("up")));
    assert!(!bgp.has_edge("r8", "r10"));
    // eBGP
    assert_eq!(bgp.edge("r7", "r8").unwrap().get("type"), Some(&AttrValue::from("ebgp")));
    assert_eq!(bgp.node("r8").unwrap().get("rr_cluster"), Some(&AttrValue::from("c3")));
    assert_eq!(bgp.node("r10").unwrap().get("hrr_cluster"), Some(&AttrValue::from("h9")));
}

#[test]
fn routing_disabled() {
    init_logging();
    let mut model = HouseNet::model();
    model.overlay_mut(PHY).unwrap().set_data("enable_routing", false).unwrap();
    build_network(&mut model).unwrap();
    assert_eq!(size(&model.overlay("layer3").unwrap()), (5, 6));
    assert!(model.overlay("ospf").unwrap().is_empty());
    assert!(model.overlay("igp").unwrap().is_empty());
    assert!(!model.has_overlay("ebgp"));
    assert!(!model.has_overlay("bgp"));
}

/// # Layer 2 check network
///
/// ```text
///   a (AS 1)   b (AS 1)   c (AS 2)
///       \         |         /
///        \------ sw -------/
/// ```
#[test]
fn layer2_warnings() {
    init_logging();
    let mut model = NetworkModel::new();
    let mut input = model.overlay_mut(INPUT).unwrap();
    for (id, asn) in &[("a", 1), ("b", 1), ("c", 2)] {
        input
            .create_node(
                *id,
                btreemap! {
                    "device_type".to_string() => AttrValue::from("router"),
                    "asn".to_string() => AttrValue::from(*asn),
                },
            )
            .unwrap();
    }
    input.create_node("sw", btreemap! {"device_type".to_string() => AttrValue::from("switch")}).unwrap();
    for id in &["a", "b", "c"] {
        input.add_edge("sw", *id, Attributes::new()).unwrap();
    }
    build_network(&mut model).unwrap();

    let warnings = check_layer2(&model).unwrap();
    assert_eq!(warnings, vec!["Switch sw contains both IGP and eBGP neighbors".to_string()]);

    // the switch becomes a full mesh in layer 3, and carries one eBGP session per direction
    let l3 = model.overlay("layer3").unwrap();
    assert_eq!(size(&l3), (3, 3));
    assert_eq!(size(&model.overlay("ebgp").unwrap()), (3, 4));
}
