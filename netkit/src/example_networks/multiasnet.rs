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

//! MultiAsNet

use super::{device, links, ExampleNetwork};
use crate::design::build_phy;
use crate::model::{AttrValue, Attributes, NetworkModel, INPUT};

use maplit::btreemap;

/// # MultiAsNet
///
/// Ten routers in three ASes, with different iBGP designs:
///
/// - AS 1: `r1` is a route reflector of cluster `c1`, with the clients `r2`, `r3` and `r4`.
/// - AS 2: `r5`, `r6` and `r7` form a full mesh.
/// - AS 3: `r8` is a route reflector of cluster `c3`, `r9` a hierarchical route reflector in the
///   same cluster, with its own client `r10` in the cluster `h9`.
///
/// AS 1 uses OSPF, AS 2 uses IS-IS and AS 3 uses EIGRP.
///
/// ```text
///   r2 --- r1 --- r3          r8 --- r9 --- r10
///           |                  |
///          r4 --- r5 --- r6 --- r7
///                  \___________/
/// ```
#[derive(Debug)]
pub struct MultiAsNet;

impl ExampleNetwork for MultiAsNet {
    fn model() -> NetworkModel {
        let mut model = NetworkModel::new();
        let mut input = model.overlay_mut(INPUT).unwrap();

        let ibgp = |igp: &str, role: &str, rr: Option<&str>, hrr: Option<&str>| -> Attributes {
            let mut attrs = btreemap! {
                "igp".to_string() => AttrValue::from(igp),
                "ibgp_role".to_string() => AttrValue::from(role),
            };
            if let Some(rr) = rr {
                attrs.insert("ibgp_l3_cluster".to_string(), AttrValue::from(rr));
            }
            if let Some(hrr) = hrr {
                attrs.insert("ibgp_l2_cluster".to_string(), AttrValue::from(hrr));
            }
            attrs
        };

        device(&mut input, "r1", "router", 1, (100, 0), ibgp("ospf", "RR", Some("c1"), None));
        device(&mut input, "r2", "router", 1, (0, 0), ibgp("ospf", "RRC", Some("c1"), None));
        device(&mut input, "r3", "router", 1, (200, 0), ibgp("ospf", "RRC", Some("c1"), None));
        device(&mut input, "r4", "router", 1, (100, 100), ibgp("ospf", "RRC", Some("c1"), None));
        device(&mut input, "r5", "router", 2, (200, 100), ibgp("isis", "Peer", None, None));
        device(&mut input, "r6", "router", 2, (300, 100), ibgp("isis", "Peer", None, None));
        device(&mut input, "r7", "router", 2, (400, 100), ibgp("isis", "Peer", None, None));
        device(&mut input, "r8", "router", 3, (400, 0), ibgp("eigrp", "RR", Some("c3"), None));
        device(&mut input, "r9", "router", 3, (500, 0), ibgp("eigrp", "HRR", Some("c3"), Some("h9")));
        device(&mut input, "r10", "router", 3, (600, 0), ibgp("eigrp", "RRC", None, Some("h9")));

        links(
            &mut input,
            &[
                ("r1", "r2"),
                ("r1", "r3"),
                ("r1", "r4"),
                ("r4", "r5"),
                ("r5", "r6"),
                ("r6", "r7"),
                ("r5", "r7"),
                ("r7", "r8"),
                ("r8", "r9"),
                ("r9", "r10"),
            ],
        );
        input.set_data("enable_routing", true).unwrap();

        build_phy(&mut model).unwrap();
        model
    }
}
