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

//! HouseNet

use super::{links, router, ExampleNetwork};
use crate::design::build_phy;
use crate::model::{NetworkModel, INPUT};

/// # HouseNet
///
/// Five OSPF routers in two ASes, `r1` to `r3` in AS 1, and `r4` and `r5` in AS 2.
///
/// ```text
///  r1 ------ r2 ------ r4
///   \        |         |
///    \       |         |     AS 1: r1, r2, r3
///     \----- r3 ------ r5    AS 2: r4, r5
/// ```
#[derive(Debug)]
pub struct HouseNet;

impl ExampleNetwork for HouseNet {
    fn model() -> NetworkModel {
        let mut model = NetworkModel::new();
        let mut input = model.overlay_mut(INPUT).unwrap();

        router(&mut input, "r1", 1, (0, 0));
        router(&mut input, "r2", 1, (100, 0));
        router(&mut input, "r3", 1, (100, 100));
        router(&mut input, "r4", 2, (200, 0));
        router(&mut input, "r5", 2, (200, 100));

        links(
            &mut input,
            &[("r1", "r2"), ("r1", "r3"), ("r2", "r3"), ("r2", "r4"), ("r3", "r5"), ("r4", "r5")],
        );
        input.set_data("enable_routing", true).unwrap();

        build_phy(&mut model).unwrap();
        model
    }
}
