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

//! MixedNet

use super::{device, links, router, ExampleNetwork};
use crate::design::build_phy;
use crate::model::{Attributes, NetworkModel, INPUT};

/// # MixedNet
///
/// Three routers, a switch and a server, all in AS 1. `r1` and `r2` are connected both directly,
/// and through the switch `sw1`.
///
/// ```text
///        sw1
///       /   \
///     r1 --- r2
///       \   /
///        r3 --- s1
/// ```
#[derive(Debug)]
pub struct MixedNet;

impl ExampleNetwork for MixedNet {
    fn model() -> NetworkModel {
        let mut model = NetworkModel::new();
        let mut input = model.overlay_mut(INPUT).unwrap();

        router(&mut input, "r1", 1, (0, 100));
        router(&mut input, "r2", 1, (200, 100));
        router(&mut input, "r3", 1, (100, 200));
        device(&mut input, "sw1", "switch", 1, (100, 0), Attributes::new());
        device(&mut input, "s1", "server", 1, (200, 200), Attributes::new());

        links(
            &mut input,
            &[("sw1", "r1"), ("sw1", "r2"), ("r1", "r2"), ("r1", "r3"), ("r2", "r3"), ("r3", "s1")],
        );
        input.set_data("enable_routing", true).unwrap();

        build_phy(&mut model).unwrap();
        model
    }
}
