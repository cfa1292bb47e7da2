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

//! MultiEdgeNet

use super::{links, router, ExampleNetwork};
use crate::design::build_phy;
use crate::model::{ModelConfig, NetworkModel, INPUT};

/// # MultiEdgeNet
///
/// Three routers in AS 1, where `r1` and `r2` are connected by two parallel links. `input` and
/// `phy` are multigraphs.
///
/// ```text
///     /----\
///   r1      r2 ---- r3
///     \----/
/// ```
#[derive(Debug)]
pub struct MultiEdgeNet;

impl ExampleNetwork for MultiEdgeNet {
    fn model() -> NetworkModel {
        let mut model = NetworkModel::with_config(ModelConfig { multi_edge: true, ..Default::default() });
        let mut input = model.overlay_mut(INPUT).unwrap();

        router(&mut input, "r1", 1, (0, 0));
        router(&mut input, "r2", 1, (100, 0));
        router(&mut input, "r3", 1, (200, 0));

        links(&mut input, &[("r1", "r2"), ("r1", "r2"), ("r2", "r3")]);
        input.set_data("enable_routing", true).unwrap();

        build_phy(&mut model).unwrap();
        model
    }
}
