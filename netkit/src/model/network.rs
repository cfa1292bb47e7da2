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

//! # Top-level Network Model
//!
//! This module owns all overlays of a model, and brokers their creation and lookup.

use crate::model::config::ModelConfig;
use crate::model::graph::OverlayGraph;
use crate::model::interface::{LOOPBACK, PHYSICAL};
use crate::model::construct::OverlayMut;
use crate::model::overlay::Overlay;
use crate::model::types::{AttrValue, Attributes, InterfaceId, LOOPBACK_ZERO};
use crate::Error;

use log::*;
use maplit::btreemap;
use std::collections::{BTreeMap, HashMap};

/// Name of the overlay holding the raw topology, as provided by the loader.
pub const INPUT: &str = "input";
/// Name of the physical overlay, the canonical source of interface data.
pub const PHY: &str = "phy";

/// # Network Model
///
/// The model owns a set of named overlays over a shared universe of node ids. Every overlay has
/// its own nodes, edges and attributes. Overlays are never deleted; they live as long as the model.
///
/// A fresh model always contains the undirected overlays `input` and `phy`. All other overlays are
/// created explicitly with [`NetworkModel::add_overlay`], and are populated using the construction
/// API of [`OverlayMut`].
///
/// Whenever a node is added to an overlay, its interface map is initialized:
/// - In `phy`, the interfaces are copied from `input`.
/// - In `input`, only the loopback zero is created.
/// - In every other overlay, one (physical) interface is created for each interface the node has
///   in `phy`. Descriptions are not copied, since they fall through to `phy` anyway.
///
/// In all cases, interface `0` is (re-)initialized as a loopback.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    overlays: Vec<OverlayGraph>,
    names: HashMap<String, usize>,
    config: ModelConfig,
}

impl Default for NetworkModel {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkModel {
    /// Generate an empty model, containing only the `input` and `phy` overlays.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Generate an empty model with the given configuration.
    pub fn with_config(config: ModelConfig) -> Self {
        let multi_edge = config.multi_edge;
        let mut model = Self { overlays: Vec::new(), names: HashMap::new(), config };
        model.register(INPUT, false, multi_edge);
        model.register(PHY, false, multi_edge);
        model
    }

    /// Configuration of the model
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn register(&mut self, name: &str, directed: bool, multi_edge: bool) -> usize {
        let index = self.overlays.len();
        self.overlays.push(OverlayGraph::new(name, directed, multi_edge));
        self.names.insert(name.to_string(), index);
        index
    }

    /// Create a new, empty overlay, and return its construction API. Fails with
    /// `Error::OverlayExists` if an overlay with the same name is already registered.
    pub fn add_overlay(
        &mut self,
        name: &str,
        directed: bool,
        multi_edge: bool,
    ) -> Result<OverlayMut<'_>, Error> {
        if self.has_overlay(name) {
            return Err(Error::OverlayExists(name.to_string()));
        }
        debug!("Adding overlay {} (directed: {}, multi_edge: {})", name, directed, multi_edge);
        let index = self.register(name, directed, multi_edge);
        Ok(OverlayMut::new(self, index))
    }

    /// Read-only view onto an overlay. Fails with `Error::OverlayNotFound` if it does not exist.
    pub fn overlay(&self, name: &str) -> Result<Overlay<'_>, Error> {
        match self.graph(name) {
            Some(graph) => Ok(Overlay::new(self, graph)),
            None => Err(Error::OverlayNotFound(name.to_string())),
        }
    }

    /// Construction API of an overlay. Fails with `Error::OverlayNotFound` if it does not exist.
    pub fn overlay_mut(&mut self, name: &str) -> Result<OverlayMut<'_>, Error> {
        let index = *self
            .names
            .get(name)
            .ok_or_else(|| Error::OverlayNotFound(name.to_string()))?;
        Ok(OverlayMut::new(self, index))
    }

    /// Returns `true` if an overlay with this name is registered.
    pub fn has_overlay(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Names of all overlays, in the order they were created.
    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays.iter().map(|g| g.name.as_str()).collect()
    }

    pub(crate) fn graph(&self, name: &str) -> Option<&OverlayGraph> {
        self.names.get(name).map(|i| &self.overlays[*i])
    }

    pub(crate) fn graph_at(&self, index: usize) -> &OverlayGraph {
        &self.overlays[index]
    }

    pub(crate) fn graph_at_mut(&mut self, index: usize) -> &mut OverlayGraph {
        &mut self.overlays[index]
    }

    /// Interface map of a node entering the overlay `overlay`.
    pub(crate) fn initial_ports(&self, overlay: &str, id: &str) -> BTreeMap<InterfaceId, Attributes> {
        let mut ports: BTreeMap<InterfaceId, Attributes> = BTreeMap::new();
        if overlay == PHY {
            if let Some(ports_in) = self.ports_of(INPUT, id) {
                ports = ports_in.clone();
            }
        } else if overlay != INPUT {
            if let Some(ports_phy) = self.ports_of(PHY, id) {
                ports = ports_phy
                    .keys()
                    .map(|i| (*i, btreemap! {"category".to_string() => AttrValue::from(PHYSICAL)}))
                    .collect();
            }
        }
        ports.insert(LOOPBACK_ZERO, loopback_stub());
        ports
    }

    fn ports_of(&self, overlay: &str, id: &str) -> Option<&BTreeMap<InterfaceId, Attributes>> {
        let graph = self.graph(overlay)?;
        let idx = graph.index(id)?;
        Some(&graph.node(idx).ports)
    }
}

/// Attributes of the loopback zero interface
pub(crate) fn loopback_stub() -> Attributes {
    btreemap! {
        "description".to_string() => AttrValue::from(LOOPBACK),
        "category".to_string() => AttrValue::from(LOOPBACK),
    }
}
