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

//! Model configuration

/// # Model Configuration
///
/// Controls how the construction API reacts to steps it cannot perform. By default, an edge with
/// a missing endpoint is skipped, logged at debug level, and recorded as a
/// [`Diagnostic`](crate::model::Diagnostic) in the overlay.
///
/// ```
/// use netkit::model::{ModelConfig, NetworkModel};
///
/// let model = NetworkModel::with_config(ModelConfig { strict_edges: true, ..Default::default() });
/// assert!(model.config().strict_edges);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelConfig {
    /// Return [`Error::MissingEndpoint`](crate::Error::MissingEndpoint) instead of skipping edges
    /// whose endpoints are not part of the overlay.
    pub strict_edges: bool,
    /// Log skipped construction steps as warnings instead of debug messages.
    pub warn_on_skip: bool,
    /// Create `input` and `phy` as multigraphs, to hold parallel links between devices.
    pub multi_edge: bool,
}
