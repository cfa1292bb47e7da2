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

//! Module containing all error types

use crate::model::ValueType;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The overlay is not registered in the model
    #[error("Overlay {0} does not exist")]
    OverlayNotFound(String),
    /// An overlay with the same name is already registered
    #[error("Overlay {0} does already exist")]
    OverlayExists(String),
    /// The attribute name is reserved for data which is modelled explicitly
    #[error("Attribute {0} is reserved and cannot be set")]
    ReservedAttribute(String),
    /// An attribute value cannot be coerced into the requested type
    #[error("Cannot convert {value} to {target}")]
    InvalidValue {
        /// Value which was to be converted
        value: String,
        /// Requested type
        target: ValueType,
    },
    /// An edge cannot be added because one of its endpoints is missing. Only returned if the model
    /// is configured with `strict_edges`.
    #[error("Cannot add edge ({src}, {dst}) to {overlay}: endpoint is missing")]
    MissingEndpoint {
        /// Overlay in which the edge should be added
        overlay: String,
        /// Source of the edge
        src: String,
        /// Destination of the edge
        dst: String,
    },
}
