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

//! # Helper (printer) functions for the Network Model
//! Module containing helper functions to get formatted strings and print the content of overlays.

use crate::model::{Attributes, Edge, Interface, NetworkModel, Node};
use crate::Error;

use itertools::Itertools;

/// Returns the attributes formatted as `{key: value, ...}`, sorted by key.
pub fn attributes(attrs: &Attributes) -> String {
    format!("{{{}}}", attrs.iter().map(|(k, v)| format!("{}: {}", k, v)).join(", "))
}

/// Returns the formatted string of a node, with its local attributes.
pub fn node(node: &Node) -> String {
    format!("{} {}", node, attributes(node.attrs()))
}

/// Returns the formatted string of an edge. Directed edges are written as `a -> b`, undirected
/// ones as `a -- b`. The key is only shown on multigraphs, and the bound interfaces are appended.
pub fn edge(edge: &Edge) -> String {
    let arrow = if edge.src().overlay().is_directed() { "->" } else { "--" };
    let mut result = format!("{} {} {}", edge.src(), arrow, edge.dst());
    if edge.is_multigraph() {
        result.push_str(&format!(" (key {})", edge.key()));
    }
    result.push_str(&format!(" {}", attributes(edge.attrs())));
    if !edge.ports().is_empty() {
        result.push_str(&format!(
            " [{}]",
            edge.ports().iter().map(|(n, i)| format!("{}.{}", n, i)).join(", ")
        ));
    }
    result
}

/// Returns the formatted string of an interface, with its local attributes.
pub fn interface(interface: &Interface) -> String {
    format!(
        "{}.{} ({}) {}",
        interface.node(),
        interface.id(),
        interface.description().unwrap_or("-"),
        interface.attrs().map(attributes).unwrap_or_default()
    )
}

/// Get a vector of strings, which represent the content of the overlay: one line per node
/// (followed by its interfaces, indented), and one line per edge.
pub fn overlay(model: &NetworkModel, name: &str) -> Result<Vec<String>, Error> {
    let g = model.overlay(name)?;
    let mut result = vec![format!(
        "{} ({} nodes, {} edges{}{})",
        g.name(),
        g.len(),
        g.edge_count(),
        if g.is_directed() { ", directed" } else { "" },
        if g.is_multigraph() { ", multigraph" } else { "" },
    )];
    for n in g.nodes() {
        result.push(format!("  {}", node(&n)));
        for i in n.interfaces() {
            result.push(format!("    {}", interface(&i)));
        }
    }
    for e in g.edges() {
        result.push(format!("  {}", edge(&e)));
    }
    Ok(result)
}

/// Get one line per overlay of the model, with the number of nodes and edges.
pub fn model_summary(model: &NetworkModel) -> Vec<String> {
    model
        .overlay_names()
        .into_iter()
        .filter_map(|name| model.overlay(name).ok())
        .map(|g| format!("{}: {} nodes, {} edges", g.name(), g.len(), g.edge_count()))
        .collect()
}

/// Print the content of an overlay.
pub fn print_overlay(model: &NetworkModel, name: &str) -> Result<(), Error> {
    for line in overlay(model, name)? {
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::example_networks::{ExampleNetwork, HouseNet};

    #[test]
    fn overlay_lines() {
        let model = HouseNet::model();
        let lines = overlay(&model, "phy").unwrap();
        assert_eq!(lines[0], "phy (5 nodes, 6 edges)");
        assert!(lines.iter().any(|l| l.starts_with("  r1 -- r2 {} [")));
        assert!(overlay(&model, "ospf").is_err());
        assert_eq!(model_summary(&model), vec!["input: 5 nodes, 6 edges", "phy: 5 nodes, 6 edges"]);
    }
}
