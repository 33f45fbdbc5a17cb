// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! A bus-centric graph representation of an energy-system network, built from
//! flat component tables and annotated for rendering.

mod assembly;
mod retrieval;
mod selection;
mod traversal;

pub mod iterators;

#[cfg(test)]
pub(crate) mod test_utils;

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::entities::Bus;

/// Buses stored in the `DiGraph` are addressed with `NodeIndex`es.
///
/// `NodeIndexMap` stores the corresponding `NodeIndex` for any bus
/// identifier, so buses can be retrieved by name.
pub(crate) type NodeIndexMap = HashMap<String, NodeIndex>;

/// A graph representation of the buses of an energy-system network and the
/// components and connections attached to them.
///
/// A fresh graph is assembled per invocation with
/// [`assemble`][TopologyGraph::assemble], then annotated exactly once with
/// either [`select`][TopologyGraph::select] (whole-network mode) or
/// [`focus`][TopologyGraph::focus] (neighbourhood-bounded traversal).  The
/// annotated graph is handed to an external formatter through the rendering
/// accessors.
pub struct TopologyGraph {
    pub(crate) graph: DiGraph<Bus, ()>,
    pub(crate) bus_indices: NodeIndexMap,
    pub(crate) name: String,
    pub(crate) negative_efficiency: bool,
}
