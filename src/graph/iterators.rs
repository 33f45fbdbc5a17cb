// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! Iterators over buses in a `TopologyGraph`.

use std::collections::HashSet;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::entities::Bus;

/// An iterator over the buses in a `TopologyGraph`.
pub struct Buses<'a> {
    iter: std::slice::Iter<'a, petgraph::graph::Node<Bus>>,
}

impl<'a> Buses<'a> {
    pub(crate) fn new(graph: &'a DiGraph<Bus, ()>) -> Self {
        Buses {
            iter: graph.raw_nodes().iter(),
        }
    }
}

impl<'a> Iterator for Buses<'a> {
    type Item = &'a Bus;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|n| &n.weight)
    }
}

/// An iterator over the buses adjacent to a bus in a `TopologyGraph`.
///
/// A pair of buses connected in both orientations is yielded once.
pub struct AdjacentBuses<'a> {
    graph: &'a DiGraph<Bus, ()>,
    iter: std::iter::Chain<
        petgraph::graph::Neighbors<'a, ()>,
        petgraph::graph::Neighbors<'a, ()>,
    >,
    seen: HashSet<NodeIndex>,
}

impl<'a> AdjacentBuses<'a> {
    pub(crate) fn new(graph: &'a DiGraph<Bus, ()>, index: NodeIndex) -> Self {
        AdjacentBuses {
            graph,
            iter: graph
                .neighbors_directed(index, Direction::Outgoing)
                .chain(graph.neighbors_directed(index, Direction::Incoming)),
            seen: HashSet::new(),
        }
    }
}

impl<'a> Iterator for AdjacentBuses<'a> {
    type Item = &'a Bus;

    fn next(&mut self) -> Option<Self::Item> {
        for index in self.iter.by_ref() {
            if self.seen.insert(index) {
                return Some(&self.graph[index]);
            }
        }
        None
    }
}
