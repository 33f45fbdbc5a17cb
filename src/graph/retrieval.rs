// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! Methods for retrieving buses from a [`TopologyGraph`].

use petgraph::graph::NodeIndex;

use crate::entities::Bus;
use crate::iterators::{AdjacentBuses, Buses};
use crate::Error;

use super::TopologyGraph;

/// `Bus` retrieval.
impl TopologyGraph {
    /// Returns the name of the network this graph was assembled from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of buses in the graph, synthesized placeholders
    /// included.
    pub fn bus_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the bus with the given identifier, if it exists.
    pub fn bus(&self, id: &str) -> Result<&Bus, Error> {
        self.bus_indices
            .get(id)
            .map(|index| &self.graph[*index])
            .ok_or_else(|| Error::bus_not_found(format!("Bus '{}' not found.", id)))
    }

    /// Returns an iterator over all the buses in the graph.
    pub fn buses(&self) -> Buses {
        Buses::new(&self.graph)
    }

    /// Returns an iterator over the buses directly connected to the given
    /// bus, through links, branches, or lines, in either orientation.
    pub fn adjacent(&self, id: &str) -> Result<AdjacentBuses, Error> {
        let index = self.bus_index(id)?;
        Ok(AdjacentBuses::new(&self.graph, index))
    }

    /// Looks up the `NodeIndex` of a bus.
    ///
    /// The index map covers every bus added during assembly, so a miss from
    /// internal callers means the graph is corrupt.
    pub(crate) fn bus_index(&self, id: &str) -> Result<NodeIndex, Error> {
        self.bus_indices
            .get(id)
            .copied()
            .ok_or_else(|| Error::internal(format!("Bus '{}' is not in the graph.", id)))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::test_utils::NetworkBuilder;
    use crate::Error;

    #[test]
    fn test_bus_retrieval() -> Result<(), Error> {
        let graph = NetworkBuilder::dummy_network().build();

        assert_eq!(graph.name(), "dummy");
        assert_eq!(graph.bus_count(), 3);
        assert_eq!(graph.bus("oil")?.carrier, "oil");
        assert_eq!(
            graph.bus("gas"),
            Err(Error::bus_not_found("Bus 'gas' not found."))
        );
        Ok(())
    }

    #[test]
    fn test_buses_iterator() {
        let graph = NetworkBuilder::dummy_network().build();
        let mut ids: Vec<&str> = graph.buses().map(|bus| bus.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["electricity", "oil", "transport"]);
    }

    #[test]
    fn test_adjacent_buses() -> Result<(), Error> {
        let graph = NetworkBuilder::dummy_network().build();
        let mut ids: Vec<&str> = graph.adjacent("transport")?.map(|bus| bus.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["electricity", "oil"]);
        Ok(())
    }
}
