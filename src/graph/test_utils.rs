// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the `graph` modules.
//!
//! The `NetworkBuilder` declaratively builds the component tables of a test
//! network, so tests can assemble topologies without spelling out columns.

use crate::model::{NetworkModel, Value};
use crate::TopologyGraph;

/// A builder for creating test networks easily.
pub(crate) struct NetworkBuilder {
    model: NetworkModel,
}

impl NetworkBuilder {
    /// Creates a new `NetworkBuilder` for a network with the given name.
    pub(crate) fn new(name: &str) -> Self {
        NetworkBuilder {
            model: NetworkModel::new(name),
        }
    }

    /// Adds a bus whose carrier is its own identifier.
    pub(crate) fn bus(&mut self, id: &str) {
        self.model
            .buses
            .push_row(id, [("carrier", Value::from(id))]);
    }

    /// Adds a generator whose carrier is its own identifier.
    pub(crate) fn generator(&mut self, id: &str, bus: &str) {
        self.model.generators.push_row(
            id,
            [
                ("bus", Value::from(bus)),
                ("carrier", Value::from(id)),
                ("p_nom", Value::from(10.0)),
                ("efficiency", Value::from(1.0)),
            ],
        );
    }

    /// Adds a load whose carrier is its own identifier.
    pub(crate) fn load(&mut self, id: &str, bus: &str) {
        self.model.loads.push_row(
            id,
            [
                ("bus", Value::from(bus)),
                ("carrier", Value::from(id)),
                ("p_set", Value::from(5.0)),
            ],
        );
    }

    /// Adds a store whose carrier is its own identifier.
    pub(crate) fn store(&mut self, id: &str, bus: &str) {
        self.model.stores.push_row(
            id,
            [
                ("bus", Value::from(bus)),
                ("carrier", Value::from(id)),
                ("e_nom", Value::from(20.0)),
            ],
        );
    }

    /// Adds a mono-link with default efficiency, marginal cost, and `p_min_pu`.
    pub(crate) fn link(&mut self, id: &str, bus0: &str, bus1: &str) {
        self.model.links.push_row(
            id,
            [
                ("bus0", Value::from(bus0)),
                ("bus1", Value::from(bus1)),
                ("carrier", Value::from(id)),
            ],
        );
    }

    /// Adds a mono-link with the fields the bidirectional predicate and the
    /// orientation rule look at.
    pub(crate) fn link_with(
        &mut self,
        id: &str,
        bus0: &str,
        bus1: &str,
        efficiency: f64,
        marginal_cost: f64,
        p_min_pu: f64,
    ) {
        self.model.links.push_row(
            id,
            [
                ("bus0", Value::from(bus0)),
                ("bus1", Value::from(bus1)),
                ("carrier", Value::from(id)),
                ("efficiency", Value::from(efficiency)),
                ("marginal_cost", Value::from(marginal_cost)),
                ("p_min_pu", Value::from(p_min_pu)),
            ],
        );
    }

    /// Adds a multi-terminal link from `bus0` to the listed `(bus, efficiency)`
    /// terminals, numbered 1 upward.
    pub(crate) fn multi_link(&mut self, id: &str, bus0: &str, terminals: &[(&str, f64)]) {
        let mut values = vec![
            ("bus0".to_string(), Value::from(bus0)),
            ("carrier".to_string(), Value::from(id)),
        ];
        for (number, (bus, efficiency)) in terminals.iter().enumerate().map(|(i, t)| (i + 1, t)) {
            values.push((format!("bus{}", number), Value::from(*bus)));
            let column = if number == 1 {
                "efficiency".to_string()
            } else {
                format!("efficiency{}", number)
            };
            values.push((column, Value::from(*efficiency)));
        }
        self.model
            .links
            .push_row(id, values.iter().map(|(name, value)| (name.as_str(), value.clone())));
    }

    /// Adds a line.
    pub(crate) fn line(&mut self, id: &str, bus0: &str, bus1: &str) {
        self.model.lines.push_row(
            id,
            [
                ("bus0", Value::from(bus0)),
                ("bus1", Value::from(bus1)),
                ("carrier", Value::from(id)),
                ("s_nom", Value::from(100.0)),
            ],
        );
    }

    /// Assembles a graph from the tables built so far.
    pub(crate) fn build(&self) -> TopologyGraph {
        TopologyGraph::assemble(&self.model)
    }

    /// The small oil/electricity/transport network used across the tests:
    /// three buses, two generators, one load, one store, and two mono-links
    /// feeding the transport bus.
    pub(crate) fn dummy_network() -> NetworkBuilder {
        let mut builder = NetworkBuilder::new("dummy");
        builder.bus("oil");
        builder.bus("electricity");
        builder.bus("transport");
        builder.generator("oil", "oil");
        builder.generator("solar", "electricity");
        builder.load("vehicle", "transport");
        builder.store("battery", "electricity");
        builder.link("ICE", "oil", "transport");
        builder.link("BEV", "electricity", "transport");
        builder
    }
}
