// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! Whole-network selection: applies the configured filters to every bus and
//! attached entity, marks each one `selected` or context-faded, and
//! accumulates the per-bus summary counters.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::entities::{Attachment, BusCounters, Direction};
use crate::{Filter, TopologyConfig};

use super::TopologyGraph;

/// Whole-network selection.
impl TopologyGraph {
    /// Applies the configured filters to the whole network.
    ///
    /// Mutually exclusive with [`focus`][TopologyGraph::focus]: an annotated
    /// graph is built fresh per invocation and each entity's flags are set
    /// exactly once.
    pub fn select(&mut self, config: &TopologyConfig) {
        self.negative_efficiency = config.negative_efficiency;
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();

        // buses first: every other predicate depends on the owning bus
        for &index in &indices {
            let bus = &mut self.graph[index];
            let gate = !bus.missing || config.include_broken;
            bus.selected = gate
                && config.bus_filter.matches(&bus.id)
                && config.carrier_filter.matches(&bus.carrier);
            bus.displayed = bus.selected || (gate && config.include_context);
        }

        // snapshot of the per-bus flags, so edge predicates can read the far
        // endpoint while the near one is borrowed mutably
        let bus_flags: HashMap<String, (bool, bool)> = self
            .graph
            .raw_nodes()
            .iter()
            .map(|n| (n.weight.id.clone(), (n.weight.selected, n.weight.displayed)))
            .collect();

        for &index in &indices {
            let (owner_selected, owner_displayed) = {
                let bus = &self.graph[index];
                (bus.selected, bus.displayed)
            };
            let trunk_matches = {
                let bus = &self.graph[index];
                bus.trunks
                    .iter()
                    .map(|trunk| {
                        let matched = !config.bus_filter.is_active()
                            || bus.branches.iter().any(|b| {
                                b.id == trunk.id
                                    && b.direction == Direction::Canonical
                                    && config.bus_filter.matches(&b.endpoint)
                            });
                        (trunk.id.clone(), matched)
                    })
                    .collect::<HashMap<String, bool>>()
            };

            let bus = &mut self.graph[index];
            for attachment in &mut bus.generators {
                Self::select_attachment(
                    attachment,
                    owner_selected,
                    owner_displayed,
                    &config.generator_filter,
                    &config.carrier_filter,
                    config.include_context,
                );
            }
            for attachment in &mut bus.loads {
                Self::select_attachment(
                    attachment,
                    owner_selected,
                    owner_displayed,
                    &config.load_filter,
                    &config.carrier_filter,
                    config.include_context,
                );
            }
            for attachment in &mut bus.stores {
                Self::select_attachment(
                    attachment,
                    owner_selected,
                    owner_displayed,
                    &config.store_filter,
                    &config.carrier_filter,
                    config.include_context,
                );
            }

            for link in &mut bus.links {
                let gate = !link.missing || config.include_broken;
                link.selected = gate
                    && owner_selected
                    && config.bus_filter.matches(&link.other)
                    && config.link_filter.matches(&link.id)
                    && config.carrier_filter.matches(&link.carrier);
                link.displayed =
                    owner_displayed && gate && (link.selected || config.include_context);
            }

            for trunk in &mut bus.trunks {
                let gate = !trunk.is_fully_broken() || config.include_broken;
                trunk.selected = gate
                    && owner_selected
                    && config.link_filter.matches(&trunk.id)
                    && config.carrier_filter.matches(&trunk.carrier)
                    && trunk_matches.get(&trunk.id).copied().unwrap_or(true);
                trunk.displayed =
                    owner_displayed && gate && (trunk.selected || config.include_context);
            }

            for branch in &mut bus.branches {
                // both copies use the trunk bus's flags, so they agree
                let (trunk_selected, trunk_displayed) = bus_flags
                    .get(&branch.trunk_bus)
                    .copied()
                    .unwrap_or((false, false));
                let gate = !branch.endpoint_missing || config.include_broken;
                branch.selected = gate
                    && trunk_selected
                    && config.bus_filter.matches(&branch.endpoint)
                    && config.link_filter.matches(&branch.id)
                    && config.carrier_filter.matches(&branch.carrier);
                branch.displayed =
                    trunk_displayed && gate && (branch.selected || config.include_context);
            }

            for line in &mut bus.lines {
                let gate = !line.missing || config.include_broken;
                line.selected = gate
                    && owner_selected
                    && config.bus_filter.matches(&line.other)
                    && config.line_filter.matches(&line.id)
                    && config.carrier_filter.matches(&line.carrier);
                line.displayed =
                    owner_displayed && gate && (line.selected || config.include_context);
            }
        }

        self.accumulate_counters();
        self.dedup_edges();
    }

    fn select_attachment(
        attachment: &mut Attachment,
        owner_selected: bool,
        owner_displayed: bool,
        kind_filter: &Filter,
        carrier_filter: &Filter,
        include_context: bool,
    ) {
        attachment.selected = owner_selected
            && kind_filter.matches(&attachment.id)
            && carrier_filter.matches(&attachment.carrier);
        attachment.displayed = owner_displayed && (attachment.selected || include_context);
    }

    /// Accumulates the per-bus summary counters over displayed entities.
    ///
    /// Runs in a separate pass from filtering because a context-faded
    /// component still makes the bus's displayed degree non-zero.  Only the
    /// canonical copy of a dual-stored edge counts, so an edge is never
    /// counted twice: it increments "outgoing" on its `bus0` and "incoming"
    /// on its `bus1`.
    pub(crate) fn accumulate_counters(&mut self) {
        let mut deltas: HashMap<String, BusCounters> = HashMap::new();
        for node in self.graph.raw_nodes() {
            let bus = &node.weight;
            let generators = bus.generators.iter().filter(|a| a.displayed).count();
            let loads = bus.loads.iter().filter(|a| a.displayed).count();
            let stores = bus.stores.iter().filter(|a| a.displayed).count();
            {
                let own = deltas.entry(bus.id.clone()).or_default();
                own.generators += generators;
                own.loads += loads;
                own.stores += stores;
            }
            for link in &bus.links {
                if link.displayed && link.direction == Direction::Canonical {
                    deltas.entry(bus.id.clone()).or_default().outgoing_links += 1;
                    deltas.entry(link.other.clone()).or_default().incoming_links += 1;
                }
            }
            for trunk in &bus.trunks {
                if trunk.displayed {
                    deltas.entry(bus.id.clone()).or_default().outgoing_links += 1;
                }
            }
            for branch in &bus.branches {
                if branch.displayed && branch.direction == Direction::Canonical {
                    deltas
                        .entry(branch.endpoint.clone())
                        .or_default()
                        .incoming_links += 1;
                }
            }
            for line in &bus.lines {
                if line.displayed && line.direction == Direction::Canonical {
                    deltas.entry(bus.id.clone()).or_default().lines += 1;
                    deltas.entry(line.other.clone()).or_default().lines += 1;
                }
            }
        }

        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for index in indices {
            let bus = &mut self.graph[index];
            bus.counters = deltas.remove(&bus.id).unwrap_or_default();
        }
    }
}
