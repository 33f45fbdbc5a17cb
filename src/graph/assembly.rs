// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! Methods for assembling a [`TopologyGraph`] from the component tables of a
//! network model.
//!
//! Assembly is total: a dangling or blank bus reference synthesizes a
//! placeholder bus and logs a warning instead of failing, so a malformed
//! network still yields a best-effort diagram.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::entities::{Attachment, AttachmentKind, Branch, Bus, Direction, LineEnd, LinkEnd, Trunk};
use crate::records::{self, AttachmentRecord, LineRecord, LinkRecord};
use crate::NetworkModel;

use super::{NodeIndexMap, TopologyGraph};

/// Generates identifiers for placeholder buses synthesized from blank
/// references.
///
/// The counter is owned by one assembly invocation, so placeholder
/// identifiers are unique within a graph and unrelated invocations stay
/// independent.
#[derive(Debug, Default)]
struct MissingBusCounter(u64);

impl MissingBusCounter {
    fn next_id(&mut self) -> String {
        let id = format!("bus #{}", self.0);
        self.0 += 1;
        id
    }
}

/// `TopologyGraph` instantiation.
impl TopologyGraph {
    /// Builds the bus-keyed adjacency structure from the given network model.
    ///
    /// Every endpoint reference appearing in any component, link, branch, or
    /// line resolves to exactly one bus record, real or placeholder; the
    /// assembled graph never contains a dangling reference.
    pub fn assemble(model: &NetworkModel) -> Self {
        let mut tg = TopologyGraph {
            graph: DiGraph::new(),
            bus_indices: NodeIndexMap::new(),
            name: model.name.clone(),
            negative_efficiency: true,
        };
        let mut counter = MissingBusCounter::default();

        for record in records::load_buses(&model.buses) {
            tg.add_bus(Bus::new(record.id, record.carrier, record.unit));
        }
        tg.attach_components(
            records::load_attachments(&model.generators),
            AttachmentKind::Generator,
            &mut counter,
        );
        tg.attach_components(
            records::load_attachments(&model.loads),
            AttachmentKind::Load,
            &mut counter,
        );
        tg.attach_components(
            records::load_attachments(&model.stores),
            AttachmentKind::Store,
            &mut counter,
        );
        for record in records::load_links(&model.links) {
            if record.is_multi() {
                tg.attach_multi_link(&record, &mut counter);
            } else {
                tg.attach_mono_link(&record, &mut counter);
            }
        }
        for record in records::load_lines(&model.lines) {
            tg.attach_line(&record, &mut counter);
        }

        tg
    }

    fn add_bus(&mut self, bus: Bus) -> NodeIndex {
        if let Some(index) = self.bus_indices.get(&bus.id) {
            return *index;
        }
        let id = bus.id.clone();
        let index = self.graph.add_node(bus);
        self.bus_indices.insert(id, index);
        index
    }

    /// Resolves a bus reference to a node index, synthesizing a placeholder
    /// bus for blank or dangling references.
    ///
    /// Returns the index and whether the resolved bus is a placeholder.
    fn ensure_bus(
        &mut self,
        reference: &str,
        counter: &mut MissingBusCounter,
        owner_kind: &str,
        owner_id: &str,
    ) -> (NodeIndex, bool) {
        if reference.is_empty() {
            tracing::warn!(
                "{} '{}' connects to a bus which does not have a value.",
                owner_kind,
                owner_id
            );
            let id = counter.next_id();
            return (self.add_bus(Bus::placeholder(id)), true);
        }
        if let Some(index) = self.bus_indices.get(reference) {
            return (*index, self.graph[*index].missing);
        }
        tracing::warn!(
            "{} '{}' connects to bus '{}' which does not exist.",
            owner_kind,
            owner_id,
            reference
        );
        (self.add_bus(Bus::placeholder(reference)), true)
    }

    fn attach_components(
        &mut self,
        records: Vec<AttachmentRecord>,
        kind: AttachmentKind,
        counter: &mut MissingBusCounter,
    ) {
        for record in records {
            let (index, _) = self.ensure_bus(&record.bus, counter, kind.label(), &record.id);
            let attachment = Attachment {
                id: record.id,
                kind,
                carrier: record.carrier,
                attrs: record.attrs,
                selected: false,
                displayed: false,
            };
            let bus = &mut self.graph[index];
            match kind {
                AttachmentKind::Generator => bus.generators.push(attachment),
                AttachmentKind::Load => bus.loads.push(attachment),
                AttachmentKind::Store => bus.stores.push(attachment),
            }
        }
    }

    fn attach_mono_link(&mut self, record: &LinkRecord, counter: &mut MissingBusCounter) {
        let (index0, missing0) =
            self.ensure_bus(record.endpoint_bus(0), counter, "Link", &record.id);
        let (index1, missing1) =
            self.ensure_bus(record.endpoint_bus(1), counter, "Link", &record.id);
        let missing = missing0 || missing1;
        let bidirectional =
            record.efficiency == 1.0 && record.marginal_cost == 0.0 && record.p_min_pu == -1.0;
        let bus0_id = self.graph[index0].id.clone();
        let bus1_id = self.graph[index1].id.clone();

        self.graph[index0].links.push(LinkEnd {
            id: record.id.clone(),
            other: bus1_id,
            carrier: record.carrier.clone(),
            efficiency: record.efficiency,
            bidirectional,
            missing,
            direction: Direction::Canonical,
            selected: false,
            displayed: false,
        });
        self.graph[index1].links.push(LinkEnd {
            id: record.id.clone(),
            other: bus0_id,
            carrier: record.carrier.clone(),
            efficiency: record.efficiency,
            bidirectional,
            missing,
            direction: Direction::Mirror,
            selected: false,
            displayed: false,
        });
        self.graph.update_edge(index0, index1, ());
    }

    fn attach_multi_link(&mut self, record: &LinkRecord, counter: &mut MissingBusCounter) {
        let (trunk_index, _) = self.ensure_bus(record.endpoint_bus(0), counter, "Link", &record.id);
        let trunk_bus_id = self.graph[trunk_index].id.clone();

        let mut count = 0;
        let mut missing = 0;
        for endpoint in record.endpoints.iter().filter(|e| e.terminal != 0) {
            let (end_index, end_missing) =
                self.ensure_bus(&endpoint.bus, counter, "Link", &record.id);
            let endpoint_id = self.graph[end_index].id.clone();
            count += 1;
            if end_missing {
                missing += 1;
            }
            let branch = Branch {
                id: record.id.clone(),
                trunk_bus: trunk_bus_id.clone(),
                terminal: endpoint.terminal,
                endpoint: endpoint_id,
                carrier: record.carrier.clone(),
                efficiency: endpoint.efficiency,
                endpoint_missing: end_missing,
                direction: Direction::Canonical,
                selected: false,
                displayed: false,
            };
            self.graph[end_index].branches.push(Branch {
                direction: Direction::Mirror,
                ..branch.clone()
            });
            self.graph[trunk_index].branches.push(branch);
            self.graph.update_edge(trunk_index, end_index, ());
        }

        self.graph[trunk_index].trunks.push(Trunk {
            id: record.id.clone(),
            carrier: record.carrier.clone(),
            count,
            missing,
            selected: false,
            displayed: false,
        });
    }

    fn attach_line(&mut self, record: &LineRecord, counter: &mut MissingBusCounter) {
        let (index0, missing0) = self.ensure_bus(&record.bus0, counter, "Line", &record.id);
        let (index1, missing1) = self.ensure_bus(&record.bus1, counter, "Line", &record.id);
        let missing = missing0 || missing1;
        let bus0_id = self.graph[index0].id.clone();
        let bus1_id = self.graph[index1].id.clone();

        self.graph[index0].lines.push(LineEnd {
            id: record.id.clone(),
            other: bus1_id,
            carrier: record.carrier.clone(),
            attrs: record.attrs.clone(),
            missing,
            direction: Direction::Canonical,
            selected: false,
            displayed: false,
        });
        self.graph[index1].lines.push(LineEnd {
            id: record.id.clone(),
            other: bus0_id,
            carrier: record.carrier.clone(),
            attrs: record.attrs.clone(),
            missing,
            direction: Direction::Mirror,
            selected: false,
            displayed: false,
        });
        self.graph.update_edge(index0, index1, ());
    }
}
