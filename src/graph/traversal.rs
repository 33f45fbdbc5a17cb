// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! Focus traversal: a queue-based, neighbourhood-bounded breadth-first
//! exploration starting from one or more focus buses, replacing whole-graph
//! selection with a radius-limited one.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use crate::entities::Direction;
use crate::{Error, Neighbourhood, TopologyConfig};

use super::TopologyGraph;

/// Focus traversal.
impl TopologyGraph {
    /// Explores the network outward from the configured focus buses, up to
    /// the configured neighbourhood radius, and marks everything reached.
    ///
    /// Mutually exclusive with [`select`][TopologyGraph::select].  Unknown
    /// focus buses, negative radii, and mismatched focus/radius list lengths
    /// are caller errors, reported before any graph work begins.
    pub fn focus(&mut self, config: &TopologyConfig) -> Result<(), Error> {
        self.negative_efficiency = config.negative_efficiency;

        if config.focus.is_empty() {
            return Err(Error::invalid_focus("No focus buses were specified."));
        }
        for id in &config.focus {
            if !self.bus_indices.contains_key(id) {
                return Err(Error::bus_not_found(format!(
                    "The bus '{}' to focus on does not exist.",
                    id
                )));
            }
        }
        let radii: Vec<i64> = match &config.neighbourhood {
            Neighbourhood::Uniform(radius) => vec![*radius; config.focus.len()],
            Neighbourhood::PerFocus(radii) => {
                if radii.len() != config.focus.len() {
                    return Err(Error::invalid_neighbourhood(
                        "The number of neighbourhoods should match the number of buses to focus on.",
                    ));
                }
                radii.clone()
            }
        };
        if radii.iter().any(|radius| *radius < 0) {
            return Err(Error::invalid_neighbourhood(
                "The neighbourhood should be equal or greater than 0.",
            ));
        }

        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(NodeIndex, i64)> = VecDeque::new();
        for (id, radius) in config.focus.iter().zip(radii) {
            if !visited.insert(format!("{} (bus)", id)) {
                continue;
            }
            let index = self.bus_index(id)?;
            let bus = &mut self.graph[index];
            // the focus bus is the explicit starting point and bypasses the
            // filters; only brokenness can keep it out
            let gate = !bus.missing || config.include_broken;
            bus.selected = gate;
            bus.displayed = gate;
            queue.push_back((index, radius));
        }

        while let Some((index, hops)) = queue.pop_front() {
            // the bus itself is still emitted, but no edges are attached
            // from it once the radius is exhausted
            if hops == 0 {
                continue;
            }
            let snapshot = self.graph[index].clone();

            {
                let bus = &mut self.graph[index];
                for attachment in bus
                    .generators
                    .iter_mut()
                    .chain(bus.loads.iter_mut())
                    .chain(bus.stores.iter_mut())
                {
                    let kind_filter = match attachment.kind {
                        crate::AttachmentKind::Generator => &config.generator_filter,
                        crate::AttachmentKind::Load => &config.load_filter,
                        crate::AttachmentKind::Store => &config.store_filter,
                    };
                    attachment.selected = snapshot.selected
                        && kind_filter.matches(&attachment.id)
                        && config.carrier_filter.matches(&attachment.carrier);
                    attachment.displayed = attachment.selected || config.include_context;
                }
            }

            for link in &snapshot.links {
                let key = format!("{} (link)", link.id);
                if visited.contains(&key) {
                    continue;
                }
                if link.missing && !config.include_broken {
                    continue;
                }
                let selected = snapshot.selected
                    && config.bus_filter.matches(&link.other)
                    && config.link_filter.matches(&link.id)
                    && config.carrier_filter.matches(&link.carrier);
                if !(selected || config.include_context) {
                    continue;
                }
                visited.insert(key);

                let other_index = self.bus_index(&link.other)?;
                if visited.insert(format!("{} (bus)", link.other)) {
                    let other = &mut self.graph[other_index];
                    let gate = !other.missing || config.include_broken;
                    other.selected = gate
                        && config.bus_filter.matches(&other.id)
                        && config.carrier_filter.matches(&other.carrier);
                    other.displayed = gate;
                    queue.push_back((other_index, hops - 1));
                }
                let far_selected = {
                    let other = &self.graph[other_index];
                    other.selected
                        && config.bus_filter.matches(&snapshot.id)
                        && config.link_filter.matches(&link.id)
                        && config.carrier_filter.matches(&link.carrier)
                };
                let bus = &mut self.graph[index];
                if let Some(near) = bus
                    .links
                    .iter_mut()
                    .find(|l| l.id == link.id && l.direction == link.direction)
                {
                    near.selected = selected;
                    near.displayed = true;
                }
                let other = &mut self.graph[other_index];
                if let Some(far) = other
                    .links
                    .iter_mut()
                    .find(|l| l.id == link.id && l.direction != link.direction)
                {
                    far.selected = far_selected;
                    far.displayed = true;
                }
            }

            for trunk in &snapshot.trunks {
                let key = format!("{} (link)", trunk.id);
                if visited.contains(&key) {
                    continue;
                }
                if trunk.is_fully_broken() && !config.include_broken {
                    continue;
                }
                let branch_match = !config.bus_filter.is_active()
                    || snapshot.branches.iter().any(|b| {
                        b.id == trunk.id
                            && b.direction == Direction::Canonical
                            && config.bus_filter.matches(&b.endpoint)
                    });
                let selected = snapshot.selected
                    && config.link_filter.matches(&trunk.id)
                    && config.carrier_filter.matches(&trunk.carrier)
                    && branch_match;
                if !(selected || config.include_context) {
                    continue;
                }
                visited.insert(key);
                let bus = &mut self.graph[index];
                if let Some(t) = bus.trunks.iter_mut().find(|t| t.id == trunk.id) {
                    t.selected = selected;
                    t.displayed = true;
                }
            }

            for branch in &snapshot.branches {
                let key = format!("{}#{} (link)", branch.id, branch.terminal);
                if visited.contains(&key) {
                    continue;
                }
                if branch.endpoint_missing && !config.include_broken {
                    continue;
                }
                let far = match branch.direction {
                    Direction::Canonical => branch.endpoint.clone(),
                    Direction::Mirror => branch.trunk_bus.clone(),
                };
                let trunk_bus_index = self.bus_index(&branch.trunk_bus)?;
                let filters_match = config.bus_filter.matches(&branch.endpoint)
                    && config.link_filter.matches(&branch.id)
                    && config.carrier_filter.matches(&branch.carrier);
                // exploration is gated on the near bus; the trunk bus may
                // not have been visited yet when walking in from a far
                // endpoint
                if !((snapshot.selected && filters_match) || config.include_context) {
                    continue;
                }
                visited.insert(key);

                let far_index = self.bus_index(&far)?;
                if visited.insert(format!("{} (bus)", far)) {
                    let far_bus = &mut self.graph[far_index];
                    let gate = !far_bus.missing || config.include_broken;
                    far_bus.selected = gate
                        && config.bus_filter.matches(&far_bus.id)
                        && config.carrier_filter.matches(&far_bus.carrier);
                    far_bus.displayed = gate;
                    queue.push_back((far_index, hops - 1));
                }
                // both copies share the trunk-bus-based predicate, computed
                // after the far bus flags are set since the trunk bus may
                // itself be the far side
                let selected = self.graph[trunk_bus_index].selected && filters_match;
                let bus = &mut self.graph[index];
                if let Some(near) = bus.branches.iter_mut().find(|b| {
                    b.id == branch.id
                        && b.terminal == branch.terminal
                        && b.direction == branch.direction
                }) {
                    near.selected = selected;
                    near.displayed = true;
                }
                let far_bus = &mut self.graph[far_index];
                if let Some(far_copy) = far_bus.branches.iter_mut().find(|b| {
                    b.id == branch.id
                        && b.terminal == branch.terminal
                        && b.direction != branch.direction
                }) {
                    far_copy.selected = selected;
                    far_copy.displayed = true;
                }
                // a displayed branch needs its junction displayed too; a
                // selected branch implies the trunk's own predicate holds
                let trunk_bus = &mut self.graph[trunk_bus_index];
                if let Some(trunk) = trunk_bus.trunks.iter_mut().find(|t| t.id == branch.id) {
                    trunk.selected = trunk.selected || selected;
                    trunk.displayed = true;
                }
            }

            for line in &snapshot.lines {
                let key = format!("{} (line)", line.id);
                if visited.contains(&key) {
                    continue;
                }
                if line.missing && !config.include_broken {
                    continue;
                }
                let selected = snapshot.selected
                    && config.bus_filter.matches(&line.other)
                    && config.line_filter.matches(&line.id)
                    && config.carrier_filter.matches(&line.carrier);
                if !(selected || config.include_context) {
                    continue;
                }
                visited.insert(key);

                let other_index = self.bus_index(&line.other)?;
                if visited.insert(format!("{} (bus)", line.other)) {
                    let other = &mut self.graph[other_index];
                    let gate = !other.missing || config.include_broken;
                    other.selected = gate
                        && config.bus_filter.matches(&other.id)
                        && config.carrier_filter.matches(&other.carrier);
                    other.displayed = gate;
                    queue.push_back((other_index, hops - 1));
                }
                let far_selected = {
                    let other = &self.graph[other_index];
                    other.selected
                        && config.bus_filter.matches(&snapshot.id)
                        && config.line_filter.matches(&line.id)
                        && config.carrier_filter.matches(&line.carrier)
                };
                let bus = &mut self.graph[index];
                if let Some(near) = bus
                    .lines
                    .iter_mut()
                    .find(|l| l.id == line.id && l.direction == line.direction)
                {
                    near.selected = selected;
                    near.displayed = true;
                }
                let other = &mut self.graph[other_index];
                if let Some(far) = other
                    .lines
                    .iter_mut()
                    .find(|l| l.id == line.id && l.direction != line.direction)
                {
                    far.selected = far_selected;
                    far.displayed = true;
                }
            }
        }

        self.accumulate_counters();
        self.dedup_edges();

        Ok(())
    }

    /// Removes the redundant second copy of every dual-stored edge whose
    /// both copies ended up displayed, so the same physical connection is
    /// never rendered twice.
    ///
    /// When exactly one of the two copies is selected, that copy survives;
    /// otherwise the first-seen copy does.
    pub(crate) fn dedup_edges(&mut self) {
        fn redundant(copies: &[(NodeIndex, Direction, bool)]) -> Vec<(NodeIndex, Direction)> {
            if copies.len() < 2 {
                return Vec::new();
            }
            let keep = if copies.iter().filter(|c| c.2).count() == 1 {
                copies.iter().position(|c| c.2).unwrap_or(0)
            } else {
                0
            };
            copies
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != keep)
                .map(|(_, c)| (c.0, c.1))
                .collect()
        }

        let mut mono: HashMap<String, Vec<(NodeIndex, Direction, bool)>> = HashMap::new();
        let mut branches: HashMap<(String, u32), Vec<(NodeIndex, Direction, bool)>> =
            HashMap::new();
        let mut lines: HashMap<String, Vec<(NodeIndex, Direction, bool)>> = HashMap::new();
        for index in self.graph.node_indices() {
            let bus = &self.graph[index];
            for link in bus.links.iter().filter(|l| l.displayed) {
                mono.entry(link.id.clone())
                    .or_default()
                    .push((index, link.direction, link.selected));
            }
            for branch in bus.branches.iter().filter(|b| b.displayed) {
                branches
                    .entry((branch.id.clone(), branch.terminal))
                    .or_default()
                    .push((index, branch.direction, branch.selected));
            }
            for line in bus.lines.iter().filter(|l| l.displayed) {
                lines
                    .entry(line.id.clone())
                    .or_default()
                    .push((index, line.direction, line.selected));
            }
        }

        for (id, copies) in &mono {
            for (index, direction) in redundant(copies) {
                self.graph[index]
                    .links
                    .retain(|l| !(l.id == *id && l.direction == direction));
            }
        }
        for ((id, terminal), copies) in &branches {
            for (index, direction) in redundant(copies) {
                self.graph[index].branches.retain(|b| {
                    !(b.id == *id && b.terminal == *terminal && b.direction == direction)
                });
            }
        }
        for (id, copies) in &lines {
            for (index, direction) in redundant(copies) {
                self.graph[index]
                    .lines
                    .retain(|l| !(l.id == *id && l.direction == direction));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::test_utils::NetworkBuilder;
    use crate::{Error, Neighbourhood, TopologyConfig};

    fn focus_config(focus: &[&str], neighbourhood: Neighbourhood) -> TopologyConfig {
        TopologyConfig {
            focus: focus.iter().map(|s| s.to_string()).collect(),
            neighbourhood,
            ..Default::default()
        }
    }

    fn cycle_network() -> NetworkBuilder {
        let mut builder = NetworkBuilder::new("cycle");
        for bus in ["a", "b", "c"] {
            builder.bus(bus);
        }
        builder.link("ab", "a", "b");
        builder.link("bc", "b", "c");
        builder.link("ca", "c", "a");
        builder
    }

    #[test]
    fn test_unknown_focus_bus() {
        let mut graph = NetworkBuilder::dummy_network().build();
        let config = focus_config(&["nuclear"], Neighbourhood::Uniform(1));
        assert_eq!(
            graph.focus(&config),
            Err(Error::bus_not_found(
                "The bus 'nuclear' to focus on does not exist."
            ))
        );
    }

    #[test]
    fn test_negative_neighbourhood() {
        let mut graph = NetworkBuilder::dummy_network().build();
        let config = focus_config(&["oil"], Neighbourhood::Uniform(-1));
        assert_eq!(
            graph.focus(&config),
            Err(Error::invalid_neighbourhood(
                "The neighbourhood should be equal or greater than 0."
            ))
        );
    }

    #[test]
    fn test_mismatched_radius_list() {
        let mut graph = NetworkBuilder::dummy_network().build();
        let config = focus_config(&["oil", "transport"], Neighbourhood::PerFocus(vec![1]));
        assert_eq!(
            graph.focus(&config),
            Err(Error::invalid_neighbourhood(
                "The number of neighbourhoods should match the number of buses to focus on.",
            ))
        );
    }

    #[test]
    fn test_no_focus_buses() {
        let mut graph = NetworkBuilder::dummy_network().build();
        let config = TopologyConfig::default();
        assert_eq!(
            graph.focus(&config),
            Err(Error::invalid_focus("No focus buses were specified."))
        );
    }

    #[test]
    fn test_zero_neighbourhood_emits_only_the_focus_bus() -> Result<(), Error> {
        let mut graph = NetworkBuilder::dummy_network().build();
        graph.focus(&focus_config(&["oil"], Neighbourhood::Uniform(0)))?;

        let oil = graph.bus("oil")?;
        assert!(oil.selected && oil.displayed);
        assert!(oil.links.iter().all(|l| !l.displayed));
        assert!(oil.generators.iter().all(|a| !a.displayed));
        assert!(!graph.bus("transport")?.displayed);
        Ok(())
    }

    #[test]
    fn test_one_hop_reaches_the_neighbours() -> Result<(), Error> {
        let mut graph = NetworkBuilder::dummy_network().build();
        graph.focus(&focus_config(&["transport"], Neighbourhood::Uniform(1)))?;

        assert!(graph.bus("transport")?.displayed);
        assert!(graph.bus("oil")?.displayed);
        assert!(graph.bus("electricity")?.displayed);
        assert!(graph.bus("transport")?.loads[0].displayed);
        // the neighbours were reached with no hops left, so their
        // attachments stay unexplored
        assert!(!graph.bus("oil")?.generators[0].displayed);
        Ok(())
    }

    #[test]
    fn test_cycle_traversal_terminates_and_dedups() -> Result<(), Error> {
        let mut graph = cycle_network().build();
        graph.focus(&focus_config(&["a"], Neighbourhood::Uniform(2)))?;

        // each bus visited exactly once
        assert!(graph.buses().all(|b| b.displayed && b.selected));
        // each physical link survives as exactly one displayed copy
        for id in ["ab", "bc", "ca"] {
            let copies: usize = graph
                .buses()
                .map(|b| b.links.iter().filter(|l| l.id == id && l.displayed).count())
                .sum();
            assert_eq!(copies, 1, "link '{}' should survive exactly once", id);
        }
        Ok(())
    }

    #[test]
    fn test_per_focus_radii() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("chain");
        for bus in ["a", "b", "c", "d"] {
            builder.bus(bus);
        }
        builder.link("ab", "a", "b");
        builder.link("bc", "b", "c");
        builder.link("cd", "c", "d");
        let mut graph = builder.build();

        graph.focus(&focus_config(
            &["a", "d"],
            Neighbourhood::PerFocus(vec![0, 1]),
        ))?;

        assert!(graph.bus("a")?.displayed);
        assert!(!graph.bus("b")?.displayed);
        assert!(graph.bus("c")?.displayed);
        assert!(graph.bus("d")?.displayed);
        Ok(())
    }

    #[test]
    fn test_focus_bus_bypasses_filters() -> Result<(), Error> {
        let mut graph = NetworkBuilder::dummy_network().build();
        let mut config = focus_config(&["oil"], Neighbourhood::Uniform(1));
        config.bus_filter = crate::Filter::new("^electricity$")?;
        graph.focus(&config)?;

        // the focus bus itself ignores the bus filter
        assert!(graph.bus("oil")?.selected);
        // but its neighbours do not
        assert!(!graph.bus("transport")?.displayed);
        Ok(())
    }

    #[test]
    fn test_traversal_through_multi_link() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("multi");
        for bus in ["b0", "b1", "b2"] {
            builder.bus(bus);
        }
        builder.multi_link("hub", "b0", &[("b1", 0.9), ("b2", 0.4)]);
        let mut graph = builder.build();

        graph.focus(&focus_config(&["b1"], Neighbourhood::Uniform(2)))?;

        // b1 -> junction mirror branch -> b0, then b0's trunk fans out to b2
        assert!(graph.bus("b1")?.displayed);
        assert!(graph.bus("b0")?.displayed);
        assert!(graph.bus("b2")?.displayed);
        let displayed_branches: usize = graph
            .buses()
            .map(|b| b.branches.iter().filter(|br| br.displayed).count())
            .sum();
        assert_eq!(displayed_branches, 2);
        Ok(())
    }

    #[test]
    fn test_branch_reached_junction_is_rendered() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("multi");
        for bus in ["b0", "b1", "b2"] {
            builder.bus(bus);
        }
        builder.multi_link("hub", "b0", &[("b1", 0.9), ("b2", 0.4)]);
        let mut graph = builder.build();

        // one hop: the mirror branch from b1 reaches b0, which is dequeued
        // with no hops left and never processes its own trunks
        graph.focus(&focus_config(&["b1"], Neighbourhood::Uniform(1)))?;

        let trunks = graph.trunk_renderings();
        assert_eq!(trunks.len(), 1);
        assert_eq!(trunks[0].id, "hub");
        // every branch edge points at a junction the formatter receives
        for edge in graph.edge_renderings() {
            if let crate::EdgeKind::Branch { .. } = edge.kind {
                assert!(trunks.iter().any(|t| t.id == edge.id));
            }
        }
        Ok(())
    }

    #[test]
    fn test_dedup_keeps_the_selected_copy() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("pair");
        builder.bus("a");
        builder.bus("b");
        builder.link("ab", "a", "b");
        let mut graph = builder.build();

        let mut config = focus_config(&["b"], Neighbourhood::Uniform(1));
        config.bus_filter = crate::Filter::new("^a$")?;
        config.include_context = true;
        graph.focus(&config)?;

        // the copy on "a" is context-faded, the copy on "b" is selected;
        // the selected copy survives even though "a" comes first in node
        // order
        assert!(graph.bus("a")?.links.is_empty());
        let survivor = &graph.bus("b")?.links[0];
        assert!(survivor.selected && survivor.displayed);
        Ok(())
    }

    #[test]
    fn test_duplicate_focus_entries_are_visited_once() -> Result<(), Error> {
        let mut graph = cycle_network().build();
        graph.focus(&focus_config(&["a", "a"], Neighbourhood::Uniform(1)))?;

        assert!(graph.bus("a")?.displayed);
        assert!(graph.bus("b")?.displayed);
        assert!(graph.bus("c")?.displayed);
        Ok(())
    }
}
