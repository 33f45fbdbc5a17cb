// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! The rendering selector: flattens an annotated graph into self-contained
//! render records, so the external formatter never re-derives selection or
//! orientation logic.
//!
//! Edge orientation follows a single rule, shared by whole-network and focus
//! modes: bidirectional edges keep their stored orientation and get
//! arrowheads on both ends; otherwise a negative efficiency, when negative
//! efficiencies are not allowed, swaps the endpoints and negates the
//! magnitude, marking the edge as inverted.

use crate::entities::{AttachmentKind, BusCounters, Direction};
use crate::graph::TopologyGraph;

/// How an element is drawn relative to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// The element passed the filters.
    Emphasized,
    /// Context mode retained the element despite the filters.
    Faded,
}

impl Emphasis {
    fn of(selected: bool) -> Self {
        if selected {
            Emphasis::Emphasized
        } else {
            Emphasis::Faded
        }
    }
}

/// The drawing variant of a bus node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeVariant {
    Normal,
    /// The bus is a synthesized placeholder.
    Missing,
}

/// The drawing variant of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeVariant {
    Normal,
    Broken,
    Bidirectional,
    BrokenBidirectional,
    Inverted,
    BrokenAndInverted,
}

/// Maps the three structural edge flags to their drawing variant.
///
/// Bidirectionality wins over inversion: a bidirectional edge is never
/// orientation-swapped, so the two flags cannot meaningfully combine.
fn classify_edge(broken: bool, bidirectional: bool, inverted: bool) -> EdgeVariant {
    match (broken, bidirectional, inverted) {
        (false, false, false) => EdgeVariant::Normal,
        (true, false, false) => EdgeVariant::Broken,
        (false, true, _) => EdgeVariant::Bidirectional,
        (true, true, _) => EdgeVariant::BrokenBidirectional,
        (false, false, true) => EdgeVariant::Inverted,
        (true, false, true) => EdgeVariant::BrokenAndInverted,
    }
}

/// The kind of physical connection an [`EdgeRendering`] stands for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Link,
    /// One branch of a multi-terminal link, drawn from its junction node.
    Branch { trunk_bus: String, terminal: u32 },
    Line,
}

/// A bus node, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRendering {
    pub id: String,
    pub carrier: String,
    pub unit: String,
    pub variant: NodeVariant,
    pub emphasis: Emphasis,
    pub counters: BusCounters,
}

/// A generator, load, or store, ready to draw next to its bus.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentRendering {
    pub id: String,
    pub bus: String,
    pub kind: AttachmentKind,
    pub carrier: String,
    pub attrs: Vec<(String, f64)>,
    pub emphasis: Emphasis,
}

/// The junction node of a multi-terminal link, ready to draw.
///
/// The formatter draws the junction point plus the connector from
/// `trunk_bus` to it; the fan-out edges arrive as [`EdgeRendering`]s of kind
/// [`EdgeKind::Branch`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrunkRendering {
    pub id: String,
    pub trunk_bus: String,
    pub carrier: String,
    pub broken: bool,
    pub emphasis: Emphasis,
}

/// An edge, ready to draw: endpoint order and efficiency magnitude are
/// already resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRendering {
    pub id: String,
    pub kind: EdgeKind,
    pub source: String,
    pub target: String,
    pub carrier: String,
    pub efficiency: f64,
    /// True when the stored orientation was swapped because of a negative
    /// efficiency; the formatter annotates the label.
    pub inverted: bool,
    pub variant: EdgeVariant,
    pub emphasis: Emphasis,
    pub attrs: Vec<(String, f64)>,
}

struct Orientation {
    source: String,
    target: String,
    efficiency: f64,
    inverted: bool,
}

/// Rendering accessors.
impl TopologyGraph {
    /// Resolves the rendering orientation of a directed edge stored as
    /// `from -> to`.
    fn orient(&self, from: &str, to: &str, efficiency: f64, bidirectional: bool) -> Orientation {
        if !bidirectional && !self.negative_efficiency && efficiency < 0.0 {
            Orientation {
                source: to.to_string(),
                target: from.to_string(),
                efficiency: -efficiency,
                inverted: true,
            }
        } else {
            Orientation {
                source: from.to_string(),
                target: to.to_string(),
                efficiency,
                inverted: false,
            }
        }
    }

    /// Returns a render record for every displayed bus.
    pub fn node_renderings(&self) -> Vec<NodeRendering> {
        self.buses()
            .filter(|bus| bus.displayed)
            .map(|bus| NodeRendering {
                id: bus.id.clone(),
                carrier: bus.carrier.clone(),
                unit: bus.unit.clone(),
                variant: if bus.missing {
                    NodeVariant::Missing
                } else {
                    NodeVariant::Normal
                },
                emphasis: Emphasis::of(bus.selected),
                counters: bus.counters,
            })
            .collect()
    }

    /// Returns a render record for every displayed generator, load, and
    /// store.
    pub fn attachment_renderings(&self) -> Vec<AttachmentRendering> {
        let mut renderings = Vec::new();
        for bus in self.buses().filter(|bus| bus.displayed) {
            for attachment in bus
                .generators
                .iter()
                .chain(bus.loads.iter())
                .chain(bus.stores.iter())
                .filter(|a| a.displayed)
            {
                renderings.push(AttachmentRendering {
                    id: attachment.id.clone(),
                    bus: bus.id.clone(),
                    kind: attachment.kind,
                    carrier: attachment.carrier.clone(),
                    attrs: attachment.attrs.clone(),
                    emphasis: Emphasis::of(attachment.selected),
                });
            }
        }
        renderings
    }

    /// Returns a render record for every displayed multi-link junction.
    pub fn trunk_renderings(&self) -> Vec<TrunkRendering> {
        let mut renderings = Vec::new();
        for bus in self.buses().filter(|bus| bus.displayed) {
            for trunk in bus.trunks.iter().filter(|t| t.displayed) {
                renderings.push(TrunkRendering {
                    id: trunk.id.clone(),
                    trunk_bus: bus.id.clone(),
                    carrier: trunk.carrier.clone(),
                    broken: trunk.is_fully_broken(),
                    emphasis: Emphasis::of(trunk.selected),
                });
            }
        }
        renderings
    }

    /// Returns a render record for every displayed mono-link, multi-link
    /// branch, and line.
    ///
    /// The deduplication pass has already reduced every dual-stored edge to
    /// one copy, so every physical connection appears exactly once.
    pub fn edge_renderings(&self) -> Vec<EdgeRendering> {
        let mut renderings = Vec::new();
        for bus in self.buses() {
            for link in bus.links.iter().filter(|l| l.displayed) {
                let (from, to) = match link.direction {
                    Direction::Canonical => (bus.id.as_str(), link.other.as_str()),
                    Direction::Mirror => (link.other.as_str(), bus.id.as_str()),
                };
                let oriented = self.orient(from, to, link.efficiency, link.bidirectional);
                renderings.push(EdgeRendering {
                    id: link.id.clone(),
                    kind: EdgeKind::Link,
                    source: oriented.source,
                    target: oriented.target,
                    carrier: link.carrier.clone(),
                    efficiency: oriented.efficiency,
                    inverted: oriented.inverted,
                    variant: classify_edge(link.missing, link.bidirectional, oriented.inverted),
                    emphasis: Emphasis::of(link.selected),
                    attrs: Vec::new(),
                });
            }
            for branch in bus.branches.iter().filter(|b| b.displayed) {
                // branches are stored junction -> endpoint
                let oriented = self.orient(&branch.id, &branch.endpoint, branch.efficiency, false);
                renderings.push(EdgeRendering {
                    id: branch.id.clone(),
                    kind: EdgeKind::Branch {
                        trunk_bus: branch.trunk_bus.clone(),
                        terminal: branch.terminal,
                    },
                    source: oriented.source,
                    target: oriented.target,
                    carrier: branch.carrier.clone(),
                    efficiency: oriented.efficiency,
                    inverted: oriented.inverted,
                    variant: classify_edge(branch.endpoint_missing, false, oriented.inverted),
                    emphasis: Emphasis::of(branch.selected),
                    attrs: Vec::new(),
                });
            }
            for line in bus.lines.iter().filter(|l| l.displayed) {
                let (source, target) = match line.direction {
                    Direction::Canonical => (bus.id.clone(), line.other.clone()),
                    Direction::Mirror => (line.other.clone(), bus.id.clone()),
                };
                renderings.push(EdgeRendering {
                    id: line.id.clone(),
                    kind: EdgeKind::Line,
                    source,
                    target,
                    carrier: line.carrier.clone(),
                    efficiency: 1.0,
                    inverted: false,
                    variant: classify_edge(line.missing, true, false),
                    emphasis: Emphasis::of(line.selected),
                    attrs: line.attrs.clone(),
                });
            }
        }
        renderings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_utils::NetworkBuilder;
    use crate::{Error, TopologyConfig};

    #[test]
    fn test_edge_classification_table() {
        assert_eq!(classify_edge(false, false, false), EdgeVariant::Normal);
        assert_eq!(classify_edge(true, false, false), EdgeVariant::Broken);
        assert_eq!(classify_edge(false, true, false), EdgeVariant::Bidirectional);
        assert_eq!(
            classify_edge(true, true, false),
            EdgeVariant::BrokenBidirectional
        );
        assert_eq!(classify_edge(false, false, true), EdgeVariant::Inverted);
        assert_eq!(
            classify_edge(true, false, true),
            EdgeVariant::BrokenAndInverted
        );
    }

    #[test]
    fn test_sign_inversion_when_negative_efficiency_is_disabled() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("neg");
        builder.bus("a");
        builder.bus("b");
        builder.link_with("reverse", "a", "b", -0.5, 5.0, 0.0);
        let mut graph = builder.build();

        let config = TopologyConfig {
            negative_efficiency: false,
            ..Default::default()
        };
        graph.select(&config);

        let edges = graph.edge_renderings();
        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.source, "b");
        assert_eq!(edge.target, "a");
        assert_eq!(edge.efficiency, 0.5);
        assert!(edge.inverted);
        assert_eq!(edge.variant, EdgeVariant::Inverted);
        Ok(())
    }

    #[test]
    fn test_negative_efficiency_kept_when_allowed() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("neg");
        builder.bus("a");
        builder.bus("b");
        builder.link_with("reverse", "a", "b", -0.5, 5.0, 0.0);
        let mut graph = builder.build();

        graph.select(&TopologyConfig::default());

        let edges = graph.edge_renderings();
        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert_eq!(edge.efficiency, -0.5);
        assert!(!edge.inverted);
        assert_eq!(edge.variant, EdgeVariant::Normal);
        Ok(())
    }

    #[test]
    fn test_bidirectional_link_is_never_inverted() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("bidi");
        builder.bus("a");
        builder.bus("b");
        builder.link_with("both", "a", "b", 1.0, 0.0, -1.0);
        let mut graph = builder.build();

        let config = TopologyConfig {
            negative_efficiency: false,
            ..Default::default()
        };
        graph.select(&config);

        let edges = graph.edge_renderings();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].variant, EdgeVariant::Bidirectional);
        assert!(!edges[0].inverted);
        Ok(())
    }

    #[test]
    fn test_lines_render_bidirectional() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("lines");
        builder.bus("a");
        builder.bus("b");
        builder.line("wire", "a", "b");
        let mut graph = builder.build();

        graph.select(&TopologyConfig::default());

        let edges = graph.edge_renderings();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].kind, EdgeKind::Line);
        assert_eq!(edges[0].variant, EdgeVariant::Bidirectional);
        assert_eq!(edges[0].efficiency, 1.0);
        Ok(())
    }

    #[test]
    fn test_context_elements_are_faded() -> Result<(), Error> {
        let mut graph = NetworkBuilder::dummy_network().build();
        let config = TopologyConfig {
            generator_filter: crate::Filter::new("^solar$")?,
            include_context: true,
            ..Default::default()
        };
        graph.select(&config);

        let attachments = graph.attachment_renderings();
        let solar = attachments.iter().find(|a| a.id == "solar");
        let oil = attachments.iter().find(|a| a.id == "oil" && a.bus == "oil");
        assert_eq!(solar.map(|a| a.emphasis), Some(Emphasis::Emphasized));
        assert_eq!(oil.map(|a| a.emphasis), Some(Emphasis::Faded));
        Ok(())
    }

    #[test]
    fn test_broken_link_renders_broken() -> Result<(), Error> {
        let mut builder = NetworkBuilder::new("broken");
        builder.bus("a");
        builder.link("dangling", "a", "ghost");
        let mut graph = builder.build();

        graph.select(&TopologyConfig::default());

        let edges = graph.edge_renderings();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].variant, EdgeVariant::Broken);

        let nodes = graph.node_renderings();
        let ghost = nodes.iter().find(|n| n.id == "ghost");
        assert_eq!(ghost.map(|n| n.variant), Some(NodeVariant::Missing));
        Ok(())
    }
}
