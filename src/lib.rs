// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

/*!
# PyPSA Topology Graph

This is a library for turning the tabular description of an energy-system
network (buses, generators, loads, stores, links, lines) into a bus-centric
directed graph annotated for rendering by an external graph-layout tool.

A graph representation makes it easy to reason about how the components of
the network connect, to carve out the neighbourhood of a few buses of
interest, and to hand a formatter everything it needs without it re-deriving
any selection or orientation logic.

## Assembling a graph

The main struct is [`TopologyGraph`], instances of which are created by
passing a [`NetworkModel`], six columnar [`Table`]s plus a display name, to
the [`assemble`][TopologyGraph::assemble] method.

Assembly is total: dangling or blank bus references never fail, they
synthesize placeholder buses flagged as missing, and anomalies are logged as
warnings.  Multi-terminal links fan out into a junction ("trunk") plus one
branch per terminal.

## Selecting what to draw

A freshly assembled graph is annotated exactly once, with either:

- [`select`][TopologyGraph::select]: whole-network mode, applying the
  filters of a [`TopologyConfig`] to every bus and component; or
- [`focus`][TopologyGraph::focus]: a breadth-limited traversal outward from
  one or more focus buses, bounded by a [`Neighbourhood`] radius.

Both modes share the same orientation rule for negative-efficiency links and
the same deduplication pass over dual-stored edges.

## Rendering

The annotated graph is flattened into self-contained render records through
[`node_renderings`][TopologyGraph::node_renderings],
[`attachment_renderings`][TopologyGraph::attachment_renderings],
[`trunk_renderings`][TopologyGraph::trunk_renderings], and
[`edge_renderings`][TopologyGraph::edge_renderings].
*/

mod config;
pub use config::{Neighbourhood, TopologyConfig};

mod entities;
pub use entities::{
    Attachment, AttachmentKind, Branch, Bus, BusCounters, Direction, LineEnd, LinkEnd, Trunk,
};

mod error;
pub use error::Error;

mod filter;
pub use filter::Filter;

mod graph;
pub use graph::{iterators, TopologyGraph};

mod model;
pub use model::{NetworkModel, Table, Value};

mod records;

mod render;
pub use render::{
    AttachmentRendering, EdgeKind, EdgeRendering, EdgeVariant, Emphasis, NodeRendering,
    NodeVariant, TrunkRendering,
};
