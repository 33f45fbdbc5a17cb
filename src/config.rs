// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! This module contains the configuration options for annotating a
//! `TopologyGraph`.

use crate::Filter;

/// The maximum number of edge-hops a focused traversal will follow outward
/// from each focus bus.
#[derive(Clone, Debug, PartialEq)]
pub enum Neighbourhood {
    /// One radius applied to every focus bus.
    Uniform(i64),
    /// One radius per focus bus, aligned with [`TopologyConfig::focus`].
    PerFocus(Vec<i64>),
}

impl Default for Neighbourhood {
    fn default() -> Self {
        Neighbourhood::Uniform(0)
    }
}

/// Configuration options for selecting and traversing a `TopologyGraph`.
#[derive(Clone, Debug)]
pub struct TopologyConfig {
    /// Buses to focus on.  When empty, the whole network is selected instead
    /// of performing a neighbourhood-bounded traversal.
    pub focus: Vec<String>,

    /// Traversal radius for the focus buses.
    pub neighbourhood: Neighbourhood,

    /// Filter on bus identifiers.
    pub bus_filter: Filter,

    /// Filter on generator identifiers.
    pub generator_filter: Filter,

    /// Filter on load identifiers.
    pub load_filter: Filter,

    /// Filter on store identifiers.
    pub store_filter: Filter,

    /// Filter on link identifiers, applied to mono-links and to multi-link
    /// trunks and branches alike.
    pub link_filter: Filter,

    /// Filter on line identifiers.
    pub line_filter: Filter,

    /// Filter on carriers, applied to every entity that declares one.
    pub carrier_filter: Filter,

    /// Whether edges with a negative efficiency keep their stored orientation.
    /// When disabled, such edges are rendered with swapped endpoints and a
    /// positive efficiency, and are flagged as inverted.
    pub negative_efficiency: bool,

    /// Whether placeholder buses and the edges touching them are considered
    /// at all.
    pub include_broken: bool,

    /// Whether entities that fail a filter are still emitted in a faded
    /// "context" state instead of being omitted.
    pub include_context: bool,
}

impl Default for TopologyConfig {
    /// The library defaults: no focus, no filters, negative efficiencies
    /// displayed as-is, broken entities included, context mode off.
    fn default() -> Self {
        TopologyConfig {
            focus: Vec::new(),
            neighbourhood: Neighbourhood::default(),
            bus_filter: Filter::all(),
            generator_filter: Filter::all(),
            load_filter: Filter::all(),
            store_filter: Filter::all(),
            link_filter: Filter::all(),
            line_filter: Filter::all(),
            carrier_filter: Filter::all(),
            negative_efficiency: true,
            include_broken: true,
            include_context: false,
        }
    }
}
