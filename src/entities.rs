// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! The typed entities a `TopologyGraph` is made of.
//!
//! Mono-links, multi-link branches, and lines are stored twice during
//! assembly, once on each endpoint bus, so traversal can walk an edge from
//! either end.  The [`Direction`] flag tells the two copies apart; only the
//! canonical copy represents the stored `bus0 -> bus1` orientation.

/// Which copy of a dual-stored edge this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The copy on `bus0`, representing the stored `bus0 -> bus1` orientation.
    Canonical,
    /// The copy on `bus1`, pointing back at `bus0`.
    Mirror,
}

/// The kind of component attached to a bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttachmentKind {
    Generator,
    Load,
    Store,
}

impl AttachmentKind {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Generator => "Generator",
            AttachmentKind::Load => "Load",
            AttachmentKind::Store => "Store",
        }
    }
}

/// A generator, load, or store owned by exactly one bus.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub id: String,
    pub kind: AttachmentKind,
    pub carrier: String,
    /// Free-form numeric attributes, passed through to the formatter.
    pub attrs: Vec<(String, f64)>,
    pub selected: bool,
    pub displayed: bool,
}

/// One endpoint's copy of a two-terminal link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkEnd {
    pub id: String,
    /// The bus at the other end of the link.
    pub other: String,
    pub carrier: String,
    pub efficiency: f64,
    /// Derived at assembly from the exact predicate
    /// `efficiency == 1 && marginal_cost == 0 && p_min_pu == -1`.
    pub bidirectional: bool,
    /// True if either endpoint bus is a synthesized placeholder.
    pub missing: bool,
    pub direction: Direction,
    pub selected: bool,
    pub displayed: bool,
}

/// The junction node of a multi-terminal link, owned by its `bus0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Trunk {
    pub id: String,
    pub carrier: String,
    /// Number of branches fanning out of the junction.
    pub count: usize,
    /// Number of branches whose far endpoint bus is a placeholder.
    pub missing: usize,
    pub selected: bool,
    pub displayed: bool,
}

impl Trunk {
    /// A trunk counts as fully broken when every branch's far endpoint bus is
    /// a placeholder.
    pub fn is_fully_broken(&self) -> bool {
        self.count > 0 && self.missing == self.count
    }
}

/// One endpoint's copy of a multi-link branch: junction to endpoint bus.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    /// The identifier of the multi-terminal link this branch belongs to, and
    /// of its junction node.
    pub id: String,
    /// The bus owning the trunk junction.
    pub trunk_bus: String,
    /// The terminal number (`bus<N>`) this branch was declared under.
    pub terminal: u32,
    /// The far endpoint bus of the branch.
    pub endpoint: String,
    pub carrier: String,
    pub efficiency: f64,
    /// True if the endpoint bus is a synthesized placeholder.
    pub endpoint_missing: bool,
    pub direction: Direction,
    pub selected: bool,
    pub displayed: bool,
}

/// One endpoint's copy of a transmission line.
#[derive(Clone, Debug, PartialEq)]
pub struct LineEnd {
    pub id: String,
    /// The bus at the other end of the line.
    pub other: String,
    pub carrier: String,
    /// Free-form numeric attributes, passed through to the formatter.
    pub attrs: Vec<(String, f64)>,
    /// True if either endpoint bus is a synthesized placeholder.
    pub missing: bool,
    pub direction: Direction,
    pub selected: bool,
    pub displayed: bool,
}

/// Per-bus summary counters, accumulated once per displayed component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusCounters {
    pub generators: usize,
    pub loads: usize,
    pub stores: usize,
    pub incoming_links: usize,
    pub outgoing_links: usize,
    pub lines: usize,
}

/// A connection point of the network, with the components and edge copies
/// attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    pub id: String,
    pub carrier: String,
    /// Display-only unit of the bus, may be empty.
    pub unit: String,
    /// True if the bus was synthesized for a dangling or blank reference.
    pub missing: bool,
    pub selected: bool,
    pub displayed: bool,
    pub counters: BusCounters,
    pub generators: Vec<Attachment>,
    pub loads: Vec<Attachment>,
    pub stores: Vec<Attachment>,
    pub links: Vec<LinkEnd>,
    pub trunks: Vec<Trunk>,
    pub branches: Vec<Branch>,
    pub lines: Vec<LineEnd>,
}

impl Bus {
    pub(crate) fn new(id: impl Into<String>, carrier: String, unit: String) -> Self {
        Bus {
            id: id.into(),
            carrier,
            unit,
            missing: false,
            selected: false,
            displayed: false,
            counters: BusCounters::default(),
            generators: Vec::new(),
            loads: Vec::new(),
            stores: Vec::new(),
            links: Vec::new(),
            trunks: Vec::new(),
            branches: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub(crate) fn placeholder(id: impl Into<String>) -> Self {
        let mut bus = Bus::new(id, String::new(), String::new());
        bus.missing = true;
        bus
    }
}
