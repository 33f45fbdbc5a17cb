// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! The component table loader: normalizes table rows into typed records
//! before graph assembly.
//!
//! Link endpoint and efficiency columns are discovered by the `bus<N>` /
//! `efficiency<N>` naming convention rather than assumed, so networks with
//! any number of link terminals load without configuration.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Table;

static BUS_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^bus([0-9]+)$").expect("static pattern"));

/// A declared bus.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BusRecord {
    pub(crate) id: String,
    pub(crate) carrier: String,
    pub(crate) unit: String,
}

/// A component owned by a single bus: a generator, load, or store.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AttachmentRecord {
    pub(crate) id: String,
    pub(crate) bus: String,
    pub(crate) carrier: String,
    pub(crate) attrs: Vec<(String, f64)>,
}

/// One specified terminal of a link, with its resolved efficiency.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinkEndpoint {
    pub(crate) terminal: u32,
    pub(crate) bus: String,
    pub(crate) efficiency: f64,
}

/// A link row, before it is classified as a mono-link or a multi-terminal
/// link.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinkRecord {
    pub(crate) id: String,
    pub(crate) carrier: String,
    /// The terminals this link declares a value for, ordered by number.
    /// An empty string is a declared-but-blank reference.
    pub(crate) endpoints: Vec<LinkEndpoint>,
    pub(crate) efficiency: f64,
    pub(crate) marginal_cost: f64,
    pub(crate) p_min_pu: f64,
}

impl LinkRecord {
    /// Returns the bus reference of the given terminal, or an empty string if
    /// the terminal is not specified.
    pub(crate) fn endpoint_bus(&self, terminal: u32) -> &str {
        self.endpoints
            .iter()
            .find(|e| e.terminal == terminal)
            .map_or("", |e| e.bus.as_str())
    }

    /// Returns true if the row declares three or more terminals.
    pub(crate) fn is_multi(&self) -> bool {
        self.endpoints.len() >= 3
    }
}

/// A transmission line row.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LineRecord {
    pub(crate) id: String,
    pub(crate) bus0: String,
    pub(crate) bus1: String,
    pub(crate) carrier: String,
    pub(crate) attrs: Vec<(String, f64)>,
}

fn str_or_empty(table: &Table, column: &str, row: usize) -> String {
    // the source model stores undeclared units as the literal string "None"
    match table.str_at(column, row) {
        Some("None") | None => String::new(),
        Some(value) => value.to_string(),
    }
}

fn numeric_attrs(table: &Table, row: usize, consumed: &[&str]) -> Vec<(String, f64)> {
    table
        .column_names()
        .filter(|name| !consumed.contains(name))
        .filter_map(|name| table.num_at(name, row).map(|n| (name.to_string(), n)))
        .collect()
}

pub(crate) fn load_buses(table: &Table) -> Vec<BusRecord> {
    table
        .ids()
        .iter()
        .enumerate()
        .map(|(row, id)| BusRecord {
            id: id.clone(),
            carrier: str_or_empty(table, "carrier", row),
            unit: str_or_empty(table, "unit", row),
        })
        .collect()
}

pub(crate) fn load_attachments(table: &Table) -> Vec<AttachmentRecord> {
    table
        .ids()
        .iter()
        .enumerate()
        .map(|(row, id)| AttachmentRecord {
            id: id.clone(),
            bus: str_or_empty(table, "bus", row),
            carrier: str_or_empty(table, "carrier", row),
            attrs: numeric_attrs(table, row, &["bus", "carrier"]),
        })
        .collect()
}

pub(crate) fn load_links(table: &Table) -> Vec<LinkRecord> {
    // discover the terminals this table declares
    let mut bus_columns: Vec<(u32, String)> = table
        .column_names()
        .filter_map(|name| {
            BUS_COLUMN.captures(name).and_then(|c| {
                c.get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .map(|terminal| (terminal, name.to_string()))
            })
        })
        .collect();
    bus_columns.sort_by_key(|(terminal, _)| *terminal);

    let has_base_efficiency = table.has_column("efficiency");

    table
        .ids()
        .iter()
        .enumerate()
        .map(|(row, id)| {
            let endpoints = bus_columns
                .iter()
                .filter_map(|(terminal, column)| {
                    table.str_at(column, row).map(|bus| LinkEndpoint {
                        terminal: *terminal,
                        bus: bus.to_string(),
                        efficiency: terminal_efficiency(table, row, *terminal, has_base_efficiency),
                    })
                })
                .collect();
            LinkRecord {
                id: id.clone(),
                carrier: str_or_empty(table, "carrier", row),
                endpoints,
                efficiency: table.num_at("efficiency", row).unwrap_or(1.0),
                marginal_cost: table.num_at("marginal_cost", row).unwrap_or(0.0),
                p_min_pu: table.num_at("p_min_pu", row).unwrap_or(0.0),
            }
        })
        .collect()
}

/// Resolves the efficiency of one link terminal.
///
/// Terminal 0 is the trunk root and has no efficiency of its own.  Terminal 1
/// reads the plain `efficiency` column, terminal `k` the `efficiency<k>`
/// column.  Undeclared columns and malformed cells fall back to `1.0` so that
/// loading stays total.
fn terminal_efficiency(table: &Table, row: usize, terminal: u32, has_base: bool) -> f64 {
    match terminal {
        0 => 1.0,
        1 if has_base => table.num_at("efficiency", row).unwrap_or(1.0),
        1 => 1.0,
        k => {
            let column = format!("efficiency{}", k);
            if table.has_column(&column) {
                table.num_at(&column, row).unwrap_or(1.0)
            } else {
                1.0
            }
        }
    }
}

pub(crate) fn load_lines(table: &Table) -> Vec<LineRecord> {
    table
        .ids()
        .iter()
        .enumerate()
        .map(|(row, id)| LineRecord {
            id: id.clone(),
            bus0: str_or_empty(table, "bus0", row),
            bus1: str_or_empty(table, "bus1", row),
            carrier: str_or_empty(table, "carrier", row),
            attrs: numeric_attrs(table, row, &["bus0", "bus1", "carrier"]),
        })
        .collect()
}
