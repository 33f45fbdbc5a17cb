// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! The input boundary of the library: columnar component tables and the
//! `NetworkModel` that groups them.
//!
//! The tables mirror the dataframes of the source network model.  Columns are
//! discovered by name at load time and may be absent; an absent column or an
//! `Na` cell simply means "no declared value".

use std::collections::BTreeMap;

/// A single table cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A string cell, possibly empty.
    Str(String),
    /// A numeric cell.
    Num(f64),
    /// A missing value.
    Na,
}

impl Value {
    /// Returns the cell as a string, if it holds one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the cell as a number, if it holds one.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true if the cell holds no value.
    pub fn is_na(&self) -> bool {
        matches!(self, Value::Na)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

/// A columnar component table: an index of row identifiers plus named
/// columns of cells.
///
/// Rows may declare values for any subset of the columns; the table backfills
/// `Na` cells so that every column always has one cell per row.
#[derive(Clone, Debug, Default)]
pub struct Table {
    index: Vec<String>,
    columns: BTreeMap<String, Vec<Value>>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Table::default()
    }

    /// Returns the number of rows in the table.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the row identifiers, in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.index
    }

    /// Returns true if the table declares the given column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns the declared column names, in lexicographic order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Returns the cell at the given column and row, if the column exists.
    pub fn value_at(&self, column: &str, row: usize) -> Option<&Value> {
        self.columns.get(column).and_then(|cells| cells.get(row))
    }

    /// Returns the string cell at the given column and row, if any.
    pub fn str_at(&self, column: &str, row: usize) -> Option<&str> {
        self.value_at(column, row).and_then(Value::as_str)
    }

    /// Returns the numeric cell at the given column and row, if any.
    pub fn num_at(&self, column: &str, row: usize) -> Option<f64> {
        self.value_at(column, row).and_then(Value::as_num)
    }

    /// Appends a row with the given identifier and cell values.
    ///
    /// Columns not named in `values` get an `Na` cell for this row; columns
    /// first seen here get `Na` cells backfilled for all earlier rows.
    pub fn push_row<'a>(
        &mut self,
        id: impl Into<String>,
        values: impl IntoIterator<Item = (&'a str, Value)>,
    ) {
        let row = self.index.len();
        self.index.push(id.into());
        for (name, value) in values {
            let cells = self
                .columns
                .entry(name.to_string())
                .or_insert_with(|| vec![Value::Na; row]);
            if cells.len() <= row {
                cells.push(value);
            } else {
                cells[row] = value;
            }
        }
        for cells in self.columns.values_mut() {
            if cells.len() <= row {
                cells.push(Value::Na);
            }
        }
    }
}

/// The component tables of one network, plus its display name.
#[derive(Clone, Debug, Default)]
pub struct NetworkModel {
    /// Display name of the network, passed through to the formatter.
    pub name: String,
    /// The bus table.
    pub buses: Table,
    /// The generator table.
    pub generators: Table,
    /// The load table.
    pub loads: Table,
    /// The store table.
    pub stores: Table,
    /// The link table, covering mono-links and multi-terminal links.
    pub links: Table,
    /// The line table.
    pub lines: Table,
}

impl NetworkModel {
    /// Creates an empty network model with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        NetworkModel {
            name: name.into(),
            ..Default::default()
        }
    }
}
