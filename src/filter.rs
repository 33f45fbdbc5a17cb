// License: MIT
// Copyright © 2025 pypsa-topology-graph contributors

//! Pattern matchers used to narrow down which buses, components, and edges
//! are selected for rendering.

use regex::Regex;

use crate::Error;

/// An optional pattern matcher for component identifiers and carriers.
///
/// An inactive filter (the default) matches every value, so callers only pay
/// for the filters they configure.
#[derive(Clone, Debug, Default)]
pub struct Filter(Option<Regex>);

impl Filter {
    /// Creates a filter that matches everything.
    pub fn all() -> Self {
        Filter(None)
    }

    /// Creates a filter from the given regular expression pattern.
    ///
    /// Returns an error if the pattern is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Regex::new(pattern).map(|re| Filter(Some(re))).map_err(|e| {
            Error::invalid_filter(format!("Invalid filter pattern '{}': {}", pattern, e))
        })
    }

    /// Returns true if a pattern has been configured.
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    /// Returns true if the given value matches the filter.
    pub fn matches(&self, value: &str) -> bool {
        self.0.as_ref().map_or(true, |re| re.is_match(value))
    }
}
