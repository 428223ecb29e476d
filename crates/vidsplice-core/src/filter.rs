//! Filter descriptors.
//!
//! A [`Filter`] is threaded through to the composition untouched; pixel work
//! belongs to whichever renderer consumes it. `None` at the session level
//! means passthrough, which is not the same thing as the `identity` filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque visual-effect descriptor: a catalog id plus numeric parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    params: BTreeMap<String, f64>,
}

impl Filter {
    pub const GRAYSCALE: &'static str = "grayscale";
    pub const SEPIA: &'static str = "sepia";
    pub const IDENTITY: &'static str = "identity";

    /// A filter with no parameters.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn grayscale() -> Self {
        Self::new(Self::GRAYSCALE)
    }

    pub fn sepia() -> Self {
        Self::new(Self::SEPIA).with_param("intensity", 1.0)
    }

    pub fn identity() -> Self {
        Self::new(Self::IDENTITY)
    }

    /// Set (or replace) a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn param(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    pub fn params(&self) -> &BTreeMap<String, f64> {
        &self.params
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// The set of filters a front end can offer.
#[derive(Debug, Clone)]
pub struct FilterCatalog {
    filters: Vec<Filter>,
}

impl FilterCatalog {
    /// Catalog with the built-in filters.
    pub fn builtin() -> Self {
        Self {
            filters: vec![Filter::grayscale(), Filter::sepia(), Filter::identity()],
        }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Find a filter by id. Returns a copy so callers can tweak parameters.
    pub fn find(&self, id: &str) -> Option<Filter> {
        self.filters.iter().find(|f| f.id == id).cloned()
    }

    /// Add a filter, replacing any existing entry with the same id.
    pub fn register(&mut self, filter: Filter) {
        self.filters.retain(|f| f.id != filter.id);
        self.filters.push(filter);
    }
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
