//! Ordered field-to-value map for table rows.
//!
//! This module provides [`Row`], a wrapper around [`IndexMap`] that maps data-field names
//! to [`Scalar`] values while keeping insertion order, so rows built in schema order
//! print and compare predictably.
//!
//! ## Examples
//!
//! ```rust
//! use opl_dat::{Row, Scalar};
//!
//! let mut row = Row::new();
//! row.insert("capacity".to_string(), Scalar::from(100));
//! row.insert("cost".to_string(), Scalar::from(2.5));
//!
//! assert_eq!(row.len(), 2);
//! assert_eq!(row.get("capacity").and_then(|v| v.as_i64()), Some(100));
//! ```

use crate::Scalar;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered map of data-field names to values.
///
/// Equality ignores insertion order: two rows are equal when they hold the same
/// fields with equal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(IndexMap<String, Scalar>);

impl Row {
    /// Creates an empty `Row`.
    #[must_use]
    pub fn new() -> Self {
        Row(IndexMap::new())
    }

    /// Creates an empty `Row` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Row(IndexMap::with_capacity(capacity))
    }

    /// Inserts a field value into the row.
    ///
    /// If the row already contained this field, the old value is returned.
    pub fn insert(&mut self, field: String, value: Scalar) -> Option<Scalar> {
        self.0.insert(field, value)
    }

    /// Returns a reference to the value of the field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    /// Returns `true` if the row has a value for the field.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the number of fields in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn fields(&self) -> indexmap::map::Keys<'_, String, Scalar> {
        self.0.keys()
    }

    /// Returns an iterator over the field/value pairs, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    /// Returns a copy of the row with every field renamed through `rename`.
    pub(crate) fn renamed<F>(&self, mut rename: F) -> Row
    where
        F: FnMut(&str) -> String,
    {
        self.0
            .iter()
            .map(|(field, value)| (rename(field.as_str()), value.clone()))
            .collect()
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for Row {
    type Item = (String, Scalar);
    type IntoIter = indexmap::map::IntoIter<String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = indexmap::map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Scalar)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Scalar)>>(iter: T) -> Self {
        Row(IndexMap::from_iter(iter))
    }
}
