//! In-memory table data.
//!
//! A [`Dataset`] maps table names to [`Table`]s. A table whose schema declares primary-key
//! fields is [`Table::Keyed`]: an ordered map from key tuple to data-field [`Row`]. A table
//! without key fields is [`Table::Unkeyed`]: an ordered list of rows.
//!
//! [`Dataset::validate`] checks a dataset against its [`Schema`]; the encoder calls it
//! before writing anything.
//!
//! ## Examples
//!
//! ```rust
//! use opl_dat::{key, row, Dataset, Schema, Table, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(TableSchema::new("arcs", ["source", "destination"], ["capacity"]).unwrap())
//!     .unwrap();
//!
//! let mut dataset = Dataset::new();
//! dataset.insert_table(
//!     "arcs",
//!     Table::keyed([(key!["Detroit", "Boston"], row! { "capacity" => 100 })]),
//! );
//! assert!(dataset.validate(&schema).is_ok());
//! ```

use crate::schema::TableSchema;
use crate::{Error, Result, Row, Scalar, Schema};
use indexmap::IndexMap;

/// A primary-key tuple, one value per key field.
pub type Key = Vec<Scalar>;

/// Table blocks exactly as scanned: name to rows of values, in text order.
pub type RawTables = IndexMap<String, Vec<Vec<Scalar>>>;

/// Rows of one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Table {
    Keyed(IndexMap<Key, Row>),
    Unkeyed(Vec<Row>),
}

impl Table {
    /// Builds a keyed table. Later entries replace earlier ones with an equal key.
    pub fn keyed<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Key, Row)>,
    {
        Table::Keyed(rows.into_iter().collect())
    }

    /// Builds an unkeyed table.
    pub fn unkeyed<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Row>,
    {
        Table::Unkeyed(rows.into_iter().collect())
    }

    /// An empty table of the shape the schema calls for.
    #[must_use]
    pub fn empty_for(schema: &TableSchema) -> Self {
        if schema.is_keyed() {
            Table::Keyed(IndexMap::new())
        } else {
            Table::Unkeyed(Vec::new())
        }
    }

    #[must_use]
    pub fn is_keyed(&self) -> bool {
        matches!(self, Table::Keyed(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Table::Keyed(rows) => rows.len(),
            Table::Unkeyed(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a row by key. Always `None` for unkeyed tables.
    #[must_use]
    pub fn get(&self, key: &[Scalar]) -> Option<&Row> {
        match self {
            Table::Keyed(rows) => rows.get(key),
            Table::Unkeyed(_) => None,
        }
    }

    /// Iterates `(key, row)` pairs in order; unkeyed rows come with an empty key.
    pub fn rows(&self) -> Box<dyn Iterator<Item = (&[Scalar], &Row)> + '_> {
        match self {
            Table::Keyed(rows) => Box::new(rows.iter().map(|(k, r)| (k.as_slice(), r))),
            Table::Unkeyed(rows) => {
                let no_key: &[Scalar] = &[];
                Box::new(rows.iter().map(move |r| (no_key, r)))
            }
        }
    }

    fn map_rows<F>(&self, mut f: F) -> Table
    where
        F: FnMut(&Row) -> Row,
    {
        match self {
            Table::Keyed(rows) => Table::Keyed(rows.iter().map(|(k, r)| (k.clone(), f(r))).collect()),
            Table::Unkeyed(rows) => Table::Unkeyed(rows.iter().map(f).collect()),
        }
    }

    fn validate(&self, schema: &TableSchema) -> Result<()> {
        let name = schema.name();
        if self.is_keyed() != schema.is_keyed() {
            let expected = if schema.is_keyed() { "keyed" } else { "unkeyed" };
            return Err(Error::validation(
                name,
                format!("expected an {} table", expected),
            ));
        }
        let key_arity = schema.primary_key_fields().len();
        for (key, row) in self.rows() {
            if key.len() != key_arity {
                return Err(Error::validation(
                    name,
                    format!(
                        "primary key {} has {} values, expected {}",
                        crate::value::format_key(key),
                        key.len(),
                        key_arity
                    ),
                ));
            }
            if let Some(missing) = schema.data_fields().iter().find(|f| !row.contains_field(f)) {
                return Err(Error::validation(
                    name,
                    format!("row is missing data field {}", missing),
                ));
            }
            if let Some(extra) = row
                .fields()
                .find(|f| !schema.data_fields().iter().any(|d| d == *f))
            {
                return Err(Error::validation(
                    name,
                    format!("row has unexpected field {}", extra),
                ));
            }
        }
        Ok(())
    }
}

/// A collection of named tables.
///
/// Decoded datasets may also carry [`Dataset::unmatched`] blocks: tables found in the text
/// that the schema does not declare, kept as scanned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    tables: IndexMap<String, Table>,
    unmatched: RawTables,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a table, returning the one it replaced.
    pub fn insert_table(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Returns an iterator over the tables, in insertion order.
    pub fn tables(&self) -> indexmap::map::Iter<'_, String, Table> {
        self.tables.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Blocks decoded from text whose names the schema does not declare.
    #[must_use]
    pub fn unmatched(&self) -> &RawTables {
        &self.unmatched
    }

    pub(crate) fn set_unmatched(&mut self, unmatched: RawTables) {
        self.unmatched = unmatched;
    }

    /// Checks that the dataset has exactly the schema's tables and that every row has
    /// exactly the declared fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending table.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for table_schema in schema.tables() {
            let table = self
                .tables
                .get(table_schema.name())
                .ok_or_else(|| Error::validation(table_schema.name(), "table is missing"))?;
            table.validate(table_schema)?;
        }
        if let Some(extra) = self.tables.keys().find(|t| schema.table(t).is_none()) {
            return Err(Error::validation(extra, "table is not part of the schema"));
        }
        Ok(())
    }

    /// Returns a copy with every data-field name in table `t` renamed through
    /// `rename(t, field)`.
    pub(crate) fn rename_fields<F>(&self, mut rename: F) -> Dataset
    where
        F: FnMut(&str, &str) -> String,
    {
        let tables = self
            .tables
            .iter()
            .map(|(name, table)| {
                let renamed = table.map_rows(|row| row.renamed(|field| rename(name, field)));
                (name.clone(), renamed)
            })
            .collect();
        Dataset {
            tables,
            unmatched: self.unmatched.clone(),
        }
    }
}
