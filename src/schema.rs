//! Table and schema definitions.
//!
//! A [`Schema`] is an ordered set of [`TableSchema`]s. Each table declares its primary-key
//! fields, its data fields, optional per-field [`FieldKind`]s and per-data-field defaults.
//! Tables with no primary-key fields hold an ordered list of rows instead of a keyed map.
//!
//! Schemas are checked once, when built: table names are unique, field names are unique
//! within a table, and kinds/defaults refer to declared fields. Deserialized schemas go
//! through the same checks.
//!
//! ## Examples
//!
//! ```rust
//! use opl_dat::{FieldKind, Schema, TableSchema};
//!
//! let arcs = TableSchema::new("arcs", ["source", "destination"], ["capacity"])
//!     .unwrap()
//!     .with_kind("capacity", FieldKind::Numeric)
//!     .unwrap();
//!
//! let mut schema = Schema::new();
//! schema.add_table(arcs).unwrap();
//! assert!(schema.table("arcs").unwrap().is_keyed());
//! ```

use crate::{Error, Result, Row, Scalar};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Declared type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Text,
}

/// Shape of a table.
///
/// Only `Standard` tables have a representation in the text format; `Generic` tables
/// (open-ended columns) and `Generator` tables (derived on demand) are rejected by the
/// encoder and the declaration generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    #[default]
    Standard,
    Generic,
    Generator,
}

#[derive(Deserialize)]
struct TableSchemaDef {
    name: String,
    #[serde(default)]
    primary_key_fields: Vec<String>,
    #[serde(default)]
    data_fields: Vec<String>,
    #[serde(default)]
    kinds: IndexMap<String, FieldKind>,
    #[serde(default)]
    defaults: IndexMap<String, Scalar>,
    #[serde(default)]
    table_kind: TableKind,
}

/// Definition of a single table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableSchemaDef")]
pub struct TableSchema {
    name: String,
    primary_key_fields: Vec<String>,
    data_fields: Vec<String>,
    kinds: IndexMap<String, FieldKind>,
    defaults: IndexMap<String, Scalar>,
    table_kind: TableKind,
}

impl TryFrom<TableSchemaDef> for TableSchema {
    type Error = Error;

    fn try_from(def: TableSchemaDef) -> Result<Self> {
        let mut table = TableSchema::new(def.name, def.primary_key_fields, def.data_fields)?;
        table.table_kind = def.table_kind;
        for (field, kind) in def.kinds {
            table.set_kind(&field, kind)?;
        }
        for (field, value) in def.defaults {
            table.set_default(&field, value)?;
        }
        Ok(table)
    }
}

impl TableSchema {
    /// Creates a table with the given key and data fields.
    ///
    /// # Errors
    ///
    /// Fails if the name is blank, the table has no fields at all, or a field name is
    /// repeated (within or across the key and data lists).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::TableSchema;
    ///
    /// assert!(TableSchema::new("arcs", ["source"], ["source"]).is_err());
    /// let nodes = TableSchema::new("nodes", ["name"], Vec::<String>::new()).unwrap();
    /// assert_eq!(nodes.field_count(), 1);
    /// ```
    pub fn new<K, D>(name: impl Into<String>, primary_key_fields: K, data_fields: D) -> Result<Self>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_schema("table name can't be blank"));
        }
        let primary_key_fields: Vec<String> =
            primary_key_fields.into_iter().map(Into::into).collect();
        let data_fields: Vec<String> = data_fields.into_iter().map(Into::into).collect();
        if primary_key_fields.is_empty() && data_fields.is_empty() {
            return Err(Error::invalid_schema(format!("table {} has no fields", name)));
        }

        let mut seen = IndexSet::new();
        for field in primary_key_fields.iter().chain(&data_fields) {
            if field.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "table {} has a blank field name",
                    name
                )));
            }
            if !seen.insert(field.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "field {} appears more than once in table {}",
                    field, name
                )));
            }
        }

        Ok(TableSchema {
            name,
            primary_key_fields,
            data_fields,
            kinds: IndexMap::new(),
            defaults: IndexMap::new(),
            table_kind: TableKind::Standard,
        })
    }

    /// Declares the kind of a key or data field.
    pub fn set_kind(&mut self, field: &str, kind: FieldKind) -> Result<()> {
        if !self.has_field(field) {
            return Err(Error::invalid_schema(format!(
                "cannot set kind of unknown field {} in table {}",
                field, self.name
            )));
        }
        self.kinds.insert(field.to_string(), kind);
        Ok(())
    }

    /// Declares the default value of a data field.
    pub fn set_default(&mut self, field: &str, value: Scalar) -> Result<()> {
        if !self.data_fields.iter().any(|f| f == field) {
            return Err(Error::invalid_schema(format!(
                "cannot set default of {} in table {}: not a data field",
                field, self.name
            )));
        }
        self.defaults.insert(field.to_string(), value);
        Ok(())
    }

    /// Builder form of [`TableSchema::set_kind`].
    pub fn with_kind(mut self, field: &str, kind: FieldKind) -> Result<Self> {
        self.set_kind(field, kind)?;
        Ok(self)
    }

    /// Builder form of [`TableSchema::set_default`].
    pub fn with_default(mut self, field: &str, value: impl Into<Scalar>) -> Result<Self> {
        self.set_default(field, value.into())?;
        Ok(self)
    }

    #[must_use]
    pub fn with_table_kind(mut self, table_kind: TableKind) -> Self {
        self.table_kind = table_kind;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn primary_key_fields(&self) -> &[String] {
        &self.primary_key_fields
    }

    #[must_use]
    pub fn data_fields(&self) -> &[String] {
        &self.data_fields
    }

    #[must_use]
    pub fn table_kind(&self) -> TableKind {
        self.table_kind
    }

    /// Returns `true` if rows are addressed by a primary key.
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        !self.primary_key_fields.is_empty()
    }

    /// Number of values in one serialized row (key fields plus data fields).
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.primary_key_fields.len() + self.data_fields.len()
    }

    /// Key fields followed by data fields, in declaration order.
    pub fn all_fields(&self) -> impl Iterator<Item = &String> {
        self.primary_key_fields.iter().chain(&self.data_fields)
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.all_fields().any(|f| f == field)
    }

    /// Declared kind of a field, or `None` when untyped.
    #[must_use]
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.kinds.get(field).copied()
    }

    /// Default value of a data field; numeric zero unless declared otherwise.
    #[must_use]
    pub fn default_of(&self, field: &str) -> Scalar {
        self.defaults
            .get(field)
            .cloned()
            .unwrap_or(Scalar::from(0))
    }

    /// A data-field row filled with default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::{Scalar, TableSchema};
    ///
    /// let table = TableSchema::new("arcs", ["source"], ["capacity", "label"])
    ///     .unwrap()
    ///     .with_default("label", "none")
    ///     .unwrap();
    /// let row = table.default_row();
    /// assert_eq!(row.get("capacity"), Some(&Scalar::from(0)));
    /// assert_eq!(row.get("label"), Some(&Scalar::from("none")));
    /// ```
    #[must_use]
    pub fn default_row(&self) -> Row {
        self.data_fields
            .iter()
            .map(|f| (f.clone(), self.default_of(f)))
            .collect()
    }

    /// Returns a copy with every field renamed, carrying kinds and defaults over to the
    /// new names.
    pub(crate) fn renamed<F>(&self, mut rename: F) -> TableSchema
    where
        F: FnMut(&str) -> String,
    {
        let mut mapping: IndexMap<&str, String> = IndexMap::new();
        for field in self.all_fields() {
            mapping.insert(field.as_str(), rename(field.as_str()));
        }
        let lookup = |field: &String| mapping.get(field.as_str()).cloned().unwrap_or_default();

        TableSchema {
            name: self.name.clone(),
            primary_key_fields: self.primary_key_fields.iter().map(lookup).collect(),
            data_fields: self.data_fields.iter().map(lookup).collect(),
            kinds: self
                .kinds
                .iter()
                .map(|(field, kind)| (lookup(field), *kind))
                .collect(),
            defaults: self
                .defaults
                .iter()
                .map(|(field, value)| (lookup(field), value.clone()))
                .collect(),
            table_kind: self.table_kind,
        }
    }
}

/// An ordered collection of tables, keyed by table name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TableSchema>", into = "Vec<TableSchema>")]
pub struct Schema {
    tables: IndexMap<String, TableSchema>,
}

impl TryFrom<Vec<TableSchema>> for Schema {
    type Error = Error;

    fn try_from(tables: Vec<TableSchema>) -> Result<Self> {
        let mut schema = Schema::new();
        for table in tables {
            schema.add_table(table)?;
        }
        Ok(schema)
    }
}

impl From<Schema> for Vec<TableSchema> {
    fn from(schema: Schema) -> Self {
        schema.tables.into_values().collect()
    }
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    ///
    /// # Errors
    ///
    /// Fails if a table with the same name already exists.
    pub fn add_table(&mut self, table: TableSchema) -> Result<()> {
        if self.tables.contains_key(table.name()) {
            return Err(Error::invalid_schema(format!(
                "duplicate table name {}",
                table.name()
            )));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Builder form of [`Schema::add_table`].
    pub fn with_table(mut self, table: TableSchema) -> Result<Self> {
        self.add_table(table)?;
        Ok(self)
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Returns an iterator over the tables, in declaration order.
    pub fn tables(&self) -> indexmap::map::Values<'_, String, TableSchema> {
        self.tables.values()
    }

    pub fn table_names(&self) -> indexmap::map::Keys<'_, String, TableSchema> {
        self.tables.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns a copy with every table passed through `f`.
    pub(crate) fn map_tables<F>(&self, mut f: F) -> Schema
    where
        F: FnMut(&TableSchema) -> TableSchema,
    {
        Schema {
            tables: self
                .tables
                .iter()
                .map(|(name, table)| (name.clone(), f(table)))
                .collect(),
        }
    }
}
