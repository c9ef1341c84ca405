//! Schema checks and field-name rewriting applied around encoding and decoding.
//!
//! - [`KeywordNormalizer`] renames fields that collide with the engine's reserved words by
//!   prefixing an escape marker, and reverses the renaming afterwards.
//! - [`find_case_space_duplicates`] reports tables whose field names clash once case and
//!   spaces are ignored; the engine's generated identifiers cannot tell them apart.
//! - [`check_disjoint_namespaces`] makes sure input and output table names stay distinct
//!   after their prefixes are applied.
//!
//! ## Examples
//!
//! ```rust
//! use opl_dat::normalize::{KeywordNormalizer, ReservedWords};
//! use opl_dat::{Schema, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(TableSchema::new("flows", ["from"], ["sum"]).unwrap())
//!     .unwrap();
//!
//! let normalizer = KeywordNormalizer::new(ReservedWords::opl(), '_');
//! let escaped = normalizer.escape_schema(&schema).unwrap();
//! let flows = escaped.table("flows").unwrap();
//! assert_eq!(flows.primary_key_fields(), ["_from"]);
//! assert_eq!(flows.data_fields(), ["_sum"]);
//!
//! let restored = normalizer.unescape_schema(&escaped);
//! assert_eq!(restored, schema);
//! ```

use crate::{Dataset, Error, Result, Schema};
use indexmap::IndexSet;

/// Reserved words of the optimization language.
pub const OPL_KEYWORDS: &[&str] = &[
    "initial", "template", "struct", "all", "and", "assert", "boolean", "constraints", "CP",
    "CPLEX", "cumulFunction", "DBConnection", "DBExecute", "DBRead", "DBUpdate", "dexpr",
    "diff", "div", "dvar", "else", "execute", "false", "float", "float+", "forall", "from",
    "in", "if", "include", "infinity", "int", "int+", "intensity", "inter", "interval",
    "invoke", "key", "main", "max", "maximize", "maxint", "min", "minimize", "mod", "not",
    "optional", "or", "ordered", "piecewise", "prepare", "prod", "pwlFunction", "range",
    "reversed", "sequence", "setof", "SheetConnection", "SheetRead", "SheetWrite", "size",
    "sorted", "SPSSConnection", "SPSSRead", "stateFunction", "stepFunction", "stepwise",
    "string", "subject", "sum", "symdiff", "to", "true", "tuple", "types", "union", "using",
    "with",
];

/// Separator that replaces spaces in generated identifiers.
const IDENTIFIER_SEPARATOR: char = '_';

/// An immutable, case-insensitive set of reserved words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservedWords(IndexSet<String>);

impl ReservedWords {
    pub fn new<I>(words: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ReservedWords(
            words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// The optimization language's keyword list.
    #[must_use]
    pub fn opl() -> Self {
        Self::new(OPL_KEYWORDS)
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(&word.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReservedWords {
    fn default() -> Self {
        Self::opl()
    }
}

/// Escapes and unescapes reserved field names.
#[derive(Clone, Debug)]
pub struct KeywordNormalizer {
    reserved: ReservedWords,
    marker: char,
}

impl KeywordNormalizer {
    #[must_use]
    pub fn new(reserved: ReservedWords, marker: char) -> Self {
        KeywordNormalizer { reserved, marker }
    }

    #[must_use]
    pub fn marker(&self) -> char {
        self.marker
    }

    /// Returns the field name with the marker prepended if it is reserved.
    #[must_use]
    pub fn escape_field(&self, field: &str) -> String {
        if self.reserved.contains(field) {
            format!("{}{}", self.marker, field)
        } else {
            field.to_string()
        }
    }

    /// Strips one leading marker, if present.
    #[must_use]
    pub fn unescape_field(&self, field: &str) -> String {
        field
            .strip_prefix(self.marker)
            .unwrap_or(field)
            .to_string()
    }

    /// Renames every reserved field of every table, carrying kinds and defaults over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedMarker`] if any field already starts with the marker, since
    /// the renaming could not then be reversed.
    pub fn escape_schema(&self, schema: &Schema) -> Result<Schema> {
        for table in schema.tables() {
            if let Some(field) = table.all_fields().find(|f| f.starts_with(self.marker)) {
                return Err(Error::ReservedMarker {
                    table: table.name().to_string(),
                    field: field.clone(),
                    marker: self.marker,
                });
            }
        }
        Ok(schema.map_tables(|table| table.renamed(|field| self.escape_field(field))))
    }

    /// Strips one leading marker from every field of every table.
    #[must_use]
    pub fn unescape_schema(&self, schema: &Schema) -> Schema {
        schema.map_tables(|table| table.renamed(|field| self.unescape_field(field)))
    }

    /// Renames reserved data fields in every row.
    #[must_use]
    pub fn escape_dataset(&self, dataset: &Dataset) -> Dataset {
        dataset.rename_fields(|_, field| self.escape_field(field))
    }

    /// Strips one leading marker from every data field in every row.
    #[must_use]
    pub fn unescape_dataset(&self, dataset: &Dataset) -> Dataset {
        dataset.rename_fields(|_, field| self.unescape_field(field))
    }
}

/// Lowercases a field name and replaces spaces, the way generated identifiers are formed.
#[must_use]
pub fn identifier(field: &str) -> String {
    field.to_lowercase().replace(' ', &IDENTIFIER_SEPARATOR.to_string())
}

/// Returns the names of tables whose key and data fields collide once normalized with
/// [`identifier`].
///
/// # Examples
///
/// ```rust
/// use opl_dat::normalize::find_case_space_duplicates;
/// use opl_dat::{Schema, TableSchema};
///
/// let schema = Schema::new()
///     .with_table(TableSchema::new("t", ["Unit Cost"], ["unit_cost"]).unwrap())
///     .unwrap();
/// assert_eq!(find_case_space_duplicates(&schema), vec!["t".to_string()]);
/// ```
#[must_use]
pub fn find_case_space_duplicates(schema: &Schema) -> Vec<String> {
    schema
        .tables()
        .filter(|table| {
            let normalized: IndexSet<String> = table.all_fields().map(|f| identifier(f)).collect();
            normalized.len() != table.field_count()
        })
        .map(|table| table.name().to_string())
        .collect()
}

/// Fails with [`Error::CaseSpaceDuplicates`] if any table has case/space duplicate fields.
pub fn ensure_no_case_space_duplicates(schema: &Schema) -> Result<()> {
    let tables = find_case_space_duplicates(schema);
    if tables.is_empty() {
        Ok(())
    } else {
        Err(Error::CaseSpaceDuplicates { tables })
    }
}

/// Fails with [`Error::CollidingTableNames`] if any prefixed input table name equals a
/// prefixed output table name.
///
/// # Examples
///
/// ```rust
/// use opl_dat::normalize::check_disjoint_namespaces;
/// use opl_dat::{Schema, TableSchema};
///
/// let input = Schema::new()
///     .with_table(TableSchema::new("flow", ["arc"], ["qty"]).unwrap())
///     .unwrap();
/// let output = input.clone();
///
/// assert!(check_disjoint_namespaces(&input, "", &output, "").is_err());
/// assert!(check_disjoint_namespaces(&input, "in_", &output, "out_").is_ok());
/// ```
pub fn check_disjoint_namespaces(
    input: &Schema,
    input_prefix: &str,
    output: &Schema,
    output_prefix: &str,
) -> Result<()> {
    let inputs: IndexSet<String> = input
        .table_names()
        .map(|t| format!("{}{}", input_prefix, t))
        .collect();
    let names: Vec<String> = output
        .table_names()
        .map(|t| format!("{}{}", output_prefix, t))
        .filter(|t| inputs.contains(t))
        .collect();
    if names.is_empty() {
        Ok(())
    } else {
        Err(Error::CollidingTableNames { names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use crate::{key, row, Scalar, Table, TableSchema};

    fn normalizer() -> KeywordNormalizer {
        KeywordNormalizer::new(ReservedWords::opl(), '_')
    }

    #[test]
    fn test_reserved_words_are_case_insensitive() {
        let words = ReservedWords::opl();
        assert!(words.contains("SUM"));
        assert!(words.contains("cplex"));
        assert!(words.contains("Float+"));
        assert!(!words.contains("capacity"));
    }

    #[test]
    fn test_escape_is_single_marker_and_reversible() {
        let n = normalizer();
        assert_eq!(n.escape_field("sum"), "_sum");
        assert_eq!(n.escape_field("Sum"), "_Sum");
        assert_eq!(n.escape_field("capacity"), "capacity");
        assert_eq!(n.unescape_field("_sum"), "sum");
        assert_eq!(n.unescape_field("__sum"), "_sum");
    }

    #[test]
    fn test_escape_rejects_marker_prefixed_fields() {
        let schema = Schema::new()
            .with_table(TableSchema::new("t", ["_id"], ["x"]).unwrap())
            .unwrap();
        let err = normalizer().escape_schema(&schema).unwrap_err();
        assert!(matches!(err, Error::ReservedMarker { ref field, .. } if field == "_id"));
    }

    #[test]
    fn test_escape_propagates_kinds_and_defaults() {
        let schema = Schema::new()
            .with_table(
                TableSchema::new("t", ["key"], ["max"])
                    .unwrap()
                    .with_kind("key", FieldKind::Text)
                    .unwrap()
                    .with_default("max", 9)
                    .unwrap(),
            )
            .unwrap();
        let escaped = normalizer().escape_schema(&schema).unwrap();
        let table = escaped.table("t").unwrap();
        assert_eq!(table.kind_of("_key"), Some(FieldKind::Text));
        assert_eq!(table.default_of("_max"), Scalar::from(9));
    }

    #[test]
    fn test_dataset_round_trip() {
        let mut dataset = Dataset::new();
        dataset.insert_table(
            "t",
            Table::keyed([(key!["a"], row! { "sum" => 1, "cost" => 2 })]),
        );
        let n = normalizer();
        let escaped = n.escape_dataset(&dataset);
        let row = escaped.table("t").unwrap().get(&key!["a"]).unwrap();
        assert!(row.contains_field("_sum"));
        assert!(row.contains_field("cost"));
        assert_eq!(n.unescape_dataset(&escaped), dataset);
    }

    #[test]
    fn test_case_space_duplicates() {
        let schema = Schema::new()
            .with_table(TableSchema::new("ok", ["a b"], ["c"]).unwrap())
            .unwrap()
            .with_table(TableSchema::new("bad", ["Name"], ["name"]).unwrap())
            .unwrap();
        assert_eq!(find_case_space_duplicates(&schema), vec!["bad".to_string()]);
        assert!(matches!(
            ensure_no_case_space_duplicates(&schema),
            Err(Error::CaseSpaceDuplicates { .. })
        ));
    }

    #[test]
    fn test_namespace_collision_lists_names() {
        let input = Schema::new()
            .with_table(TableSchema::new("flow", ["a"], ["b"]).unwrap())
            .unwrap();
        let output = Schema::new()
            .with_table(TableSchema::new("w", ["a"], ["b"]).unwrap())
            .unwrap();
        let err = check_disjoint_namespaces(&input, "", &output, "flo").unwrap_err();
        assert!(err.to_string().contains("flow"));
    }
}
