//! Type-stub declarations for a schema, for human inspection.
//!
//! The optimization model reads the data through declarations whose identifiers must match
//! what the encoder writes. [`declarations`] renders those declarations so they can be
//! compared against the model by eye; the output takes no part in encoding or decoding.
//!
//! ```rust
//! use opl_dat::declare::{declarations, Side};
//! use opl_dat::{FieldKind, Schema, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(
//!         TableSchema::new("arcs", ["source", "destination"], ["capacity"])
//!             .unwrap()
//!             .with_kind("capacity", FieldKind::Numeric)
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let text = declarations(&schema, "", Side::Input).unwrap();
//! assert_eq!(
//!     text,
//!     "tuple arcs_type\n{\n\tkey string source;\n\tkey string destination;\n\tfloat capacity;\n};\n\n\
//!      {arcs_type} arcs=...;\n\n"
//! );
//! ```

use crate::normalize::{self, KeywordNormalizer, ReservedWords};
use crate::schema::{FieldKind, TableKind, TableSchema};
use crate::{Error, Result, Schema};
use std::fmt::Write;

/// Which side of the model the declarations describe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Data read by the model (`= ...`).
    Input,
    /// Data written by the model (`= {}`).
    Output,
}

impl Side {
    fn initializer(self) -> &'static str {
        match self {
            Side::Input => "...",
            Side::Output => "{}",
        }
    }
}

/// Renders declarations for every table, escaping reserved field names with `_`.
///
/// # Errors
///
/// - [`Error::CaseSpaceDuplicates`] if field names clash ignoring case and spaces
/// - [`Error::UnsupportedTable`] for non-standard tables or tables without primary keys
/// - [`Error::ReservedMarker`] if a field already starts with `_`
pub fn declarations(schema: &Schema, prefix: &str, side: Side) -> Result<String> {
    let normalizer = KeywordNormalizer::new(ReservedWords::opl(), crate::options::DEFAULT_ESCAPE_MARKER);
    declarations_with(schema, prefix, side, &normalizer)
}

/// Like [`declarations`], with a caller-supplied keyword normalizer.
pub fn declarations_with(
    schema: &Schema,
    prefix: &str,
    side: Side,
    normalizer: &KeywordNormalizer,
) -> Result<String> {
    normalize::ensure_no_case_space_duplicates(schema)?;
    for table in schema.tables() {
        if table.table_kind() != TableKind::Standard {
            return Err(Error::unsupported_table(
                table.name(),
                "generic and generator tables have no declaration",
            ));
        }
        if !table.is_keyed() {
            return Err(Error::unsupported_table(
                table.name(),
                "tables without primary key fields have no declaration",
            ));
        }
    }

    let escaped = normalizer.escape_schema(schema)?;
    let mut out = String::new();
    for table in escaped.tables() {
        write_table(&mut out, table, prefix, side);
    }
    Ok(out)
}

fn write_table(out: &mut String, table: &TableSchema, prefix: &str, side: Side) {
    let name = format!("{}{}", prefix, table.name());
    let init = side.initializer();

    if table.primary_key_fields().len() == 1 && table.data_fields().is_empty() {
        let key = &table.primary_key_fields()[0];
        let _ = write!(out, "{{{}}} {} = {};\n\n", type_name(table, key, true), name, init);
        return;
    }

    let _ = write!(out, "tuple {}_type\n{{", name);
    for field in table.primary_key_fields() {
        let _ = write!(
            out,
            "\n\tkey {} {};",
            type_name(table, field, true),
            normalize::identifier(field)
        );
    }
    for field in table.data_fields() {
        let _ = write!(
            out,
            "\n\t{} {};",
            type_name(table, field, false),
            normalize::identifier(field)
        );
    }
    let _ = write!(out, "\n}};\n\n{{{}_type}} {}={};\n\n", name, name, init);
}

// Untyped key fields are strings, untyped data fields are floats.
fn type_name(table: &TableSchema, field: &str, is_key: bool) -> &'static str {
    match table.kind_of(field) {
        Some(FieldKind::Numeric) => "float",
        Some(FieldKind::Text) => "string",
        None if is_key => "string",
        None => "float",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key_set() {
        let schema = Schema::new()
            .with_table(
                TableSchema::new("nodes", ["id"], Vec::<String>::new())
                    .unwrap()
                    .with_kind("id", FieldKind::Numeric)
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(
            declarations(&schema, "in_", Side::Input).unwrap(),
            "{float} in_nodes = ...;\n\n"
        );
        assert_eq!(
            declarations(&schema, "", Side::Output).unwrap(),
            "{float} nodes = {};\n\n"
        );
    }

    #[test]
    fn test_reserved_and_spaced_fields() {
        let schema = Schema::new()
            .with_table(
                TableSchema::new("flow", ["Commodity Name"], ["sum"])
                    .unwrap()
                    .with_kind("sum", FieldKind::Text)
                    .unwrap(),
            )
            .unwrap();
        let text = declarations(&schema, "out_", Side::Output).unwrap();
        assert_eq!(
            text,
            "tuple out_flow_type\n{\n\tkey string commodity_name;\n\tstring _sum;\n};\n\n\
             {out_flow_type} out_flow={};\n\n"
        );
    }

    #[test]
    fn test_rejects_unkeyed_and_duplicates() {
        let unkeyed = Schema::new()
            .with_table(TableSchema::new("log", Vec::<String>::new(), ["msg"]).unwrap())
            .unwrap();
        assert!(matches!(
            declarations(&unkeyed, "", Side::Input),
            Err(Error::UnsupportedTable { .. })
        ));

        let dups = Schema::new()
            .with_table(TableSchema::new("t", ["a b"], ["A_B"]).unwrap())
            .unwrap();
        assert!(matches!(
            declarations(&dups, "", Side::Input),
            Err(Error::CaseSpaceDuplicates { .. })
        ));
    }
}
