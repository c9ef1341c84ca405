//! Encoding datasets into the tabular text format.
//!
//! This module provides the [`Serializer`], which writes one block per schema table:
//!
//! ```text
//! arcs = {
//! <"Detroit", "Boston", 100>
//! <"Detroit", "New York", 80>
//! };
//!
//! nodes = {"Detroit", "Boston", "New York"};
//! ```
//!
//! - Tables with a single field are written as a flat comma-separated list.
//! - Other tables are written one `<...>` tuple per line: key values first, then data
//!   values, in schema order.
//! - Text is double-quoted with embedded quotes escaped as `\"`.
//! - Positive infinity is written as the configured sentinel (999999 by default).
//!
//! ## Usage
//!
//! Most users should use [`to_string`](crate::to_string), which also runs the schema
//! checks. The serializer can be driven directly:
//!
//! ```rust
//! use opl_dat::{key, row, CodecOptions, Dataset, Schema, Serializer, Table, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(TableSchema::new("arcs", ["source", "destination"], ["capacity"]).unwrap())
//!     .unwrap();
//! let mut dataset = Dataset::new();
//! dataset.insert_table(
//!     "arcs",
//!     Table::keyed([(key!["Detroit", "Boston"], row! { "capacity" => 100 })]),
//! );
//!
//! let mut serializer = Serializer::new(CodecOptions::new());
//! serializer.serialize_dataset(&schema, &dataset).unwrap();
//! assert_eq!(serializer.into_inner(), "arcs = {\n<\"Detroit\", \"Boston\", 100>\n};\n");
//! ```

use crate::schema::{TableKind, TableSchema};
use crate::{CodecOptions, Dataset, Error, Number, Result, Scalar, Schema, Table};

/// The tabular text serializer.
pub struct Serializer {
    output: String,
    options: CodecOptions,
}

impl Serializer {
    pub fn new(options: CodecOptions) -> Self {
        Serializer {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Writes every schema table of `dataset`, in schema order.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedTable`] for non-standard tables
    /// - [`Error::Validation`] if the dataset does not conform to the schema, or a table is
    ///   empty while non-empty tables are required
    /// - [`Error::Unencodable`] for values with no text representation
    pub fn serialize_dataset(&mut self, schema: &Schema, dataset: &Dataset) -> Result<()> {
        if let Some(table) = schema
            .tables()
            .find(|t| t.table_kind() != TableKind::Standard)
        {
            return Err(Error::unsupported_table(
                table.name(),
                "generic and generator tables have no text representation",
            ));
        }
        dataset.validate(schema)?;

        for (i, table_schema) in schema.tables().enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            let table = dataset
                .table(table_schema.name())
                .ok_or_else(|| Error::validation(table_schema.name(), "table is missing"))?;
            self.serialize_table(table_schema, table)?;
        }
        Ok(())
    }

    fn serialize_table(&mut self, schema: &TableSchema, table: &Table) -> Result<()> {
        let name = self.options.prefixed(schema.name());
        if self.options.require_non_empty && table.is_empty() {
            return Err(Error::validation(schema.name(), "table has no rows"));
        }

        self.output.push_str(&name);
        self.output.push_str(" = {");

        if schema.field_count() == 1 {
            for (i, (key, row)) in table.rows().enumerate() {
                if i > 0 {
                    self.output.push_str(", ");
                }
                let value = match key.first() {
                    Some(value) => value,
                    None => row_value(schema, row, &schema.data_fields()[0])?,
                };
                self.write_scalar(schema.name(), value)?;
            }
        } else {
            self.output.push('\n');
            for (key, row) in table.rows() {
                self.output.push('<');
                for (i, value) in key.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_scalar(schema.name(), value)?;
                }
                for (i, field) in schema.data_fields().iter().enumerate() {
                    if i > 0 || !key.is_empty() {
                        self.output.push_str(", ");
                    }
                    let value = row_value(schema, row, field)?;
                    self.write_scalar(schema.name(), value)?;
                }
                self.output.push_str(">\n");
            }
        }

        self.output.push_str("};\n");
        Ok(())
    }

    fn write_scalar(&mut self, table: &str, value: &Scalar) -> Result<()> {
        match value {
            Scalar::Text(s) => self.write_text(table, s),
            Scalar::Number(n) => self.write_number(table, n),
        }
    }

    // Only `\"` is understood on the way back in, so a trailing backslash would swallow
    // the closing quote.
    fn write_text(&mut self, table: &str, s: &str) -> Result<()> {
        if s.ends_with('\\') {
            return Err(Error::unencodable(
                table,
                format!("text value {:?} ends with a backslash", s),
            ));
        }
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
        Ok(())
    }

    fn write_number(&mut self, table: &str, n: &Number) -> Result<()> {
        match n {
            Number::Integer(i) => {
                self.output.push_str(&i.to_string());
                Ok(())
            }
            Number::Float(f) if *f != f64::INFINITY => self.write_float(table, *f),
            Number::Float(_) | Number::Infinity => {
                self.write_float(table, self.options.infinity_sentinel)
            }
        }
    }

    fn write_float(&mut self, table: &str, f: f64) -> Result<()> {
        if !f.is_finite() {
            return Err(Error::unencodable(
                table,
                format!("{} has no decimal representation", f),
            ));
        }
        self.output.push_str(&f.to_string());
        Ok(())
    }
}

fn row_value<'a>(schema: &TableSchema, row: &'a crate::Row, field: &str) -> Result<&'a Scalar> {
    row.get(field).ok_or_else(|| {
        Error::validation(schema.name(), format!("row is missing data field {}", field))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{key, row};

    fn encode(schema: &Schema, dataset: &Dataset, options: CodecOptions) -> Result<String> {
        let mut serializer = Serializer::new(options);
        serializer.serialize_dataset(schema, dataset)?;
        Ok(serializer.into_inner())
    }

    fn nodes_schema() -> Schema {
        Schema::new()
            .with_table(TableSchema::new("nodes", ["name"], Vec::<String>::new()).unwrap())
            .unwrap()
    }

    #[test]
    fn test_flat_list() {
        let mut dataset = Dataset::new();
        dataset.insert_table(
            "nodes",
            Table::keyed([(key!["Detroit"], row! {}), (key!["Denver"], row! {})]),
        );
        let text = encode(&nodes_schema(), &dataset, CodecOptions::new()).unwrap();
        assert_eq!(text, "nodes = {\"Detroit\", \"Denver\"};\n");
    }

    #[test]
    fn test_empty_tables() {
        let mut dataset = Dataset::new();
        dataset.insert_table("nodes", Table::keyed([]));
        let text = encode(&nodes_schema(), &dataset, CodecOptions::new()).unwrap();
        assert_eq!(text, "nodes = {};\n");

        let err = encode(
            &nodes_schema(),
            &dataset,
            CodecOptions::new().with_require_non_empty(true),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { ref table, .. } if table == "nodes"));
    }

    #[test]
    fn test_unkeyed_rows_and_prefix() {
        let schema = Schema::new()
            .with_table(TableSchema::new("log", Vec::<String>::new(), ["step", "cost"]).unwrap())
            .unwrap();
        let mut dataset = Dataset::new();
        dataset.insert_table(
            "log",
            Table::unkeyed([
                row! { "step" => "a", "cost" => 1.5 },
                row! { "cost" => 2, "step" => "b" },
            ]),
        );
        let text = encode(&schema, &dataset, CodecOptions::new().with_name_prefix("in_")).unwrap();
        assert_eq!(text, "in_log = {\n<\"a\", 1.5>\n<\"b\", 2>\n};\n");
    }

    #[test]
    fn test_infinity_uses_sentinel() {
        let schema = Schema::new()
            .with_table(TableSchema::new("caps", ["arc"], ["cap"]).unwrap())
            .unwrap();
        let mut dataset = Dataset::new();
        dataset.insert_table(
            "caps",
            Table::keyed([
                (key!["a"], row! { "cap" => Scalar::infinity() }),
                (key!["b"], row! { "cap" => f64::INFINITY }),
            ]),
        );
        let text = encode(&schema, &dataset, CodecOptions::new()).unwrap();
        assert_eq!(text, "caps = {\n<\"a\", 999999>\n<\"b\", 999999>\n};\n");

        let text = encode(&schema, &dataset, CodecOptions::new().with_infinity_sentinel(1e9)).unwrap();
        assert!(text.contains("<\"a\", 1000000000>"));
    }

    #[test]
    fn test_unrepresentable_values() {
        let schema = Schema::new()
            .with_table(TableSchema::new("t", ["k"], ["v"]).unwrap())
            .unwrap();
        for bad in [Scalar::from(f64::NAN), Scalar::from(f64::NEG_INFINITY), Scalar::from("ends\\")] {
            let mut dataset = Dataset::new();
            dataset.insert_table("t", Table::keyed([(key!["x"], row! { "v" => bad })]));
            let err = encode(&schema, &dataset, CodecOptions::new()).unwrap_err();
            assert!(matches!(err, Error::Unencodable { ref table, .. } if table == "t"));
        }
    }

    #[test]
    fn test_embedded_quote_is_escaped() {
        let mut dataset = Dataset::new();
        dataset.insert_table("nodes", Table::keyed([(key!["say \"hi\""], row! {})]));
        let text = encode(&nodes_schema(), &dataset, CodecOptions::new()).unwrap();
        assert_eq!(text, "nodes = {\"say \\\"hi\\\"\"};\n");
    }

    #[test]
    fn test_rejects_generator_tables() {
        let schema = Schema::new()
            .with_table(
                TableSchema::new("g", ["k"], ["v"])
                    .unwrap()
                    .with_table_kind(TableKind::Generator),
            )
            .unwrap();
        let err = encode(&schema, &Dataset::new(), CodecOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTable { .. }));
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let schema = Schema::new()
            .with_table(TableSchema::new("a", ["k"], Vec::<String>::new()).unwrap())
            .unwrap()
            .with_table(TableSchema::new("b", ["k"], Vec::<String>::new()).unwrap())
            .unwrap();
        let mut dataset = Dataset::new();
        dataset.insert_table("a", Table::keyed([(key![1], row! {})]));
        dataset.insert_table("b", Table::keyed([(key![2], row! {})]));
        let text = encode(&schema, &dataset, CodecOptions::new()).unwrap();
        assert_eq!(text, "a = {1};\n\nb = {2};\n");
    }
}
