//! # opl_dat
//!
//! A schema-driven codec between in-memory relational datasets and the `.dat` tuple text
//! format read by the OPL optimization language.
//!
//! ## What is the format?
//!
//! Each table becomes one named block. Tables with a single field are written as a flat
//! list; every other table is written one `<...>` tuple per line:
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
//! See the [`format`] module for the grammar and its edge cases.
//!
//! ## Key Features
//!
//! - **Schema driven**: a [`Schema`] names each table's primary-key and data fields, and
//!   decoding rebuilds keyed or unkeyed [`Table`]s from it
//! - **Relational checks**: ragged rows, repeated table names and duplicate primary keys
//!   are rejected while decoding
//! - **Keyword safe**: field names that collide with language keywords are escaped with a
//!   leading `_` and restored on the way back
//! - **Prefixes**: input and output tables can share one namespace through name prefixes
//! - **Legacy input**: whitespace-separated values are accepted when commas are optional
//!
//! ## Quick Start
//!
//! ```rust
//! use opl_dat::{from_str, key, row, to_string, Dataset, Schema, Table, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(TableSchema::new("arcs", ["source", "destination"], ["capacity"]).unwrap())
//!     .unwrap();
//!
//! let mut dataset = Dataset::new();
//! dataset.insert_table(
//!     "arcs",
//!     Table::keyed([
//!         (key!["Detroit", "Boston"], row! { "capacity" => 100 }),
//!         (key!["Detroit", "New York"], row! { "capacity" => 80 }),
//!     ]),
//! );
//!
//! let text = to_string(&schema, &dataset).unwrap();
//! assert_eq!(
//!     text,
//!     "arcs = {\n<\"Detroit\", \"Boston\", 100>\n<\"Detroit\", \"New York\", 80>\n};\n"
//! );
//!
//! let back = from_str(&schema, &text).unwrap();
//! assert_eq!(back, dataset);
//! ```
//!
//! ### Errors
//!
//! Every failure is an [`Error`] whose [`category`](Error::category) tells schema problems,
//! dataset validation problems and malformed text apart:
//!
//! ```rust
//! use opl_dat::{from_str, ErrorCategory, Schema, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(TableSchema::new("arcs", ["source"], ["capacity"]).unwrap())
//!     .unwrap();
//!
//! let err = from_str(&schema, "arcs = {<\"a\", 1>\n<\"b\", 2, 3>};").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Format);
//! ```
//!
//! ## Performance Characteristics
//!
//! - **Encoding**: O(n) in the number of values
//! - **Decoding**: single pass over the characters, no backtracking
//! - **Memory**: rows are accumulated per table; the input is borrowed, not copied
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Proper error propagation with `Result` types
//! - No panics in public API

pub mod codec;
pub mod dataset;
pub mod de;
pub mod declare;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod normalize;
pub mod options;
pub mod schema;
pub mod ser;
pub mod value;

pub use codec::Codec;
pub use dataset::{Dataset, Key, RawTables, Table};
pub use de::Deserializer;
pub use error::{Error, ErrorCategory, Result};
pub use map::Row;
pub use normalize::{check_disjoint_namespaces, ReservedWords};
pub use options::CodecOptions;
pub use schema::{FieldKind, Schema, TableKind, TableSchema};
pub use ser::Serializer;
pub use value::{Number, Scalar};

use std::io;

/// Encode `dataset` as text, one block per schema table.
///
/// # Errors
///
/// Returns an error if the schema is unusable, the dataset does not conform to it, or a
/// value has no text representation.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(schema: &Schema, dataset: &Dataset) -> Result<String> {
    to_string_with_options(schema, dataset, CodecOptions::default())
}

/// Encode `dataset` as text with custom options.
///
/// # Examples
///
/// ```rust
/// use opl_dat::{key, row, to_string_with_options, CodecOptions, Dataset, Schema, Table, TableSchema};
///
/// let schema = Schema::new()
///     .with_table(TableSchema::new("caps", ["arc"], ["cap"]).unwrap())
///     .unwrap();
/// let mut dataset = Dataset::new();
/// dataset.insert_table("caps", Table::keyed([(key!["a"], row! { "cap" => f64::INFINITY })]));
///
/// let options = CodecOptions::new().with_name_prefix("in_");
/// let text = to_string_with_options(&schema, &dataset, options).unwrap();
/// assert_eq!(text, "in_caps = {\n<\"a\", 999999>\n};\n");
/// ```
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options(
    schema: &Schema,
    dataset: &Dataset,
    options: CodecOptions,
) -> Result<String> {
    Codec::new(options).encode(schema, dataset)
}

/// Encode `dataset` to a writer.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, schema: &Schema, dataset: &Dataset) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, schema, dataset, CodecOptions::default())
}

/// Encode `dataset` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(
    mut writer: W,
    schema: &Schema,
    dataset: &Dataset,
    options: CodecOptions,
) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(schema, dataset, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Decode text into a dataset shaped by `schema`.
///
/// Schema tables absent from the text come back empty. Blocks the schema does not name
/// are kept in [`Dataset::unmatched`].
///
/// # Errors
///
/// Returns an error if the schema is unusable, the text is malformed, or a relational
/// check fails. Format errors carry the character position.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(schema: &Schema, s: &str) -> Result<Dataset> {
    from_str_with_options(schema, s, CodecOptions::default())
}

/// Decode text with custom options.
///
/// # Examples
///
/// ```rust
/// use opl_dat::{from_str_with_options, key, CodecOptions, Schema, TableSchema};
///
/// let schema = Schema::new()
///     .with_table(TableSchema::new("arcs", ["from", "to"], ["cap"]).unwrap())
///     .unwrap();
///
/// let legacy = CodecOptions::legacy().with_name_prefix("in_");
/// let dataset = from_str_with_options(&schema, "in_arcs = {<\"a\" \"b\" 5>};", legacy).unwrap();
/// let row = dataset.table("arcs").unwrap().get(&key!["a", "b"]).unwrap();
/// assert_eq!(row.get("cap").and_then(|v| v.as_i64()), Some(5));
/// ```
///
/// # Errors
///
/// See [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options(schema: &Schema, s: &str, options: CodecOptions) -> Result<Dataset> {
    Codec::new(options).decode(schema, s)
}

/// Decode a dataset from an I/O stream.
///
/// # Errors
///
/// Returns an error if reading fails or decoding fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R, schema: &Schema) -> Result<Dataset>
where
    R: io::Read,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(schema, &string)
}

/// Decode a dataset from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or decoding fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(schema: &Schema, v: &[u8]) -> Result<Dataset> {
    let s = std::str::from_utf8(v)
        .map_err(|e| Error::io(&format!("input is not valid UTF-8: {}", e)))?;
    from_str(schema, s)
}
