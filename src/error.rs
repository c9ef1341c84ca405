//! Error types for encoding and decoding the tabular text format.
//!
//! Every failure the codec can report is a variant of [`Error`]. Variants fall into
//! four categories, queryable through [`Error::category`]:
//!
//! - **Schema**: the schema itself cannot be used (reserved-word marker clashes, case/space
//!   duplicate field names, unsupported table kinds, colliding prefixed table names)
//! - **Validation**: a dataset does not conform to its schema
//! - **Format**: the text is malformed or a value cannot be written (unexpected character,
//!   bad number, row-arity mismatch, duplicate table, duplicate primary key)
//! - **Io**: reading or writing the text failed
//!
//! Decode errors carry the 0-based character position of the offending input; row-level
//! errors carry the table name.
//!
//! ## Examples
//!
//! ```rust
//! use opl_dat::{from_str, Error, ErrorCategory, Schema, TableSchema};
//!
//! let mut schema = Schema::new();
//! schema.add_table(TableSchema::new("nodes", ["name"], Vec::<String>::new()).unwrap()).unwrap();
//!
//! let err = from_str(&schema, "nodes = {\"a\"} = ").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Format);
//! assert!(err.to_string().contains("position"));
//! ```

use std::fmt;
use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Schema,
    Validation,
    Format,
    Io,
}

/// Represents all possible errors raised by the codec.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A field name already starts with the escape marker and could not be reversed safely
    #[error("Field names cannot start with '{marker}', in table {table} : field is {field}")]
    ReservedMarker {
        table: String,
        field: String,
        marker: char,
    },

    /// Two field names of a table differ only by case or spaces
    #[error("Case space duplicate field names in tables: {}", tables.join(", "))]
    CaseSpaceDuplicates { tables: Vec<String> },

    /// The table kind cannot be expressed in the text format
    #[error("Table {table} is not supported: {reason}")]
    UnsupportedTable { table: String, reason: String },

    /// Input and output table names collide once prefixed
    #[error("Colliding input and output table names: {}. Set distinct name prefixes", names.join(", "))]
    CollidingTableNames { names: Vec<String> },

    /// Schema definition is internally inconsistent
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Dataset does not conform to its schema
    #[error("Dataset does not conform to table {table}: {msg}")]
    Validation { table: String, msg: String },

    /// Unexpected character in the text
    #[error("Badly formatted string, unrecognized '{ch}'. Character position [{position}]: {msg}")]
    Syntax {
        position: usize,
        ch: char,
        msg: String,
    },

    /// A bare token is not a decimal number
    #[error("Badly formatted string - Field '{text}' is not a valid number. Character position [{position}]")]
    InvalidNumber { position: usize, text: String },

    /// A row's field count differs from the first row of its table
    #[error("Inconsistent row lengths found for table {table}: expected {expected} fields, found {found}")]
    ArityMismatch {
        table: String,
        expected: usize,
        found: usize,
    },

    /// A table name appears twice in the text
    #[error("Can't have duplicate table name {table}. Character position [{position}]")]
    DuplicateTable { position: usize, table: String },

    /// Two rows of a keyed table share a primary key
    #[error("Duplicate primary key {key} found in table {table}")]
    DuplicateKey { table: String, key: String },

    /// Input ended inside a block
    #[error("Unexpected end of input at character position [{position}]: expected {expected}")]
    UnexpectedEof { position: usize, expected: String },

    /// A dataset value has no representation in the text format
    #[error("Cannot encode value in table {table}: {msg}")]
    Unencodable { table: String, msg: String },
}

impl Error {
    /// Returns the broad category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::{Error, ErrorCategory};
    ///
    /// let err = Error::syntax(3, '>', "row is not open");
    /// assert_eq!(err.category(), ErrorCategory::Format);
    /// ```
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Io,
            Error::ReservedMarker { .. }
            | Error::CaseSpaceDuplicates { .. }
            | Error::UnsupportedTable { .. }
            | Error::CollidingTableNames { .. }
            | Error::InvalidSchema(_) => ErrorCategory::Schema,
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::Syntax { .. }
            | Error::InvalidNumber { .. }
            | Error::ArityMismatch { .. }
            | Error::DuplicateTable { .. }
            | Error::DuplicateKey { .. }
            | Error::UnexpectedEof { .. }
            | Error::Unencodable { .. } => ErrorCategory::Format,
        }
    }

    /// Returns the 0-based character position for decode errors that have one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Syntax { position, .. }
            | Error::InvalidNumber { position, .. }
            | Error::DuplicateTable { position, .. }
            | Error::UnexpectedEof { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Creates a syntax error for an unexpected character.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::Error;
    ///
    /// let err = Error::syntax(10, '=', "table is already open");
    /// assert!(err.to_string().contains("position [10]"));
    /// ```
    pub fn syntax(position: usize, ch: char, msg: &str) -> Self {
        Error::Syntax {
            position,
            ch,
            msg: msg.to_string(),
        }
    }

    /// Creates an invalid number error for a bare token that failed decimal parsing.
    pub fn invalid_number(position: usize, text: &str) -> Self {
        Error::InvalidNumber {
            position,
            text: text.to_string(),
        }
    }

    /// Creates a row-arity error naming the table.
    pub fn arity_mismatch(table: &str, expected: usize, found: usize) -> Self {
        Error::ArityMismatch {
            table: table.to_string(),
            expected,
            found,
        }
    }

    pub fn duplicate_table(position: usize, table: &str) -> Self {
        Error::DuplicateTable {
            position,
            table: table.to_string(),
        }
    }

    pub fn duplicate_key(table: &str, key: &str) -> Self {
        Error::DuplicateKey {
            table: table.to_string(),
            key: key.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(position: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            position,
            expected: expected.to_string(),
        }
    }

    /// Creates a validation error for a dataset that does not match its schema.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use opl_dat::{Error, ErrorCategory};
    ///
    /// let err = Error::validation("arcs", "missing data field capacity");
    /// assert_eq!(err.category(), ErrorCategory::Validation);
    /// assert!(err.to_string().contains("arcs"));
    /// ```
    pub fn validation<T: fmt::Display>(table: &str, msg: T) -> Self {
        Error::Validation {
            table: table.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unencodable<T: fmt::Display>(table: &str, msg: T) -> Self {
        Error::Unencodable {
            table: table.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn unsupported_table(table: &str, reason: &str) -> Self {
        Error::UnsupportedTable {
            table: table.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidSchema(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
