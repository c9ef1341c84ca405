//! Decoding the tabular text format.
//!
//! This module provides the [`Deserializer`], a single-pass scanner that reads table
//! blocks such as
//!
//! ```text
//! arcs = {
//! <"Detroit", "Boston", 100>
//! };
//! nodes = {"Detroit", "Denver"};
//! ```
//!
//! ## Overview
//!
//! - **Single pass**: one character at a time, one character of look-behind (for `\"`),
//!   no lookahead and no backtracking
//! - **Row arity**: the first row of each table fixes how many values every later row has
//! - **Duplicate keys**: two rows with the same primary key fail the whole decode
//! - **Error reporting**: errors carry the 0-based character position or the table name
//!
//! Outside strings, whitespace, `{` and `;` carry no meaning. In legacy mode
//! (`comma_required == false`) whitespace after a bare value also separates values.
//!
//! ## Usage
//!
//! ```rust
//! use opl_dat::Deserializer;
//! use opl_dat::Scalar;
//!
//! let raw = Deserializer::from_str("nodes = {\"Detroit\", \"Denver\"};")
//!     .parse_raw()
//!     .unwrap();
//! assert_eq!(
//!     raw["nodes"],
//!     vec![vec![Scalar::from("Detroit")], vec![Scalar::from("Denver")]]
//! );
//! ```

use crate::dataset::{RawTables, Table};
use crate::schema::TableSchema;
use crate::value::format_key;
use crate::{CodecOptions, Dataset, Error, Number, Result, Row, Scalar, Schema};
use indexmap::{IndexMap, IndexSet};
use tracing::trace;

/// Scanner state. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Between blocks.
    Idle,
    /// Reading a table name.
    TableName,
    /// Inside `{ }`, between rows.
    TableOpen,
    /// Inside `< >`, expecting a field.
    Row,
    /// Bare value directly in a flat table body.
    RowScalar,
    /// Quoted string directly in a flat table body.
    RowString,
    /// Quoted string inside `< >`.
    FieldString,
    /// After a closed string inside `< >`.
    Field,
    /// Numeric token inside `< >`.
    Number,
}

/// The tabular text deserializer.
///
/// Created via [`Deserializer::from_str`]; consumed by [`Deserializer::parse_raw`] or
/// [`Deserializer::deserialize`].
pub struct Deserializer<'de> {
    input: &'de str,
    options: CodecOptions,
    state: State,
    prev: Option<char>,
    table_name: String,
    field: String,
    row: Vec<Scalar>,
    tables: RawTables,
}

impl<'de> Deserializer<'de> {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &'de str) -> Self {
        Deserializer {
            input,
            options: CodecOptions::default(),
            state: State::Idle,
            prev: None,
            table_name: String::new(),
            field: String::new(),
            row: Vec::new(),
            tables: RawTables::new(),
        }
    }

    /// Takes the separator mode and name prefix from `options`.
    #[must_use]
    pub fn with_options(mut self, options: &CodecOptions) -> Self {
        self.options = options.clone();
        self
    }

    #[must_use]
    pub fn with_comma_required(mut self, required: bool) -> Self {
        self.options.comma_required = required;
        self
    }

    /// Scans the whole input into table blocks, without consulting a schema.
    ///
    /// Table names are returned exactly as written, prefix included.
    pub fn parse_raw(mut self) -> Result<RawTables> {
        let input = self.input;
        let mut end = 0;
        for (position, ch) in input.chars().enumerate() {
            self.step(position, ch)?;
            self.prev = Some(ch);
            end = position + 1;
        }
        self.finish(end)?;
        Ok(self.tables)
    }

    /// Scans the input and builds a [`Dataset`] shaped by `schema`.
    ///
    /// Blocks whose name carries the configured prefix and names a schema table become
    /// typed tables; schema tables missing from the text come back empty; all other
    /// blocks are kept in [`Dataset::unmatched`] under their written names.
    ///
    /// # Errors
    ///
    /// Any scan error, [`Error::DuplicateKey`] for repeated primary keys, and
    /// [`Error::Validation`] when a block's row width differs from the schema's.
    pub fn deserialize(self, schema: &Schema) -> Result<Dataset> {
        let options = self.options.clone();
        let raw = self.parse_raw()?;

        let mut matched: IndexMap<&str, Vec<Vec<Scalar>>> = IndexMap::new();
        let mut unmatched = RawTables::new();
        for (name, rows) in raw {
            match options.unprefixed(&name).and_then(|n| schema.table(n)) {
                Some(table) => {
                    check_duplicate_keys(table, &rows)?;
                    matched.insert(table.name(), rows);
                }
                None => {
                    unmatched.insert(name, rows);
                }
            }
        }

        let mut dataset = Dataset::new();
        for table in schema.tables() {
            let rows = matched.swap_remove(table.name()).unwrap_or_default();
            dataset.insert_table(table.name(), build_table(table, rows)?);
        }
        dataset.set_unmatched(unmatched);
        Ok(dataset)
    }

    fn step(&mut self, position: usize, ch: char) -> Result<()> {
        if matches!(self.state, State::RowString | State::FieldString) {
            self.step_string(ch)?;
            return Ok(());
        }

        let mut ch = ch;
        if ch.is_whitespace() || ch == '{' || ch == ';' {
            let bare_value = matches!(self.state, State::Field | State::Number | State::RowScalar);
            if bare_value && !self.options.comma_required {
                ch = ',';
            } else {
                return Ok(());
            }
        }

        match ch {
            '=' => self.open_table(position),
            '<' => {
                if self.state != State::TableOpen {
                    return Err(Error::syntax(position, ch, "rows can only open inside a table body"));
                }
                self.state = State::Row;
                Ok(())
            }
            '"' => {
                self.state = match self.state {
                    State::Row => State::FieldString,
                    State::TableOpen => State::RowString,
                    _ => return Err(Error::syntax(position, ch, "string is not allowed here")),
                };
                Ok(())
            }
            ',' => self.separator(position),
            '>' => self.close_row(position),
            '}' => self.close_table(position),
            _ => self.accumulate(position, ch),
        }
    }

    fn step_string(&mut self, ch: char) -> Result<()> {
        if ch != '"' {
            self.field.push(ch);
            return Ok(());
        }
        if self.prev == Some('\\') {
            self.field.pop();
            self.field.push('"');
            return Ok(());
        }
        match self.state {
            State::RowString => {
                let text = std::mem::take(&mut self.field);
                self.row.push(Scalar::Text(text));
                self.complete_row()?;
                self.state = State::TableOpen;
            }
            _ => self.state = State::Field,
        }
        Ok(())
    }

    fn open_table(&mut self, position: usize) -> Result<()> {
        match self.state {
            State::TableName => {}
            State::Idle => return Err(Error::syntax(position, '=', "table name can't be blank")),
            _ => return Err(Error::syntax(position, '=', "a table is already open")),
        }
        if self.tables.contains_key(&self.table_name) {
            return Err(Error::duplicate_table(position, &self.table_name));
        }
        self.tables.insert(self.table_name.clone(), Vec::new());
        self.state = State::TableOpen;
        Ok(())
    }

    fn separator(&mut self, position: usize) -> Result<()> {
        match self.state {
            State::TableOpen => {}
            State::Row if !self.options.comma_required => {}
            State::Row => return Err(Error::syntax(position, ',', "empty field")),
            State::Field => {
                self.flush_text();
                self.state = State::Row;
            }
            State::Number => {
                self.flush_number(position)?;
                self.state = State::Row;
            }
            State::RowScalar => {
                self.flush_number(position)?;
                self.complete_row()?;
                self.state = State::TableOpen;
            }
            _ => return Err(Error::syntax(position, ',', "separator outside a table body")),
        }
        Ok(())
    }

    fn close_row(&mut self, position: usize) -> Result<()> {
        match self.state {
            State::Row => {}
            State::Field => self.flush_text(),
            State::Number => self.flush_number(position)?,
            _ => return Err(Error::syntax(position, '>', "no row is open")),
        }
        if self.row.is_empty() {
            return Err(Error::syntax(position, '>', "empty row"));
        }
        self.complete_row()?;
        self.state = State::TableOpen;
        Ok(())
    }

    fn close_table(&mut self, position: usize) -> Result<()> {
        match self.state {
            State::TableOpen => {}
            State::RowScalar => {
                self.flush_number(position)?;
                self.complete_row()?;
            }
            _ => return Err(Error::syntax(position, '}', "no table body is open")),
        }
        trace!(
            table = %self.table_name,
            rows = self.tables.get(&self.table_name).map_or(0, Vec::len),
            "scanned table"
        );
        self.table_name.clear();
        self.state = State::Idle;
        Ok(())
    }

    fn accumulate(&mut self, position: usize, ch: char) -> Result<()> {
        self.state = match self.state {
            State::Idle | State::TableName => {
                self.table_name.push(ch);
                State::TableName
            }
            State::TableOpen | State::RowScalar => {
                self.field.push(ch);
                State::RowScalar
            }
            State::Row | State::Number => {
                self.field.push(ch);
                State::Number
            }
            _ => {
                return Err(Error::syntax(
                    position,
                    ch,
                    "expected ',' or '>' after a string",
                ))
            }
        };
        Ok(())
    }

    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.field);
        self.row.push(Scalar::Text(text));
    }

    fn flush_number(&mut self, position: usize) -> Result<()> {
        let number =
            parse_decimal(&self.field).ok_or_else(|| Error::invalid_number(position, &self.field))?;
        self.field.clear();
        self.row.push(Scalar::Number(number));
        Ok(())
    }

    fn complete_row(&mut self) -> Result<()> {
        let row = std::mem::take(&mut self.row);
        let rows = self.tables.entry(self.table_name.clone()).or_default();
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(Error::arity_mismatch(
                    &self.table_name,
                    first.len(),
                    row.len(),
                ));
            }
        }
        rows.push(row);
        Ok(())
    }

    fn finish(&self, position: usize) -> Result<()> {
        let expected = match self.state {
            State::Idle => return Ok(()),
            State::TableName => "'=' after the table name",
            State::RowString | State::FieldString => "closing '\"'",
            State::Row | State::Field | State::Number => "'>'",
            State::TableOpen | State::RowScalar => "'}'",
        };
        Err(Error::unexpected_eof(position, expected))
    }
}

/// Parses a strict decimal literal: optional sign, digits with an optional fraction,
/// optional exponent. Whole literals that fit `i64` become integers.
///
/// # Examples
///
/// ```rust
/// use opl_dat::de::parse_decimal;
/// use opl_dat::Number;
///
/// assert_eq!(parse_decimal("42"), Some(Number::Integer(42)));
/// assert_eq!(parse_decimal("-2.5e3"), Some(Number::Float(-2500.0)));
/// assert_eq!(parse_decimal("inf"), None);
/// assert_eq!(parse_decimal("1.2.3"), None);
/// ```
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Number> {
    let mut digits = 0;
    let mut exponent_digits = 0;
    let mut seen_dot = false;
    let mut seen_exponent = false;
    let mut prev: Option<char> = None;

    for ch in text.chars() {
        match ch {
            '0'..='9' if seen_exponent => exponent_digits += 1,
            '0'..='9' => digits += 1,
            '.' if !seen_dot && !seen_exponent => seen_dot = true,
            'e' | 'E' if !seen_exponent && digits > 0 => seen_exponent = true,
            '+' | '-' if prev.is_none() || matches!(prev, Some('e' | 'E')) => {}
            _ => return None,
        }
        prev = Some(ch);
    }
    if digits == 0 || (seen_exponent && exponent_digits == 0) {
        return None;
    }

    if !seen_dot && !seen_exponent {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Integer(i));
        }
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Number::Float)
}

fn check_duplicate_keys(table: &TableSchema, rows: &[Vec<Scalar>]) -> Result<()> {
    if !table.is_keyed() {
        return Ok(());
    }
    let arity = table.primary_key_fields().len();
    let mut seen = IndexSet::with_capacity(rows.len());
    for row in rows {
        let key = &row[..arity.min(row.len())];
        if !seen.insert(key) {
            return Err(Error::duplicate_key(table.name(), &format_key(key)));
        }
    }
    Ok(())
}

fn build_table(schema: &TableSchema, rows: Vec<Vec<Scalar>>) -> Result<Table> {
    let arity = schema.primary_key_fields().len();
    let mut table = Table::empty_for(schema);
    for mut values in rows {
        if values.len() != schema.field_count() {
            return Err(Error::validation(
                schema.name(),
                format!(
                    "rows have {} values, expected {}",
                    values.len(),
                    schema.field_count()
                ),
            ));
        }
        let data = values.split_off(arity);
        let mut row = Row::with_capacity(data.len());
        for (field, value) in schema.data_fields().iter().zip(data) {
            row.insert(field.clone(), value);
        }
        match &mut table {
            Table::Keyed(keyed) => {
                keyed.insert(values, row);
            }
            Table::Unkeyed(list) => list.push(row),
        }
    }
    Ok(table)
}
