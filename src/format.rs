//! The tabular text format
//!
//! This module documents the text format read and written by this crate: the `.dat`
//! data format of the OPL optimization language, restricted to tuple sets and flat sets.
//!
//! # Overview
//!
//! A document is a sequence of table blocks. Each block binds a table name to a body:
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
//! # Grammar
//!
//! ```text
//! text       := block*
//! block      := name "=" body ";"
//! body       := "{" (scalarlist | row*) "}"
//! scalarlist := scalar ("," scalar)*
//! row        := "<" field ("," field)* ">"
//! field      := string | number
//! string     := '"' char* '"'        # '\"' is an escaped literal quote
//! number     := decimal-literal
//! ```
//!
//! ## Insignificant characters
//!
//! Outside strings, whitespace, `{` and `;` are skipped. This makes `arcs = {` and
//! `arcs={` equivalent, and it also means whitespace inside a table name or a number is
//! dropped (`my table` reads as `mytable`).
//!
//! ## Legacy separators
//!
//! Some producers separate values with whitespace instead of commas:
//!
//! ```text
//! arcs = {<"Detroit" "Boston" 100>};
//! nodes = {1 2 3};
//! ```
//!
//! Decoding with `comma_required = false` treats whitespace that follows a bare value as
//! a separator. Strict decoding (the default) would read `1 2 3` as the number `123`.
//!
//! ## Strings
//!
//! Strings are double-quoted and may contain any character. A quote preceded by a
//! backslash is a literal quote; no other escape sequence exists, so a backslash is
//! otherwise kept as written. The encoder escapes embedded quotes and refuses text
//! ending in a backslash, which would escape its own closing quote.
//!
//! ## Numbers
//!
//! Numbers are decimal literals: optional sign, digits with an optional fraction and an
//! optional exponent (`42`, `-0.5`, `1e6`). `inf`, `nan`, hexadecimal and underscores are
//! rejected. Positive infinity has no literal; it is written as a finite sentinel
//! (999999 unless configured otherwise) and reads back as that number.
//!
//! # Table shapes
//!
//! | Schema | Body | Decoded as |
//! |--------|------|------------|
//! | one key field, no data fields | `{"a", "b"}` | keyed table, empty rows |
//! | key fields + data fields | `<k1, k2, d1>` per line | keyed table |
//! | no key fields, one data field | `{1, 2}` | unkeyed table |
//! | no key fields, several data fields | `<d1, d2>` per line | unkeyed table |
//!
//! Values appear in schema order: key fields first, then data fields.
//!
//! # Relational checks
//!
//! The grammar alone does not enforce these; the decoder does:
//!
//! - every row of a table has as many values as its first row
//! - a table name appears at most once
//! - in a keyed table, no two rows share a primary key
//!
//! # Name prefixes
//!
//! Model input and output live in one namespace, so a prefix (for example `in_` and
//! `out_`) can be prepended to every table name. The encoder writes the prefix and the
//! decoder strips it. Blocks without the prefix, or naming a table the schema lacks, are
//! returned untouched in [`Dataset::unmatched`](crate::Dataset::unmatched).
