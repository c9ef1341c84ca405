//! The full encode/decode pipeline.
//!
//! [`Codec`] ties the pieces together. Encoding runs:
//!
//! 1. the case/space duplicate check
//! 2. reserved-word escaping of the schema (fails on marker-prefixed fields)
//! 3. dataset validation against the caller's schema
//! 4. the [`Serializer`]
//!
//! Decoding runs the same schema checks, then the [`Deserializer`] against the escaped
//! schema, and finally unescapes field names so the caller sees the original ones.
//!
//! ```rust
//! use opl_dat::{key, row, Codec, CodecOptions, Dataset, Schema, Table, TableSchema};
//!
//! let schema = Schema::new()
//!     .with_table(TableSchema::new("totals", ["item"], ["sum"]).unwrap())
//!     .unwrap();
//! let mut dataset = Dataset::new();
//! dataset.insert_table("totals", Table::keyed([(key!["bolts"], row! { "sum" => 12 })]));
//!
//! let codec = Codec::new(CodecOptions::new().with_name_prefix("in_"));
//! let text = codec.encode(&schema, &dataset).unwrap();
//! assert_eq!(text, "in_totals = {\n<\"bolts\", 12>\n};\n");
//! assert_eq!(codec.decode(&schema, &text).unwrap(), dataset);
//! ```

use crate::normalize::{self, KeywordNormalizer, ReservedWords};
use crate::{CodecOptions, Dataset, Deserializer, Result, Schema, Serializer};
use tracing::debug;

/// Encoder and decoder sharing one configuration.
#[derive(Clone, Debug)]
pub struct Codec {
    options: CodecOptions,
    normalizer: KeywordNormalizer,
}

impl Codec {
    /// Creates a codec that escapes the optimization language's keywords.
    #[must_use]
    pub fn new(options: CodecOptions) -> Self {
        let normalizer = KeywordNormalizer::new(ReservedWords::opl(), options.escape_marker);
        Codec {
            options,
            normalizer,
        }
    }

    /// Replaces the reserved-word set.
    #[must_use]
    pub fn with_reserved_words(mut self, reserved: ReservedWords) -> Self {
        self.normalizer = KeywordNormalizer::new(reserved, self.options.escape_marker);
        self
    }

    #[must_use]
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    #[must_use]
    pub fn normalizer(&self) -> &KeywordNormalizer {
        &self.normalizer
    }

    /// Encodes `dataset` as text.
    ///
    /// # Errors
    ///
    /// Schema errors, [`Error::Validation`](crate::Error::Validation) if the dataset does
    /// not conform, and [`Error::Unencodable`](crate::Error::Unencodable) for values
    /// without a text form.
    pub fn encode(&self, schema: &Schema, dataset: &Dataset) -> Result<String> {
        normalize::ensure_no_case_space_duplicates(schema)?;
        let escaped_schema = self.normalizer.escape_schema(schema)?;
        dataset.validate(schema)?;
        let escaped_data = self.normalizer.escape_dataset(dataset);

        let mut serializer = Serializer::new(self.options.clone());
        serializer.serialize_dataset(&escaped_schema, &escaped_data)?;
        let text = serializer.into_inner();

        debug!(
            tables = schema.len(),
            bytes = text.len(),
            prefix = %self.options.name_prefix,
            "encoded dataset"
        );
        Ok(text)
    }

    /// Decodes text into a dataset shaped by `schema`.
    ///
    /// # Errors
    ///
    /// Schema errors, any format error from the scanner, and
    /// [`Error::Validation`](crate::Error::Validation) when a block's row width does not
    /// match its schema table.
    pub fn decode(&self, schema: &Schema, text: &str) -> Result<Dataset> {
        normalize::ensure_no_case_space_duplicates(schema)?;
        let escaped_schema = self.normalizer.escape_schema(schema)?;

        let dataset = Deserializer::from_str(text)
            .with_options(&self.options)
            .deserialize(&escaped_schema)?;
        let dataset = self.normalizer.unescape_dataset(&dataset);

        debug!(
            tables = dataset.len(),
            unmatched = dataset.unmatched().len(),
            bytes = text.len(),
            comma_required = self.options.comma_required,
            "decoded dataset"
        );
        Ok(dataset)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(CodecOptions::default())
    }
}
