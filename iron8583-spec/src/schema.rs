/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for ISO 8583 dialects.
//!
//! This module defines the structures that describe a message dialect:
//! - [`FieldSpec`]: per-field wire layout and payload interpretation
//! - [`FieldKind`]: fixed, variable (L/LL/LLL), or bitmap framing
//! - [`DataType`], [`Encoding`], [`Padding`]: payload attributes
//! - [`Spec`]: the complete dialect, owning every field definition
//!
//! Composite fields reference their subfields by index into the owning
//! spec's subfield arena, so the field table holds sole ownership and the
//! spec graph stays acyclic.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Highest data element number addressable through the secondary bitmap.
pub const MAX_FIELD_NUMBER: usize = 128;

/// Wire framing of a field: fixed-length, variable-length with a decimal
/// length indicator, or a raw bitmap block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// Fixed-length field; `length` bytes on the wire.
    Fixed,
    /// Variable-length field with a 1-digit length indicator.
    LVar,
    /// Variable-length field with a 2-digit length indicator.
    LlVar,
    /// Variable-length field with a 3-digit length indicator.
    LllVar,
    /// Bitmap block (8 or 16 bytes), located like a fixed field.
    Bitmap,
}

impl FieldKind {
    /// Returns the number of decimal digits in the length indicator
    /// (1 for L, 2 for LL, 3 for LLL, 0 otherwise).
    #[inline]
    #[must_use]
    pub const fn length_indicator_digits(self) -> usize {
        match self {
            Self::LVar => 1,
            Self::LlVar => 2,
            Self::LllVar => 3,
            Self::Fixed | Self::Bitmap => 0,
        }
    }

    /// Returns true if the field carries a length indicator.
    #[inline]
    #[must_use]
    pub const fn is_variable(self) -> bool {
        matches!(self, Self::LVar | Self::LlVar | Self::LllVar)
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fixed => "Fixed",
            Self::LVar => "L",
            Self::LlVar => "LL",
            Self::LllVar => "LLL",
            Self::Bitmap => "Bitmap",
        };
        write!(f, "{}", s)
    }
}

/// Character class of a field's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Decimal digits only (ISO class `n`).
    Numeric,
    /// Letters only (ISO class `a`).
    Alpha,
    /// Letters and digits (ISO class `an`).
    Alphanumeric,
    /// Letters, digits, and special characters (ISO class `ans`).
    AlphanumericSpecial,
    /// Raw binary data (ISO class `b`).
    Binary,
}

/// Byte-level encoding of a field's payload on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// 7-bit ASCII, one character per byte.
    Ascii,
    /// EBCDIC code page 037, one character per byte.
    Ebcdic,
    /// Packed BCD, two decimal digits per byte.
    Bcd,
    /// Raw binary pass-through.
    Binary,
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ascii => "ASCII",
            Self::Ebcdic => "EBCDIC",
            Self::Bcd => "BCD",
            Self::Binary => "Binary",
        };
        write!(f, "{}", s)
    }
}

/// Padding applied to a fixed field whose value is shorter than its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Padding {
    /// No padding; a short value is an error.
    #[default]
    None,
    /// Pad on the left (value right-justified).
    Left,
    /// Pad on the right (value left-justified).
    Right,
    /// Pad on both sides (value centered).
    Center,
}

/// Dialect-wide field defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefaults {
    /// Default payload encoding.
    pub encoding: Encoding,
    /// Default padding side.
    pub padding: Padding,
    /// Default pad character.
    pub pad_char: char,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            encoding: Encoding::Ascii,
            padding: Padding::None,
            pad_char: ' ',
        }
    }
}

/// Specification of a single data element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field number (2..=128 for wire fields; subfield-local for children).
    pub number: usize,
    /// Field name.
    pub name: String,
    /// Alternative names for lookup and display.
    pub aliases: Vec<String>,
    /// Wire framing.
    pub kind: FieldKind,
    /// On-wire byte length for `Fixed` and `Bitmap` fields.
    pub length: usize,
    /// Maximum data length for variable fields.
    pub max_length: usize,
    /// Payload character class.
    pub data_type: DataType,
    /// Payload encoding.
    pub encoding: Encoding,
    /// Padding side for fixed fields.
    pub padding: Padding,
    /// Pad character for fixed fields.
    pub pad_char: char,
    /// Human-readable description.
    pub description: Option<String>,
    /// BER-TLV tag, for fields addressed inside a TLV template.
    pub tag: Option<String>,
    /// Ordered subfield indices into the owning spec's subfield arena.
    pub children: Vec<usize>,
}

impl FieldSpec {
    /// Creates a field specification with ASCII encoding, no padding, and
    /// alphanumeric payload; adjust with the `with_*` builder methods.
    ///
    /// # Arguments
    /// * `number` - The field number
    /// * `name` - The field name
    /// * `kind` - The wire framing
    #[must_use]
    pub fn new(number: usize, name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            number,
            name: name.into(),
            aliases: Vec::new(),
            kind,
            length: 0,
            max_length: 0,
            data_type: DataType::Alphanumeric,
            encoding: Encoding::Ascii,
            padding: Padding::None,
            pad_char: ' ',
            description: None,
            tag: None,
            children: Vec::new(),
        }
    }

    /// Sets the fixed on-wire length.
    #[must_use]
    pub const fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Sets the maximum data length for a variable field.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the payload character class.
    #[must_use]
    pub const fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Sets the payload encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the padding side and pad character.
    #[must_use]
    pub const fn with_padding(mut self, padding: Padding, pad_char: char) -> Self {
        self.padding = padding;
        self.pad_char = pad_char;
        self
    }

    /// Adds an alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the BER-TLV tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the ordered subfield arena indices for a composite field.
    #[must_use]
    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children = children;
        self
    }
}

/// Errors raised by [`Spec::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// Field number outside the addressable range.
    #[error("field {field}: number outside 2..=128")]
    FieldNumberOutOfRange {
        /// The offending field number.
        field: usize,
    },

    /// Field 1 is the secondary-bitmap indicator and may not carry data.
    #[error("field 1 is reserved for the secondary bitmap")]
    FieldOneReserved,

    /// A fixed or bitmap field declared without a positive length.
    #[error("field {field}: {kind} field requires length > 0")]
    MissingLength {
        /// The offending field number.
        field: usize,
        /// The declared kind.
        kind: FieldKind,
    },

    /// A variable field whose max length does not fit its indicator.
    #[error("field {field}: max length {max_length} does not fit in {digits} digit(s)")]
    MaxLengthTooLarge {
        /// The offending field number.
        field: usize,
        /// The declared maximum length.
        max_length: usize,
        /// Indicator digit count for the field's kind.
        digits: usize,
    },

    /// A composite field referencing a subfield index outside the arena.
    #[error("field {field}: child index {index} not in subfield arena")]
    UnknownChild {
        /// The offending field number.
        field: usize,
        /// The dangling arena index.
        index: usize,
    },
}

/// A complete message dialect: one shared, immutable description of every
/// data element's wire layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spec {
    /// Dialect name.
    pub name: String,
    /// Dialect version.
    pub version: String,
    /// Dialect-wide field defaults.
    pub defaults: FieldDefaults,
    /// Field definitions indexed by field number.
    fields: HashMap<usize, FieldSpec>,
    /// Subfield arena; composite fields reference entries by index.
    subfields: Vec<FieldSpec>,
}

impl Spec {
    /// Creates an empty dialect.
    ///
    /// # Arguments
    /// * `name` - The dialect name
    /// * `version` - The dialect version
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            defaults: FieldDefaults::default(),
            fields: HashMap::new(),
            subfields: Vec::new(),
        }
    }

    /// Sets the dialect-wide defaults.
    #[must_use]
    pub const fn with_defaults(mut self, defaults: FieldDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Adds a field definition, replacing any previous definition of the
    /// same number.
    pub fn add_field(&mut self, field: FieldSpec) {
        self.fields.insert(field.number, field);
    }

    /// Adds a subfield definition to the arena and returns its index, for
    /// use in [`FieldSpec::with_children`].
    pub fn add_subfield(&mut self, subfield: FieldSpec) -> usize {
        self.subfields.push(subfield);
        self.subfields.len() - 1
    }

    /// Gets a field definition by number.
    #[must_use]
    pub fn field(&self, number: usize) -> Option<&FieldSpec> {
        self.fields.get(&number)
    }

    /// Gets a field definition by name or alias.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .values()
            .find(|f| f.name == name || f.aliases.iter().any(|a| a == name))
    }

    /// Gets a subfield definition by arena index.
    #[must_use]
    pub fn subfield(&self, index: usize) -> Option<&FieldSpec> {
        self.subfields.get(index)
    }

    /// Returns the subfield specs of a composite field in declaration
    /// order, skipping dangling indices.
    pub fn children_of<'a>(
        &'a self,
        field: &'a FieldSpec,
    ) -> impl Iterator<Item = &'a FieldSpec> {
        field.children.iter().filter_map(|&i| self.subfields.get(i))
    }

    /// Returns an iterator over all field definitions.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// Returns the number of defined fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks the dialect invariants: field numbers in 2..=128, field 1
    /// never defined as data, positive lengths for fixed and bitmap
    /// fields, variable max lengths that fit their indicators, and child
    /// references that resolve.
    ///
    /// # Errors
    /// Returns the first [`SpecError`] found, checking fields in
    /// ascending number order.
    pub fn validate(&self) -> Result<(), SpecError> {
        let mut numbers: Vec<usize> = self.fields.keys().copied().collect();
        numbers.sort_unstable();

        for number in numbers {
            let field = &self.fields[&number];
            if number == 1 {
                return Err(SpecError::FieldOneReserved);
            }
            if number < 2 || number > MAX_FIELD_NUMBER {
                return Err(SpecError::FieldNumberOutOfRange { field: number });
            }
            Self::validate_field(field)?;
            for &index in &field.children {
                match self.subfields.get(index) {
                    Some(child) => Self::validate_field(child)?,
                    None => return Err(SpecError::UnknownChild {
                        field: number,
                        index,
                    }),
                }
            }
        }

        Ok(())
    }

    fn validate_field(field: &FieldSpec) -> Result<(), SpecError> {
        match field.kind {
            FieldKind::Fixed | FieldKind::Bitmap => {
                if field.length == 0 {
                    return Err(SpecError::MissingLength {
                        field: field.number,
                        kind: field.kind,
                    });
                }
            }
            FieldKind::LVar | FieldKind::LlVar | FieldKind::LllVar => {
                let digits = field.kind.length_indicator_digits();
                let max_expressible = 10usize.pow(digits as u32) - 1;
                if field.max_length > max_expressible {
                    return Err(SpecError::MaxLengthTooLarge {
                        field: field.number,
                        max_length: field.max_length,
                        digits,
                    });
                }
            }
        }
        Ok(())
    }
}
