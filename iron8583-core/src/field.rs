/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Typed, zero-copy field accessors.
//!
//! A [`Field`] wraps the located bytes of one data element. Accessors are
//! total: a non-existent field answers every typed getter with an empty
//! or zero value, so callers never null-check. Fallible variants
//! (`try_*`) are provided where the distinction matters.
//!
//! Composite fields resolve their subfields lazily: the first
//! [`Field::subfield`] call walks the child specs in declaration order
//! and caches every produced child, making repeated access O(1).

use crate::error::DecodeError;
use crate::locator::FieldLocator;
use iron8583_spec::FieldSpec;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::str::FromStr;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Zero-copy view over one field's bytes, with typed conversion.
#[derive(Debug, Clone)]
pub struct Field<'a> {
    data: &'a [u8],
    exists: bool,
    spec: Option<&'a FieldSpec>,
    locator: Option<FieldLocator<'a>>,
    children: OnceCell<BTreeMap<usize, Field<'a>>>,
}

impl<'a> Field<'a> {
    /// Creates a field over raw data.
    #[must_use]
    pub fn new(data: &'a [u8], exists: bool) -> Self {
        Self {
            data,
            exists,
            spec: None,
            locator: None,
            children: OnceCell::new(),
        }
    }

    /// Creates a field that knows its spec and can resolve subfields.
    #[must_use]
    pub fn with_spec(
        data: &'a [u8],
        exists: bool,
        spec: Option<&'a FieldSpec>,
        locator: Option<FieldLocator<'a>>,
    ) -> Self {
        Self {
            data,
            exists,
            spec,
            locator,
            children: OnceCell::new(),
        }
    }

    /// The canonical non-existent field.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(&[], false)
    }

    /// Returns true if the field is present in the message.
    #[inline]
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    /// Returns the raw field bytes; empty when absent. The slice borrows
    /// from the message buffer, no copy is made.
    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        if self.exists {
            self.data
        } else {
            &[]
        }
    }

    /// Returns the field's spec, when known.
    #[inline]
    #[must_use]
    pub const fn spec(&self) -> Option<&'a FieldSpec> {
        self.spec
    }

    /// Returns the field as text; empty when absent. Bytes outside UTF-8
    /// are replaced rather than failing, matching the accessor's
    /// total-getter contract.
    #[must_use]
    pub fn as_str(&self) -> Cow<'a, str> {
        if !self.exists {
            return Cow::Borrowed("");
        }
        String::from_utf8_lossy(self.data)
    }

    /// Returns the field parsed as `i64`, or 0 when absent or invalid.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.try_i64().unwrap_or(0)
    }

    /// Returns the field parsed as `i64`.
    ///
    /// # Errors
    /// Returns [`DecodeError::FieldNotPresent`] when the field is absent,
    /// or [`DecodeError::InvalidFieldValue`] when the bytes do not parse.
    pub fn try_i64(&self) -> Result<i64, DecodeError> {
        self.try_parse()
    }

    /// Returns the field parsed as `u64`, or 0 when absent or invalid.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.try_u64().unwrap_or(0)
    }

    /// Returns the field parsed as `u64`.
    ///
    /// # Errors
    /// Same contract as [`Field::try_i64`].
    pub fn try_u64(&self) -> Result<u64, DecodeError> {
        self.try_parse()
    }

    /// Returns the field parsed as a decimal, or zero when absent or
    /// invalid. Amount fields carry implied minor units; scaling is the
    /// caller's concern.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        self.try_decimal().unwrap_or_default()
    }

    /// Returns the field parsed as a decimal.
    ///
    /// # Errors
    /// Same contract as [`Field::try_i64`].
    pub fn try_decimal(&self) -> Result<Decimal, DecodeError> {
        self.try_parse()
    }

    fn try_parse<T: FromStr>(&self) -> Result<T, DecodeError> {
        if !self.exists {
            return Err(DecodeError::FieldNotPresent);
        }
        let s = self.as_str();
        s.parse().map_err(|_| DecodeError::InvalidFieldValue {
            reason: format!(
                "failed to parse {:?} as {}",
                s,
                std::any::type_name::<T>()
            ),
        })
    }

    /// Returns the field bytes as a lowercase hex string; empty when
    /// absent.
    #[must_use]
    pub fn hex(&self) -> String {
        if !self.exists {
            return String::new();
        }
        let mut out = String::with_capacity(self.data.len() * 2);
        for &byte in self.data {
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
        }
        out
    }

    /// Returns the field length in bytes; 0 when absent.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        if self.exists {
            self.data.len()
        } else {
            0
        }
    }

    /// Returns true if the field is absent or empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a subfield of a composite field by subfield number, or a
    /// non-existent field. The first call materializes and caches every
    /// child; later calls are lookups.
    #[must_use]
    pub fn subfield(&self, number: usize) -> Field<'a> {
        if !self.exists {
            return Self::absent();
        }

        self.children
            .get_or_init(|| self.locate_children())
            .get(&number)
            .cloned()
            .unwrap_or_else(Self::absent)
    }

    /// Returns true if subfields have been materialized for this field.
    #[must_use]
    pub fn has_subfields(&self) -> bool {
        self.children.get().is_some_and(|c| !c.is_empty())
    }

    /// Walks the child specs in declaration order from offset 0 of this
    /// field's data. A child that cannot be located ends the walk; the
    /// children before it stay available.
    fn locate_children(&self) -> BTreeMap<usize, Field<'a>> {
        let mut children = BTreeMap::new();
        let (Some(spec), Some(locator)) = (self.spec, self.locator) else {
            return children;
        };

        let mut offset = 0;
        for child_spec in locator.spec().children_of(spec) {
            let Ok(cursor) = locator.locate_spec(self.data, child_spec, offset) else {
                break;
            };
            let Some(data) = cursor.extract(self.data) else {
                break;
            };
            offset = cursor.next_offset();
            children.insert(
                child_spec.number,
                Field::with_spec(data, true, Some(child_spec), Some(locator)),
            );
        }
        children
    }
}

impl Default for Field<'_> {
    fn default() -> Self {
        Self::absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iron8583_spec::{DataType, FieldKind, Spec};

    #[test]
    fn test_absent_field_is_total() {
        let field = Field::absent();
        assert!(!field.exists());
        assert_eq!(field.bytes(), b"");
        assert_eq!(field.as_str(), "");
        assert_eq!(field.as_i64(), 0);
        assert_eq!(field.as_u64(), 0);
        assert_eq!(field.hex(), "");
        assert_eq!(field.len(), 0);
        assert!(field.is_empty());
        assert!(!field.subfield(1).exists());
        assert!(!field.has_subfields());
    }

    #[test]
    fn test_absent_field_try_errors() {
        let field = Field::absent();
        assert_eq!(field.try_i64(), Err(DecodeError::FieldNotPresent));
        assert_eq!(field.try_u64(), Err(DecodeError::FieldNotPresent));
        assert!(field.try_decimal().is_err());
    }

    #[test]
    fn test_field_string_and_int() {
        let field = Field::new(b"000001", true);
        assert_eq!(field.as_str(), "000001");
        assert_eq!(field.as_i64(), 1);
        assert_eq!(field.try_u64().unwrap(), 1);
        assert_eq!(field.len(), 6);
    }

    #[test]
    fn test_field_invalid_int() {
        let field = Field::new(b"12A4", true);
        assert_eq!(field.as_i64(), 0);
        assert!(matches!(
            field.try_i64(),
            Err(DecodeError::InvalidFieldValue { .. })
        ));
    }

    #[test]
    fn test_field_hex_lowercase() {
        let field = Field::new(&[0x9F, 0x02, 0x00], true);
        assert_eq!(field.hex(), "9f0200");
    }

    #[test]
    fn test_field_decimal() {
        let field = Field::new(b"000000001000", true);
        assert_eq!(field.as_decimal(), Decimal::from(1000));
    }

    #[test]
    fn test_field_bytes_are_borrowed() {
        let buf = b"1234567890123456".to_vec();
        let field = Field::new(&buf, true);
        assert!(std::ptr::eq(field.bytes().as_ptr(), buf.as_ptr()));
    }

    fn composite_spec() -> Spec {
        let mut spec = Spec::new("test", "1");
        let name = spec.add_subfield(
            FieldSpec::new(1, "Name", FieldKind::Fixed)
                .with_length(5)
                .with_data_type(DataType::AlphanumericSpecial),
        );
        let city = spec.add_subfield(
            FieldSpec::new(2, "City", FieldKind::Fixed)
                .with_length(6)
                .with_data_type(DataType::AlphanumericSpecial),
        );
        spec.add_field(
            FieldSpec::new(43, "Location", FieldKind::Fixed)
                .with_length(11)
                .with_children(vec![name, city]),
        );
        spec
    }

    #[test]
    fn test_subfield_resolution() {
        let spec = composite_spec();
        let locator = FieldLocator::new(&spec);
        let data = b"ACME LONDON";

        let field = Field::with_spec(data, true, spec.field(43), Some(locator));
        assert!(!field.has_subfields());

        assert_eq!(field.subfield(1).as_str(), "ACME ");
        assert_eq!(field.subfield(2).as_str(), "LONDON");
        assert!(field.has_subfields());
        assert!(!field.subfield(3).exists());
    }

    #[test]
    fn test_subfield_truncated_data_stops_walk() {
        let spec = composite_spec();
        let locator = FieldLocator::new(&spec);
        // Only the first child fits.
        let data = b"ACME LON";

        let field = Field::with_spec(data, true, spec.field(43), Some(locator));
        assert_eq!(field.subfield(1).as_str(), "ACME ");
        assert!(!field.subfield(2).exists());
    }

    #[test]
    fn test_subfield_without_spec() {
        let field = Field::new(b"ACME LONDON", true);
        assert!(!field.subfield(1).exists());
    }
}
