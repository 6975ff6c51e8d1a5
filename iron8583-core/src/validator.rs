/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Composable message validation.
//!
//! Validation is layered: structural (every present field can be
//! located), format (mandatory fields, data types, lengths, patterns),
//! and business (ordered [`Rule`]s such as Luhn checks). Validators are
//! plain objects over the [`MessageRead`] interface, combined with
//! [`CompositeValidator`]; any closure over a reader lifts into a
//! validator directly.

use crate::error::ValidationError;
use crate::message::{Message, MessageRead};
use chrono::{NaiveDate, NaiveTime};
use iron8583_codec::codec_for;
use iron8583_spec::{DataType, FieldKind, Spec};

/// A single validation pass over a parsed message.
pub trait Validator: Send + Sync {
    /// Checks the message.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] naming the field and rule that
    /// failed.
    fn validate(&self, msg: &dyn MessageRead) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&dyn MessageRead) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        self(msg)
    }
}

/// Runs validators in sequence, stopping at the first failure.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn Validator>>,
}

impl CompositeValidator {
    /// Creates an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator.
    #[must_use]
    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl Validator for CompositeValidator {
    fn validate(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        for validator in &self.validators {
            validator.validate(msg)?;
        }
        Ok(())
    }
}

/// Re-locates every present field from the raw bytes.
///
/// A successful parse already implies this; run it again after a builder
/// produced or mutated the buffer.
#[derive(Debug, Clone, Copy)]
pub struct StructuralValidator<'a> {
    spec: &'a Spec,
}

impl<'a> StructuralValidator<'a> {
    /// Creates a structural validator for the given dialect.
    #[must_use]
    pub const fn new(spec: &'a Spec) -> Self {
        Self { spec }
    }
}

impl Validator for StructuralValidator<'_> {
    fn validate(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        let mut reparsed = Message::new(msg.bytes(), self.spec);
        reparsed
            .parse()
            .map_err(|source| ValidationError::Structure { source })
    }
}

/// Checks mandatory fields, data-type conformance, length bounds, and
/// opt-in field patterns (dates, times, amounts).
#[derive(Debug, Clone)]
pub struct FormatValidator<'a> {
    spec: &'a Spec,
    mandatory: Vec<usize>,
    date_fields: Vec<usize>,
    time_fields: Vec<usize>,
    amount_fields: Vec<usize>,
}

impl<'a> FormatValidator<'a> {
    /// Creates a format validator for the given dialect.
    #[must_use]
    pub fn new(spec: &'a Spec) -> Self {
        Self {
            spec,
            mandatory: Vec::new(),
            date_fields: Vec::new(),
            time_fields: Vec::new(),
            amount_fields: Vec::new(),
        }
    }

    /// Requires the listed fields to be present.
    #[must_use]
    pub fn with_mandatory(mut self, fields: impl IntoIterator<Item = usize>) -> Self {
        self.mandatory.extend(fields);
        self
    }

    /// Checks a present field against the MMDD date pattern.
    #[must_use]
    pub fn with_date_field(mut self, field: usize) -> Self {
        self.date_fields.push(field);
        self
    }

    /// Checks a present field against the hhmmss time pattern.
    #[must_use]
    pub fn with_time_field(mut self, field: usize) -> Self {
        self.time_fields.push(field);
        self
    }

    /// Checks a present field as an exact-width amount in minor units.
    #[must_use]
    pub fn with_amount_field(mut self, field: usize) -> Self {
        self.amount_fields.push(field);
        self
    }

    fn check_conformance(
        &self,
        msg: &dyn MessageRead,
        number: usize,
    ) -> Result<(), ValidationError> {
        let Some(field_spec) = self.spec.field(number) else {
            return Ok(()); // unknown fields already tolerated by parse
        };
        let field = msg.field(number);
        if !field.exists() {
            return Ok(());
        }

        // Length bounds are checked on the wire bytes.
        let wire_len = field.len();
        match field_spec.kind {
            FieldKind::Fixed | FieldKind::Bitmap => {
                if wire_len != field_spec.length {
                    return Err(ValidationError::InvalidFieldLength {
                        field: number,
                        min: field_spec.length,
                        max: field_spec.length,
                        actual: wire_len,
                    });
                }
            }
            FieldKind::LVar | FieldKind::LlVar | FieldKind::LllVar => {
                if wire_len > field_spec.max_length {
                    return Err(ValidationError::InvalidFieldLength {
                        field: number,
                        min: 0,
                        max: field_spec.max_length,
                        actual: wire_len,
                    });
                }
            }
        }

        // Character-class checks run on the decoded payload so packed
        // and translated encodings are judged by their content.
        if field_spec.data_type == DataType::Binary {
            return Ok(());
        }
        let codec = codec_for(field_spec.encoding);
        let (decoded, _) =
            codec
                .decode(field.bytes())
                .map_err(|e| ValidationError::InvalidFieldFormat {
                    field: number,
                    reason: e.to_string(),
                })?;

        let ok = match field_spec.data_type {
            DataType::Numeric => decoded.iter().all(u8::is_ascii_digit),
            DataType::Alpha => decoded.iter().all(u8::is_ascii_alphabetic),
            DataType::Alphanumeric => decoded.iter().all(u8::is_ascii_alphanumeric),
            DataType::AlphanumericSpecial => decoded
                .iter()
                .all(|b| b.is_ascii_graphic() || *b == b' '),
            DataType::Binary => true,
        };
        if !ok {
            return Err(ValidationError::InvalidFieldFormat {
                field: number,
                reason: format!("content violates {:?} class", field_spec.data_type),
            });
        }
        Ok(())
    }
}

impl Validator for FormatValidator<'_> {
    fn validate(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        for &field in &self.mandatory {
            if !msg.has_field(field) {
                return Err(ValidationError::MissingRequiredField { field });
            }
        }

        for number in msg.present_fields() {
            if number <= 1 {
                continue;
            }
            self.check_conformance(msg, number)?;
        }

        for &field in &self.date_fields {
            check_pattern(msg, field, is_valid_mmdd, "not a valid MMDD date")?;
        }
        for &field in &self.time_fields {
            check_pattern(msg, field, is_valid_hhmmss, "not a valid hhmmss time")?;
        }
        for &field in &self.amount_fields {
            let f = msg.field(field);
            if !f.exists() {
                continue;
            }
            let width = self.spec.field(field).map_or(f.len(), |s| s.length);
            let bytes = f.bytes();
            if bytes.len() != width || !bytes.iter().all(u8::is_ascii_digit) {
                return Err(ValidationError::InvalidFieldFormat {
                    field,
                    reason: format!("not a {width}-digit amount"),
                });
            }
        }

        Ok(())
    }
}

fn check_pattern(
    msg: &dyn MessageRead,
    field: usize,
    check: fn(&[u8]) -> bool,
    reason: &str,
) -> Result<(), ValidationError> {
    let f = msg.field(field);
    if !f.exists() {
        return Ok(());
    }
    if !check(f.bytes()) {
        return Err(ValidationError::InvalidFieldFormat {
            field,
            reason: reason.to_string(),
        });
    }
    Ok(())
}

fn two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() == 2 && bytes.iter().all(u8::is_ascii_digit) {
        Some(u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0'))
    } else {
        None
    }
}

fn is_valid_mmdd(bytes: &[u8]) -> bool {
    if bytes.len() != 4 {
        return false;
    }
    let (Some(month), Some(day)) = (two_digits(&bytes[..2]), two_digits(&bytes[2..])) else {
        return false;
    };
    // MMDD carries no year; judge day-in-month against a leap year so
    // 0229 is accepted.
    NaiveDate::from_ymd_opt(2000, month, day).is_some()
}

fn is_valid_hhmmss(bytes: &[u8]) -> bool {
    if bytes.len() != 6 {
        return false;
    }
    let (Some(h), Some(m), Some(s)) = (
        two_digits(&bytes[..2]),
        two_digits(&bytes[2..4]),
        two_digits(&bytes[4..]),
    ) else {
        return false;
    };
    NaiveTime::from_hms_opt(h, m, s).is_some()
}

/// A single business rule over a parsed message.
pub trait Rule: Send + Sync {
    /// Checks the rule.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the rule fails.
    fn check(&self, msg: &dyn MessageRead) -> Result<(), ValidationError>;
}

/// Runs business rules in order, stopping at the first failure.
#[derive(Default)]
pub struct BusinessValidator {
    rules: Vec<Box<dyn Rule>>,
}

impl BusinessValidator {
    /// Creates an empty business validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

impl Validator for BusinessValidator {
    fn validate(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        for rule in &self.rules {
            rule.check(msg)?;
        }
        Ok(())
    }
}

/// Requires every listed field to be present.
#[derive(Debug, Clone)]
pub struct RequiredFields {
    fields: Vec<usize>,
}

impl RequiredFields {
    /// Creates the rule.
    #[must_use]
    pub fn new(fields: impl Into<Vec<usize>>) -> Self {
        Self {
            fields: fields.into(),
        }
    }
}

impl Rule for RequiredFields {
    fn check(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        for &field in &self.fields {
            if !msg.has_field(field) {
                return Err(ValidationError::MissingRequiredField { field });
            }
        }
        Ok(())
    }
}

/// Requires every listed, present field to contain only decimal digits.
#[derive(Debug, Clone)]
pub struct NumericFields {
    fields: Vec<usize>,
}

impl NumericFields {
    /// Creates the rule.
    #[must_use]
    pub fn new(fields: impl Into<Vec<usize>>) -> Self {
        Self {
            fields: fields.into(),
        }
    }
}

impl Rule for NumericFields {
    fn check(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        for &field in &self.fields {
            if !msg.has_field(field) {
                continue;
            }
            let data = msg.field(field);
            if !data.bytes().iter().all(u8::is_ascii_digit) {
                return Err(ValidationError::InvalidFieldFormat {
                    field,
                    reason: "must be numeric".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Validates a PAN field with the Luhn mod-10 checksum; skipped when the
/// field is absent.
#[derive(Debug, Clone, Copy)]
pub struct LuhnCheck {
    field: usize,
}

impl LuhnCheck {
    /// Creates the rule for a field (conventionally field 2, the PAN).
    #[must_use]
    pub const fn new(field: usize) -> Self {
        Self { field }
    }
}

impl Rule for LuhnCheck {
    fn check(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        if !msg.has_field(self.field) {
            return Ok(());
        }
        if !luhn_valid(msg.field(self.field).bytes()) {
            return Err(ValidationError::LuhnCheckFailed { field: self.field });
        }
        Ok(())
    }
}

/// Mod-10 check: walking left to right with parity `len % 2`, digits at
/// indices matching the parity are doubled (minus 9 above 9) before
/// summing; the total must divide by 10. Non-digits fail outright.
#[must_use]
pub fn luhn_valid(digits: &[u8]) -> bool {
    let parity = digits.len() % 2;
    let mut sum = 0u32;

    for (i, &byte) in digits.iter().enumerate() {
        if !byte.is_ascii_digit() {
            return false;
        }
        let mut d = u32::from(byte - b'0');
        if i % 2 == parity {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }

    sum % 10 == 0
}

/// Bounds a present field's byte length; skipped when absent.
#[derive(Debug, Clone, Copy)]
pub struct FieldLength {
    field: usize,
    min: usize,
    max: usize,
}

impl FieldLength {
    /// Creates the rule.
    #[must_use]
    pub const fn new(field: usize, min: usize, max: usize) -> Self {
        Self { field, min, max }
    }
}

impl Rule for FieldLength {
    fn check(&self, msg: &dyn MessageRead) -> Result<(), ValidationError> {
        if !msg.has_field(self.field) {
            return Ok(());
        }
        let actual = msg.field(self.field).len();
        if actual < self.min || actual > self.max {
            return Err(ValidationError::InvalidFieldLength {
                field: self.field,
                min: self.min,
                max: self.max,
                actual,
            });
        }
        Ok(())
    }
}
