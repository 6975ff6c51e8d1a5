/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # iron8583 Core
//!
//! Zero-copy ISO 8583 message parsing, construction, and validation.
//!
//! This crate provides the working parts of the iron8583 engine:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Bitmap**: the 64/128-bit field presence vector
//! - **Cursor / locator**: spec-driven field location without copying
//! - **Field**: typed, always-total accessors over located bytes
//! - **Message / OwnedMessage**: borrowed and owned readers
//! - **MessageBuilder**: the construction path
//! - **Validator framework**: structural, format, and business layers
//!
//! ## Zero-Copy Design
//!
//! A parsed [`Message`] holds the borrowed buffer plus one cursor per
//! present field; `field(n).bytes()` is a sub-slice of the original
//! buffer. The builder is the only place that allocates a message
//! buffer, and its output never aliases an input.

pub mod bitmap;
pub mod builder;
pub mod cursor;
pub mod error;
pub mod field;
pub mod locator;
pub mod message;
pub mod types;
pub mod validator;

pub use bitmap::Bitmap;
pub use builder::MessageBuilder;
pub use cursor::Cursor;
pub use error::{DecodeError, EncodeError, Iso8583Error, Result, ValidationError};
pub use field::Field;
pub use locator::FieldLocator;
pub use message::{Message, MessageRead, OwnedMessage, MIN_MESSAGE_LENGTH};
pub use types::{Mti, MTI_LENGTH};
pub use validator::{
    luhn_valid, BusinessValidator, CompositeValidator, FieldLength, FormatValidator, LuhnCheck,
    NumericFields, RequiredFields, Rule, StructuralValidator, Validator,
};
