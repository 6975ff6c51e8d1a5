/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # iron8583
//!
//! A zero-copy, spec-driven ISO 8583 message codec for Rust.
//!
//! iron8583 parses, validates, and constructs the financial transaction
//! messages exchanged between payment terminals, switches, and card
//! networks.
//!
//! ## Features
//!
//! - **Zero-copy parsing**: field reads are sub-slices of the original
//!   buffer; parse locates every present field once
//! - **Spec-driven**: one immutable, shareable dialect description drives
//!   location, construction, and validation
//! - **Pluggable encodings**: ASCII, EBCDIC-037, packed BCD, binary,
//!   hex, and minimal BER-TLV codecs behind one trait
//! - **Layered validation**: structural, format, and business passes
//!   compose over a common reader interface
//!
//! ## Quick Start
//!
//! ```rust
//! use iron8583::prelude::*;
//!
//! let spec = iso8583_1987_ascii();
//! let bytes = MessageBuilder::new(&spec)
//!     .set_mti("0200")
//!     .set_string(2, "4532015112830366")
//!     .set_string(3, "000000")
//!     .set_int(4, 1000)
//!     .set_int(11, 1)
//!     .build_bytes()
//!     .unwrap();
//!
//! let mut msg = Message::new(&bytes, &spec);
//! msg.parse().unwrap();
//! assert_eq!(msg.mti().as_str(), "0200");
//! assert_eq!(msg.field(4).as_i64(), 1000);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: bitmap, cursor, locator, message, builder, validators
//! - [`spec`]: declarative dialect model and bundled dialects
//! - [`codec`]: byte-level payload codecs

pub mod core {
    //! Message parsing, construction, and validation.
    pub use iron8583_core::*;
}

pub mod spec {
    //! Declarative dialect model and bundled dialects.
    pub use iron8583_spec::*;
}

pub mod codec {
    //! Byte-level payload codecs.
    pub use iron8583_codec::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use iron8583_core::{
        Bitmap, BusinessValidator, CompositeValidator, Cursor, DecodeError, EncodeError, Field,
        FieldLength, FieldLocator, FormatValidator, Iso8583Error, LuhnCheck, Message,
        MessageBuilder, MessageRead, Mti, NumericFields, OwnedMessage, RequiredFields, Result,
        Rule, StructuralValidator, ValidationError, Validator,
    };

    // Dialect model
    pub use iron8583_spec::{
        iso8583_1987_ascii, DataType, Encoding, FieldDefaults, FieldKind, FieldSpec, Padding, Spec,
    };

    // Codecs
    pub use iron8583_codec::{codec_for, Ascii, Bcd, BerTlv, Binary, Codec, CodecError, Ebcdic037, Hex};
}
