/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Bundled dialects.
//!
//! This module ships a conventional ISO 8583:1987 ASCII dialect covering
//! the data elements commonly exchanged by acquirers and issuers. It is a
//! working default, not a scheme mandate; dialects with different widths,
//! encodings, or private-use fields are built the same way with
//! [`Spec::add_field`].

use crate::schema::{DataType, Encoding, FieldDefaults, FieldKind, FieldSpec, Padding, Spec};

/// Returns the conventional ISO 8583:1987 dialect with ASCII payloads and
/// ASCII length indicators.
///
/// Numeric fields pad left with `'0'`, text fields pad right with spaces.
/// Field 43 (card acceptor name/location) is composite with fixed
/// subfields; field 55 carries BER-TLV EMV data as binary.
#[must_use]
pub fn iso8583_1987_ascii() -> Spec {
    let mut spec = Spec::new("ISO 8583", "1987").with_defaults(FieldDefaults {
        encoding: Encoding::Ascii,
        padding: Padding::Left,
        pad_char: '0',
    });

    spec.add_field(
        FieldSpec::new(2, "Primary Account Number", FieldKind::LlVar)
            .with_max_length(19)
            .with_data_type(DataType::Numeric)
            .with_alias("PAN"),
    );
    spec.add_field(numeric_fixed(3, "Processing Code", 6));
    spec.add_field(
        numeric_fixed(4, "Amount, Transaction", 12).with_padding(Padding::Left, '0'),
    );
    spec.add_field(
        numeric_fixed(7, "Transmission Date and Time", 10)
            .with_description("MMDDhhmmss, UTC"),
    );
    spec.add_field(
        numeric_fixed(11, "System Trace Audit Number", 6)
            .with_alias("STAN")
            .with_padding(Padding::Left, '0'),
    );
    spec.add_field(
        numeric_fixed(12, "Time, Local Transaction", 6).with_description("hhmmss"),
    );
    spec.add_field(
        numeric_fixed(13, "Date, Local Transaction", 4).with_description("MMDD"),
    );
    spec.add_field(
        numeric_fixed(14, "Date, Expiration", 4).with_description("YYMM"),
    );
    spec.add_field(numeric_fixed(18, "Merchant Type", 4));
    spec.add_field(numeric_fixed(22, "POS Entry Mode", 3));
    spec.add_field(numeric_fixed(25, "POS Condition Code", 2));
    spec.add_field(
        FieldSpec::new(32, "Acquiring Institution ID", FieldKind::LlVar)
            .with_max_length(11)
            .with_data_type(DataType::Numeric),
    );
    spec.add_field(
        FieldSpec::new(35, "Track 2 Data", FieldKind::LlVar)
            .with_max_length(37)
            .with_data_type(DataType::AlphanumericSpecial),
    );
    spec.add_field(
        FieldSpec::new(37, "Retrieval Reference Number", FieldKind::Fixed)
            .with_length(12)
            .with_data_type(DataType::Alphanumeric)
            .with_alias("RRN")
            .with_padding(Padding::Right, ' '),
    );
    spec.add_field(
        FieldSpec::new(38, "Authorization ID Response", FieldKind::Fixed)
            .with_length(6)
            .with_data_type(DataType::Alphanumeric)
            .with_padding(Padding::Right, ' '),
    );
    spec.add_field(
        FieldSpec::new(39, "Response Code", FieldKind::Fixed)
            .with_length(2)
            .with_data_type(DataType::Alphanumeric),
    );
    spec.add_field(
        FieldSpec::new(41, "Card Acceptor Terminal ID", FieldKind::Fixed)
            .with_length(8)
            .with_data_type(DataType::AlphanumericSpecial)
            .with_padding(Padding::Right, ' '),
    );
    spec.add_field(
        FieldSpec::new(42, "Card Acceptor ID Code", FieldKind::Fixed)
            .with_length(15)
            .with_data_type(DataType::AlphanumericSpecial)
            .with_padding(Padding::Right, ' '),
    );

    let name = spec.add_subfield(
        FieldSpec::new(1, "Name", FieldKind::Fixed)
            .with_length(23)
            .with_data_type(DataType::AlphanumericSpecial)
            .with_padding(Padding::Right, ' '),
    );
    let city = spec.add_subfield(
        FieldSpec::new(2, "City", FieldKind::Fixed)
            .with_length(13)
            .with_data_type(DataType::AlphanumericSpecial)
            .with_padding(Padding::Right, ' '),
    );
    let state = spec.add_subfield(
        FieldSpec::new(3, "State", FieldKind::Fixed)
            .with_length(2)
            .with_data_type(DataType::AlphanumericSpecial),
    );
    let country = spec.add_subfield(
        FieldSpec::new(4, "Country", FieldKind::Fixed)
            .with_length(2)
            .with_data_type(DataType::AlphanumericSpecial),
    );
    spec.add_field(
        FieldSpec::new(43, "Card Acceptor Name/Location", FieldKind::Fixed)
            .with_length(40)
            .with_data_type(DataType::AlphanumericSpecial)
            .with_padding(Padding::Right, ' ')
            .with_children(vec![name, city, state, country]),
    );

    spec.add_field(numeric_fixed(49, "Currency Code, Transaction", 3));
    spec.add_field(
        FieldSpec::new(54, "Additional Amounts", FieldKind::LllVar)
            .with_max_length(120)
            .with_data_type(DataType::AlphanumericSpecial),
    );
    spec.add_field(
        FieldSpec::new(55, "ICC Data", FieldKind::LllVar)
            .with_max_length(255)
            .with_data_type(DataType::Binary)
            .with_encoding(Encoding::Binary)
            .with_description("EMV BER-TLV template"),
    );
    spec.add_field(numeric_fixed(70, "Network Management Information Code", 3));
    spec.add_field(numeric_fixed(90, "Original Data Elements", 42));
    spec.add_field(
        FieldSpec::new(128, "Message Authentication Code", FieldKind::Fixed)
            .with_length(8)
            .with_data_type(DataType::Binary)
            .with_encoding(Encoding::Binary)
            .with_alias("MAC"),
    );

    spec
}

fn numeric_fixed(number: usize, name: &str, length: usize) -> FieldSpec {
    FieldSpec::new(number, name, FieldKind::Fixed)
        .with_length(length)
        .with_data_type(DataType::Numeric)
}
