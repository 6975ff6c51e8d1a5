/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # iron8583 Spec
//!
//! Declarative ISO 8583 dialect specifications for the iron8583 engine.
//!
//! This crate provides:
//! - **Schema definitions**: [`FieldSpec`], [`FieldKind`], [`DataType`],
//!   [`Encoding`], [`Padding`], and the dialect container [`Spec`]
//! - **Bundled dialects**: a conventional ISO 8583:1987 ASCII dialect
//!
//! A [`Spec`] is purely declarative: it describes where fields live on the
//! wire and how their payloads are interpreted, but contains no parsing
//! logic itself. Specs are built once at process start and shared immutably
//! across any number of messages and threads.

pub mod dialect;
pub mod schema;

pub use dialect::iso8583_1987_ascii;
pub use schema::{
    DataType, Encoding, FieldDefaults, FieldKind, FieldSpec, Padding, Spec, SpecError,
    MAX_FIELD_NUMBER,
};
