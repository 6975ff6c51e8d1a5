/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Core types for ISO 8583 operations.
//!
//! This module provides [`Mti`], the four-digit message type indicator
//! that classifies every message (version, class, function, origin).

use crate::error::DecodeError;
use arrayvec::ArrayString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Byte length of the message type indicator.
pub const MTI_LENGTH: usize = 4;

/// Message Type Indicator: four ASCII digits classifying a message.
///
/// Position 1 is the ISO version, position 2 the message class
/// (1 authorization, 2 financial, 4 reversal, 8 network management, ...),
/// position 3 the function (even = request/advice, odd = response), and
/// position 4 the transaction originator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mti(ArrayString<MTI_LENGTH>);

impl Mti {
    /// Parses an MTI from raw bytes.
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidMtiFormat`] unless `bytes` is exactly
    /// four ASCII digits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != MTI_LENGTH || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(DecodeError::InvalidMtiFormat {
                mti: String::from_utf8_lossy(bytes).into_owned(),
            });
        }

        let mut inner = ArrayString::new();
        for &b in bytes {
            inner.push(b as char);
        }
        Ok(Self(inner))
    }

    /// Returns the MTI as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    fn digit(&self, position: usize) -> u8 {
        self.0.as_bytes()[position] - b'0'
    }

    /// Returns the ISO version digit (position 1).
    #[inline]
    #[must_use]
    pub fn version(&self) -> u8 {
        self.digit(0)
    }

    /// Returns the message class digit (position 2).
    #[inline]
    #[must_use]
    pub fn class(&self) -> u8 {
        self.digit(1)
    }

    /// Returns the message function digit (position 3).
    #[inline]
    #[must_use]
    pub fn function(&self) -> u8 {
        self.digit(2)
    }

    /// Returns the transaction originator digit (position 4).
    #[inline]
    #[must_use]
    pub fn origin(&self) -> u8 {
        self.digit(3)
    }

    /// Returns true for request and advice messages (even function digit).
    #[inline]
    #[must_use]
    pub fn is_request(&self) -> bool {
        self.function() % 2 == 0
    }

    /// Returns true for response messages (odd function digit).
    #[inline]
    #[must_use]
    pub fn is_response(&self) -> bool {
        !self.is_request()
    }
}

impl FromStr for Mti {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for Mti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Mti {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mti_from_bytes() {
        let mti = Mti::from_bytes(b"0200").unwrap();
        assert_eq!(mti.as_str(), "0200");
        assert_eq!(mti.version(), 0);
        assert_eq!(mti.class(), 2);
        assert_eq!(mti.function(), 0);
        assert_eq!(mti.origin(), 0);
    }

    #[test]
    fn test_mti_request_response() {
        assert!(Mti::from_bytes(b"0200").unwrap().is_request());
        assert!(Mti::from_bytes(b"0210").unwrap().is_response());
        assert!(Mti::from_bytes(b"0800").unwrap().is_request());
        assert!(Mti::from_bytes(b"0810").unwrap().is_response());
    }

    #[test]
    fn test_mti_rejects_non_digits() {
        assert!(Mti::from_bytes(b"020A").is_err());
        assert!(Mti::from_bytes(b"020-").is_err());
        assert!(Mti::from_bytes(b"02").is_err());
        assert!(Mti::from_bytes(b"02000").is_err());
    }

    #[test]
    fn test_mti_from_str_and_display() {
        let mti: Mti = "0420".parse().unwrap();
        assert_eq!(mti.to_string(), "0420");
        assert_eq!(mti.class(), 4);
    }
}
