/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! ISO 8583 presence bitmaps.
//!
//! The bitmap is field 1 of every message: a big-endian 64-bit vector
//! where bit `64 - n` of the primary word flags field `n`. Bit 1 set
//! means a secondary bitmap follows, extending presence to fields
//! 65..=128.

use crate::cursor::Cursor;
use crate::error::DecodeError;
use smallvec::SmallVec;

/// Byte length of the primary bitmap.
pub const PRIMARY_BITMAP_LENGTH: usize = 8;
/// Byte length of primary plus secondary bitmaps.
pub const SECONDARY_BITMAP_LENGTH: usize = 16;

const PRIMARY_CAPACITY: usize = 64;
const SECONDARY_CAPACITY: usize = 128;

/// Presence vector for fields 1..=128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bitmap {
    primary: u64,
    secondary: u64,
    extended: bool,
}

impl Bitmap {
    /// Creates an empty bitmap.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: 0,
            secondary: 0,
            extended: false,
        }
    }

    /// Parses a bitmap from the head of `data`, returning the bitmap and
    /// the number of bytes consumed (8, or 16 when bit 1 flags a
    /// secondary bitmap).
    ///
    /// # Errors
    /// Returns [`DecodeError::InvalidBitmap`] when `data` is shorter than
    /// the declared bitmap extent.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), DecodeError> {
        if data.len() < PRIMARY_BITMAP_LENGTH {
            return Err(DecodeError::InvalidBitmap {
                available: data.len(),
            });
        }

        let primary = u64::from_be_bytes(
            data[..PRIMARY_BITMAP_LENGTH]
                .try_into()
                .unwrap_or([0; PRIMARY_BITMAP_LENGTH]),
        );
        let mut bitmap = Self {
            primary,
            secondary: 0,
            extended: false,
        };

        // Bit 1 set means a secondary bitmap follows, even when every
        // field in 65..=128 is absent.
        if !bitmap.is_set(1) {
            return Ok((bitmap, PRIMARY_BITMAP_LENGTH));
        }

        if data.len() < SECONDARY_BITMAP_LENGTH {
            return Err(DecodeError::InvalidBitmap {
                available: data.len(),
            });
        }
        bitmap.secondary = u64::from_be_bytes(
            data[PRIMARY_BITMAP_LENGTH..SECONDARY_BITMAP_LENGTH]
                .try_into()
                .unwrap_or([0; PRIMARY_BITMAP_LENGTH]),
        );
        bitmap.extended = true;

        Ok((bitmap, SECONDARY_BITMAP_LENGTH))
    }

    /// Returns true if the field is flagged present. Fields outside
    /// 1..=128, and 65..=128 without a secondary bitmap, are absent.
    #[must_use]
    pub const fn is_set(&self, field: usize) -> bool {
        if field < 1 || field > SECONDARY_CAPACITY {
            return false;
        }

        if field <= PRIMARY_CAPACITY {
            let bit = 1u64 << (PRIMARY_CAPACITY - field);
            return self.primary & bit != 0;
        }

        if !self.extended {
            return false;
        }
        let bit = 1u64 << (SECONDARY_CAPACITY - field);
        self.secondary & bit != 0
    }

    /// Flags a field as present. Setting any field in 65..=128 also sets
    /// bit 1 and switches the bitmap to extended mode. Out-of-range field
    /// numbers are ignored.
    pub fn set(&mut self, field: usize) {
        if field < 1 || field > SECONDARY_CAPACITY {
            return;
        }

        if field == 1 {
            self.extended = true;
        }

        if field <= PRIMARY_CAPACITY {
            self.primary |= 1u64 << (PRIMARY_CAPACITY - field);
        } else {
            self.set(1);
            self.secondary |= 1u64 << (SECONDARY_CAPACITY - field);
        }
    }

    /// Clears a field's presence flag. Clearing fields in 65..=128 does
    /// not clear bit 1; deciding when to drop the secondary bitmap is the
    /// caller's call. Out-of-range field numbers are ignored.
    pub fn unset(&mut self, field: usize) {
        if field < 1 || field > SECONDARY_CAPACITY {
            return;
        }

        if field <= PRIMARY_CAPACITY {
            self.primary &= !(1u64 << (PRIMARY_CAPACITY - field));
            if field == 1 {
                self.extended = false;
            }
        } else {
            self.secondary &= !(1u64 << (SECONDARY_CAPACITY - field));
        }
    }

    /// Returns true if the secondary bitmap is present.
    #[inline]
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        self.extended
    }

    /// Returns the present field numbers in ascending order.
    #[must_use]
    pub fn present_fields(&self) -> SmallVec<[usize; 32]> {
        let mut fields = SmallVec::new();
        for field in 1..=PRIMARY_CAPACITY {
            if self.is_set(field) {
                fields.push(field);
            }
        }
        if self.extended {
            for field in (PRIMARY_CAPACITY + 1)..=SECONDARY_CAPACITY {
                if self.is_set(field) {
                    fields.push(field);
                }
            }
        }
        fields
    }

    /// Serializes the bitmap big-endian: 8 bytes, or 16 when extended.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        if !self.extended {
            return self.primary.to_be_bytes().to_vec();
        }

        let mut out = Vec::with_capacity(SECONDARY_BITMAP_LENGTH);
        out.extend_from_slice(&self.primary.to_be_bytes());
        out.extend_from_slice(&self.secondary.to_be_bytes());
        out
    }

    /// Returns the cursor of the bitmap block within a message whose
    /// bitmap starts at `offset`.
    #[inline]
    #[must_use]
    pub const fn cursor_at(&self, offset: usize) -> Cursor {
        let len = if self.extended {
            SECONDARY_BITMAP_LENGTH
        } else {
            PRIMARY_BITMAP_LENGTH
        };
        Cursor::new(offset, offset + len)
    }
}
