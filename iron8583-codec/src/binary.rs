/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Unconditional binary pass-through codec.

use crate::error::CodecError;
use crate::Codec;

/// Binary codec: pure copy in both directions, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Codec for Binary {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }

    fn decode(&self, data: &[u8]) -> Result<(Vec<u8>, usize), CodecError> {
        Ok((data.to_vec(), data.len()))
    }

    fn name(&self) -> &'static str {
        "Binary"
    }
}
