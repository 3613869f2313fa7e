use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Sequential MSB-first reader over a fixed byte buffer.
///
/// The cursor only ever sees the first `width` bits of the buffer, so padding
/// in a partially filled last byte can be hidden from callers. A read that asks
/// for more bits than remain fails with [`Error::Underflow`] and leaves the
/// cursor where it was.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    bits: &'a BitSlice<u8, Msb0>,
    offset: usize,
}

impl<'a> BitCursor<'a> {
    /// Creates a cursor over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        BitCursor {
            data,
            bits: data.view_bits::<Msb0>(),
            offset: 0,
        }
    }

    /// Creates a cursor limited to the first `width` bits of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `width` exceeds `data.len() * 8`.
    pub fn with_width(data: &'a [u8], width: usize) -> Result<Self> {
        let all = data.view_bits::<Msb0>();
        if width > all.len() {
            return Err(Error::InvalidInput(format!(
                "bit width {} exceeds buffer of {} bits",
                width,
                all.len()
            )));
        }
        Ok(BitCursor {
            data,
            bits: &all[..width],
            offset: 0,
        })
    }

    /// Total number of readable bits.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Current position in bits from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset == self.bits.len()
    }

    /// Moves the cursor by `n` bits, clamped to `[0, width]`.
    pub fn skip(&mut self, n: isize) {
        self.offset = self.offset.saturating_add_signed(n).min(self.bits.len());
    }

    fn ensure(&self, requested: usize) -> Result<()> {
        let remaining = self.remaining();
        if requested > remaining {
            return Err(Error::Underflow {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    /// Reads one bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        self.ensure(1)?;
        let bit = self.bits[self.offset];
        self.offset += 1;
        Ok(bit)
    }

    /// Reads `n` bits (`0..=64`) and returns them as the low bits of a `u64`,
    /// first bit read in the highest position.
    pub fn read_bits(&mut self, n: usize) -> Result<u64> {
        if n > 64 {
            return Err(Error::InvalidInput(format!(
                "cannot read {} bits into a u64",
                n
            )));
        }
        self.ensure(n)?;

        let value = if self.offset % 8 == 0 && n % 8 == 0 {
            // Whole bytes on a byte boundary: copy them directly.
            let start = self.offset / 8;
            self.data[start..start + n / 8]
                .iter()
                .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
        } else {
            self.bits[self.offset..self.offset + n]
                .iter()
                .by_vals()
                .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit))
        };

        self.offset += n;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Reads a big-endian `u64` spanning the next 64 bits.
    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_bits(64)
    }
}
