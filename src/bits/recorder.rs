use crate::error::{Error, Result};
use bitvec::prelude::*;

/// Append-only MSB-first bit writer.
///
/// The backing buffer grows a byte at a time. Bits past [`bit_len`](Self::bit_len)
/// in the final byte are always returned as zero.
#[derive(Debug, Clone, Default)]
pub struct BitRecorder {
    bits: BitVec<u8, Msb0>,
}

impl BitRecorder {
    pub fn new() -> Self {
        BitRecorder {
            bits: BitVec::new(),
        }
    }

    /// Creates a recorder with room for `bits` bits before reallocating.
    pub fn with_capacity(bits: usize) -> Self {
        BitRecorder {
            bits: BitVec::with_capacity(bits),
        }
    }

    pub fn append_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends the low `width` bits of `value`, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `1 <= width <= 64`.
    pub fn append_bits(&mut self, value: u64, width: usize) -> Result<()> {
        if width == 0 || width > 64 {
            return Err(Error::InvalidInput(format!(
                "bit width must be in 1..=64, got {}",
                width
            )));
        }

        if self.bits.len() % 8 == 0 && width % 8 == 0 {
            let bytes = value.to_be_bytes();
            self.bits
                .extend_from_bitslice(bytes[8 - width / 8..].view_bits::<Msb0>());
        } else {
            for shift in (0..width).rev() {
                self.bits.push((value >> shift) & 1 == 1);
            }
        }
        Ok(())
    }

    /// Appends whole bytes at the current (possibly unaligned) position.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.bits.extend_from_bitslice(bytes.view_bits::<Msb0>());
    }

    /// Number of meaningful bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Number of bytes the result occupies.
    pub fn byte_len(&self) -> usize {
        self.bits.len().div_ceil(8)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns a copy of the accumulated bytes with trailing bits zeroed.
    pub fn result(&self) -> Vec<u8> {
        let mut bytes = self.bits.as_raw_slice().to_vec();
        let tail = self.bits.len() % 8;
        if tail != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - tail);
            }
        }
        bytes
    }

    /// Consumes the recorder, returning the bytes and the exact bit count.
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        let bit_len = self.bit_len();
        (self.result(), bit_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitCursor;

    #[test]
    fn test_append_single_bits() {
        let mut recorder = BitRecorder::new();
        for bit in [true, false, true, true] {
            recorder.append_bit(bit);
        }
        assert_eq!(recorder.bit_len(), 4);
        assert_eq!(recorder.result(), vec![0b1011_0000]);
    }

    #[test]
    fn test_append_bits_uses_low_bits_only() {
        let mut recorder = BitRecorder::new();
        recorder.append_bits(0xFFFF_FFF5, 3).unwrap();
        assert_eq!(recorder.result(), vec![0b1010_0000]);
        assert_eq!(recorder.bit_len(), 3);
    }

    #[test]
    fn test_append_spanning_bytes() {
        let mut recorder = BitRecorder::new();
        recorder.append_bits(0b101, 3).unwrap();
        recorder.append_bits(0xABCD, 16).unwrap();
        assert_eq!(recorder.bit_len(), 19);
        assert_eq!(recorder.byte_len(), 3);
        // 101 + 1010_1011_1100_1101 packed MSB-first
        assert_eq!(recorder.result(), vec![0b1011_0101, 0b0111_1001, 0b1010_0000]);
    }

    #[test]
    fn test_aligned_whole_bytes() {
        let mut recorder = BitRecorder::new();
        recorder.append_bits(0x0102_0304_0506_0708, 64).unwrap();
        recorder.append_bits(0x7F, 8).unwrap();
        assert_eq!(recorder.result(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0x7F]);
    }

    #[test]
    fn test_invalid_widths() {
        let mut recorder = BitRecorder::new();
        assert!(recorder.append_bits(1, 0).is_err());
        assert!(recorder.append_bits(1, 65).is_err());
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_unaligned_bytes() {
        let mut recorder = BitRecorder::new();
        recorder.append_bit(true);
        recorder.append_bytes(&[0xFF, 0x00]);
        assert_eq!(recorder.bit_len(), 17);
        assert_eq!(recorder.result(), vec![0xFF, 0x80, 0x00]);
    }

    #[test]
    fn test_reader_sees_what_recorder_wrote() {
        let mut recorder = BitRecorder::new();
        let fields: [(u64, usize); 5] = [(1, 1), (0x3, 7), (0xDEAD_BEEF, 32), (0, 5), (0x1F, 64)];
        for &(value, width) in &fields {
            recorder.append_bits(value, width).unwrap();
        }
        let (bytes, bit_len) = recorder.into_parts();
        let mut cursor = BitCursor::with_width(&bytes, bit_len).unwrap();
        for &(value, width) in &fields {
            assert_eq!(cursor.read_bits(width).unwrap(), value);
        }
        assert!(cursor.is_exhausted());
    }
}
