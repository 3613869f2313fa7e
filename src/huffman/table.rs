//! On-disk layout of a compressed buffer.
//!
//! ```text
//! repeated, one per symbol:
//!     1 byte          code width w (1..=64)
//!     1 byte          symbol
//!     ceil(w/8) bytes code, right-aligned, MSB-first, zero padded
//! 1 byte              0 (end of table)
//! 8 bytes             number of data bits, big-endian
//! ...                 packed data bits, zero padded to a byte
//! ```

use super::code::{Code, CodeTable, MAX_CODE_WIDTH};
use crate::bits::BitCursor;
use crate::error::{Error, Result};

/// Width byte that terminates the table.
pub const SENTINEL: u8 = 0;

/// Size of the data bit count that follows the table.
pub const BIT_COUNT_BYTES: usize = 8;

/// Bytes used to store a code of `width` bits.
fn stored_bytes(width: usize) -> usize {
    width.div_ceil(8)
}

/// Serializes `table` in ascending symbol order, sentinel included.
pub fn serialize_table(table: &CodeTable) -> Vec<u8> {
    let mut out = Vec::with_capacity(table.len() * 3 + 1);
    for (symbol, code) in table.iter() {
        let width = code.width();
        out.push(width as u8);
        out.push(symbol);
        let bytes = code.value().to_be_bytes();
        out.extend_from_slice(&bytes[bytes.len() - stored_bytes(width)..]);
    }
    out.push(SENTINEL);
    out
}

/// A table that ends before its sentinel is corrupt, not merely short.
fn truncated(err: Error) -> Error {
    match err {
        Error::Underflow { .. } => Error::corruption("code table ends before its sentinel"),
        other => other,
    }
}

/// Reads table records from `cursor` up to and including the sentinel.
///
/// # Errors
///
/// Returns [`Error::Corruption`] if the buffer ends before a sentinel, a
/// width exceeds 64 bits, or a symbol appears twice.
pub fn deserialize_table(cursor: &mut BitCursor<'_>) -> Result<CodeTable> {
    let mut table = CodeTable::new();
    loop {
        let width = cursor.read_u8().map_err(truncated)? as usize;
        if width == SENTINEL as usize {
            break;
        }
        if width > MAX_CODE_WIDTH {
            return Err(Error::corruption(format!(
                "code width {} exceeds {} bits",
                width, MAX_CODE_WIDTH
            )));
        }
        let symbol = cursor.read_u8().map_err(truncated)?;

        let padding = stored_bytes(width) * 8 - width;
        let remaining = cursor.remaining();
        if remaining < padding + width {
            return Err(truncated(Error::Underflow {
                requested: padding + width,
                remaining,
            }));
        }
        cursor.skip(padding as isize);
        let value = cursor.read_bits(width).map_err(truncated)?;

        if table.insert(symbol, Code::new(value, width)?).is_some() {
            return Err(Error::corruption(format!(
                "symbol {:#04x} appears twice in the code table",
                symbol
            )));
        }
    }
    Ok(table)
}

/// Assembles table, bit count, and packed data into one buffer.
pub fn write_container(table: &CodeTable, data: &[u8], bit_count: u64) -> Vec<u8> {
    let mut out = serialize_table(table);
    out.reserve(BIT_COUNT_BYTES + data.len());
    out.extend_from_slice(&bit_count.to_be_bytes());
    out.extend_from_slice(data);
    out
}
