//! Huffman compression.
//!
//! Encoding counts byte frequencies, builds a Huffman tree, derives a
//! prefix-free code table from it and packs every input byte as its code.
//! The output buffer carries the serialized table, the exact number of data
//! bits, and the packed data (see [`table`] for the byte layout). Decoding
//! rebuilds a tree from the stored table and walks it bit by bit.
//!
//! # Examples
//!
//! ```rust
//! use huffpack::huffman::{compress, decode};
//!
//! let input = b"abracadabra";
//! let packed = compress(input).unwrap();
//! assert_eq!(decode(&packed).unwrap(), input);
//! ```

use crate::bits::{BitCursor, BitRecorder};
use crate::error::{Error, Result};
use std::time::{Duration, Instant};

pub mod code;
pub mod decoder;
pub mod frequency;
pub mod table;
pub mod tree;

pub use code::{build_code_table, Code, CodeTable, MAX_CODE_WIDTH};
pub use decoder::{decode_bits, DecodeTree};
pub use frequency::FrequencyMap;
pub use table::{deserialize_table, serialize_table, write_container};
pub use tree::{build_huffman_tree, HuffmanNode, HuffmanTree};

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Result of encoding one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Code for every symbol that occurs in the input.
    pub table: CodeTable,
    /// Packed code bits, zero padded to a whole byte.
    pub data: Vec<u8>,
    /// Number of meaningful bits in `data`.
    pub bit_count: u64,
}

impl Encoded {
    /// Serializes into the container layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        write_container(&self.table, &self.data, self.bit_count)
    }
}

/// Sizes and timings reported after compressing a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub original: usize,
    pub table: usize,
    pub data: usize,
    /// Time spent counting, building codes and packing.
    pub code_gen: Duration,
    /// Time spent writing the container out; zero when nothing was written.
    pub write: Duration,
}

impl EncodeStats {
    /// Size of the whole container, including the bit count field.
    pub fn total(&self) -> usize {
        self.table + table::BIT_COUNT_BYTES + self.data
    }

    /// Fraction of the input saved; negative when the output is larger.
    pub fn compression_ratio(&self) -> Option<f64> {
        if self.original == 0 {
            return None;
        }
        Some(1.0 - self.total() as f64 / self.original as f64)
    }
}

/// Sizes and timing reported after decompressing a buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub original: usize,
    pub decoded: usize,
    pub elapsed: Duration,
}

/// Builds the code table for `input` and packs it.
///
/// Empty input yields an empty table and no data bits.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if a code would need more than 64 bits.
pub fn encode(input: &[u8]) -> Result<Encoded> {
    if input.is_empty() {
        return Ok(Encoded::default());
    }

    let freqs = FrequencyMap::from_bytes(input);
    let tree = build_huffman_tree(&freqs)?;
    let table = build_code_table(&tree)?;
    let expected_bits = table.encoded_bit_len(&freqs);

    let mut recorder = BitRecorder::with_capacity(usize::try_from(expected_bits).unwrap_or(0));
    for &byte in input {
        let code = table.get(byte).ok_or_else(|| {
            Error::InvalidInput(format!("no code generated for symbol {:#04x}", byte))
        })?;
        recorder.append_bits(code.value(), code.width())?;
    }

    let (data, bit_count) = recorder.into_parts();
    log::debug!(
        "encoded {} bytes with {} symbols into {} bits",
        input.len(),
        table.len(),
        bit_count
    );
    Ok(Encoded {
        table,
        data,
        bit_count: bit_count as u64,
    })
}

/// Restores the original bytes from a container produced by [`compress`].
///
/// # Errors
///
/// - [`Error::Corruption`] for a truncated or inconsistent table, or data bits
///   that do not walk cleanly through the tree
/// - [`Error::Underflow`] if the bit count or data section is cut short
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut cursor = BitCursor::new(input);
    let table = deserialize_table(&mut cursor)?;
    let bit_count = cursor.read_u64()?;
    let tree = DecodeTree::from_table(&table)?;
    log::debug!(
        "decoding {} bits with {} symbols",
        bit_count,
        tree.leaf_count()
    );
    decode_bits(&tree, &mut cursor, bit_count)
}

/// Encodes `input` and serializes it into a single buffer.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    Ok(encode(input)?.to_bytes())
}

/// Like [`compress`], also reporting the size of each section and the time
/// spent encoding.
pub fn compress_with_stats(input: &[u8]) -> Result<(Vec<u8>, EncodeStats)> {
    let start = Instant::now();
    let encoded = encode(input)?;
    let code_gen = start.elapsed();
    let stats = EncodeStats {
        original: input.len(),
        table: serialize_table(&encoded.table).len(),
        data: encoded.data.len(),
        code_gen,
        write: Duration::ZERO,
    };
    Ok((encoded.to_bytes(), stats))
}

/// Like [`decode`], also reporting input and output sizes and the time spent
/// decoding.
pub fn decode_with_stats(input: &[u8]) -> Result<(Vec<u8>, DecodeStats)> {
    let start = Instant::now();
    let decoded = decode(input)?;
    let stats = DecodeStats {
        original: input.len(),
        decoded: decoded.len(),
        elapsed: start.elapsed(),
    };
    Ok((decoded, stats))
}

/// Huffman coder usable through the [`Compression`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl HuffmanCodec {
    pub fn new() -> Self {
        HuffmanCodec
    }
}

impl Compression for HuffmanCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress(data)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        decode(data)
    }
}
