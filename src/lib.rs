//! # huffpack
//!
//! Lossless Huffman compression of in-memory byte buffers with a bit-exact
//! container format, plus file and directory drivers built on top.
//!
//! ```rust
//! use huffpack::{compress, decode};
//!
//! let packed = compress(b"mississippi")?;
//! assert_eq!(decode(&packed)?, b"mississippi");
//! # Ok::<(), huffpack::Error>(())
//! ```

pub mod batch;
pub mod bits;
pub mod collections;
pub mod error;
pub mod huffman;

pub use error::{Error, Result};
pub use huffman::{compress, decode, encode, Compression, Encoded, HuffmanCodec};
