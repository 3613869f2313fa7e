//! Bit-level access to byte buffers.
//!
//! Both halves work MSB-first: the first bit of a group sits in the highest
//! position of its byte and becomes the highest-order bit of the value read back.
//!
//! - [`BitCursor`] reads sequentially from a fixed buffer
//! - [`BitRecorder`] appends to a growable buffer

pub mod reader;
pub mod recorder;

pub use reader::BitCursor;
pub use recorder::BitRecorder;
