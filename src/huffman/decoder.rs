use super::code::CodeTable;
use crate::bits::BitCursor;
use crate::error::{Error, Result};

const ROOT: usize = 0;

/// One node of the decode tree. Children index into the arena.
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

impl Slot {
    fn is_branch(&self) -> bool {
        self.children.iter().any(Option::is_some)
    }
}

/// Arena-backed tree rebuilt from a deserialized code table.
///
/// Slot 0 is the root. A table with a single one-bit code produces a root with
/// one child, which is all the walk needs.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    slots: Vec<Slot>,
}

impl DecodeTree {
    /// Lays every code out as a path from the root, creating nodes as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corruption`] if two codes are equal or one is a prefix
    /// of another.
    pub fn from_table(table: &CodeTable) -> Result<Self> {
        let mut slots = vec![Slot::default()];
        for (symbol, code) in table.iter() {
            let mut node = ROOT;
            for shift in (0..code.width()).rev() {
                if slots[node].symbol.is_some() {
                    return Err(Error::corruption(format!(
                        "code for symbol {:#04x} extends another code",
                        symbol
                    )));
                }
                let bit = ((code.value() >> shift) & 1) as usize;
                node = match slots[node].children[bit] {
                    Some(child) => child,
                    None => {
                        slots.push(Slot::default());
                        let child = slots.len() - 1;
                        slots[node].children[bit] = Some(child);
                        child
                    }
                };
            }
            if slots[node].symbol.is_some() || slots[node].is_branch() {
                return Err(Error::corruption(format!(
                    "code for symbol {:#04x} collides with another code",
                    symbol
                )));
            }
            slots[node].symbol = Some(symbol);
        }
        Ok(DecodeTree { slots })
    }

    pub fn leaf_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.symbol.is_some()).count()
    }
}

/// Position of the walk between bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AtRoot,
    InPath(usize),
}

/// Walks `tree` for exactly `bit_count` bits from `cursor`, emitting a symbol
/// at every leaf.
///
/// # Errors
///
/// - [`Error::Corruption`] if the tree is empty but `bit_count` is not zero,
///   a bit leads nowhere, or the bits end mid-code
/// - [`Error::Underflow`] if fewer than `bit_count` bits remain
pub fn decode_bits(tree: &DecodeTree, cursor: &mut BitCursor<'_>, bit_count: u64) -> Result<Vec<u8>> {
    if bit_count > 0 && !tree.slots[ROOT].is_branch() {
        return Err(Error::corruption(format!(
            "empty code table cannot carry {} data bits",
            bit_count
        )));
    }

    let requested = usize::try_from(bit_count).unwrap_or(usize::MAX);
    if requested > cursor.remaining() {
        return Err(Error::Underflow {
            requested,
            remaining: cursor.remaining(),
        });
    }

    let mut output = Vec::new();
    let mut state = State::AtRoot;
    for _ in 0..requested {
        let bit = cursor.read_bit()? as usize;
        let node = match state {
            State::AtRoot => ROOT,
            State::InPath(node) => node,
        };
        let child = tree.slots[node].children[bit]
            .ok_or_else(|| Error::corruption("bit path does not match any code"))?;
        state = match tree.slots[child].symbol {
            Some(symbol) => {
                output.push(symbol);
                State::AtRoot
            }
            None => State::InPath(child),
        };
    }

    if state != State::AtRoot {
        return Err(Error::corruption("data ends in the middle of a code"));
    }
    Ok(output)
}
