use super::frequency::FrequencyMap;
use super::tree::{HuffmanNode, HuffmanTree};
use crate::collections::Stack;
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Longest code the container format can carry.
pub const MAX_CODE_WIDTH: usize = 64;

/// A variable-length codeword: the low `width` bits of `value`, read MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    value: u64,
    width: u8,
}

impl Code {
    /// Creates a code from the low `width` bits of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `1 <= width <= 64`.
    pub fn new(value: u64, width: usize) -> Result<Self> {
        if width == 0 || width > MAX_CODE_WIDTH {
            return Err(Error::InvalidInput(format!(
                "code width must be in 1..=64, got {}",
                width
            )));
        }
        let mask = u64::MAX >> (MAX_CODE_WIDTH - width);
        Ok(Code {
            value: value & mask,
            width: width as u8,
        })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// True if this code's bits are a prefix of (or equal to) `other`'s.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.width <= other.width && other.value >> (other.width - self.width) == self.value
    }
}

/// Mapping from byte symbols to their codes, kept in ascending symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        CodeTable {
            codes: BTreeMap::new(),
        }
    }

    /// Inserts a code, returning the one it replaced.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes.iter().map(|(&symbol, &code)| (symbol, code))
    }

    /// Checks that no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<Code> = self.codes.values().copied().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes[i + 1..]
                .iter()
                .all(|b| !a.is_prefix_of(b) && !b.is_prefix_of(a))
        })
    }

    /// Bits needed to encode an input with the given symbol counts. Saturates
    /// at `u64::MAX`.
    pub fn encoded_bit_len(&self, freqs: &FrequencyMap) -> u64 {
        freqs
            .iter()
            .filter_map(|(symbol, count)| {
                self.get(symbol)
                    .map(|code| count.saturating_mul(code.width() as u64))
            })
            .fold(0u64, u64::saturating_add)
    }
}

/// Walks `tree` and assigns `0` to every left edge and `1` to every right edge.
///
/// A tree that is a single leaf gets the one-bit code `0`.
///
/// # Errors
///
/// Returns [`Error::Overflow`] if any leaf sits deeper than 64 edges.
pub fn build_code_table(tree: &HuffmanTree) -> Result<CodeTable> {
    let mut table = CodeTable::new();
    let root = match tree.root() {
        None => return Ok(table),
        Some(HuffmanNode::Leaf { symbol, .. }) => {
            table.insert(*symbol, Code::new(0, 1)?);
            return Ok(table);
        }
        Some(root) => root,
    };

    let mut stack = Stack::new();
    stack.push((root, 0u64, 0usize));
    while let Some((node, value, width)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                if width > MAX_CODE_WIDTH {
                    return Err(Error::Overflow {
                        symbol: *symbol,
                        width,
                    });
                }
                table.insert(*symbol, Code::new(value, width)?);
            }
            HuffmanNode::Internal { left, right, .. } => {
                stack.push((&**right, (value << 1) | 1, width + 1));
                stack.push((&**left, value << 1, width + 1));
            }
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::tree::build_huffman_tree;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = build_huffman_tree(&FrequencyMap::from_bytes(data)).unwrap();
        build_code_table(&tree).unwrap()
    }

    #[test]
    fn test_code_masks_high_bits() {
        let code = Code::new(0xFF, 3).unwrap();
        assert_eq!(code.value(), 0b111);
        assert_eq!(code.width(), 3);
        assert_eq!(Code::new(u64::MAX, 64).unwrap().value(), u64::MAX);
        assert!(Code::new(0, 0).is_err());
        assert!(Code::new(0, 65).is_err());
    }

    #[test]
    fn test_prefix_relation() {
        let short = Code::new(0b10, 2).unwrap();
        let long = Code::new(0b1011, 4).unwrap();
        let other = Code::new(0b0111, 4).unwrap();
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(!short.is_prefix_of(&other));
        assert!(short.is_prefix_of(&short));
    }

    #[test]
    fn test_abracadabra_codes() {
        let data = b"abracadabra";
        let table = table_for(data);
        assert_eq!(table.len(), 5);
        assert!(table.is_prefix_free());
        // 'a' is the most frequent symbol and gets the shortest code.
        let a = table.get(b'a').unwrap().width();
        assert!(table.iter().all(|(_, code)| code.width() >= a));
        assert_eq!(
            table.encoded_bit_len(&FrequencyMap::from_bytes(data)),
            23
        );
    }

    #[test]
    fn test_equal_weights_give_fixed_width_codes() {
        let table = table_for(b"abcd");
        let codes: Vec<(u8, u64, usize)> = table
            .iter()
            .map(|(symbol, code)| (symbol, code.value(), code.width()))
            .collect();
        assert_eq!(
            codes,
            vec![(b'a', 0b00, 2), (b'b', 0b01, 2), (b'c', 0b10, 2), (b'd', 0b11, 2)]
        );
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = table_for(b"qqqqqq");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'q'), Some(Code::new(0, 1).unwrap()));
    }

    #[test]
    fn test_empty_tree_gives_empty_table() {
        assert!(table_for(&[]).is_empty());
    }

    #[test]
    fn test_deep_tree_overflows() {
        // Fibonacci weights force a spine one level deeper per symbol.
        let mut weights = vec![1u64, 1];
        while weights.len() < 70 {
            let next = weights[weights.len() - 1] + weights[weights.len() - 2];
            weights.push(next);
        }
        let freqs: FrequencyMap = weights
            .iter()
            .enumerate()
            .map(|(symbol, &weight)| (symbol as u8, weight))
            .collect();
        let tree = build_huffman_tree(&freqs).unwrap();
        assert!(matches!(
            build_code_table(&tree),
            Err(Error::Overflow { .. })
        ));
    }

    #[test]
    fn test_detects_prefix_collision() {
        let mut table = CodeTable::new();
        table.insert(1, Code::new(0b0, 1).unwrap());
        table.insert(2, Code::new(0b01, 2).unwrap());
        assert!(!table.is_prefix_free());
    }
}
