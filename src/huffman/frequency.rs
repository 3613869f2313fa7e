use std::collections::BTreeMap;

/// Occurrence count of every byte value present in an input buffer.
///
/// Symbols that never occur are not stored. Iteration is in ascending symbol
/// order, which the tree builder relies on for its tie-break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: BTreeMap<u8, u64>,
}

impl FrequencyMap {
    /// Counts every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        counts
            .iter()
            .enumerate()
            .map(|(symbol, &count)| (symbol as u8, count))
            .collect()
    }

    /// Count for `symbol`, zero if absent.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the counted input. Saturates at
    /// `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl FromIterator<(u8, u64)> for FrequencyMap {
    /// Builds a map from explicit counts; zero counts are dropped and repeated
    /// symbols accumulate, saturating at `u64::MAX`.
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in iter {
            if count > 0 {
                let total = counts.entry(symbol).or_insert(0u64);
                *total = total.saturating_add(count);
            }
        }
        FrequencyMap { counts }
    }
}
