use rustc_hash::FxHashMap;

use std::fmt;

use crate::inline_string::*;
use crate::patterns::Identifier;

/// An sgID/barcode combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BarcodeKey {
    pub identifier: Identifier,
    pub barcode: InlineString,
}

impl BarcodeKey {
    pub fn new(identifier: Identifier, barcode: &[u8]) -> Self {
        Self {
            identifier,
            barcode: InlineString::new(barcode),
        }
    }
}

impl fmt::Display for BarcodeKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.identifier, self.barcode)
    }
}

/// Number of read pairs supporting each sgID/barcode combination.
#[derive(Debug, Clone, Default)]
pub struct BarcodeCounts {
    counts: FxHashMap<BarcodeKey, usize>,
}

impl BarcodeCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: BarcodeKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &BarcodeKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Add all counts of `other` into this table.
    pub fn merge(&mut self, other: BarcodeCounts) {
        for (key, count) in other.counts {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Consume the table and sort it by count, highest first.
    ///
    /// Equal counts are ordered by key (known sgID names, then unresolved, then barcode), so the
    /// output does not depend on hashing or insertion order.
    pub fn finalize(self) -> Vec<(BarcodeKey, usize)> {
        let mut res = self.counts.into_iter().collect::<Vec<_>>();
        res.sort_unstable_by(|(k1, c1), (k2, c2)| c2.cmp(c1).then_with(|| k1.cmp(k2)));
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    fn key(name: Option<&str>, barcode: &[u8]) -> BarcodeKey {
        let identifier = match name {
            Some(n) => Identifier::Known(Arc::from(n)),
            None => Identifier::Unresolved,
        };
        BarcodeKey::new(identifier, barcode)
    }

    #[test]
    fn increment_same_key() {
        let mut counts = BarcodeCounts::new();
        for _ in 0..7 {
            counts.increment(key(Some("Apc"), b"AACCCCCTTGGGGGAATTTTT"));
        }

        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&key(Some("Apc"), b"AACCCCCTTGGGGGAATTTTT")), 7);
        assert_eq!(counts.get(&key(None, b"AACCCCCTTGGGGGAATTTTT")), 0);
    }

    #[test]
    fn finalize_sorted_descending() {
        let mut counts = BarcodeCounts::new();
        let keys = [
            (key(Some("Apc"), b"AAC"), 2),
            (key(None, b"AAG"), 5),
            (key(Some("p53"), b"AAG"), 1),
            (key(Some("Apc"), b"AAT"), 9),
            (key(Some("Lkb1"), b"AAC"), 5),
        ];
        for (k, n) in &keys {
            for _ in 0..*n {
                counts.increment(k.clone());
            }
        }
        assert_eq!(counts.total(), 22);

        let sorted = counts.finalize();
        let lines = sorted
            .iter()
            .map(|(k, c)| format!("{k},{c}"))
            .collect::<Vec<_>>();

        assert_eq!(
            lines,
            ["Apc,AAT,9", "Lkb1,AAC,5", "None,AAG,5", "Apc,AAC,2", "p53,AAG,1"]
        );
        assert!(sorted.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn merge_tables() {
        let mut a = BarcodeCounts::new();
        let mut b = BarcodeCounts::new();
        a.increment(key(Some("Apc"), b"AAC"));
        b.increment(key(Some("Apc"), b"AAC"));
        b.increment(key(None, b"AAC"));

        a.merge(b);
        assert_eq!(a.get(&key(Some("Apc"), b"AAC")), 2);
        assert_eq!(a.get(&key(None, b"AAC")), 1);
        assert_eq!(a.total(), 3);
    }

    #[test]
    fn empty_table() {
        let counts = BarcodeCounts::new();
        assert!(counts.is_empty());
        assert!(counts.finalize().is_empty());
    }
}
