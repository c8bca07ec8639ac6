//! Locating the sgID and barcode regions in a read sequence.
//!
//! A read is expected to look like
//! ```text
//! <anything> prefix sgID[8] AANNNNNTTNNNNNAANNNNN spacer anchor <anything>
//! ```
//! Everything up to and including the spacer is matched exactly (`N` positions of the barcode
//! template match any byte), while the anchor at the end only has to match within a bounded
//! number of edits.

use regex::bytes::Regex;

use crate::errors::*;
use crate::inline_string;

/// Length of the sgID region.
pub const ID_LEN: usize = 8;

/// Barcode template. `N` is a wildcard, everything else must match literally.
pub const BARCODE_TEMPLATE: &str = "AANNNNNTTNNNNNAANNNNN";

/// Layout of the pattern searched for in one read orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    pub prefix: String,
    pub id_len: usize,
    pub barcode: String,
    pub spacer: String,
    pub anchor: String,
    pub max_edits: usize,
}

impl LocatorConfig {
    /// Pattern for the forward read.
    pub fn forward() -> Self {
        Self {
            prefix: "GA".to_owned(),
            id_len: ID_LEN,
            barcode: BARCODE_TEMPLATE.to_owned(),
            spacer: "AT".to_owned(),
            anchor: "GCCCA".to_owned(),
            max_edits: 1,
        }
    }

    /// Pattern for the reverse complemented reverse read, which tolerates more errors.
    pub fn reverse() -> Self {
        Self {
            prefix: "A".to_owned(),
            id_len: ID_LEN,
            barcode: BARCODE_TEMPLATE.to_owned(),
            spacer: "A".to_owned(),
            anchor: "TGCCCA".to_owned(),
            max_edits: 2,
        }
    }

    pub fn with_max_edits(mut self, max_edits: usize) -> Self {
        self.max_edits = max_edits;
        self
    }
}

/// The sgID and barcode candidates extracted from one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarcodeMatch<'s> {
    pub id: &'s [u8],
    pub barcode: &'s [u8],
}

pub struct BarcodeLocator {
    head: Regex,
    anchor: Vec<u8>,
    max_edits: usize,
}

impl BarcodeLocator {
    pub fn new(config: &LocatorConfig) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidLocator {
            pattern: format!(
                "{}{}{}{}{}",
                config.prefix,
                "N".repeat(config.id_len),
                config.barcode,
                config.spacer,
                config.anchor
            ),
            reason,
        };

        if config.barcode.is_empty() || config.barcode.len() > inline_string::LEN {
            return Err(invalid(format!(
                "barcode template must have between 1 and {} characters",
                inline_string::LEN
            )));
        }
        if config.anchor.is_empty() {
            return Err(invalid("anchor must not be empty".to_owned()));
        }

        // `.` must match any byte, including ambiguous bases
        let mut pattern = String::from("(?s-u)");
        pattern.push_str(&regex::escape(&config.prefix));
        pattern.push_str(&format!("(.{{{}}})", config.id_len));
        pattern.push('(');
        for c in config.barcode.chars() {
            if c == 'N' {
                pattern.push('.');
            } else {
                pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            }
        }
        pattern.push(')');
        pattern.push_str(&regex::escape(&config.spacer));

        let head = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            head,
            anchor: config.anchor.as_bytes().to_owned(),
            max_edits: config.max_edits,
        })
    }

    /// Find the leftmost position where the whole pattern matches.
    ///
    /// Overlapping candidates are not scored against each other: the first start position whose
    /// anchor is within the edit budget wins.
    pub fn find<'s>(&self, seq: &'s [u8]) -> Option<BarcodeMatch<'s>> {
        let mut start = 0;

        while start <= seq.len() {
            let caps = self.head.captures_at(seq, start)?;
            let head = caps.get(0)?;

            if prefix_edit_distance(&self.anchor, &seq[head.end()..], self.max_edits).is_some() {
                return Some(BarcodeMatch {
                    id: caps.get(1)?.as_bytes(),
                    barcode: caps.get(2)?.as_bytes(),
                });
            }

            start = head.start() + 1;
        }

        None
    }
}

/// Smallest edit distance between `pattern` and any prefix of `text`, if it is at most
/// `max_edits`.
///
/// Substitutions, insertions and deletions each cost one. Deleting pattern characters that
/// run past the end of `text` is allowed.
pub fn prefix_edit_distance(pattern: &[u8], text: &[u8], max_edits: usize) -> Option<usize> {
    // a prefix longer than this needs more than `max_edits` insertions
    let n = text.len().min(pattern.len() + max_edits);
    let text = &text[..n];

    // prev[j] is the distance between the first i - 1 pattern bytes and the first j text bytes
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for (i, &p) in pattern.iter().enumerate() {
        curr[0] = i + 1;

        for (j, &t) in text.iter().enumerate() {
            let sub = prev[j] + (p != t) as usize;
            curr[j + 1] = sub.min(prev[j + 1] + 1).min(curr[j] + 1);
        }

        // row minimums never decrease
        if curr.iter().all(|&d| d > max_edits) {
            return None;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev.into_iter().min().filter(|&d| d <= max_edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::revcomp::revcomp;

    const ID: &[u8] = b"AGGAGTCC";
    const BC: &[u8] = b"AACGTACTTGGACAAACTGAC";

    fn forward_read(id: &[u8], bc: &[u8], tail: &[u8]) -> Vec<u8> {
        [b"CCTGA".as_slice(), id, bc, tail, b"AGAAGCT".as_slice()].concat()
    }

    fn forward() -> BarcodeLocator {
        BarcodeLocator::new(&LocatorConfig::forward()).unwrap()
    }

    fn reverse() -> BarcodeLocator {
        BarcodeLocator::new(&LocatorConfig::reverse()).unwrap()
    }

    #[test]
    fn wildcards_match_anything() {
        let seq = b"GAAGGAGTCCAA12345TT12345AA12345ATGCCCAGGGGGGGG";
        let m = forward().find(seq).unwrap();

        assert_eq!(m.id, b"AGGAGTCC");
        assert_eq!(m.barcode, b"AA12345TT12345AA12345");
    }

    #[test]
    fn exact_anchor() {
        let seq = forward_read(ID, BC, b"ATGCCCA");
        let m = forward().find(&seq).unwrap();

        assert_eq!(m.id, ID);
        assert_eq!(m.barcode, BC);
    }

    #[test]
    fn anchor_edits_forward() {
        let locator = forward();

        // substitution
        assert!(locator.find(&forward_read(ID, BC, b"ATGCACA")).is_some());
        // deletion
        assert!(locator.find(&forward_read(ID, BC, b"ATGCCA")).is_some());
        // insertion
        assert!(locator.find(&forward_read(ID, BC, b"ATGCCTCA")).is_some());
        // two substitutions
        assert!(locator.find(&forward_read(ID, BC, b"ATGAACA")).is_none());
        // the spacer is exact
        assert!(locator.find(&forward_read(ID, BC, b"AAGCCCA")).is_none());
    }

    #[test]
    fn anchor_edits_reverse() {
        let seq = forward_read(ID, BC, b"ATGAACA");
        assert!(forward().find(&seq).is_none());

        let m = reverse().find(&seq).unwrap();
        assert_eq!(m.id, ID);
        assert_eq!(m.barcode, BC);

        assert!(reverse().find(&forward_read(ID, BC, b"ATTAACA")).is_none());

        let locator = reverse();
        // insertion
        assert!(locator.find(&forward_read(ID, BC, b"ATGCTCCCA")).is_some());
        // two deletions
        assert!(locator.find(&forward_read(ID, BC, b"ATGCA")).is_some());
        // two edits
        assert!(locator.find(&forward_read(ID, BC, b"ATGGCCTCA")).is_some());
        // three insertions
        assert!(locator.find(&forward_read(ID, BC, b"ATGCTTCCCA")).is_none());
    }

    #[test]
    fn reverse_read_orientation() {
        let seq = forward_read(ID, BC, b"ATGCCCA");
        let reverse_read = revcomp(&seq);

        assert!(reverse().find(&reverse_read).is_none());

        let rc = revcomp(&reverse_read);
        let m = reverse().find(&rc).unwrap();
        assert_eq!(m.id, ID);
        assert_eq!(m.barcode, BC);
    }

    #[test]
    fn anchor_cut_off_by_read_end() {
        let seq = [b"GA".as_slice(), ID, BC, b"ATGCCC".as_slice()].concat();
        assert!(forward().find(&seq).is_some());

        let seq = [b"GA".as_slice(), ID, BC, b"ATGCC".as_slice()].concat();
        assert!(forward().find(&seq).is_none());
    }

    #[test]
    fn fixed_barcode_positions_are_exact() {
        let bc = b"AACGTACTAGGACAAACTGAC";
        assert!(forward().find(&forward_read(ID, bc, b"ATGCCCA")).is_none());
        assert!(forward().find(b"GAAGGAGTCC").is_none());
        assert!(forward().find(b"").is_none());
    }

    #[test]
    fn ambiguous_bases_are_captured() {
        let bc = b"AACGNACTTGGACAAACTGAC";
        let read = forward_read(ID, bc, b"ATGCCCA");
        let m = forward().find(&read).unwrap();
        assert_eq!(m.barcode, bc);
    }

    #[test]
    fn leftmost_match_wins() {
        let first = [b"GA".as_slice(), ID, BC, b"ATGCCCA".as_slice()].concat();
        let second = [b"GA".as_slice(), b"GCGTAAGA".as_slice(), BC, b"ATGCCCA".as_slice()].concat();
        let seq = [first.as_slice(), second.as_slice()].concat();

        assert_eq!(forward().find(&seq).unwrap().id, ID);
    }

    #[test]
    fn later_match_when_first_anchor_fails() {
        let first = [b"GA".as_slice(), ID, BC, b"ATTTTTT".as_slice()].concat();
        let second = [b"GA".as_slice(), b"GCGTAAGA".as_slice(), BC, b"ATGCCCA".as_slice()].concat();
        let seq = [first.as_slice(), second.as_slice()].concat();

        assert_eq!(forward().find(&seq).unwrap().id, b"GCGTAAGA");
    }

    #[test]
    fn edit_distance_to_prefix() {
        assert_eq!(prefix_edit_distance(b"GCCCA", b"GCCCAAGAAG", 1), Some(0));
        assert_eq!(prefix_edit_distance(b"GCCCA", b"GCTCAAGAAG", 1), Some(1));
        assert_eq!(prefix_edit_distance(b"GCCCA", b"GCCAAGAAG", 1), Some(1));
        assert_eq!(prefix_edit_distance(b"GCCCA", b"TGCCCA", 1), Some(1));
        assert_eq!(prefix_edit_distance(b"GCCCA", b"GCC", 1), None);
        assert_eq!(prefix_edit_distance(b"GCCCA", b"GCC", 2), Some(2));
        assert_eq!(prefix_edit_distance(b"TGCCCA", b"TTTCCA", 2), Some(2));
        assert_eq!(prefix_edit_distance(b"TGCCCA", b"", 2), None);
        assert_eq!(prefix_edit_distance(b"TGCCCA", b"AAAAAAAA", 2), None);
    }

    #[test]
    fn invalid_template() {
        let config = LocatorConfig {
            barcode: "N".repeat(inline_string::LEN + 1),
            ..LocatorConfig::forward()
        };
        assert!(matches!(
            BarcodeLocator::new(&config),
            Err(Error::InvalidLocator { .. })
        ));
    }
}
