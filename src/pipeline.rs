use memchr::memchr2;

use tracing::{debug, info};

use std::fmt;

use crate::count::*;
use crate::errors::*;
use crate::locator::*;
use crate::patterns::*;
use crate::read::ReadPair;
use crate::revcomp::revcomp;

const PROGRESS_INTERVAL: usize = 1_000_000;

/// State of the pair processor after one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairState {
    Reading,
    Matched,
    Rejected,
    Exhausted,
}

/// Why a read pair was not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    MalformedRecord,
    ForwardUnmatched,
    ReverseUnmatched,
    BarcodeMismatch,
    AmbiguousBarcode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched(BarcodeKey),
    Rejected(Rejection),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub pairs: usize,
    pub matched: usize,
    pub unresolved: usize,
    pub malformed_record: usize,
    pub forward_unmatched: usize,
    pub reverse_unmatched: usize,
    pub barcode_mismatch: usize,
    pub ambiguous_barcode: usize,
}

impl Stats {
    fn record(&mut self, outcome: &Outcome) {
        use Rejection::*;

        self.pairs += 1;
        match outcome {
            Outcome::Matched(key) => {
                self.matched += 1;
                if !key.identifier.is_known() {
                    self.unresolved += 1;
                }
            }
            Outcome::Rejected(MalformedRecord) => self.malformed_record += 1,
            Outcome::Rejected(ForwardUnmatched) => self.forward_unmatched += 1,
            Outcome::Rejected(ReverseUnmatched) => self.reverse_unmatched += 1,
            Outcome::Rejected(BarcodeMismatch) => self.barcode_mismatch += 1,
            Outcome::Rejected(AmbiguousBarcode) => self.ambiguous_barcode += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.pairs - self.matched
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} pairs, {} matched ({} with unknown sgID), {} rejected (malformed record: {}, forward unmatched: {}, reverse unmatched: {}, barcode mismatch: {}, ambiguous barcode: {})",
            self.pairs,
            self.matched,
            self.unresolved,
            self.rejected(),
            self.malformed_record,
            self.forward_unmatched,
            self.reverse_unmatched,
            self.barcode_mismatch,
            self.ambiguous_barcode
        )
    }
}

/// Turns read pairs into sgID/barcode keys.
pub struct PairProcessor {
    forward: BarcodeLocator,
    reverse: BarcodeLocator,
    identifiers: IdentifierTable,
}

impl PairProcessor {
    pub fn new(
        forward: &LocatorConfig,
        reverse: &LocatorConfig,
        identifiers: IdentifierTable,
    ) -> Result<Self> {
        for config in [forward, reverse] {
            if config.id_len != ID_LEN {
                return Err(Error::InvalidLocator {
                    pattern: format!("{:?}", config),
                    reason: format!("the sgID region must be {} long", ID_LEN),
                });
            }
        }
        if forward.barcode.len() != reverse.barcode.len() {
            return Err(Error::InvalidLocator {
                pattern: format!("{:?}", reverse),
                reason: "forward and reverse barcode templates differ in length".to_owned(),
            });
        }

        Ok(Self {
            forward: BarcodeLocator::new(forward)?,
            reverse: BarcodeLocator::new(reverse)?,
            identifiers,
        })
    }

    /// Default forward and reverse patterns with the given sgID table.
    pub fn with_identifiers(identifiers: IdentifierTable) -> Result<Self> {
        Self::new(&LocatorConfig::forward(), &LocatorConfig::reverse(), identifiers)
    }

    /// Decide whether a single read pair is counted, and under which key.
    ///
    /// Only the forward read's sgID candidate is resolved; the one extracted from the reverse read
    /// is not compared against it.
    pub fn process(&self, pair: &ReadPair) -> Outcome {
        use Rejection::*;

        if !pair.forward.is_well_formed() || !pair.reverse.is_well_formed() {
            return Outcome::Rejected(MalformedRecord);
        }

        let Some(m1) = self.forward.find(&pair.forward.seq) else {
            return Outcome::Rejected(ForwardUnmatched);
        };

        let reverse_seq = revcomp(&pair.reverse.seq);
        let Some(m2) = self.reverse.find(&reverse_seq) else {
            return Outcome::Rejected(ReverseUnmatched);
        };

        if m1.barcode != m2.barcode {
            return Outcome::Rejected(BarcodeMismatch);
        }
        if memchr2(b'N', b'n', m1.barcode).is_some() {
            return Outcome::Rejected(AmbiguousBarcode);
        }

        let identifier = self.identifiers.resolve(m1.id);
        Outcome::Matched(BarcodeKey::new(identifier, m1.barcode))
    }

    /// Pull one pair and count it if it is accepted.
    ///
    /// Errors from the reader, such as the two streams going out of sync, are returned as is.
    pub fn step<I>(
        &self,
        pairs: &mut I,
        counts: &mut BarcodeCounts,
        stats: &mut Stats,
    ) -> Result<PairState>
    where
        I: Iterator<Item = Result<ReadPair>>,
    {
        let Some(pair) = pairs.next().transpose()? else {
            return Ok(PairState::Exhausted);
        };

        let outcome = self.process(&pair);
        stats.record(&outcome);

        match outcome {
            Outcome::Matched(key) => {
                counts.increment(key);
                Ok(PairState::Matched)
            }
            Outcome::Rejected(_) => Ok(PairState::Rejected),
        }
    }

    /// Process read pairs until the input is exhausted.
    pub fn run<I>(&self, pairs: I, counts: &mut BarcodeCounts) -> Result<Stats>
    where
        I: IntoIterator<Item = Result<ReadPair>>,
    {
        let mut pairs = pairs.into_iter();
        let mut stats = Stats::default();
        let mut state = PairState::Reading;

        while state != PairState::Exhausted {
            state = self.step(&mut pairs, counts, &mut stats)?;

            if state != PairState::Exhausted && stats.pairs % PROGRESS_INTERVAL == 0 {
                debug!("Processed {} read pairs, {} matched", stats.pairs, stats.matched);
            }
        }

        info!("{}", stats);
        Ok(stats)
    }
}
