use std::fmt;
use std::sync::Arc;

/// Where a record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(String),
    Bytes,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Origin::*;
        match self {
            File(file) => write!(f, "file \"{}\"", file),
            Bytes => write!(f, "bytes"),
        }
    }
}

/// One fastq record: header, sequence and quality string.
///
/// The separator line carries no information and is not kept.
#[derive(Debug, Clone)]
pub struct Record {
    pub name: Vec<u8>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl Record {
    pub fn new(name: &[u8], seq: &[u8], qual: &[u8]) -> Self {
        Self {
            name: name.to_owned(),
            seq: seq.to_owned(),
            qual: qual.to_owned(),
        }
    }

    /// Whether the quality string covers the sequence.
    pub fn is_well_formed(&self) -> bool {
        self.seq.len() == self.qual.len()
    }
}

/// Record `idx` of the forward stream together with record `idx` of the reverse stream.
#[derive(Debug, Clone)]
pub struct ReadPair {
    pub forward: Record,
    pub reverse: Record,
    pub origin1: Arc<Origin>,
    pub origin2: Arc<Origin>,
    pub idx: usize,
}

impl ReadPair {
    pub fn new(
        forward: Record,
        reverse: Record,
        origin1: Arc<Origin>,
        origin2: Arc<Origin>,
        idx: usize,
    ) -> Self {
        Self {
            forward,
            reverse,
            origin1,
            origin2,
            idx,
        }
    }
}
