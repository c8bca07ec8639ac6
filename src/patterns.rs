use rustc_hash::FxHashMap;

use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::Arc;

use crate::errors::*;
use crate::locator::ID_LEN;

/// sgIDs of the reference experiment. `Spi` marks the spike-in cell lines.
pub const REFERENCE_IDENTIFIERS: [(&str, &str); 16] = [
    ("Apc", "AGGAGTCC"),
    ("Arid1a", "GCGTAAGA"),
    ("Atm", "CATGCCTA"),
    ("Cdkn2a", "TATCCTCT"),
    ("Keap1", "ACTGCATA"),
    ("Lkb1", "CTCTCTAT"),
    ("p53", "TAGATCGC"),
    ("Rb1", "CTAGTACG"),
    ("Rbm10", "TCGCCTTA"),
    ("Setd2", "GCTCAGGA"),
    ("Smad4", "GTAGAGAG"),
    ("Neo1", "GTAAGGAG"),
    ("Neo2", "AGCGTAGC"),
    ("Neo3", "AAGGAGTA"),
    ("NT1", "CTAAGCCT"),
    ("Spi", "TTCTGCCT"),
];

/// Name written for sgIDs that are not in the table.
pub const UNRESOLVED: &str = "None";

/// Result of looking up an sgID candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Known(Arc<str>),
    Unresolved,
}

impl Identifier {
    pub fn is_known(&self) -> bool {
        matches!(self, Identifier::Known(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Identifier::*;
        match self {
            Known(name) => f.write_str(name),
            Unresolved => f.write_str(UNRESOLVED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierEntry {
    pub name: String,
    pub seq: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IdentifiersFile {
    identifiers: Vec<IdentifierEntry>,
}

/// Known sgIDs, looked up by exact sequence.
///
/// The table is immutable once built. Every sequence is `ID_LEN` long and maps to exactly one
/// name.
#[derive(Debug, Clone)]
pub struct IdentifierTable {
    entries: Vec<(Arc<str>, Vec<u8>)>,
    by_seq: FxHashMap<Vec<u8>, Arc<str>>,
}

impl IdentifierTable {
    pub fn new<N, S>(entries: impl IntoIterator<Item = (N, S)>) -> Result<Self>
    where
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut res = Self {
            entries: Vec::new(),
            by_seq: FxHashMap::default(),
        };

        for (name, seq) in entries {
            res.insert(name.as_ref(), seq.as_ref())?;
        }

        Ok(res)
    }

    /// The built-in table of the reference experiment.
    pub fn reference() -> Self {
        Self::new(REFERENCE_IDENTIFIERS)
            .unwrap_or_else(|e| panic!("Invalid built-in identifier table: {e}"))
    }

    /// Parse a table from YAML:
    /// ```yaml
    /// identifiers:
    ///   - name: Apc
    ///     seq: AGGAGTCC
    /// ```
    pub fn from_yaml(yaml: &[u8]) -> Result<Self> {
        let file: IdentifiersFile =
            serde_yaml::from_slice(yaml).map_err(|e| Error::ParseIdentifiers {
                identifiers: utf8(yaml),
                source: Box::new(e),
            })?;

        Self::new(file.identifiers.into_iter().map(|e| (e.name, e.seq)))
    }

    pub fn from_yaml_file(file: impl AsRef<str>) -> Result<Self> {
        let yaml = std::fs::read(file.as_ref()).map_err(|e| Error::FileIo {
            file: file.as_ref().to_owned(),
            source: Box::new(e),
        })?;
        Self::from_yaml(&yaml)
    }

    fn insert(&mut self, name: &str, seq: &str) -> Result<()> {
        let invalid = |reason| Error::InvalidIdentifier {
            name: name.to_owned(),
            seq: seq.to_owned(),
            reason,
        };

        if name.is_empty() || name.contains([',', '\n', '\r']) {
            return Err(invalid("names must be non-empty and cannot contain ',' or line breaks"));
        }
        if name == UNRESOLVED {
            return Err(invalid("the name is reserved for unresolved sgIDs"));
        }
        if seq.len() != ID_LEN {
            return Err(invalid("sequences must have exactly 8 nucleotides"));
        }
        if !seq.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(invalid("sequences must only contain nucleotides"));
        }
        if self.entries.iter().any(|(n, _)| &**n == name) {
            return Err(invalid("duplicate name"));
        }
        if let Some(first) = self.by_seq.get(seq.as_bytes()) {
            return Err(Error::DuplicateIdentifier {
                first: first.to_string(),
                second: name.to_owned(),
                seq: seq.to_owned(),
            });
        }

        let name: Arc<str> = Arc::from(name);
        self.by_seq.insert(seq.as_bytes().to_owned(), Arc::clone(&name));
        self.entries.push((name, seq.as_bytes().to_owned()));
        Ok(())
    }

    /// Exact, case sensitive lookup of an sgID candidate.
    pub fn resolve(&self, seq: &[u8]) -> Identifier {
        match self.by_seq.get(seq) {
            Some(name) => Identifier::Known(Arc::clone(name)),
            None => Identifier::Unresolved,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(n, s)| (&**n, s.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
