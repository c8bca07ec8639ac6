use thiserror;

use crate::read::Origin;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading or writing \"{file}\": {source}")]
    FileIo { file: String, source: BoxError },

    #[error("Error reading or writing bytes: {0}")]
    BytesIo(BoxError),

    #[error("Unpaired read in {0}: the paired streams do not have the same number of records")]
    UnpairedRead(String),

    #[error("Error parsing record {idx} in {origin}: {source}")]
    ParseRecord {
        origin: Origin,
        idx: usize,
        source: BoxError,
    },

    #[error("Cannot derive the reverse read path from \"{file}\": it does not contain \"{token}\"")]
    ReversePath { file: String, token: String },

    #[error("Error parsing identifiers:\n\"{identifiers}\"\n{source}")]
    ParseIdentifiers {
        identifiers: String,
        source: BoxError,
    },

    #[error("Invalid identifier \"{name}\" with sequence \"{seq}\": {reason}")]
    InvalidIdentifier {
        name: String,
        seq: String,
        reason: &'static str,
    },

    #[error("Identifiers \"{first}\" and \"{second}\" share the same sequence \"{seq}\"")]
    DuplicateIdentifier {
        first: String,
        second: String,
        seq: String,
    },

    #[error("Invalid locator pattern \"{pattern}\": {reason}")]
    InvalidLocator {
        pattern: String,
        reason: String,
    },
}

pub fn utf8(b: &[u8]) -> String {
    String::from_utf8_lossy(b).into_owned()
}
