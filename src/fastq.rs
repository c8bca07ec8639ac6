use flate2::bufread::MultiGzDecoder;
use seq_io::fastq::{Reader, Record as _};

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::errors::*;
use crate::read::*;

const GZ_MAGIC: [u8; 2] = [0x1f, 0x8b];

type FastqReader<'reader> = Reader<Box<dyn Read + 'reader>>;

/// Paired iterator over two fastq streams.
///
/// Record `i` of the forward stream is always yielded together with record `i` of the reverse
/// stream. Both streams are advanced on every step, so one stream ending before the other is
/// reported as [`Error::UnpairedRead`] instead of shifting every later pair.
///
/// Only the framing of each record is checked here. A record whose quality line does not have
/// the length of its sequence is still yielded, so the pair can be dropped without losing
/// track of the other stream.
pub struct PairedFastq<'reader> {
    reader1: FastqReader<'reader>,
    reader2: FastqReader<'reader>,
    origin1: Arc<Origin>,
    origin2: Arc<Origin>,
    idx: usize,
    done: bool,
}

impl PairedFastq<'static> {
    /// Stream read pairs from two fastq files, which may be gzip compressed.
    pub fn new(file1: impl AsRef<str>, file2: impl AsRef<str>) -> Result<Self> {
        let open = |file: &str| {
            File::open(file)
                .and_then(|f| decompress(BufReader::new(f)))
                .map_err(|e| Error::FileIo {
                    file: file.to_owned(),
                    source: Box::new(e),
                })
        };

        Ok(Self {
            reader1: Reader::new(open(file1.as_ref())?),
            reader2: Reader::new(open(file2.as_ref())?),
            origin1: Arc::new(Origin::File(file1.as_ref().to_owned())),
            origin2: Arc::new(Origin::File(file2.as_ref().to_owned())),
            idx: 0,
            done: false,
        })
    }
}

impl<'reader> PairedFastq<'reader> {
    /// Stream read pairs from two byte slices holding fastq records, which may be gzip
    /// compressed.
    pub fn from_bytes(bytes1: &'reader [u8], bytes2: &'reader [u8]) -> Result<Self> {
        let open = |bytes: &'reader [u8]| {
            decompress(bytes).map_err(|e| Error::BytesIo(Box::new(e)))
        };

        Ok(Self {
            reader1: Reader::new(open(bytes1)?),
            reader2: Reader::new(open(bytes2)?),
            origin1: Arc::new(Origin::Bytes),
            origin2: Arc::new(Origin::Bytes),
            idx: 0,
            done: false,
        })
    }

    fn next_pair(&mut self) -> Result<Option<ReadPair>> {
        let idx = self.idx;
        let record1 = next_record(&mut self.reader1, &self.origin1, idx)?;
        let record2 = next_record(&mut self.reader2, &self.origin2, idx)?;

        match (record1, record2) {
            (Some(record1), Some(record2)) => {
                self.idx += 1;
                Ok(Some(ReadPair::new(
                    record1,
                    record2,
                    Arc::clone(&self.origin1),
                    Arc::clone(&self.origin2),
                    idx,
                )))
            }
            (None, None) => Ok(None),
            _ => Err(Error::UnpairedRead(format!(
                "{} and {} at record {}",
                self.origin1, self.origin2, idx
            ))),
        }
    }
}

impl<'reader> Iterator for PairedFastq<'reader> {
    type Item = Result<ReadPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let res = self.next_pair();
        if !matches!(res, Ok(Some(_))) {
            self.done = true;
        }
        res.transpose()
    }
}

fn next_record(reader: &mut FastqReader, origin: &Origin, idx: usize) -> Result<Option<Record>> {
    match reader.next() {
        Some(Ok(record)) => Ok(Some(Record::new(record.head(), record.seq(), record.qual()))),
        Some(Err(e)) => Err(Error::ParseRecord {
            origin: origin.clone(),
            idx,
            source: Box::new(e),
        }),
        None => Ok(None),
    }
}

/// Wrap `reader` in a gzip decoder if it starts with the gzip magic bytes.
///
/// Empty input is passed through as is and yields no records.
fn decompress<'r, R: BufRead + 'r>(mut reader: R) -> io::Result<Box<dyn Read + 'r>> {
    let gzipped = reader.fill_buf()?.starts_with(&GZ_MAGIC);

    if gzipped {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Derive the reverse read file from the forward read file by replacing the last occurrence of
/// `token1` in the file name with `token2`.
pub fn reverse_path(file1: impl AsRef<str>, token1: &str, token2: &str) -> Result<String> {
    let err = || Error::ReversePath {
        file: file1.as_ref().to_owned(),
        token: token1.to_owned(),
    };

    if token1.is_empty() {
        return Err(err());
    }

    let path = Path::new(file1.as_ref());
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(err)?;
    let i = name.rfind(token1).ok_or_else(err)?;
    let new_name = format!("{}{}{}", &name[..i], token2, &name[i + token1.len()..]);

    Ok(path.with_file_name(new_name).to_string_lossy().into_owned())
}
