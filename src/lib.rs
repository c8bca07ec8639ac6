//! Count sgID/barcode combinations in paired-end sequencing reads.
//!
//! # Overview
//! Each read pair is expected to span an 8 nucleotide sgID followed by a semi-random barcode
//! flanked by known constant sequence:
//! ```text
//! GA sgID[8] AANNNNNTTNNNNNAANNNNN AT GCCCA
//! ```
//! The sgID identifies the targeted gene and must exactly match one of a small set of known
//! sequences. The barcode identifies the clone and must agree between the forward read and the
//! reverse complemented reverse read.
//!
//! The output is a table of `sgID,barcode,count` lines, sorted by count.
//!
//! ## Processing a read pair
//! * [`PairedFastq`] yields one [`ReadPair`] at a time from two fastq files. The files must
//!   have the same number of records, otherwise reading fails instead of shifting the pairs.
//! * [`BarcodeLocator`] finds the sgID and barcode regions in the forward read and in the
//!   reverse complemented reverse read. The constant anchor after the barcode may contain a
//!   few errors (1 in the forward read, 2 in the reverse read).
//! * [`PairProcessor`] accepts the pair if both reads match, their barcodes are identical and
//!   the barcode has no `N`. The sgID of the forward read is resolved with an
//!   [`IdentifierTable`]; unknown sgIDs are counted as `None`.
//! * [`BarcodeCounts`] accumulates the accepted keys and sorts them at the end.
//!
//! ## Example
//! ```no_run
//! use sgidbc::*;
//!
//! let reads = PairedFastq::new("Test_R1_001.fastq.gz", "Test_R2_001.fastq.gz")?;
//! let processor = PairProcessor::with_identifiers(IdentifierTable::reference())?;
//!
//! let mut counts = BarcodeCounts::new();
//! let stats = processor.run(reads, &mut counts)?;
//! eprintln!("{stats}");
//!
//! write_counts_file("MergeReadOut", &counts.finalize())?;
//! # Ok::<(), sgidbc::Error>(())
//! ```

pub mod count;
pub mod errors;
pub mod fastq;
pub mod inline_string;
pub mod locator;
pub mod output;
pub mod patterns;
pub mod pipeline;
pub mod read;
pub mod revcomp;

// commonly used functions and types

pub use crate::count::*;
pub use crate::errors::*;
pub use crate::fastq::*;
pub use crate::locator::*;
pub use crate::output::*;
pub use crate::patterns::*;
pub use crate::pipeline::*;
pub use crate::read::*;
pub use crate::revcomp::*;
