use lazy_static::lazy_static;

lazy_static! {
    /// Complement of every byte. Bytes outside the IUPAC DNA alphabet map to themselves.
    pub static ref COMPLEMENT: [u8; 256] = {
        let mut comp = [0; 256];

        for (v, a) in comp.iter_mut().enumerate() {
            *a = v as u8;
        }

        // IUPAC DNA alphabet
        for (&a, &b) in b"AGCTYRWSKMDVHBN".iter().zip(b"TCGARYWSMKHBDVN".iter()) {
            comp[a as usize] = b; // upper case
            comp[a as usize + 32] = b + 32; // lower case
        }

        comp
    };
}

/// Reverse complement a nucleotide sequence.
///
/// Case is preserved and unknown characters are passed through, so applying this twice always
/// gives back the input.
pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| COMPLEMENT[b as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_pairs() {
        assert_eq!(revcomp(b"ATGCN"), b"NGCAT");
        assert_eq!(revcomp(b"AAGGTC"), b"GACCTT");
        assert_eq!(revcomp(b"acgt"), b"acgt");
        assert_eq!(revcomp(b""), b"");
    }

    #[test]
    fn unknown_bytes_pass_through() {
        assert_eq!(revcomp(b"A1-T"), b"A-1T");
    }

    #[test]
    fn involution() {
        // every string over the nucleotide alphabet up to length 6
        let mut seqs = vec![Vec::new()];
        for _ in 0..6 {
            seqs = seqs
                .iter()
                .flat_map(|seq| {
                    b"ATGCN".iter().map(move |&b| {
                        let mut next = seq.clone();
                        next.push(b);
                        next
                    })
                })
                .collect();

            for seq in &seqs {
                assert_eq!(&revcomp(&revcomp(seq)), seq);
                assert_eq!(revcomp(seq).len(), seq.len());
            }
        }

        // every byte string of length 2, including bytes outside the alphabet
        for a in 0..=u8::MAX {
            for b in 0..=u8::MAX {
                assert_eq!(revcomp(&revcomp(&[a, b])), [a, b]);
            }
        }
    }
}
