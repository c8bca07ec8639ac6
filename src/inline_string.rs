use std::fmt;

pub const LEN: usize = 32usize;

/// Short byte string stored inline, so that millions of count table keys do not each own a
/// separate heap allocation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InlineString {
    data: [u8; LEN],
    len: u8,
}

impl InlineString {
    pub fn new(s: &[u8]) -> Self {
        assert!(s.len() <= LEN);

        let mut data = [0u8; LEN];
        data[..s.len()].copy_from_slice(s);

        Self {
            data,
            len: s.len() as u8,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

impl fmt::Display for InlineString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}
