use core::fmt;

/// Half-open run of slots `[start, start + len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    pub start: u16,
    pub len: u16,
}

impl SlotRange {
    pub fn new(start: u16, len: u16) -> Self {
        Self { start, len }
    }

    /// Exclusive end. Computed in u32 so a range ending at the last u16 index cannot overflow.
    pub fn end(&self) -> u32 {
        self.start as u32 + self.len as u32
    }

    /// Inclusive last index, or None for an empty range
    pub fn last(&self) -> Option<u16> {
        if self.len == 0 {
            None
        } else {
            Some((self.end() - 1) as u16)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, idx: u16) -> bool {
        (idx as u32) >= self.start as u32 && (idx as u32) < self.end()
    }

    pub fn overlaps(&self, other: &SlotRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && (self.start as u32) < other.end()
            && (other.start as u32) < self.end()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + use<> {
        let start = self.start as u32;
        (start..self.end()).map(|i| i as u16)
    }
}

impl fmt::Display for SlotRange {
    /// Formats as an inclusive range, e.g. `[5 .. 7]` for start 5, len 3
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last() {
            Some(last) => write!(f, "[{} .. {}]", self.start, last),
            None => write!(f, "[{} .. ]", self.start),
        }
    }
}
