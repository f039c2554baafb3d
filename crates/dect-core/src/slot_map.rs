use crate::slot_range::SlotRange;

/// Number of slots in one beacon frame
pub const MAX_SLOTS: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Free,
    Reserved,
}

/// Occupancy table for a single frame.
/// Readable by anyone holding a reference, writable only through the SlotAllocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMap {
    slots: Box<[SlotState]>,
}

impl Default for SlotMap {
    fn default() -> Self {
        Self::new(MAX_SLOTS)
    }
}

impl SlotMap {
    /// Creates a map with `capacity` slots, all Free
    pub fn new(capacity: u16) -> Self {
        Self {
            slots: vec![SlotState::Free; capacity as usize].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> u16 {
        self.slots.len() as u16
    }

    /// Returns the state of slot `idx`, or None if `idx` is out of range
    pub fn state(&self, idx: u16) -> Option<SlotState> {
        self.slots.get(idx as usize).copied()
    }

    pub fn is_free(&self, idx: u16) -> bool {
        self.state(idx) == Some(SlotState::Free)
    }

    pub fn num_reserved(&self) -> usize {
        self.slots.iter().filter(|s| **s == SlotState::Reserved).count()
    }

    pub fn num_free(&self) -> usize {
        self.slots.len() - self.num_reserved()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, SlotState)> + '_ {
        self.slots.iter().enumerate().map(|(i, s)| (i as u16, *s))
    }

    /// Lists all maximal runs of Free slots, in index order
    pub fn free_runs(&self) -> Vec<SlotRange> {
        let mut runs = vec![];
        let mut run_start: Option<u16> = None;
        for (idx, state) in self.iter() {
            match (state, run_start) {
                (SlotState::Free, None) => run_start = Some(idx),
                (SlotState::Reserved, Some(start)) => {
                    runs.push(SlotRange::new(start, idx - start));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            runs.push(SlotRange::new(start, self.capacity() - start));
        }
        runs
    }

    /// Sets the state of a slot. Out-of-range indices are ignored and false is returned.
    pub(crate) fn set(&mut self, idx: u16, state: SlotState) -> bool {
        match self.slots.get_mut(idx as usize) {
            Some(slot) => {
                *slot = state;
                true
            }
            None => false,
        }
    }
}
