use crate::cache::{CacheLine, CacheSet};

/// Least- and most-recently used positions in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyScan {
    /// lowest slot holding the minimum recency
    pub least_recent: usize,
    pub max_recency: u64,
}

impl RecencyScan {
    pub fn of(lines: &[CacheLine]) -> Self {
        let mut scan = RecencyScan {
            least_recent: 0,
            max_recency: 0,
        };
        let Some(first) = lines.first() else {
            return scan;
        };

        let mut least_recency = first.recency;
        scan.max_recency = first.recency;
        for (line_idx, line) in lines.iter().enumerate().skip(1) {
            // strict comparison keeps the lowest slot on ties
            if line.recency < least_recency {
                least_recency = line.recency;
                scan.least_recent = line_idx;
            }
            scan.max_recency = scan.max_recency.max(line.recency);
        }

        scan
    }

    /// Recency that makes a line the most recently used of its set.
    pub fn next_recency(&self) -> u64 {
        self.max_recency + 1
    }
}

/// Where a newly fetched block goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// first invalid slot
    Vacant { slot: usize },
    /// every slot is valid; `slot` held the least recently used `tag`
    Evict { slot: usize, tag: u64 },
}

impl Placement {
    pub fn slot(&self) -> usize {
        match *self {
            Placement::Vacant { slot } | Placement::Evict { slot, .. } => slot,
        }
    }

    pub fn evicted(&self) -> Option<u64> {
        match *self {
            Placement::Vacant { .. } => None,
            Placement::Evict { tag, .. } => Some(tag),
        }
    }
}

impl CacheSet {
    /// Index of the valid line holding `tag`, if any.
    pub fn find(&self, tag: u64) -> Option<usize> {
        self.lines()
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Marks `line_idx` as the most recently used line of the set.
    pub fn touch(&mut self, line_idx: usize) {
        let scan = RecencyScan::of(self.lines());
        self.line_mut(line_idx).recency = scan.next_recency();
    }

    /// Chooses a slot for a block that missed: the lowest invalid slot,
    /// otherwise the least recently used one.
    pub fn choose_slot(&self) -> Placement {
        match self.lines().iter().position(|line| !line.valid) {
            Some(slot) => Placement::Vacant { slot },
            None => {
                let slot = RecencyScan::of(self.lines()).least_recent;
                Placement::Evict {
                    slot,
                    tag: self.line(slot).tag,
                }
            }
        }
    }

    /// Places `tag` in the set as its most recently used line.
    pub fn install(&mut self, tag: u64) -> Placement {
        let placement = self.choose_slot();
        let recency = RecencyScan::of(self.lines()).next_recency();

        *self.line_mut(placement.slot()) = CacheLine {
            valid: true,
            tag,
            recency,
        };

        placement
    }
}
