//! Binary min-heap over dense item ids with in-place priority updates.
//!
//! Every item id maps to its current slot in the heap array, so
//! [`IndexedHeap::update`] can sift an entry from where it already sits
//! instead of inserting a duplicate.

/// Min-heap of `(item, priority)` entries keyed by `P`.
#[derive(Clone, Debug)]
pub struct IndexedHeap<P> {
    entries: Vec<(usize, P)>,
    slots: Vec<Option<usize>>,
}

impl<P> Default for IndexedHeap<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            slots: Vec::new(),
        }
    }
}

impl<P: Ord + Copy> IndexedHeap<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the heap for item ids in `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            slots: vec![None; capacity],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, item: usize) -> bool {
        self.slot(item).is_some()
    }

    /// Current priority of `item`, if queued.
    pub fn priority(&self, item: usize) -> Option<P> {
        self.slot(item).map(|slot| self.entries[slot].1)
    }

    pub fn peek(&self) -> Option<(usize, P)> {
        self.entries.first().copied()
    }

    /// Removes every entry, keeping allocations.
    pub fn clear(&mut self) {
        for (item, _) in self.entries.drain(..) {
            self.slots[item] = None;
        }
    }

    /// Queues `item`, or re-prioritises it if already queued.
    pub fn push(&mut self, item: usize, priority: P) {
        if self.contains(item) {
            self.update(item, priority);
            return;
        }
        if item >= self.slots.len() {
            self.slots.resize(item + 1, None);
        }
        let slot = self.entries.len();
        self.entries.push((item, priority));
        self.slots[item] = Some(slot);
        self.sift_up(slot);
    }

    /// Removes and returns the entry with the smallest priority.
    pub fn pop(&mut self) -> Option<(usize, P)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.swap(0, last);
        let (item, priority) = self.entries.pop()?;
        self.slots[item] = None;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((item, priority))
    }

    /// Changes the priority of a queued item. Returns `false` if it is not queued.
    pub fn update(&mut self, item: usize, priority: P) -> bool {
        let Some(slot) = self.slot(item) else {
            return false;
        };
        let previous = self.entries[slot].1;
        self.entries[slot].1 = priority;
        if priority < previous {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
        true
    }

    fn slot(&self, item: usize) -> Option<usize> {
        self.slots.get(item).copied().flatten()
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.slots[self.entries[a].0] = Some(a);
        self.slots[self.entries[b].0] = Some(b);
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.entries[slot].1 >= self.entries[parent].1 {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < len && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }
}
