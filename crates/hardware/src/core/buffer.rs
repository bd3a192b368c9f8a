//! Elastic buffer between the read engine and the stream output stage.
//!
//! A fixed-capacity ring of words with an explicit occupancy counter. A
//! push and a pop may commit in the same tick; both are judged against the
//! occupancy at the start of the tick, so a full buffer refuses a push
//! even when a pop lands in the same tick, and a pop always returns the
//! word that was oldest when the tick began.

pub struct Fifo {
    slots: Box<[u64]>,
    head: usize,
    level: usize,
}

impl Fifo {
    pub fn new(depth: usize) -> Self {
        assert!(depth > 0, "fifo depth must be at least 1");
        Self {
            slots: vec![0; depth].into_boxed_slice(),
            head: 0,
            level: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// True when a push would be accepted this tick.
    pub fn can_accept(&self) -> bool {
        self.level < self.slots.len()
    }

    /// True when a pop would return a word this tick.
    pub fn has_data(&self) -> bool {
        self.level > 0
    }

    pub fn is_empty(&self) -> bool {
        self.level == 0
    }

    pub fn is_full(&self) -> bool {
        self.level == self.slots.len()
    }

    /// The oldest un-popped word, if any.
    pub fn front(&self) -> Option<u64> {
        self.has_data().then(|| self.slots[self.head])
    }

    /// Applies one tick of traffic. Callers gate both sides through
    /// `can_accept`/`has_data`; the buffer itself only refuses the write
    /// when full and ignores a pop when empty. When both commit in the
    /// same tick the occupancy is unchanged and the pop still takes the
    /// old front.
    pub fn commit(&mut self, push: Option<u64>, pop: bool) {
        let depth = self.slots.len();
        let start_level = self.level;
        if let Some(word) = push
            && start_level < depth
        {
            self.slots[(self.head + start_level) % depth] = word;
            self.level += 1;
        }
        if pop && start_level > 0 {
            self.head = (self.head + 1) % depth;
            self.level -= 1;
        }
    }

    /// Returns the buffer to its power-on state.
    pub fn clear(&mut self) {
        self.head = 0;
        self.level = 0;
    }
}
