//! Stream output stage.
//!
//! A single holding register refilled from the elastic buffer. A refill
//! happens whenever the slot is empty or the held word is being accepted
//! this tick, which sustains one word per tick when the consumer never
//! stalls. While the consumer is stalled the held word and its last flag
//! do not change; nothing moves without a completed handshake.

use crate::core::types::StreamOut;

/// Next-state record produced by [`StreamStage::compute`].
pub struct StreamNext {
    pub slot: StreamOut,
}

pub struct StreamStage {
    slot: StreamOut,
}

impl StreamStage {
    pub fn new() -> Self {
        Self {
            slot: StreamOut::default(),
        }
    }

    /// The registered offer to the consumer.
    pub fn output(&self) -> StreamOut {
        self.slot
    }

    /// True when this tick's output handshake completes.
    pub fn accepting(&self, consumer_ready: bool) -> bool {
        self.slot.valid && consumer_ready
    }

    /// True when the stage will pop the buffer this tick. Pure in the
    /// registered state and the sampled inputs, so the orchestrator can
    /// use it to place the transfer-wide last-word marker on the word
    /// being fetched.
    pub fn will_fetch(&self, consumer_ready: bool, enable: bool, fifo_has_data: bool) -> bool {
        enable && fifo_has_data && (!self.slot.valid || consumer_ready)
    }

    /// Combinational pass for one tick. `last_word` is sampled here, at
    /// fetch time, and travels with the word until it is emitted.
    pub fn compute(
        &self,
        consumer_ready: bool,
        enable: bool,
        fifo_front: Option<u64>,
        last_word: bool,
    ) -> StreamNext {
        let accepted = self.accepting(consumer_ready);
        let refill = !self.slot.valid || accepted;
        let slot = match fifo_front {
            Some(word) if enable && refill => StreamOut {
                valid: true,
                data: word,
                last: last_word,
            },
            // Accepted with no replacement available: the slot goes empty.
            // The stale data bits are irrelevant once valid drops.
            _ if accepted => StreamOut {
                valid: false,
                ..self.slot
            },
            _ => self.slot,
        };
        StreamNext { slot }
    }

    pub fn commit(&mut self, next: StreamNext) {
        self.slot = next.slot;
    }

    /// Returns the slot to its power-on (empty) state.
    pub fn reset(&mut self) {
        self.slot = StreamOut::default();
    }
}

impl Default for StreamStage {
    fn default() -> Self {
        Self::new()
    }
}
