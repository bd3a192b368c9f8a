//! Burst read engine.
//!
//! Issues one bounded read burst at a time against the memory port and
//! pushes returned words into the elastic buffer. The engine never accepts
//! a response beat unless the buffer can take it in the same tick; that is
//! the only path by which downstream backpressure reaches the read side.
//! A faulted beat finishes the transfer immediately and the rest of the
//! burst is abandoned, not drained.

use crate::common::constants::{BURST_WORDS_MAX, WORD_SIZE_BYTES};
use crate::common::error::ErrorKind;
use crate::core::types::TransferRequest;
use crate::mem::{BurstRequest, MemoryPort};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    IssueRequest,
    ReceiveData,
    Finished,
}

/// Next-state record produced by [`ReadEngine::compute`] and applied by
/// [`ReadEngine::commit`].
pub struct EngineNext {
    pub state: EngineState,
    pub addr: u64,
    pub words_remaining: u64,
    pub max_burst: u64,
    pub burst_words: u64,
    pub burst_received: u64,
    pub error: Option<ErrorKind>,
}

pub struct ReadEngine {
    state: EngineState,
    addr: u64,
    words_remaining: u64,
    max_burst: u64,
    burst_words: u64,
    burst_received: u64,
    error: Option<ErrorKind>,
}

impl ReadEngine {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            addr: 0,
            words_remaining: 0,
            max_burst: 0,
            burst_words: 0,
            burst_received: 0,
            error: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn busy(&self) -> bool {
        self.state != EngineState::Idle
    }

    /// One-tick completion pulse: high for the single tick spent in
    /// `Finished`, for both clean and faulted endings.
    pub fn done(&self) -> bool {
        self.state == EngineState::Finished
    }

    /// Sticky burst-level fault, cleared by the next kick.
    pub fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub fn words_remaining(&self) -> u64 {
        self.words_remaining
    }

    /// Combinational pass for one tick. Reads only registered state plus
    /// the sampled buffer flag; the returned push (if any) is the word the
    /// buffer must absorb when this tick commits.
    pub fn compute(
        &self,
        kick: Option<&TransferRequest>,
        fifo_can_accept: bool,
        mem: &mut dyn MemoryPort,
    ) -> (EngineNext, Option<u64>) {
        let mut next = EngineNext {
            state: self.state,
            addr: self.addr,
            words_remaining: self.words_remaining,
            max_burst: self.max_burst,
            burst_words: self.burst_words,
            burst_received: self.burst_received,
            error: self.error,
        };
        let mut push = None;

        match self.state {
            EngineState::Idle => {
                if let Some(req) = kick {
                    next.error = None;
                    if req.len_bytes == 0 {
                        // Nothing to read; finish clean.
                        next.state = EngineState::Finished;
                    } else if !req.is_aligned() {
                        next.state = EngineState::Finished;
                        next.error = Some(ErrorKind::Misaligned);
                    } else {
                        next.addr = req.addr;
                        next.words_remaining = req.total_words();
                        next.max_burst = req.max_burst.clamp(1, BURST_WORDS_MAX);
                        next.state = EngineState::IssueRequest;
                    }
                }
            }
            EngineState::IssueRequest => {
                let words = self.max_burst.min(self.words_remaining);
                let req = BurstRequest {
                    addr: self.addr,
                    words,
                    word_size: WORD_SIZE_BYTES,
                };
                // Re-presented every tick until the subsystem takes it.
                if mem.request(&req) {
                    next.burst_words = words;
                    next.burst_received = 0;
                    next.state = EngineState::ReceiveData;
                }
            }
            EngineState::ReceiveData => {
                if let Some(beat) = mem.response()
                    && fifo_can_accept
                {
                    mem.take_response();
                    if beat.fault {
                        next.state = EngineState::Finished;
                        next.error = Some(ErrorKind::ResponseFault);
                    } else {
                        push = Some(beat.data);
                        next.words_remaining = self.words_remaining - 1;
                        next.burst_received = self.burst_received + 1;
                        if next.burst_received == self.burst_words {
                            if next.words_remaining == 0 {
                                next.state = EngineState::Finished;
                            } else {
                                next.addr =
                                    self.addr.wrapping_add(self.burst_words * WORD_SIZE_BYTES);
                                next.state = EngineState::IssueRequest;
                            }
                        }
                    }
                }
            }
            EngineState::Finished => {
                next.state = EngineState::Idle;
            }
        }

        (next, push)
    }

    pub fn commit(&mut self, next: EngineNext) {
        self.state = next.state;
        self.addr = next.addr;
        self.words_remaining = next.words_remaining;
        self.max_burst = next.max_burst;
        self.burst_words = next.burst_words;
        self.burst_received = next.burst_received;
        self.error = next.error;
    }

    /// Returns every register to its power-on value.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ReadEngine {
    fn default() -> Self {
        Self::new()
    }
}
