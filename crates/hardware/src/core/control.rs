//! Transfer orchestrator.
//!
//! Owns the whole-transfer lifecycle: validates and latches the request,
//! pulses the read engine, enables the output stage, counts words handed
//! to the stream side, places the transfer-wide last-word marker, and
//! folds engine faults into the caller-facing status register. Bursts are
//! invisible below this level; only the orchestrator knows where the
//! transfer ends.

use crate::common::error::ErrorKind;
use crate::core::types::{Status, TransferRequest};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Idle,
    KickRead,
    Running,
    Done,
    Error,
}

/// Next-state record produced by [`TransferControl::compute`].
pub struct ControlNext {
    pub state: ControlState,
    pub words_sent: u64,
    pub read_done_seen: bool,
    pub error: Option<ErrorKind>,
}

pub struct TransferControl {
    state: ControlState,
    request: TransferRequest,
    total_words: u64,
    words_sent: u64,
    read_done_seen: bool,
    error: Option<ErrorKind>,
}

impl TransferControl {
    pub fn new() -> Self {
        Self {
            state: ControlState::Idle,
            request: TransferRequest::new(0, 0, 0),
            total_words: 0,
            words_sent: 0,
            read_done_seen: false,
            error: None,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    pub fn words_sent(&self) -> u64 {
        self.words_sent
    }

    /// Caller-facing status register. `done` is high for exactly the one
    /// tick spent in `Done`.
    pub fn status(&self) -> Status {
        Status {
            busy: matches!(self.state, ControlState::KickRead | ControlState::Running),
            done: self.state == ControlState::Done,
            error: self.error,
        }
    }

    /// True while the output stage may drain the buffer. Held through
    /// `Error` so words buffered before a fault still reach the consumer.
    pub fn output_enable(&self) -> bool {
        matches!(self.state, ControlState::Running | ControlState::Error)
    }

    /// The one-tick engine start pulse, present only while in `KickRead`.
    pub fn kick(&self) -> Option<&TransferRequest> {
        (self.state == ControlState::KickRead).then_some(&self.request)
    }

    /// Whether the word the output stage fetches this tick is the final
    /// word of the whole transfer: output enabled, a pop occurring, and
    /// this pop being the one that accounts for the last word.
    pub fn last_word(&self, pop: bool) -> bool {
        self.output_enable() && pop && self.words_sent + 1 == self.total_words
    }

    /// Accepts a start command. Returns false (command ignored) while a
    /// transfer is in flight. An accepted start clears the sticky error
    /// and reloads every per-transfer register with its power-on value;
    /// validation failures park the machine in `Error` without touching
    /// anything downstream.
    pub fn start(&mut self, req: TransferRequest) -> bool {
        if matches!(self.state, ControlState::KickRead | ControlState::Running) {
            return false;
        }
        self.error = None;
        self.read_done_seen = false;
        self.words_sent = 0;
        self.total_words = 0;
        self.request = req;
        if !req.is_aligned() {
            self.state = ControlState::Error;
            self.error = Some(ErrorKind::Misaligned);
        } else if req.total_words() == 0 {
            self.state = ControlState::Done;
        } else {
            self.total_words = req.total_words();
            self.state = ControlState::KickRead;
        }
        true
    }

    /// Combinational pass for one tick. `pop` is the output stage's fetch
    /// decision, `read_done`/`read_error` the engine's registered status,
    /// `fifo_empty` the buffer occupancy, all sampled at tick start.
    pub fn compute(
        &self,
        pop: bool,
        read_done: bool,
        read_error: Option<ErrorKind>,
        fifo_empty: bool,
    ) -> ControlNext {
        let mut next = ControlNext {
            state: self.state,
            words_sent: self.words_sent,
            read_done_seen: self.read_done_seen,
            error: self.error,
        };
        match self.state {
            ControlState::Idle => {}
            ControlState::KickRead => next.state = ControlState::Running,
            ControlState::Running => {
                if pop {
                    next.words_sent = self.words_sent + 1;
                }
                if let Some(kind) = read_error {
                    // Fail now; the buffer drains on its own time.
                    next.state = ControlState::Error;
                    next.error = Some(kind);
                } else {
                    next.read_done_seen = self.read_done_seen || read_done;
                    // Read side finished, every word accounted for by the
                    // output side, and the buffer drained. Read completion
                    // and output draining are decoupled by the buffer, so
                    // all three must hold.
                    if next.read_done_seen && self.words_sent == self.total_words && fifo_empty {
                        next.state = ControlState::Done;
                    }
                }
            }
            ControlState::Done => next.state = ControlState::Idle,
            ControlState::Error => {}
        }
        next
    }

    pub fn commit(&mut self, next: ControlNext) {
        self.state = next.state;
        self.words_sent = next.words_sent;
        self.read_done_seen = next.read_done_seen;
        self.error = next.error;
    }

    /// Returns every register to its power-on value.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for TransferControl {
    fn default() -> Self {
        Self::new()
    }
}
