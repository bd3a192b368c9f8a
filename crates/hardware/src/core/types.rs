use crate::common::constants::WORD_SIZE_BYTES;
use crate::common::error::ErrorKind;

/// One whole-transfer command as presented on the start interface.
/// Immutable for the duration of the transfer it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferRequest {
    pub addr: u64,
    pub len_bytes: u64,
    pub max_burst: u64,
}

impl TransferRequest {
    pub fn new(addr: u64, len_bytes: u64, max_burst: u64) -> Self {
        Self {
            addr,
            len_bytes,
            max_burst,
        }
    }

    pub fn total_words(&self) -> u64 {
        self.len_bytes / WORD_SIZE_BYTES
    }

    pub fn is_aligned(&self) -> bool {
        self.addr.is_multiple_of(WORD_SIZE_BYTES) && self.len_bytes.is_multiple_of(WORD_SIZE_BYTES)
    }
}

/// Transfer-level status register. `done` is a one-tick pulse; `error`
/// stays set until the next accepted start command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status {
    pub busy: bool,
    pub done: bool,
    pub error: Option<ErrorKind>,
}

/// The word currently offered on the stream output. While `valid` is high
/// and the consumer is not ready, `data` and `last` hold their values
/// across ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamOut {
    pub valid: bool,
    pub data: u64,
    pub last: bool,
}
