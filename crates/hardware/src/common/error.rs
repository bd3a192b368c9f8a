use std::fmt;

/// Terminal transfer faults. Both are sticky in the status registers until
/// the next accepted start command clears them; neither is retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested source address or byte length is not a multiple of
    /// the word size. Detected before any memory request is issued.
    Misaligned,
    /// The memory subsystem flagged a faulted response beat mid-burst.
    /// The rest of the burst is abandoned, not drained.
    ResponseFault,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Misaligned => write!(f, "address or length not word-aligned"),
            ErrorKind::ResponseFault => write!(f, "memory response fault"),
        }
    }
}
