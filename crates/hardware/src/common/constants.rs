/// Width of one transferred word in bytes. Every buffer slot, memory beat,
/// and stream handshake moves exactly one word of this size.
pub const WORD_SIZE_BYTES: u64 = 8;

/// Upper bound on the per-burst word count. Start commands asking for more
/// are clamped here; a value of zero is treated as one.
pub const BURST_WORDS_MAX: u64 = 256;

/// Default per-burst word budget used when a caller does not pick one.
pub const DEFAULT_MAX_BURST_WORDS: u64 = 16;

/// Default elastic buffer capacity in words.
pub const DEFAULT_BUFFER_DEPTH: usize = 32;

/// Default base address of the modeled RAM.
pub const DEFAULT_RAM_BASE: u64 = 0x8000_0000;

/// Default size of the modeled RAM in bytes.
pub const DEFAULT_RAM_SIZE: u64 = 4 * 1024 * 1024;
