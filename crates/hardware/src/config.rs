//! Simulator configuration.
//!
//! Sectioned, serde-backed, with defaults for every field so a partial
//! JSON file (or none at all) is always usable.

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_BUFFER_DEPTH, DEFAULT_MAX_BURST_WORDS, DEFAULT_RAM_BASE, DEFAULT_RAM_SIZE,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub engine: EngineConfig,
    pub buffer: BufferConfig,
    pub memory: MemoryConfig,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit a per-tick state line on stderr.
    pub trace: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-burst word budget used when a start command does not carry its
    /// own; clamped to 1..=256 at start time either way.
    pub max_burst_words: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_burst_words: DEFAULT_MAX_BURST_WORDS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Elastic buffer capacity in words.
    pub depth: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_BUFFER_DEPTH,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base address of the modeled RAM.
    pub base: u64,
    /// Size of the modeled RAM in bytes.
    pub size: u64,
    /// Ticks before a presented burst request is accepted.
    pub accept_latency: u64,
    /// Ticks between response beats within a burst.
    pub beat_latency: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_RAM_BASE,
            size: DEFAULT_RAM_SIZE,
            accept_latency: 0,
            beat_latency: 0,
        }
    }
}
