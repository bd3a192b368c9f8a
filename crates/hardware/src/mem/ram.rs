//! Flat RAM behind the read channel, with a simple latency model.
//!
//! One burst outstanding at a time; a configurable number of ticks before
//! a presented request is accepted and between beats of a burst. Reads
//! outside the backing store, and reads inside an injected fault window,
//! come back as faulted beats rather than data.

use super::{BurstRequest, MemoryPort, RespBeat};
use crate::common::constants::WORD_SIZE_BYTES;
use crate::config::MemoryConfig;

#[derive(Clone, Copy)]
struct ActiveBurst {
    addr: u64,
    words: u64,
    sent: u64,
}

pub struct Ram {
    base: u64,
    data: Vec<u8>,
    accept_latency: u64,
    beat_latency: u64,
    accept_timer: u64,
    beat_timer: u64,
    burst: Option<ActiveBurst>,
    offered: Option<RespBeat>,
    fault_window: Option<(u64, u64)>,
}

impl Ram {
    pub fn new(base: u64, size: u64) -> Self {
        Self {
            base,
            data: vec![0; size as usize],
            accept_latency: 0,
            beat_latency: 0,
            accept_timer: 0,
            beat_timer: 0,
            burst: None,
            offered: None,
            fault_window: None,
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Self {
        let mut ram = Self::new(config.base, config.size);
        ram.accept_latency = config.accept_latency;
        ram.beat_latency = config.beat_latency;
        ram.accept_timer = config.accept_latency;
        ram
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Marks `[start, end)` so that any beat read from it comes back
    /// faulted, the way a bridge reports a slave error for a bad region.
    pub fn fault_window(&mut self, start: u64, end: u64) {
        self.fault_window = Some((start, end));
    }

    /// Copies `bytes` into the backing store at `addr`, clipping whatever
    /// falls outside it.
    pub fn load_at(&mut self, bytes: &[u8], addr: u64) {
        let Some(off) = addr.checked_sub(self.base).map(|o| o as usize) else {
            return;
        };
        if off >= self.data.len() {
            return;
        }
        let n = bytes.len().min(self.data.len() - off);
        self.data[off..off + n].copy_from_slice(&bytes[..n]);
    }

    /// Little-endian word at `addr`, or `None` outside the store.
    pub fn read_word(&self, addr: u64) -> Option<u64> {
        let off = addr.checked_sub(self.base)? as usize;
        let end = off.checked_add(WORD_SIZE_BYTES as usize)?;
        let slice = self.data.get(off..end)?;
        Some(u64::from_le_bytes(slice.try_into().ok()?))
    }

    fn beat_at(&self, addr: u64, last: bool) -> RespBeat {
        let injected = match self.fault_window {
            Some((start, end)) => addr >= start && addr < end,
            None => false,
        };
        match self.read_word(addr) {
            Some(data) if !injected => RespBeat {
                data,
                fault: false,
                last,
            },
            _ => RespBeat {
                data: 0,
                fault: true,
                last,
            },
        }
    }
}

impl MemoryPort for Ram {
    fn name(&self) -> &str {
        "ram"
    }

    fn request(&mut self, req: &BurstRequest) -> bool {
        if self.burst.is_some() || self.offered.is_some() || self.accept_timer > 0 {
            return false;
        }
        self.burst = Some(ActiveBurst {
            addr: req.addr,
            // A zero-word burst would never produce its last beat.
            words: req.words.max(1),
            sent: 0,
        });
        self.beat_timer = self.beat_latency;
        self.accept_timer = self.accept_latency;
        true
    }

    fn response(&self) -> Option<RespBeat> {
        self.offered
    }

    fn take_response(&mut self) {
        self.offered = None;
    }

    fn flush(&mut self) {
        self.burst = None;
        self.offered = None;
        self.beat_timer = 0;
    }

    fn tick(&mut self) {
        if self.accept_timer > 0 {
            self.accept_timer -= 1;
        }
        let Some(mut burst) = self.burst else {
            return;
        };
        if self.offered.is_some() {
            // Backpressure: hold the offered beat untouched.
            return;
        }
        if self.beat_timer > 0 {
            self.beat_timer -= 1;
            return;
        }
        let addr = burst.addr.wrapping_add(burst.sent * WORD_SIZE_BYTES);
        let last = burst.sent + 1 == burst.words;
        self.offered = Some(self.beat_at(addr, last));
        burst.sent += 1;
        self.beat_timer = self.beat_latency;
        self.burst = if last { None } else { Some(burst) };
    }
}
