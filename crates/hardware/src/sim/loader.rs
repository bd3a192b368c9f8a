use std::fs;
use std::process;

use crate::common::constants::WORD_SIZE_BYTES;

pub fn load_binary(path: &str) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: Could not read file '{}': {}", path, e);
        process::exit(1);
    })
}

/// Reads an image and returns it as little-endian words, zero-padding the
/// tail to a word boundary.
pub fn load_words(path: &str) -> Vec<u64> {
    bytes_to_words(&load_binary(path))
}

pub fn bytes_to_words(bytes: &[u8]) -> Vec<u64> {
    bytes
        .chunks(WORD_SIZE_BYTES as usize)
        .map(|chunk| {
            let mut word = [0u8; WORD_SIZE_BYTES as usize];
            word[..chunk.len()].copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect()
}
