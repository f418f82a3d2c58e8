//! Hash utilities
//!
//! 32-bit MurmurHash3 (x86_32 variant) used to turn names into lookup keys, and
//! [`NameId`], the precomputed key type accepted by every name-based lookup.
//!
//! The hash is stable across platforms and runs: blocks are read little-endian.

use std::fmt;

/// Seed used by [`hash_bytes`] and [`hash_string`]
pub const DEFAULT_HASH_SEED: u32 = 0xc70f6907;

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

#[inline]
fn mix_block(mut k: u32) -> u32 {
    k = k.wrapping_mul(C1);
    k = k.rotate_left(15);
    k.wrapping_mul(C2)
}

#[inline]
fn finalize(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^ (h >> 16)
}

/// Hash a byte slice, starting from `seed`
pub fn hash_combine_bytes(seed: u32, bytes: &[u8]) -> u32 {
    let mut h = seed;

    let mut blocks = bytes.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_block(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k |= (byte as u32) << (8 * i);
        }
        h ^= mix_block(k);
    }

    // The length is folded in modulo 2^32
    h ^= bytes.len() as u32;
    finalize(h)
}

/// Hash a byte slice with [`DEFAULT_HASH_SEED`]
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    hash_combine_bytes(DEFAULT_HASH_SEED, bytes)
}

/// Hash the UTF-8 bytes of a string with [`DEFAULT_HASH_SEED`]
pub fn hash_string(string: &str) -> u32 {
    hash_bytes(string.as_bytes())
}

/// Hash the UTF-8 bytes of a string, starting from `seed`
pub fn hash_combine_string(seed: u32, string: &str) -> u32 {
    hash_combine_bytes(seed, string.as_bytes())
}

/// Combine two hashes, boost `hash_combine` style
pub fn hash_combine(first: u32, second: u32) -> u32 {
    first ^ second
        .wrapping_add(0x9e3779b9)
        .wrapping_add(first << 6)
        .wrapping_add(first >> 2)
}

// ===== NAME ID =====

/// Precomputed name hash used as a lookup key
///
/// Built from a string (hashed with [`hash_string`]) or wrapped directly from a hash
/// computed ahead of time. Two different names may collide in the 32-bit space; lookups
/// treat equal ids as the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(u32);

impl NameId {
    /// Hash a name
    pub fn new(name: &str) -> Self {
        Self(hash_string(name))
    }

    /// Wrap an already computed hash
    pub const fn from_hash(hash: u32) -> Self {
        Self(hash)
    }

    /// Raw hash value
    pub const fn hash(&self) -> u32 {
        self.0
    }
}

impl From<&str> for NameId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for NameId {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<u32> for NameId {
    fn from(hash: u32) -> Self {
        Self::from_hash(hash)
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
#[path = "hash_tests.rs"]
mod tests;
