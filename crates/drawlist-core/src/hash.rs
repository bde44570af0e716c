//! Stable name hashing.
//!
//! Tags, constant names and frustum matrices are identified by 64-bit hashes.
//! All hashing goes through one fixed-seed [`ahash::RandomState`], so a given
//! input hashes to the same value for the lifetime of the process.

use std::hash::BuildHasher;

/// 64-bit hash of a name (tag, constant, ...).
pub type NameHash = u64;

const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

#[inline]
fn state() -> ahash::RandomState {
    ahash::RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3])
}

/// Hash a string name.
pub fn hash_str(name: &str) -> NameHash {
    state().hash_one(name.as_bytes())
}

/// Hash raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    state().hash_one(bytes)
}

/// Hash a sequence of already hashed names, order sensitive.
pub fn hash_names(names: &[NameHash]) -> u64 {
    hash_bytes(bytemuck::cast_slice(names))
}
