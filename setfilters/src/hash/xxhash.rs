// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use byteorder::ByteOrder;
use byteorder::LE;

const PRIME64_1: u64 = 0x9e3779b185ebca87;
const PRIME64_2: u64 = 0xc2b2ae3d27d4eb4f;
const PRIME64_3: u64 = 0x165667b19e3779f9;
const PRIME64_4: u64 = 0x85ebca77c2b2ae63;
const PRIME64_5: u64 = 0x27d4eb2f165667c5;

const PRIME32_1: u32 = 0x9e3779b1;
const PRIME32_2: u32 = 0x85ebca77;
const PRIME32_3: u32 = 0xc2b2ae3d;
const PRIME32_4: u32 = 0x27d4eb2f;
const PRIME32_5: u32 = 0x165667b1;

/// One-shot xxHash64 of a byte sequence with a 64-bit seed.
///
/// Output is identical on every platform: lanes are read little-endian
/// regardless of host byte order. Empty input is legal.
pub fn xxh64(bytes: &[u8], seed: u64) -> u64 {
    let len = bytes.len() as u64;
    let mut input = bytes;

    let mut h = if input.len() >= 32 {
        let mut v1 = seed.wrapping_add(PRIME64_1).wrapping_add(PRIME64_2);
        let mut v2 = seed.wrapping_add(PRIME64_2);
        let mut v3 = seed;
        let mut v4 = seed.wrapping_sub(PRIME64_1);

        while input.len() >= 32 {
            v1 = round64(v1, LE::read_u64(&input[0..8]));
            v2 = round64(v2, LE::read_u64(&input[8..16]));
            v3 = round64(v3, LE::read_u64(&input[16..24]));
            v4 = round64(v4, LE::read_u64(&input[24..32]));
            input = &input[32..];
        }

        let mut h = v1
            .rotate_left(1)
            .wrapping_add(v2.rotate_left(7))
            .wrapping_add(v3.rotate_left(12))
            .wrapping_add(v4.rotate_left(18));
        h = merge_round64(h, v1);
        h = merge_round64(h, v2);
        h = merge_round64(h, v3);
        merge_round64(h, v4)
    } else {
        seed.wrapping_add(PRIME64_5)
    };

    h = h.wrapping_add(len);

    // tail
    while input.len() >= 8 {
        h ^= round64(0, LE::read_u64(&input[0..8]));
        h = h
            .rotate_left(27)
            .wrapping_mul(PRIME64_1)
            .wrapping_add(PRIME64_4);
        input = &input[8..];
    }
    if input.len() >= 4 {
        h ^= u64::from(LE::read_u32(&input[0..4])).wrapping_mul(PRIME64_1);
        h = h
            .rotate_left(23)
            .wrapping_mul(PRIME64_2)
            .wrapping_add(PRIME64_3);
        input = &input[4..];
    }
    for &byte in input {
        h ^= u64::from(byte).wrapping_mul(PRIME64_5);
        h = h.rotate_left(11).wrapping_mul(PRIME64_1);
    }

    avalanche64(h)
}

/// One-shot xxHash32 of a byte sequence.
///
/// The seed is the low 32 bits of the library-wide 64-bit seed.
pub fn xxh32(bytes: &[u8], seed: u64) -> u32 {
    let seed = seed as u32;
    let len = bytes.len() as u32;
    let mut input = bytes;

    let mut h = if input.len() >= 16 {
        let mut v1 = seed.wrapping_add(PRIME32_1).wrapping_add(PRIME32_2);
        let mut v2 = seed.wrapping_add(PRIME32_2);
        let mut v3 = seed;
        let mut v4 = seed.wrapping_sub(PRIME32_1);

        while input.len() >= 16 {
            v1 = round32(v1, LE::read_u32(&input[0..4]));
            v2 = round32(v2, LE::read_u32(&input[4..8]));
            v3 = round32(v3, LE::read_u32(&input[8..12]));
            v4 = round32(v4, LE::read_u32(&input[12..16]));
            input = &input[16..];
        }

        v1.rotate_left(1)
            .wrapping_add(v2.rotate_left(7))
            .wrapping_add(v3.rotate_left(12))
            .wrapping_add(v4.rotate_left(18))
    } else {
        seed.wrapping_add(PRIME32_5)
    };

    h = h.wrapping_add(len);

    // tail
    while input.len() >= 4 {
        h = h.wrapping_add(LE::read_u32(&input[0..4]).wrapping_mul(PRIME32_3));
        h = h.rotate_left(17).wrapping_mul(PRIME32_4);
        input = &input[4..];
    }
    for &byte in input {
        h = h.wrapping_add(u32::from(byte).wrapping_mul(PRIME32_5));
        h = h.rotate_left(11).wrapping_mul(PRIME32_1);
    }

    avalanche32(h)
}

#[inline]
fn round64(acc: u64, input: u64) -> u64 {
    acc.wrapping_add(input.wrapping_mul(PRIME64_2))
        .rotate_left(31)
        .wrapping_mul(PRIME64_1)
}

#[inline]
fn merge_round64(mut h: u64, v: u64) -> u64 {
    h ^= round64(0, v);
    h.wrapping_mul(PRIME64_1).wrapping_add(PRIME64_4)
}

/// Finalization mix: force all bits of a hash block to avalanche.
#[inline]
fn avalanche64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(PRIME64_2);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME64_3);
    h ^ (h >> 32)
}

#[inline]
fn round32(acc: u32, input: u32) -> u32 {
    acc.wrapping_add(input.wrapping_mul(PRIME32_2))
        .rotate_left(13)
        .wrapping_mul(PRIME32_1)
}

#[inline]
fn avalanche32(mut h: u32) -> u32 {
    h ^= h >> 15;
    h = h.wrapping_mul(PRIME32_2);
    h ^= h >> 13;
    h = h.wrapping_mul(PRIME32_3);
    h ^ (h >> 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xxh64_reference_vectors() {
        assert_eq!(xxh64(b"", 0), 0xef46db3751d8e999);
        assert_eq!(xxh64(b"a", 0), 0xd24ec4f1a98c6e5b);
        assert_eq!(xxh64(b"abc", 0), 0x44bc2cf5ad770999);

        // long enough to exercise the 32-byte lane loop
        let key = "The quick brown fox jumps over the lazy dog";
        assert_eq!(xxh64(key.as_bytes(), 0), 0x0b242d361fda71bc);

        // change one byte
        let key = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(xxh64(key.as_bytes(), 0), 0x44ad33705751ad73);
    }

    #[test]
    fn test_xxh32_reference_vectors() {
        assert_eq!(xxh32(b"", 0), 0x02cc5d05);
        assert_eq!(xxh32(b"abc", 0), 0x32d153ff);

        // 16-byte lane loop plus tail
        let key = "The quick brown fox jumps over the lazy dog";
        assert_eq!(xxh32(key.as_bytes(), 0), 0xe85ea4de);
    }

    #[test]
    fn test_seed_changes_output() {
        assert_ne!(xxh64(b"abc", 0), xxh64(b"abc", 1));
        assert_ne!(xxh32(b"abc", 0), xxh32(b"abc", 1));
    }

    #[test]
    fn test_seed_uses_low_32_bits_for_xxh32() {
        // the high half of a 64-bit seed does not reach xxh32
        assert_eq!(xxh32(b"abc", 0x1_0000_0007), xxh32(b"abc", 0x7));
    }

    #[test]
    fn test_alignment_boundaries() {
        // cover the 8-byte, 4-byte and 1-byte tail paths
        for len in 0..=40usize {
            let bytes = vec![0xabu8; len];
            let h = xxh64(&bytes, 42);
            assert_eq!(h, xxh64(&bytes, 42));
        }
    }
}
