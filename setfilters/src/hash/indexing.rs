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

use std::collections::HashSet;

use crate::error::Error;
use crate::hash::xxh64;

/// A value that can be inserted into a filter.
///
/// Filters hash the *byte encoding* of a key, never the key itself, so that
/// two implementations sharing the same seed agree on every index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    /// A string key, encoded as its UTF-8 bytes.
    Str(&'a str),
    /// An integer key, encoded as its decimal ASCII form.
    Int(i64),
    /// A raw byte key, encoded verbatim.
    Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(value: &'a str) -> Self {
        Key::Str(value)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(value: &'a String) -> Self {
        Key::Str(value)
    }
}

impl From<i64> for Key<'_> {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<i32> for Key<'_> {
    fn from(value: i32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl From<u32> for Key<'_> {
    fn from(value: u32) -> Self {
        Key::Int(i64::from(value))
    }
}

impl<'a> From<&'a [u8]> for Key<'a> {
    fn from(value: &'a [u8]) -> Self {
        Key::Bytes(value)
    }
}

/// Serialization strategy turning a [`Key`] into the bytes that get hashed.
///
/// The strategy is a plain function pointer so a filter stays `Copy`-able and
/// comparable; tests swap it out to force collisions on purpose.
pub type EncodeFn = fn(&Key<'_>) -> Vec<u8>;

/// The default strategy: UTF-8 for strings, decimal ASCII for integers,
/// verbatim bytes for byte slices.
pub fn default_encode(key: &Key<'_>) -> Vec<u8> {
    match key {
        Key::Str(s) => s.as_bytes().to_vec(),
        Key::Int(i) => i.to_string().into_bytes(),
        Key::Bytes(b) => b.to_vec(),
    }
}

/// The hashing service shared by every filter.
///
/// Stateless apart from its serialization strategy: given a key, a seed and a
/// table size it derives one 64-bit hash and stretches it into as many
/// indices as the caller asks for, using double hashing with a cubic
/// correction term:
///
/// ```text
/// index_i = (a + i·b + (i³ − i) / 6) mod size
/// ```
///
/// where `a` and `b` are the low and high 32 bits of the 64-bit hash. All
/// arithmetic is wrapping unsigned 64-bit.
#[derive(Debug, Clone, Copy)]
pub struct Hashing {
    encode: EncodeFn,
}

impl Default for Hashing {
    fn default() -> Self {
        Hashing {
            encode: default_encode,
        }
    }
}

impl Hashing {
    /// Creates the service with the default serialization strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the service with a custom serialization strategy.
    pub fn with_encoder(encode: EncodeFn) -> Self {
        Hashing { encode }
    }

    /// Replaces the serialization strategy in place.
    pub fn set_encoder(&mut self, encode: EncodeFn) {
        self.encode = encode;
    }

    /// Applies the serialization strategy to a key.
    pub fn serialize(&self, key: &Key<'_>) -> Vec<u8> {
        (self.encode)(key)
    }

    /// Hashes already-serialized bytes and splits the result into the two
    /// 32-bit base hashes `(low, high)` used for double hashing.
    pub fn hash_pair(&self, bytes: &[u8], seed: u64) -> (u32, u32) {
        let h = xxh64(bytes, seed);
        (h as u32, (h >> 32) as u32)
    }

    /// The i-th double-hashing probe: `(a + i·b + (i³ − i)/6) mod size`.
    ///
    /// The cubic term enlarges the effective hash family beyond pure double
    /// hashing. Division is integer division; everything wraps at 64 bits.
    pub fn double_hashing(&self, i: u64, a: u64, b: u64, size: u64) -> u64 {
        let cubic = i.wrapping_mul(i).wrapping_mul(i).wrapping_sub(i) / 6;
        a.wrapping_add(i.wrapping_mul(b)).wrapping_add(cubic) % size
    }

    /// Produces `count` pairwise-distinct indices in `[0, size)` for a key.
    ///
    /// Deterministic for a given `(key, size, count, seed)` on every
    /// platform. The probe sequence re-derives its base hashes at each step
    /// (seed offset by `i mod size`), so a run of duplicates cannot stall it
    /// and any `count <= size` terminates.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `count > size` or `size` is zero.
    pub fn distinct_indexes(
        &self,
        key: &Key<'_>,
        size: u64,
        count: usize,
        seed: u64,
    ) -> Result<Vec<u32>, Error> {
        if size == 0 {
            return Err(Error::invalid_argument("size must be greater than 0"));
        }
        if count as u64 > size {
            return Err(Error::invalid_argument(
                "cannot produce more distinct indices than the table holds",
            )
            .with_context("count", count)
            .with_context("size", size));
        }

        let bytes = self.serialize(key);
        let mut seen = HashSet::with_capacity(count);
        let mut indexes = Vec::with_capacity(count);
        let mut i: u64 = 1;
        while indexes.len() < count {
            let (a, b) = self.hash_pair(&bytes, seed.wrapping_add(i % size));
            let index = self.double_hashing(i, u64::from(a), u64::from(b), size) as u32;
            if seen.insert(index) {
                indexes.push(index);
            }
            i += 1;
        }
        Ok(indexes)
    }
}
