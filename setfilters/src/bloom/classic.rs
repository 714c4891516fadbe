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

use crate::common::BitVector;
use crate::error::Error;
use crate::hash::EncodeFn;
use crate::hash::Hashing;
use crate::hash::Key;
use crate::hash::DEFAULT_SEED;

/// A classic Bloom filter: one bit array, `k` hash functions.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted items always return `true`)
/// - Tunable false positive rate
/// - Constant space usage
///
/// # Examples
///
/// ```
/// use setfilters::bloom::BloomFilter;
///
/// let mut filter = BloomFilter::create(100, 0.01).unwrap();
/// filter.add("apple");
///
/// assert!(filter.has("apple")); // true - was inserted
/// assert!(!filter.has("grape")); // false - never inserted (probably)
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter {
    /// Hash seed shared by all probes
    pub(crate) seed: u64,
    /// Total number of bits (m)
    pub(crate) size: u64,
    /// Number of hash functions (k)
    pub(crate) nb_hashes: usize,
    /// The bit array
    pub(crate) filter: BitVector,
    /// Number of `add` calls, not distinct items
    pub(crate) length: u64,
    /// Index derivation service
    pub(crate) hashing: Hashing,
}

impl BloomFilter {
    /// Creates a filter sized for `nb_items` insertions at a target false
    /// positive rate.
    ///
    /// Chooses `m = ⌈−n·ln p / (ln 2)²⌉` bits and `k = ⌈(m/n)·ln 2⌉` hash
    /// functions.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `nb_items` is 0 or `error_rate` is not in
    /// `(0, 1)`.
    pub fn create(nb_items: u64, error_rate: f64) -> Result<Self, Error> {
        if nb_items == 0 {
            return Err(Error::invalid_argument("nb_items must be greater than 0"));
        }
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(
                Error::invalid_argument("error_rate must be in (0, 1)")
                    .with_context("error_rate", error_rate),
            );
        }

        let size = Self::suggest_size(nb_items, error_rate);
        let nb_hashes = Self::suggest_hashes(size, nb_items);
        Self::with_size(size, nb_hashes)
    }

    /// Creates a filter from explicit parameters.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `size` or `nb_hashes` is 0, or if `nb_hashes`
    /// exceeds `size` (more distinct indices than the array holds).
    pub fn with_size(size: u64, nb_hashes: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::invalid_argument("size must be greater than 0"));
        }
        if nb_hashes == 0 {
            return Err(Error::invalid_argument("nb_hashes must be greater than 0"));
        }
        if nb_hashes as u64 > size {
            return Err(Error::invalid_argument("nb_hashes must not exceed size")
                .with_context("nb_hashes", nb_hashes)
                .with_context("size", size));
        }

        Ok(BloomFilter {
            seed: DEFAULT_SEED,
            size,
            nb_hashes,
            filter: BitVector::new(size),
            length: 0,
            hashing: Hashing::new(),
        })
    }

    /// Suggests the number of bits for `nb_items` at `error_rate`.
    ///
    /// Formula: `m = ⌈−n · ln p / (ln 2)²⌉`.
    pub fn suggest_size(nb_items: u64, error_rate: f64) -> u64 {
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
        (-(nb_items as f64) * error_rate.ln() / ln2_squared).ceil() as u64
    }

    /// Suggests the number of hash functions for `size` bits and
    /// `nb_items` items.
    ///
    /// Formula: `k = ⌈(m/n) · ln 2⌉`.
    pub fn suggest_hashes(size: u64, nb_items: u64) -> usize {
        ((size as f64 / nb_items as f64) * std::f64::consts::LN_2).ceil() as usize
    }

    /// Inserts a key.
    ///
    /// After insertion, `has(key)` always returns `true` as long as the
    /// filter is not reseeded.
    pub fn add<'a>(&mut self, key: impl Into<Key<'a>>) {
        let key = key.into();
        let indexes = self
            .hashing
            .distinct_indexes(&key, self.size, self.nb_hashes, self.seed)
            .expect("nb_hashes <= size is enforced at construction");
        for index in indexes {
            self.filter.set(u64::from(index));
        }
        self.length += 1;
    }

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: key was **possibly** inserted (or false positive)
    /// - `false`: key was **definitely not** inserted
    pub fn has<'a>(&self, key: impl Into<Key<'a>>) -> bool {
        let key = key.into();
        let indexes = self
            .hashing
            .distinct_indexes(&key, self.size, self.nb_hashes, self.seed)
            .expect("nb_hashes <= size is enforced at construction");
        indexes.into_iter().all(|index| self.filter.get(u64::from(index)))
    }

    /// Current theoretical false positive rate,
    /// `(1 − e^(−k·length/m))^k`.
    pub fn rate(&self) -> f64 {
        let k = self.nb_hashes as f64;
        let exponent = -k * self.length as f64 / self.size as f64;
        (1.0 - exponent.exp()).powi(self.nb_hashes as i32)
    }

    /// Number of `add` calls so far (not distinct items).
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Total number of bits (m).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of hash functions (k).
    pub fn nb_hashes(&self) -> usize {
        self.nb_hashes
    }

    /// True when nothing was inserted.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the seed.
    ///
    /// Legal until the first insert. Reseeding a non-empty filter leaves the
    /// stored bits in place but makes every future probe use the new seed,
    /// so lookups on previously added keys become ill-defined. That is a
    /// misuse, not a supported operation.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Overrides the serialization strategy fed to the hash function.
    pub fn set_key_encoder(&mut self, encode: EncodeFn) {
        self.hashing.set_encoder(encode);
    }
}

/// Same `m`, `k`, seed, bit content and length. The serialization strategy
/// does not participate: two filters fed identical byte streams are equal
/// regardless of how those bytes were produced.
impl PartialEq for BloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.size == other.size
            && self.nb_hashes == other.nb_hashes
            && self.filter == other.filter
            && self.length == other.length
    }
}

impl Eq for BloomFilter {}
