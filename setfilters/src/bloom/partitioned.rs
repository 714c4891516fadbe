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

/// A partitioned Bloom filter: `k` disjoint sub-arrays, one bit per hash.
///
/// Each hash function owns its own partition, so a key sets exactly one bit
/// in each. Compared to the classic layout this trades a slightly higher
/// false positive rate for an even load across the array, which makes the
/// fill level a reliable growth signal (the scalable filter builds on this).
#[derive(Debug, Clone)]
pub struct PartitionedBloomFilter {
    /// Hash seed shared by all probes
    pub(crate) seed: u64,
    /// Bits per partition, the modulus of every probe
    pub(crate) size: u64,
    /// Number of partitions (k)
    pub(crate) nb_hashes: usize,
    /// Fill fraction this filter is sized to operate at
    pub(crate) load_factor: f64,
    /// Number of items the filter is sized for
    pub(crate) capacity: u64,
    /// One bit vector per partition, all of length `size`
    pub(crate) filter: Vec<BitVector>,
    /// Index derivation service
    pub(crate) hashing: Hashing,
}

impl PartitionedBloomFilter {
    /// Creates a filter sized for `nb_items` insertions at a target false
    /// positive rate, operating at the given load factor.
    ///
    /// Chooses `k = ⌈log2(1/p)⌉` partitions of
    /// `⌈n·|ln p| / (k·(ln 2)²)⌉ / load_factor` bits each, so that the
    /// filter reaches the target rate exactly when its fill fraction reaches
    /// `load_factor`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `nb_items` is 0, or `error_rate` or
    /// `load_factor` is not in `(0, 1)`.
    pub fn create(nb_items: u64, error_rate: f64, load_factor: f64) -> Result<Self, Error> {
        if nb_items == 0 {
            return Err(Error::invalid_argument("nb_items must be greater than 0"));
        }
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(
                Error::invalid_argument("error_rate must be in (0, 1)")
                    .with_context("error_rate", error_rate),
            );
        }
        if !(load_factor > 0.0 && load_factor < 1.0) {
            return Err(
                Error::invalid_argument("load_factor must be in (0, 1)")
                    .with_context("load_factor", load_factor),
            );
        }

        let nb_hashes = (1.0 / error_rate).log2().ceil() as usize;
        let ln2_squared = std::f64::consts::LN_2 * std::f64::consts::LN_2;
        let bits_per_partition =
            (nb_items as f64 * error_rate.ln().abs() / (nb_hashes as f64 * ln2_squared)).ceil();
        let size = (bits_per_partition / load_factor).ceil() as u64;

        Self::with_size(size, nb_hashes, load_factor, nb_items)
    }

    /// Creates a filter from explicit parameters.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `size`, `nb_hashes` or `capacity` is 0, or
    /// `load_factor` is not in `(0, 1)`.
    pub fn with_size(
        size: u64,
        nb_hashes: usize,
        load_factor: f64,
        capacity: u64,
    ) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::invalid_argument("size must be greater than 0"));
        }
        if nb_hashes == 0 {
            return Err(Error::invalid_argument("nb_hashes must be greater than 0"));
        }
        if capacity == 0 {
            return Err(Error::invalid_argument("capacity must be greater than 0"));
        }
        if !(load_factor > 0.0 && load_factor < 1.0) {
            return Err(
                Error::invalid_argument("load_factor must be in (0, 1)")
                    .with_context("load_factor", load_factor),
            );
        }

        Ok(PartitionedBloomFilter {
            seed: DEFAULT_SEED,
            size,
            nb_hashes,
            load_factor,
            capacity,
            filter: (0..nb_hashes).map(|_| BitVector::new(size)).collect(),
            hashing: Hashing::new(),
        })
    }

    /// Inserts a key: one bit in each partition.
    pub fn add<'a>(&mut self, key: impl Into<Key<'a>>) {
        let key = key.into();
        let bytes = self.hashing.serialize(&key);
        let (a, b) = self.hashing.hash_pair(&bytes, self.seed);
        for (i, partition) in self.filter.iter_mut().enumerate() {
            let index = self
                .hashing
                .double_hashing(i as u64, u64::from(a), u64::from(b), self.size);
            partition.set(index);
        }
    }

    /// Tests whether a key is possibly in the set: its bit must be set in
    /// every partition.
    pub fn has<'a>(&self, key: impl Into<Key<'a>>) -> bool {
        let key = key.into();
        let bytes = self.hashing.serialize(&key);
        let (a, b) = self.hashing.hash_pair(&bytes, self.seed);
        self.filter.iter().enumerate().all(|(i, partition)| {
            let index = self
                .hashing
                .double_hashing(i as u64, u64::from(a), u64::from(b), self.size);
            partition.get(index)
        })
    }

    /// Fraction of set bits, averaged across partitions.
    pub fn current_load(&self) -> f64 {
        let filled: f64 = self
            .filter
            .iter()
            .map(|partition| partition.count_ones() as f64 / self.size as f64)
            .sum();
        filled / self.nb_hashes as f64
    }

    /// Current false positive estimate, `load^k`.
    ///
    /// A lookup is a false positive when its bit happens to be set in every
    /// partition, which for an even load is `load` per partition.
    pub fn rate(&self) -> f64 {
        self.current_load().powi(self.nb_hashes as i32)
    }

    /// True when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.filter.iter().all(|partition| partition.count_ones() == 0)
    }

    /// Bits per partition.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of partitions (k).
    pub fn nb_hashes(&self) -> usize {
        self.nb_hashes
    }

    /// Number of items the filter is sized for.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Fill fraction this filter is sized to operate at.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// The hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the seed. Reseeding a non-empty filter makes lookups on
    /// previously added keys ill-defined; see
    /// [`BloomFilter::set_seed`](crate::bloom::BloomFilter::set_seed).
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// Overrides the serialization strategy fed to the hash function.
    pub fn set_key_encoder(&mut self, encode: EncodeFn) {
        self.hashing.set_encoder(encode);
    }
}

/// Same sizing, seed, load factor, capacity and partition content.
impl PartialEq for PartitionedBloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.size == other.size
            && self.nb_hashes == other.nb_hashes
            && self.load_factor == other.load_factor
            && self.capacity == other.capacity
            && self.filter == other.filter
    }
}
