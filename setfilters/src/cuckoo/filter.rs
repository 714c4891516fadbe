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

use crate::cuckoo::Bucket;
use crate::error::Error;
use crate::hash::xxh64;
use crate::hash::EncodeFn;
use crate::hash::Hashing;
use crate::hash::Key;
use crate::hash::DEFAULT_SEED;
use crate::random::SeededRng;

const DEFAULT_BUCKET_SIZE: usize = 4;
const DEFAULT_MAX_KICKS: usize = 500; // mentioned in the cuckoo filter paper
const TABLE_LOAD_TARGET: f64 = 0.955;
const MIN_SIZED_ITEMS: u64 = 32;

/// The two candidate buckets of an element and its fingerprint.
struct Locations {
    fingerprint: u64,
    first: u32,
    second: u32,
}

/// A cuckoo filter: buckets of fingerprints with partial-key cuckoo hashing.
///
/// Compared to a Bloom filter it supports deletion and keeps lookups to two
/// bucket probes. Each element is reduced to a short fingerprint stored in
/// one of two candidate buckets; the second candidate is derivable from the
/// first and the fingerprint alone, which is what lets an insert displace
/// ("kick") residents toward their alternate bucket without knowing the
/// original keys.
///
/// # Examples
///
/// ```
/// use setfilters::cuckoo::CuckooFilter;
///
/// let mut filter = CuckooFilter::create(500, 0.01).unwrap();
/// assert!(filter.add("alice"));
/// assert!(filter.has("alice"));
/// assert!(filter.remove("alice"));
/// assert!(!filter.has("alice"));
/// ```
#[derive(Debug, Clone)]
pub struct CuckooFilter {
    /// Hash seed for fingerprints, indices and the eviction RNG
    pub(crate) seed: u64,
    /// Number of buckets, always a power of two
    pub(crate) size: u64,
    /// Slots per bucket
    pub(crate) bucket_size: usize,
    /// Fingerprint width in bits
    pub(crate) fingerprint_length: usize,
    /// Number of stored fingerprints
    pub(crate) length: u64,
    /// Eviction budget per insert
    pub(crate) max_kicks: usize,
    /// The bucket table
    pub(crate) filter: Vec<Bucket>,
    /// Random bucket/slot choice during eviction
    pub(crate) rng: SeededRng,
    /// Index derivation service
    pub(crate) hashing: Hashing,
}

impl CuckooFilter {
    /// Creates a filter sized for `nb_items` elements at a target false
    /// positive rate, with 4-slot buckets and a 500-kick eviction budget.
    ///
    /// # Errors
    ///
    /// See [`with_params`](Self::with_params).
    pub fn create(nb_items: u64, error_rate: f64) -> Result<Self, Error> {
        Self::with_params(nb_items, error_rate, DEFAULT_BUCKET_SIZE, DEFAULT_MAX_KICKS)
    }

    /// Creates a filter with explicit bucket size and eviction budget.
    ///
    /// The fingerprint width is `⌈log2(1/p) + log2(2·bucket_size)⌉` bits;
    /// the table holds `⌈max(n, 32) / bucket_size / 0.955⌉` buckets rounded
    /// up to the next power of two, so index reduction is a mask.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `nb_items`, `bucket_size` or `max_kicks` is 0,
    /// `error_rate` is not in `(0, 1)`, or the required fingerprint is wider
    /// than the 64-bit hash it is cut from.
    pub fn with_params(
        nb_items: u64,
        error_rate: f64,
        bucket_size: usize,
        max_kicks: usize,
    ) -> Result<Self, Error> {
        if nb_items == 0 {
            return Err(Error::invalid_argument("nb_items must be greater than 0"));
        }
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(
                Error::invalid_argument("error_rate must be in (0, 1)")
                    .with_context("error_rate", error_rate),
            );
        }
        if bucket_size == 0 {
            return Err(Error::invalid_argument("bucket_size must be greater than 0"));
        }
        if max_kicks == 0 {
            return Err(Error::invalid_argument("max_kicks must be greater than 0"));
        }

        let fingerprint_length = ((1.0 / error_rate).log2()
            + (2.0 * bucket_size as f64).log2())
        .ceil() as usize;
        if fingerprint_length > 64 {
            return Err(Error::invalid_argument(
                "error_rate requires a fingerprint wider than the 64-bit hash",
            )
            .with_context("fingerprint_length", fingerprint_length));
        }

        let buckets = ((nb_items.max(MIN_SIZED_ITEMS) as f64)
            / bucket_size as f64
            / TABLE_LOAD_TARGET)
            .ceil() as u64;
        let size = buckets.next_power_of_two();
        if size > 1u64 << 32 {
            return Err(Error::invalid_argument("table exceeds the 32-bit index space")
                .with_context("size", size));
        }

        Ok(CuckooFilter {
            seed: DEFAULT_SEED,
            size,
            bucket_size,
            fingerprint_length,
            length: 0,
            max_kicks,
            filter: (0..size).map(|_| Bucket::new(bucket_size)).collect(),
            rng: SeededRng::from_seed(DEFAULT_SEED),
            hashing: Hashing::new(),
        })
    }

    /// Inserts a key. Returns whether the insert succeeded.
    ///
    /// When both candidate buckets are full, residents are kicked toward
    /// their alternate buckets, up to the eviction budget. A failed insert
    /// rolls every displaced fingerprint back, leaving the filter exactly as
    /// it was before the call.
    pub fn add<'a>(&mut self, key: impl Into<Key<'a>>) -> bool {
        let locations = self.locations(&key.into());
        self.insert_fingerprint(locations, true)
    }

    /// Like [`add`](Self::add), but a failed insert is a [`FilterFull`]
    /// error instead of `false`.
    ///
    /// [`FilterFull`]: crate::error::ErrorKind::FilterFull
    pub fn try_add<'a>(&mut self, key: impl Into<Key<'a>>) -> Result<(), Error> {
        if self.add(key) {
            Ok(())
        } else {
            Err(Error::filter_full("eviction budget exhausted")
                .with_context("max_kicks", self.max_kicks)
                .with_context("length", self.length))
        }
    }

    /// Like [`add`](Self::add), but skips the rollback when the eviction
    /// budget runs out: displaced fingerprints stay displaced and the final
    /// evictee is dropped. Faster, but a failure loses one stored element.
    pub fn add_lossy<'a>(&mut self, key: impl Into<Key<'a>>) -> bool {
        let locations = self.locations(&key.into());
        self.insert_fingerprint(locations, false)
    }

    /// Removes one occurrence of a key. Returns whether a matching
    /// fingerprint was found in either candidate bucket.
    pub fn remove<'a>(&mut self, key: impl Into<Key<'a>>) -> bool {
        let locations = self.locations(&key.into());
        if self.filter[locations.first as usize].remove(locations.fingerprint)
            || self.filter[locations.second as usize].remove(locations.fingerprint)
        {
            self.length -= 1;
            return true;
        }
        false
    }

    /// Tests whether a key is possibly in the set.
    pub fn has<'a>(&self, key: impl Into<Key<'a>>) -> bool {
        let locations = self.locations(&key.into());
        self.filter[locations.first as usize].contains(locations.fingerprint)
            || self.filter[locations.second as usize].contains(locations.fingerprint)
    }

    /// Upper bound on the false positive rate,
    /// `2^(log2(2·bucket_size) − load·c)` with `c = fingerprint_length/load`:
    /// the load cancels, leaving `2·bucket_size / 2^fingerprint_length`.
    pub fn rate(&self) -> f64 {
        let exponent = (2.0 * self.bucket_size as f64).log2() - self.fingerprint_length as f64;
        2f64.powf(exponent)
    }

    /// Number of stored fingerprints.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True when every slot of every bucket is occupied.
    pub fn full(&self) -> bool {
        self.filter.iter().all(|bucket| !bucket.is_free())
    }

    /// Number of buckets (a power of two).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Slots per bucket.
    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    /// Fingerprint width in bits.
    pub fn fingerprint_length(&self) -> usize {
        self.fingerprint_length
    }

    /// Eviction budget per insert.
    pub fn max_kicks(&self) -> usize {
        self.max_kicks
    }

    /// The hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the seed and restarts the eviction RNG from it.
    ///
    /// Stored fingerprints are not rehashed, so reseeding a non-empty
    /// filter makes lookups on previously added keys ill-defined. That is a
    /// misuse, not a supported operation.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SeededRng::from_seed(seed);
    }

    /// Overrides the serialization strategy fed to the hash function.
    pub fn set_key_encoder(&mut self, encode: EncodeFn) {
        self.hashing.set_encoder(encode);
    }

    /// Everything [`PartialEq`] ignores, compared too: seed, length and
    /// sizing on top of bucket contents.
    ///
    /// Two filters equal under `==` alone may still disagree on future
    /// inserts; this relation rules that out.
    pub fn deep_equals(&self, other: &CuckooFilter) -> bool {
        self == other
            && self.seed == other.seed
            && self.length == other.length
            && self.size == other.size
            && self.bucket_size == other.bucket_size
            && self.fingerprint_length == other.fingerprint_length
            && self.max_kicks == other.max_kicks
    }

    /// Derives the fingerprint and both candidate buckets of a key.
    ///
    /// The table size is a power of two, so reduction of the low 32 hash
    /// bits is a mask, and masking distributes over XOR; that keeps
    /// `second == first ^ (hash(fingerprint) mod size)` exact.
    fn locations(&self, key: &Key<'_>) -> Locations {
        let bytes = self.hashing.serialize(key);
        let hash = xxh64(&bytes, self.seed);
        let fingerprint = hash & fingerprint_mask(self.fingerprint_length);
        let mask = (self.size - 1) as u32;
        let first = (hash as u32) & mask;
        let second = first ^ (self.fingerprint_hash(fingerprint) & mask);
        Locations {
            fingerprint,
            first,
            second,
        }
    }

    /// Hash of a fingerprint's canonical bit-string form, used for the
    /// alternate-bucket derivation.
    fn fingerprint_hash(&self, fingerprint: u64) -> u32 {
        let bits = fingerprint_bits(fingerprint, self.fingerprint_length);
        xxh64(&bits, self.seed) as u32
    }

    /// The other candidate bucket of a fingerprint sitting in `index`.
    fn alt_index(&self, index: u32, fingerprint: u64) -> u32 {
        let mask = (self.size - 1) as u32;
        index ^ (self.fingerprint_hash(fingerprint) & mask)
    }

    /// The insertion state machine.
    ///
    /// Fast path: either candidate bucket has a free slot. Otherwise run up
    /// to `max_kicks` evictions, journaling every displaced slot so a failed
    /// insert can be undone in reverse when `rollback` is set.
    fn insert_fingerprint(&mut self, locations: Locations, rollback: bool) -> bool {
        if self.filter[locations.first as usize].add(locations.fingerprint) {
            self.length += 1;
            return true;
        }
        if self.filter[locations.second as usize].add(locations.fingerprint) {
            self.length += 1;
            return true;
        }

        let mut index = if self.rng.next_int(0, 1) == 0 {
            locations.first
        } else {
            locations.second
        };
        let mut fingerprint = locations.fingerprint;
        let mut journal: Vec<(u32, usize, u64)> = Vec::with_capacity(self.max_kicks);

        for _ in 0..self.max_kicks {
            // the bucket we kick from is always full here
            let occupancy = self.filter[index as usize].length() as u64;
            let slot = self.rng.next_int(0, occupancy - 1) as usize;
            let previous = self.filter[index as usize].swap(slot, fingerprint);
            journal.push((index, slot, previous));

            fingerprint = previous;
            index = self.alt_index(index, fingerprint);
            if self.filter[index as usize].add(fingerprint) {
                self.length += 1;
                return true;
            }
        }

        if rollback {
            while let Some((bucket, slot, previous)) = journal.pop() {
                self.filter[bucket as usize].swap(slot, previous);
            }
        }
        false
    }
}

/// Bucket-contents equality only, preserved from the reference relation:
/// seed, length and sizing are *not* compared. See
/// [`deep_equals`](CuckooFilter::deep_equals) for the stricter check.
impl PartialEq for CuckooFilter {
    fn eq(&self, other: &Self) -> bool {
        self.filter == other.filter
    }
}

/// Low `length` bits of a 64-bit hash.
fn fingerprint_mask(length: usize) -> u64 {
    if length >= 64 {
        u64::MAX
    } else {
        (1u64 << length) - 1
    }
}

/// Canonical bit-string form of a fingerprint: ASCII `'0'`/`'1'`,
/// most-significant bit first, exactly `length` characters. This is both
/// what gets hashed for the alternate-bucket derivation and what the export
/// format stores.
pub(crate) fn fingerprint_bits(fingerprint: u64, length: usize) -> Vec<u8> {
    (0..length)
        .rev()
        .map(|bit| {
            if fingerprint >> bit & 1 == 1 {
                b'1'
            } else {
                b'0'
            }
        })
        .collect()
}
