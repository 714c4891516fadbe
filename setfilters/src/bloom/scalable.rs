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

use crate::bloom::PartitionedBloomFilter;
use crate::error::Error;
use crate::hash::EncodeFn;
use crate::hash::Hashing;
use crate::hash::Key;
use crate::hash::DEFAULT_SEED;

/// Geometric growth base for successive inner filters (`s`).
const GROWTH_BASE: u32 = 2;

/// A scalable Bloom filter: a growing sequence of partitioned filters with
/// geometrically tightening error rates.
///
/// Inserts land in the newest inner filter; when that filter's fill fraction
/// passes its load factor, a larger one is appended. The `j`-th appended
/// filter is sized `initial_size · s^(j+1) · ln 2` and budgeted
/// `error_rate · ratio^j`, so the compound error over any number of
/// growths stays below `error_rate / (1 − ratio)`.
#[derive(Debug, Clone)]
pub struct ScalableBloomFilter {
    /// Hash seed, propagated to every inner filter
    pub(crate) seed: u64,
    /// Size the first inner filter was built for
    pub(crate) initial_size: u64,
    /// Error budget of the first inner filter
    pub(crate) error_rate: f64,
    /// Error tightening ratio, also the inner filters' load factor
    pub(crate) ratio: f64,
    /// Inner filters, oldest first; never empty
    pub(crate) filters: Vec<PartitionedBloomFilter>,
    /// Index derivation service handed to appended filters
    pub(crate) hashing: Hashing,
}

impl ScalableBloomFilter {
    /// Creates a filter with one inner partitioned filter built from
    /// `(initial_size, error_rate, ratio)`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `initial_size` is 0, or `error_rate` or `ratio`
    /// is not in `(0, 1)`.
    pub fn create(initial_size: u64, error_rate: f64, ratio: f64) -> Result<Self, Error> {
        let first = PartitionedBloomFilter::create(initial_size, error_rate, ratio)?;
        Ok(ScalableBloomFilter {
            seed: DEFAULT_SEED,
            initial_size,
            error_rate,
            ratio,
            filters: vec![first],
            hashing: Hashing::new(),
        })
    }

    /// Inserts a key, growing first if the newest inner filter is past its
    /// load factor.
    pub fn add<'a>(&mut self, key: impl Into<Key<'a>>) {
        let must_grow = {
            let last = self.filters.last().expect("at least one inner filter");
            last.current_load() > last.load_factor()
        };
        if must_grow {
            self.grow();
        }
        self.filters
            .last_mut()
            .expect("at least one inner filter")
            .add(key);
    }

    /// Tests whether a key is possibly in the set: any inner filter may
    /// hold it.
    pub fn has<'a>(&self, key: impl Into<Key<'a>>) -> bool {
        let key = key.into();
        self.filters.iter().any(|filter| filter.has(key))
    }

    /// Sum of the inner filters' capacities.
    pub fn capacity(&self) -> u64 {
        self.filters.iter().map(|filter| filter.capacity()).sum()
    }

    /// False positive estimate of the newest inner filter, the one
    /// currently absorbing inserts.
    pub fn rate(&self) -> f64 {
        self.filters
            .last()
            .expect("at least one inner filter")
            .rate()
    }

    /// The inner filters, oldest first.
    pub fn filters(&self) -> &[PartitionedBloomFilter] {
        &self.filters
    }

    /// True when no inner filter holds anything.
    pub fn is_empty(&self) -> bool {
        self.filters.iter().all(|filter| filter.is_empty())
    }

    /// Error tightening ratio.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// The hash seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the seed on this filter and every inner filter.
    ///
    /// Like the other filters, reseeding after the first insert leaves the
    /// stored bits ill-defined for future lookups.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
        for filter in &mut self.filters {
            filter.set_seed(seed);
        }
    }

    /// Overrides the serialization strategy on this filter and every inner
    /// filter, present and future.
    pub fn set_key_encoder(&mut self, encode: EncodeFn) {
        self.hashing.set_encoder(encode);
        for filter in &mut self.filters {
            filter.set_key_encoder(encode);
        }
    }

    /// Appends the next inner filter in the growth sequence.
    fn grow(&mut self) {
        let j = self.filters.len();
        let size = (self.initial_size as f64
            * f64::from(GROWTH_BASE).powi(j as i32 + 1)
            * std::f64::consts::LN_2)
            .ceil() as u64;
        let error = self.error_rate * self.ratio.powi(j as i32);
        let mut next = PartitionedBloomFilter::create(size, error, self.ratio)
            .expect("growth keeps size positive and rates within (0, 1)");
        next.set_seed(self.seed);
        next.hashing = self.hashing;
        self.filters.push(next);
    }
}

/// Same seed, ratio and pairwise-equal inner filters in order.
impl PartialEq for ScalableBloomFilter {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed && self.ratio == other.ratio && self.filters == other.filters
    }
}

#[cfg(test)]
mod tests {
    use super::ScalableBloomFilter;
    use crate::error::ErrorKind;

    #[test]
    fn test_starts_with_one_filter() {
        let filter = ScalableBloomFilter::create(8, 0.01, 0.5).unwrap();
        assert_eq!(filter.filters().len(), 1);
        assert_eq!(filter.capacity(), 8);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            ScalableBloomFilter::create(0, 0.01, 0.5).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            ScalableBloomFilter::create(8, 0.01, 1.0).unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_growth_appends_larger_filters() {
        let mut filter = ScalableBloomFilter::create(8, 0.01, 0.5).unwrap();
        for i in 0..200 {
            filter.add(i);
        }
        let count = filter.filters().len();
        assert!(count > 1, "200 inserts into capacity 8 must grow");
        // sizes are strictly increasing along the sequence
        let sizes: Vec<u64> = filter.filters().iter().map(|f| f.capacity()).collect();
        for pair in sizes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_seed_propagates() {
        let mut filter = ScalableBloomFilter::create(8, 0.01, 0.5).unwrap();
        for i in 0..100 {
            filter.add(i);
        }
        filter.set_seed(99);
        assert!(filter.filters().iter().all(|f| f.seed() == 99));
    }
}
