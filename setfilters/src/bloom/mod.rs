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

//! Bloom filters for probabilistic set membership testing.
//!
//! A Bloom filter answers "possibly in the set" or "definitely not in the
//! set": false positives are possible at a tunable rate, false negatives are
//! not. Three layouts are provided:
//!
//! - [`BloomFilter`]: the classic single bit array probed by `k` hash
//!   functions.
//! - [`PartitionedBloomFilter`]: `k` disjoint sub-arrays, one bit per hash.
//!   Slightly higher false positive rate for the same budget, but an even
//!   fill level that makes saturation measurable.
//! - [`ScalableBloomFilter`]: an append-only sequence of partitioned
//!   filters with geometrically tightening error rates, for workloads whose
//!   cardinality is unknown up front.
//!
//! # Usage
//!
//! ```rust
//! use setfilters::bloom::ScalableBloomFilter;
//!
//! let mut filter = ScalableBloomFilter::create(100, 0.01, 0.5).unwrap();
//! for i in 0..1000 {
//!     filter.add(i);
//! }
//! assert!(filter.has(42));
//! ```
//!
//! All three hash through the same substrate ([`crate::hash`]), so two
//! filters built with the same parameters and seed agree bit-for-bit on
//! every insert, on every platform.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with
//!   allowable errors"
//! - Almeida, Baquero, Preguiça, Hutchison (2007). "Scalable Bloom Filters"

mod classic;
mod partitioned;
mod scalable;

pub use self::classic::BloomFilter;
pub use self::partitioned::PartitionedBloomFilter;
pub use self::scalable::ScalableBloomFilter;
