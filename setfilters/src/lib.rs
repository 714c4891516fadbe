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

//! # setfilters
//!
//! Space-efficient probabilistic set-membership filters with tunable false
//! positive rates: the classic, partitioned and scalable Bloom filters and a
//! cuckoo filter with deletion support, all built on one deterministic
//! hashing substrate.
//!
//! Filters hash the *byte encoding* of a key (strings as UTF-8, integers as
//! decimal ASCII) through seeded xxHash, so a filter exported on one machine
//! answers identically after import on any other.
//!
//! ```rust
//! use setfilters::bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::create(1000, 0.01).unwrap();
//! filter.add("alice");
//!
//! assert!(filter.has("alice"));
//!
//! let exported = filter.to_json();
//! let imported = BloomFilter::from_json(&exported).unwrap();
//! assert_eq!(imported, filter);
//! ```
//!
//! Mutation is single-threaded by design; sharing an immutable filter across
//! threads for lookups is safe.

#![deny(missing_docs)]

pub mod bloom;
pub mod common;
pub mod cuckoo;
pub mod error;
pub mod hash;
pub mod json;
pub mod random;
