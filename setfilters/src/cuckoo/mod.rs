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

//! Cuckoo filter: approximate set membership with deletion support.
//!
//! Elements are reduced to short fingerprints stored in a table of small
//! buckets. Every element has exactly two candidate buckets, and the second
//! is derivable from the first plus the fingerprint (partial-key cuckoo
//! hashing), so inserts can displace residents toward their alternate bucket
//! when both candidates are full. A bounded undo log makes a failed insert
//! restore the filter to its pre-call state.
//!
//! # References
//!
//! - Fan, Andersen, Kaminsky, Mitzenmacher (2014). "Cuckoo Filter:
//!   Practically Better Than Bloom"

mod bucket;
mod filter;

pub use self::bucket::Bucket;
pub use self::filter::CuckooFilter;
pub(crate) use self::filter::fingerprint_bits;
