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

//! The hashing substrate shared by every filter: the xxHash primitives and
//! the double-hashing index service built on top of them.

mod indexing;
mod xxhash;

pub use self::indexing::default_encode;
pub use self::indexing::EncodeFn;
pub use self::indexing::Hashing;
pub use self::indexing::Key;
pub use self::xxhash::xxh32;
pub use self::xxhash::xxh64;

/// The library-wide default seed, `0x1234567890`.
///
/// Every filter is created with this seed unless told otherwise. The value
/// itself is arbitrary, but it is part of the interchange contract: an
/// exported filter only answers queries correctly when re-imported by an
/// implementation hashing with the same seed, because the 1:1 relationship
/// between a key and its bit positions is a function of the seed. Once a
/// history of exported filters exists you are stuck with it.
pub const DEFAULT_SEED: u64 = 0x1234567890;
