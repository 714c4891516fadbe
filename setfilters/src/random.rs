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

//! Deterministic pseudorandom numbers for the cuckoo eviction loop.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A deterministic uniform stream derived from a filter seed.
///
/// The generator is ChaCha with 8 rounds, which produces the same output on
/// every host and word size. Floats are uniform in `[0, 1)`; bounded
/// integers are derived from a float as `lo + floor(u · (hi − lo + 1))` so
/// that two implementations sharing a seed draw identical values.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: ChaCha8Rng,
}

impl SeededRng {
    /// Creates a generator positioned at the start of the stream for `seed`.
    pub fn from_seed(seed: u64) -> Self {
        SeededRng {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Next uniform float in `[0, 1)`.
    pub fn next_float(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Next uniform integer in the inclusive range `[lo, hi]`.
    pub fn next_int(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo <= hi);
        let u = self.next_float();
        lo + (u * ((hi - lo + 1) as f64)).floor() as u64
    }
}
