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

use setfilters::bloom::BloomFilter;
use setfilters::error::ErrorKind;
use setfilters::hash::Key;

const LONG_KEY: &str = "da5e21f8a67c4163f1a53ef43515bd027967da305ecfc741b2c3f40f832b7f82";

#[test]
fn test_create_then_add_then_has() {
    let mut filter = BloomFilter::create(39, 0.01).unwrap();
    filter.add(LONG_KEY);
    assert!(filter.has(LONG_KEY));
}

#[test]
fn test_no_false_negatives() {
    let mut filter = BloomFilter::create(200, 0.01).unwrap();
    for i in 0..200 {
        filter.add(&format!("element-{i}"));
    }
    for i in 0..200 {
        assert!(filter.has(&format!("element-{i}")));
    }
    assert_eq!(filter.length(), 200);
}

#[test]
fn test_empty_filter_has_nothing() {
    let filter = BloomFilter::create(100, 0.01).unwrap();
    for i in 0..100 {
        assert!(!filter.has(&format!("never-{i}")));
    }
}

#[test]
fn test_rate_formula() {
    let mut filter = BloomFilter::create(100, 0.01).unwrap();
    for i in 0..10 {
        filter.add(i);
    }
    let k = filter.nb_hashes() as f64;
    let expected = (1.0 - (-k * 10.0 / filter.size() as f64).exp()).powi(filter.nb_hashes() as i32);
    assert_eq!(filter.rate(), expected);
    assert!(filter.rate() < 0.01);
}

#[test]
fn test_sizing_helpers() {
    assert_eq!(BloomFilter::suggest_size(1000, 0.01), 9586);
    assert_eq!(BloomFilter::suggest_hashes(9586, 1000), 7);
}

#[test]
fn test_invalid_arguments() {
    for result in [
        BloomFilter::create(0, 0.01),
        BloomFilter::create(100, 0.0),
        BloomFilter::create(100, 1.0),
        BloomFilter::with_size(0, 1),
        BloomFilter::with_size(10, 0),
    ] {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}

#[test]
fn test_equality_requires_same_seed() {
    let mut a = BloomFilter::create(100, 0.01).unwrap();
    let mut b = BloomFilter::create(100, 0.01).unwrap();
    b.set_seed(12345);
    a.add("x");
    b.add("x");
    assert_ne!(a, b);
}

#[test]
fn test_collision_encoder_equivalence() {
    fn constant(_: &Key<'_>) -> Vec<u8> {
        vec![1]
    }

    let mut a = BloomFilter::create(100, 0.01).unwrap();
    let mut b = BloomFilter::create(100, 0.01).unwrap();
    a.set_key_encoder(constant);
    b.set_key_encoder(constant);

    a.add("alpha");
    a.add("beta");
    b.add("gamma");
    b.add("delta");

    // every key collapses to the same bytes, so the filters are
    // indistinguishable after the same number of inserts
    assert_eq!(a, b);
    assert!(a.has("anything at all"));
}
