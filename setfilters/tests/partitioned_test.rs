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

use setfilters::bloom::PartitionedBloomFilter;
use setfilters::error::ErrorKind;

#[test]
fn test_hash_count_follows_error_rate() {
    // k = ⌈log2(1/p)⌉
    assert_eq!(
        PartitionedBloomFilter::create(100, 0.01, 0.5)
            .unwrap()
            .nb_hashes(),
        7
    );
    assert_eq!(
        PartitionedBloomFilter::create(100, 0.001, 0.5)
            .unwrap()
            .nb_hashes(),
        10
    );
}

#[test]
fn test_no_false_negatives() {
    let mut filter = PartitionedBloomFilter::create(100, 0.01, 0.5).unwrap();
    for i in 0..100 {
        filter.add(&format!("element-{i}"));
    }
    for i in 0..100 {
        assert!(filter.has(&format!("element-{i}")));
    }
}

#[test]
fn test_empty_filter_has_nothing() {
    let filter = PartitionedBloomFilter::create(100, 0.01, 0.5).unwrap();
    assert!(filter.is_empty());
    assert!(!filter.has("anything"));
    assert_eq!(filter.current_load(), 0.0);
}

#[test]
fn test_load_reflects_fill() {
    let mut filter = PartitionedBloomFilter::create(100, 0.01, 0.5).unwrap();
    filter.add("one");
    let after_one = filter.current_load();
    // one insert sets at most one bit per partition
    assert!(after_one > 0.0);
    assert!(after_one <= 1.0 / filter.size() as f64 + f64::EPSILON);

    for i in 0..100 {
        filter.add(i);
    }
    let after_many = filter.current_load();
    assert!(after_many > after_one);
    assert!(after_many < 1.0);
    assert_eq!(filter.rate(), after_many.powi(filter.nb_hashes() as i32));
}

#[test]
fn test_capacity_and_load_factor_are_stored() {
    let filter = PartitionedBloomFilter::create(250, 0.01, 0.4).unwrap();
    assert_eq!(filter.capacity(), 250);
    assert_eq!(filter.load_factor(), 0.4);
}

#[test]
fn test_invalid_arguments() {
    for result in [
        PartitionedBloomFilter::create(0, 0.01, 0.5),
        PartitionedBloomFilter::create(100, 0.0, 0.5),
        PartitionedBloomFilter::create(100, 0.01, 0.0),
        PartitionedBloomFilter::create(100, 0.01, 1.0),
        PartitionedBloomFilter::with_size(0, 7, 0.5, 100),
    ] {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidArgument);
    }
}
