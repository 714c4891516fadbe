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

use serde_json::Value;
use setfilters::bloom::BloomFilter;
use setfilters::bloom::PartitionedBloomFilter;
use setfilters::bloom::ScalableBloomFilter;
use setfilters::cuckoo::CuckooFilter;
use setfilters::error::ErrorKind;

#[test]
fn test_bloom_round_trip() {
    let mut filter = BloomFilter::create(100, 0.01).unwrap();
    filter.set_seed(77);
    for i in 0..50 {
        filter.add(&format!("element-{i}"));
    }

    let restored = BloomFilter::from_json(&filter.to_json()).unwrap();
    assert_eq!(restored, filter);
    assert_eq!(restored.length(), 50);
    assert!(restored.has("element-0"));
}

#[test]
fn test_bloom_record_shape() {
    let mut filter = BloomFilter::create(100, 0.01).unwrap();
    filter.add("x");

    let value: Value = serde_json::from_str(&filter.to_json()).unwrap();
    assert!(value["_size"].is_u64());
    assert!(value["_nbHashes"].is_u64());
    assert!(value["_length"].is_u64());
    assert_eq!(value["_seed"]["type"], "BigInt");
    assert_eq!(value["_seed"]["value"], "78187493520");
    assert!(value["_filter"]["content"].is_string());
    assert_eq!(value["_filter"]["size"].as_u64(), Some(filter.size()));
}

#[test]
fn test_partitioned_round_trip() {
    let mut filter = PartitionedBloomFilter::create(200, 0.01, 0.5).unwrap();
    for i in 0..100 {
        filter.add(i);
    }

    let restored = PartitionedBloomFilter::from_json(&filter.to_json()).unwrap();
    assert_eq!(restored, filter);
    assert!(restored.has(42));
    assert_eq!(restored.current_load(), filter.current_load());
}

#[test]
fn test_scalable_round_trip_after_growth() {
    let mut filter = ScalableBloomFilter::create(8, 0.01, 0.5).unwrap();
    filter.set_seed(1234);
    for i in 0..300 {
        filter.add(i);
    }
    assert!(filter.filters().len() > 1);

    let restored = ScalableBloomFilter::from_json(&filter.to_json()).unwrap();
    assert_eq!(restored, filter);
    assert_eq!(restored.capacity(), filter.capacity());
    assert!(restored.has(255));
}

#[test]
fn test_scalable_record_shape() {
    let filter = ScalableBloomFilter::create(8, 0.01, 0.5).unwrap();
    let value: Value = serde_json::from_str(&filter.to_json()).unwrap();
    assert_eq!(value["_initial_size"].as_u64(), Some(8));
    assert_eq!(value["_error_rate"].as_f64(), Some(0.01));
    assert_eq!(value["_ratio"].as_f64(), Some(0.5));
    assert_eq!(value["_filters"].as_array().unwrap().len(), 1);
    assert!(value["_filters"][0]["_loadFactor"].is_f64());
}

#[test]
fn test_cuckoo_round_trip() {
    let mut filter = CuckooFilter::create(200, 0.01).unwrap();
    for i in 0..150 {
        assert!(filter.add(&format!("element-{i}")));
    }
    filter.remove("element-0");

    let restored = CuckooFilter::from_json(&filter.to_json()).unwrap();
    assert_eq!(restored, filter);
    assert!(restored.deep_equals(&filter));
    assert_eq!(restored.length(), 149);
    assert!(restored.has("element-1"));
}

#[test]
fn test_cuckoo_record_shape() {
    let mut filter = CuckooFilter::create(100, 0.01).unwrap();
    filter.add("x");

    let value: Value = serde_json::from_str(&filter.to_json()).unwrap();
    assert_eq!(value["_size"].as_u64(), Some(filter.size()));
    assert_eq!(
        value["_fingerprintLength"].as_u64(),
        Some(filter.fingerprint_length() as u64)
    );
    assert_eq!(value["_bucketSize"].as_u64(), Some(4));
    assert_eq!(value["_maxKicks"].as_u64(), Some(500));
    assert_eq!(value["_length"].as_u64(), Some(1));
    assert_eq!(value["_seed"]["type"], "BigInt");

    let buckets = value["_filter"].as_array().unwrap();
    assert_eq!(buckets.len(), filter.size() as usize);
    let stored: usize = buckets
        .iter()
        .map(|bucket| bucket["_elements"].as_array().unwrap().len())
        .sum();
    assert_eq!(stored, 1);

    // fingerprints are fixed-width bit strings
    let element = buckets
        .iter()
        .flat_map(|bucket| bucket["_elements"].as_array().unwrap())
        .next()
        .unwrap()
        .as_str()
        .unwrap();
    assert_eq!(element.len(), filter.fingerprint_length());
    assert!(element.chars().all(|c| c == '0' || c == '1'));
}

#[test]
fn test_import_rejects_garbage() {
    for json in ["", "42", "{}", r#"{"_seed": 1}"#] {
        let err = BloomFilter::from_json(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ImportError);
    }
}

#[test]
fn test_import_rejects_wrong_seed_record() {
    let filter = BloomFilter::create(100, 0.01).unwrap();
    let mut value: Value = serde_json::from_str(&filter.to_json()).unwrap();
    value["_seed"]["type"] = Value::String("Number".to_string());
    let err = BloomFilter::from_json(&value.to_string()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImportError);
}

#[test]
fn test_import_rejects_truncated_bit_vector() {
    let filter = BloomFilter::create(100, 0.01).unwrap();
    let mut value: Value = serde_json::from_str(&filter.to_json()).unwrap();
    value["_filter"]["content"] = Value::String(String::new());
    let err = BloomFilter::from_json(&value.to_string()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImportError);
}

#[test]
fn test_import_rejects_inconsistent_cuckoo_length() {
    let mut filter = CuckooFilter::create(100, 0.01).unwrap();
    filter.add("x");
    let mut value: Value = serde_json::from_str(&filter.to_json()).unwrap();
    value["_length"] = Value::from(7);
    let err = CuckooFilter::from_json(&value.to_string()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImportError);
}

#[test]
fn test_import_rejects_cross_type_records() {
    let bloom = BloomFilter::create(100, 0.01).unwrap();
    assert!(CuckooFilter::from_json(&bloom.to_json()).is_err());

    let cuckoo = CuckooFilter::create(100, 0.01).unwrap();
    assert!(ScalableBloomFilter::from_json(&cuckoo.to_json()).is_err());
}

#[test]
fn test_reseeded_filter_round_trips_seed() {
    let mut filter = CuckooFilter::create(100, 0.01).unwrap();
    filter.set_seed(31337);
    filter.add("y");

    let restored = CuckooFilter::from_json(&filter.to_json()).unwrap();
    assert_eq!(restored.seed(), 31337);
    assert!(restored.deep_equals(&filter));
}
