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

//! Structural export and import of filters.
//!
//! Every filter serializes to a JSON-shaped record whose field names mirror
//! its data model, underscore prefixes preserved for on-disk compatibility
//! (`_seed`, `_size`, `_nbHashes`, ...). Two representations bridge host
//! numeric limits:
//!
//! - seeds are `{ "type": "BigInt", "value": "<decimal-string>" }`, because
//!   not every consumer has 64-bit integers;
//! - bit vectors are `{ "size": <bits>, "content": "<base64>" }`, byte `i`
//!   carrying bits `8i..8i+8` least-significant first.
//!
//! The [`serde::Serialize`] and [`serde::Deserialize`] impls live here, so
//! any serde format works; the `to_json` / `from_json` conveniences pin the
//! JSON shape and surface failures as [`ErrorKind::ImportError`].
//!
//! Round trip: `from_json(to_json(f))` compares equal to `f` for every
//! filter type.
//!
//! [`ErrorKind::ImportError`]: crate::error::ErrorKind::ImportError

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::bloom::BloomFilter;
use crate::bloom::PartitionedBloomFilter;
use crate::bloom::ScalableBloomFilter;
use crate::common::BitVector;
use crate::cuckoo::fingerprint_bits;
use crate::cuckoo::Bucket;
use crate::cuckoo::CuckooFilter;
use crate::error::Error;
use crate::hash::Hashing;
use crate::random::SeededRng;

/// `{ "type": "BigInt", "value": "<decimal>" }`: a seed that survives hosts
/// without 64-bit integers.
#[derive(Serialize, Deserialize)]
struct SeedRecord {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

impl SeedRecord {
    fn encode(seed: u64) -> Self {
        SeedRecord {
            kind: "BigInt".to_string(),
            value: seed.to_string(),
        }
    }

    fn decode(&self) -> Result<u64, Error> {
        if self.kind != "BigInt" {
            return Err(Error::import("seed record must have type BigInt")
                .with_context("type", &self.kind));
        }
        self.value.parse::<u64>().map_err(|_| {
            Error::import("seed is not a decimal unsigned 64-bit integer")
                .with_context("value", &self.value)
        })
    }
}

#[derive(Serialize, Deserialize)]
struct BitVectorRecord {
    size: u64,
    content: String,
}

impl BitVectorRecord {
    fn encode(bits: &BitVector) -> Self {
        BitVectorRecord {
            size: bits.len(),
            content: BASE64_STANDARD.encode(bits.to_bytes()),
        }
    }

    fn decode(&self) -> Result<BitVector, Error> {
        let bytes = BASE64_STANDARD
            .decode(&self.content)
            .map_err(|cause| {
                Error::import("bit vector content is not valid base64")
                    .with_context("cause", cause)
            })?;
        BitVector::from_bytes(self.size, &bytes)
    }
}

#[derive(Serialize, Deserialize)]
struct BloomFilterRecord {
    #[serde(rename = "_seed")]
    seed: SeedRecord,
    #[serde(rename = "_size")]
    size: u64,
    #[serde(rename = "_nbHashes")]
    nb_hashes: usize,
    #[serde(rename = "_filter")]
    filter: BitVectorRecord,
    #[serde(rename = "_length")]
    length: u64,
}

impl BloomFilterRecord {
    fn encode(filter: &BloomFilter) -> Self {
        BloomFilterRecord {
            seed: SeedRecord::encode(filter.seed),
            size: filter.size,
            nb_hashes: filter.nb_hashes,
            filter: BitVectorRecord::encode(&filter.filter),
            length: filter.length,
        }
    }

    fn decode(&self) -> Result<BloomFilter, Error> {
        let seed = self.seed.decode()?;
        if self.filter.size != self.size {
            return Err(Error::import("bit vector size disagrees with _size")
                .with_context("_size", self.size)
                .with_context("vector_size", self.filter.size));
        }
        let mut filter = BloomFilter::with_size(self.size, self.nb_hashes)
            .map_err(|cause| Error::import(cause.to_string()))?;
        filter.seed = seed;
        filter.filter = self.filter.decode()?;
        filter.length = self.length;
        Ok(filter)
    }
}

#[derive(Serialize, Deserialize)]
struct PartitionedBloomFilterRecord {
    #[serde(rename = "_seed")]
    seed: SeedRecord,
    #[serde(rename = "_size")]
    size: u64,
    #[serde(rename = "_nbHashes")]
    nb_hashes: usize,
    #[serde(rename = "_loadFactor")]
    load_factor: f64,
    #[serde(rename = "_filter")]
    filter: Vec<BitVectorRecord>,
    #[serde(rename = "_capacity")]
    capacity: u64,
}

impl PartitionedBloomFilterRecord {
    fn encode(filter: &PartitionedBloomFilter) -> Self {
        PartitionedBloomFilterRecord {
            seed: SeedRecord::encode(filter.seed),
            size: filter.size,
            nb_hashes: filter.nb_hashes,
            load_factor: filter.load_factor,
            filter: filter.filter.iter().map(BitVectorRecord::encode).collect(),
            capacity: filter.capacity,
        }
    }

    fn decode(&self) -> Result<PartitionedBloomFilter, Error> {
        let seed = self.seed.decode()?;
        if self.filter.len() != self.nb_hashes {
            return Err(Error::import("one bit vector per hash function expected")
                .with_context("_nbHashes", self.nb_hashes)
                .with_context("vectors", self.filter.len()));
        }
        let mut partitions = Vec::with_capacity(self.filter.len());
        for record in &self.filter {
            if record.size != self.size {
                return Err(Error::import("partition size disagrees with _size")
                    .with_context("_size", self.size)
                    .with_context("vector_size", record.size));
            }
            partitions.push(record.decode()?);
        }
        let mut filter = PartitionedBloomFilter::with_size(
            self.size,
            self.nb_hashes,
            self.load_factor,
            self.capacity,
        )
        .map_err(|cause| Error::import(cause.to_string()))?;
        filter.seed = seed;
        filter.filter = partitions;
        Ok(filter)
    }
}

#[derive(Serialize, Deserialize)]
struct ScalableBloomFilterRecord {
    #[serde(rename = "_seed")]
    seed: SeedRecord,
    #[serde(rename = "_initial_size")]
    initial_size: u64,
    #[serde(rename = "_error_rate")]
    error_rate: f64,
    #[serde(rename = "_ratio")]
    ratio: f64,
    #[serde(rename = "_filters")]
    filters: Vec<PartitionedBloomFilterRecord>,
}

impl ScalableBloomFilterRecord {
    fn encode(filter: &ScalableBloomFilter) -> Self {
        ScalableBloomFilterRecord {
            seed: SeedRecord::encode(filter.seed),
            initial_size: filter.initial_size,
            error_rate: filter.error_rate,
            ratio: filter.ratio,
            filters: filter
                .filters
                .iter()
                .map(PartitionedBloomFilterRecord::encode)
                .collect(),
        }
    }

    fn decode(&self) -> Result<ScalableBloomFilter, Error> {
        let seed = self.seed.decode()?;
        if self.initial_size == 0 {
            return Err(Error::import("_initial_size must be greater than 0"));
        }
        if !(self.error_rate > 0.0 && self.error_rate < 1.0) {
            return Err(Error::import("_error_rate must be in (0, 1)")
                .with_context("_error_rate", self.error_rate));
        }
        if !(self.ratio > 0.0 && self.ratio < 1.0) {
            return Err(
                Error::import("_ratio must be in (0, 1)").with_context("_ratio", self.ratio)
            );
        }
        if self.filters.is_empty() {
            return Err(Error::import("at least one inner filter expected"));
        }
        let filters = self
            .filters
            .iter()
            .map(PartitionedBloomFilterRecord::decode)
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(ScalableBloomFilter {
            seed,
            initial_size: self.initial_size,
            error_rate: self.error_rate,
            ratio: self.ratio,
            filters,
            hashing: Hashing::new(),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct BucketRecord {
    #[serde(rename = "_size")]
    size: usize,
    #[serde(rename = "_elements")]
    elements: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct CuckooFilterRecord {
    #[serde(rename = "_size")]
    size: u64,
    #[serde(rename = "_fingerprintLength")]
    fingerprint_length: usize,
    #[serde(rename = "_length")]
    length: u64,
    #[serde(rename = "_maxKicks")]
    max_kicks: usize,
    #[serde(rename = "_bucketSize")]
    bucket_size: usize,
    #[serde(rename = "_seed")]
    seed: SeedRecord,
    #[serde(rename = "_filter")]
    filter: Vec<BucketRecord>,
}

impl CuckooFilterRecord {
    fn encode(filter: &CuckooFilter) -> Self {
        CuckooFilterRecord {
            size: filter.size,
            fingerprint_length: filter.fingerprint_length,
            length: filter.length,
            max_kicks: filter.max_kicks,
            bucket_size: filter.bucket_size,
            seed: SeedRecord::encode(filter.seed),
            filter: filter
                .filter
                .iter()
                .map(|bucket| BucketRecord {
                    size: bucket.size(),
                    elements: bucket
                        .elements()
                        .iter()
                        .map(|&fp| {
                            fingerprint_bits(fp, filter.fingerprint_length)
                                .into_iter()
                                .map(char::from)
                                .collect()
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn decode(&self) -> Result<CuckooFilter, Error> {
        let seed = self.seed.decode()?;
        if !self.size.is_power_of_two() {
            return Err(Error::import("_size must be a power of two")
                .with_context("_size", self.size));
        }
        if self.bucket_size == 0 {
            return Err(Error::import("_bucketSize must be greater than 0"));
        }
        if self.fingerprint_length == 0 || self.fingerprint_length > 64 {
            return Err(Error::import("_fingerprintLength must be in 1..=64")
                .with_context("_fingerprintLength", self.fingerprint_length));
        }
        if self.filter.len() as u64 != self.size {
            return Err(Error::import("one bucket per table slot expected")
                .with_context("_size", self.size)
                .with_context("buckets", self.filter.len()));
        }

        let mut stored: u64 = 0;
        let mut buckets = Vec::with_capacity(self.filter.len());
        for record in &self.filter {
            if record.size != self.bucket_size {
                return Err(Error::import("bucket size disagrees with _bucketSize")
                    .with_context("_bucketSize", self.bucket_size)
                    .with_context("bucket_size", record.size));
            }
            if record.elements.len() > self.bucket_size {
                return Err(Error::import("bucket holds more elements than _bucketSize")
                    .with_context("elements", record.elements.len()));
            }
            let mut bucket = Bucket::new(self.bucket_size);
            for element in &record.elements {
                bucket.add(parse_fingerprint(element, self.fingerprint_length)?);
                stored += 1;
            }
            buckets.push(bucket);
        }
        if stored != self.length {
            return Err(Error::import("_length disagrees with stored fingerprints")
                .with_context("_length", self.length)
                .with_context("stored", stored));
        }

        Ok(CuckooFilter {
            seed,
            size: self.size,
            bucket_size: self.bucket_size,
            fingerprint_length: self.fingerprint_length,
            length: self.length,
            max_kicks: self.max_kicks,
            filter: buckets,
            rng: SeededRng::from_seed(seed),
            hashing: Hashing::new(),
        })
    }
}

/// Parses a canonical fingerprint bit string: exactly `length` characters,
/// all `'0'` or `'1'`, most-significant bit first.
fn parse_fingerprint(element: &str, length: usize) -> Result<u64, Error> {
    if element.len() != length || !element.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(
            Error::import("fingerprint is not a bit string of the declared width")
                .with_context("element", element)
                .with_context("_fingerprintLength", length),
        );
    }
    u64::from_str_radix(element, 2).map_err(|_| {
        Error::import("fingerprint does not fit in 64 bits").with_context("element", element)
    })
}

impl Serialize for BloomFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BloomFilterRecord::encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BloomFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = BloomFilterRecord::deserialize(deserializer)?;
        record.decode().map_err(de::Error::custom)
    }
}

impl Serialize for PartitionedBloomFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PartitionedBloomFilterRecord::encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PartitionedBloomFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = PartitionedBloomFilterRecord::deserialize(deserializer)?;
        record.decode().map_err(de::Error::custom)
    }
}

impl Serialize for ScalableBloomFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ScalableBloomFilterRecord::encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ScalableBloomFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = ScalableBloomFilterRecord::deserialize(deserializer)?;
        record.decode().map_err(de::Error::custom)
    }
}

impl Serialize for CuckooFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CuckooFilterRecord::encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CuckooFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = CuckooFilterRecord::deserialize(deserializer)?;
        record.decode().map_err(de::Error::custom)
    }
}

macro_rules! impl_json_convenience {
    ($($filter:ident),+) => {
        $(
            impl $filter {
                /// Exports this filter as its structural JSON record.
                pub fn to_json(&self) -> String {
                    serde_json::to_string(self).expect("filter records always encode to JSON")
                }

                /// Imports a filter from its structural JSON record.
                ///
                /// # Errors
                ///
                /// `ImportError` if the record is malformed or internally
                /// inconsistent.
                pub fn from_json(json: &str) -> Result<Self, Error> {
                    serde_json::from_str(json).map_err(|cause| Error::import(cause.to_string()))
                }
            }
        )+
    };
}

impl_json_convenience!(
    BloomFilter,
    PartitionedBloomFilter,
    ScalableBloomFilter,
    CuckooFilter
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_seed_record_round_trip() {
        let record = SeedRecord::encode(u64::MAX);
        assert_eq!(record.kind, "BigInt");
        assert_eq!(record.value, "18446744073709551615");
        assert_eq!(record.decode().unwrap(), u64::MAX);
    }

    #[test]
    fn test_seed_record_rejects_wrong_type() {
        let record = SeedRecord {
            kind: "Number".to_string(),
            value: "1".to_string(),
        };
        assert_eq!(record.decode().unwrap_err().kind(), ErrorKind::ImportError);
    }

    #[test]
    fn test_seed_record_rejects_non_decimal() {
        let record = SeedRecord {
            kind: "BigInt".to_string(),
            value: "0x10".to_string(),
        };
        assert_eq!(record.decode().unwrap_err().kind(), ErrorKind::ImportError);
    }

    #[test]
    fn test_parse_fingerprint_validation() {
        assert_eq!(parse_fingerprint("0101", 4).unwrap(), 5);
        assert!(parse_fingerprint("01", 4).is_err());
        assert!(parse_fingerprint("012 ", 4).is_err());
        assert!(parse_fingerprint("+101", 4).is_err());
    }
}
