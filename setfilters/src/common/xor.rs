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

/// Right-aligned XOR of two byte strings, treating each as a big-endian
/// unsigned number.
///
/// The result is `max(a.len(), b.len())` bytes, the shorter input padded
/// with leading zeros; an all-zero result collapses to the empty vector, so
/// `xor_bytes(a, a)` is always empty.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());
    let mut out = vec![0u8; len];
    for i in 0..len {
        let av = if i < a.len() { a[a.len() - 1 - i] } else { 0 };
        let bv = if i < b.len() { b[b.len() - 1 - i] } else { 0 };
        out[len - 1 - i] = av ^ bv;
    }
    if out.iter().all(|&byte| byte == 0) {
        out.clear();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::xor_bytes;

    #[test]
    fn test_right_alignment() {
        let a = [0u8; 10];
        let b = [1u8];
        assert_eq!(xor_bytes(&a, &b), vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(xor_bytes(&b, &a), vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_involution() {
        let a = b"\x12\x34\x56\x78\x9a".to_vec();
        let b = b"\x0f\xf0".to_vec();
        let once = xor_bytes(&a, &b);
        assert_eq!(xor_bytes(&once, &b), a);
    }

    #[test]
    fn test_self_cancels_to_empty() {
        let a = b"\xde\xad\xbe\xef".to_vec();
        assert!(xor_bytes(&a, &a).is_empty());
        assert!(xor_bytes(&[], &[]).is_empty());
    }
}
