//! MurmurHash3 x64_128 implementation.
//!
//! Original algorithm by Austin Appleby. All rights to the original belong to the author.
//! Besides the one-shot [`hash128`], this crate provides [`MurmurHash`], an
//! order-sensitive accumulator used for cache-invalidation digests: every
//! [`MurmurHash::append`] re-seeds the hash with the running state.

use std::fmt;

const C1: u64 = 0x87c37b91114253d5;
const C2: u64 = 0x4cf5ad432745937f;

/// Compute MurmurHash3 x64_128 hash with a zero seed.
///
/// `pod_size` controls byte swapping on big-endian targets.
/// Returns 128-bit hash as (h1, h2).
#[inline]
pub fn hash128(data: &[u8], pod_size: Option<usize>) -> (u64, u64) {
    hash128_seeded(data, pod_size, 0, 0)
}

/// Compute MurmurHash3 x64_128 with explicit seeds for both lanes.
pub fn hash128_seeded(data: &[u8], pod_size: Option<usize>, seed1: u64, seed2: u64) -> (u64, u64) {
    let pod_size = pod_size.unwrap_or(1);
    let swapped;
    let data = if cfg!(target_endian = "big") && pod_size > 1 {
        swapped = data
            .chunks(pod_size)
            .flat_map(|chunk| chunk.iter().rev().copied())
            .collect::<Vec<u8>>();
        &swapped[..]
    } else {
        data
    };

    let len = data.len();
    let mut h1 = seed1;
    let mut h2 = seed2;

    let mut blocks = data.chunks_exact(16);
    for block in &mut blocks {
        let mut k1 = read_u64_le(&block[0..8]);
        let mut k2 = read_u64_le(&block[8..16]);

        k1 = mix_k1(k1);
        h1 ^= k1;
        h1 = h1.rotate_left(27).wrapping_add(h2);
        h1 = h1.wrapping_mul(5).wrapping_add(0x52dce729);

        k2 = mix_k2(k2);
        h2 ^= k2;
        h2 = h2.rotate_left(31).wrapping_add(h1);
        h2 = h2.wrapping_mul(5).wrapping_add(0x38495ab5);
    }

    // Tail: bytes 8.. feed k2, bytes 0..8 feed k1.
    let tail = blocks.remainder();
    if tail.len() > 8 {
        h2 ^= mix_k2(read_partial_le(&tail[8..]));
    }
    if !tail.is_empty() {
        h1 ^= mix_k1(read_partial_le(&tail[..tail.len().min(8)]));
    }

    h1 ^= len as u64;
    h2 ^= len as u64;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    (h1, h2)
}

#[inline]
fn read_u64_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

#[inline]
fn read_partial_le(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc ^ ((b as u64) << (8 * i)))
}

#[inline]
fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

#[inline]
fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

/// Final mix function for 64-bit values.
#[inline]
fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^= h >> 33;
    h
}

/// Compute hash and return as 16-byte array (little-endian).
#[inline]
pub fn hash128_bytes(data: &[u8], pod_size: Option<usize>) -> [u8; 16] {
    let (h1, h2) = hash128(data, pod_size);
    let mut result = [0u8; 16];
    result[0..8].copy_from_slice(&h1.to_le_bytes());
    result[8..16].copy_from_slice(&h2.to_le_bytes());
    result
}

/// Running 128-bit digest.
///
/// Appends are order sensitive: `a` then `b` differs from `b` then `a`, and
/// `"ab"` then `"c"` differs from `"a"` then `"bc"` because each append mixes
/// its own length into the state.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MurmurHash {
    h1: u64,
    h2: u64,
}

impl MurmurHash {
    /// A fresh digest (all zero state).
    pub const fn new() -> Self {
        Self { h1: 0, h2: 0 }
    }

    /// Build a digest from raw lanes.
    pub const fn from_parts(h1: u64, h2: u64) -> Self {
        Self { h1, h2 }
    }

    /// Raw lanes.
    pub const fn parts(&self) -> (u64, u64) {
        (self.h1, self.h2)
    }

    /// Append raw bytes.
    pub fn append_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.append_pod_bytes(data, 1)
    }

    /// Append bytes made of `pod_size`-wide elements (affects big-endian swapping only).
    pub fn append_pod_bytes(&mut self, data: &[u8], pod_size: usize) -> &mut Self {
        let (h1, h2) = hash128_seeded(data, Some(pod_size), self.h1, self.h2);
        self.h1 = h1;
        self.h2 = h2;
        self
    }

    /// Append any value implementing [`Append`].
    pub fn append<T: Append + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.append_to(self);
        self
    }

    /// Append another digest.
    pub fn append_hash(&mut self, other: &MurmurHash) -> &mut Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&other.h1.to_le_bytes());
        bytes[8..16].copy_from_slice(&other.h2.to_le_bytes());
        self.append_pod_bytes(&bytes, 8)
    }

    /// 32 hex characters.
    pub fn to_hex(&self) -> String {
        format!("{:016x}{:016x}", self.h1, self.h2)
    }
}

impl fmt::Debug for MurmurHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MurmurHash({})", self.to_hex())
    }
}

impl fmt::Display for MurmurHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Values that can be fed to a [`MurmurHash`].
pub trait Append {
    fn append_to(&self, h: &mut MurmurHash);
}

macro_rules! impl_append_le {
    ($($t:ty),*) => {
        $(
            impl Append for $t {
                #[inline]
                fn append_to(&self, h: &mut MurmurHash) {
                    h.append_pod_bytes(&self.to_le_bytes(), std::mem::size_of::<$t>());
                }
            }
        )*
    };
}

impl_append_le!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Append for bool {
    #[inline]
    fn append_to(&self, h: &mut MurmurHash) {
        h.append_bytes(&[*self as u8]);
    }
}

impl Append for str {
    #[inline]
    fn append_to(&self, h: &mut MurmurHash) {
        h.append_bytes(self.as_bytes());
    }
}

impl Append for String {
    #[inline]
    fn append_to(&self, h: &mut MurmurHash) {
        self.as_str().append_to(h);
    }
}

impl<T: Append> Append for [T] {
    fn append_to(&self, h: &mut MurmurHash) {
        (self.len() as u64).append_to(h);
        for item in self {
            item.append_to(h);
        }
    }
}

impl<T: Append> Append for Vec<T> {
    fn append_to(&self, h: &mut MurmurHash) {
        self.as_slice().append_to(h);
    }
}

impl<T: Append + ?Sized> Append for &T {
    fn append_to(&self, h: &mut MurmurHash) {
        (**self).append_to(h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_zero_with_zero_seed() {
        assert_eq!(hash128(&[], None), (0, 0));
    }

    #[test]
    fn test_tail_lengths_differ() {
        let data: Vec<u8> = (0..40).collect();
        let mut seen = std::collections::HashSet::new();
        for n in 0..data.len() {
            assert!(seen.insert(hash128(&data[..n], None)), "collision at length {}", n);
        }
    }

    #[test]
    fn test_bytes_roundtrip() {
        let (h1, h2) = hash128(b"test", None);
        let bytes = hash128_bytes(b"test", None);
        assert_eq!(u64::from_le_bytes(bytes[0..8].try_into().unwrap()), h1);
        assert_eq!(u64::from_le_bytes(bytes[8..16].try_into().unwrap()), h2);
    }

    #[test]
    fn test_accumulator_is_order_sensitive() {
        let mut a = MurmurHash::new();
        a.append("x").append(&1.0f64);
        let mut b = MurmurHash::new();
        b.append(&1.0f64).append("x");
        assert_ne!(a, b);

        let mut c = MurmurHash::new();
        c.append("ab").append("c");
        let mut d = MurmurHash::new();
        d.append("a").append("bc");
        assert_ne!(c, d);
    }

    #[test]
    fn test_accumulator_is_deterministic() {
        let build = || {
            let mut h = MurmurHash::new();
            h.append("/a/b").append("file.stage").append(&0.5f64);
            h
        };
        assert_eq!(build(), build());
        assert_eq!(build().to_hex().len(), 32);
    }

    #[test]
    fn test_slice_append_includes_length() {
        let mut a = MurmurHash::new();
        a.append(&["a".to_string(), "b".to_string()][..]);
        let mut b = MurmurHash::new();
        b.append("a").append("b");
        assert_ne!(a, b);
    }
}
