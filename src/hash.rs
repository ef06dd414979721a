// MIT License
//
// Copyright (c) 2019 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! The DJB2 string hash and the glue between keys, hashers, and bucket
//! indices.

use std::hash::{BuildHasher, Hasher};

const DJB2_SEED: u64 = 5381;

/// Computes the DJB2 digest of `key`.
///
/// Every character is folded in as its Unicode scalar value with
/// `h = h * 33 + c`, using wrapping arithmetic over `u64`. For ASCII keys this
/// is the classic byte-wise DJB2.
pub fn djb2(key: &str) -> u64 {
    key.chars().fold(DJB2_SEED, |h, c| fold(h, c as u64))
}

fn fold(h: u64, unit: u64) -> u64 {
    h.wrapping_mul(33).wrapping_add(unit)
}

/// A [`Hasher`] implementing DJB2.
///
/// Bytes written with [`write`] are folded one at a time, while
/// [`write_u32`] folds the whole integer as a single unit. `HashTable` feeds
/// keys through `write_u32` one character at a time, so the result matches
/// [`djb2`].
///
/// [`Hasher`]: https://doc.rust-lang.org/std/hash/trait.Hasher.html
/// [`write`]: #method.write
/// [`write_u32`]: #method.write_u32
/// [`djb2`]: fn.djb2.html
#[derive(Clone, Copy, Debug)]
pub struct Djb2Hasher {
    state: u64,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { state: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        self.state = bytes
            .iter()
            .fold(self.state, |h, &b| fold(h, u64::from(b)));
    }

    fn write_u32(&mut self, unit: u32) {
        self.state = fold(self.state, u64::from(unit));
    }
}

/// Default hasher builder for `HashTable`.
///
/// Stateless, so two tables built with it always agree on every digest.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildDjb2;

impl BuildHasher for BuildDjb2 {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Djb2Hasher {
        Djb2Hasher::default()
    }
}

/// Hashes `key` with a hasher built by `build_hasher`.
///
/// Characters are written as `u32`s in order. With [`BuildDjb2`] this is
/// exactly [`djb2`].
///
/// [`BuildDjb2`]: struct.BuildDjb2.html
/// [`djb2`]: fn.djb2.html
pub fn digest_with<S: BuildHasher>(build_hasher: &S, key: &str) -> u64 {
    let mut hasher = build_hasher.build_hasher();

    for c in key.chars() {
        hasher.write_u32(c as u32);
    }

    hasher.finish()
}

/// Reduces `digest` to a bucket index in `0..capacity`.
///
/// `capacity` must be nonzero.
pub(crate) fn bucket_index(digest: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);

    (digest % capacity as u64) as usize
}
