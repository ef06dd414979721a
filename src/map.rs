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

//! A string-keyed hash table implemented with separate chaining.

mod bucket;


use bucket::{Bucket, Entry};

use crate::{
    error::{Error, Result},
    hash::{self, BuildDjb2},
    policy::{self, ResizePolicy},
};

use std::{
    fmt::{self, Debug, Formatter},
    hash::BuildHasher,
    mem,
};

use log::{debug, trace, warn};

/// Number of buckets allocated by [`HashTable::new`].
///
/// [`HashTable::new`]: struct.HashTable.html#method.new
pub const DEFAULT_CAPACITY: usize = 8;

/// A hash table mapping `String` keys to values of type `V`.
///
/// Each bucket owns a chain of entries whose keys reduce to that bucket's
/// index. Keys are hashed with [DJB2] by default; any other [`BuildHasher`]
/// can be chosen through [`with_capacity_and_hasher`] and
/// [`with_capacity_policy_and_hasher`].
///
/// The table doubles its bucket count whenever an insertion pushes the load
/// factor (`len / capacity`) above 0.7. Once it has grown at least once, it
/// also halves its bucket count whenever a removal drops the load factor below
/// 0.2. A table that has never grown never shrinks. These thresholds can be
/// changed with a [`ResizePolicy`].
///
/// `HashTable` performs no internal synchronization. To share one between
/// threads, wrap the whole table in a lock.
///
/// [DJB2]: ../hash/fn.djb2.html
/// [`BuildHasher`]: https://doc.rust-lang.org/std/hash/trait.BuildHasher.html
/// [`with_capacity_and_hasher`]: #method.with_capacity_and_hasher
/// [`with_capacity_policy_and_hasher`]: #method.with_capacity_policy_and_hasher
/// [`ResizePolicy`]: ../policy/struct.ResizePolicy.html
pub struct HashTable<V, S = BuildDjb2> {
    buckets: Box<[Bucket<V>]>,
    len: usize,
    ever_grown: bool,
    policy: ResizePolicy,
    build_hasher: S,
}

impl<V> HashTable<V, BuildDjb2> {
    /// Creates an empty `HashTable` with [`DEFAULT_CAPACITY`] buckets.
    ///
    /// [`DEFAULT_CAPACITY`]: constant.DEFAULT_CAPACITY.html
    pub fn new() -> Self {
        Self::empty(DEFAULT_CAPACITY, ResizePolicy::default(), BuildDjb2)
    }

    /// Creates an empty `HashTable` with `capacity` buckets.
    ///
    /// Returns [`Error::ZeroCapacity`] if `capacity` is 0, as a table without
    /// buckets has nowhere to put a key.
    ///
    /// [`Error::ZeroCapacity`]: ../error/enum.Error.html#variant.ZeroCapacity
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_policy_and_hasher(capacity, ResizePolicy::default(), BuildDjb2)
    }

    /// Creates an empty `HashTable` with `capacity` buckets that resizes
    /// according to `policy`.
    pub fn with_capacity_and_policy(capacity: usize, policy: ResizePolicy) -> Result<Self> {
        Self::with_capacity_policy_and_hasher(capacity, policy, BuildDjb2)
    }
}

impl<V, S> HashTable<V, S> {
    fn empty(capacity: usize, policy: ResizePolicy, build_hasher: S) -> Self {
        Self {
            buckets: new_buckets(capacity),
            len: 0,
            ever_grown: false,
            policy,
            build_hasher,
        }
    }

    /// Returns the number of key-value pairs in this table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this table contains no key-value pairs.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets in this table.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        policy::load_factor(self.len, self.capacity())
    }

    /// Returns true if this table has ever grown past its initial capacity.
    ///
    /// Only tables that have grown are allowed to shrink.
    pub fn has_grown(&self) -> bool {
        self.ever_grown
    }

    /// Returns the policy deciding when this table resizes.
    pub fn policy(&self) -> &ResizePolicy {
        &self.policy
    }

    /// Returns the hasher builder used to hash keys.
    pub fn hasher(&self) -> &S {
        &self.build_hasher
    }

    /// Iterates over every key-value pair, bucket by bucket.
    ///
    /// Pairs sharing a bucket are visited in the order they were appended to
    /// that bucket's chain. No other ordering is guaranteed, and the order
    /// changes whenever the table resizes.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|b| b.entries().iter())
            .map(|e| (e.key.as_str(), &e.value))
    }

    /// Removes every key-value pair, keeping the current capacity.
    pub fn clear(&mut self) {
        for bucket in self.buckets.iter_mut() {
            bucket.clear();
        }

        self.len = 0;
    }

    fn resize_by(&mut self, factor: f64) -> Result<()> {
        let old_capacity = self.capacity();
        let max_capacity = isize::MAX as usize / mem::size_of::<Bucket<V>>().max(1);
        let mut new_capacity = policy::scaled(old_capacity, factor, max_capacity)
            .ok_or(Error::CapacityOverflow(factor))?;

        if factor > 1.0 {
            new_capacity = new_capacity.max(old_capacity + 1);
        }

        if new_capacity == old_capacity {
            return Ok(());
        }

        debug!(
            "resizing hash table from {} to {} buckets ({} entries)",
            old_capacity, new_capacity, self.len
        );

        let old_buckets = mem::replace(&mut self.buckets, new_buckets(new_capacity));

        for bucket in old_buckets.into_vec() {
            for entry in bucket.into_entries() {
                push_entry(&mut self.buckets, entry);
            }
        }

        if factor > 1.0 {
            self.ever_grown = true;
        }

        Ok(())
    }
}

impl<V, S: BuildHasher> HashTable<V, S> {
    /// Creates an empty `HashTable` with `capacity` buckets that uses
    /// `build_hasher` to hash keys.
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: S) -> Result<Self> {
        Self::with_capacity_policy_and_hasher(capacity, ResizePolicy::default(), build_hasher)
    }

    /// Creates an empty `HashTable` with `capacity` buckets that resizes
    /// according to `policy` and uses `build_hasher` to hash keys.
    pub fn with_capacity_policy_and_hasher(
        capacity: usize,
        policy: ResizePolicy,
        build_hasher: S,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        Ok(Self::empty(capacity, policy, build_hasher))
    }

    /// Inserts a key-value pair, returning the value previously associated
    /// with `key`.
    ///
    /// If `key` is already present, its value is overwritten in place and the
    /// length is unchanged. Otherwise a new entry is appended to the tail of
    /// its bucket's chain, after which the table grows if its load factor
    /// exceeds the policy's maximum.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.into();
        let hash = hash::digest_with(&self.build_hasher, &key);
        let index = hash::bucket_index(hash, self.capacity());

        let value = match self.buckets[index].replace(&key, value) {
            Ok(previous) => return Some(previous),
            Err(value) => value,
        };

        trace!("appending key {:?} to bucket {}", key, index);

        push_entry(&mut self.buckets, Entry { key, hash, value });
        self.len += 1;

        if self.policy.should_grow(self.len, self.capacity()) {
            if let Err(e) = self.resize_by(self.policy.growth_factor()) {
                warn!("not growing hash table: {}", e);
            }
        }

        None
    }

    /// Removes `key` from the table, returning its value.
    ///
    /// If `key` is not present, a warning is logged, [`None`] is returned, and
    /// the table is left untouched. After a successful removal, a table that
    /// has grown before shrinks if its load factor falls below the policy's
    /// minimum.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.index_of(key);

        let entry = match self.buckets[index].remove(key) {
            Some(entry) => entry,
            None => {
                warn!("key not found: {:?}", key);

                return None;
            }
        };

        self.len -= 1;

        if self
            .policy
            .should_shrink(self.len, self.capacity(), self.ever_grown)
        {
            if let Err(e) = self.resize_by(self.policy.shrink_factor()) {
                warn!("not shrinking hash table: {}", e);
            }
        }

        Some(entry.value)
    }

    /// Returns a reference to the value associated with `key`, or [`None`] if
    /// there is none.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    pub fn retrieve(&self, key: &str) -> Option<&V> {
        self.buckets[self.index_of(key)].get(key)
    }

    /// Returns a mutable reference to the value associated with `key`.
    pub fn retrieve_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.index_of(key);

        self.buckets[index].get_mut(key)
    }

    /// Returns true if a value is associated with `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.retrieve(key).is_some()
    }

    /// Rebuilds the table with `floor(capacity * factor)` buckets and rehashes
    /// every entry into them.
    ///
    /// The new capacity is never less than one bucket, and a `factor` above 1
    /// always adds at least one bucket. Growing marks the table as having
    /// grown, which permits later shrinking. Returns
    /// [`Error::InvalidResizeFactor`] if `factor` is not finite and positive,
    /// and [`Error::CapacityOverflow`] if the new bucket array could not be
    /// allocated. The table is unchanged whenever an error is returned.
    ///
    /// [`Error::InvalidResizeFactor`]: ../error/enum.Error.html#variant.InvalidResizeFactor
    /// [`Error::CapacityOverflow`]: ../error/enum.Error.html#variant.CapacityOverflow
    pub fn resize(&mut self, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::InvalidResizeFactor(factor));
        }

        self.resize_by(factor)
    }

    fn index_of(&self, key: &str) -> usize {
        hash::bucket_index(
            hash::digest_with(&self.build_hasher, key),
            self.capacity(),
        )
    }
}

impl<V, S: Default> Default for HashTable<V, S> {
    fn default() -> Self {
        Self::empty(DEFAULT_CAPACITY, ResizePolicy::default(), S::default())
    }
}

impl<V: Debug, S> Debug for HashTable<V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn new_buckets<V>(capacity: usize) -> Box<[Bucket<V>]> {
    (0..capacity).map(|_| Bucket::default()).collect()
}

// Appends without looking for an existing key or checking the load factor.
// Rehashing relies on this never triggering another resize.
fn push_entry<V>(buckets: &mut [Bucket<V>], entry: Entry<V>) {
    let index = hash::bucket_index(entry.hash, buckets.len());

    buckets[index].push(entry);
}
