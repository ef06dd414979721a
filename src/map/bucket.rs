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

use std::mem;

use log::trace;

/// A key-value pair along with the digest of its key.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) hash: u64,
    pub(crate) value: V,
}

/// One slot of a `HashTable`: the chain of entries whose keys map here, in the
/// order they were appended.
#[derive(Debug)]
pub(crate) struct Bucket<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Default for Bucket<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Bucket<V> {
    pub(crate) fn entries(&self) -> &[Entry<V>] {
        &self.entries
    }

    pub(crate) fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    /// Overwrites the value of `key` in place if it is already in this chain.
    ///
    /// Otherwise hands `value` back so the caller can append it.
    pub(crate) fn replace(&mut self, key: &str, value: V) -> Result<V, V> {
        match self.get_mut(key) {
            Some(existing) => {
                trace!("overwriting value for key {:?}", key);

                Ok(mem::replace(existing, value))
            }
            None => Err(value),
        }
    }

    /// Appends `entry` to the tail of this chain without checking for an
    /// existing entry with the same key.
    pub(crate) fn push(&mut self, entry: Entry<V>) {
        self.entries.push(entry);
    }

    /// Unlinks the entry for `key`, keeping the rest of the chain in order.
    pub(crate) fn remove(&mut self, key: &str) -> Option<Entry<V>> {
        let position = self.entries.iter().position(|e| e.key == key)?;

        Some(self.entries.remove(position))
    }

    pub(crate) fn into_entries(self) -> Vec<Entry<V>> {
        self.entries
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
