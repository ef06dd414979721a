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

//! Load factor thresholds and scaling factors that decide when a
//! `HashTable` resizes.

use crate::error::{Error, Result};

use std::env;

use log::warn;

const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;
const DEFAULT_MIN_LOAD_FACTOR: f64 = 0.2;
const DEFAULT_GROWTH_FACTOR: f64 = 2.0;
const DEFAULT_SHRINK_FACTOR: f64 = 0.5;

/// When and by how much a `HashTable` resizes.
///
/// A table grows by `growth_factor` once an insertion pushes its load factor
/// above `max_load_factor`. It shrinks by `shrink_factor` once a removal drops
/// its load factor below `min_load_factor`, but only if it has grown at least
/// once before.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizePolicy {
    max_load_factor: f64,
    min_load_factor: f64,
    growth_factor: f64,
    shrink_factor: f64,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            min_load_factor: DEFAULT_MIN_LOAD_FACTOR,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
        }
    }
}

impl ResizePolicy {
    /// Creates a policy, checking that the thresholds and factors are usable.
    ///
    /// All values must be finite, `0 < min_load_factor < max_load_factor`,
    /// `growth_factor > 1`, and `0 < shrink_factor < 1`. A single resize must
    /// also land strictly between the two thresholds, so
    /// `min_load_factor < max_load_factor * shrink_factor` and
    /// `max_load_factor / growth_factor > min_load_factor`.
    pub fn new(
        max_load_factor: f64,
        min_load_factor: f64,
        growth_factor: f64,
        shrink_factor: f64,
    ) -> Result<Self> {
        let values = [max_load_factor, min_load_factor, growth_factor, shrink_factor];

        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidPolicy(format!(
                "non-finite value in {:?}",
                values
            )));
        }

        if min_load_factor <= 0.0 || min_load_factor >= max_load_factor {
            return Err(Error::InvalidPolicy(format!(
                "need 0 < min_load_factor < max_load_factor, got {} and {}",
                min_load_factor, max_load_factor
            )));
        }

        if growth_factor <= 1.0 {
            return Err(Error::InvalidPolicy(format!(
                "growth_factor must exceed 1, got {}",
                growth_factor
            )));
        }

        if shrink_factor <= 0.0 || shrink_factor >= 1.0 {
            return Err(Error::InvalidPolicy(format!(
                "shrink_factor must lie in (0, 1), got {}",
                shrink_factor
            )));
        }

        if min_load_factor >= max_load_factor * shrink_factor
            || max_load_factor / growth_factor <= min_load_factor
        {
            return Err(Error::InvalidPolicy(format!(
                "a resize would cross the other threshold with max_load_factor {}, \
                 min_load_factor {}, growth_factor {}, shrink_factor {}",
                max_load_factor, min_load_factor, growth_factor, shrink_factor
            )));
        }

        Ok(Self {
            max_load_factor,
            min_load_factor,
            growth_factor,
            shrink_factor,
        })
    }

    /// Reads the load factor thresholds from the `MAX_LOAD_FACTOR` and
    /// `MIN_LOAD_FACTOR` environment variables.
    ///
    /// Missing or unparseable variables fall back to their defaults. If the
    /// resulting pair is inconsistent, the default policy is returned.
    pub fn from_env() -> Self {
        let max_load_factor = env_f64("MAX_LOAD_FACTOR").unwrap_or(DEFAULT_MAX_LOAD_FACTOR);
        let min_load_factor = env_f64("MIN_LOAD_FACTOR").unwrap_or(DEFAULT_MIN_LOAD_FACTOR);

        match Self::new(
            max_load_factor,
            min_load_factor,
            DEFAULT_GROWTH_FACTOR,
            DEFAULT_SHRINK_FACTOR,
        ) {
            Ok(policy) => policy,
            Err(e) => {
                warn!("ignoring load factors from environment: {}", e);

                Self::default()
            }
        }
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn min_load_factor(&self) -> f64 {
        self.min_load_factor
    }

    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    pub fn shrink_factor(&self) -> f64 {
        self.shrink_factor
    }

    pub(crate) fn should_grow(&self, len: usize, capacity: usize) -> bool {
        load_factor(len, capacity) > self.max_load_factor
    }

    pub(crate) fn should_shrink(&self, len: usize, capacity: usize, ever_grown: bool) -> bool {
        ever_grown && load_factor(len, capacity) < self.min_load_factor
    }
}

pub(crate) fn load_factor(len: usize, capacity: usize) -> f64 {
    len as f64 / capacity as f64
}

/// `floor(capacity * factor)`, but never less than one bucket.
///
/// Returns `None` if the result would exceed `max_capacity`.
pub(crate) fn scaled(capacity: usize, factor: f64, max_capacity: usize) -> Option<usize> {
    let scaled = (capacity as f64 * factor).floor();

    if !scaled.is_finite() || scaled >= max_capacity as f64 {
        return None;
    }

    Some((scaled as usize).max(1))
}

fn env_f64(name: &str) -> Option<f64> {
    env::var(name).ok().as_deref().and_then(|s| s.parse().ok())
}
