//! Sparse feature vectors and per-sentence accumulation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sparse vector keyed by feature index.
///
/// Only observed features have entries; the index domain is the full
/// `u64` range of the feature hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    entries: BTreeMap<u64, f64>,
}

impl SparseVector {
    /// Creates an empty sparse vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sparse vector from (index, value) pairs.
    ///
    /// Repeated indices keep the last value.
    pub fn from_entries<I: IntoIterator<Item = (u64, f64)>>(entries: I) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Returns the value at `index`, 0.0 if unset.
    #[inline]
    pub fn get(&self, index: u64) -> f64 {
        self.entries.get(&index).copied().unwrap_or(0.0)
    }

    /// Sets the value at `index`.
    #[inline]
    pub fn set(&mut self, index: u64, value: f64) {
        self.entries.insert(index, value);
    }

    /// Adds `value` to the entry at `index`.
    #[inline]
    pub fn add(&mut self, index: u64, value: f64) {
        *self.entries.entry(index).or_insert(0.0) += value;
    }

    /// Returns the number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no feature has been observed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over (index, value) pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.entries.iter().map(|(&i, &v)| (i, v))
    }

    /// Inner product with another sparse vector.
    pub fn inner(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };

        small
            .entries
            .iter()
            .filter_map(|(i, v)| large.entries.get(i).map(|w| v * w))
            .sum()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.inner(self).sqrt()
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for value in self.entries.values_mut() {
            *value *= factor;
        }
    }

    /// Returns this vector scaled to unit Euclidean norm.
    ///
    /// A vector with zero norm is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            self.scale(1.0 / norm);
        }
        self
    }
}

/// Accumulates feature counts for the sentence currently being built.
#[derive(Debug, Default)]
pub struct SparseAccumulator {
    current: SparseVector,
}

impl SparseAccumulator {
    /// Creates an accumulator holding an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `weight` to the feature at `index`.
    #[inline]
    pub fn observe(&mut self, index: u64, weight: f64) {
        self.current.add(index, weight);
    }

    /// Discards the current vector and starts a fresh one.
    pub fn reset(&mut self) {
        self.current = SparseVector::new();
    }

    /// Returns the current vector and resets the accumulator.
    pub fn take(&mut self) -> SparseVector {
        std::mem::take(&mut self.current)
    }

    /// Returns the vector accumulated so far.
    pub fn current(&self) -> &SparseVector {
        &self.current
    }

    /// Scales `vector` to unit norm, leaving a zero vector untouched.
    pub fn normalize(vector: SparseVector) -> SparseVector {
        vector.normalized()
    }
}
