// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use num_traits::Float;

/// Scalar types usable by the solvers.
///
/// Narrows [`num_traits::Float`] to the types the solvers are actually run
/// with and adds a lossless construction path from the f64 values held in
/// solver parameters.
pub trait Scalar:
    Float + Send + Sync + std::fmt::Debug + std::fmt::Display + 'static
{
    /// Convert a configuration value (stored as f64) to this scalar type.
    fn from_f64(value: f64) -> Self;
}

impl Scalar for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Scalar for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Dense vector contract shared by all solvers.
///
/// All binary operations require both operands to have the same size;
/// a mismatch is a contract violation and fails fast rather than silently
/// truncating. The `convert_from`/`convert_to` pair is the lossless bridge
/// to callers that hold plain flat arrays instead of this abstraction.
pub trait LinearVector<T: Scalar>: Clone + Send + Sync {
    /// Allocate a vector of the given size, filled with zeros.
    fn with_size(size: usize) -> Self;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the vector has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the element at `index`.
    fn at(&self, index: usize) -> T;

    /// Set the element at `index`.
    fn set(&mut self, index: usize, value: T);

    /// Fill every element with `value`. The size is unchanged.
    fn clear(&mut self, value: T);

    /// Replace the contents of this vector with a copy of `other`,
    /// resizing if needed.
    fn copy_from(&mut self, other: &Self);

    /// Swap the contents of two vectors without copying elements.
    fn swap(&mut self, other: &mut Self);

    /// Dot product with another vector of the same size.
    fn dot(&self, other: &Self) -> T;

    /// Infinity norm: the maximum absolute element value.
    fn abs_max(&self) -> T;

    /// Scaled addition: `self += alpha * other`.
    fn add_scaled(&mut self, alpha: T, other: &Self);

    /// Replace the contents with a copy of a flat array.
    fn convert_from(&mut self, flat: &[T]);

    /// Write the contents into a flat array, resizing it to match.
    fn convert_to(&self, out: &mut Vec<T>);

    /// Contiguous read-only view of the elements.
    fn as_slice(&self) -> &[T];

    /// Contiguous mutable view of the elements.
    fn as_mut_slice(&mut self) -> &mut [T];
}

/// Heap-allocated dense vector, the default [`LinearVector`] implementation.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseVector<T> {
    values: Vec<T>,
}

impl<T: Scalar> DenseVector<T> {
    /// Create a vector directly from its element values.
    pub fn from_values(values: Vec<T>) -> Self {
        DenseVector { values }
    }

    /// Consume the vector and return the underlying storage.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

impl<T: Scalar> LinearVector<T> for DenseVector<T> {
    fn with_size(size: usize) -> Self {
        DenseVector {
            values: vec![T::zero(); size],
        }
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn at(&self, index: usize) -> T {
        self.values[index]
    }

    fn set(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    fn clear(&mut self, value: T) {
        for v in self.values.iter_mut() {
            *v = value;
        }
    }

    fn copy_from(&mut self, other: &Self) {
        self.values.clear();
        self.values.extend_from_slice(&other.values);
    }

    fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.values, &mut other.values);
    }

    fn dot(&self, other: &Self) -> T {
        assert_eq!(
            self.values.len(),
            other.values.len(),
            "dot: vector sizes differ"
        );
        let mut sum = T::zero();
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            sum = sum + *a * *b;
        }
        sum
    }

    fn abs_max(&self) -> T {
        let mut max = T::zero();
        for v in self.values.iter() {
            max = max.max(v.abs());
        }
        max
    }

    fn add_scaled(&mut self, alpha: T, other: &Self) {
        assert_eq!(
            self.values.len(),
            other.values.len(),
            "add_scaled: vector sizes differ"
        );
        for (a, b) in self.values.iter_mut().zip(other.values.iter()) {
            *a = *a + alpha * *b;
        }
    }

    fn convert_from(&mut self, flat: &[T]) {
        self.values.clear();
        self.values.extend_from_slice(flat);
    }

    fn convert_to(&self, out: &mut Vec<T>) {
        out.clear();
        out.extend_from_slice(&self.values);
    }

    fn as_slice(&self) -> &[T] {
        &self.values
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }
}
