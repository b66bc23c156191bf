//! Input and output buffer adapters.
//!
//! The engine works on contiguous `f64` slices. These traits let callers hand
//! it slices, vectors, fixed-size arrays or `ndarray` arrays of any
//! dimensionality; anything that is not one-dimensional is reported through
//! the caller's error type instead of being flattened.

use std::borrow::Cow;

use ndarray::{ArrayBase, Data, DataMut, Dimension};

/// A read-only series the engine can search in or use as a query.
pub trait SeriesInput {
    /// The values of a one-dimensional input, in logical order.
    ///
    /// Returns `None` when the input is not one-dimensional. Contiguous inputs
    /// are borrowed; strided one-dimensional views are gathered into a copy.
    fn as_series(&self) -> Option<Cow<'_, [f64]>>;
}

impl SeriesInput for [f64] {
    fn as_series(&self) -> Option<Cow<'_, [f64]>> {
        Some(Cow::Borrowed(self))
    }
}

impl SeriesInput for Vec<f64> {
    fn as_series(&self) -> Option<Cow<'_, [f64]>> {
        Some(Cow::Borrowed(self.as_slice()))
    }
}

impl<const N: usize> SeriesInput for [f64; N] {
    fn as_series(&self) -> Option<Cow<'_, [f64]>> {
        Some(Cow::Borrowed(self.as_slice()))
    }
}

impl<S, D> SeriesInput for ArrayBase<S, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    fn as_series(&self) -> Option<Cow<'_, [f64]>> {
        if ArrayBase::ndim(self) != 1 {
            return None;
        }
        match self.as_slice() {
            Some(values) => Some(Cow::Borrowed(values)),
            None => Some(Cow::Owned(self.iter().copied().collect())),
        }
    }
}

/// A caller-owned output buffer that the engine validates and fills.
pub trait ProfileBuffer<T: Copy> {
    /// Whether the buffer is one-dimensional.
    fn is_one_dimensional(&self) -> bool;

    /// Total number of elements in the buffer.
    fn buffer_len(&self) -> usize;

    /// Run `f` over the buffer's elements as one mutable slice in logical order.
    ///
    /// Only called after the buffer passed shape validation.
    fn with_values_mut<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R;
}

impl<T: Copy> ProfileBuffer<T> for [T] {
    fn is_one_dimensional(&self) -> bool {
        true
    }

    fn buffer_len(&self) -> usize {
        self.len()
    }

    fn with_values_mut<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        f(self)
    }
}

impl<T: Copy> ProfileBuffer<T> for Vec<T> {
    fn is_one_dimensional(&self) -> bool {
        true
    }

    fn buffer_len(&self) -> usize {
        self.len()
    }

    fn with_values_mut<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        f(self.as_mut_slice())
    }
}

impl<T: Copy, const N: usize> ProfileBuffer<T> for [T; N] {
    fn is_one_dimensional(&self) -> bool {
        true
    }

    fn buffer_len(&self) -> usize {
        N
    }

    fn with_values_mut<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        f(self.as_mut_slice())
    }
}

impl<T, S, D> ProfileBuffer<T> for ArrayBase<S, D>
where
    T: Copy,
    S: DataMut<Elem = T>,
    D: Dimension,
{
    fn is_one_dimensional(&self) -> bool {
        ArrayBase::ndim(self) == 1
    }

    fn buffer_len(&self) -> usize {
        ArrayBase::len(self)
    }

    fn with_values_mut<R>(&mut self, f: impl FnOnce(&mut [T]) -> R) -> R {
        if let Some(values) = self.as_slice_mut() {
            return f(values);
        }
        // Strided view: fill a scratch copy, then scatter back in logical order.
        let mut scratch: Vec<T> = self.iter().copied().collect();
        let out = f(&mut scratch);
        for (dst, src) in self.iter_mut().zip(scratch) {
            *dst = src;
        }
        out
    }
}
