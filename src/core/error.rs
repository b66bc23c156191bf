//! Error types for distance profile and matrix profile computation.

/// Errors from a single distance profile (similarity search) computation.
///
/// Each variant is a precondition that is checked before any distance is
/// written to the output buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimilaritySearchError {
    /// The sequence is not a one-dimensional array.
    #[error("sequence must be 1-dimensional")]
    SequenceNotOneDimensional,

    /// The query is not a one-dimensional array.
    #[error("query must be 1-dimensional")]
    QueryNotOneDimensional,

    /// The output distance buffer is not a one-dimensional array.
    #[error("distance must be 1-dimensional")]
    DistanceNotOneDimensional,

    /// The query has more samples than the sequence it is searched in.
    #[error("query must not be longer than sequence")]
    QueryLongerThanSequence,

    /// The output distance buffer does not hold `n - m + 1` elements.
    #[error("distance has wrong size")]
    DistanceWrongSize {
        /// Required length, `n - m + 1`.
        expected: usize,
        /// Length of the buffer that was supplied.
        actual: usize,
    },
}

/// Errors from matrix profile computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixProfileError {
    /// The sequence is not a one-dimensional array.
    #[error("sequence must be 1-dimensional")]
    SequenceNotOneDimensional,

    /// The subsequence length `m` is zero.
    #[error("m must be greater than 0")]
    SubsequenceLengthZero,

    /// The subsequence length `m` exceeds the sequence length.
    #[error("m must not be larger than sequence length")]
    SubsequenceLongerThanSequence,

    /// The profile buffer is not one-dimensional or does not hold `n - m + 1` elements.
    ///
    /// A buffer of any other dimensionality is reported here as well, so
    /// `actual` may equal `expected` when only the shape is wrong.
    #[error("distance has wrong size")]
    DistanceWrongSize {
        /// Required length, `n - m + 1`.
        expected: usize,
        /// Total element count of the buffer that was supplied, over all axes.
        actual: usize,
    },

    /// The index buffer is not one-dimensional or does not hold `n - m + 1` elements.
    ///
    /// As with [`MatrixProfileError::DistanceWrongSize`], a multi-dimensional
    /// buffer with the right element count reports `actual == expected`.
    #[error("index has wrong size")]
    IndexWrongSize {
        /// Required length, `n - m + 1`.
        expected: usize,
        /// Total element count of the buffer that was supplied, over all axes.
        actual: usize,
    },

    /// A per-window distance profile computation failed.
    #[error("similarity search failed: {0}")]
    SimilaritySearchFailed(#[from] SimilaritySearchError),
}
