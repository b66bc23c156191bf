//! Naive z-normalized matrix profile.
//!
//! Two layers:
//! - [`distance_profile`]: z-normalized Euclidean distance from one query to
//!   every same-length window of a sequence, in O(n * m).
//! - [`matrix_profile_naive`]: the nearest non-trivial neighbor of every
//!   window, built by running one distance profile per window, in O(n^2 * m).
//!
//! Motif and discord extraction work on the resulting [`MatrixProfile`].

pub mod algorithms;
pub mod core;

pub use crate::algorithms::distance_profile::{distance_profile, find_matches, mass, Match};
pub use crate::algorithms::motifs::{find_discords, find_motifs, Discord, Motif};
pub use crate::algorithms::naive::{matrix_profile, matrix_profile_naive};
pub use crate::core::error::{MatrixProfileError, SimilaritySearchError};
pub use crate::core::input::{ProfileBuffer, SeriesInput};
pub use crate::core::matrix_profile::{
    MatrixProfile, MatrixProfileConfig, WindowStats, DEFAULT_EXCLUSION_ZONE_DENOM, NO_NEIGHBOR,
};

/// High-level facade for matrix profile computation.
///
/// # Examples
///
/// ```
/// use mp_naive::{Engine, MatrixProfileConfig};
///
/// let ts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 1.0];
/// let engine = Engine::new(MatrixProfileConfig::new(4));
/// let mp = engine.compute(&ts).unwrap();
/// assert_eq!(mp.profile.len(), ts.len() - 4 + 1);
/// assert_eq!(mp.neighbor(0), Some(4));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    config: MatrixProfileConfig,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: MatrixProfileConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &MatrixProfileConfig {
        &self.config
    }

    /// Compute the full matrix profile for a time series.
    pub fn compute<S>(&self, ts: &S) -> Result<MatrixProfile, MatrixProfileError>
    where
        S: SeriesInput + ?Sized,
    {
        matrix_profile(ts, &self.config)
    }

    /// Distance profile of `query` against every window of `ts`.
    ///
    /// The query length is taken from `query`, not from the configured `m`.
    pub fn distance_profile(
        &self,
        query: &[f64],
        ts: &[f64],
    ) -> Result<Vec<f64>, SimilaritySearchError> {
        mass(query, ts)
    }

    /// Compute the matrix profile and extract the top-`k` motifs.
    pub fn motifs<S>(&self, ts: &S, k: usize) -> Result<Vec<Motif>, MatrixProfileError>
    where
        S: SeriesInput + ?Sized,
    {
        let mp = self.compute(ts)?;
        Ok(find_motifs(&mp, k))
    }

    /// Compute the matrix profile and extract the top-`k` discords.
    pub fn discords<S>(&self, ts: &S, k: usize) -> Result<Vec<Discord>, MatrixProfileError>
    where
        S: SeriesInput + ?Sized,
    {
        let mp = self.compute(ts)?;
        Ok(find_discords(&mp, k))
    }
}
