use tracing::{debug, instrument};

use crate::algorithms::common::is_trivial_match;
use crate::algorithms::distance_profile::distance_profile;
use crate::core::error::MatrixProfileError;
use crate::core::input::{ProfileBuffer, SeriesInput};
use crate::core::matrix_profile::{
    exclusion_zone, MatrixProfile, MatrixProfileConfig, DEFAULT_EXCLUSION_ZONE_DENOM, NO_NEIGHBOR,
};

/// Minimum number of subsequences before dispatching rows to the rayon pool.
/// Below this threshold, thread-dispatch overhead exceeds parallelism gains.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_SUBS: usize = 256;

/// Compute the matrix profile of `sequence` into caller-supplied buffers.
///
/// For every window `i` of length `m`, the window is used as a query against
/// the whole sequence; the resulting distance profile is scanned for the
/// smallest distance at an offset `j` with `|i - j| > floor(m / 4)`.
/// `profile[i]` receives that distance and `index[i]` the offset `j`. Windows
/// with no candidate outside the exclusion zone keep `+inf` and [`NO_NEIGHBOR`].
///
/// Ties are resolved toward the lowest offset. The cost is O(n^2 * m): this is
/// the unaccelerated baseline.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`MatrixProfileError::SequenceNotOneDimensional`] | `sequence` is not 1-D |
/// | [`MatrixProfileError::SubsequenceLengthZero`] | `m == 0` |
/// | [`MatrixProfileError::SubsequenceLongerThanSequence`] | `m > n` |
/// | [`MatrixProfileError::DistanceWrongSize`] | `profile` is not 1-D of length `n - m + 1` |
/// | [`MatrixProfileError::IndexWrongSize`] | `index` is not 1-D of length `n - m + 1` |
/// | [`MatrixProfileError::SimilaritySearchFailed`] | a per-window distance profile failed |
///
/// Neither buffer is written when a validation error is returned.
pub fn matrix_profile_naive<S, P, I>(
    sequence: &S,
    m: usize,
    profile: &mut P,
    index: &mut I,
) -> Result<(), MatrixProfileError>
where
    S: SeriesInput + ?Sized,
    P: ProfileBuffer<f64> + ?Sized,
    I: ProfileBuffer<i64> + ?Sized,
{
    let zone = exclusion_zone(m, DEFAULT_EXCLUSION_ZONE_DENOM);
    compute_into(sequence, m, zone, profile, index)
}

/// Compute the matrix profile of `sequence` with the given configuration.
///
/// Allocates the result; see [`matrix_profile_naive`] for the semantics and errors.
pub fn matrix_profile<S>(
    sequence: &S,
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile, MatrixProfileError>
where
    S: SeriesInput + ?Sized,
{
    let seq = sequence
        .as_series()
        .ok_or(MatrixProfileError::SequenceNotOneDimensional)
        .inspect_err(|err| debug!(%err, "matrix profile rejected"))?;
    let n_subs = profile_len(seq.len(), config.m)
        .inspect_err(|err| debug!(%err, "matrix profile rejected"))?;
    let zone = config.exclusion_zone();

    let mut mp = MatrixProfile::new(n_subs, config.m, zone);
    compute_into(
        &*seq,
        config.m,
        zone,
        mp.profile.as_mut_slice(),
        mp.profile_index.as_mut_slice(),
    )?;
    Ok(mp)
}

/// Number of windows, `n - m + 1`, after checking `m`.
fn profile_len(n: usize, m: usize) -> Result<usize, MatrixProfileError> {
    if m == 0 {
        return Err(MatrixProfileError::SubsequenceLengthZero);
    }
    if m > n {
        return Err(MatrixProfileError::SubsequenceLongerThanSequence);
    }
    Ok(n - m + 1)
}

/// Both buffers must be 1-D with `n_subs` elements. Shape and length failures
/// share one variant per buffer; `actual` is the total element count.
fn check_buffers<P, I>(
    n_subs: usize,
    profile: &P,
    index: &I,
) -> Result<(), MatrixProfileError>
where
    P: ProfileBuffer<f64> + ?Sized,
    I: ProfileBuffer<i64> + ?Sized,
{
    if !profile.is_one_dimensional() || profile.buffer_len() != n_subs {
        return Err(MatrixProfileError::DistanceWrongSize {
            expected: n_subs,
            actual: profile.buffer_len(),
        });
    }
    if !index.is_one_dimensional() || index.buffer_len() != n_subs {
        return Err(MatrixProfileError::IndexWrongSize {
            expected: n_subs,
            actual: index.buffer_len(),
        });
    }
    Ok(())
}

#[instrument(skip_all, fields(m = m, n = tracing::field::Empty))]
fn compute_into<S, P, I>(
    sequence: &S,
    m: usize,
    zone: usize,
    profile: &mut P,
    index: &mut I,
) -> Result<(), MatrixProfileError>
where
    S: SeriesInput + ?Sized,
    P: ProfileBuffer<f64> + ?Sized,
    I: ProfileBuffer<i64> + ?Sized,
{
    let seq = sequence
        .as_series()
        .ok_or(MatrixProfileError::SequenceNotOneDimensional)
        .inspect_err(|err| debug!(%err, "matrix profile rejected"))?;
    tracing::Span::current().record("n", seq.len());

    let n_subs = profile_len(seq.len(), m)
        .and_then(|n_subs| check_buffers(n_subs, profile, index).map(|()| n_subs))
        .inspect_err(|err| debug!(%err, "matrix profile rejected"))?;

    let parallel = use_parallel(n_subs);
    debug!(
        profile_len = n_subs,
        exclusion_zone = zone,
        parallel,
        "computing naive matrix profile"
    );

    profile.with_values_mut(|profile| {
        index.with_values_mut(|index| -> Result<(), MatrixProfileError> {
            profile.fill(f64::INFINITY);
            index.fill(NO_NEIGHBOR);

            #[cfg(feature = "parallel")]
            if parallel {
                fill_rows_parallel(&seq, m, zone, profile, index)?;
            } else {
                fill_rows(&seq, m, zone, profile, index)?;
            }
            #[cfg(not(feature = "parallel"))]
            fill_rows(&seq, m, zone, profile, index)?;

            let isolated = index.iter().filter(|&&j| j == NO_NEIGHBOR).count();
            debug!(isolated, "matrix profile complete");
            Ok(())
        })
    })
}

#[cfg(feature = "parallel")]
fn use_parallel(n_subs: usize) -> bool {
    n_subs >= MIN_PARALLEL_SUBS
}

#[cfg(not(feature = "parallel"))]
fn use_parallel(_n_subs: usize) -> bool {
    false
}

/// Lowest-offset minimum of `dist` outside the exclusion zone of `i`.
#[inline]
fn nearest_neighbor(dist: &[f64], i: usize, zone: usize) -> Option<(usize, f64)> {
    let mut best = None;
    let mut best_dist = f64::INFINITY;
    for (j, &d) in dist.iter().enumerate() {
        if is_trivial_match(i, j, zone) {
            continue;
        }
        if d < best_dist {
            best_dist = d;
            best = Some(j);
        }
    }
    best.map(|j| (j, best_dist))
}

/// Serial row loop: one distance profile per window, reduced to its nearest neighbor.
fn fill_rows(
    seq: &[f64],
    m: usize,
    zone: usize,
    profile: &mut [f64],
    index: &mut [i64],
) -> Result<(), MatrixProfileError> {
    let mut dist = vec![0.0; profile.len()];
    for (i, (p, idx)) in profile.iter_mut().zip(index.iter_mut()).enumerate() {
        distance_profile(seq, &seq[i..i + m], dist.as_mut_slice())?;
        if let Some((j, d)) = nearest_neighbor(&dist, i, zone) {
            *p = d;
            *idx = j as i64;
        }
    }
    Ok(())
}

/// Parallel row loop: rows are independent and write disjoint output cells,
/// so each rayon worker only needs its own scratch distance profile.
#[cfg(feature = "parallel")]
fn fill_rows_parallel(
    seq: &[f64],
    m: usize,
    zone: usize,
    profile: &mut [f64],
    index: &mut [i64],
) -> Result<(), MatrixProfileError> {
    use rayon::prelude::*;

    let n_subs = profile.len();
    profile
        .par_iter_mut()
        .zip(index.par_iter_mut())
        .enumerate()
        .try_for_each_init(
            || vec![0.0; n_subs],
            |dist, (i, (p, idx))| -> Result<(), MatrixProfileError> {
                distance_profile(seq, &seq[i..i + m], dist.as_mut_slice())?;
                if let Some((j, d)) = nearest_neighbor(dist, i, zone) {
                    *p = d;
                    *idx = j as i64;
                }
                Ok(())
            },
        )
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2};

    use super::*;
    use crate::algorithms::distance_profile::mass;

    #[test]
    fn test_tiny_repeating() {
        // [1,2,3,2] appears at index 0 and at index 4
        let ts = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0];
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(4)).unwrap();

        assert_eq!(mp.len(), 5);
        assert!(mp.profile[0] < 1e-6, "got {}", mp.profile[0]);
        assert_eq!(mp.neighbor(0), Some(4));
        assert!(mp.profile[4] < 1e-6, "got {}", mp.profile[4]);
        assert_eq!(mp.neighbor(4), Some(0));
    }

    #[test]
    fn test_linear() {
        // Linearly increasing: all subsequences have same shape → all distances ≈ 0
        let ts: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(4)).unwrap();

        for (i, &d) in mp.profile.iter().enumerate() {
            assert!(d < 1e-6, "Linear series: got {d} at index {i}");
        }
    }

    #[test]
    fn test_step_pattern_constant_windows() {
        // zone = floor(3/4) = 0, so windows 0 and 6 ([0,0,0]) may match each other
        let ts = [0.0_f64, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let mut profile = vec![0.0; 10];
        let mut index = vec![0_i64; 10];
        matrix_profile_naive(&ts, 3, &mut profile, &mut index).unwrap();

        assert_eq!(profile[0], 0.0);
        assert_eq!(profile[6], 0.0);
        // [0,0,0] windows pair with each other, [1,1,1] windows likewise
        assert_eq!(index[0], 6);
        assert_eq!(index[6], 0);
        assert_eq!(index[3], 9);
        assert_eq!(index[9], 3);
        // [0,0,1] at 1 and at 7 are an exact pair
        assert_eq!(index[1], 7);
        assert_eq!(index[7], 1);
    }

    #[test]
    fn test_constant_windows_reached_by_sliding() {
        // Windows 3 and 8 are both [0.2, 0.2, 0.2], reached after non-constant data
        let ts = [0.1_f64, 0.7, 0.3, 0.2, 0.2, 0.2, 0.9, 0.4, 0.2, 0.2, 0.2];
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(3)).unwrap();
        assert_eq!(mp.profile[3], 0.0);
        assert_eq!(mp.profile[8], 0.0);
        assert_eq!(mp.neighbor(3), Some(8));
        assert_eq!(mp.neighbor(8), Some(3));
    }

    #[test]
    fn test_known_motif() {
        // Pattern [0, 1, 0, -1] at positions 0 and 10
        let mut ts = vec![0.0; 20];
        ts[..4].copy_from_slice(&[0.0, 1.0, 0.0, -1.0]);
        for (i, val) in ts.iter_mut().enumerate().take(10).skip(4) {
            *val = (i as f64) * 0.5;
        }
        ts[10..14].copy_from_slice(&[0.0, 1.0, 0.0, -1.0]);
        for (i, val) in ts.iter_mut().enumerate().take(20).skip(14) {
            *val = -(i as f64) * 0.3;
        }

        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(4)).unwrap();
        assert_eq!(mp.neighbor(0), Some(10), "Index 0 should match index 10");
        assert_eq!(mp.neighbor(10), Some(0), "Index 10 should match index 0");
        assert!(mp.profile[0] < 1e-6, "Motif pair distance should be ~0");
    }

    #[test]
    fn test_profile_matches_row_minimum() {
        let ts = vec![1.0, 3.0, 2.0, 4.0, 1.5, 3.5, 2.5, 1.0, 3.0, 2.0, 4.0, 1.0];
        let m = 3;
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(m)).unwrap();

        for i in 0..mp.len() {
            let row = mass(&ts[i..i + m], &ts).unwrap();
            let j = mp.neighbor(i).expect("zone 0 always leaves candidates");
            assert_eq!(mp.profile[i].to_bits(), row[j].to_bits(), "row {i}");
            for (k, &d) in row.iter().enumerate() {
                if k != i {
                    assert!(mp.profile[i] <= d, "row {i}: {} > {d} at {k}", mp.profile[i]);
                }
            }
        }
    }

    #[test]
    fn test_exclusion_zone_respected() {
        let ts: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).cos()).collect();
        let config = MatrixProfileConfig::new(8);
        let mp = matrix_profile(&ts, &config).unwrap();

        let zone = config.exclusion_zone();
        assert_eq!(mp.exclusion_zone, 2);
        for i in 0..mp.len() {
            let j = mp.neighbor(i).expect("long series leaves candidates");
            assert!(
                j.abs_diff(i) > zone,
                "Match at i={i}, j={j} violates exclusion_zone={zone}"
            );
        }
    }

    #[test]
    fn test_no_neighbor_sentinels() {
        // n=5, m=4: two windows, one apart; zone = 1 excludes both pairs
        let ts = [1.0_f64, 2.0, 3.0, 1.0, 2.0];
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(4)).unwrap();
        assert_eq!(mp.len(), 2);
        assert!(mp.profile.iter().all(|d| d.is_infinite()));
        assert_eq!(mp.profile_index, vec![NO_NEIGHBOR; 2]);

        // m == n: a single window never has a neighbor
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(5)).unwrap();
        assert_eq!(mp.profile, vec![f64::INFINITY]);
        assert_eq!(mp.neighbor(0), None);
    }

    #[test]
    fn test_ties_pick_lowest_offset() {
        // Period-3 sawtooth: every window at the same phase is an exact match
        let ts: Vec<f64> = (0..15).map(|i| (i % 3) as f64).collect();
        let mp = matrix_profile(&ts, &MatrixProfileConfig::new(3)).unwrap();
        assert_eq!(mp.neighbor(0), Some(3));
        assert_eq!(mp.neighbor(6), Some(0));
        assert_eq!(mp.neighbor(12), Some(0));
        assert_eq!(mp.neighbor(1), Some(4));
    }

    #[test]
    fn test_validation_errors() {
        let ts = [1.0_f64, 2.0, 3.0, 4.0];
        let mut profile = vec![0.0; 2];
        let mut index = vec![0_i64; 2];

        assert_eq!(
            matrix_profile_naive(&ts, 0, &mut profile, &mut index),
            Err(MatrixProfileError::SubsequenceLengthZero)
        );
        assert_eq!(
            matrix_profile_naive(&ts, 5, &mut profile, &mut index),
            Err(MatrixProfileError::SubsequenceLongerThanSequence)
        );
        assert_eq!(
            matrix_profile_naive(&ts, 2, &mut profile, &mut index),
            Err(MatrixProfileError::DistanceWrongSize {
                expected: 3,
                actual: 2
            })
        );
        let mut profile = vec![0.0; 3];
        assert_eq!(
            matrix_profile_naive(&ts, 2, &mut profile, &mut index),
            Err(MatrixProfileError::IndexWrongSize {
                expected: 3,
                actual: 2
            })
        );
        // No partial writes
        assert_eq!(profile, vec![0.0; 3]);
        assert_eq!(index, vec![0; 2]);
    }

    #[test]
    fn test_ndarray_buffers() {
        let grid = Array2::<f64>::zeros((3, 4));
        let mut profile = Array1::<f64>::zeros(3);
        let mut index = Array1::<i64>::zeros(3);
        assert_eq!(
            matrix_profile_naive(&grid, 2, &mut profile, &mut index),
            Err(MatrixProfileError::SequenceNotOneDimensional)
        );

        let ts = Array1::from(vec![1.0_f64, 2.0, 1.0, 2.0]);
        let mut profile_2d = Array2::<f64>::zeros((3, 1));
        assert_eq!(
            matrix_profile_naive(&ts, 2, &mut profile_2d, &mut index),
            Err(MatrixProfileError::DistanceWrongSize {
                expected: 3,
                actual: 3
            })
        );

        // Column vector with the right element count: the shape alone is wrong
        let mut index_2d = Array2::<i64>::zeros((3, 1));
        assert_eq!(
            matrix_profile_naive(&ts, 2, &mut profile, &mut index_2d),
            Err(MatrixProfileError::IndexWrongSize {
                expected: 3,
                actual: 3
            })
        );
        let mut profile_wide = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            matrix_profile_naive(&ts, 2, &mut profile_wide, &mut index),
            Err(MatrixProfileError::DistanceWrongSize {
                expected: 3,
                actual: 6
            })
        );

        matrix_profile_naive(&ts, 2, &mut profile, &mut index).unwrap();
        // [2,1] is anticorrelated with both [1,2] windows; the first one wins
        assert_eq!(index.to_vec(), vec![2, 0, 0]);
        assert!(profile[0] < 1e-9 && profile[2] < 1e-9);
        assert!((profile[1] - 8.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let ts: Vec<f64> = (0..120)
            .map(|i| (i as f64 * 0.37).sin() + (i as f64 * 0.11).cos())
            .collect();
        let config = MatrixProfileConfig::new(12);
        let a = matrix_profile(&ts, &config).unwrap();
        let b = matrix_profile(&ts, &config).unwrap();
        assert_eq!(a.profile_index, b.profile_index);
        assert!(a
            .profile
            .iter()
            .zip(&b.profile)
            .all(|(x, y)| x.to_bits() == y.to_bits()));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let ts: Vec<f64> = (0..400)
            .map(|i| (i as f64 * 0.21).sin() * (1.0 + (i as f64 * 0.013).cos()))
            .collect();
        let m = 16;
        let zone = exclusion_zone(m, DEFAULT_EXCLUSION_ZONE_DENOM);
        let n_subs = ts.len() - m + 1;

        let mut serial = (vec![f64::INFINITY; n_subs], vec![NO_NEIGHBOR; n_subs]);
        let mut parallel = serial.clone();
        fill_rows(&ts, m, zone, &mut serial.0, &mut serial.1).unwrap();
        fill_rows_parallel(&ts, m, zone, &mut parallel.0, &mut parallel.1).unwrap();

        assert_eq!(serial.1, parallel.1);
        for (i, (a, b)) in serial.0.iter().zip(&parallel.0).enumerate() {
            assert_eq!(a.to_bits(), b.to_bits(), "profile mismatch at {i}");
        }
    }
}
