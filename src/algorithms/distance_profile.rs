use tracing::{debug, instrument};

use crate::algorithms::common::{apply_exclusion_zone, dot_product, equal_run, is_constant};
use crate::core::error::SimilaritySearchError;
use crate::core::input::{ProfileBuffer, SeriesInput};
use crate::core::matrix_profile::{exclusion_zone, WindowStats, DEFAULT_EXCLUSION_ZONE_DENOM};

/// A single match result from pattern matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Index of the matching subsequence in the time series.
    pub index: usize,
    /// Z-normalized Euclidean distance between query and this subsequence.
    pub distance: f64,
}

/// Compute the z-normalized distance profile of `query` over `sequence` into `distance`.
///
/// Element `i` of the output is the z-normalized Euclidean distance between the
/// query and `sequence[i..i + m]`:
/// 1. Query mean and population standard deviation are computed once
/// 2. Window statistics are maintained with a running sum and sum of squares
/// 3. The dot product with each window is computed directly (O(m) per offset)
/// 4. `d = sqrt(2 * m * (1 - r))` with the Pearson correlation `r` clamped to [-1, 1]
///
/// Total cost is O(n * m).
///
/// Zero-variance windows are not an error. A window (or query) is constant when
/// all of its samples are equal, checked on the samples rather than on the
/// running standard deviation. Two constant windows at the same level have
/// distance 0; any other pairing with a constant side has distance
/// `sqrt(2 * m)`. An empty query yields NaN distances.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SimilaritySearchError::SequenceNotOneDimensional`] | `sequence` is not 1-D |
/// | [`SimilaritySearchError::QueryNotOneDimensional`] | `query` is not 1-D |
/// | [`SimilaritySearchError::DistanceNotOneDimensional`] | `distance` is not 1-D |
/// | [`SimilaritySearchError::QueryLongerThanSequence`] | `m > n` |
/// | [`SimilaritySearchError::DistanceWrongSize`] | `distance` does not hold `n - m + 1` elements |
///
/// Nothing is written to `distance` when an error is returned.
#[instrument(level = "trace", skip_all)]
pub fn distance_profile<S, Q, D>(
    sequence: &S,
    query: &Q,
    distance: &mut D,
) -> Result<(), SimilaritySearchError>
where
    S: SeriesInput + ?Sized,
    Q: SeriesInput + ?Sized,
    D: ProfileBuffer<f64> + ?Sized,
{
    let seq = sequence
        .as_series()
        .ok_or(SimilaritySearchError::SequenceNotOneDimensional)
        .inspect_err(|err| debug!(%err, "distance profile rejected"))?;
    let qry = query
        .as_series()
        .ok_or(SimilaritySearchError::QueryNotOneDimensional)
        .inspect_err(|err| debug!(%err, "distance profile rejected"))?;
    check_output(seq.len(), qry.len(), distance)
        .inspect_err(|err| debug!(%err, "distance profile rejected"))?;

    distance.with_values_mut(|out| fill_distance_profile(&seq, &qry, out));
    Ok(())
}

fn check_output<D>(n: usize, m: usize, distance: &D) -> Result<(), SimilaritySearchError>
where
    D: ProfileBuffer<f64> + ?Sized,
{
    if !distance.is_one_dimensional() {
        return Err(SimilaritySearchError::DistanceNotOneDimensional);
    }
    if m > n {
        return Err(SimilaritySearchError::QueryLongerThanSequence);
    }
    let expected = n - m + 1;
    let actual = distance.buffer_len();
    if actual != expected {
        return Err(SimilaritySearchError::DistanceWrongSize { expected, actual });
    }
    Ok(())
}

/// Fill `out` (length `n - m + 1`) with the distance profile of `query` over `seq`.
fn fill_distance_profile(seq: &[f64], query: &[f64], out: &mut [f64]) {
    let m = query.len();
    let m_f = m as f64;
    let q_stats = WindowStats::new(query);
    let query_shape = Shape {
        mean: q_stats.mean(),
        std: q_stats.std(),
        level: is_constant(query).then(|| query[0]),
    };

    let mut window = WindowStats::new(&seq[..m]);
    // Equal samples ending at the window's last element; the window is
    // constant once the run covers all of it.
    let mut run = equal_run(&seq[..m]);
    let last = out.len() - 1;
    for (i, d) in out.iter_mut().enumerate() {
        let dot = dot_product(&seq[i..i + m], query);
        let window_shape = Shape {
            mean: window.mean(),
            std: window.std(),
            level: (m > 0 && run >= m).then(|| seq[i]),
        };
        *d = znorm_distance(dot, m_f, &window_shape, &query_shape);

        if i < last {
            window.slide(seq[i], seq[i + m]);
            run = if m > 0 && seq[i + m] == seq[i + m - 1] {
                run + 1
            } else {
                1
            };
        }
    }
}

/// Mean, population std and, for a constant window, its level.
struct Shape {
    mean: f64,
    std: f64,
    level: Option<f64>,
}

/// Convert a window/query dot product to a z-normalized Euclidean distance.
///
/// Constancy is decided on the samples, never on the running standard
/// deviation, which keeps rounding residue after sliding. A constant side has
/// correlation 1 with a constant side at the same level and 0 with anything else.
#[inline]
fn znorm_distance(dot: f64, m_f: f64, window: &Shape, query: &Shape) -> f64 {
    let r = match (window.level, query.level) {
        (Some(a), Some(b)) if a == b => return 0.0,
        (Some(_), _) | (_, Some(_)) => 0.0,
        (None, None) => (dot - m_f * window.mean * query.mean) / (m_f * window.std * query.std),
    };
    (2.0 * m_f * (1.0 - r.clamp(-1.0, 1.0))).sqrt()
}

/// Allocate and compute the distance profile of `query` over `ts`.
///
/// Convenience wrapper around [`distance_profile`] for slices.
///
/// # Returns
/// A distance profile of length `ts.len() - query.len() + 1`.
///
/// # Errors
/// [`SimilaritySearchError::QueryLongerThanSequence`] if `ts.len() < query.len()`.
pub fn mass(query: &[f64], ts: &[f64]) -> Result<Vec<f64>, SimilaritySearchError> {
    let n_subs = (ts.len() + 1)
        .checked_sub(query.len())
        .ok_or(SimilaritySearchError::QueryLongerThanSequence)?;
    let mut profile = vec![0.0; n_subs];
    distance_profile(ts, query, profile.as_mut_slice())?;
    Ok(profile)
}

/// Find all subsequences in a time series that match a query within a distance threshold.
///
/// 1. Compute the distance profile via [`mass`]
/// 2. Determine the threshold (default: `max(mean(D) - 2*std(D), min(D))`)
/// 3. Repeatedly take the smallest remaining distance below the threshold,
///    record it, and apply an exclusion zone around it
///
/// # Arguments
/// * `query` - The query subsequence
/// * `ts` - The time series to search
/// * `max_distance` - Maximum distance threshold. If `None`, uses the default above.
/// * `exclusion_zone` - Exclusion zone radius. If `None`, uses `floor(m / 4)` (at least 1).
///
/// # Returns
/// Matches sorted by distance (ascending).
pub fn find_matches(
    query: &[f64],
    ts: &[f64],
    max_distance: Option<f64>,
    exclusion_zone_radius: Option<usize>,
) -> Result<Vec<Match>, SimilaritySearchError> {
    let m = query.len();
    let dp = mass(query, ts)?;
    let n_subs = dp.len();

    let ez = exclusion_zone_radius
        .unwrap_or_else(|| exclusion_zone(m, DEFAULT_EXCLUSION_ZONE_DENOM))
        .max(1)
        .min(n_subs);

    let max_dist = match max_distance {
        Some(d) => d,
        None => match default_threshold(&dp) {
            Some(d) => d,
            None => return Ok(Vec::new()),
        },
    };

    let mut working = dp;
    let mut matches = Vec::new();

    while let Some((best_idx, best_dist)) = working
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, d)| d.is_finite())
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
    {
        if best_dist > max_dist {
            break;
        }
        matches.push(Match {
            index: best_idx,
            distance: best_dist,
        });
        apply_exclusion_zone(&mut working, best_idx, ez);
    }

    Ok(matches)
}

/// `max(mean(D) - 2*std(D), min(D))` over the finite entries, or `None` if there are none.
fn default_threshold(dp: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = dp.iter().copied().filter(|d| d.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let n_f = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n_f;
    let var = finite.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n_f;
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    Some((mean - 2.0 * var.sqrt()).max(min))
}
