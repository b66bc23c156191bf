use crate::algorithms::common::apply_exclusion_zone;
use crate::core::matrix_profile::MatrixProfile;

/// A discovered motif (recurring pattern).
///
/// A motif is a pair of subsequences with the smallest distance in the matrix profile.
/// Multiple motifs are found greedily with exclusion zone elimination.
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    /// Index of the first occurrence.
    pub idx_a: usize,
    /// Index of the nearest-neighbor match.
    pub idx_b: usize,
    /// Distance between the two subsequences.
    pub distance: f64,
}

/// A discovered discord (anomaly).
///
/// A discord is a subsequence whose nearest neighbor is unusually far away,
/// indicating it is unlike any other pattern in the time series.
#[derive(Debug, Clone, PartialEq)]
pub struct Discord {
    /// Index of the anomalous subsequence.
    pub idx: usize,
    /// Distance to its nearest neighbor (high = anomalous).
    pub distance: f64,
}

/// Find the top-k motifs (most similar recurring patterns) in a matrix profile.
///
/// Greedy extraction: find the smallest finite distance, record it, exclude
/// both the motif and its match from future consideration, and repeat.
///
/// # Returns
/// Up to `k` motifs, sorted by distance (ascending). May return fewer than `k`
/// if the profile doesn't contain enough finite-distance entries.
pub fn find_motifs(mp: &MatrixProfile, k: usize) -> Vec<Motif> {
    let mut profile = mp.profile.clone();
    let ez = mp.exclusion_zone;
    let mut motifs = Vec::with_capacity(k.min(profile.len()));

    while motifs.len() < k {
        let Some((best_idx, best_dist)) = extreme_finite(&profile, |a, b| a.total_cmp(b).reverse())
        else {
            break;
        };
        let Some(match_idx) = mp.neighbor(best_idx) else {
            // A finite distance always has a neighbor; skip malformed entries.
            profile[best_idx] = f64::INFINITY;
            continue;
        };

        motifs.push(Motif {
            idx_a: best_idx,
            idx_b: match_idx,
            distance: best_dist,
        });

        apply_exclusion_zone(&mut profile, best_idx, ez);
        apply_exclusion_zone(&mut profile, match_idx, ez);
    }

    motifs
}

/// Find the top-k discords (most anomalous subsequences) in a matrix profile.
///
/// Greedy extraction: find the largest finite distance, record it, exclude it
/// from future consideration, and repeat. Subsequences without any neighbor
/// (`+inf`) are never reported.
///
/// # Returns
/// Up to `k` discords, sorted by distance (descending).
pub fn find_discords(mp: &MatrixProfile, k: usize) -> Vec<Discord> {
    let mut profile = mp.profile.clone();
    let ez = mp.exclusion_zone;
    let mut discords = Vec::with_capacity(k.min(profile.len()));

    while discords.len() < k {
        let Some((worst_idx, worst_dist)) = extreme_finite(&profile, f64::total_cmp) else {
            break;
        };

        discords.push(Discord {
            idx: worst_idx,
            distance: worst_dist,
        });

        apply_exclusion_zone(&mut profile, worst_idx, ez);
    }

    discords
}

/// The finite entry that is greatest under `cmp`, with the lowest index among ties.
fn extreme_finite(
    profile: &[f64],
    cmp: impl Fn(&f64, &f64) -> std::cmp::Ordering,
) -> Option<(usize, f64)> {
    profile
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, d)| d.is_finite())
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, b)) if cmp(&d, &b).is_le() => best,
            _ => Some((i, d)),
        })
}
