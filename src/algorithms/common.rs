/// Dot product of two equal-length windows, accumulated left to right.
#[inline]
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Whether every sample of a non-empty window is equal.
#[inline]
pub fn is_constant(window: &[f64]) -> bool {
    !window.is_empty() && window.windows(2).all(|pair| pair[0] == pair[1])
}

/// Length of the run of equal samples ending at the last element of `window`.
pub fn equal_run(window: &[f64]) -> usize {
    let Some(&last) = window.last() else {
        return 0;
    };
    window.iter().rev().take_while(|&&x| x == last).count()
}

/// Whether offset `j` lies inside the exclusion zone of offset `i`, i.e. `|i - j| <= zone`.
#[inline]
pub fn is_trivial_match(i: usize, j: usize, zone: usize) -> bool {
    i.abs_diff(j) <= zone
}

/// Apply an exclusion zone around index `idx`, setting entries within the zone to infinity.
///
/// The zone covers indices `[idx - zone, idx + zone]` (clamped to bounds).
#[inline]
pub fn apply_exclusion_zone(profile: &mut [f64], idx: usize, zone: usize) {
    let start = idx.saturating_sub(zone);
    let end = idx.saturating_add(zone).saturating_add(1).min(profile.len());
    if start >= end {
        return;
    }
    for val in &mut profile[start..end] {
        *val = f64::INFINITY;
    }
}
