/// Index value recorded for a subsequence with no neighbor outside the exclusion zone.
pub const NO_NEIGHBOR: i64 = -1;

/// Default exclusion zone denominator: zone = floor(m / 4).
pub const DEFAULT_EXCLUSION_ZONE_DENOM: usize = 4;

/// Exclusion zone radius for subsequence length `m`: `floor(m / denom)`.
///
/// A zero denominator disables the band; the trivial self-match at `|i - j| == 0`
/// is still excluded because the zone test is `|i - j| <= zone`.
#[inline]
pub fn exclusion_zone(m: usize, denom: usize) -> usize {
    m.checked_div(denom).unwrap_or(0)
}

/// Configuration for matrix profile computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixProfileConfig {
    /// Subsequence length.
    pub m: usize,
    /// Exclusion zone denominator: zone = floor(m / exclusion_zone_denom).
    pub exclusion_zone_denom: usize,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            exclusion_zone_denom: DEFAULT_EXCLUSION_ZONE_DENOM,
        }
    }

    /// Override the exclusion zone denominator.
    #[must_use]
    pub fn with_exclusion_zone_denom(mut self, denom: usize) -> Self {
        self.exclusion_zone_denom = denom;
        self
    }

    /// Compute the exclusion zone radius.
    pub fn exclusion_zone(&self) -> usize {
        exclusion_zone(self.m, self.exclusion_zone_denom)
    }
}

/// The matrix profile result.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixProfile {
    /// Nearest-neighbor distances for each subsequence (`+inf` when there is none).
    pub profile: Vec<f64>,
    /// Start offset of the nearest neighbor for each subsequence ([`NO_NEIGHBOR`] when there is none).
    pub profile_index: Vec<i64>,
    /// Subsequence length used.
    pub m: usize,
    /// Exclusion zone radius used.
    pub exclusion_zone: usize,
}

impl MatrixProfile {
    /// Create a matrix profile with every entry at its "no neighbor" sentinel.
    pub fn new(n_subs: usize, m: usize, exclusion_zone: usize) -> Self {
        Self {
            profile: vec![f64::INFINITY; n_subs],
            profile_index: vec![NO_NEIGHBOR; n_subs],
            m,
            exclusion_zone,
        }
    }

    /// Number of subsequences, `n - m + 1`.
    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Nearest neighbor of subsequence `idx`, or `None` if it has none.
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn neighbor(&self, idx: usize) -> Option<usize> {
        usize::try_from(self.profile_index[idx]).ok()
    }
}

/// Running sum and sum of squares over a fixed-length window.
///
/// Mean and variance are population statistics (divide by `m`), derived as
/// `E[X^2] - E[X]^2`. Sliding by one sample is O(1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    sum: f64,
    sum_sq: f64,
    m: usize,
}

impl WindowStats {
    /// Statistics of `window`, accumulated left to right.
    pub fn new(window: &[f64]) -> Self {
        let (sum, sum_sq) = window
            .iter()
            .fold((0.0, 0.0), |(s, sq), &x| (s + x, sq + x * x));
        Self {
            sum,
            sum_sq,
            m: window.len(),
        }
    }

    /// Window length.
    pub fn len(&self) -> usize {
        self.m
    }

    pub fn is_empty(&self) -> bool {
        self.m == 0
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.sum / self.m as f64
    }

    /// Population variance, clamped to 0 against rounding residue.
    #[inline]
    pub fn variance(&self) -> f64 {
        let mu = self.mean();
        (self.sum_sq / self.m as f64 - mu * mu).max(0.0)
    }

    #[inline]
    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Drop `leaving` from the window and admit `entering`.
    #[inline]
    pub fn slide(&mut self, leaving: f64, entering: f64) {
        self.sum += entering - leaving;
        self.sum_sq += entering * entering - leaving * leaving;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_stats_simple() {
        // [1, 2, 3]: mean 2, population std sqrt(2/3)
        let stats = WindowStats::new(&[1.0, 2.0, 3.0]);
        assert_eq!(stats.len(), 3);
        assert!((stats.mean() - 2.0).abs() < 1e-12);
        assert!((stats.std() - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_window_stats_slide_matches_fresh() {
        let ts = [1.0, 2.0, 3.0, 4.0, 5.0, 9.0, -2.0];
        let m = 3;
        let mut running = WindowStats::new(&ts[..m]);
        for i in 1..=ts.len() - m {
            running.slide(ts[i - 1], ts[i + m - 1]);
            let fresh = WindowStats::new(&ts[i..i + m]);
            assert!((running.mean() - fresh.mean()).abs() < 1e-12, "mean at {i}");
            assert!((running.std() - fresh.std()).abs() < 1e-9, "std at {i}");
        }
    }

    #[test]
    fn test_window_stats_constant() {
        let stats = WindowStats::new(&[5.0; 4]);
        assert!((stats.mean() - 5.0).abs() < 1e-12);
        assert_eq!(stats.std(), 0.0);
    }

    #[test]
    fn test_matrix_profile_sentinels() {
        let mp = MatrixProfile::new(5, 3, 0);
        assert_eq!(mp.len(), 5);
        assert!(mp.profile.iter().all(|d| d.is_infinite() && *d > 0.0));
        assert!(mp.profile_index.iter().all(|&j| j == NO_NEIGHBOR));
        assert_eq!(mp.neighbor(2), None);
    }

    #[test]
    fn test_neighbor_lookup() {
        let mut mp = MatrixProfile::new(3, 2, 0);
        mp.profile[1] = 0.5;
        mp.profile_index[1] = 2;
        assert_eq!(mp.neighbor(1), Some(2));
        assert_eq!(mp.neighbor(0), None);
    }

    #[test]
    fn test_exclusion_zone() {
        assert_eq!(MatrixProfileConfig::new(3).exclusion_zone(), 0); // floor(3/4)
        assert_eq!(MatrixProfileConfig::new(8).exclusion_zone(), 2);
        assert_eq!(MatrixProfileConfig::new(10).exclusion_zone(), 2); // floor(10/4)

        let config = MatrixProfileConfig::new(10).with_exclusion_zone_denom(2);
        assert_eq!(config.exclusion_zone(), 5);

        let config = MatrixProfileConfig::new(10).with_exclusion_zone_denom(0);
        assert_eq!(config.exclusion_zone(), 0);
    }
}
