//! Basic naive matrix profile computation.
//!
//! Fills caller-owned `ndarray` buffers with the nearest-neighbor distance and
//! location of every window, then summarizes the profile.
//!
//! Run with: cargo run --release --example basic_matrix_profile

use mp_naive::{matrix_profile_naive, NO_NEIGHBOR};
use ndarray::Array1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Sine wave with period 100 plus a little deterministic noise, so every
    // window has a close (but not exact) repeat one period later.
    let n = 500;
    let m = 50;
    let ts: Array1<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            (t * std::f64::consts::TAU / 100.0).sin() + ((t * 7.3).sin() * (t * 13.7).cos()) * 0.05
        })
        .collect();

    let n_subs = n - m + 1;
    let mut profile = Array1::<f64>::from_elem(n_subs, 0.0);
    let mut index = Array1::<i64>::from_elem(n_subs, NO_NEIGHBOR);
    matrix_profile_naive(&ts, m, &mut profile, &mut index)?;

    println!("Time series length: {n}");
    println!("Subsequence length: {m}");
    println!("Matrix profile length: {}", profile.len());

    let finite: Vec<(usize, f64)> = profile
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, d)| d.is_finite())
        .collect();
    let (Some(&(min_idx, min_dist)), Some(&(max_idx, max_dist))) = (
        finite.iter().min_by(|a, b| a.1.total_cmp(&b.1)),
        finite.iter().max_by(|a, b| a.1.total_cmp(&b.1)),
    ) else {
        println!("No window has a neighbor outside the exclusion zone");
        return Ok(());
    };

    println!("\nBest matching pair:");
    println!("  Subsequence at index {min_idx}");
    println!("  Nearest neighbor at index {}", index[min_idx]);
    println!("  Distance: {min_dist:.6}");

    println!("\nMost anomalous subsequence:");
    println!("  Index: {max_idx}");
    println!("  Distance: {max_dist:.6}");

    let mean = finite.iter().map(|(_, d)| d).sum::<f64>() / finite.len() as f64;
    let std = (finite.iter().map(|(_, d)| (d - mean).powi(2)).sum::<f64>()
        / finite.len() as f64)
        .sqrt();

    println!("\nProfile statistics:");
    println!("  Mean distance: {mean:.6}");
    println!("  Std deviation: {std:.6}");
    Ok(())
}
