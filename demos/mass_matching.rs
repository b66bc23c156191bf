//! Distance profiles and pattern matching.
//!
//! `mass` computes the z-normalized distance between a query and every
//! window of a series; `find_matches` then extracts all occurrences below a
//! distance threshold, one per exclusion zone.
//!
//! Run with: cargo run --release --example mass_matching

use mp_naive::{find_matches, mass};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let n = 1000;

    // Low-amplitude noise with a Gaussian pulse embedded four times
    let mut ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            ((t * 7.1).sin() * (t * 11.3).cos()) * 0.1
        })
        .collect();
    let pulse_centers = [100, 350, 600, 850];
    for &center in &pulse_centers {
        for j in 0..50 {
            let offset = j as f64 - 25.0;
            ts[center + j] += 2.0 * (-offset * offset / 30.0).exp();
        }
    }

    let query = &ts[100..150];
    let distances = mass(query, &ts)?;

    println!("Distance Profile and Pattern Matching");
    println!("=====================================");
    println!("Time series length: {n}");
    println!("Query length: {}", query.len());
    println!("Distance profile length: {}", distances.len());

    let mut ranked: Vec<(usize, f64)> = distances.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    println!("\nClosest windows in the distance profile:");
    for (rank, &(idx, dist)) in ranked.iter().take(6).enumerate() {
        println!("  #{}: index {idx:>4}, distance {dist:.6}", rank + 1);
    }

    let matches = find_matches(query, &ts, None, None)?;
    println!("\nfind_matches (auto threshold, default exclusion zone):");
    println!("  Found {} matches", matches.len());
    for hit in &matches {
        let near_pulse = pulse_centers.iter().any(|&c| hit.index.abs_diff(c) < 30);
        let label = if near_pulse { "pulse" } else { "other" };
        println!(
            "    index {:>4}, distance {:.6} ({label})",
            hit.index, hit.distance
        );
    }

    let strict = find_matches(query, &ts, Some(0.5), None)?;
    println!("\nfind_matches (threshold=0.5): {} matches", strict.len());
    Ok(())
}
