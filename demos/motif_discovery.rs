//! Motif discovery: finding repeated patterns in a time series.
//!
//! A motif is a pair of subsequences that are very similar to each other.
//! After computing the matrix profile, the top-k motifs are extracted greedily.
//!
//! Run with: cargo run --release --example motif_discovery

use mp_naive::{Engine, MatrixProfileConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two embedded motifs over a slow sine background:
    // - pattern A (sharp pulse) near indices 50 and 300
    // - pattern B (double bump) near indices 150 and 400
    let n = 500;
    let m = 30;

    let ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            let mut val = (t * std::f64::consts::TAU / 200.0).sin() * 0.3;
            for center in [50.0, 300.0] {
                let d = (t - center).abs();
                if d < 15.0 {
                    val += 2.0 * (-d * d / 20.0).exp();
                }
            }
            for center in [150.0, 400.0] {
                let d1 = (t - (center - 5.0)).abs();
                let d2 = (t - (center + 5.0)).abs();
                if d1 < 15.0 || d2 < 15.0 {
                    val += 1.5 * (-d1 * d1 / 10.0).exp() + 1.5 * (-d2 * d2 / 10.0).exp();
                }
            }
            val + ((t * 7.1).sin() * (t * 11.3).cos()) * 0.02
        })
        .collect();

    let engine = Engine::new(MatrixProfileConfig::new(m));
    let motifs = engine.motifs(&ts, 3)?;

    println!("Motif Discovery");
    println!("===============");
    println!("Time series length: {n}");
    println!("Subsequence length: {m}");
    println!("Found {} motifs:\n", motifs.len());

    for (rank, motif) in motifs.iter().enumerate() {
        println!(
            "  Motif #{}: indices ({}, {}), distance = {:.6}",
            rank + 1,
            motif.idx_a,
            motif.idx_b,
            motif.distance
        );
    }

    // Distance profile of the best motif: its partner shows up as a dip.
    if let Some(best) = motifs.first() {
        let query = &ts[best.idx_a..best.idx_a + m];
        let row = engine.distance_profile(query, &ts)?;
        println!(
            "\nDistance from window {} to its partner {}: {:.6}",
            best.idx_a, best.idx_b, row[best.idx_b]
        );
    }
    Ok(())
}
