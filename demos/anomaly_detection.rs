//! Anomaly detection (discord discovery) with the naive matrix profile.
//!
//! A discord is a subsequence whose nearest neighbor is unusually far away,
//! making it the most unusual pattern in the series.
//!
//! Run with: cargo run --release --example anomaly_detection

use mp_naive::{Engine, MatrixProfileConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simulated machine sensor:
    // - normal operation: smooth periodic pattern
    // - anomaly 1 near index 200: amplitude spike
    // - anomaly 2 near index 600: frequency change
    let n = 1000;
    let m = 50;

    let ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            let mut val = (t * std::f64::consts::TAU / 80.0).sin();
            if (180..230).contains(&i) {
                val *= 3.0;
            }
            if (580..650).contains(&i) {
                val = (t * std::f64::consts::TAU / 20.0).sin();
            }
            val + ((t * 7.3).sin() * (t * 13.7).cos()) * 0.05
        })
        .collect();

    let engine = Engine::new(MatrixProfileConfig::new(m));
    let mp = engine.compute(&ts)?;
    let discords = mp_naive::find_discords(&mp, 3);

    println!("Anomaly Detection (Discord Discovery)");
    println!("=====================================");
    println!("Time series length: {n}");
    println!("Subsequence length: {m}");
    println!("Exclusion zone: {}", mp.exclusion_zone);
    println!("\nDetected {} anomalies:\n", discords.len());

    for (rank, discord) in discords.iter().enumerate() {
        let desc = if (150..260).contains(&discord.idx) {
            "amplitude spike (injected at ~200)"
        } else if (530..680).contains(&discord.idx) {
            "frequency change (injected at ~600)"
        } else {
            "unknown"
        };
        println!(
            "  Anomaly #{}: index {}, distance = {:.4} ({desc})",
            rank + 1,
            discord.idx,
            discord.distance
        );
    }

    println!("\nProfile values near anomalies:");
    for discord in &discords {
        let start = discord.idx.saturating_sub(2);
        let end = (discord.idx + 3).min(mp.len());
        let around: Vec<String> = mp.profile[start..end]
            .iter()
            .map(|d| format!("{d:.2}"))
            .collect();
        println!("  idx {}: [..., {}]", discord.idx, around.join(", "));
    }
    Ok(())
}
