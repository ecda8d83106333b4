use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Write synthetic Pickup/Dist/Tot column files")]
struct Args {
    /// Rows per column.
    #[arg(short, long, default_value_t = 100_000)]
    rows: usize,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn exponential(&mut self, lambda: f64) -> f64 {
        -(1.0 - self.next_f64()).ln() / lambda
    }

    fn lognormal(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.gauss(mean, std_dev).exp()
    }
}

fn write_column<T: std::fmt::Display>(
    dir: &Path,
    name: &str,
    values: impl Iterator<Item = T>,
) -> Result<()> {
    let path = dir.join(format!("{name}.txt"));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for v in values {
        writeln!(out, "{v}")?;
    }
    out.flush()?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let mut rng = SimpleRng::new(args.seed);

    // Pickup: epoch seconds over one month, many collisions at second granularity
    let start: u64 = 1_420_070_400;
    let month: u64 = 31 * 24 * 3600;
    let pickups: Vec<u64> = (0..args.rows)
        .map(|_| start + (rng.next_f64() * month as f64) as u64)
        .collect();
    write_column(&args.output_dir, "Pickup", pickups.into_iter())?;

    // Dist: trip distance in miles, rounded to hundredths like a taxi meter
    let dists: Vec<f64> = (0..args.rows)
        .map(|_| (rng.lognormal(0.6, 0.75) * 100.0).round() / 100.0)
        .collect();
    write_column(&args.output_dir, "Dist", dists.into_iter())?;

    // Tot: fare total in dollars
    let totals: Vec<f64> = (0..args.rows)
        .map(|_| ((2.5 + rng.exponential(1.0 / 12.0)) * 100.0).round() / 100.0)
        .collect();
    write_column(&args.output_dir, "Tot", totals.into_iter())?;

    log::info!("Generated {} rows per column in {}", args.rows, args.output_dir.display());
    Ok(())
}
