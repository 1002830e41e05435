use anyhow::{Context, Result};

/// Simulated cost of one run: linear in `m`, growing with `n`, plus a fixed
/// start-up cost.
fn model_time(n: u32, m: u64) -> f64 {
    let startup = 2.0e-4;
    let per_row = 1.5e-7 * (1.0 + 0.6 * n as f64);
    startup + per_row * m as f64
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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative jitter in `[1 - spread, 1 + spread)`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let n_values = [1u32, 2, 4, 8];
    let m_values: Vec<u64> = (1..=6).map(|k| 10u64.pow(k)).collect();

    let output_path = "timing.txt";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["n", "m", "time"])?;

    let mut rows = 0usize;
    for &n in &n_values {
        for &m in &m_values {
            let time = model_time(n, m) * rng.jitter(0.05);
            writer.write_record([n.to_string(), m.to_string(), format!("{time:.6}")])?;
            rows += 1;
        }
    }
    writer.flush().context("flushing timing table")?;

    println!(
        "Wrote {rows} timings ({} values of n × {} values of m) to {output_path}",
        n_values.len(),
        m_values.len()
    );
    Ok(())
}
