//! Random sources for scene layout and comet scheduling.

/// Uniform random source. Implementors only provide `next_f64`.
pub trait Rng {
    /// Next sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// xorshift64* generator. Not crypto secure; plenty for sprinkling stars.
pub struct XorShift {
    state: u64,
}

impl XorShift {
    pub fn new(seed: u64) -> Self {
        // zero is a fixed point of xorshift
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { state }
    }

    /// Seeds from browser entropy, falling back to the performance clock.
    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        let seed = match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(_) => crate::dom::now_ms().to_bits(),
        };
        Self::new(seed)
    }
}

impl Rng for XorShift {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        let r = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
        // top 53 bits -> [0, 1)
        (r >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct Sequence {
    values: Vec<f64>,
    pos: usize,
}

impl Sequence {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self { values: values.into(), pos: 0 }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl Rng for Sequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos = self.pos.wrapping_add(1);
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_stays_in_unit_interval() {
        let mut rng = XorShift::new(42);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn xorshift_zero_seed_still_moves() {
        let mut rng = XorShift::new(0);
        let a = rng.next_f64();
        let b = rng.next_f64();
        assert_ne!(a, b);
    }

    #[test]
    fn range_and_chance_use_sample() {
        let mut rng = Sequence::new([0.5, 0.1, 0.9]);
        assert_eq!(rng.range(4000.0, 10000.0), 7000.0);
        assert!(rng.chance(0.2));
        assert!(!rng.chance(0.2));
    }

    #[test]
    fn sequence_cycles() {
        let mut rng = Sequence::new([0.25, 0.75]);
        let got: Vec<f64> = (0..5).map(|_| rng.next_f64()).collect();
        assert_eq!(got, vec![0.25, 0.75, 0.25, 0.75, 0.25]);
        assert_eq!(Sequence::new(Vec::new()).next_f64(), 0.0);
    }
}
