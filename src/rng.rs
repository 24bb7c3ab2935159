//! Distributions & seeded RNG (C8): a Mulberry32-variant PRNG and the
//! four sampling primitives the uncertainty spec (C9) composes. The
//! PRNG step is specified down to the 32-bit wrapping operation —
//! cross-language seed equivalence depends on not deviating from it.

use std::f64::consts::PI;

/// ε-floor applied to Box-Muller's `u1` draw to avoid `ln(0)`.
const BOX_MULLER_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// One Mulberry32-variant step in 32-bit wrapping arithmetic.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let s = self.state;
        let t0 = (s ^ (s >> 15)).wrapping_mul(1 | s);
        let t1 = (t0.wrapping_add((t0 ^ (t0 >> 7)).wrapping_mul(61 | t0))) ^ t0;
        t1 ^ (t1 >> 14)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4294967296.0
    }

    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Box-Muller normal sample using two consecutive draws.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(BOX_MULLER_EPSILON);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }

    /// Lognormal sample parameterized by the desired arithmetic mean
    /// and coefficient of variation.
    pub fn lognormal(&mut self, mean: f64, cv: f64) -> f64 {
        let sigma_ln = (1.0 + cv * cv).ln().sqrt();
        let mu_ln = mean.ln() - sigma_ln * sigma_ln / 2.0;
        self.normal(mu_ln, sigma_ln).exp()
    }

    /// Triangular(min, mode, max) via inverse-CDF with the break at
    /// `(mode-min)/(max-min)`.
    pub fn triangular(&mut self, min: f64, mode: f64, max: f64) -> f64 {
        let u = self.next_f64();
        let range = max - min;
        let break_point = (mode - min) / range;
        if u < break_point {
            min + (u * range * (mode - min)).sqrt()
        } else {
            max - ((1.0 - u) * range * (max - mode)).sqrt()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_identical_sequence() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        let seq_a: Vec<u32> = (0..20).map(|_| a.next_u32()).collect();
        let seq_b: Vec<u32> = (0..20).map(|_| b.next_u32()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(2);
        assert_ne!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn uniform_draws_stay_within_unit_interval() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn uniform_respects_bounds() {
        let mut rng = Rng::new(9);
        for _ in 0..500 {
            let v = rng.uniform(10.0, 20.0);
            assert!((10.0..20.0).contains(&v));
        }
    }

    #[test]
    fn triangular_respects_bounds() {
        let mut rng = Rng::new(11);
        for _ in 0..500 {
            let v = rng.triangular(5.0, 8.0, 20.0);
            assert!(v >= 5.0 && v <= 20.0);
        }
    }

    #[test]
    fn lognormal_is_always_positive() {
        let mut rng = Rng::new(13);
        for _ in 0..500 {
            assert!(rng.lognormal(100.0, 0.3) > 0.0);
        }
    }
}
