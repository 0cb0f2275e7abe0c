//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use algo_ta::inputs::{Inputs, Role};

/// A seeded OHLCV random walk plus two 0/1 signal columns.
pub struct Market {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub reference: Vec<f64>,
    pub primary: Vec<f64>,
    pub secondary: Vec<f64>,
}

impl Market {
    pub fn random_walk(n: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut price = 100.0_f64;
        let mut m = Self {
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
            reference: Vec::with_capacity(n),
            primary: Vec::with_capacity(n),
            secondary: Vec::with_capacity(n),
        };
        for _ in 0..n {
            let open = price;
            price = (price * (1.0 + rng.gen_range(-0.02..0.02))).max(1.0);
            let close = price;
            let wick = open.max(close) * rng.gen_range(0.0..0.01);
            let tail = open.min(close) * rng.gen_range(0.0..0.01);
            m.open.push(open);
            m.high.push(open.max(close) + wick);
            m.low.push(open.min(close) - tail);
            m.close.push(close);
            m.volume.push(rng.gen_range(1_000.0..50_000.0));
            m.reference.push(close * rng.gen_range(0.98..1.02));
            m.primary.push(if rng.gen_bool(0.2) { 1.0 } else { 0.0 });
            m.secondary.push(if rng.gen_bool(0.2) { 1.0 } else { 0.0 });
        }
        m
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Every role bound; `Condition` reuses the primary signal.
    pub fn inputs(&self) -> Inputs<'_, f64> {
        Inputs::ohlcv(&self.open, &self.high, &self.low, &self.close, &self.volume)
            .with(Role::Reference, &self.reference)
            .with(Role::Primary, &self.primary)
            .with(Role::Secondary, &self.secondary)
            .with(Role::Condition, &self.primary)
    }
}

/// Seeded random walk of closes only.
pub fn walk(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut price = 100.0_f64;
    (0..n)
        .map(|_| {
            price += rng.gen_range(-1.0..1.0);
            price
        })
        .collect()
}

/// Max absolute difference over positions where both sides are finite; NaN
/// positions must agree.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    let mut worst = 0.0_f64;
    for (i, (&x, &y)) in a.iter().zip(b).enumerate() {
        assert_eq!(x.is_nan(), y.is_nan(), "NaN mismatch at {i}: {x} vs {y}");
        if x.is_finite() && y.is_finite() {
            worst = worst.max((x - y).abs());
        }
    }
    worst
}

pub fn bits(a: &[f64]) -> Vec<u64> {
    a.iter().map(|v| v.to_bits()).collect()
}
