use rand::{Rng, RngCore};

pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo + 1).max(1) as f64;
        lo + (self.next_unit() * span).floor() as i32
    }

    fn byte(&mut self) -> u32 {
        (self.next_unit() * 256.0).floor() as u32
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then keeps returning `fallback`.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    values: Vec<f64>,
    cursor: usize,
    fallback: f64,
}

impl ScriptedRng {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self::with_fallback(values, 0.0)
    }

    pub fn with_fallback(values: impl Into<Vec<f64>>, fallback: f64) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
            fallback,
        }
    }

    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let value = self.values.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn scripted_rng_replays_then_falls_back() {
        let mut rng = ScriptedRng::with_fallback(vec![0.25, 0.75], 0.5);
        assert_eq!(rng.next_unit(), 0.25);
        assert_eq!(rng.next_unit(), 0.75);
        assert_eq!(rng.next_unit(), 0.5);
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn range_inclusive_covers_both_ends() {
        let mut low = ScriptedRng::new(vec![0.0]);
        let mut high = ScriptedRng::new(vec![0.999]);
        assert_eq!(low.range_inclusive(9, 16), 9);
        assert_eq!(high.range_inclusive(9, 16), 16);
    }

    #[test]
    fn small_rng_stays_in_unit_interval() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.byte() <= 255);
        }
    }
}
