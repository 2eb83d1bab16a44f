//! Salt-and-pepper noise.
//!
//! Randomness comes from a caller-owned [`NoiseRng`], so the filter itself is
//! deterministic for a given generator state. [`SimpleRng`] is a seedable
//! generator for reproducible output; tests can script their own.

use ndarray::Array2;

use crate::error::{ImgProcError, Result};

/// Fraction of pixels hit when the caller does not pick one.
pub const DEFAULT_NOISE_AMOUNT: f64 = 0.02;

/// Source of randomness for noise filters.
pub trait NoiseRng {
    /// Uniform integer in `0..upper`. `upper` is never 0.
    fn next_index(&mut self, upper: usize) -> usize;

    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: NoiseRng + ?Sized> NoiseRng for &mut R {
    fn next_index(&mut self, upper: usize) -> usize {
        (**self).next_index(upper)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

// ============================================================================
// Simple RNG (deterministic, seedable)
// ============================================================================

/// Linear congruential generator with MINSTD parameters.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    const MODULUS: u64 = 2147483647;

    pub fn new(seed: u64) -> Self {
        SimpleRng {
            state: seed.wrapping_add(1), // Avoid zero
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(48271).wrapping_add(1) % Self::MODULUS;
        self.state as u32
    }
}

impl NoiseRng for SimpleRng {
    fn next_index(&mut self, upper: usize) -> usize {
        (self.next_unit() * upper as f64) as usize % upper
    }

    fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / Self::MODULUS as f64
    }
}

// ============================================================================
// Salt and pepper
// ============================================================================

/// Number of mutations `salt_and_pepper` performs on a grid.
pub fn noise_pixel_count(height: usize, width: usize, amount: f64) -> usize {
    (height as f64 * width as f64 * amount) as usize
}

/// Scatter black and white pixels over the grid, in place.
///
/// Performs exactly `floor(height * width * amount)` mutations. Each picks a
/// row, then a column, uniformly with replacement, then sets the pixel to 0
/// when the generator's next unit float is below 0.5 and to 255 otherwise.
/// Because picks may repeat, fewer distinct pixels than that may change.
///
/// # Arguments
/// * `grid` - Luma grid, mutated in place
/// * `amount` - Fraction in [0, 1]
/// * `rng` - Caller-owned randomness
///
/// # Returns
/// Number of mutations performed
pub fn salt_and_pepper<R: NoiseRng + ?Sized>(
    grid: &mut Array2<f64>,
    amount: f64,
    rng: &mut R,
) -> Result<usize> {
    if !(0.0..=1.0).contains(&amount) {
        return Err(ImgProcError::param(
            "amount",
            format!("{amount} is outside [0, 1]"),
        ));
    }

    let (height, width) = grid.dim();
    let count = noise_pixel_count(height, width, amount);

    log::debug!("salt and pepper {height}x{width} amount={amount}: {count} pixels");

    for _ in 0..count {
        let y = rng.next_index(height);
        let x = rng.next_index(width);
        grid[[y, x]] = if rng.next_unit() < 0.5 { 0.0 } else { 255.0 };
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Generator replaying a fixed script of draws.
    #[derive(Default)]
    struct ScriptedRng {
        indices: VecDeque<usize>,
        units: VecDeque<f64>,
        index_calls: usize,
        unit_calls: usize,
    }

    impl NoiseRng for ScriptedRng {
        fn next_index(&mut self, upper: usize) -> usize {
            self.index_calls += 1;
            let v = self.indices.pop_front().expect("script exhausted");
            assert!(v < upper);
            v
        }

        fn next_unit(&mut self) -> f64 {
            self.unit_calls += 1;
            self.units.pop_front().expect("script exhausted")
        }
    }

    #[test]
    fn test_scripted_half_amount() {
        let mut grid = Array2::<f64>::from_elem((2, 3), 100.0);
        let mut rng = ScriptedRng {
            // (row, col) pairs; (1, 2) repeats
            indices: VecDeque::from(vec![0, 0, 1, 2, 1, 2]),
            units: VecDeque::from(vec![0.1, 0.7, 0.2]),
            ..Default::default()
        };

        let count = salt_and_pepper(&mut grid, 0.5, &mut rng).unwrap();

        assert_eq!(count, 3);
        assert_eq!(rng.index_calls, 6);
        assert_eq!(rng.unit_calls, 3);
        assert_eq!(grid[[0, 0]], 0.0);
        // second hit on (1, 2) wins
        assert_eq!(grid[[1, 2]], 0.0);
        assert_eq!(grid[[0, 1]], 100.0);
        assert_eq!(grid.iter().filter(|&&v| v == 100.0).count(), 4);
    }

    #[test]
    fn test_boundary_unit_is_salt() {
        let mut grid = Array2::<f64>::zeros((1, 1));
        let mut rng = ScriptedRng {
            indices: VecDeque::from(vec![0, 0]),
            units: VecDeque::from(vec![0.5]),
            ..Default::default()
        };
        salt_and_pepper(&mut grid, 1.0, &mut rng).unwrap();
        assert_eq!(grid[[0, 0]], 255.0);
    }

    #[test]
    fn test_count_is_floored() {
        assert_eq!(noise_pixel_count(10, 10, 0.02), 2);
        assert_eq!(noise_pixel_count(3, 3, 0.5), 4);
        assert_eq!(noise_pixel_count(0, 5, 1.0), 0);
    }

    #[test]
    fn test_zero_amount_untouched() {
        let mut grid = Array2::<f64>::from_elem((4, 4), 9.0);
        let mut rng = ScriptedRng::default();
        assert_eq!(salt_and_pepper(&mut grid, 0.0, &mut rng).unwrap(), 0);
        assert!(grid.iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_amount_out_of_range_rejected() {
        let mut grid = Array2::<f64>::from_elem((4, 4), 9.0);
        let mut rng = SimpleRng::new(1);
        assert!(salt_and_pepper(&mut grid, 1.5, &mut rng).unwrap_err().is_invalid_parameter());
        assert!(salt_and_pepper(&mut grid, -0.1, &mut rng).unwrap_err().is_invalid_parameter());
        assert!(salt_and_pepper(&mut grid, f64::NAN, &mut rng).unwrap_err().is_invalid_parameter());
        assert!(grid.iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let mut a = Array2::<f64>::from_elem((20, 20), 128.0);
        let mut b = a.clone();
        salt_and_pepper(&mut a, 0.1, &mut SimpleRng::new(42)).unwrap();
        salt_and_pepper(&mut b, 0.1, &mut SimpleRng::new(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_rng_statistics() {
        let mut grid = Array2::<f64>::from_elem((100, 100), 128.0);
        let count = salt_and_pepper(&mut grid, 0.2, &mut SimpleRng::new(7)).unwrap();
        assert_eq!(count, 2000);

        let changed = grid.iter().filter(|&&v| v != 128.0).count();
        let salt = grid.iter().filter(|&&v| v == 255.0).count();
        let pepper = grid.iter().filter(|&&v| v == 0.0).count();

        assert_eq!(changed, salt + pepper);
        // with replacement: at most `count`, expected ~1813 distinct
        assert!(changed <= count);
        assert!(changed > 1600, "changed={changed}");
        assert!(salt > 700 && pepper > 700, "salt={salt} pepper={pepper}");
    }

    #[test]
    fn test_simple_rng_ranges() {
        let mut rng = SimpleRng::new(3);
        for _ in 0..1000 {
            let u = rng.next_unit();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.next_index(7) < 7);
        }
    }
}
