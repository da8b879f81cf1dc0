//! Inclusive bounds for range generators.

use rand::distr::uniform::SampleUniform;
use rand::Rng;

/// An inclusive `min..=max` range known to be non-empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    min: T,
    max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// `None` unless `min <= max`. Unordered values (NaN) are rejected.
    pub fn new(min: T, max: T) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(&self) -> T {
        self.min
    }

    pub fn max(&self) -> T {
        self.max
    }
}

impl Bounds<f64> {
    /// Like [`Bounds::new`], additionally rejecting infinite bounds, which
    /// cannot be sampled.
    pub fn finite(min: f64, max: f64) -> Option<Self> {
        Self::new(min, max).filter(|_| min.is_finite() && max.is_finite())
    }
}

impl<T: SampleUniform + PartialOrd + Copy> Bounds<T> {
    /// Draw a value uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.random_range(self.min..=self.max)
    }
}

/// Render a decimal with a fixed number of fractional digits.
pub fn format_decimal(value: f64, scale: usize) -> String {
    format!("{value:.scale$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_bounds_rejected() {
        assert!(Bounds::new(5, 1).is_none());
        assert!(Bounds::new(1.0, f64::NAN).is_none());
        assert!(Bounds::finite(0.0, f64::INFINITY).is_none());
        assert_eq!(Bounds::new(3, 3).map(|b| (b.min(), b.max())), Some((3, 3)));
    }

    #[test]
    fn test_sample_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let ints = Bounds::new(10i64, 20).unwrap();
        let floats = Bounds::finite(0.0, 100.0).unwrap();

        for _ in 0..100 {
            assert!((10..=20).contains(&ints.sample(&mut rng)));
            assert!((0.0..=100.0).contains(&floats.sample(&mut rng)));
        }
    }

    #[test]
    fn test_single_point_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Bounds::new(u64::MAX, u64::MAX).unwrap();
        assert_eq!(bounds.sample(&mut rng), u64::MAX);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(12.346, 2), "12.35");
        assert_eq!(format_decimal(7.0, 2), "7.00");
        assert_eq!(format_decimal(-3.14159, 3), "-3.142");
    }
}
