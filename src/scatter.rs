//! Pre-baked unit-disk offsets for trail dot clusters.

use rand::Rng;
use std::f32::consts::TAU;

use crate::types::Point2;

/// A `slots × dots_per_slot` table of offsets inside the unit disk.
///
/// Generated once and never mutated, so a trail point that keeps its slot
/// keeps the exact same dot shape on every frame.
#[derive(Debug, Clone)]
pub struct ScatterTable {
    offsets: Vec<Point2>,
    dots_per_slot: usize,
}

impl ScatterTable {
    /// Sample a new table with uniform-disk sampling: angle uniform in
    /// `[0, 2π)`, radius `sqrt(u)` so density does not pile up at the center.
    pub fn generate<R: Rng + ?Sized>(slots: usize, dots_per_slot: usize, rng: &mut R) -> Self {
        let offsets = (0..slots * dots_per_slot)
            .map(|_| sample_unit_disk(rng))
            .collect();
        Self {
            offsets,
            dots_per_slot,
        }
    }

    /// Number of slots in the table.
    pub fn slots(&self) -> usize {
        if self.dots_per_slot == 0 {
            0
        } else {
            self.offsets.len() / self.dots_per_slot
        }
    }

    pub fn dots_per_slot(&self) -> usize {
        self.dots_per_slot
    }

    /// Offsets for `slot`, wrapping around the table size.
    pub fn slot(&self, slot: usize) -> &[Point2] {
        let slots = self.slots();
        if slots == 0 {
            return &[];
        }
        let start = (slot % slots) * self.dots_per_slot;
        &self.offsets[start..start + self.dots_per_slot]
    }
}

/// One uniformly distributed point in the unit disk.
pub fn sample_unit_disk<R: Rng + ?Sized>(rng: &mut R) -> Point2 {
    let angle = rng.gen::<f32>() * TAU;
    let r = rng.gen::<f32>().sqrt();
    Point2::new(angle.cos() * r, angle.sin() * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_table_shape_and_wrapping() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = ScatterTable::generate(90, 10, &mut rng);
        assert_eq!(table.slots(), 90);
        assert_eq!(table.slot(3).len(), 10);
        assert_eq!(table.slot(3), table.slot(93));
        assert!(table
            .slot(0)
            .iter()
            .all(|p| p.distance_sq(Point2::default()) <= 1.0 + 1e-6));
    }

    #[test]
    fn test_empty_table_yields_no_offsets() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = ScatterTable::generate(0, 10, &mut rng);
        assert_eq!(table.slots(), 0);
        assert!(table.slot(5).is_empty());
    }

    #[test]
    fn test_disk_sampling_is_uniform() {
        let mut rng = StdRng::seed_from_u64(0xD15C);
        const N: usize = 40_000;
        const BINS: usize = 10;
        let mut radius_bins = [0usize; BINS];
        let mut angle_bins = [0usize; BINS];

        for _ in 0..N {
            let p = sample_unit_disk(&mut rng);
            let r_sq = p.x * p.x + p.y * p.y;
            radius_bins[((r_sq * BINS as f32) as usize).min(BINS - 1)] += 1;

            let angle = p.y.atan2(p.x).rem_euclid(TAU);
            angle_bins[((angle / TAU * BINS as f32) as usize).min(BINS - 1)] += 1;
        }

        // Chi-squared against a flat distribution, 9 degrees of freedom.
        // The 0.999 quantile is ~27.9.
        let expected = N as f64 / BINS as f64;
        let chi_sq = |bins: &[usize]| -> f64 {
            bins.iter()
                .map(|&o| (o as f64 - expected).powi(2) / expected)
                .sum()
        };
        assert!(chi_sq(&radius_bins) < 27.9, "radius² bins {:?}", radius_bins);
        assert!(chi_sq(&angle_bins) < 27.9, "angle bins {:?}", angle_bins);
    }
}
