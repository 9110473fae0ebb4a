//! Seeded random helpers for spawn placement and scatter offsets

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;

/// Uniform value in `[min, max)`. A degenerate range yields `min`.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if !(max > min) {
        return min;
    }
    min + rng.random::<f32>() * (max - min)
}

/// Uniform point inside `rect`
pub fn random_point_in<R: Rng + ?Sized>(rng: &mut R, rect: &Rect) -> Vec2 {
    Vec2::new(
        random_range(rng, rect.min_x(), rect.max_x()),
        random_range(rng, rect.min_y(), rect.max_y()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_range_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_range(&mut rng, -3.0, 5.0);
            assert!((-3.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert_eq!(random_range(&mut rng, 4.0, 4.0), 4.0);
        assert_eq!(random_range(&mut rng, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_point_inside_rect() {
        let mut rng = Pcg32::seed_from_u64(99);
        let rect = Rect::new(100.0, -50.0, 300.0, 20.0);
        for _ in 0..1000 {
            assert!(rect.contains(random_point_in(&mut rng, &rect)));
        }
    }

    #[test]
    fn test_same_seed_same_points() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let mut a = Pcg32::seed_from_u64(1);
        let mut b = Pcg32::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(random_point_in(&mut a, &rect), random_point_in(&mut b, &rect));
        }
    }
}
