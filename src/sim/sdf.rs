//! Signed distance functions
//!
//! Obstacle geometry is described by SDFs so rays can be sphere-traced and
//! surface normals recovered from the gradient.

use glam::Vec3;

/// Signed distance to a sphere
#[inline]
pub fn sd_sphere(p: Vec3, center: Vec3, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box
pub fn sd_box(p: Vec3, center: Vec3, half_extents: Vec3) -> f32 {
    let q = (p - center).abs() - half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Signed distance to the walls of a box seen from inside (positive inside)
#[inline]
pub fn sd_arena(p: Vec3, center: Vec3, half_extents: Vec3) -> f32 {
    -sd_box(p, center, half_extents)
}

/// Compute SDF gradient (surface normal) using central differences
pub fn sdf_gradient<F>(p: Vec3, sdf: F) -> Vec3
where
    F: Fn(Vec3) -> f32,
{
    let eps = 1e-3;
    let dx = sdf(p + Vec3::X * eps) - sdf(p - Vec3::X * eps);
    let dy = sdf(p + Vec3::Y * eps) - sdf(p - Vec3::Y * eps);
    let dz = sdf(p + Vec3::Z * eps) - sdf(p - Vec3::Z * eps);
    Vec3::new(dx, dy, dz).normalize_or_zero()
}

/// Bisection rounds used to pin down a contact after an overshooting step
const REFINE_ITERATIONS: usize = 16;

/// Sphere-trace a ray against an SDF.
///
/// Returns the distance along the (unit) direction to the first point where
/// the field drops below `epsilon`, or `None` within `max_distance`. Steps
/// never shrink below `min_step`, so rays skimming a surface keep advancing;
/// when such a step lands inside geometry the contact is refined by
/// bisection back toward the last clear sample.
pub fn raymarch<F>(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    min_step: f32,
    epsilon: f32,
    sdf: F,
) -> Option<f32>
where
    F: Fn(Vec3) -> f32,
{
    if !(max_distance.is_finite() && min_step > 0.0) {
        return None;
    }

    let mut clear = 0.0;
    let mut t = 0.0;

    loop {
        let d = sdf(origin + direction * t);

        if d < epsilon {
            return Some(refine_contact(origin, direction, clear, t, epsilon, &sdf));
        }
        if t >= max_distance {
            return None;
        }

        clear = t;
        t = (t + d.max(min_step)).min(max_distance);
    }
}

/// Shrink `[clear, hit]` onto the first crossing of `epsilon`
fn refine_contact<F>(
    origin: Vec3,
    direction: Vec3,
    mut clear: f32,
    mut hit: f32,
    epsilon: f32,
    sdf: &F,
) -> f32
where
    F: Fn(Vec3) -> f32,
{
    for _ in 0..REFINE_ITERATIONS {
        if hit - clear <= f32::EPSILON {
            break;
        }
        let mid = 0.5 * (clear + hit);
        if sdf(origin + direction * mid) < epsilon {
            hit = mid;
        } else {
            clear = mid;
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sd_sphere() {
        assert!((sd_sphere(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, 1.0) - 2.0).abs() < 1e-6);
        assert!(sd_sphere(Vec3::ZERO, Vec3::ZERO, 1.0) < 0.0);
    }

    #[test]
    fn test_sd_box_faces_and_corner() {
        let half = Vec3::splat(1.0);
        assert!((sd_box(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, half) - 2.0).abs() < 1e-6);
        assert!((sd_box(Vec3::ZERO, Vec3::ZERO, half) + 1.0).abs() < 1e-6);
        let corner = sd_box(Vec3::new(2.0, 2.0, 2.0), Vec3::ZERO, half);
        assert!((corner - 3f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_arena_is_positive_inside() {
        let half = Vec3::splat(10.0);
        assert!((sd_arena(Vec3::new(7.0, 0.0, 0.0), Vec3::ZERO, half) - 3.0).abs() < 1e-6);
        assert!(sd_arena(Vec3::new(11.0, 0.0, 0.0), Vec3::ZERO, half) < 0.0);
    }

    #[test]
    fn test_gradient_points_outward() {
        let n = sdf_gradient(Vec3::new(0.0, 2.0, 0.0), |p| sd_sphere(p, Vec3::ZERO, 1.0));
        assert!((n - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_raymarch_hit_and_miss() {
        let sdf = |p| sd_sphere(p, Vec3::new(0.0, 0.0, 10.0), 2.0);
        let t = raymarch(Vec3::ZERO, Vec3::Z, 20.0, 0.05, 1e-3, sdf).unwrap();
        assert!((t - 8.0).abs() < 1e-2);

        assert!(raymarch(Vec3::ZERO, Vec3::Z, 5.0, 0.05, 1e-3, sdf).is_none());
        assert!(raymarch(Vec3::ZERO, Vec3::X, 20.0, 0.05, 1e-3, sdf).is_none());
    }

    #[test]
    fn test_raymarch_skimming_ray_reaches_far_wall() {
        // Runs 0.02 above the floor of a box the whole way to the +X wall
        let sdf = |p| sd_arena(p, Vec3::ZERO, Vec3::splat(10.0));
        let origin = Vec3::new(0.0, -9.98, 0.0);
        let t = raymarch(origin, Vec3::X, 20.0, 0.05, 1e-3, sdf).unwrap();
        assert!((t - 10.0).abs() < 1e-2);
    }

    #[test]
    fn test_raymarch_overshoot_is_refined_to_surface() {
        // First step of 5 lands on the sphere's center; bisection pulls it back
        let sdf = |p| sd_sphere(p, Vec3::new(0.0, 0.0, 10.0), 2.0);
        let t = raymarch(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 20.0, 5.0, 1e-3, sdf).unwrap();
        assert!((t - 3.0).abs() < 1e-2);
    }

    #[test]
    fn test_raymarch_hit_at_range_end_counts() {
        let sdf = |p| sd_sphere(p, Vec3::new(0.0, 0.0, 10.0), 2.0);
        let t = raymarch(Vec3::ZERO, Vec3::Z, 8.0, 0.05, 1e-3, sdf).unwrap();
        assert!(t <= 8.0 && t > 7.9);
        assert!(raymarch(Vec3::ZERO, Vec3::Z, 7.9, 0.05, 1e-3, sdf).is_none());
    }

    #[test]
    fn test_raymarch_rejects_unbounded_range() {
        let sdf = |p| sd_sphere(p, Vec3::new(0.0, 0.0, 10.0), 2.0);
        assert!(raymarch(Vec3::ZERO, Vec3::Z, f32::INFINITY, 0.05, 1e-3, sdf).is_none());
        assert!(raymarch(Vec3::ZERO, Vec3::Z, 20.0, 0.0, 1e-3, sdf).is_none());
    }
}
