//! Flocking rules
//!
//! Separation, alignment and cohesion from a neighbor snapshot, blended with
//! obstacle avoidance and a forward bias into one desired heading.

use glam::Vec3;

use super::agent::SteeringStrengths;
use super::world::Neighbor;
use crate::consts::{SEPARATION_MIN_DISTANCE, SEPARATION_RADIUS_FACTOR};

/// The three neighbor-driven steering vectors
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringForces {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
}

/// Push away from close-range neighbors, weighted by inverse distance.
///
/// Only neighbors with `0.1 < d < neighbor_radius * 0.5` contribute.
pub fn separation(position: Vec3, neighbors: &[Neighbor], neighbor_radius: f32) -> Vec3 {
    let max_distance = neighbor_radius * SEPARATION_RADIUS_FACTOR;
    neighbors
        .iter()
        .filter_map(|n| {
            let offset = position - n.position;
            let d = offset.length();
            (d > SEPARATION_MIN_DISTANCE && d < max_distance).then(|| offset / d / d)
        })
        .sum()
}

/// Mean neighbor forward direction, normalized (zero with no neighbors)
pub fn alignment(neighbors: &[Neighbor]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = neighbors.iter().map(|n| n.forward).sum();
    (sum / neighbors.len() as f32).normalize_or_zero()
}

/// Unit vector toward the neighbor centroid (zero with no neighbors)
pub fn cohesion(position: Vec3, neighbors: &[Neighbor]) -> Vec3 {
    if neighbors.is_empty() {
        return Vec3::ZERO;
    }
    let sum: Vec3 = neighbors.iter().map(|n| n.position).sum();
    let centroid = sum / neighbors.len() as f32;
    (centroid - position).normalize_or_zero()
}

/// All three neighbor rules at once
pub fn flocking_forces(position: Vec3, neighbors: &[Neighbor], neighbor_radius: f32) -> SteeringForces {
    SteeringForces {
        separation: separation(position, neighbors, neighbor_radius),
        alignment: alignment(neighbors),
        cohesion: cohesion(position, neighbors),
    }
}

/// Weighted blend of all steering inputs plus the current forward.
///
/// Returns `None` when the blend cancels out exactly; the agent then keeps
/// its orientation for this tick.
pub fn desired_heading(
    forward: Vec3,
    forces: &SteeringForces,
    avoidance: Vec3,
    strengths: &SteeringStrengths,
) -> Option<Vec3> {
    let heading = forward
        + forces.separation * strengths.separation
        + forces.alignment * strengths.alignment
        + forces.cohesion * strengths.cohesion
        + avoidance * strengths.avoidance;

    (heading != Vec3::ZERO).then_some(heading)
}
