//! Spatial query contract
//!
//! The simulation never looks anything up ambiently: whatever answers
//! neighbor and ray queries is passed into each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::agent::AgentId;

/// What a ray struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    Obstacle,
    Agent,
}

/// Nearest intersection along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f32,
    pub point: Vec3,
    /// Unit surface normal at the hit point
    pub normal: Vec3,
    pub kind: SurfaceKind,
}

/// Read-only snapshot of another agent, taken before the current step writes anything
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: AgentId,
    pub position: Vec3,
    /// Unit forward direction
    pub forward: Vec3,
}

/// Neighbor gathering and probe ray casts
pub trait SpatialQuery {
    /// Agents other than `self_id` within `radius` of `position` (no ordering guarantee)
    fn find_neighbors(&self, self_id: AgentId, position: Vec3, radius: f32) -> Vec<Neighbor>;

    /// Nearest surface along `direction` within `max_distance`, if any
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}
