//! Reference world
//!
//! Static SDF obstacles plus the per-step agent snapshot, answering the
//! neighbor and probe queries the simulation consumes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::agent::AgentId;
use super::sdf::{raymarch, sd_arena, sd_box, sd_sphere, sdf_gradient};
use super::world::{Neighbor, RayHit, SpatialQuery, SurfaceKind};
use crate::error::ConfigError;

/// Smallest sphere tracing step; well under the thinnest geometry (agent spheres)
pub const MIN_MARCH_STEP: f32 = 0.05;
/// Field value treated as a surface contact
pub const HIT_EPSILON: f32 = 1e-3;

/// Obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Sphere { center: Vec3, radius: f32 },
    Cuboid { center: Vec3, half_extents: Vec3 },
    /// Inside of a box; walls face inward
    Arena { center: Vec3, half_extents: Vec3 },
}

impl Shape {
    /// Signed distance from `p` to the surface
    pub fn distance(&self, p: Vec3) -> f32 {
        match *self {
            Shape::Sphere { center, radius } => sd_sphere(p, center, radius),
            Shape::Cuboid {
                center,
                half_extents,
            } => sd_box(p, center, half_extents),
            Shape::Arena {
                center,
                half_extents,
            } => sd_arena(p, center, half_extents),
        }
    }

    /// Reject shapes that would vanish from the distance field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (center, size, name) = match *self {
            Shape::Sphere { center, radius } => (center, Vec3::splat(radius), "sphere radius"),
            Shape::Cuboid {
                center,
                half_extents,
            } => (center, half_extents, "cuboid half_extents"),
            Shape::Arena {
                center,
                half_extents,
            } => (center, half_extents, "arena half_extents"),
        };
        if !center.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "obstacle center",
            });
        }
        if !size.is_finite() {
            return Err(ConfigError::NonFinite { name });
        }
        let value = size.min_element();
        if value <= 0.0 {
            return Err(ConfigError::NonPositive { name, value });
        }
        Ok(())
    }

    /// Outward (free-space facing) normal near `p`
    pub fn normal(&self, p: Vec3) -> Vec3 {
        match *self {
            Shape::Sphere { center, .. } => (p - center).normalize_or_zero(),
            _ => sdf_gradient(p, |q| self.distance(q)),
        }
    }
}

/// Static obstacle layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub obstacles: Vec<Shape>,
}

impl Scene {
    pub fn new(obstacles: Vec<Shape>) -> Self {
        Self { obstacles }
    }

    /// Closed box with a row of pillars and a floating sphere
    pub fn arena_with_pillars(half_extents: Vec3) -> Self {
        let pillar = Vec3::new(2.0, half_extents.y, 2.0);
        let spacing = half_extents.x / 2.0;
        let mut obstacles = vec![Shape::Arena {
            center: Vec3::ZERO,
            half_extents,
        }];
        for i in -1..=1 {
            obstacles.push(Shape::Cuboid {
                center: Vec3::new(i as f32 * spacing, 0.0, half_extents.z / 3.0),
                half_extents: pillar,
            });
        }
        obstacles.push(Shape::Sphere {
            center: Vec3::new(0.0, 0.0, -half_extents.z / 3.0),
            radius: half_extents.y / 3.0,
        });
        Self { obstacles }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.obstacles.iter().try_for_each(Shape::validate)
    }

    /// Distance to the nearest obstacle surface
    pub fn distance(&self, p: Vec3) -> f32 {
        self.obstacles
            .iter()
            .map(|s| s.distance(p))
            .fold(f32::INFINITY, f32::min)
    }

    /// True when `p` is in free space
    pub fn is_free(&self, p: Vec3) -> bool {
        self.distance(p) > 0.0
    }

    /// Query view combining the obstacles with this step's agent snapshot
    pub fn view<'a>(&'a self, agents: &'a [Neighbor], agent_radius: f32) -> SceneView<'a> {
        SceneView {
            scene: self,
            agents,
            agent_radius,
        }
    }
}

/// Scene plus a read-only agent snapshot
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub scene: &'a Scene,
    pub agents: &'a [Neighbor],
    /// Agents are ray targets as spheres of this radius
    pub agent_radius: f32,
}

impl SceneView<'_> {
    /// Agent spheres a ray could touch; spheres containing the origin are skipped
    fn agent_targets(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<Vec3> {
        let r = self.agent_radius;
        self.agents
            .iter()
            .map(|a| a.position)
            .filter(|&c| {
                if c.distance_squared(origin) <= r * r {
                    return false;
                }
                let t = (c - origin).dot(direction).clamp(0.0, max_distance);
                c.distance_squared(origin + direction * t) <= r * r
            })
            .collect()
    }
}

impl SpatialQuery for SceneView<'_> {
    fn find_neighbors(&self, self_id: AgentId, position: Vec3, radius: f32) -> Vec<Neighbor> {
        let radius_sq = radius * radius;
        self.agents
            .iter()
            .filter(|a| a.id != self_id && a.position.distance_squared(position) <= radius_sq)
            .copied()
            .collect()
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || !(max_distance > 0.0 && max_distance.is_finite()) {
            return None;
        }

        let targets = self.agent_targets(origin, direction, max_distance);
        let r = self.agent_radius;
        let agent_distance = |p: Vec3| {
            targets
                .iter()
                .map(|&c| sd_sphere(p, c, r))
                .fold(f32::INFINITY, f32::min)
        };

        let t = raymarch(
            origin,
            direction,
            max_distance,
            MIN_MARCH_STEP,
            HIT_EPSILON,
            |p| self.scene.distance(p).min(agent_distance(p)),
        )?;
        let point = origin + direction * t;

        // Classify by whichever surface is closest at the contact
        let nearest_obstacle = self
            .scene
            .obstacles
            .iter()
            .min_by(|a, b| a.distance(point).total_cmp(&b.distance(point)));
        let obstacle_distance = nearest_obstacle.map_or(f32::INFINITY, |s| s.distance(point));

        let (kind, normal) = match nearest_obstacle {
            Some(shape) if obstacle_distance <= agent_distance(point) => {
                (SurfaceKind::Obstacle, shape.normal(point))
            }
            _ => {
                let center = targets
                    .iter()
                    .copied()
                    .min_by(|a, b| a.distance_squared(point).total_cmp(&b.distance_squared(point)))?;
                (SurfaceKind::Agent, (point - center).normalize_or_zero())
            }
        };

        Some(RayHit {
            distance: t,
            point,
            normal,
            kind,
        })
    }
}
