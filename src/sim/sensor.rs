//! Obstacle probes
//!
//! Five rays in a fixed fan around the agent's forward axis. Obstacle hits
//! push the agent away along the surface normal with a random sideways
//! component; being boxed in on three or more probes adds an upward escape.

use glam::{Quat, Vec3};
use rand::Rng;

use super::world::{SpatialQuery, SurfaceKind};
use crate::consts::{BOXED_IN_HITS, ESCAPE_JITTER, ESCAPE_LIFT, MIN_SIDE_LENGTH, PROBE_ANGLE_DEG};
use crate::{WORLD_FORWARD, WORLD_UP, forward_of, right_of, up_of};

/// Number of probes per agent
pub const PROBE_COUNT: usize = 5;

/// One probe's outcome, as consumed by debug overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeReading {
    /// Unit ray direction
    pub direction: Vec3,
    /// Cast length
    pub length: f32,
    /// Distance to the nearest surface, if anything was hit
    pub hit_distance: Option<f32>,
    /// True when the nearest surface is an obstacle
    pub blocked: bool,
}

impl ProbeReading {
    /// Length of the ray segment to draw (up to the hit when blocked)
    pub fn visible_length(&self) -> f32 {
        match (self.blocked, self.hit_distance) {
            (true, Some(d)) => d,
            _ => self.length,
        }
    }
}

/// Sensor output for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub avoidance: Vec3,
    pub hit_count: usize,
    pub probes: [ProbeReading; PROBE_COUNT],
}

impl SensorReading {
    /// At least three of five probes blocked
    pub fn is_boxed_in(&self) -> bool {
        self.hit_count >= BOXED_IN_HITS
    }
}

/// Probe directions in fixed order: forward, yaw -/+, pitch -/+
pub fn probe_directions(orientation: Quat) -> [Vec3; PROBE_COUNT] {
    let forward = forward_of(orientation);
    let up = up_of(orientation);
    let right = right_of(orientation);
    let angle = PROBE_ANGLE_DEG.to_radians();

    [
        forward,
        Quat::from_axis_angle(up, -angle) * forward,
        Quat::from_axis_angle(up, angle) * forward,
        Quat::from_axis_angle(right, -angle) * forward,
        Quat::from_axis_angle(right, angle) * forward,
    ]
}

/// Unit vector along a hit surface, used to slide past obstacles
pub fn side_vector(normal: Vec3) -> Vec3 {
    let side = normal.cross(WORLD_UP);
    if side.length() < MIN_SIDE_LENGTH {
        normal.cross(WORLD_FORWARD).normalize_or_zero()
    } else {
        side.normalize()
    }
}

/// Cast all probes and accumulate the avoidance vector
pub fn sense_obstacles<Q, R>(
    position: Vec3,
    orientation: Quat,
    probe_length: f32,
    world: &Q,
    rng: &mut R,
) -> SensorReading
where
    Q: SpatialQuery + ?Sized,
    R: Rng,
{
    let directions = probe_directions(orientation);
    let mut avoidance = Vec3::ZERO;
    let mut hit_count = 0;

    let probes = directions.map(|direction| {
        let hit = world.cast_ray(position, direction, probe_length);
        let blocked = matches!(hit, Some(h) if h.kind == SurfaceKind::Obstacle);

        if let (true, Some(hit)) = (blocked, hit) {
            hit_count += 1;
            let jitter: f32 = rng.random_range(-1.0..=1.0);
            avoidance += hit.normal + side_vector(hit.normal) * jitter;
        }

        ProbeReading {
            direction,
            length: probe_length,
            hit_distance: hit.map(|h| h.distance),
            blocked,
        }
    });

    if hit_count >= BOXED_IN_HITS {
        let x: f32 = rng.random_range(-ESCAPE_JITTER..=ESCAPE_JITTER);
        let z: f32 = rng.random_range(-ESCAPE_JITTER..=ESCAPE_JITTER);
        avoidance += WORLD_UP * ESCAPE_LIFT + Vec3::new(x, 0.0, z);
        log::trace!("boxed in on {hit_count} probes, adding escape");
    }

    SensorReading {
        avoidance,
        hit_count,
        probes,
    }
}
