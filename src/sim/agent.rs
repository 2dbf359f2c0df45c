//! Agent state and tunable parameters
//!
//! An agent owns all of its mutable state; nothing outside its own tick
//! writes to it.

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::stuck::StuckDetector;
use crate::error::ConfigError;
use crate::forward_of;

/// Stable agent identifier (iteration order within a flock)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Weights applied when blending steering vectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringStrengths {
    pub separation: f32,
    pub alignment: f32,
    pub cohesion: f32,
    pub avoidance: f32,
}

impl Default for SteeringStrengths {
    fn default() -> Self {
        Self {
            separation: 1.5,
            alignment: 0.5,
            cohesion: 0.3,
            avoidance: 1.0,
        }
    }
}

/// Per-agent tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    /// Constant forward speed (units/s)
    pub speed: f32,
    /// Neighbor gathering radius
    pub neighbor_radius: f32,
    /// Length of each obstacle probe ray
    pub probe_length: f32,
    pub strengths: SteeringStrengths,
    /// Displacement below which the agent counts as stalled
    pub stuck_radius: f32,
    /// Stall duration (seconds) that triggers a reversal
    pub stuck_time_limit: f32,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            speed: 10.0,
            neighbor_radius: 10.0,
            probe_length: 20.0,
            strengths: SteeringStrengths::default(),
            stuck_radius: 2.0,
            stuck_time_limit: 3.0,
        }
    }
}

impl AgentParams {
    /// Reject non-finite, non-positive ranges and negative weights
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("speed", self.speed)?;
        positive("neighbor_radius", self.neighbor_radius)?;
        positive("probe_length", self.probe_length)?;
        positive("stuck_radius", self.stuck_radius)?;
        positive("stuck_time_limit", self.stuck_time_limit)?;

        let s = &self.strengths;
        non_negative("separation strength", s.separation)?;
        non_negative("alignment strength", s.alignment)?;
        non_negative("cohesion strength", s.cohesion)?;
        non_negative("avoidance strength", s.avoidance)?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}

/// A single boid
///
/// Only serialized (for run dumps); agents are always built through
/// [`Agent::new`] so their parameters are validated.
#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    pub id: AgentId,
    /// World position (advanced by the external integrator)
    pub position: Vec3,
    /// Unit rotation; local +Z is forward
    pub orientation: Quat,
    /// Last velocity handed to the motion sink
    pub velocity: Vec3,
    pub params: AgentParams,
    pub stuck: StuckDetector,
}

impl Agent {
    pub fn new(
        id: AgentId,
        position: Vec3,
        orientation: Quat,
        params: AgentParams,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        if !position.is_finite() {
            return Err(ConfigError::NonFinite { name: "position" });
        }
        if !orientation.is_finite() || orientation.length_squared() < f32::EPSILON {
            return Err(ConfigError::NonFinite { name: "orientation" });
        }

        Ok(Self {
            id,
            position,
            orientation: orientation.normalize(),
            velocity: Vec3::ZERO,
            params,
            stuck: StuckDetector::new(position),
        })
    }

    /// Current forward direction
    #[inline]
    pub fn forward(&self) -> Vec3 {
        forward_of(self.orientation)
    }
}
