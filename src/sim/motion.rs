//! Velocity write-back
//!
//! The steering core only ever hands out a forward velocity per agent; what
//! moves the body is somebody else's business.

use std::collections::BTreeMap;

use glam::Vec3;

use super::agent::{Agent, AgentId};

/// Receives the velocity each agent wants to move at
pub trait MotionSink {
    fn set_forward_velocity(&mut self, id: AgentId, velocity: Vec3);
}

/// Discards every velocity (useful when only orientation matters)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MotionSink for NullSink {
    fn set_forward_velocity(&mut self, _id: AgentId, _velocity: Vec3) {}
}

/// Explicit Euler integration with no collision response
#[derive(Debug, Default, Clone)]
pub struct KinematicIntegrator {
    velocities: BTreeMap<AgentId, Vec3>,
}

impl KinematicIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last velocity received for an agent
    pub fn velocity(&self, id: AgentId) -> Option<Vec3> {
        self.velocities.get(&id).copied()
    }

    /// Advance every agent that has a pending velocity by `velocity * dt`
    pub fn integrate<'a>(&self, agents: impl IntoIterator<Item = &'a mut Agent>, dt: f32) {
        for agent in agents {
            if let Some(v) = self.velocities.get(&agent.id) {
                agent.position += *v * dt;
            }
        }
    }

    /// Drop velocities of agents that no longer exist
    pub fn retain(&mut self, mut keep: impl FnMut(AgentId) -> bool) {
        self.velocities.retain(|id, _| keep(*id));
    }
}

impl MotionSink for KinematicIntegrator {
    fn set_forward_velocity(&mut self, id: AgentId, velocity: Vec3) {
        self.velocities.insert(id, velocity);
    }
}
