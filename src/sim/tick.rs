//! Fixed timestep simulation tick
//!
//! One agent's tick runs query → sense → steer → stall check → reorient →
//! velocity. The flock runs every agent's tick against a snapshot taken
//! before anything moves, so update order never leaks into the result.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::agent::{Agent, AgentId, AgentParams};
use super::motion::MotionSink;
use super::orient::{forward_velocity, look_rotation, reverse_yaw, turn_toward};
use super::scene::Scene;
use super::sensor::{SensorReading, sense_obstacles};
use super::steering::{SteeringForces, desired_heading, flocking_forces};
use super::stuck::StuckStatus;
use super::world::{Neighbor, SpatialQuery};
use crate::WORLD_UP;
use crate::consts::AGENT_RADIUS;
use crate::error::ConfigError;

/// Everything one agent decided during a tick (read-only, for stats and overlays)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub id: AgentId,
    pub neighbor_count: usize,
    pub forces: SteeringForces,
    pub sensor: SensorReading,
    /// Blended heading, `None` when it cancelled to zero
    pub heading: Option<Vec3>,
    pub stuck: StuckStatus,
    pub velocity: Vec3,
}

impl TickOutcome {
    /// True when the stall detector turned the agent around this tick
    pub fn reversed(&self) -> bool {
        self.stuck == StuckStatus::Reverse
    }
}

/// Advance one agent by `dt`.
///
/// Only `agent` is written; `world` must answer from the previous committed
/// state of every other agent.
pub fn tick_agent<Q, R>(agent: &mut Agent, world: &Q, dt: f32, rng: &mut R) -> TickOutcome
where
    Q: SpatialQuery + ?Sized,
    R: Rng,
{
    let params = agent.params;

    let neighbors = world.find_neighbors(agent.id, agent.position, params.neighbor_radius);
    let forces = flocking_forces(agent.position, &neighbors, params.neighbor_radius);

    let sensor = sense_obstacles(
        agent.position,
        agent.orientation,
        params.probe_length,
        world,
        rng,
    );

    let heading = desired_heading(agent.forward(), &forces, sensor.avoidance, &params.strengths);

    // The heading stays as computed; a reversal only changes where turning starts from
    let stuck = agent.stuck.update(
        agent.position,
        dt,
        params.stuck_radius,
        params.stuck_time_limit,
    );
    if stuck == StuckStatus::Reverse {
        agent.orientation = reverse_yaw(agent.orientation);
        log::debug!("agent {} stalled at {:?}, turning around", agent.id, agent.position);
    }

    if let Some(heading) = heading {
        agent.orientation = turn_toward(agent.orientation, heading, dt);
    }

    agent.velocity = forward_velocity(agent.orientation, params.speed);

    TickOutcome {
        id: agent.id,
        neighbor_count: neighbors.len(),
        forces,
        sensor,
        heading,
        stuck,
        velocity: agent.velocity,
    }
}

/// Results of one flock step, in agent id order
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub outcomes: Vec<TickOutcome>,
}

impl StepReport {
    pub fn reversals(&self) -> usize {
        self.outcomes.iter().filter(|o| o.reversed()).count()
    }

    pub fn boxed_in(&self) -> usize {
        self.outcomes.iter().filter(|o| o.sensor.is_boxed_in()).count()
    }

    pub fn mean_neighbors(&self) -> f32 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let total: usize = self.outcomes.iter().map(|o| o.neighbor_count).sum();
        total as f32 / self.outcomes.len() as f32
    }
}

/// A collection of agents advanced together with one seeded RNG
#[derive(Debug, Clone)]
pub struct Flock {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Agents (sorted by id for determinism)
    agents: Vec<Agent>,
    rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Stall reversals since creation
    pub total_reversals: u64,
    /// Previous-step agent state, reused between steps
    snapshot: Vec<Neighbor>,
    next_id: u32,
}

impl Flock {
    /// Create an empty flock with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            agents: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            total_reversals: 0,
            snapshot: Vec::new(),
            next_id: 1,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access for the external integrator
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.agents[i])
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Insert an already constructed agent
    pub fn add_agent(&mut self, agent: Agent) -> Result<(), ConfigError> {
        match self.agents.binary_search_by_key(&agent.id, |a| a.id) {
            Ok(_) => Err(ConfigError::DuplicateAgent(agent.id)),
            Err(i) => {
                self.next_id = self.next_id.max(agent.id.0.saturating_add(1));
                self.agents.insert(i, agent);
                Ok(())
            }
        }
    }

    /// Create and insert an agent with a fresh id
    pub fn spawn(
        &mut self,
        position: Vec3,
        orientation: Quat,
        params: AgentParams,
    ) -> Result<AgentId, ConfigError> {
        let id = AgentId(self.next_id);
        self.add_agent(Agent::new(id, position, orientation, params)?)?;
        Ok(id)
    }

    pub fn remove_agent(&mut self, id: AgentId) -> Option<Agent> {
        let i = self.agents.binary_search_by_key(&id, |a| a.id).ok()?;
        Some(self.agents.remove(i))
    }

    /// Place `count` agents at random free points within `spread` of `center`,
    /// each with a random yaw. Points inside obstacles are re-drawn a few times
    /// before falling back to `center`.
    pub fn scatter(
        &mut self,
        count: usize,
        center: Vec3,
        spread: f32,
        params: AgentParams,
        scene: &Scene,
    ) -> Result<(), ConfigError> {
        params.validate()?;
        for _ in 0..count {
            let mut position = center;
            for _ in 0..16 {
                let offset = Vec3::new(
                    self.rng.random_range(-1.0..=1.0),
                    self.rng.random_range(-1.0..=1.0),
                    self.rng.random_range(-1.0..=1.0),
                ) * spread;
                if scene.is_free(center + offset) {
                    position = center + offset;
                    break;
                }
            }
            let yaw: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
            let heading = Vec3::new(yaw.sin(), 0.0, yaw.cos());
            self.spawn(position, look_rotation(heading, WORLD_UP), params)?;
        }
        log::info!("scattered {count} agents around {center:?} (flock size {})", self.len());
        Ok(())
    }

    /// Copy every agent's committed position and forward
    fn take_snapshot(&mut self) {
        self.snapshot.clear();
        self.snapshot.extend(self.agents.iter().map(|a| Neighbor {
            id: a.id,
            position: a.position,
            forward: a.forward(),
        }));
    }

    /// Advance every agent one step inside `scene`
    pub fn step<S>(&mut self, scene: &Scene, sink: &mut S, dt: f32) -> StepReport
    where
        S: MotionSink + ?Sized,
    {
        self.take_snapshot();
        let snapshot = std::mem::take(&mut self.snapshot);
        let report = self.step_with(&scene.view(&snapshot, AGENT_RADIUS), sink, dt);
        self.snapshot = snapshot;
        report
    }

    /// Advance every agent one step against an externally supplied world.
    ///
    /// `world` is borrowed separately from the flock, so it cannot observe
    /// agents updated earlier in this same step.
    pub fn step_with<Q, S>(&mut self, world: &Q, sink: &mut S, dt: f32) -> StepReport
    where
        Q: SpatialQuery + ?Sized,
        S: MotionSink + ?Sized,
    {
        self.time_ticks += 1;

        let mut outcomes = Vec::with_capacity(self.agents.len());
        for agent in &mut self.agents {
            let outcome = tick_agent(agent, world, dt, &mut self.rng);
            sink.set_forward_velocity(agent.id, outcome.velocity);
            outcomes.push(outcome);
        }

        let report = StepReport { outcomes };
        self.total_reversals += report.reversals() as u64;
        report
    }

    /// Mean agent position
    pub fn centroid(&self) -> Option<Vec3> {
        if self.agents.is_empty() {
            return None;
        }
        let sum: Vec3 = self.agents.iter().map(|a| a.position).sum();
        Some(sum / self.agents.len() as f32)
    }

    /// Mean magnitude of the last written velocities
    pub fn mean_speed(&self) -> f32 {
        if self.agents.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.agents.iter().map(|a| a.velocity.length()).sum();
        sum / self.agents.len() as f32
    }

    /// Length of the mean forward direction (1 = perfectly aligned flock)
    pub fn polarization(&self) -> f32 {
        if self.agents.is_empty() {
            return 0.0;
        }
        let sum: Vec3 = self.agents.iter().map(|a| a.forward()).sum();
        (sum / self.agents.len() as f32).length()
    }
}
