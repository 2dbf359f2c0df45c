//! Deterministic flocking simulation
//!
//! All steering logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by agent ID)
//! - No rendering, input or physics-engine dependencies

pub mod agent;
pub mod clock;
pub mod motion;
pub mod orient;
pub mod scene;
pub mod sdf;
pub mod sensor;
pub mod steering;
pub mod stuck;
pub mod tick;
pub mod world;

pub use agent::{Agent, AgentId, AgentParams, SteeringStrengths};
pub use clock::FixedStepClock;
pub use motion::{KinematicIntegrator, MotionSink, NullSink};
pub use orient::{forward_velocity, look_rotation, reverse_yaw, turn_toward};
pub use scene::{Scene, SceneView, Shape};
pub use sensor::{PROBE_COUNT, ProbeReading, SensorReading, probe_directions, sense_obstacles};
pub use steering::{SteeringForces, desired_heading, flocking_forces};
pub use stuck::{StuckDetector, StuckStatus};
pub use tick::{Flock, StepReport, TickOutcome, tick_agent};
pub use world::{Neighbor, RayHit, SpatialQuery, SurfaceKind};
