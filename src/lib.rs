//! Boid Flock - deterministic 3D flocking
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (steering, obstacle probes, stall escape)
//! - `settings`: Data-driven flock configuration
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SettingsError};
pub use settings::FlockSettings;

use glam::Vec3;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics step)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Slerp fraction per second toward the desired heading
    pub const TURN_RATE: f32 = 2.0;

    /// Probe fan half-angle (degrees)
    pub const PROBE_ANGLE_DEG: f32 = 20.0;
    /// Boxed-in threshold (obstacle hits out of five probes)
    pub const BOXED_IN_HITS: usize = 3;
    /// Side vectors shorter than this fall back to the forward axis
    pub const MIN_SIDE_LENGTH: f32 = 0.1;
    /// Vertical push of the emergency escape
    pub const ESCAPE_LIFT: f32 = 2.0;
    /// Horizontal jitter range of the emergency escape (±)
    pub const ESCAPE_JITTER: f32 = 2.0;

    /// Neighbors closer than this are ignored by separation
    pub const SEPARATION_MIN_DISTANCE: f32 = 0.1;
    /// Separation only acts inside this fraction of the neighbor radius
    pub const SEPARATION_RADIUS_FACTOR: f32 = 0.5;

    /// Collision sphere radius used when agents are ray targets
    pub const AGENT_RADIUS: f32 = 0.5;
}

/// World up axis
pub const WORLD_UP: Vec3 = Vec3::Y;
/// World forward axis
pub const WORLD_FORWARD: Vec3 = Vec3::Z;

/// Forward direction of a rotation (local +Z)
#[inline]
pub fn forward_of(rotation: glam::Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Up direction of a rotation (local +Y)
#[inline]
pub fn up_of(rotation: glam::Quat) -> Vec3 {
    rotation * Vec3::Y
}

/// Right direction of a rotation (local +X)
#[inline]
pub fn right_of(rotation: glam::Quat) -> Vec3 {
    rotation * Vec3::X
}
