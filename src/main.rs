//! Boid Flock entry point
//!
//! Runs the flock headless: loads settings, scatters the starting cluster,
//! feeds fixed-rate frames through the fixed-step clock and prints a JSON
//! summary at the end.

use std::process::ExitCode;

use boid_flock::FlockSettings;
use boid_flock::sim::{FixedStepClock, Flock, KinematicIntegrator};
use serde::Serialize;

/// End-of-run statistics
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u64,
    agents: usize,
    ticks: u64,
    simulated_seconds: f32,
    reversals: u64,
    centroid: Option<[f32; 3]>,
    mean_speed: f32,
    polarization: f32,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Boid Flock (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match FlockSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("Using default settings");
            FlockSettings::default()
        }
    };

    match run(&settings) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("failed to encode summary: {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &FlockSettings) -> Result<RunSummary, boid_flock::ConfigError> {
    settings.validate()?;

    let scene = &settings.scene;
    let mut flock = Flock::new(settings.seed);
    flock.scatter(
        settings.agent_count,
        settings.spawn_center,
        settings.spawn_spread,
        settings.agent,
        scene,
    )?;

    let mut clock = FixedStepClock::default();
    let mut integrator = KinematicIntegrator::new();
    let frame_dt = settings.frame_dt();
    let frames = (settings.duration * settings.frame_rate).round() as u64;

    let mut next_report = settings.report_interval;
    let mut elapsed = 0.0;
    for _ in 0..frames {
        for _ in 0..clock.advance(frame_dt) {
            let report = flock.step(scene, &mut integrator, clock.step);
            integrator.integrate(flock.agents_mut().iter_mut(), clock.step);
            elapsed += clock.step;

            if report.reversals() > 0 {
                log::debug!("{} agents turned around", report.reversals());
            }
            if elapsed >= next_report {
                next_report += settings.report_interval;
                log::info!(
                    "t={elapsed:.1}s neighbors={:.1} boxed_in={} polarization={:.2} reversals={}",
                    report.mean_neighbors(),
                    report.boxed_in(),
                    flock.polarization(),
                    flock.total_reversals
                );
            }
        }
    }

    Ok(RunSummary {
        seed: flock.seed,
        agents: flock.len(),
        ticks: flock.time_ticks,
        simulated_seconds: elapsed,
        reversals: flock.total_reversals,
        centroid: flock.centroid().map(|c| c.to_array()),
        mean_speed: flock.mean_speed(),
        polarization: flock.polarization(),
    })
}
