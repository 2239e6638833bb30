//! Fixed-timestep simulation driver.
//!
//! The [`TickLoop`] owns the [`EntityManager`] and runs registered
//! [`System`]s in registration order, once per tick, each receiving the
//! manager and the fixed `dt`. Simulation time is derived as
//! `tick_count * fixed_dt` rather than accumulated, so it does not drift.
//! Given the same initial state and systems, a run is fully deterministic.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::trace;

use voxen_ecs::manager::EntityManager;

use crate::EngineError;

// ---------------------------------------------------------------------------
// TickConfig
// ---------------------------------------------------------------------------

/// Configuration for the fixed-timestep loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickConfig {
    /// Seconds of simulated time per tick. Must be positive and finite.
    pub fixed_dt: f32,
}

impl Default for TickConfig {
    /// 60 ticks per simulated second.
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
        }
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// A simulation system, run once per tick in registration order.
pub trait System {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Advance this system's slice of the simulation by `dt` seconds.
    fn update(&mut self, manager: &mut EntityManager, dt: f32) -> Result<(), EngineError>;
}

// ---------------------------------------------------------------------------
// TickDiagnostics
// ---------------------------------------------------------------------------

/// Wall-clock timing of the most recent tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Time per system, in execution order.
    pub system_times: Vec<(String, Duration)>,
    /// Total time of the tick.
    pub total_time: Duration,
}

// ---------------------------------------------------------------------------
// TickLoop
// ---------------------------------------------------------------------------

/// Drives the simulation forward at a fixed timestep.
pub struct TickLoop {
    manager: EntityManager,
    config: TickConfig,
    systems: Vec<Box<dyn System>>,
    tick_count: u64,
    diagnostics: TickDiagnostics,
}

impl TickLoop {
    /// Wrap a manager in a tick loop with no systems.
    pub fn new(manager: EntityManager, config: TickConfig) -> Self {
        Self {
            manager,
            config,
            systems: Vec::new(),
            tick_count: 0,
            diagnostics: TickDiagnostics::default(),
        }
    }

    /// Register a system. Systems run in registration order every tick.
    pub fn add_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// The managed world.
    pub fn manager(&self) -> &EntityManager {
        &self.manager
    }

    /// Mutable access to the managed world, for setup between ticks.
    pub fn manager_mut(&mut self) -> &mut EntityManager {
        &mut self.manager
    }

    /// Run one tick: every system once, in order.
    ///
    /// # Errors
    ///
    /// Propagates the first system failure; the tick counter does not
    /// advance in that case.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        let tick_start = Instant::now();
        let mut system_times = Vec::with_capacity(self.systems.len());

        for system in &mut self.systems {
            let start = Instant::now();
            system.update(&mut self.manager, self.config.fixed_dt)?;
            let elapsed = start.elapsed();
            trace!(system = system.name(), ?elapsed, "system ran");
            system_times.push((system.name().to_owned(), elapsed));
        }

        self.tick_count += 1;
        self.diagnostics = TickDiagnostics {
            system_times,
            total_time: tick_start.elapsed(),
        };
        Ok(())
    }

    /// Run `count` ticks back to back.
    pub fn run_ticks(&mut self, count: u64) -> Result<(), EngineError> {
        for _ in 0..count {
            self.tick()?;
        }
        Ok(())
    }

    /// Number of completed ticks.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds elapsed: `tick_count * fixed_dt`.
    pub fn sim_time(&self) -> f64 {
        self.tick_count as f64 * self.config.fixed_dt as f64
    }

    /// Timing of the most recent tick.
    pub fn diagnostics(&self) -> &TickDiagnostics {
        &self.diagnostics
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
