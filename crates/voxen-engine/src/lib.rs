//! Voxen Engine -- simulation layer over the Voxen ECS.
//!
//! This crate provides the driver around [`voxen_ecs`]: built-in 3D
//! components, a gravity/integration physics system running over entity-set
//! views, a fixed-timestep tick loop, spawn helpers, and configuration.
//!
//! # Quick Start
//!
//! ```
//! use voxen_engine::prelude::*;
//!
//! let manager = PhysicsSystem::register(EntityManager::builder()).build();
//! let mut tick_loop = TickLoop::new(manager, TickConfig::default());
//! tick_loop.add_system(PhysicsSystem::new(PhysicsConfig::default()));
//!
//! let body = spawn_dynamic_body(
//!     tick_loop.manager_mut(),
//!     glam::Vec3::new(0.0, 100.0, 0.0),
//!     glam::Vec3::ZERO,
//!     glam::Vec3::ONE,
//!     1.0,
//! )
//! .unwrap();
//!
//! tick_loop.run_ticks(60).unwrap();
//! let position = tick_loop
//!     .manager()
//!     .get_component::<Position3D>(body)
//!     .unwrap();
//! assert!(position.0.y < 100.0);
//! ```

pub mod components;
pub mod config;
pub mod physics;
pub mod spawn;
pub mod tick;

/// Re-export the ECS crate for convenience.
pub use voxen_ecs;

use voxen_ecs::EcsError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the engine layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An ECS operation failed.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// The engine configuration could not be parsed.
    #[error("invalid engine configuration: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Logging bootstrap
// ---------------------------------------------------------------------------

/// Install the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info` when unset. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use voxen_ecs::prelude::*;

    pub use crate::components::{Mass, Position3D, Size3D, Velocity3D};
    pub use crate::config::EngineConfig;
    pub use crate::physics::{PhysicsConfig, PhysicsSystem};
    pub use crate::spawn::{demo_scene, spawn_dynamic_body, spawn_random_bodies, spawn_static_body};
    pub use crate::tick::{System, TickConfig, TickDiagnostics, TickLoop};
    pub use crate::EngineError;
}
