//! Motion integration over entity-set views.
//!
//! The [`PhysicsSystem`] runs two passes per tick:
//!
//! 1. Gravity: every `(Velocity3D, Mass)` entity accumulates
//!    `gravity * dt` into its velocity.
//! 2. Integration: every `(Position3D, Velocity3D)` entity advances its
//!    position by `velocity * dt`.
//!
//! Membership does the filtering: bodies without a `Velocity3D` (static
//! geometry) never enter either view, and removing a body's `Velocity3D`
//! freezes it in place without touching the system.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use voxen_ecs::manager::{EntityManager, EntityManagerBuilder};

use crate::components::{Mass, Position3D, Size3D, Velocity3D};
use crate::tick::System;
use crate::EngineError;

// ---------------------------------------------------------------------------
// PhysicsConfig
// ---------------------------------------------------------------------------

/// Tunable physics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Constant acceleration applied to every massive body, in units per
    /// second squared.
    pub gravity: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// PhysicsSystem
// ---------------------------------------------------------------------------

/// Gravity + Euler integration, driven by the tick loop.
#[derive(Debug)]
pub struct PhysicsSystem {
    config: PhysicsConfig,
}

impl PhysicsSystem {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Register the component types and views this system iterates. Call on
    /// the builder before constructing the manager the system will run
    /// against.
    pub fn register(builder: EntityManagerBuilder) -> EntityManagerBuilder {
        builder
            .view::<(Position3D, Velocity3D)>()
            .view::<(Velocity3D, Mass)>()
            .component::<Size3D>()
    }
}

impl System for PhysicsSystem {
    fn name(&self) -> &str {
        "physics"
    }

    fn update(&mut self, manager: &mut EntityManager, dt: f32) -> Result<(), EngineError> {
        let gravity = self.config.gravity * dt;
        for (_entity, (velocity, _mass)) in manager.view_mut::<(&mut Velocity3D, &Mass)>()? {
            velocity.0 += gravity;
        }

        for (_entity, (position, velocity)) in
            manager.view_mut::<(&mut Position3D, &Velocity3D)>()?
        {
            position.0 += velocity.0 * dt;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
