//! Built-in 3D simulation components.
//!
//! Thin newtypes over [`glam::Vec3`] plus a scalar mass. These are plain
//! payloads as far as the ECS is concerned; systems give them meaning.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxen_ecs::prelude::Component;

/// World-space position of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D(pub Vec3);

impl Position3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

impl Component for Position3D {}

/// Linear velocity, in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity3D(pub Vec3);

impl Velocity3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

impl Component for Velocity3D {}

/// Axis-aligned extent of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size3D(pub Vec3);

impl Size3D {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

impl Component for Size3D {}

/// Mass in kilograms. Entities without mass are not affected by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass(pub f32);

impl Component for Mass {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
