//! Spawn helpers for common entity shapes.
//!
//! These bundle the component combinations the engine's systems expect:
//! dynamic bodies carry position, velocity, size and mass; static geometry
//! carries only position and size, so it never enters the motion views.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use voxen_ecs::entity::Entity;
use voxen_ecs::manager::EntityManager;

use crate::components::{Mass, Position3D, Size3D, Velocity3D};
use crate::EngineError;

/// Spawn a moving body: position + velocity + size + mass.
pub fn spawn_dynamic_body(
    manager: &mut EntityManager,
    position: Vec3,
    velocity: Vec3,
    size: Vec3,
    mass: f32,
) -> Result<Entity, EngineError> {
    let entity = manager.create_entity();
    manager.add_component(entity, Position3D(position))?;
    manager.add_component(entity, Velocity3D(velocity))?;
    manager.add_component(entity, Size3D(size))?;
    manager.add_component(entity, Mass(mass))?;
    Ok(entity)
}

/// Spawn immovable geometry: position + size, no velocity, no mass.
pub fn spawn_static_body(
    manager: &mut EntityManager,
    position: Vec3,
    size: Vec3,
) -> Result<Entity, EngineError> {
    let entity = manager.create_entity();
    manager.add_component(entity, Position3D(position))?;
    manager.add_component(entity, Size3D(size))?;
    Ok(entity)
}

/// Spawn `count` dynamic bodies with randomized positions and velocities.
pub fn spawn_random_bodies(
    manager: &mut EntityManager,
    rng: &mut impl Rng,
    count: usize,
) -> Result<Vec<Entity>, EngineError> {
    let mut entities = Vec::with_capacity(count);
    for _ in 0..count {
        let position = Vec3::new(
            rng.gen_range(-50.0..50.0),
            rng.gen_range(10.0..100.0),
            rng.gen_range(-50.0..50.0),
        );
        let velocity = Vec3::new(
            rng.gen_range(-5.0..5.0),
            0.0,
            rng.gen_range(-5.0..5.0),
        );
        let size = Vec3::splat(rng.gen_range(0.5..2.0));
        let mass = rng.gen_range(1.0..10.0);
        entities.push(spawn_dynamic_body(manager, position, velocity, size, mass)?);
    }
    Ok(entities)
}

/// Populate a reproducible demo scene: a ground slab plus `count` seeded
/// random bodies. The same seed always produces the same scene.
pub fn demo_scene(
    manager: &mut EntityManager,
    seed: u64,
    count: usize,
) -> Result<Vec<Entity>, EngineError> {
    let mut rng = Pcg32::seed_from_u64(seed);
    spawn_static_body(manager, Vec3::ZERO, Vec3::new(200.0, 1.0, 200.0))?;
    let bodies = spawn_random_bodies(manager, &mut rng, count)?;
    debug!(seed, bodies = bodies.len(), "demo scene populated");
    Ok(bodies)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::PhysicsSystem;
    use voxen_ecs::prelude::*;

    fn manager() -> EntityManager {
        PhysicsSystem::register(EntityManager::builder()).build()
    }

    #[test]
    fn dynamic_bodies_enter_the_motion_view() {
        let mut manager = manager();
        let body = spawn_dynamic_body(
            &mut manager,
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ONE,
            2.0,
        )
        .unwrap();

        let set = manager.entity_set::<(Position3D, Velocity3D)>().unwrap();
        assert!(set.contains(body));
    }

    #[test]
    fn static_bodies_stay_out_of_motion_views() {
        let mut manager = manager();
        let slab = spawn_static_body(&mut manager, Vec3::ZERO, Vec3::new(10.0, 1.0, 10.0)).unwrap();

        assert!(!manager
            .entity_set::<(Position3D, Velocity3D)>()
            .unwrap()
            .contains(slab));
        assert!(manager.has_component::<Size3D>(slab).unwrap());
    }

    #[test]
    fn demo_scene_is_reproducible() {
        let mut a = manager();
        let mut b = manager();
        let bodies_a = demo_scene(&mut a, 42, 16).unwrap();
        let bodies_b = demo_scene(&mut b, 42, 16).unwrap();
        assert_eq!(bodies_a.len(), bodies_b.len());

        for (&ea, &eb) in bodies_a.iter().zip(&bodies_b) {
            let pa = a.get_component::<Position3D>(ea).unwrap();
            let pb = b.get_component::<Position3D>(eb).unwrap();
            assert_eq!(pa, pb);
            let va = a.get_component::<Velocity3D>(ea).unwrap();
            let vb = b.get_component::<Velocity3D>(eb).unwrap();
            assert_eq!(va, vb);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = manager();
        let mut b = manager();
        let bodies_a = demo_scene(&mut a, 1, 8).unwrap();
        let bodies_b = demo_scene(&mut b, 2, 8).unwrap();

        let same = bodies_a.iter().zip(&bodies_b).all(|(&ea, &eb)| {
            a.get_component::<Position3D>(ea).unwrap()
                == b.get_component::<Position3D>(eb).unwrap()
        });
        assert!(!same);
    }
}
