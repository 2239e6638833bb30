//! Headless demo: a seeded scene of falling bodies driven by the tick loop.
//!
//! Run with: `cargo run --example falling_bodies`

use anyhow::Result;
use tracing::info;

use voxen_engine::prelude::*;

fn main() -> Result<()> {
    voxen_engine::init_tracing();

    let config = EngineConfig::default();
    let mut manager = PhysicsSystem::register(EntityManager::builder())
        .view::<(Position3D,)>()
        .build();

    // Log membership changes on the motion view.
    {
        let set = manager.entity_set_mut::<(Position3D, Velocity3D)>()?;
        set.add_entity_added_listener(|entity| info!(%entity, "body entered motion view"));
        set.add_entity_removed_listener(|entity| info!(%entity, "body left motion view"));
    }

    let bodies = demo_scene(&mut manager, 0xC0FFEE, 24)?;
    info!(bodies = bodies.len(), "scene ready");

    let mut tick_loop = TickLoop::new(manager, config.tick);
    tick_loop.add_system(PhysicsSystem::new(config.physics));

    // Two simulated seconds at 60 Hz.
    tick_loop.run_ticks(120)?;
    info!(
        ticks = tick_loop.tick_count(),
        sim_time = tick_loop.sim_time(),
        "simulation finished"
    );

    // Freeze one body and show that it leaves the view.
    if let Some(&body) = bodies.first() {
        tick_loop.manager_mut().remove_component::<Velocity3D>(body)?;
    }

    for (entity, (position,)) in tick_loop.manager().view::<(&Position3D,)>()? {
        info!(%entity, position = ?position.0, "final position");
    }

    Ok(())
}
