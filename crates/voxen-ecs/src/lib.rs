//! Voxen ECS -- sparse-set entity storage with reactive entity sets.
//!
//! This crate provides the core ECS for the Voxen engine. Components of each
//! type live densely packed in their own sparse-set pool; per-entity
//! bookkeeping maps component kinds to pool ids; and *entity sets* maintain,
//! reactively, the list of entities owning every type in a combination,
//! firing listeners on membership transitions. Component types and set
//! combinations are declared up front on a builder, so a manager's wiring is
//! complete by construction.
//!
//! # Quick Start
//!
//! ```
//! use voxen_ecs::prelude::*;
//!
//! struct Position { x: f32, y: f32 }
//! impl Component for Position {}
//!
//! struct Velocity { dx: f32, dy: f32 }
//! impl Component for Velocity {}
//!
//! let mut manager = EntityManager::builder()
//!     .view::<(Position, Velocity)>()
//!     .build();
//!
//! let entity = manager.create_entity();
//! manager.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();
//! manager.add_component(entity, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
//!
//! for (_entity, (position, velocity)) in
//!     manager.view_mut::<(&mut Position, &Velocity)>().unwrap()
//! {
//!     position.x += velocity.dx;
//! }
//!
//! assert_eq!(manager.get_component::<Position>(entity).unwrap().x, 1.0);
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod entity_set;
pub mod manager;
pub mod sparse_set;
#[allow(unsafe_code)]
pub mod view;
pub mod visitor;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by ECS operations.
///
/// Every variant reflects a violated precondition (stale handle, missing
/// component, unregistered type); nothing here is transient or retryable.
/// Callers that want to avoid the fallible accessors can check first with
/// the `has_*` queries.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// The entity is not alive (destroyed, or its id was never issued).
    #[error("entity {entity:?} does not exist (stale or never created)")]
    StaleEntity { entity: entity::Entity },

    /// A component id does not denote a live entry in its kind's pool.
    #[error("component id {id:?} is not live in the '{component}' pool")]
    StaleComponent {
        id: component::ComponentId,
        component: &'static str,
    },

    /// A component type was used that was not registered at build time.
    #[error("component type '{name}' is not registered with this manager")]
    UnknownComponent { name: &'static str },

    /// A component kind index is outside the registry's valid range.
    #[error("component kind {kind:?} is out of range for this registry")]
    UnknownKind { kind: component::ComponentKind },

    /// The entity does not own the requested component.
    #[error("entity {entity:?} has no '{component}' component")]
    ComponentNotFound {
        entity: entity::Entity,
        component: &'static str,
    },

    /// No entity set was registered for the requested combination.
    #[error("no entity set registered for component combination [{combination}]")]
    UnknownView { combination: String },

    /// A visitor already has a handler for this component type.
    #[error("a handler for component type '{name}' is already set")]
    HandlerAlreadySet { name: &'static str },

    /// A visited entity owns a component kind the visitor cannot handle.
    #[error("no handler for component kind {kind:?}")]
    HandlerMissing { kind: component::ComponentKind },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{Component, ComponentId, ComponentKind, ComponentRegistry};
    pub use crate::entity::Entity;
    pub use crate::entity_set::{EntitySet, ListenerId, ViewKind};
    pub use crate::manager::{EntityManager, EntityManagerBuilder};
    pub use crate::sparse_set::{SparseKey, SparseSet};
    pub use crate::view::{ComponentTuple, ViewIter, ViewIterMut, ViewItem, ViewQuery};
    pub use crate::visitor::Visitor;
    pub use crate::EcsError;
}

// ---------------------------------------------------------------------------
// Integration tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    // -- test component types -----------------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
        z: f32,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
        z: f32,
    }
    impl Component for Velocity {}

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(u32);
    impl Component for Tag {}

    fn manager() -> EntityManager {
        EntityManager::builder()
            .view::<(Position, Velocity)>()
            .component::<Tag>()
            .build()
    }

    // -- moving-body scenario ------------------------------------------------

    #[test]
    fn moving_body_lifecycle() {
        let mut manager = manager();

        let e1 = manager.create_entity();
        manager
            .add_component(
                e1,
                Position {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        manager
            .add_component(
                e1,
                Velocity {
                    x: 1.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();

        {
            let set = manager.entity_set::<(Position, Velocity)>().unwrap();
            assert_eq!(set.len(), 1);
            assert!(set.contains(e1));
        }

        // One integration step with dt = 1.
        let dt = 1.0f32;
        for (_entity, (position, velocity)) in
            manager.view_mut::<(&mut Position, &Velocity)>().unwrap()
        {
            position.x += velocity.x * dt;
            position.y += velocity.y * dt;
            position.z += velocity.z * dt;
        }
        assert_eq!(
            manager.get_component::<Position>(e1).unwrap(),
            &Position {
                x: 1.0,
                y: 0.0,
                z: 0.0
            }
        );

        manager.remove_component::<Velocity>(e1).unwrap();
        assert!(!manager
            .entity_set::<(Position, Velocity)>()
            .unwrap()
            .contains(e1));

        manager.remove_entity(e1).unwrap();
        assert!(!manager.has_entity(e1));
        assert!(matches!(
            manager.get_component::<Position>(e1),
            Err(EcsError::StaleEntity { .. })
        ));
    }

    // -- membership reactivity ----------------------------------------------

    #[test]
    fn membership_tracks_component_conjunction() {
        let mut manager = manager();
        let e = manager.create_entity();

        manager
            .add_component(
                e,
                Position {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        assert!(!manager
            .entity_set::<(Position, Velocity)>()
            .unwrap()
            .contains(e));

        manager
            .add_component(
                e,
                Velocity {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        assert!(manager
            .entity_set::<(Position, Velocity)>()
            .unwrap()
            .contains(e));

        manager.remove_component::<Position>(e).unwrap();
        assert!(!manager
            .entity_set::<(Position, Velocity)>()
            .unwrap()
            .contains(e));

        // Re-adding the missing component makes the entity reappear once.
        manager
            .add_component(
                e,
                Position {
                    x: 1.0,
                    y: 1.0,
                    z: 1.0,
                },
            )
            .unwrap();
        let set = manager.entity_set::<(Position, Velocity)>().unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(e));
    }

    #[test]
    fn listeners_fire_once_per_transition() {
        let mut manager = manager();

        let added = Rc::new(RefCell::new(0u32));
        let removed = Rc::new(RefCell::new(0u32));
        {
            let set = manager.entity_set_mut::<(Position, Velocity)>().unwrap();
            let counter = Rc::clone(&added);
            set.add_entity_added_listener(move |_| *counter.borrow_mut() += 1);
            let counter = Rc::clone(&removed);
            set.add_entity_removed_listener(move |_| *counter.borrow_mut() += 1);
        }

        let e = manager.create_entity();
        manager
            .add_component(
                e,
                Position {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        assert_eq!(*added.borrow(), 0);

        manager
            .add_component(
                e,
                Velocity {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        assert_eq!(*added.borrow(), 1);

        // An unrelated component must not re-fire the listeners.
        manager.add_component(e, Tag(7)).unwrap();
        assert_eq!(*added.borrow(), 1);
        assert_eq!(*removed.borrow(), 0);

        manager.remove_component::<Velocity>(e).unwrap();
        assert_eq!(*removed.borrow(), 1);

        manager
            .add_component(
                e,
                Velocity {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        assert_eq!(*added.borrow(), 2);
    }

    #[test]
    fn two_entities_partial_overlap() {
        let mut manager = manager();

        let removed = Rc::new(RefCell::new(0u32));
        {
            let counter = Rc::clone(&removed);
            manager
                .entity_set_mut::<(Position, Velocity)>()
                .unwrap()
                .add_entity_removed_listener(move |_| *counter.borrow_mut() += 1);
        }

        let e1 = manager.create_entity();
        manager
            .add_component(
                e1,
                Position {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();
        manager
            .add_component(
                e1,
                Velocity {
                    x: 0.0,
                    y: 0.0,
                    z: 0.0,
                },
            )
            .unwrap();

        let e2 = manager.create_entity();
        manager
            .add_component(
                e2,
                Position {
                    x: 5.0,
                    y: 5.0,
                    z: 5.0,
                },
            )
            .unwrap();

        {
            let set = manager.entity_set::<(Position, Velocity)>().unwrap();
            assert_eq!(set.len(), 1);
            assert!(set.contains(e1));
            assert!(!set.contains(e2));
        }

        // Destroying the non-member changes nothing.
        manager.remove_entity(e2).unwrap();
        assert_eq!(manager.entity_set::<(Position, Velocity)>().unwrap().len(), 1);
        assert_eq!(*removed.borrow(), 0);

        // Destroying the member empties the set and fires exactly once.
        manager.remove_entity(e1).unwrap();
        assert_eq!(manager.entity_set::<(Position, Velocity)>().unwrap().len(), 0);
        assert_eq!(*removed.borrow(), 1);
    }

    // -- visitor dispatch ----------------------------------------------------

    #[test]
    fn visit_entity_dispatches_per_kind() {
        let mut manager = manager();
        let e = manager.create_entity();
        manager
            .add_component(
                e,
                Position {
                    x: 1.0,
                    y: 2.0,
                    z: 3.0,
                },
            )
            .unwrap();
        manager.add_component(e, Tag(9)).unwrap();

        let mut visitor = Visitor::new();
        let positions = Rc::new(RefCell::new(Vec::new()));
        let tags = Rc::new(RefCell::new(Vec::new()));
        {
            let sink = Rc::clone(&positions);
            visitor
                .set_handler::<Position, _>(manager.registry(), move |position| {
                    sink.borrow_mut().push(position.clone())
                })
                .unwrap();
            let sink = Rc::clone(&tags);
            visitor
                .set_handler::<Tag, _>(manager.registry(), move |tag| {
                    sink.borrow_mut().push(tag.0)
                })
                .unwrap();
        }

        manager.visit_entity(e, &visitor).unwrap();
        assert_eq!(
            *positions.borrow(),
            vec![Position {
                x: 1.0,
                y: 2.0,
                z: 3.0
            }]
        );
        assert_eq!(*tags.borrow(), vec![9]);
    }

    #[test]
    fn visit_entity_fails_without_handler() {
        let mut manager = manager();
        let e = manager.create_entity();
        manager.add_component(e, Tag(1)).unwrap();

        let visitor = Visitor::new();
        assert!(matches!(
            manager.visit_entity(e, &visitor),
            Err(EcsError::HandlerMissing { .. })
        ));
    }

    // -- id recycling ---------------------------------------------------------

    #[test]
    fn destroyed_entity_id_is_recycled_clean() {
        let mut manager = manager();
        let e1 = manager.create_entity();
        manager.add_component(e1, Tag(1)).unwrap();
        manager.remove_entity(e1).unwrap();

        // The recycled id denotes a brand-new entity with no components.
        let e2 = manager.create_entity();
        assert_eq!(e1, e2);
        assert!(!manager.has_component::<Tag>(e2).unwrap());
    }

    #[test]
    fn reserve_is_transparent() {
        let mut manager = manager();
        manager.reserve(1024);
        let e = manager.create_entity();
        assert!(manager.has_entity(e));
        assert_eq!(manager.entity_count(), 1);
    }
}
