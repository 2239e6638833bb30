//! Typed access to entity sets.
//!
//! [`ComponentTuple`] describes a plain tuple of component types, e.g.
//! `(Position, Velocity)`, and is used to register and look up entity sets.
//! [`ViewQuery`] describes an access tuple, e.g. `(&mut Position, &Velocity)`,
//! and drives iteration: [`EntityManager::view`] yields
//! `(Entity, (&A, &B, ...))` per member, reading component ids straight from
//! the set's entries, with no per-entity map lookups at iteration time.
//!
//! ## Soundness
//!
//! Read-only iteration (`&T` items) goes through [`EntityManager::view`],
//! which takes `&self`. Mutable iteration (`&mut T` items) goes through
//! [`EntityManager::view_mut`], which takes `&mut self` and therefore holds
//! exclusive access to the manager for the iterator's lifetime; combined
//! with the duplicate/overlap validation on the access tuple, the internal
//! pointer cast in the mutable fetch cannot alias.

use std::marker::PhantomData;

use crate::component::{Component, ComponentId, ComponentKind, ComponentRegistry};
use crate::entity::Entity;
use crate::entity_set::{EntitySet, SetEntry, ViewKind};
use crate::manager::EntityManager;
use crate::EcsError;

// ---------------------------------------------------------------------------
// ComponentTuple -- plain type tuples
// ---------------------------------------------------------------------------

/// A tuple of component types naming an entity-set combination.
pub trait ComponentTuple {
    /// Shared references to each component, in tuple order.
    type Refs<'a>;

    /// Register every type in the tuple, returning kinds in tuple order.
    fn register(registry: &mut ComponentRegistry) -> Vec<ComponentKind>;

    /// Resolve every type in the tuple, in tuple order.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownComponent`] for the first unregistered type.
    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError>;

    /// Borrow all components of the tuple from one entity.
    fn fetch(manager: &EntityManager, entity: Entity) -> Result<Self::Refs<'_>, EcsError>;
}

impl<A: Component> ComponentTuple for (A,) {
    type Refs<'a> = (&'a A,);

    fn register(registry: &mut ComponentRegistry) -> Vec<ComponentKind> {
        vec![registry.register::<A>()]
    }

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![registry.kind_of::<A>()?])
    }

    fn fetch(manager: &EntityManager, entity: Entity) -> Result<Self::Refs<'_>, EcsError> {
        Ok((manager.get_component::<A>(entity)?,))
    }
}

impl<A: Component, B: Component> ComponentTuple for (A, B) {
    type Refs<'a> = (&'a A, &'a B);

    fn register(registry: &mut ComponentRegistry) -> Vec<ComponentKind> {
        vec![registry.register::<A>(), registry.register::<B>()]
    }

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![registry.kind_of::<A>()?, registry.kind_of::<B>()?])
    }

    fn fetch(manager: &EntityManager, entity: Entity) -> Result<Self::Refs<'_>, EcsError> {
        Ok((
            manager.get_component::<A>(entity)?,
            manager.get_component::<B>(entity)?,
        ))
    }
}

impl<A: Component, B: Component, C: Component> ComponentTuple for (A, B, C) {
    type Refs<'a> = (&'a A, &'a B, &'a C);

    fn register(registry: &mut ComponentRegistry) -> Vec<ComponentKind> {
        vec![
            registry.register::<A>(),
            registry.register::<B>(),
            registry.register::<C>(),
        ]
    }

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![
            registry.kind_of::<A>()?,
            registry.kind_of::<B>()?,
            registry.kind_of::<C>()?,
        ])
    }

    fn fetch(manager: &EntityManager, entity: Entity) -> Result<Self::Refs<'_>, EcsError> {
        Ok((
            manager.get_component::<A>(entity)?,
            manager.get_component::<B>(entity)?,
            manager.get_component::<C>(entity)?,
        ))
    }
}

impl<A: Component, B: Component, C: Component, D: Component> ComponentTuple for (A, B, C, D) {
    type Refs<'a> = (&'a A, &'a B, &'a C, &'a D);

    fn register(registry: &mut ComponentRegistry) -> Vec<ComponentKind> {
        vec![
            registry.register::<A>(),
            registry.register::<B>(),
            registry.register::<C>(),
            registry.register::<D>(),
        ]
    }

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![
            registry.kind_of::<A>()?,
            registry.kind_of::<B>()?,
            registry.kind_of::<C>()?,
            registry.kind_of::<D>()?,
        ])
    }

    fn fetch(manager: &EntityManager, entity: Entity) -> Result<Self::Refs<'_>, EcsError> {
        Ok((
            manager.get_component::<A>(entity)?,
            manager.get_component::<B>(entity)?,
            manager.get_component::<C>(entity)?,
            manager.get_component::<D>(entity)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// ViewItem -- one element of an access tuple
// ---------------------------------------------------------------------------

/// One element of a view access tuple: `&T` (read) or `&mut T` (write).
pub trait ViewItem {
    /// The reference type yielded per member.
    type Out<'w>;
    /// Whether this item borrows mutably.
    const MUTABLE: bool;
    /// The underlying component kind.
    fn kind(registry: &ComponentRegistry) -> Result<ComponentKind, EcsError>;
    /// Fetch one component by its id.
    fn fetch(manager: &EntityManager, id: ComponentId) -> Self::Out<'_>;
}

impl<T: Component> ViewItem for &T {
    type Out<'w> = &'w T;
    const MUTABLE: bool = false;

    fn kind(registry: &ComponentRegistry) -> Result<ComponentKind, EcsError> {
        registry.kind_of::<T>()
    }

    fn fetch(manager: &EntityManager, id: ComponentId) -> Self::Out<'_> {
        let kind = manager
            .registry
            .kind_of::<T>()
            .expect("kind resolved when the view iterator was built");
        manager
            .pool_by_kind::<T>(kind)
            .components
            .get(id)
            .expect("set entry holds a live component id")
    }
}

// Mutable fetch goes through a pointer cast. This is only reachable from
// `EntityManager::view_mut(&mut self)`, whose exclusive borrow covers the
// iterator's lifetime; access validation rejects duplicate or overlapping
// access to the same component kind within one tuple, and distinct entities
// hold distinct component ids, so no two live references alias.
impl<T: Component> ViewItem for &mut T {
    type Out<'w> = &'w mut T;
    const MUTABLE: bool = true;

    fn kind(registry: &ComponentRegistry) -> Result<ComponentKind, EcsError> {
        registry.kind_of::<T>()
    }

    fn fetch(manager: &EntityManager, id: ComponentId) -> Self::Out<'_> {
        let kind = manager
            .registry
            .kind_of::<T>()
            .expect("kind resolved when the view iterator was built");
        #[allow(unsafe_code)]
        unsafe {
            let manager = manager as *const EntityManager as *mut EntityManager;
            (*manager)
                .pool_mut_by_kind::<T>(kind)
                .components
                .get_mut(id)
                .expect("set entry holds a live component id")
        }
    }
}

// ---------------------------------------------------------------------------
// ViewQuery -- access tuples
// ---------------------------------------------------------------------------

/// A tuple of [`ViewItem`]s: `(&A,)`, `(&mut A, &B)`, ...
pub trait ViewQuery {
    /// The per-member output type.
    type Item<'w>;
    /// Whether any item borrows mutably.
    const HAS_MUTABLE: bool;
    /// Underlying component kinds, in tuple order.
    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError>;
    /// Panic if the tuple requests conflicting access to one kind.
    fn validate_access(registry: &ComponentRegistry);
    /// Fetch one set entry. `slots[i]` locates item `i`'s id within the
    /// entry's normalized id array.
    fn fetch_entry<'w>(
        manager: &'w EntityManager,
        ids: &[ComponentId],
        slots: &[usize],
    ) -> Self::Item<'w>;
}

/// Reject `&mut T` + `&mut T` and `&mut T` + `&T` on the same kind.
fn validate_no_access_conflicts(items: &[(bool, Option<ComponentKind>)]) {
    let mut mutable: Vec<ComponentKind> = Vec::new();
    let mut shared: Vec<ComponentKind> = Vec::new();
    for &(is_mutable, kind) in items {
        let Some(kind) = kind else { continue };
        if is_mutable {
            if mutable.contains(&kind) {
                panic!("view requests duplicate mutable access to the same component type");
            }
            if shared.contains(&kind) {
                panic!("view requests overlapping read and mutable access to the same component type");
            }
            mutable.push(kind);
        } else {
            if mutable.contains(&kind) {
                panic!("view requests overlapping read and mutable access to the same component type");
            }
            shared.push(kind);
        }
    }
}

impl<A: ViewItem> ViewQuery for (A,) {
    type Item<'w> = (A::Out<'w>,);
    const HAS_MUTABLE: bool = A::MUTABLE;

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![A::kind(registry)?])
    }

    fn validate_access(_registry: &ComponentRegistry) {
        // Single item, nothing to conflict with.
    }

    fn fetch_entry<'w>(
        manager: &'w EntityManager,
        ids: &[ComponentId],
        slots: &[usize],
    ) -> Self::Item<'w> {
        (A::fetch(manager, ids[slots[0]]),)
    }
}

impl<A: ViewItem, B: ViewItem> ViewQuery for (A, B) {
    type Item<'w> = (A::Out<'w>, B::Out<'w>);
    const HAS_MUTABLE: bool = A::MUTABLE || B::MUTABLE;

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![A::kind(registry)?, B::kind(registry)?])
    }

    fn validate_access(registry: &ComponentRegistry) {
        validate_no_access_conflicts(&[
            (A::MUTABLE, A::kind(registry).ok()),
            (B::MUTABLE, B::kind(registry).ok()),
        ]);
    }

    fn fetch_entry<'w>(
        manager: &'w EntityManager,
        ids: &[ComponentId],
        slots: &[usize],
    ) -> Self::Item<'w> {
        (
            A::fetch(manager, ids[slots[0]]),
            B::fetch(manager, ids[slots[1]]),
        )
    }
}

impl<A: ViewItem, B: ViewItem, C: ViewItem> ViewQuery for (A, B, C) {
    type Item<'w> = (A::Out<'w>, B::Out<'w>, C::Out<'w>);
    const HAS_MUTABLE: bool = A::MUTABLE || B::MUTABLE || C::MUTABLE;

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![A::kind(registry)?, B::kind(registry)?, C::kind(registry)?])
    }

    fn validate_access(registry: &ComponentRegistry) {
        validate_no_access_conflicts(&[
            (A::MUTABLE, A::kind(registry).ok()),
            (B::MUTABLE, B::kind(registry).ok()),
            (C::MUTABLE, C::kind(registry).ok()),
        ]);
    }

    fn fetch_entry<'w>(
        manager: &'w EntityManager,
        ids: &[ComponentId],
        slots: &[usize],
    ) -> Self::Item<'w> {
        (
            A::fetch(manager, ids[slots[0]]),
            B::fetch(manager, ids[slots[1]]),
            C::fetch(manager, ids[slots[2]]),
        )
    }
}

impl<A: ViewItem, B: ViewItem, C: ViewItem, D: ViewItem> ViewQuery for (A, B, C, D) {
    type Item<'w> = (A::Out<'w>, B::Out<'w>, C::Out<'w>, D::Out<'w>);
    const HAS_MUTABLE: bool = A::MUTABLE || B::MUTABLE || C::MUTABLE || D::MUTABLE;

    fn kinds(registry: &ComponentRegistry) -> Result<Vec<ComponentKind>, EcsError> {
        Ok(vec![
            A::kind(registry)?,
            B::kind(registry)?,
            C::kind(registry)?,
            D::kind(registry)?,
        ])
    }

    fn validate_access(registry: &ComponentRegistry) {
        validate_no_access_conflicts(&[
            (A::MUTABLE, A::kind(registry).ok()),
            (B::MUTABLE, B::kind(registry).ok()),
            (C::MUTABLE, C::kind(registry).ok()),
            (D::MUTABLE, D::kind(registry).ok()),
        ]);
    }

    fn fetch_entry<'w>(
        manager: &'w EntityManager,
        ids: &[ComponentId],
        slots: &[usize],
    ) -> Self::Item<'w> {
        (
            A::fetch(manager, ids[slots[0]]),
            B::fetch(manager, ids[slots[1]]),
            C::fetch(manager, ids[slots[2]]),
            D::fetch(manager, ids[slots[3]]),
        )
    }
}

// ---------------------------------------------------------------------------
// Iterators
// ---------------------------------------------------------------------------

/// Read-only iterator over a view's members, yielding
/// `(Entity, (&A, &B, ...))`.
pub struct ViewIter<'w, Q: ViewQuery> {
    manager: &'w EntityManager,
    entries: &'w [SetEntry],
    /// Tuple position -> slot in each entry's normalized id array.
    slots: Vec<usize>,
    cursor: usize,
    _marker: PhantomData<Q>,
}

impl<'w, Q: ViewQuery> Iterator for ViewIter<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        let (entity, ids) = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some((*entity, Q::fetch_entry(self.manager, ids, &self.slots)))
    }
}

/// Mutable iterator over a view's members.
///
/// Constructed only by [`EntityManager::view_mut`], so the manager is
/// exclusively borrowed for as long as the iterator (and anything it
/// yielded) lives.
pub struct ViewIterMut<'w, Q: ViewQuery> {
    manager: &'w EntityManager,
    entries: &'w [SetEntry],
    slots: Vec<usize>,
    cursor: usize,
    _marker: PhantomData<Q>,
}

impl<'w, Q: ViewQuery> Iterator for ViewIterMut<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        let (entity, ids) = self.entries.get(self.cursor)?;
        self.cursor += 1;
        Some((*entity, Q::fetch_entry(self.manager, ids, &self.slots)))
    }
}

// ---------------------------------------------------------------------------
// EntityManager typed-access methods
// ---------------------------------------------------------------------------

impl EntityManager {
    /// Whether the entity owns every component type in `Q`
    /// (left-to-right short-circuit).
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if the entity is not alive.
    pub fn has_components<Q: ComponentTuple>(&self, entity: Entity) -> Result<bool, EcsError> {
        let kinds = Q::kinds(&self.registry)?;
        let data = self
            .entities
            .get(entity)
            .ok_or(EcsError::StaleEntity { entity })?;
        Ok(data.has_kinds(&kinds))
    }

    /// Borrow all components in `Q` from one entity, in tuple order.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentNotFound`] for the first absent component.
    pub fn get_components<Q: ComponentTuple>(
        &self,
        entity: Entity,
    ) -> Result<Q::Refs<'_>, EcsError> {
        Q::fetch(self, entity)
    }

    /// The singleton entity set for the combination `Q`. Order within the
    /// tuple does not matter: `(A, B)` and `(B, A)` resolve to the same set.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownView`] if the combination was not registered at
    /// build time.
    pub fn entity_set<Q: ComponentTuple>(&self) -> Result<&EntitySet, EcsError> {
        let key = Self::view_key(Q::kinds(&self.registry)?);
        let view_kind = self.find_view(&key)?;
        Ok(&self.views[view_kind.index()])
    }

    /// Mutable access to a singleton entity set, for listener management.
    ///
    /// # Errors
    ///
    /// As [`entity_set`](Self::entity_set).
    pub fn entity_set_mut<Q: ComponentTuple>(&mut self) -> Result<&mut EntitySet, EcsError> {
        let key = Self::view_key(Q::kinds(&self.registry)?);
        let view_kind = self.find_view(&key)?;
        Ok(&mut self.views[view_kind.index()])
    }

    /// Iterate a view read-only.
    ///
    /// # Panics
    ///
    /// Panics if `Q` contains `&mut T` items; use
    /// [`view_mut`](Self::view_mut) for those.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownView`] if the combination was not registered.
    pub fn view<Q: ViewQuery>(&self) -> Result<ViewIter<'_, Q>, EcsError> {
        assert!(
            !Q::HAS_MUTABLE,
            "EntityManager::view() cannot be used with mutable items (&mut T); \
             use EntityManager::view_mut() instead, which requires &mut self"
        );
        let kinds = Q::kinds(&self.registry)?;
        let (view_kind, slots) = self.resolve_slots(&kinds)?;
        Ok(ViewIter {
            manager: self,
            entries: self.views[view_kind.index()].entries(),
            slots,
            cursor: 0,
            _marker: PhantomData,
        })
    }

    /// Iterate a view with mutable access to the items marked `&mut T`.
    ///
    /// # Panics
    ///
    /// Panics if `Q` requests duplicate or overlapping mutable access to one
    /// component type.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownView`] if the combination was not registered.
    pub fn view_mut<Q: ViewQuery>(&mut self) -> Result<ViewIterMut<'_, Q>, EcsError> {
        Q::validate_access(&self.registry);
        let kinds = Q::kinds(&self.registry)?;
        let (view_kind, slots) = self.resolve_slots(&kinds)?;
        Ok(ViewIterMut {
            manager: &*self,
            entries: self.views[view_kind.index()].entries(),
            slots,
            cursor: 0,
            _marker: PhantomData,
        })
    }

    /// Resolve a combination to its view plus the tuple-order -> entry-slot
    /// mapping.
    fn resolve_slots(&self, kinds: &[ComponentKind]) -> Result<(ViewKind, Vec<usize>), EcsError> {
        let key = Self::view_key(kinds.to_vec());
        let view_kind = self.find_view(&key)?;
        let set = &self.views[view_kind.index()];
        let slots = kinds
            .iter()
            .map(|kind| {
                set.kinds()
                    .iter()
                    .position(|set_kind| set_kind == kind)
                    .expect("every tuple kind appears in the normalized key")
            })
            .collect();
        Ok((view_kind, slots))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pos {
        x: f32,
        y: f32,
    }
    impl Component for Pos {}

    #[derive(Debug, PartialEq)]
    struct Vel {
        dx: f32,
        dy: f32,
    }
    impl Component for Vel {}

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    fn manager() -> EntityManager {
        EntityManager::builder()
            .view::<(Pos, Vel)>()
            .component::<Health>()
            .build()
    }

    #[test]
    fn view_yields_matching_entities_only() {
        let mut manager = manager();

        let e1 = manager.create_entity();
        manager.add_component(e1, Pos { x: 1.0, y: 2.0 }).unwrap();
        manager.add_component(e1, Vel { dx: 3.0, dy: 4.0 }).unwrap();

        let e2 = manager.create_entity();
        manager.add_component(e2, Pos { x: 9.0, y: 9.0 }).unwrap();

        let results: Vec<_> = manager.view::<(&Pos, &Vel)>().unwrap().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, e1);
        assert_eq!(results[0].1 .0, &Pos { x: 1.0, y: 2.0 });
        assert_eq!(results[0].1 .1, &Vel { dx: 3.0, dy: 4.0 });
    }

    #[test]
    fn tuple_order_does_not_matter() {
        let mut manager = manager();
        let e = manager.create_entity();
        manager.add_component(e, Pos { x: 1.0, y: 2.0 }).unwrap();
        manager.add_component(e, Vel { dx: 3.0, dy: 4.0 }).unwrap();

        // The set was registered as (Pos, Vel); query it the other way.
        let results: Vec<_> = manager.view::<(&Vel, &Pos)>().unwrap().collect();
        assert_eq!(results[0].1 .0, &Vel { dx: 3.0, dy: 4.0 });
        assert_eq!(results[0].1 .1, &Pos { x: 1.0, y: 2.0 });

        assert_eq!(manager.entity_set::<(Vel, Pos)>().unwrap().len(), 1);
    }

    #[test]
    fn view_mut_modifies_components() {
        let mut manager = manager();
        let e = manager.create_entity();
        manager.add_component(e, Pos { x: 0.0, y: 0.0 }).unwrap();
        manager.add_component(e, Vel { dx: 1.0, dy: 2.0 }).unwrap();

        for (_entity, (pos, vel)) in manager.view_mut::<(&mut Pos, &Vel)>().unwrap() {
            pos.x += vel.dx;
            pos.y += vel.dy;
        }

        assert_eq!(
            manager.get_component::<Pos>(e).unwrap(),
            &Pos { x: 1.0, y: 2.0 }
        );
    }

    #[test]
    fn replacing_a_component_keeps_view_entries_fresh() {
        let mut manager = manager();
        let e = manager.create_entity();
        manager.add_component(e, Pos { x: 1.0, y: 1.0 }).unwrap();
        manager.add_component(e, Vel { dx: 0.0, dy: 0.0 }).unwrap();

        // Replacing Pos gives it a new component id; iteration must see the
        // replacement, not a stale entry.
        manager.add_component(e, Pos { x: 8.0, y: 9.0 }).unwrap();

        let results: Vec<_> = manager.view::<(&Pos, &Vel)>().unwrap().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1 .0, &Pos { x: 8.0, y: 9.0 });
    }

    #[test]
    fn unregistered_combination_errors() {
        let manager = manager();
        assert!(matches!(
            manager.entity_set::<(Pos, Health)>(),
            Err(EcsError::UnknownView { .. })
        ));
        assert!(matches!(
            manager.view::<(&Pos, &Health)>().map(|_| ()),
            Err(EcsError::UnknownView { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "cannot be used with mutable items")]
    fn view_rejects_mutable_items() {
        let manager = manager();
        let _ = manager.view::<(&mut Pos, &Vel)>();
    }

    #[test]
    #[should_panic(expected = "overlapping read and mutable access")]
    fn view_mut_rejects_aliasing_access() {
        let mut manager = manager();
        let _ = manager.view_mut::<(&mut Pos, &Pos)>();
    }

    #[test]
    fn has_and_get_components() {
        let mut manager = manager();
        let e = manager.create_entity();
        manager.add_component(e, Pos { x: 5.0, y: 6.0 }).unwrap();
        manager.add_component(e, Vel { dx: 0.0, dy: 0.0 }).unwrap();

        assert!(manager.has_components::<(Pos, Vel)>(e).unwrap());
        assert!(!manager.has_components::<(Pos, Health)>(e).unwrap());

        let (pos, vel) = manager.get_components::<(Pos, Vel)>(e).unwrap();
        assert_eq!(pos, &Pos { x: 5.0, y: 6.0 });
        assert_eq!(vel, &Vel { dx: 0.0, dy: 0.0 });

        assert!(matches!(
            manager.get_components::<(Pos, Health)>(e),
            Err(EcsError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn view_iteration_skips_no_member() {
        let mut manager = manager();
        let mut expected = Vec::new();
        for i in 0..10 {
            let e = manager.create_entity();
            manager
                .add_component(
                    e,
                    Pos {
                        x: i as f32,
                        y: 0.0,
                    },
                )
                .unwrap();
            if i % 2 == 0 {
                manager.add_component(e, Vel { dx: 1.0, dy: 0.0 }).unwrap();
                expected.push(e);
            }
        }

        let mut seen: Vec<Entity> = manager
            .view::<(&Pos, &Vel)>()
            .unwrap()
            .map(|(entity, _)| entity)
            .collect();
        seen.sort();
        assert_eq!(seen, expected);
    }
}
