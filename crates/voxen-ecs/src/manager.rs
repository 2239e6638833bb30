//! The [`EntityManager`] is the façade over entity storage, component pools
//! and reactive entity sets.
//!
//! Managers are constructed through an [`EntityManagerBuilder`] that takes
//! the full list of component types and view combinations up front. The
//! build step allocates one pool per component kind, one
//! [`EntitySet`](crate::entity_set::EntitySet) per combination, and the
//! per-kind fan-out lists that let a component mutation notify only the
//! views interested in that kind. Anything not registered at build time
//! surfaces later as a typed error; there is no implicit registration.

use std::any::type_name;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::component::{
    Component, ComponentId, ComponentKind, ComponentPool, ComponentRegistry, ComponentStore,
};
use crate::entity::{Entity, EntityContainer, EntityData};
use crate::entity_set::{EntitySet, ViewKind};
use crate::view::ComponentTuple;
use crate::visitor::Visitor;
use crate::EcsError;

// ---------------------------------------------------------------------------
// EntityManagerBuilder
// ---------------------------------------------------------------------------

/// Collects component types and view combinations, then builds the manager.
///
/// Registration is idempotent: registering a type or combination twice has
/// no extra effect. [`view`](Self::view) registers the combination's
/// component types as a side effect, so listing them separately via
/// [`component`](Self::component) is only needed for types used outside any
/// view.
#[derive(Default)]
pub struct EntityManagerBuilder {
    registry: ComponentRegistry,
    view_keys: Vec<Box<[ComponentKind]>>,
}

impl EntityManagerBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component type.
    pub fn component<T: Component>(mut self) -> Self {
        self.registry.register::<T>();
        self
    }

    /// Register a view over a component combination, e.g.
    /// `.view::<(Position, Velocity)>()`. The combination is normalized, so
    /// `(A, B)` and `(B, A)` register the same view.
    pub fn view<Q: ComponentTuple>(mut self) -> Self {
        let key = normalize(Q::register(&mut self.registry));
        if !self.view_keys.iter().any(|existing| **existing == *key) {
            self.view_keys.push(key);
        }
        self
    }

    /// Construct the manager: pools, entity sets and fan-out wiring.
    pub fn build(self) -> EntityManager {
        let component_count = self.registry.len();

        let pools: Vec<Box<dyn ComponentStore>> = (0..component_count)
            .map(|index| {
                self.registry
                    .create_store(ComponentKind(index as u32))
                    .expect("kind allocated by this registry")
            })
            .collect();

        let mut component_to_views: Vec<Vec<ViewKind>> = vec![Vec::new(); component_count];
        let mut views = Vec::with_capacity(self.view_keys.len());
        let mut view_index = HashMap::with_capacity(self.view_keys.len());

        for (index, key) in self.view_keys.into_iter().enumerate() {
            let view_kind = ViewKind(index as u32);
            for &component_kind in key.iter() {
                component_to_views[component_kind.index()].push(view_kind);
            }
            view_index.insert(key.clone(), view_kind);
            views.push(EntitySet::new(view_kind, key));
        }

        debug!(
            components = component_count,
            views = views.len(),
            "entity manager built"
        );

        EntityManager {
            registry: self.registry,
            pools,
            entities: EntityContainer::new(),
            views,
            view_index,
            component_to_views,
        }
    }
}

/// Sort and deduplicate a combination into its canonical key.
fn normalize(mut kinds: Vec<ComponentKind>) -> Box<[ComponentKind]> {
    kinds.sort();
    kinds.dedup();
    kinds.into()
}

// ---------------------------------------------------------------------------
// EntityManager
// ---------------------------------------------------------------------------

/// Entity lifecycle and component access authority.
///
/// All mutation is single-threaded; nothing here locks. References returned
/// by component accessors borrow the manager, so the borrow checker rules
/// out holding one across a later mutating call.
pub struct EntityManager {
    pub(crate) registry: ComponentRegistry,
    pub(crate) pools: Vec<Box<dyn ComponentStore>>,
    pub(crate) entities: EntityContainer,
    pub(crate) views: Vec<EntitySet>,
    pub(crate) view_index: HashMap<Box<[ComponentKind]>, ViewKind>,
    component_to_views: Vec<Vec<ViewKind>>,
}

impl EntityManager {
    /// Start building a manager.
    pub fn builder() -> EntityManagerBuilder {
        EntityManagerBuilder::new()
    }

    /// Read-only access to the component registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Pre-size the entity store. Purely an optimization.
    pub fn reserve(&mut self, additional: usize) {
        self.entities.reserve(additional);
    }

    // -- entities -----------------------------------------------------------

    /// Create a fresh entity with no components.
    pub fn create_entity(&mut self) -> Entity {
        let (entity, _) = self.entities.emplace(EntityData::default());
        trace!(?entity, "entity created");
        entity
    }

    /// Whether `entity` is currently alive.
    pub fn has_entity(&self, entity: Entity) -> bool {
        self.entities.has(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Destroy an entity: strip every owned component, notify each view it
    /// belongs to, then erase its bookkeeping, in that order, so views
    /// never observe a half-destroyed entity.
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if the entity is not alive.
    pub fn remove_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let data = self
            .entities
            .get(entity)
            .ok_or(EcsError::StaleEntity { entity })?;
        let owned: Vec<(ComponentKind, ComponentId)> =
            data.components().iter().map(|(&k, &id)| (k, id)).collect();
        let memberships: Vec<ViewKind> = data.memberships().iter().copied().collect();

        for (kind, id) in owned {
            self.pools[kind.index()].remove(id)?;
        }
        for view_kind in memberships {
            self.views[view_kind.index()].on_entity_removed(entity);
        }
        self.entities.erase(entity);
        trace!(?entity, "entity removed");
        Ok(())
    }

    // -- components ---------------------------------------------------------

    /// Attach a component to an entity and return a reference to the stored
    /// value. A pre-existing component of the same type is replaced (the old
    /// instance is dropped). Every view interested in `T` re-evaluates the
    /// entity before this returns.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownComponent`] if `T` was not registered at build
    /// time, [`EcsError::StaleEntity`] if the entity is not alive.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<&mut T, EcsError> {
        let kind = self.registry.kind_of::<T>()?;
        if !self.entities.has(entity) {
            return Err(EcsError::StaleEntity { entity });
        }

        let (id, _) = self.pool_mut_by_kind::<T>(kind).components.emplace(component);
        let displaced = self
            .entities
            .get_mut(entity)
            .expect("entity checked live above")
            .insert_component(kind, id);
        if let Some(old) = displaced {
            self.pool_mut_by_kind::<T>(kind).components.erase(old);
        }

        self.notify_views(kind, entity);

        self.pool_mut_by_kind::<T>(kind)
            .components
            .get_mut(id)
            .ok_or(EcsError::StaleComponent {
                id,
                component: type_name::<T>(),
            })
    }

    /// Detach a component from an entity. Every view interested in `T`
    /// re-evaluates the entity before this returns.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentNotFound`] if the entity does not own a `T`;
    /// [`EcsError::StaleEntity`] / [`EcsError::UnknownComponent`] as for
    /// [`add_component`](Self::add_component).
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        let kind = self.registry.kind_of::<T>()?;
        let data = self
            .entities
            .get_mut(entity)
            .ok_or(EcsError::StaleEntity { entity })?;
        let id = data
            .remove_component(kind)
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: type_name::<T>(),
            })?;
        self.pools[kind.index()].remove(id)?;

        self.notify_views(kind, entity);
        Ok(())
    }

    /// Whether the entity owns a component of type `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::StaleEntity`] if the entity is not alive (distinguishing
    /// "entity gone" from "component absent").
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool, EcsError> {
        let kind = self.registry.kind_of::<T>()?;
        let data = self
            .entities
            .get(entity)
            .ok_or(EcsError::StaleEntity { entity })?;
        Ok(data.has_kind(kind))
    }

    /// Borrow the entity's component of type `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::ComponentNotFound`] if absent; [`EcsError::StaleEntity`]
    /// if the entity is not alive.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        let kind = self.registry.kind_of::<T>()?;
        let id = self.component_id_of::<T>(entity, kind)?;
        self.pool_by_kind::<T>(kind)
            .components
            .get(id)
            .ok_or(EcsError::StaleComponent {
                id,
                component: type_name::<T>(),
            })
    }

    /// Mutably borrow the entity's component of type `T`.
    ///
    /// # Errors
    ///
    /// As [`get_component`](Self::get_component).
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        let kind = self.registry.kind_of::<T>()?;
        let id = self.component_id_of::<T>(entity, kind)?;
        self.pool_mut_by_kind::<T>(kind)
            .components
            .get_mut(id)
            .ok_or(EcsError::StaleComponent {
                id,
                component: type_name::<T>(),
            })
    }

    // -- visitor dispatch ---------------------------------------------------

    /// Dispatch each of the entity's present components to the visitor's
    /// handler for its kind. Dispatch order over kinds is unspecified.
    ///
    /// # Errors
    ///
    /// [`EcsError::HandlerMissing`] if a present kind has no handler;
    /// [`EcsError::StaleEntity`] if the entity is not alive.
    pub fn visit_entity(&self, entity: Entity, visitor: &Visitor) -> Result<(), EcsError> {
        let data = self
            .entities
            .get(entity)
            .ok_or(EcsError::StaleEntity { entity })?;
        for (&kind, &id) in data.components() {
            let component = self.pools[kind.index()].get_dyn(id)?;
            visitor.handle(kind, component)?;
        }
        Ok(())
    }

    // -- internals ----------------------------------------------------------

    /// Resolve the view kind for a normalized combination key.
    pub(crate) fn find_view(&self, key: &[ComponentKind]) -> Result<ViewKind, EcsError> {
        self.view_index
            .get(key)
            .copied()
            .ok_or_else(|| EcsError::UnknownView {
                combination: key
                    .iter()
                    .map(|&kind| self.registry.name_of(kind).unwrap_or("?"))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Canonical key for a combination written in any order.
    pub(crate) fn view_key(kinds: Vec<ComponentKind>) -> Box<[ComponentKind]> {
        normalize(kinds)
    }

    fn component_id_of<T: Component>(
        &self,
        entity: Entity,
        kind: ComponentKind,
    ) -> Result<ComponentId, EcsError> {
        let data = self
            .entities
            .get(entity)
            .ok_or(EcsError::StaleEntity { entity })?;
        data.component_id(kind).ok_or(EcsError::ComponentNotFound {
            entity,
            component: type_name::<T>(),
        })
    }

    pub(crate) fn pool_by_kind<T: Component>(&self, kind: ComponentKind) -> &ComponentPool<T> {
        self.pools[kind.index()]
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
            .expect("pool type matches its registered kind")
    }

    pub(crate) fn pool_mut_by_kind<T: Component>(
        &mut self,
        kind: ComponentKind,
    ) -> &mut ComponentPool<T> {
        self.pools[kind.index()]
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
            .expect("pool type matches its registered kind")
    }

    /// Re-evaluate the entity in every view interested in `kind`.
    fn notify_views(&mut self, kind: ComponentKind, entity: Entity) {
        let Self {
            entities,
            views,
            component_to_views,
            ..
        } = self;
        let Some(data) = entities.get_mut(entity) else {
            return;
        };
        for &view_kind in &component_to_views[kind.index()] {
            views[view_kind.index()].on_entity_updated(entity, data);
        }
    }
}

impl std::fmt::Debug for EntityManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityManager")
            .field("entity_count", &self.entities.len())
            .field("component_kinds", &self.registry.len())
            .field("views", &self.views.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
