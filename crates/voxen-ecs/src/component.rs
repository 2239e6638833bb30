//! Component type registration and type-erased component storage.
//!
//! Every component type used with an [`EntityManager`](crate::manager::EntityManager)
//! is registered up front in a [`ComponentRegistry`], which assigns it a
//! dense [`ComponentKind`] index. The registry also knows how to build the
//! type-erased [`ComponentPool`] for each kind, so the manager can hold one
//! homogeneous vector of stores over heterogeneous component types.
//!
//! Registration is explicit and happens before the manager is constructed
//! (see [`EntityManagerBuilder`](crate::manager::EntityManagerBuilder));
//! referencing an unregistered type surfaces as
//! [`EcsError::UnknownComponent`] rather than silently missing wiring.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::sparse_set::{SparseKey, SparseSet};
use crate::EcsError;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// Marker trait for component payload types.
///
/// Components are plain data attached to entities, at most one instance per
/// type per entity. The `T: Component` bound on every generic ECS API is the
/// compile-time contract that only declared component types reach the
/// storage layer.
pub trait Component: 'static {}

// ---------------------------------------------------------------------------
// ComponentKind
// ---------------------------------------------------------------------------

/// Dense runtime index uniquely identifying a registered component type.
///
/// Stable for the registry's lifetime; two different Rust types never share
/// a kind, and the valid range is exactly `[0, registry.len())`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(pub(crate) u32);

impl ComponentKind {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKind({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ComponentId
// ---------------------------------------------------------------------------

/// Opaque stable identifier of one component instance within its kind's
/// pool. Ids of different kinds are not comparable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u32);

impl SparseKey for ComponentId {
    fn from_index(index: usize) -> Self {
        ComponentId(index as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ComponentStore -- the type-erased interface
// ---------------------------------------------------------------------------

/// Closed polymorphic interface over one kind's component storage.
///
/// Exactly two storage operations exist at this level: get-by-id and
/// remove-by-id, both requiring a live id (stricter than the underlying
/// [`SparseSet`], whose erase is a silent no-op; callers here are expected
/// to have validated ownership through
/// [`EntityData`](crate::entity::EntityData) first). The `as_any` pair is
/// the downcast seam back to the typed [`ComponentPool`]; all type-specific
/// behavior lives there, not on this interface.
pub(crate) trait ComponentStore {
    /// The component for `id` as `&dyn Any`, for visitor dispatch.
    fn get_dyn(&self, id: ComponentId) -> Result<&dyn Any, EcsError>;

    /// Remove the component for `id`.
    fn remove(&mut self, id: ComponentId) -> Result<(), EcsError>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// ComponentPool<T>
// ---------------------------------------------------------------------------

/// Typed storage for all components of one kind: a sparse set keyed by
/// [`ComponentId`].
pub(crate) struct ComponentPool<T: Component> {
    pub(crate) components: SparseSet<ComponentId, T>,
    name: &'static str,
}

impl<T: Component> ComponentPool<T> {
    fn new() -> Self {
        Self {
            components: SparseSet::new(),
            name: type_name::<T>(),
        }
    }
}

impl<T: Component> ComponentStore for ComponentPool<T> {
    fn get_dyn(&self, id: ComponentId) -> Result<&dyn Any, EcsError> {
        match self.components.get(id) {
            Some(component) => Ok(component as &dyn Any),
            None => Err(EcsError::StaleComponent {
                id,
                component: self.name,
            }),
        }
    }

    fn remove(&mut self, id: ComponentId) -> Result<(), EcsError> {
        match self.components.erase(id) {
            Some(_) => Ok(()),
            None => Err(EcsError::StaleComponent {
                id,
                component: self.name,
            }),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// ComponentRegistry
// ---------------------------------------------------------------------------

/// Factory producing the type-erased store for one registered kind.
type StoreFactory = fn() -> Box<dyn ComponentStore>;

fn make_pool<T: Component>() -> Box<dyn ComponentStore> {
    Box::new(ComponentPool::<T>::new())
}

/// Maps Rust component types to [`ComponentKind`] indices and builds their
/// pools.
///
/// A type registers at most once; re-registering returns the existing kind.
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentKind>,
    factories: Vec<StoreFactory>,
    names: Vec<&'static str>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            factories: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Register a component type, returning its kind. Idempotent.
    pub fn register<T: Component>(&mut self) -> ComponentKind {
        let rust_type_id = TypeId::of::<T>();
        if let Some(&existing) = self.by_type.get(&rust_type_id) {
            return existing;
        }

        let kind = ComponentKind(self.factories.len() as u32);
        self.factories.push(make_pool::<T>);
        self.names.push(type_name::<T>());
        self.by_type.insert(rust_type_id, kind);
        kind
    }

    /// The kind registered for `T`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownComponent`] if `T` was never registered.
    pub fn kind_of<T: Component>(&self) -> Result<ComponentKind, EcsError> {
        self.by_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::UnknownComponent {
                name: type_name::<T>(),
            })
    }

    /// Build the type-erased pool for `kind`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownKind`] if `kind` was not allocated by this
    /// registry.
    pub(crate) fn create_store(
        &self,
        kind: ComponentKind,
    ) -> Result<Box<dyn ComponentStore>, EcsError> {
        match self.factories.get(kind.index()) {
            Some(factory) => Ok(factory()),
            None => Err(EcsError::UnknownKind { kind }),
        }
    }

    /// Diagnostic name of a registered kind.
    pub fn name_of(&self, kind: ComponentKind) -> Option<&'static str> {
        self.names.get(kind.index()).copied()
    }

    /// Number of registered component types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no component types have been registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("len", &self.len())
            .field("names", &self.names)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
