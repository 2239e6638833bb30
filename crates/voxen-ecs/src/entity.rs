//! Entity identifiers and per-entity bookkeeping.
//!
//! An [`Entity`] is an opaque key into the manager's entity store; it
//! carries no payload of its own. The associated [`EntityData`] records
//! which component instance the entity owns per kind, and which entity sets
//! currently include it. Entities live in a
//! [`SparseSet`](crate::sparse_set::SparseSet), so freed ids are recycled:
//! a destroyed entity's id may later denote a different entity.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::component::{ComponentId, ComponentKind};
use crate::entity_set::ViewKind;
use crate::sparse_set::{SparseKey, SparseSet};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Opaque identifier for a simulated object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl SparseKey for Entity {
    fn from_index(index: usize) -> Self {
        Entity(index as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// EntityData
// ---------------------------------------------------------------------------

/// Per-entity bookkeeping, owned by the entity container.
///
/// Invariant: `component_ids` has an entry for a kind iff the entity
/// currently owns a live component of that kind in the kind's pool.
#[derive(Debug, Default)]
pub struct EntityData {
    component_ids: HashMap<ComponentKind, ComponentId>,
    memberships: HashSet<ViewKind>,
}

impl EntityData {
    // -- components ---------------------------------------------------------

    /// Whether the entity owns a component of `kind`.
    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.component_ids.contains_key(&kind)
    }

    /// Whether the entity owns a component of every kind in `kinds`
    /// (short-circuits on the first miss).
    pub fn has_kinds(&self, kinds: &[ComponentKind]) -> bool {
        kinds.iter().all(|&kind| self.has_kind(kind))
    }

    /// The component id recorded for `kind`, if any.
    pub fn component_id(&self, kind: ComponentKind) -> Option<ComponentId> {
        self.component_ids.get(&kind).copied()
    }

    /// All `(kind, id)` pairs the entity owns.
    pub fn components(&self) -> &HashMap<ComponentKind, ComponentId> {
        &self.component_ids
    }

    /// Record ownership of a component. Overwrites any previous mapping for
    /// the kind and returns the displaced id so the caller can erase it from
    /// the pool.
    pub fn insert_component(&mut self, kind: ComponentKind, id: ComponentId) -> Option<ComponentId> {
        self.component_ids.insert(kind, id)
    }

    /// Drop the ownership record for `kind`, returning the id so the caller
    /// can erase the component itself. `None` when the entity does not own
    /// the kind.
    pub fn remove_component(&mut self, kind: ComponentKind) -> Option<ComponentId> {
        self.component_ids.remove(&kind)
    }

    // -- entity-set memberships ---------------------------------------------

    /// The views currently including this entity.
    pub fn memberships(&self) -> &HashSet<ViewKind> {
        &self.memberships
    }

    pub(crate) fn add_membership(&mut self, view: ViewKind) {
        self.memberships.insert(view);
    }

    pub(crate) fn remove_membership(&mut self, view: ViewKind) {
        self.memberships.remove(&view);
    }
}

/// All entities of one manager, with their bookkeeping data.
pub type EntityContainer = SparseSet<Entity, EntityData>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
