//! Reactively maintained entity sets.
//!
//! An [`EntitySet`] tracks every entity that currently owns all component
//! kinds in a fixed combination. The [`EntityManager`](crate::manager::EntityManager)
//! notifies the interested sets after each component mutation (via the
//! per-kind fan-out lists built at construction time), and each set keeps
//! its dense membership list in sync in O(1) per notification, firing
//! added/removed listeners on real transitions only.
//!
//! Membership entries carry the component ids of every kind in the
//! combination, so typed iteration (see [`view`](crate::view)) reaches each
//! component with a single pool access and no map lookups.

use std::collections::HashMap;
use std::fmt;

use crate::component::{ComponentId, ComponentKind};
use crate::entity::{Entity, EntityData};
use crate::sparse_set::{SparseKey, SparseSet};

// ---------------------------------------------------------------------------
// ViewKind
// ---------------------------------------------------------------------------

/// Dense runtime index identifying one registered component combination.
///
/// Combinations are normalized (kinds sorted, duplicates removed) before
/// registration, so the same set of types always resolves to the same view
/// regardless of the order it is written in.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewKind(pub(crate) u32);

impl ViewKind {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewKind({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// Handle for removing a previously added entity-set listener.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

impl SparseKey for ListenerId {
    fn from_index(index: usize) -> Self {
        ListenerId(index as u32)
    }
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId({})", self.0)
    }
}

/// Callback invoked with the entity entering or leaving a set.
///
/// Listeners receive only the entity id; they cannot reach back into the
/// manager during notification, which makes reentrant mutation of the
/// entity being notified impossible by construction.
pub type EntityListener = Box<dyn FnMut(Entity)>;

// ---------------------------------------------------------------------------
// EntitySet
// ---------------------------------------------------------------------------

/// One membership entry: the entity plus its component ids in key order.
pub(crate) type SetEntry = (Entity, Box<[ComponentId]>);

/// The live set of entities owning every component kind in one combination.
pub struct EntitySet {
    kind: ViewKind,
    /// Normalized combination key: sorted, deduplicated kinds.
    kinds: Box<[ComponentKind]>,
    /// Dense membership list; entry order is insertion/swap order.
    entries: Vec<SetEntry>,
    /// Entity to entry index, for O(1) membership tests and removal.
    index: HashMap<Entity, usize>,
    added_listeners: SparseSet<ListenerId, EntityListener>,
    removed_listeners: SparseSet<ListenerId, EntityListener>,
}

impl EntitySet {
    pub(crate) fn new(kind: ViewKind, kinds: Box<[ComponentKind]>) -> Self {
        Self {
            kind,
            kinds,
            entries: Vec::new(),
            index: HashMap::new(),
            added_listeners: SparseSet::new(),
            removed_listeners: SparseSet::new(),
        }
    }

    /// The normalized component combination this set tracks.
    pub fn kinds(&self) -> &[ComponentKind] {
        &self.kinds
    }

    /// Number of entities currently in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entity currently satisfies the combination.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `entity` is currently in the set.
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Iterate the member entities in dense order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.iter().map(|(entity, _)| *entity)
    }

    pub(crate) fn entries(&self) -> &[SetEntry] {
        &self.entries
    }

    // -- listeners ----------------------------------------------------------

    /// Register a callback fired after an entity enters the set. Listeners
    /// fire in registration order.
    pub fn add_entity_added_listener(
        &mut self,
        listener: impl FnMut(Entity) + 'static,
    ) -> ListenerId {
        self.added_listeners.emplace(Box::new(listener)).0
    }

    /// Remove an added-listener by id. Returns `false` if the id is not
    /// live.
    pub fn remove_entity_added_listener(&mut self, id: ListenerId) -> bool {
        self.added_listeners.erase(id).is_some()
    }

    /// Register a callback fired after an entity leaves the set (including
    /// on entity destruction).
    pub fn add_entity_removed_listener(
        &mut self,
        listener: impl FnMut(Entity) + 'static,
    ) -> ListenerId {
        self.removed_listeners.emplace(Box::new(listener)).0
    }

    /// Remove a removed-listener by id. Returns `false` if the id is not
    /// live.
    pub fn remove_entity_removed_listener(&mut self, id: ListenerId) -> bool {
        self.removed_listeners.erase(id).is_some()
    }

    // -- reactive maintenance (driven by the manager) -----------------------

    /// Whether `data` currently satisfies the full combination.
    pub(crate) fn satisfies(&self, data: &EntityData) -> bool {
        data.has_kinds(&self.kinds)
    }

    /// Re-evaluate one entity after a component mutation.
    ///
    /// Exactly one transition can happen per call: an entity newly
    /// satisfying the combination is added (and its data marked with this
    /// set's membership), an entity newly failing it is removed. Updates
    /// that do not change the satisfaction status fire no listeners; for a
    /// still-managed entity the entry's component ids are refreshed, since
    /// replacing a component gives it a new id.
    pub(crate) fn on_entity_updated(&mut self, entity: Entity, data: &mut EntityData) {
        let satisfied = self.satisfies(data);
        let managed = self.contains(entity);

        if satisfied && !managed {
            self.add_entity(entity, data);
        } else if !satisfied && managed {
            self.remove_entity(entity, Some(data));
        } else if satisfied && managed {
            self.refresh_entity(entity, data);
        }
    }

    /// Drop a destroyed entity from the set.
    ///
    /// The entity's data is about to be discarded by the manager, so its
    /// membership set is left untouched. No-op if the entity was not
    /// managed.
    pub(crate) fn on_entity_removed(&mut self, entity: Entity) {
        self.remove_entity(entity, None);
    }

    fn add_entity(&mut self, entity: Entity, data: &mut EntityData) {
        self.index.insert(entity, self.entries.len());
        data.add_membership(self.kind);
        let ids: Box<[ComponentId]> = self
            .kinds
            .iter()
            .map(|&kind| {
                data.component_id(kind)
                    .expect("satisfied combination is missing a component id")
            })
            .collect();
        self.entries.push((entity, ids));

        for listener in self.added_listeners.objects_mut() {
            listener(entity);
        }
    }

    fn refresh_entity(&mut self, entity: Entity, data: &EntityData) {
        let Some(&index) = self.index.get(&entity) else {
            return;
        };
        let ids = &mut self.entries[index].1;
        for (slot, &kind) in self.kinds.iter().enumerate() {
            ids[slot] = data
                .component_id(kind)
                .expect("satisfied combination is missing a component id");
        }
    }

    fn remove_entity(&mut self, entity: Entity, data: Option<&mut EntityData>) {
        let Some(index) = self.index.remove(&entity) else {
            return;
        };

        self.entries.swap_remove(index);
        if index < self.entries.len() {
            let moved = self.entries[index].0;
            self.index.insert(moved, index);
        }

        if let Some(data) = data {
            data.remove_membership(self.kind);
        }

        for listener in self.removed_listeners.objects_mut() {
            listener(entity);
        }
    }
}

impl fmt::Debug for EntitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySet")
            .field("kind", &self.kind)
            .field("kinds", &self.kinds)
            .field("len", &self.entries.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
