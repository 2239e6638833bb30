//! Per-kind component dispatch.
//!
//! A [`Visitor`] holds one callback per component kind and is handed to
//! [`EntityManager::visit_entity`](crate::manager::EntityManager::visit_entity),
//! which feeds it every component the entity owns. This is the table-driven
//! substitute for virtual dispatch across unrelated component types: each
//! handler downcasts the type-erased component back to its concrete type.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use crate::component::{Component, ComponentKind, ComponentRegistry};
use crate::EcsError;

type Handler = Box<dyn Fn(&dyn Any)>;

/// Handler table keyed by component kind.
#[derive(Default)]
pub struct Visitor {
    handlers: HashMap<ComponentKind, Handler>,
}

impl Visitor {
    /// Create a visitor with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the handler for component type `T`. At most one handler per
    /// type.
    ///
    /// # Errors
    ///
    /// [`EcsError::HandlerAlreadySet`] if a handler for `T` exists,
    /// [`EcsError::UnknownComponent`] if `T` is not registered.
    pub fn set_handler<T, F>(
        &mut self,
        registry: &ComponentRegistry,
        handler: F,
    ) -> Result<(), EcsError>
    where
        T: Component,
        F: Fn(&T) + 'static,
    {
        let kind = registry.kind_of::<T>()?;
        if self.handlers.contains_key(&kind) {
            return Err(EcsError::HandlerAlreadySet {
                name: type_name::<T>(),
            });
        }
        self.handlers.insert(
            kind,
            Box::new(move |component: &dyn Any| {
                if let Some(component) = component.downcast_ref::<T>() {
                    handler(component);
                }
            }),
        );
        Ok(())
    }

    /// Dispatch one component to its kind's handler.
    ///
    /// # Errors
    ///
    /// [`EcsError::HandlerMissing`] when no handler is set for `kind`.
    pub(crate) fn handle(&self, kind: ComponentKind, component: &dyn Any) -> Result<(), EcsError> {
        match self.handlers.get(&kind) {
            Some(handler) => {
                handler(component);
                Ok(())
            }
            None => Err(EcsError::HandlerMissing { kind }),
        }
    }
}

impl fmt::Debug for Visitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visitor")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Pos {
        x: f32,
    }
    impl Component for Pos {}

    #[derive(Debug)]
    struct Vel {
        dx: f32,
    }
    impl Component for Vel {}

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry.register::<Pos>();
        registry.register::<Vel>();
        registry
    }

    #[test]
    fn handler_receives_concrete_component() {
        let registry = registry();
        let mut visitor = Visitor::new();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        visitor
            .set_handler::<Pos, _>(&registry, move |pos| sink.borrow_mut().push(pos.x))
            .unwrap();

        let kind = registry.kind_of::<Pos>().unwrap();
        visitor.handle(kind, &Pos { x: 4.0 }).unwrap();
        assert_eq!(*seen.borrow(), vec![4.0]);
    }

    #[test]
    fn duplicate_handler_is_rejected() {
        let registry = registry();
        let mut visitor = Visitor::new();
        visitor.set_handler::<Pos, _>(&registry, |_| {}).unwrap();
        assert!(matches!(
            visitor.set_handler::<Pos, _>(&registry, |_| {}),
            Err(EcsError::HandlerAlreadySet { .. })
        ));
    }

    #[test]
    fn missing_handler_is_an_error() {
        let registry = registry();
        let visitor = Visitor::new();
        let kind = registry.kind_of::<Vel>().unwrap();
        assert!(matches!(
            visitor.handle(kind, &Vel { dx: 0.0 }),
            Err(EcsError::HandlerMissing { .. })
        ));
    }

    #[test]
    fn unregistered_type_is_rejected() {
        struct Unregistered;
        impl Component for Unregistered {}

        let registry = registry();
        let mut visitor = Visitor::new();
        assert!(matches!(
            visitor.set_handler::<Unregistered, _>(&registry, |_| {}),
            Err(EcsError::UnknownComponent { .. })
        ));
    }
}
