//! Type-erased state, the currency of the factory registry.
//!
//! Builders registered under a [`StateName`] return an [`AnyState`]; typed
//! callers recover the concrete `ApplicationState<K>` with
//! [`AnyState::downcast`].

use std::any::{type_name, Any};
use std::fmt;

use crate::kind::{StateKind, StateName};
use crate::state::ApplicationState;

/// A state of some kind, erased.
pub struct AnyState {
    name: StateName,
    type_name: &'static str,
    state: Box<dyn Any + Send + Sync>,
}

impl AnyState {
    pub fn new<K: StateKind>(state: ApplicationState<K>) -> Self {
        Self {
            name: K::NAME,
            type_name: type_name::<ApplicationState<K>>(),
            state: Box::new(state),
        }
    }

    /// The logical name of the erased state's kind.
    pub fn name(&self) -> StateName {
        self.name
    }

    /// Rust type name of the erased state.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<K: StateKind>(&self) -> bool {
        self.state.is::<ApplicationState<K>>()
    }

    pub fn downcast_ref<K: StateKind>(&self) -> Option<&ApplicationState<K>> {
        self.state.downcast_ref()
    }

    /// Recover the typed state, or get `self` back if it is another kind.
    pub fn downcast<K: StateKind>(self) -> Result<ApplicationState<K>, AnyState> {
        let Self { name, type_name, state } = self;
        match state.downcast::<ApplicationState<K>>() {
            Ok(typed) => Ok(*typed),
            Err(state) => Err(Self { name, type_name, state }),
        }
    }
}

impl<K: StateKind> From<ApplicationState<K>> for AnyState {
    fn from(state: ApplicationState<K>) -> Self {
        Self::new(state)
    }
}

impl fmt::Debug for AnyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyState")
            .field("name", &self.name)
            .field("type", &self.type_name)
            .finish()
    }
}
