//! Environments: one lexical frame plus a link to the enclosing frame.
//!
//! Frames live in an arena owned by `Runtime` and are addressed by `EnvId`;
//! `tail` is a plain id, so frames never own each other. The global frame
//! is always `EnvId::GLOBAL`.

mod runtime;
mod tree;

use std::fmt;

use pyx_ir::{Name, Span};
use rustc_hash::FxHashMap;

use crate::heap::Heap;
use crate::value::Value;

pub use runtime::Runtime;
pub use tree::EnvironmentTree;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct EnvId(u32);

impl EnvId {
    pub const GLOBAL: EnvId = EnvId(0);
}

/// The global environment displays as `-1`; others by allocation order.
impl fmt::Display for EnvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == EnvId::GLOBAL {
            write!(f, "-1")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// State of a name in a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Binding {
    /// Declared by hoisting but not yet assigned.
    Declared,
    Value(Value),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub binding: Binding,
    pub constant: bool,
}

#[derive(Clone, Debug)]
pub struct Environment {
    pub id: EnvId,
    pub name: String,
    pub tail: Option<EnvId>,
    head: FxHashMap<Name, Slot>,
    /// Declaration order, for display.
    order: Vec<Name>,
    pub heap: Heap,
    /// The call that created this frame, for function environments.
    pub call_site: Option<Span>,
}

impl Environment {
    fn new(id: EnvId, name: String, tail: Option<EnvId>) -> Self {
        Environment {
            id,
            name,
            tail,
            head: FxHashMap::default(),
            order: Vec::new(),
            heap: Heap::new(),
            call_site: None,
        }
    }

    pub fn lookup(&self, name: Name) -> Option<&Slot> {
        self.head.get(&name)
    }

    /// Bindings in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = (Name, &Slot)> {
        self.order
            .iter()
            .filter_map(|name| self.head.get(name).map(|slot| (*name, slot)))
    }

    /// Values bound in this frame, in no particular order.
    fn values(&self) -> impl Iterator<Item = &Value> {
        self.head.values().filter_map(|slot| match &slot.binding {
            Binding::Value(value) => Some(value),
            Binding::Declared => None,
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `false` if `name` is already in this frame.
    fn declare(&mut self, name: Name, constant: bool) -> bool {
        if self.head.contains_key(&name) {
            return false;
        }
        self.head.insert(
            name,
            Slot {
                binding: Binding::Declared,
                constant,
            },
        );
        self.order.push(name);
        true
    }

    /// Returns `false` if `name` was never declared here.
    fn define(&mut self, name: Name, value: Value, constant: bool) -> bool {
        match self.head.get_mut(&name) {
            Some(slot) => {
                slot.binding = Binding::Value(value);
                slot.constant = constant;
                true
            }
            None => false,
        }
    }

    fn slot_mut(&mut self, name: Name) -> Option<&mut Slot> {
        self.head.get_mut(&name)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
