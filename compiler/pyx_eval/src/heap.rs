//! Heap objects and per-environment ownership.
//!
//! Closures and lists live in one `ObjectStore` per run and are referred
//! to by `ObjId`. Each object is owned by exactly one environment, whose
//! `Heap` lists it; returning an object out of its frame moves it to the
//! heap of the environment being restored. Objects nothing refers to are
//! freed by `Runtime::collect`.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::closure::Closure;
use crate::environment::EnvId;
use crate::errors::{self, EvalResult};
use crate::value::Value;

/// Handle to a heap object.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ObjId(u32);

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The set of objects owned by one environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Heap {
    items: FxHashSet<ObjId>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, items: impl IntoIterator<Item = ObjId>) {
        self.items.extend(items);
    }

    pub fn contains(&self, item: ObjId) -> bool {
        self.items.contains(&item)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Transfer `item` to `other`. Returns `false` if this heap does not
    /// hold it.
    pub fn move_to(&mut self, item: ObjId, other: &mut Heap) -> bool {
        if self.items.remove(&item) {
            other.items.insert(item);
            true
        } else {
            false
        }
    }

    /// Keep only the objects for which `keep` is true.
    pub fn retain(&mut self, keep: impl Fn(ObjId) -> bool) {
        self.items.retain(|id| keep(*id));
    }

    /// Contents in allocation order.
    pub fn get_heap(&self) -> Vec<ObjId> {
        let mut items: Vec<ObjId> = self.items.iter().copied().collect();
        items.sort_unstable();
        items
    }
}

#[derive(Clone, Debug)]
pub enum HeapData {
    Closure(Closure),
    List(Vec<Value>),
}

#[derive(Clone, Debug)]
pub struct HeapObject {
    pub owner: EnvId,
    pub data: HeapData,
}

/// Storage for the live heap objects of one run.
///
/// Ids are never reused, so a freed id stays invalid.
#[derive(Clone, Debug, Default)]
pub struct ObjectStore {
    objects: FxHashMap<ObjId, HeapObject>,
    next: u32,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` and record `owner`. The caller adds the id to the
    /// owner's `Heap`.
    pub fn alloc(&mut self, owner: EnvId, data: HeapData) -> EvalResult<ObjId> {
        let id = ObjId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .ok_or_else(|| errors::internal("too many heap objects"))?;
        self.objects.insert(id, HeapObject { owner, data });
        Ok(id)
    }

    pub fn get(&self, id: ObjId) -> Option<&HeapObject> {
        self.objects.get(&id)
    }

    pub fn closure(&self, id: ObjId) -> Option<&Closure> {
        match &self.get(id)?.data {
            HeapData::Closure(closure) => Some(closure),
            HeapData::List(_) => None,
        }
    }

    pub fn closure_mut(&mut self, id: ObjId) -> Option<&mut Closure> {
        match &mut self.objects.get_mut(&id)?.data {
            HeapData::Closure(closure) => Some(closure),
            HeapData::List(_) => None,
        }
    }

    pub fn list(&self, id: ObjId) -> Option<&[Value]> {
        match &self.get(id)?.data {
            HeapData::List(items) => Some(items),
            HeapData::Closure(_) => None,
        }
    }

    pub fn owner(&self, id: ObjId) -> Option<EnvId> {
        self.get(id).map(|obj| obj.owner)
    }

    pub fn set_owner(&mut self, id: ObjId, owner: EnvId) {
        if let Some(obj) = self.objects.get_mut(&id) {
            obj.owner = owner;
        }
    }

    /// Free every object for which `keep` is false.
    pub fn retain(&mut self, keep: impl Fn(ObjId) -> bool) {
        self.objects.retain(|id, _| keep(*id));
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
