use pyx_ir::{Name, SharedInterner, Span, StringInterner};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::{Binding, EnvId, Environment, EnvironmentTree};
use crate::closure::Closure;
use crate::errors::{self, EvalResult};
use crate::heap::{HeapData, ObjId, ObjectStore};
use crate::value::Value;

/// Allocations between collections never drop below this.
const MIN_COLLECT_THRESHOLD: usize = 256;

/// Environment arena, active-environment stack, and heap objects of one
/// run.
///
/// The current environment is the top of `active`. Only
/// `push_environment`, `pop_environment` and `unwind_to` change it.
/// Environments and objects that nothing reachable refers to are freed by
/// `collect`; ids are never reused.
#[derive(Clone, Debug)]
pub struct Runtime {
    environments: FxHashMap<EnvId, Environment>,
    next_env: u32,
    active: Vec<EnvId>,
    tree: EnvironmentTree,
    objects: ObjectStore,
    interner: SharedInterner,
    /// Environments and objects created since the last collection.
    allocated: usize,
    collect_threshold: usize,
}

impl Runtime {
    /// A runtime holding only the global environment, which is active.
    pub fn new(interner: SharedInterner) -> Self {
        let global = Environment::new(EnvId::GLOBAL, "global".to_string(), None);
        let mut environments = FxHashMap::default();
        environments.insert(EnvId::GLOBAL, global);
        Runtime {
            environments,
            next_env: EnvId::GLOBAL.0 + 1,
            active: vec![EnvId::GLOBAL],
            tree: EnvironmentTree::new(EnvId::GLOBAL),
            objects: ObjectStore::new(),
            interner,
            allocated: 0,
            collect_threshold: MIN_COLLECT_THRESHOLD,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectStore {
        &mut self.objects
    }

    pub fn tree(&self) -> &EnvironmentTree {
        &self.tree
    }

    pub fn environment(&self, id: EnvId) -> Option<&Environment> {
        self.environments.get(&id)
    }

    fn environment_mut(&mut self, id: EnvId) -> EvalResult<&mut Environment> {
        self.environments
            .get_mut(&id)
            .ok_or_else(|| errors::internal(format!("unknown environment {id}")))
    }

    /// Live environments, the global one included.
    pub fn environment_count(&self) -> usize {
        self.environments.len()
    }

    // Active environments

    pub fn current_environment(&self) -> EnvId {
        self.active.last().copied().unwrap_or(EnvId::GLOBAL)
    }

    /// Active environments, outermost first.
    pub fn active_environments(&self) -> &[EnvId] {
        &self.active
    }

    pub fn push_environment(&mut self, id: EnvId) {
        debug!(env = %id, "push environment");
        self.active.push(id);
    }

    /// Pop the current environment. The global environment is never popped.
    pub fn pop_environment(&mut self) -> Option<EnvId> {
        if self.active.len() <= 1 {
            return None;
        }
        let popped = self.active.pop();
        if let Some(id) = popped {
            debug!(env = %id, "pop environment");
        }
        popped
    }

    /// Pop environments until `target` is current, returning those popped.
    pub fn restore_environment(&mut self, target: EnvId) -> EvalResult<Vec<EnvId>> {
        if !self.active.contains(&target) {
            return Err(errors::internal(format!(
                "cannot restore environment {target}: not active"
            )));
        }
        let mut popped = Vec::new();
        while self.current_environment() != target {
            match self.pop_environment() {
                Some(id) => popped.push(id),
                None => break,
            }
        }
        Ok(popped)
    }

    /// Make `target` current by dropping what is above it. If `target` is
    /// no longer active, everything but the global environment is dropped
    /// and `target` is pushed. Returns the dropped environments.
    pub fn unwind_to(&mut self, target: EnvId) -> Vec<EnvId> {
        let keep = self
            .active
            .iter()
            .position(|id| *id == target)
            .map_or(1, |at| at + 1);
        let dropped = self.active.split_off(keep.min(self.active.len()));
        if self.current_environment() != target {
            self.active.push(target);
        }
        dropped
    }

    // Creation

    pub fn create_simple_environment(
        &mut self,
        name: impl Into<String>,
        tail: Option<EnvId>,
    ) -> EvalResult<EnvId> {
        let id = EnvId(self.next_env);
        self.next_env = self
            .next_env
            .checked_add(1)
            .ok_or_else(|| errors::internal("too many environments"))?;
        self.environments
            .insert(id, Environment::new(id, name.into(), tail));
        self.tree.insert(id, tail);
        self.allocated += 1;
        Ok(id)
    }

    /// An environment enclosed by the current one.
    pub fn create_block_environment(&mut self, name: impl Into<String>) -> EvalResult<EnvId> {
        let tail = self.current_environment();
        self.create_simple_environment(name, Some(tail))
    }

    /// The frame for a call of `closure`.
    ///
    /// Its tail is the closure's defining environment. Parameters are bound
    /// positionally; a rest parameter receives the remaining arguments as a
    /// list owned by the new frame. Arity is checked by the caller.
    pub fn create_environment(
        &mut self,
        closure: &Closure,
        mut args: Vec<Value>,
        call_site: Span,
    ) -> EvalResult<EnvId> {
        let name = closure.display_name(&self.interner);
        let env = self.create_simple_environment(name, Some(closure.environment))?;
        self.environment_mut(env)?.call_site = Some(call_site);

        let required = closure.function.required_params();
        let rest: Vec<Value> = if args.len() > required.len() {
            args.split_off(required.len())
        } else {
            Vec::new()
        };
        for (param, value) in required.iter().zip(args) {
            self.declare_identifier(env, param.name, false)?;
            self.define_variable(env, param.name, value, false)?;
        }
        if let Some(param) = closure.function.rest_param() {
            let list = self.alloc_in(env, HeapData::List(rest))?;
            self.declare_identifier(env, param.name, false)?;
            self.define_variable(env, param.name, Value::List(list), false)?;
        }
        Ok(env)
    }

    // Bindings

    /// Declare `name` in `env`. Declaring a name twice in one frame is an
    /// error.
    pub fn declare_identifier(&mut self, env: EnvId, name: Name, constant: bool) -> EvalResult<()> {
        let text = self.interner.lookup(name);
        if self.environment_mut(env)?.declare(name, constant) {
            Ok(())
        } else {
            Err(errors::variable_redeclaration(text))
        }
    }

    /// Give a declared name its value.
    pub fn define_variable(
        &mut self,
        env: EnvId,
        name: Name,
        value: Value,
        constant: bool,
    ) -> EvalResult<()> {
        let text = self.interner.lookup(name);
        if self.environment_mut(env)?.define(name, value, constant) {
            Ok(())
        } else {
            Err(errors::internal(format!(
                "'{text}' defined before it was declared"
            )))
        }
    }

    /// Resolve `name` from the current environment outwards.
    pub fn get_variable(&self, name: Name) -> EvalResult<Value> {
        let mut cursor = Some(self.current_environment());
        while let Some(id) = cursor {
            let Some(env) = self.environment(id) else {
                break;
            };
            if let Some(slot) = env.lookup(name) {
                return match &slot.binding {
                    Binding::Value(value) => Ok(value.clone()),
                    Binding::Declared => {
                        Err(errors::unassigned_variable(self.interner.lookup(name)))
                    }
                };
            }
            cursor = env.tail;
        }
        Err(errors::undefined_variable(self.interner.lookup(name)))
    }

    /// Overwrite the nearest binding of `name`, walking outwards from the
    /// current environment.
    pub fn assign_variable(&mut self, name: Name, value: Value) -> EvalResult<()> {
        let text = self.interner.lookup(name);
        let mut cursor = Some(self.current_environment());
        while let Some(id) = cursor {
            let env = self.environment_mut(id)?;
            if let Some(slot) = env.slot_mut(name) {
                if slot.constant {
                    return Err(errors::constant_reassignment(text));
                }
                slot.binding = Binding::Value(value);
                return Ok(());
            }
            cursor = env.tail;
        }
        Err(errors::undefined_variable(text))
    }

    // Heap

    /// Allocate an object owned by the current environment.
    pub fn alloc(&mut self, data: HeapData) -> EvalResult<ObjId> {
        self.alloc_in(self.current_environment(), data)
    }

    pub fn alloc_in(&mut self, env: EnvId, data: HeapData) -> EvalResult<ObjId> {
        let id = self.objects.alloc(env, data)?;
        self.environment_mut(env)?.heap.add([id]);
        self.allocated += 1;
        Ok(id)
    }

    /// Transfer ownership of `id` to the heap of `to`.
    pub fn move_object(&mut self, id: ObjId, to: EnvId) -> bool {
        let Some(from) = self.objects.owner(id) else {
            return false;
        };
        if from == to || !self.environments.contains_key(&to) {
            return false;
        }
        let Some(source) = self.environments.get_mut(&from) else {
            return false;
        };
        let mut heap = std::mem::take(&mut source.heap);
        let moved = match self.environments.get_mut(&to) {
            Some(target) => heap.move_to(id, &mut target.heap),
            None => false,
        };
        if let Some(source) = self.environments.get_mut(&from) {
            source.heap = heap;
        }
        if moved {
            self.objects.set_owner(id, to);
        }
        moved
    }

    // Collection

    /// Enough has been allocated since the last collection to run another.
    pub fn should_collect(&self) -> bool {
        self.allocated >= self.collect_threshold
    }

    /// Free the environments and objects that cannot be reached.
    ///
    /// Roots are the global and active environments, `envs`, and the
    /// objects behind `values`. Marking follows environment tails, bound
    /// values, closure environments and list elements. A live object whose
    /// owner is freed moves to the nearest live environment enclosing that
    /// owner. Returns the number of environments and objects freed.
    pub fn collect<'v>(
        &mut self,
        envs: impl IntoIterator<Item = EnvId>,
        values: impl IntoIterator<Item = &'v Value>,
    ) -> usize {
        let (live_envs, live_objects) = self.mark(envs, values);

        let orphans: Vec<(ObjId, EnvId)> = live_objects
            .iter()
            .filter_map(|id| {
                let owner = self.objects.owner(*id)?;
                if live_envs.contains(&owner) {
                    return None;
                }
                Some((*id, self.nearest_live(owner, &live_envs)))
            })
            .collect();
        for (id, to) in orphans {
            self.move_object(id, to);
        }

        let before = self.environments.len() + self.objects.len();
        self.environments.retain(|id, _| live_envs.contains(id));
        self.objects.retain(|id| live_objects.contains(&id));
        for env in self.environments.values_mut() {
            env.heap.retain(|id| live_objects.contains(&id));
        }
        self.tree.retain(|id| live_envs.contains(&id));

        let live = self.environments.len() + self.objects.len();
        let freed = before - live;
        self.allocated = 0;
        self.collect_threshold = (live * 2).max(MIN_COLLECT_THRESHOLD);
        debug!(freed, live, "collected");
        freed
    }

    fn mark<'v>(
        &self,
        envs: impl IntoIterator<Item = EnvId>,
        values: impl IntoIterator<Item = &'v Value>,
    ) -> (FxHashSet<EnvId>, FxHashSet<ObjId>) {
        let mut live_envs = FxHashSet::default();
        let mut live_objects = FxHashSet::default();
        let mut env_work: Vec<EnvId> = self.active.iter().copied().chain(envs).collect();
        env_work.push(EnvId::GLOBAL);
        let mut object_work: Vec<ObjId> = values.into_iter().filter_map(Value::object_id).collect();

        loop {
            if let Some(id) = env_work.pop() {
                if !live_envs.insert(id) {
                    continue;
                }
                if let Some(env) = self.environments.get(&id) {
                    env_work.extend(env.tail);
                    object_work.extend(env.values().filter_map(Value::object_id));
                }
            } else if let Some(id) = object_work.pop() {
                if !live_objects.insert(id) {
                    continue;
                }
                match self.objects.get(id).map(|obj| &obj.data) {
                    Some(HeapData::Closure(closure)) => env_work.push(closure.environment),
                    Some(HeapData::List(items)) => {
                        object_work.extend(items.iter().filter_map(Value::object_id));
                    }
                    None => {}
                }
            } else {
                break;
            }
        }
        (live_envs, live_objects)
    }

    /// First environment in the tail chain of `env` that survives.
    fn nearest_live(&self, env: EnvId, live: &FxHashSet<EnvId>) -> EnvId {
        let mut cursor = self.environments.get(&env).and_then(|e| e.tail);
        while let Some(id) = cursor {
            if live.contains(&id) {
                return id;
            }
            cursor = self.environments.get(&id).and_then(|e| e.tail);
        }
        EnvId::GLOBAL
    }
}
