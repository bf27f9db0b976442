//! The state of one evaluation: Control, Stash, and the runtime.

use std::rc::Rc;

use pyx_ir::SharedInterner;
use tracing::debug;

use crate::closure::RunId;
use crate::control::{Control, ControlItem, Stash};
use crate::environment::{EnvId, Runtime};
use crate::errors::EvalError;
use crate::value::{repr, Value};

/// Where a context is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MachineState {
    /// Nothing has stepped yet.
    Idle,
    Running,
    /// A run stopped at a limit; stepping may continue.
    Suspended,
    /// Control is empty.
    Finished,
    /// A step failed. The context does not step again.
    Errored,
}

impl MachineState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MachineState::Finished | MachineState::Errored)
    }
}

/// One evaluation.
///
/// `Clone` copies Control, Stash, and every environment, so a clone can be
/// stepped without affecting the original. Closures from either copy carry
/// the same `RunId` and may be called by both.
#[derive(Clone, Debug)]
pub struct Context {
    pub control: Control,
    pub stash: Stash,
    pub runtime: Runtime,
    /// Errors raised by this run, in order. A run stops at its first error.
    pub errors: Vec<EvalError>,
    pub(crate) state: MachineState,
    pub(crate) steps: usize,
    pub(crate) run: RunId,
    /// Closures created while set are marked predefined.
    pub(crate) predefined: bool,
    /// Environment of the most recently started program. The next program
    /// loaded into this context is enclosed by it.
    pub(crate) program_env: Option<EnvId>,
}

impl Context {
    pub(crate) fn new(interner: SharedInterner) -> Self {
        Context {
            control: Control::new(),
            stash: Stash::new(),
            runtime: Runtime::new(interner),
            errors: Vec::new(),
            state: MachineState::Idle,
            steps: 0,
            run: RunId::fresh(),
            predefined: false,
            program_env: None,
        }
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    /// Steps taken over the lifetime of this context.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The first error raised, if the run failed.
    pub fn error(&self) -> Option<&EvalError> {
        self.errors.first()
    }

    /// Record a failed step: the error goes on the Stash and into
    /// `errors`, and the context stops.
    pub(crate) fn fail(&mut self, error: EvalError) {
        self.stash.push(Value::Error(Rc::new(error.clone())));
        self.errors.push(error);
        self.state = MachineState::Errored;
    }

    /// Hand the Stash top to `target` when one of the environments in
    /// `left` owns it.
    pub(crate) fn keep_result(&mut self, target: EnvId, left: &[EnvId]) {
        let Some(id) = self.stash.peek().and_then(Value::object_id) else {
            return;
        };
        let owner = self.runtime.objects().owner(id);
        if owner.is_some_and(|owner| left.contains(&owner)) {
            self.runtime.move_object(id, target);
            debug!(object = %id, env = %target, "moved returned object");
        }
    }

    /// Free what the Stash, Control and the environments no longer reach.
    pub(crate) fn collect_garbage(&mut self) -> usize {
        let envs = self
            .control
            .iter()
            .filter_map(ControlItem::restore_target)
            .chain(self.program_env);
        self.runtime.collect(envs, self.stash.iter())
    }

    /// Called once Control is empty: unwind to the program environment,
    /// keeping the result, and free what the run left behind.
    pub(crate) fn settle(&mut self) {
        if let Some(program) = self.program_env {
            let left = self.runtime.unwind_to(program);
            self.keep_result(program, &left);
        }
        self.collect_garbage();
    }

    /// Stash top, or `None` when the Stash is empty.
    pub fn result(&self) -> Value {
        self.stash.peek().cloned().unwrap_or(Value::None)
    }

    /// Printable copy of Control, Stash, and the active environments.
    pub fn snapshot(&self) -> Snapshot {
        let interner = self.runtime.interner();
        Snapshot {
            control: self
                .control
                .iter()
                .map(|item| item.describe(interner))
                .collect(),
            stash: self
                .stash
                .iter()
                .map(|value| repr(value, self.runtime.objects(), interner))
                .collect(),
            environments: self
                .runtime
                .active_environments()
                .iter()
                .map(|id| {
                    let name = self
                        .runtime
                        .environment(*id)
                        .map_or("?", |env| env.name.as_str());
                    format!("{name} {id}")
                })
                .collect(),
        }
    }
}

/// Control and Stash rendered bottom to top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub control: Vec<String>,
    pub stash: Vec<String>,
    /// Active environments, outermost first.
    pub environments: Vec<String>,
}
