//! The step loop.
//!
//! An `Interpreter` holds what every evaluation shares: the interner,
//! the builtins, the print handler, and an optional prelude. Each
//! evaluation lives in its own `Context`, which the interpreter advances
//! one control item at a time.
//!
//! # Driving a context
//!
//! - `run` steps until Control is empty, a step fails, or a `RunLimits`
//!   budget is spent. A spent budget suspends the context; calling `run`
//!   again continues exactly where it stopped.
//! - `step` advances by one item and reports what was executed.
//! - `stepper` wraps `step` in an iterator. Dropping it and making a new
//!   one continues from the same state.

mod builder;
mod stepper;

use std::rc::Rc;

use pyx_ir::{Node, SharedInterner};
use tracing::{debug, trace, warn};

use crate::builtins::BuiltinRegistry;
use crate::context::{Context, MachineState};
use crate::control::{ControlItem, Stash};
use crate::environment::EnvId;
use crate::errors::{self, EvalError, EvalResult};
use crate::exec;
use crate::print_handler::SharedPrintHandler;
use crate::value::{repr, Value};

pub use builder::InterpreterBuilder;
pub use stepper::{StepRecord, Stepper};

/// Step budgets for one call to `run`. `None` means unbounded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunLimits {
    pub step_limit: Option<usize>,
    /// Stop after this many steps that change the current environment.
    pub env_steps: Option<usize>,
}

impl RunLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn steps(limit: usize) -> Self {
        RunLimits {
            step_limit: Some(limit),
            env_steps: None,
        }
    }

    #[must_use]
    pub fn with_env_steps(mut self, limit: usize) -> Self {
        self.env_steps = Some(limit);
        self
    }
}

/// Why a run stopped before finishing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SuspendReason {
    StepLimit { limit: usize },
    EnvSteps { limit: usize },
}

impl SuspendReason {
    /// The step limit as a reportable condition.
    pub fn to_error(self) -> EvalError {
        match self {
            SuspendReason::StepLimit { limit } | SuspendReason::EnvSteps { limit } => {
                errors::step_limit_exceeded(limit)
            }
        }
    }
}

/// Result of `run`.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Control is empty. `representation` is the Python display form of
    /// `value`.
    Finished {
        value: Value,
        representation: String,
    },
    /// A budget was spent after `steps` steps of this call; the context
    /// can be run again.
    Suspended { reason: SuspendReason, steps: usize },
    Error(EvalError),
}

impl Outcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished { .. })
    }
}

pub struct Interpreter {
    interner: SharedInterner,
    builtins: BuiltinRegistry,
    print_handler: SharedPrintHandler,
    prelude: Option<Rc<Node>>,
}

impl Default for Interpreter {
    fn default() -> Self {
        InterpreterBuilder::new().build()
    }
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn builtins(&self) -> &BuiltinRegistry {
        &self.builtins
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Captured `print` output; empty unless printing to a buffer.
    pub fn get_print_output(&self) -> String {
        self.print_handler.get_output()
    }

    /// A fresh context: builtins bound as constants in the global
    /// environment, then the prelude run to completion.
    pub fn new_context(&self) -> EvalResult<Context> {
        let mut ctx = Context::new(self.interner.clone());
        self.bind_builtins(&mut ctx)?;

        if let Some(prelude) = &self.prelude {
            debug!("running prelude");
            ctx.predefined = true;
            self.load(&mut ctx, Rc::clone(prelude));
            let outcome = self.run(&mut ctx, RunLimits::unlimited());
            ctx.predefined = false;
            if let Outcome::Error(err) = outcome {
                return Err(err);
            }
            ctx.stash = Stash::new();
            ctx.state = MachineState::Idle;
            ctx.steps = 0;
        }
        Ok(ctx)
    }

    fn bind_builtins(&self, ctx: &mut Context) -> EvalResult<()> {
        let functions = self
            .builtins
            .functions()
            .iter()
            .map(|f| (f.name, Value::Builtin(*f)));
        let constants = self
            .builtins
            .constants()
            .iter()
            .map(|(name, value)| (*name, value.clone()));
        for (name, value) in functions.chain(constants) {
            let name = self.interner.intern(name);
            ctx.runtime.declare_identifier(EnvId::GLOBAL, name, true)?;
            ctx.runtime
                .define_variable(EnvId::GLOBAL, name, value, true)?;
        }
        Ok(())
    }

    /// Queue `program` on Control.
    ///
    /// A finished context can load another program: it runs in a new
    /// program environment enclosed by the previous program's, so earlier
    /// top-level names stay visible and locals of finished calls do not.
    /// An errored context stays errored.
    pub fn load(&self, ctx: &mut Context, program: Rc<Node>) {
        if ctx.state == MachineState::Errored {
            return;
        }
        ctx.stash = Stash::new();
        ctx.control.push_node(program);
        ctx.state = MachineState::Idle;
    }

    /// Evaluate `program` in a fresh context.
    pub fn evaluate(&self, program: &Rc<Node>, limits: RunLimits) -> Outcome {
        match self.new_context() {
            Ok(mut ctx) => {
                self.load(&mut ctx, Rc::clone(program));
                self.run(&mut ctx, limits)
            }
            Err(err) => Outcome::Error(err),
        }
    }

    /// Step until Control is empty, a step fails, or a limit is reached.
    #[tracing::instrument(level = "debug", skip_all, fields(steps = ctx.steps))]
    pub fn run(&self, ctx: &mut Context, limits: RunLimits) -> Outcome {
        if ctx.state == MachineState::Errored {
            return error_outcome(ctx);
        }
        let mut taken = 0;
        let mut env_changes = 0;
        loop {
            if ctx.control.is_empty() {
                ctx.settle();
                ctx.state = MachineState::Finished;
                return self.finished(ctx);
            }
            if let Some(limit) = limits.step_limit {
                if taken >= limit {
                    return suspend(ctx, SuspendReason::StepLimit { limit }, taken);
                }
            }

            let before = environment_marker(ctx);
            self.advance(ctx);
            taken += 1;

            if ctx.state == MachineState::Errored {
                return error_outcome(ctx);
            }
            if let Some(limit) = limits.env_steps {
                if environment_marker(ctx) != before {
                    env_changes += 1;
                    if env_changes >= limit {
                        return suspend(ctx, SuspendReason::EnvSteps { limit }, taken);
                    }
                }
            }
        }
    }

    /// Advance by one control item. `None` once the context has finished
    /// or failed.
    pub fn step(&self, ctx: &mut Context) -> Option<StepRecord> {
        if ctx.state.is_terminal() {
            return None;
        }
        let index = ctx.steps;
        let Some(item) = self.advance(ctx) else {
            ctx.settle();
            ctx.state = MachineState::Finished;
            return None;
        };
        Some(StepRecord {
            index,
            item: item.describe(ctx.runtime.interner()),
            state: ctx.state,
        })
    }

    pub fn stepper<'a>(&'a self, ctx: &'a mut Context) -> Stepper<'a> {
        Stepper::new(self, ctx)
    }

    /// Pop and execute one item. A failure is recorded on the context.
    ///
    /// Between steps everything live is reachable from Control, the Stash
    /// and the environments, so this is where collection runs.
    fn advance(&self, ctx: &mut Context) -> Option<ControlItem> {
        let item = ctx.control.pop()?;
        ctx.state = MachineState::Running;
        trace!(
            step = ctx.steps,
            item = %item.describe(ctx.runtime.interner()),
            stash = ctx.stash.size(),
            "step"
        );
        ctx.steps += 1;
        if let Err(err) = exec::execute(ctx, &item, &self.print_handler) {
            let err = err.with_span(item.span());
            debug!(error = %err, "step failed");
            ctx.fail(err);
        } else if ctx.runtime.should_collect() {
            ctx.collect_garbage();
        }
        Some(item)
    }

    fn finished(&self, ctx: &Context) -> Outcome {
        let value = ctx.result();
        let representation = repr(&value, ctx.runtime.objects(), &self.interner);
        Outcome::Finished {
            value,
            representation,
        }
    }
}

/// Depth and top of the active environment stack.
fn environment_marker(ctx: &Context) -> (usize, EnvId) {
    (
        ctx.runtime.active_environments().len(),
        ctx.runtime.current_environment(),
    )
}

fn suspend(ctx: &mut Context, reason: SuspendReason, steps: usize) -> Outcome {
    warn!(?reason, steps, "evaluation suspended");
    ctx.state = MachineState::Suspended;
    Outcome::Suspended { reason, steps }
}

fn error_outcome(ctx: &Context) -> Outcome {
    match ctx.error() {
        Some(err) => Outcome::Error(err.clone()),
        None => Outcome::Error(errors::internal("errored context without an error")),
    }
}
