//! Single-step iteration over a context.

use super::Interpreter;
use crate::context::{Context, MachineState};

/// One executed control item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRecord {
    /// Zero-based position in the context's lifetime step count.
    pub index: usize,
    /// The item as it looked on Control.
    pub item: String,
    /// State after the step. `Errored` if the item failed.
    pub state: MachineState,
}

/// Iterator that steps a context until it finishes or fails.
pub struct Stepper<'a> {
    interpreter: &'a Interpreter,
    ctx: &'a mut Context,
}

impl<'a> Stepper<'a> {
    pub(super) fn new(interpreter: &'a Interpreter, ctx: &'a mut Context) -> Self {
        Stepper { interpreter, ctx }
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }
}

impl Iterator for Stepper<'_> {
    type Item = StepRecord;

    fn next(&mut self) -> Option<StepRecord> {
        self.interpreter.step(self.ctx)
    }
}
