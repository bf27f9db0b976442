//! `InterpreterBuilder` for creating `Interpreter` instances.

use std::rc::Rc;

use pyx_ir::{Node, SharedInterner};

use super::Interpreter;
use crate::builtins::BuiltinRegistry;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for `Interpreter`.
///
/// Programs must be parsed with the interner the interpreter is built
/// with, since names are compared by interned id.
#[derive(Default)]
pub struct InterpreterBuilder {
    interner: Option<SharedInterner>,
    builtins: Option<BuiltinRegistry>,
    print_handler: Option<SharedPrintHandler>,
    prelude: Option<Rc<Node>>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Replace the standard builtins.
    #[must_use]
    pub fn builtins(mut self, registry: BuiltinRegistry) -> Self {
        self.builtins = Some(registry);
        self
    }

    /// Set where `print` writes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// A program run in every new context before user code. Closures it
    /// creates are marked predefined.
    #[must_use]
    pub fn prelude(mut self, program: Rc<Node>) -> Self {
        self.prelude = Some(program);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            interner: self.interner.unwrap_or_else(SharedInterner::new),
            builtins: self.builtins.unwrap_or_default(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            prelude: self.prelude,
        }
    }
}
