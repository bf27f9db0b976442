//! Closures: a function paired with the environment it was defined in.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use pyx_ir::{Function, Name, Span, StringInterner};
use rustc_hash::FxHashSet;

use crate::environment::EnvId;

/// Identifies one evaluation context.
///
/// Closures record the run that created them instead of pointing back at
/// the machine state, so a closure can only be applied by the context it
/// belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RunId(u32);

impl RunId {
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        RunId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Debug)]
pub struct Closure {
    pub function: Rc<Function>,
    /// Environment current when the `def` or `lambda` was evaluated.
    pub environment: EnvId,
    pub run: RunId,
    /// Created while the prelude ran.
    pub predefined: bool,
    /// Set once, when the closure is first bound to a name.
    pub declared_name: Option<Name>,
    /// Names declared directly in the body.
    pub local_variables: Rc<FxHashSet<Name>>,
    /// The `def` or `lambda` node.
    pub span: Span,
}

impl Closure {
    fn new(
        function: Rc<Function>,
        environment: EnvId,
        run: RunId,
        predefined: bool,
        span: Span,
    ) -> Self {
        let local_variables = function.locals.iter().copied().collect();
        Closure {
            declared_name: function.name,
            function,
            environment,
            run,
            predefined,
            local_variables: Rc::new(local_variables),
            span,
        }
    }

    pub fn make_from_function_def(
        function: Rc<Function>,
        environment: EnvId,
        run: RunId,
        predefined: bool,
        span: Span,
    ) -> Self {
        Self::new(function, environment, run, predefined, span)
    }

    pub fn make_from_lambda(
        function: Rc<Function>,
        environment: EnvId,
        run: RunId,
        predefined: bool,
        span: Span,
    ) -> Self {
        let mut closure = Self::new(function, environment, run, predefined, span);
        closure.declared_name = None;
        closure
    }

    /// The `def` name, else the name it was first bound to, else `<lambda>`.
    pub fn display_name(&self, interner: &StringInterner) -> &'static str {
        self.function
            .name
            .or(self.declared_name)
            .map_or("<lambda>", |name| interner.lookup(name))
    }
}
