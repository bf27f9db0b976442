//! Recursive descent parser that lowers straight into `pyx_ir` nodes.
//!
//! Scoping is resolved while parsing. Each program or function body keeps
//! a [`Scope`] that records the names assigned in it; those names become
//! the body's declarations, hoisted to the top so the evaluator can declare
//! them before running any statement. Assignments to parameters and
//! `nonlocal` names are not declarations: they update an existing binding.

mod expr;

use std::rc::Rc;

use pyx_ir::{Declaration, Function, Name, Node, NodeKind, Param, Span, StringInterner};
use rustc_hash::FxHashSet;

use crate::cursor::Cursor;
use crate::lexer::{Token, TokenKind};
use crate::ParseError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScopeKind {
    Program,
    Function,
}

struct Scope {
    kind: ScopeKind,
    params: FxHashSet<Name>,
    nonlocals: FxHashSet<Name>,
    /// Assigned names in first-assignment order.
    declared: Vec<Name>,
    declared_set: FxHashSet<Name>,
}

impl Scope {
    fn new(kind: ScopeKind, params: &[Param]) -> Self {
        Scope {
            kind,
            params: params.iter().map(|p| p.name).collect(),
            nonlocals: FxHashSet::default(),
            declared: Vec::new(),
            declared_set: FxHashSet::default(),
        }
    }

    /// Record an assignment to `name`; returns whether it declares a new
    /// binding in this scope.
    fn bind(&mut self, name: Name) -> bool {
        if self.params.contains(&name) || self.nonlocals.contains(&name) {
            return false;
        }
        if self.declared_set.insert(name) {
            self.declared.push(name);
        }
        true
    }

    fn declarations(&self) -> Vec<Declaration> {
        self.declared
            .iter()
            .map(|&name| Declaration {
                name,
                constant: false,
            })
            .collect()
    }
}

pub struct Parser<'a> {
    cursor: Cursor,
    interner: &'a StringInterner,
    scopes: Vec<Scope>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            scopes: Vec::new(),
        }
    }

    fn scope(&mut self) -> Result<&mut Scope, ParseError> {
        let span = self.cursor.current_span();
        self.scopes
            .last_mut()
            .ok_or_else(|| ParseError::unexpected("a statement", &TokenKind::Eof, span))
    }

    fn in_function(&self) -> bool {
        self.scopes
            .last()
            .is_some_and(|s| s.kind == ScopeKind::Function)
    }

    pub fn parse_program(mut self) -> Result<Rc<Node>, ParseError> {
        self.scopes.push(Scope::new(ScopeKind::Program, &[]));
        let mut body = Vec::new();
        while !self.cursor.is_at_end() {
            if self.cursor.eat(&TokenKind::Newline) {
                continue;
            }
            if self.cursor.check(&TokenKind::Indent) {
                return Err(ParseError::unexpected_indent(self.cursor.current_span()));
            }
            if let Some(stmt) = self.parse_statement()? {
                body.push(stmt);
            }
        }
        let end = self.cursor.current_span().end;
        let declarations = self.scope()?.declarations();
        Ok(Node::rc(
            NodeKind::Program { body, declarations },
            Span::new(0, end),
        ))
    }

    /// One statement; `None` for statements that only affect scoping.
    fn parse_statement(&mut self) -> Result<Option<Rc<Node>>, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Def => self.parse_def().map(Some),
            TokenKind::If => {
                let start = self.cursor.advance().span;
                self.parse_if(start).map(Some)
            }
            _ => {
                let stmt = self.parse_simple_statement()?;
                self.cursor.expect(&TokenKind::Newline)?;
                Ok(stmt)
            }
        }
    }

    fn parse_simple_statement(&mut self) -> Result<Option<Rc<Node>>, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Pass => {
                let span = self.cursor.advance().span;
                Ok(Some(Node::rc(NodeKind::Pass, span)))
            }
            TokenKind::Return => self.parse_return().map(Some),
            TokenKind::Nonlocal => {
                self.parse_nonlocal()?;
                Ok(None)
            }
            _ => self.parse_expression_or_assignment().map(Some),
        }
    }

    fn parse_return(&mut self) -> Result<Rc<Node>, ParseError> {
        let span = self.cursor.advance().span;
        if !self.in_function() {
            return Err(ParseError::return_outside_function(span));
        }
        if self.cursor.check(&TokenKind::Newline) {
            return Ok(Node::rc(NodeKind::Return(None), span));
        }
        let value = self.parse_expr()?;
        let span = span.merge(value.span);
        Ok(Node::rc(NodeKind::Return(Some(value)), span))
    }

    fn parse_nonlocal(&mut self) -> Result<(), ParseError> {
        let keyword = self.cursor.advance().span;
        if !self.in_function() {
            return Err(ParseError::nonlocal_at_top_level(keyword));
        }
        loop {
            let (name, span) = self.cursor.expect_ident()?;
            let text = self.interner.lookup(name);
            let scope = self.scope()?;
            if scope.params.contains(&name) {
                return Err(ParseError::nonlocal_parameter(text, span));
            }
            if scope.declared_set.contains(&name) {
                return Err(ParseError::nonlocal_after_use(text, span));
            }
            scope.nonlocals.insert(name);
            if !self.cursor.eat(&TokenKind::Comma) {
                return Ok(());
            }
        }
    }

    fn parse_expression_or_assignment(&mut self) -> Result<Rc<Node>, ParseError> {
        let expr = self.parse_expr()?;
        if !self.cursor.eat(&TokenKind::Assign) {
            let span = expr.span;
            return Ok(Node::rc(NodeKind::ExpressionStatement(expr), span));
        }
        let NodeKind::Identifier(target) = expr.kind else {
            return Err(ParseError::invalid_assignment_target(expr.span));
        };
        let declaration = self.scope()?.bind(target);
        let value = self.parse_expr()?;
        let span = expr.span.merge(value.span);
        Ok(Node::rc(
            NodeKind::Assign {
                target,
                value,
                declaration,
            },
            span,
        ))
    }

    fn parse_def(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.cursor.advance().span;
        let (name, _) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::LParen)?;
        let params = self.parse_params(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::Colon)?;

        // Bound before the body so the body can call itself.
        let declaration = self.scope()?.bind(name);
        let function = self.parse_function_body(Some(name), params)?;
        let span = start.merge(function.body.span);
        Ok(Node::rc(
            NodeKind::FunctionDef {
                name,
                function,
                declaration,
            },
            span,
        ))
    }

    fn parse_function_body(
        &mut self,
        name: Option<Name>,
        params: Vec<Param>,
    ) -> Result<Rc<Function>, ParseError> {
        self.scopes.push(Scope::new(ScopeKind::Function, &params));
        let suite = self.parse_suite();
        let scope = self.scopes.pop();
        let (mut body, span) = suite?;
        let (declarations, locals) = scope
            .map(|s| (s.declarations(), s.declared))
            .unwrap_or_default();

        if !matches!(body.last().map(|n| &n.kind), Some(NodeKind::Return(_))) {
            body.push(Node::rc(NodeKind::Return(None), Span::point(span.end)));
        }
        let body = Node::rc(NodeKind::Block { body, declarations }, span);
        Ok(Rc::new(Function {
            name,
            params,
            body,
            locals,
        }))
    }

    /// Formal parameters up to (not including) `close`.
    fn parse_params(&mut self, close: &TokenKind) -> Result<Vec<Param>, ParseError> {
        let mut params: Vec<Param> = Vec::new();
        while !self.cursor.check(close) {
            let star = self.cursor.current_span();
            let rest = self.cursor.eat(&TokenKind::Star);
            let (name, span) = self.cursor.expect_ident()?;
            if params.last().is_some_and(|p| p.rest) {
                return Err(ParseError::rest_not_last(star.merge(span)));
            }
            if params.iter().any(|p| p.name == name) {
                return Err(ParseError::duplicate_parameter(
                    self.interner.lookup(name),
                    span,
                ));
            }
            params.push(Param { name, rest, span });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    /// The statements after a `:`, either on the same line or as an
    /// indented block. Returns them with their combined span.
    fn parse_suite(&mut self) -> Result<(Vec<Rc<Node>>, Span), ParseError> {
        let colon = self.cursor.previous_span();
        let mut body = Vec::new();

        if self.cursor.eat(&TokenKind::Newline) {
            self.cursor.expect(&TokenKind::Indent)?;
            while !self.cursor.check(&TokenKind::Dedent) && !self.cursor.is_at_end() {
                if let Some(stmt) = self.parse_statement()? {
                    body.push(stmt);
                }
            }
            self.cursor.expect(&TokenKind::Dedent)?;
        } else {
            if let Some(stmt) = self.parse_simple_statement()? {
                body.push(stmt);
            }
            self.cursor.expect(&TokenKind::Newline)?;
        }

        let span = match (body.first(), body.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => colon,
        };
        Ok((body, span))
    }

    /// `if`/`elif` after its keyword. `elif` chains nest as the alternate.
    fn parse_if(&mut self, start: Span) -> Result<Rc<Node>, ParseError> {
        let test = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let consequent = self.parse_block()?;

        let alternate = if self.cursor.check(&TokenKind::Elif) {
            let elif = self.cursor.advance().span;
            Some(self.parse_if(elif)?)
        } else if self.cursor.eat(&TokenKind::Else) {
            self.cursor.expect(&TokenKind::Colon)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        let end = alternate.as_ref().map_or(consequent.span, |a| a.span);
        Ok(Node::rc(
            NodeKind::If {
                test,
                consequent,
                alternate,
            },
            start.merge(end),
        ))
    }

    /// A branch body. It introduces no bindings of its own; assignments in
    /// it belong to the enclosing program or function.
    fn parse_block(&mut self) -> Result<Rc<Node>, ParseError> {
        let (body, span) = self.parse_suite()?;
        Ok(Node::rc(
            NodeKind::Block {
                body,
                declarations: Vec::new(),
            },
            span,
        ))
    }
}
