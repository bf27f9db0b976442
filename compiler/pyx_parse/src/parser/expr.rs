//! Expression grammar, lowest precedence first:
//!
//! ```text
//! expr       := lambda | ternary
//! ternary    := or ("if" or "else" expr)?
//! or         := and ("or" and)*
//! and        := not ("and" not)*
//! not        := "not" not | comparison
//! comparison := arith (cmp_op arith)?
//! arith      := term (("+" | "-") term)*
//! term       := factor (("*" | "/" | "//" | "%") factor)*
//! factor     := ("-" | "+") factor | power
//! power      := postfix ("**" factor)?
//! postfix    := atom ("(" args ")" | "[" expr "]")*
//! ```
//!
//! `a and b` lowers to `b if a else False` and `a or b` to
//! `True if a else b`, so both share the conditional's bool test.

use std::rc::Rc;

use pyx_ir::stack::ensure_sufficient_stack;
use pyx_ir::{BinaryOp, Function, Literal, Node, NodeKind, UnaryOp};

use super::Parser;
use crate::lexer::TokenKind;
use crate::ParseError;

fn comparison_op(kind: &TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        _ => return None,
    })
}

fn binary(op: BinaryOp, left: Rc<Node>, right: Rc<Node>) -> Rc<Node> {
    let span = left.span.merge(right.span);
    Node::rc(NodeKind::Binary { op, left, right }, span)
}

fn conditional(test: Rc<Node>, consequent: Rc<Node>, alternate: Rc<Node>) -> Rc<Node> {
    let span = test
        .span
        .merge(consequent.span)
        .merge(alternate.span);
    Node::rc(
        NodeKind::Conditional {
            test,
            consequent,
            alternate,
        },
        span,
    )
}

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) -> Result<Rc<Node>, ParseError> {
        ensure_sufficient_stack(|| {
            if self.cursor.check(&TokenKind::Lambda) {
                self.parse_lambda()
            } else {
                self.parse_ternary()
            }
        })
    }

    fn parse_lambda(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.cursor.advance().span;
        let params = self.parse_params(&TokenKind::Colon)?;
        self.cursor.expect(&TokenKind::Colon)?;
        let expr = self.parse_expr()?;

        let span = expr.span;
        let ret = Node::rc(NodeKind::Return(Some(expr)), span);
        let body = Node::rc(
            NodeKind::Block {
                body: vec![ret],
                declarations: Vec::new(),
            },
            span,
        );
        let function = Rc::new(Function {
            name: None,
            params,
            body,
            locals: Vec::new(),
        });
        Ok(Node::rc(NodeKind::Lambda(function), start.merge(span)))
    }

    fn parse_ternary(&mut self) -> Result<Rc<Node>, ParseError> {
        let consequent = self.parse_or()?;
        if !self.cursor.eat(&TokenKind::If) {
            return Ok(consequent);
        }
        let test = self.parse_or()?;
        self.cursor.expect(&TokenKind::Else)?;
        let alternate = self.parse_expr()?;
        Ok(conditional(test, consequent, alternate))
    }

    fn parse_or(&mut self) -> Result<Rc<Node>, ParseError> {
        let mut left = self.parse_and()?;
        while self.cursor.check(&TokenKind::Or) {
            let op = self.cursor.advance().span;
            let right = self.parse_and()?;
            let truthy = Node::rc(NodeKind::Literal(Literal::Bool(true)), op);
            left = conditional(left, truthy, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Rc<Node>, ParseError> {
        let mut left = self.parse_not()?;
        while self.cursor.check(&TokenKind::And) {
            let op = self.cursor.advance().span;
            let right = self.parse_not()?;
            let falsy = Node::rc(NodeKind::Literal(Literal::Bool(false)), op);
            left = conditional(left, right, falsy);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Rc<Node>, ParseError> {
        if self.cursor.check(&TokenKind::Not) {
            let start = self.cursor.advance().span;
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            let span = start.merge(operand.span);
            return Ok(Node::rc(
                NodeKind::Unary {
                    op: UnaryOp::Not,
                    operand,
                },
                span,
            ));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Rc<Node>, ParseError> {
        let left = self.parse_arith()?;
        let Some(op) = comparison_op(self.cursor.current_kind()) else {
            return Ok(left);
        };
        self.cursor.advance();
        let right = self.parse_arith()?;
        if comparison_op(self.cursor.current_kind()).is_some() {
            return Err(ParseError::chained_comparison(self.cursor.current_span()));
        }
        Ok(binary(op, left, right))
    }

    fn parse_arith(&mut self) -> Result<Rc<Node>, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> Result<Rc<Node>, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::SlashSlash => BinaryOp::FloorDiv,
                TokenKind::Percent => BinaryOp::Mod,
                _ => return Ok(left),
            };
            self.cursor.advance();
            let right = self.parse_factor()?;
            left = binary(op, left, right);
        }
    }

    fn parse_factor(&mut self) -> Result<Rc<Node>, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_factor())?;
        let span = start.merge(operand.span);
        Ok(Node::rc(NodeKind::Unary { op, operand }, span))
    }

    /// `**` is right-associative and binds tighter than a unary operator on
    /// its left: `-2 ** 2` is `-(2 ** 2)`.
    fn parse_power(&mut self) -> Result<Rc<Node>, ParseError> {
        let base = self.parse_postfix()?;
        if !self.cursor.eat(&TokenKind::StarStar) {
            return Ok(base);
        }
        let exponent = ensure_sufficient_stack(|| self.parse_factor())?;
        Ok(binary(BinaryOp::Pow, base, exponent))
    }

    fn parse_postfix(&mut self) -> Result<Rc<Node>, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            if self.cursor.eat(&TokenKind::LParen) {
                let args = self.parse_comma_list(&TokenKind::RParen)?;
                let end = self.cursor.expect(&TokenKind::RParen)?;
                let span = expr.span.merge(end);
                expr = Node::rc(NodeKind::Call { callee: expr, args }, span);
            } else if self.cursor.eat(&TokenKind::LBracket) {
                let index = self.parse_expr()?;
                let end = self.cursor.expect(&TokenKind::RBracket)?;
                let span = expr.span.merge(end);
                expr = Node::rc(NodeKind::Subscript { value: expr, index }, span);
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, trailing comma allowed.
    fn parse_comma_list(&mut self, close: &TokenKind) -> Result<Vec<Rc<Node>>, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn parse_atom(&mut self) -> Result<Rc<Node>, ParseError> {
        let token = self.cursor.advance();
        let span = token.span;
        let literal =
            |lit: Literal| -> Result<Rc<Node>, ParseError> { Ok(Node::rc(NodeKind::Literal(lit), span)) };

        match token.kind {
            TokenKind::Int(n) => literal(Literal::Int(n)),
            TokenKind::Float(f) => literal(Literal::Float(f)),
            TokenKind::Imag(f) => literal(Literal::Imag(f)),
            TokenKind::Str(s) => literal(Literal::Str(Rc::from(s))),
            TokenKind::True => literal(Literal::Bool(true)),
            TokenKind::False => literal(Literal::Bool(false)),
            TokenKind::None => literal(Literal::None),
            TokenKind::Ident(name) => Ok(Node::rc(NodeKind::Identifier(name), span)),
            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                let items = self.parse_comma_list(&TokenKind::RBracket)?;
                let end = self.cursor.expect(&TokenKind::RBracket)?;
                Ok(Node::rc(NodeKind::List(items), span.merge(end)))
            }
            other => Err(ParseError::expected_expression(&other, span)),
        }
    }
}
