//! Lexer for Pyx using logos.
//!
//! Logos produces raw tokens; [`Lexer::lex_all`] then turns physical lines
//! into logical ones:
//! - `Newline` is emitted once per non-blank line, never inside brackets
//! - changes in leading whitespace become `Indent` / `Dedent`
//! - comments and backslash line continuations are skipped

mod token;

pub use token::{Token, TokenKind};

use logos::Logos;
use num_bigint::BigInt;
use pyx_ir::{Span, StringInterner};

use crate::ParseError;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f\r]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"\\\r?\n")]
enum RawToken {
    #[token("\n")]
    Newline,

    // Keywords
    #[token("def")]
    Def,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("pass")]
    Pass,
    #[token("lambda")]
    Lambda,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,
    #[token("nonlocal")]
    Nonlocal,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // Operators
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("//")]
    SlashSlash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Literals
    #[regex(r"[0-9][0-9_]*")]
    Int,
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    HexInt,
    #[regex(r"0[oO][0-9_]+")]
    OctInt,
    #[regex(r"0[bB][0-9_]+")]
    BinInt,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,
    #[regex(r"([0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?)[jJ]")]
    Imag,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedStr,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

fn span_of(range: std::ops::Range<usize>) -> Span {
    let start = u32::try_from(range.start).unwrap_or(u32::MAX);
    let end = u32::try_from(range.end).unwrap_or(u32::MAX);
    Span::new(start, end)
}

/// Lexer that produces layout-aware tokens with interned identifiers.
pub struct Lexer<'src, 'i> {
    source: &'src str,
    interner: &'i StringInterner,
}

impl<'src, 'i> Lexer<'src, 'i> {
    pub fn new(source: &'src str, interner: &'i StringInterner) -> Self {
        Lexer { source, interner }
    }

    /// Lex the whole source. The last token is always `Eof`, preceded by a
    /// `Newline` and any `Dedent`s needed to close open blocks.
    pub fn lex_all(&self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut indents: Vec<usize> = vec![0];
        let mut brackets: Vec<(char, Span)> = Vec::new();
        let mut at_line_start = true;
        let mut line_start = 0usize;
        let mut logos = RawToken::lexer(self.source);

        while let Some(result) = logos.next() {
            let range = logos.span();
            let span = span_of(range.clone());
            let slice = logos.slice();
            let Ok(raw) = result else {
                return Err(ParseError::invalid_character(span, slice));
            };

            if raw == RawToken::Newline {
                if brackets.is_empty() {
                    if !at_line_start {
                        tokens.push(Token::new(TokenKind::Newline, span));
                    }
                    at_line_start = true;
                }
                line_start = range.end;
                continue;
            }

            if at_line_start {
                let width = self.source[line_start..range.start].chars().count();
                Self::layout(width, span, &mut indents, &mut tokens)?;
                at_line_start = false;
            }

            match raw {
                RawToken::LParen => brackets.push(('(', span)),
                RawToken::LBracket => brackets.push(('[', span)),
                RawToken::RParen | RawToken::RBracket => {
                    let close = if raw == RawToken::RParen { ')' } else { ']' };
                    match brackets.pop() {
                        Some((open, _)) if (open == '(') == (close == ')') => {}
                        _ => return Err(ParseError::unmatched_close(close, span)),
                    }
                }
                _ => {}
            }

            let kind = self.convert(raw, slice, span)?;
            tokens.push(Token::new(kind, span));
        }

        if let Some((open, span)) = brackets.pop() {
            return Err(ParseError::unclosed_delimiter(open, span));
        }

        let eof = span_of(self.source.len()..self.source.len());
        if !at_line_start {
            tokens.push(Token::new(TokenKind::Newline, eof));
        }
        for _ in 1..indents.len() {
            tokens.push(Token::new(TokenKind::Dedent, eof));
        }
        tokens.push(Token::new(TokenKind::Eof, eof));

        tracing::trace!(count = tokens.len(), "lexed tokens");
        Ok(tokens)
    }

    /// Emit `Indent`/`Dedent` for a logical line starting at `span`.
    fn layout(
        width: usize,
        span: Span,
        indents: &mut Vec<usize>,
        tokens: &mut Vec<Token>,
    ) -> Result<(), ParseError> {
        let current = indents.last().copied().unwrap_or(0);
        if width > current {
            indents.push(width);
            tokens.push(Token::new(TokenKind::Indent, Span::point(span.start)));
            return Ok(());
        }
        while indents.last().is_some_and(|&top| width < top) {
            indents.pop();
            tokens.push(Token::new(TokenKind::Dedent, Span::point(span.start)));
        }
        if indents.last().copied().unwrap_or(0) != width {
            return Err(ParseError::inconsistent_dedent(span));
        }
        Ok(())
    }

    fn convert(&self, raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, ParseError> {
        let kind = match raw {
            RawToken::Int => parse_int(slice, 10, span)?,
            RawToken::HexInt => parse_int(&slice[2..], 16, span)?,
            RawToken::OctInt => parse_int(&slice[2..], 8, span)?,
            RawToken::BinInt => parse_int(&slice[2..], 2, span)?,
            RawToken::Float => TokenKind::Float(parse_float(slice, span)?),
            RawToken::Imag => TokenKind::Imag(parse_float(&slice[..slice.len() - 1], span)?),
            RawToken::Str => TokenKind::Str(unescape(&slice[1..slice.len() - 1])),
            RawToken::UnterminatedStr => return Err(ParseError::unterminated_string(span)),
            RawToken::Ident => TokenKind::Ident(self.interner.intern(slice)),

            RawToken::Def => TokenKind::Def,
            RawToken::Return => TokenKind::Return,
            RawToken::If => TokenKind::If,
            RawToken::Elif => TokenKind::Elif,
            RawToken::Else => TokenKind::Else,
            RawToken::Pass => TokenKind::Pass,
            RawToken::Lambda => TokenKind::Lambda,
            RawToken::And => TokenKind::And,
            RawToken::Or => TokenKind::Or,
            RawToken::Not => TokenKind::Not,
            RawToken::True => TokenKind::True,
            RawToken::False => TokenKind::False,
            RawToken::None => TokenKind::None,
            RawToken::Nonlocal => TokenKind::Nonlocal,

            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Colon => TokenKind::Colon,

            RawToken::Assign => TokenKind::Assign,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::Slash => TokenKind::Slash,
            RawToken::SlashSlash => TokenKind::SlashSlash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,

            RawToken::Newline => TokenKind::Newline,
        };
        Ok(kind)
    }
}

/// Lex `source` into tokens.
pub fn lex(source: &str, interner: &StringInterner) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source, interner).lex_all()
}

fn parse_int(digits: &str, radix: u32, span: Span) -> Result<TokenKind, ParseError> {
    let cleaned = digits.replace('_', "");
    BigInt::parse_bytes(cleaned.as_bytes(), radix)
        .map(TokenKind::Int)
        .ok_or_else(|| ParseError::invalid_number(span, digits))
}

fn parse_float(text: &str, span: Span) -> Result<f64, ParseError> {
    text.replace('_', "")
        .parse::<f64>()
        .map_err(|_| ParseError::invalid_number(span, text))
}

/// Resolve backslash escapes. Unknown escapes keep their backslash.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
