use super::*;
use pretty_assertions::assert_eq;
use pyx_diagnostic::ErrorCode;

fn kinds(source: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    lex(source, &interner)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn lex_err(source: &str) -> ParseError {
    let interner = StringInterner::new();
    lex(source, &interner).unwrap_err()
}

#[test]
fn test_simple_assignment() {
    let interner = StringInterner::new();
    let tokens = lex("x = 42", &interner).unwrap();
    let x = interner.intern("x");
    assert_eq!(
        tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
        vec![
            TokenKind::Ident(x),
            TokenKind::Assign,
            TokenKind::Int(BigInt::from(42)),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[0].span, Span::new(0, 1));
    assert_eq!(tokens[2].span, Span::new(4, 6));
}

#[test]
fn test_keywords_are_not_identifiers() {
    assert_eq!(
        kinds("def return lambda nonlocal True None"),
        vec![
            TokenKind::Def,
            TokenKind::Return,
            TokenKind::Lambda,
            TokenKind::Nonlocal,
            TokenKind::True,
            TokenKind::None,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let interner = StringInterner::new();
    let tokens = lex("define", &interner).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Ident(interner.intern("define")));
}

#[test]
fn test_operators_take_longest_match() {
    assert_eq!(
        kinds("** // == != <= >= * / < >"),
        vec![
            TokenKind::StarStar,
            TokenKind::SlashSlash,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_number_literals() {
    assert_eq!(
        kinds("1_000 0xff 0o17 0b101 1.5 .5 2. 1e3 2j 1.5J"),
        vec![
            TokenKind::Int(BigInt::from(1000)),
            TokenKind::Int(BigInt::from(255)),
            TokenKind::Int(BigInt::from(15)),
            TokenKind::Int(BigInt::from(5)),
            TokenKind::Float(1.5),
            TokenKind::Float(0.5),
            TokenKind::Float(2.0),
            TokenKind::Float(1000.0),
            TokenKind::Imag(2.0),
            TokenKind::Imag(1.5),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_big_integer_literal_is_exact() {
    let expected: BigInt = "123456789012345678901234567890".parse().unwrap();
    assert_eq!(
        kinds("123456789012345678901234567890")[0],
        TokenKind::Int(expected)
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        &kinds(r#""a\nb" 'it\'s' "\q""#)[..3],
        &[
            TokenKind::Str("a\nb".to_string()),
            TokenKind::Str("it's".to_string()),
            TokenKind::Str("\\q".to_string()),
        ]
    );
}

#[test]
fn test_indent_and_dedent() {
    let interner = StringInterner::new();
    let f = interner.intern("f");
    let source = "def f():\n    pass\nf()\n";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Def,
            TokenKind::Ident(f),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent,
            TokenKind::Pass,
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Ident(f),
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_dedents_close_at_eof() {
    let tokens = kinds("if a:\n  if b:\n    pass");
    let tail: Vec<_> = tokens[tokens.len() - 4..].to_vec();
    assert_eq!(
        tail,
        vec![
            TokenKind::Newline,
            TokenKind::Dedent,
            TokenKind::Dedent,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_blank_lines_and_comments_do_not_produce_newlines() {
    assert_eq!(
        kinds("# header\n\nx\n   \n  # indented comment\ny\n"),
        kinds("x\ny\n")
    );
}

#[test]
fn test_newlines_inside_brackets_are_ignored() {
    assert_eq!(kinds("f(1,\n      2)\n"), kinds("f(1, 2)\n"));
}

#[test]
fn test_line_continuation() {
    assert_eq!(kinds("x = 1 + \\\n    2\n"), kinds("x = 1 + 2\n"));
}

#[test]
fn test_unterminated_string() {
    let err = lex_err("x = \"abc\ny = 1");
    assert_eq!(err.code, ErrorCode::E0001);
    assert_eq!(err.span, Span::new(4, 8));
}

#[test]
fn test_invalid_character() {
    let err = lex_err("x = 1 $ 2");
    assert_eq!(err.code, ErrorCode::E0002);
    assert_eq!(err.span, Span::new(6, 7));
}

#[test]
fn test_invalid_binary_digit() {
    assert_eq!(lex_err("0b102").code, ErrorCode::E0003);
}

#[test]
fn test_inconsistent_dedent() {
    let err = lex_err("if a:\n        x = 1\n    y = 2\n");
    assert_eq!(err.code, ErrorCode::E0004);
}

#[test]
fn test_unclosed_and_unmatched_brackets() {
    let err = lex_err("print(max(1, 2)\n");
    assert_eq!(err.code, ErrorCode::E1003);
    assert_eq!(err.span, Span::new(5, 6));

    assert_eq!(lex_err("x = 1)\n").code, ErrorCode::E1001);
    assert_eq!(lex_err("x = (1]\n").code, ErrorCode::E1001);
}
