//! Tests for the An+B micro-parser.

use quokka_selectors::parser::{Nth, parse_nth};
use quokka_selectors::tokenizer::{Token, TokenKind, Tokenizer};
use quokka_selectors::Error;

/// Tokenize raw argument text the way the parser captures it: every token
/// up to EOF, whitespace included.
fn arg_tokens(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token().expect("argument text tokenizes");
        if token.kind == TokenKind::Eof {
            return tokens;
        }
        tokens.push(token);
    }
}

fn nth(input: &str) -> Nth {
    parse_nth(&arg_tokens(input))
        .unwrap_or_else(|err| panic!("parse_nth({input:?}) failed: {err}"))
}

fn nth_err(input: &str) -> Error {
    match parse_nth(&arg_tokens(input)) {
        Ok(got) => panic!("expected parse_nth({input:?}) to fail, got {got:?}"),
        Err(err) => err,
    }
}

#[test]
fn test_keyword_forms() {
    assert_eq!(nth("even"), Nth { a: 2, b: 0 });
    assert_eq!(nth("odd"), Nth { a: 2, b: 1 });
    assert_eq!(nth("ODD"), Nth { a: 2, b: 1 });
}

#[test]
fn test_bare_integer_matches_one_position() {
    assert_eq!(nth("4"), Nth { a: 0, b: 4 });
    assert_eq!(nth("+7"), Nth { a: 0, b: 7 });
    assert_eq!(nth("-3"), Nth { a: 0, b: -3 });
}

#[test]
fn test_n_dimension_forms() {
    assert_eq!(nth("2n"), Nth { a: 2, b: 0 });
    assert_eq!(nth("+2n"), Nth { a: 2, b: 0 });
    assert_eq!(nth("-2n"), Nth { a: -2, b: 0 });
    assert_eq!(nth("2n+1"), Nth { a: 2, b: 1 });
    assert_eq!(nth("10n-1"), Nth { a: 10, b: -1 });
    assert_eq!(nth("3n + 2"), Nth { a: 3, b: 2 });
    assert_eq!(nth("3n+ 2"), Nth { a: 3, b: 2 });
    assert_eq!(nth("3n +2"), Nth { a: 3, b: 2 });
    assert_eq!(nth("4n - 3"), Nth { a: 4, b: -3 });
}

#[test]
fn test_fused_dimension_forms() {
    // "4n-3" is a single dimension token with unit "n-3".
    assert_eq!(nth("4n-3"), Nth { a: 4, b: -3 });
    // "4n-" followed by a separate signless integer.
    assert_eq!(nth("4n- 3"), Nth { a: 4, b: -3 });
}

#[test]
fn test_bare_n_forms() {
    assert_eq!(nth("n"), Nth { a: 1, b: 0 });
    assert_eq!(nth("+n"), Nth { a: 1, b: 0 });
    assert_eq!(nth("n+3"), Nth { a: 1, b: 3 });
    assert_eq!(nth("n- 2"), Nth { a: 1, b: -2 });
    assert_eq!(nth("-n"), Nth { a: -1, b: 0 });
    assert_eq!(nth("-n+6"), Nth { a: -1, b: 6 });
    assert_eq!(nth("-n-3"), Nth { a: -1, b: -3 });
    assert_eq!(nth("-n- 3"), Nth { a: -1, b: -3 });
}

#[test]
fn test_surrounding_whitespace_is_tolerated() {
    assert_eq!(nth("  2n + 1  "), Nth { a: 2, b: 1 });
    assert_eq!(nth(" even "), Nth { a: 2, b: 0 });
}

#[test]
fn test_sign_must_precede_the_full_term() {
    // "3+4n" reads as the integer 3 with leftover tokens - the sign cannot
    // appear mid-expression.
    assert!(matches!(nth_err("3+4n"), Error::Parse { .. }));
}

#[test]
fn test_leftover_tokens_are_an_error() {
    assert!(matches!(nth_err("2n+1 2"), Error::Parse { .. }));
    assert!(matches!(nth_err("even odd"), Error::Parse { .. }));
    assert!(matches!(nth_err("n foo"), Error::Parse { .. }));
}

#[test]
fn test_non_integer_numerics_are_an_error() {
    assert!(matches!(nth_err("4.5"), Error::Parse { .. }));
    assert!(matches!(nth_err("1.5n"), Error::Parse { .. }));
    assert!(matches!(nth_err("2n+1.5"), Error::Parse { .. }));
}

#[test]
fn test_garbage_is_an_error() {
    assert!(matches!(nth_err(""), Error::Parse { .. }));
    assert!(matches!(nth_err("foo"), Error::Parse { .. }));
    assert!(matches!(nth_err("+"), Error::Parse { .. }));
    assert!(matches!(nth_err("n++1"), Error::Parse { .. }));
}
