//! [The An+B microsyntax](https://drafts.csswg.org/css-syntax-3/#the-anb-type).
//!
//! The argument tokens of `nth-child()` and friends are captured verbatim
//! by the main parser and re-parsed here. The sub-grammar is isolated
//! because its tokenization interacts unusually with CSS Syntax: `2n-1` is
//! a single dimension token whose unit is `n-1`, so the fused negative
//! offset has to be recovered from the unit text rather than from further
//! tokens.

use crate::error::Error;
use crate::tokenizer::{Token, TokenFlag, TokenKind};

use super::ast::Nth;
use super::parser::{Parser, TokenStream};

/// Parse the captured argument tokens of an `nth-*` pseudo-class into An+B
/// coefficients.
///
/// Recognized forms: `even`, `odd`, a bare integer, `4n`, `4n+2`, `4n - 2`,
/// `4n-2` (fused), `-n`, `-n-2`, `n`, `n- 2`, with an optional leading `+`
/// on the `n` forms. Trailing whitespace is allowed; any other leftover
/// token is a syntax error.
///
/// # Errors
///
/// Returns a parse error at the offending token's position.
pub fn parse_nth(args: &[Token]) -> Result<Nth, Error> {
    let mut parser = Parser::from_tokens(args.to_vec());
    let nth = parser.a_n_plus_b()?;
    parser.expect_whitespace_or_eof()?;
    Ok(nth)
}

impl<S: TokenStream> Parser<S> {
    /// [The An+B type](https://drafts.csswg.org/css-syntax-3/#the-anb-type)
    fn a_n_plus_b(&mut self) -> Result<Nth, Error> {
        self.skip_whitespace()?;
        let t = self.next()?;

        if t.is_ident("even") {
            return Ok(Nth { a: 2, b: 0 });
        }
        if t.is_ident("odd") {
            return Ok(Nth { a: 2, b: 1 });
        }
        if is_integer(&t) {
            return Ok(Nth {
                a: 0,
                b: parse_int(&t)?,
            });
        }

        // <n-dimension>: "4n", possibly followed by a separate b term.
        if is_n_dimension(&t) {
            let a = parse_int(&t)?;
            let b = self.b_term()?;
            return Ok(Nth { a, b });
        }

        // <ndashdigit-dimension>: "4n-3", where "4" is the numeric text and
        // "n-3" is the unit.
        if is_ndashdigit_dimension(&t) {
            let a = parse_int(&t)?;
            let b = parse_int_text(&t.unit[1..], &t)?;
            return Ok(Nth { a, b });
        }

        // <dashndashdigit-ident>: "-n-3".
        if is_dash_ndash_digit_ident(&t) {
            let b = parse_int_text(&t.value[2..], &t)?;
            return Ok(Nth { a: -1, b });
        }

        // <ndash-dimension>: "4n-" followed by a separate signless integer,
        // as in "4n- 3".
        if is_ndash_dimension(&t) {
            let a = parse_int(&t)?;
            let n = self.signless_integer()?;
            return Ok(Nth { a, b: -n });
        }

        // "-n-" followed by a separate signless integer.
        if t.is_ident("-n-") {
            let n = self.signless_integer()?;
            return Ok(Nth { a: -1, b: -n });
        }

        if t.is_ident("-n") {
            let b = self.b_term()?;
            return Ok(Nth { a: -1, b });
        }

        // An optional '+' may precede the bare "n" forms.
        let t = if t.is_delim('+') {
            self.skip_whitespace()?;
            self.next()?
        } else {
            t
        };

        if t.is_ident("n") {
            let b = self.b_term()?;
            return Ok(Nth { a: 1, b });
        }
        if t.is_ident("n-") {
            let n = self.signless_integer()?;
            return Ok(Nth { a: 1, b: -n });
        }

        Err(Error::parse("expected 'even', 'odd', or integer type", t.pos))
    }

    /// The common trailing pattern
    /// `<signed-integer> | ['+' | '-'] <signless-integer>`, tolerating
    /// whitespace on both sides of the sign. EOF means the b term was
    /// omitted (b = 0).
    fn b_term(&mut self) -> Result<i64, Error> {
        self.skip_whitespace()?;
        let t = self.next()?;
        if t.kind == TokenKind::Eof {
            return Ok(0);
        }

        if is_signed_integer(&t) {
            return parse_int(&t);
        }
        if !(t.is_delim('+') || t.is_delim('-')) {
            return Err(Error::parse(
                "expected one of the following: <signed-integer>, '+', '-'",
                t.pos,
            ));
        }
        let negative = t.is_delim('-');

        let n = self.signless_integer()?;
        Ok(if negative { -n } else { n })
    }

    /// Skip whitespace and require a `<signless-integer>`.
    fn signless_integer(&mut self) -> Result<i64, Error> {
        self.skip_whitespace()?;
        let t = self.next()?;
        if !is_signless_integer(&t) {
            return Err(Error::parse("expected unsigned integer", t.pos));
        }
        parse_int(&t)
    }
}

/// [`<n-dimension>`](https://drafts.csswg.org/css-syntax-3/#typedef-n-dimension)
fn is_n_dimension(t: &Token) -> bool {
    t.kind == TokenKind::Dimension
        && t.flag == TokenFlag::Integer
        && t.unit.eq_ignore_ascii_case("n")
}

/// [`<ndash-dimension>`](https://drafts.csswg.org/css-syntax-3/#typedef-ndash-dimension)
fn is_ndash_dimension(t: &Token) -> bool {
    t.kind == TokenKind::Dimension && t.unit.eq_ignore_ascii_case("n-")
}

/// [`<ndashdigit-dimension>`](https://drafts.csswg.org/css-syntax-3/#typedef-ndashdigit-dimension)
///
/// Looks for units like `n-3`.
fn is_ndashdigit_dimension(t: &Token) -> bool {
    t.kind == TokenKind::Dimension && is_prefix_with_digits(&t.unit, "n-")
}

/// [`<dashndashdigit-ident>`](https://drafts.csswg.org/css-syntax-3/#typedef-dashndashdigit-ident)
///
/// Looks for identifiers like `-n-3`.
fn is_dash_ndash_digit_ident(t: &Token) -> bool {
    t.kind == TokenKind::Ident && is_prefix_with_digits(&t.value, "-n-")
}

/// [`<integer>`](https://drafts.csswg.org/css-syntax-3/#typedef-integer)
fn is_integer(t: &Token) -> bool {
    t.kind == TokenKind::Number && t.flag == TokenFlag::Integer
}

/// [`<signed-integer>`](https://drafts.csswg.org/css-syntax-3/#typedef-signed-integer)
fn is_signed_integer(t: &Token) -> bool {
    is_integer(t) && (t.value.starts_with('+') || t.value.starts_with('-'))
}

/// [`<signless-integer>`](https://drafts.csswg.org/css-syntax-3/#typedef-signless-integer)
fn is_signless_integer(t: &Token) -> bool {
    is_integer(t) && t.value.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Whether `s` is `prefix` (ASCII-case-insensitively) followed by one or
/// more digits.
fn is_prefix_with_digits(s: &str, prefix: &str) -> bool {
    if s.len() <= prefix.len() {
        return false;
    }
    let (head, tail) = s.split_at(prefix.len());
    head.eq_ignore_ascii_case(prefix) && tail.chars().all(|c| c.is_ascii_digit())
}

/// Parse a token's numeric text as an integer.
fn parse_int(t: &Token) -> Result<i64, Error> {
    parse_int_text(&t.value, t)
}

/// Parse `text` as an integer, reporting failures at `t`'s position.
fn parse_int_text(text: &str, t: &Token) -> Result<i64, Error> {
    text.parse()
        .map_err(|err| Error::parse(format!("parsing value as integer: {err}"), t.pos))
}
