//! Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Tokens are flat records rather than an enum with payloads: the parser
//! needs the raw source text (for round-tripping and for the An+B
//! micro-syntax, which re-reads dimension units at the string level) next to
//! the decoded value and the numeric/hash flags, and carrying them uniformly
//! keeps the peek queue simple.

use strum_macros::Display;

/// [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// "The output of the tokenization step is a stream of zero or more of the
/// following tokens: `<ident-token>`, `<function-token>`,
/// `<at-keyword-token>`, `<hash-token>`, `<string-token>`, `<url-token>`,
/// `<delim-token>`, `<number-token>`, `<percentage-token>`,
/// `<dimension-token>`, `<whitespace-token>`, `<CDO-token>`, `<CDC-token>`,
/// `<colon-token>`, `<semicolon-token>`, `<comma-token>`, `<[-token>`,
/// `<]-token>`, `<(-token>`, `<)-token>`, `<{-token>`, and `<}-token>`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    /// `<ident-token>`, e.g. `div`.
    Ident,
    /// `<function-token>`, e.g. `nth-child(`. The decoded value holds the
    /// name without the trailing parenthesis; the raw text retains it.
    Function,
    /// `<at-keyword-token>`, e.g. `@media`.
    AtKeyword,
    /// `<hash-token>`, e.g. `#foo`. Carries an id/unrestricted flag.
    Hash,
    /// `<string-token>`, e.g. `'hello world'`.
    String,
    /// `<url-token>`, e.g. `url(img.png)`.
    Url,
    /// `<delim-token>` holding a single code point.
    Delim,
    /// `<number-token>`, e.g. `37`. Carries an integer/number flag.
    Number,
    /// `<percentage-token>`, e.g. `42%`.
    Percentage,
    /// `<dimension-token>`, e.g. `4n` or `2n-1` (unit `n-1`).
    Dimension,
    /// `<whitespace-token>`: one maximal run of whitespace.
    Whitespace,
    /// `<CDO-token>`: `<!--`.
    Cdo,
    /// `<CDC-token>`: `-->`.
    Cdc,
    /// `<colon-token>`: `:`.
    Colon,
    /// `<semicolon-token>`: `;`.
    Semicolon,
    /// `<comma-token>`: `,`.
    Comma,
    /// `<[-token>`.
    BracketOpen,
    /// `<]-token>`.
    BracketClose,
    /// `<{-token>`.
    CurlyOpen,
    /// `<}-token>`.
    CurlyClose,
    /// `<(-token>`.
    ParenOpen,
    /// `<)-token>`.
    ParenClose,
    /// End of input. Requesting further tokens keeps returning EOF.
    Eof,
}

/// Type flag attached to numeric and hash tokens.
///
/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
/// "A `<number-token>` has a type flag set to either 'integer' or 'number'."
/// "A `<hash-token>` has a type flag set to 'id' or 'unrestricted'."
///
/// An+B parsing only accepts integer-flagged numerics; the hash flag decides
/// whether a hash token is usable as an ID selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenFlag {
    /// No flag; the token kind does not carry one.
    #[default]
    None,
    /// Numeric token written without a fractional part or exponent.
    Integer,
    /// Numeric token with a fractional part or exponent.
    Number,
    /// Hash token whose value is a valid CSS identifier.
    Id,
    /// Hash token whose value is not a valid CSS identifier (e.g. `#123`).
    Unrestricted,
}

/// A single lexical token.
///
/// Invariants: `pos` is the byte offset of the token start in the original
/// input, and concatenating `raw` over the whole stream (including
/// whitespace tokens) reconstructs the input exactly — tokens partition the
/// input with no gaps or overlaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's kind.
    pub kind: TokenKind,
    /// Exact source slice this token was read from.
    pub raw: String,
    /// Decoded value: escapes resolved, quotes and leading `#`/`@` stripped,
    /// function name without the trailing `(`. For numeric tokens this is
    /// the numeric text (sign and digits) without unit or `%`.
    pub value: String,
    /// Byte offset of the token start.
    pub pos: usize,
    /// Integer/number flag for numerics, id/unrestricted flag for hashes.
    pub flag: TokenFlag,
    /// Unit of a dimension token (e.g. `n`, `n-1`); empty otherwise.
    pub unit: String,
}

impl Token {
    /// An EOF token positioned at `pos`.
    #[must_use]
    pub fn eof(pos: usize) -> Self {
        Token {
            kind: TokenKind::Eof,
            raw: String::new(),
            value: String::new(),
            pos,
            flag: TokenFlag::None,
            unit: String::new(),
        }
    }

    /// Whether this is a delim token holding exactly `c`.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        self.kind == TokenKind::Delim && self.value.chars().eq(std::iter::once(c))
    }

    /// Whether this is an ident token whose value matches `s`
    /// ASCII-case-insensitively (CSS keywords are case-insensitive).
    #[must_use]
    pub fn is_ident(&self, s: &str) -> bool {
        self.kind == TokenKind::Ident && self.value.eq_ignore_ascii_case(s)
    }
}
