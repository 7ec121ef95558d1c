//! Recursive-descent selector parser.
//!
//! The parser pulls tokens through a small fixed-capacity peek queue.
//! Every grammar decision is made with at most two tokens of lookahead
//! ("peek then decide"); consumed tokens are never re-scanned, so there is
//! no backtracking — the one ambiguity in the grammar (a bare identifier
//! that may or may not start a namespace-qualified name) is resolved by
//! peeking before committing.

use crate::error::Error;
use crate::tokenizer::{Token, TokenFlag, TokenKind, Tokenizer};

use super::ast::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    PseudoClassKind, PseudoClassSelector, PseudoElementSelector, SubclassSelector, TypeSelector,
    WqName,
};
use super::queue::TokenQueue;

/// The error reported when a compound selector was required but the next
/// token cannot start one.
///
/// ```text
///  <compound-selector> can start with:
///  |-- <type-selector>
///  | \-- <ns-prefix>? [ '*' | <ident-token> ]
///  |   \-- [ <ident-token> | '*' ]? '|'
///  |-- <subclass-selector>
///  | |-- <id-selector> = <hash-token>
///  | |-- <class-selector> = '.' <ident-token>
///  | |-- <attribute-selector> = '[' ...
///  | \-- <pseudo-class-selector> = ':' ...
///  \-- <pseudo-element-selector> = ':' ...
/// ```
const EXPECTED_COMPOUND: &str = "expected identifier, '#', '*', '.', '|', '[', ':'";

/// A pull source of tokens.
///
/// The parser is the only consumer; implementing this for both the live
/// tokenizer and a captured token sequence lets the same parser drive
/// sub-parsing of function arguments (the An+B micro-syntax).
pub trait TokenStream {
    /// Produce the next token. Returning EOF repeatedly past the end of
    /// input is required.
    ///
    /// # Errors
    ///
    /// Propagates tokenization failures.
    fn next_token(&mut self) -> Result<Token, Error>;
}

impl TokenStream for Tokenizer {
    fn next_token(&mut self) -> Result<Token, Error> {
        Tokenizer::next_token(self)
    }
}

/// Replays a captured token sequence, then reports EOF at the position just
/// past the final token.
pub struct TokenSlice {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenSlice {
    /// Wrap a captured token sequence.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }
}

impl TokenStream for TokenSlice {
    fn next_token(&mut self) -> Result<Token, Error> {
        if let Some(t) = self.tokens.get(self.index) {
            self.index += 1;
            return Ok(t.clone());
        }
        let end = self.tokens.last().map_or(0, |t| t.pos + t.raw.len());
        Ok(Token::eof(end))
    }
}

/// [Selectors Level 4 § 19 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
///
/// Recursive-descent parser producing a list of [`ComplexSelector`]s.
/// Whitespace tokens are significant only as separators between compound
/// selectors (the descendant combinator) and are skipped everywhere else.
pub struct Parser<S> {
    source: S,
    /// Tokens that have been peeked but not consumed. These are drained
    /// before the source is consulted again.
    queue: TokenQueue,
}

/// The parser never looks further ahead than two tokens.
const PEEK_CAPACITY: usize = 2;

impl Parser<Tokenizer> {
    /// Create a parser over selector text.
    #[must_use]
    pub fn new(selector: &str) -> Self {
        Self::from_stream(Tokenizer::new(selector))
    }
}

impl Parser<TokenSlice> {
    /// Create a sub-parser over an already-captured token sequence, as used
    /// for pseudo-class function arguments.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::from_stream(TokenSlice::new(tokens))
    }
}

impl<S: TokenStream> Parser<S> {
    /// Create a parser over an arbitrary token source.
    pub fn from_stream(source: S) -> Self {
        Self {
            source,
            queue: TokenQueue::new(PEEK_CAPACITY),
        }
    }

    /// Peek at the next unconsumed token.
    pub(super) fn peek(&mut self) -> Result<Token, Error> {
        self.peek_n(0)
    }

    /// Peek `n` tokens ahead (`n < PEEK_CAPACITY`).
    pub(super) fn peek_n(&mut self, n: usize) -> Result<Token, Error> {
        while n >= self.queue.len() {
            let t = self.source.next_token()?;
            self.queue.push(t);
        }
        Ok(self.queue.get(n).clone())
    }

    /// Consume and return the next token.
    pub(super) fn next(&mut self) -> Result<Token, Error> {
        if self.queue.len() > 0 {
            return Ok(self.queue.pop());
        }
        self.source.next_token()
    }

    /// Skip over whitespace tokens.
    pub(super) fn skip_whitespace(&mut self) -> Result<(), Error> {
        while self.peek()?.kind == TokenKind::Whitespace {
            let _ = self.next()?;
        }
        Ok(())
    }

    /// Require that only whitespace remains before EOF.
    pub(super) fn expect_whitespace_or_eof(&mut self) -> Result<(), Error> {
        self.skip_whitespace()?;
        let t = self.next()?;
        if t.kind != TokenKind::Eof {
            return Err(Error::parse("expected no more tokens", t.pos));
        }
        Ok(())
    }

    /// `SelectorList := ComplexSelector (',' S* ComplexSelector)*`
    ///
    /// # Errors
    ///
    /// Returns the first tokenization or grammar error encountered.
    pub fn parse(mut self) -> Result<Vec<ComplexSelector>, Error> {
        let mut selectors = Vec::new();
        self.skip_whitespace()?;
        loop {
            selectors.push(self.complex_selector()?);
            self.skip_whitespace()?;
            let t = self.next()?;
            match t.kind {
                TokenKind::Eof => return Ok(selectors),
                TokenKind::Comma => self.skip_whitespace()?,
                _ => return Err(Error::parse("expected ',' or end of selector", t.pos)),
            }
        }
    }

    /// `ComplexSelector := CompoundSelector (Combinator? S* CompoundSelector)*`
    ///
    /// Detecting the end of the chain takes one token of lookahead after
    /// skipping whitespace: if a compound selector start follows, the chain
    /// continues (with an implied descendant combinator unless an explicit
    /// one was consumed); otherwise the complex selector is complete. An
    /// explicit combinator with nothing after it is a parse error.
    fn complex_selector(&mut self) -> Result<ComplexSelector, Error> {
        let start = self.peek()?;
        let Some(first) = self.compound_selector()? else {
            return Err(Error::parse(EXPECTED_COMPOUND, start.pos));
        };

        let mut rest = Vec::new();
        loop {
            self.skip_whitespace()?;

            let mut combinator = None;
            let t = self.peek()?;
            if t.kind == TokenKind::Delim {
                match t.value.as_str() {
                    ">" => {
                        let _ = self.next()?;
                        self.skip_whitespace()?;
                        combinator = Some(Combinator::Child);
                    }
                    "+" => {
                        let _ = self.next()?;
                        self.skip_whitespace()?;
                        combinator = Some(Combinator::NextSibling);
                    }
                    "~" => {
                        let _ = self.next()?;
                        self.skip_whitespace()?;
                        combinator = Some(Combinator::SubsequentSibling);
                    }
                    // A lone '|' belongs to a namespace prefix; only '||'
                    // is the column combinator.
                    "|" => {
                        if self.peek_n(1)?.is_delim('|') {
                            let _ = self.next()?;
                            let _ = self.next()?;
                            self.skip_whitespace()?;
                            combinator = Some(Combinator::Column);
                        }
                    }
                    _ => {}
                }
            }

            match self.compound_selector()? {
                Some(compound) => {
                    rest.push((combinator.unwrap_or(Combinator::Descendant), compound));
                }
                None => {
                    if combinator.is_some() {
                        let t = self.peek()?;
                        return Err(Error::parse(EXPECTED_COMPOUND, t.pos));
                    }
                    return Ok(ComplexSelector {
                        pos: start.pos,
                        first,
                        rest,
                    });
                }
            }
        }
    }

    /// ```text
    /// <compound-selector> = [ <type-selector>? <subclass-selector>*
    ///                         [ <pseudo-element-selector> <pseudo-class-selector>* ]* ]!
    /// ```
    ///
    /// Whitespace is disallowed between the top level elements. Returns
    /// `None` without consuming anything when the next token cannot start a
    /// compound selector.
    fn compound_selector(&mut self) -> Result<Option<CompoundSelector>, Error> {
        let pos = self.peek()?.pos;
        let mut found = false;

        let type_selector = self.type_selector()?;
        if type_selector.is_some() {
            found = true;
        }

        let mut subclasses = Vec::new();
        while let Some(sc) = self.subclass_selector()? {
            subclasses.push(sc);
            found = true;
        }

        let mut pseudo_elements = Vec::new();
        while let Some(ps) = self.pseudo_element_selector()? {
            pseudo_elements.push(ps);
            found = true;
        }

        if !found {
            return Ok(None);
        }
        Ok(Some(CompoundSelector {
            pos,
            type_selector,
            subclasses,
            pseudo_elements,
        }))
    }

    /// ```text
    /// <type-selector> = <wq-name> | <ns-prefix>? '*'
    /// ```
    ///
    /// Whitespace is disallowed throughout.
    fn type_selector(&mut self) -> Result<Option<TypeSelector>, Error> {
        let t = self.peek()?;
        if !(t.kind == TokenKind::Ident || t.is_delim('*') || t.is_delim('|')) {
            return Ok(None);
        }
        let name = self.parse_name(true)?;
        Ok(Some(TypeSelector { pos: t.pos, name }))
    }

    /// ```text
    /// <subclass-selector> = <id-selector> | <class-selector> |
    ///                       <attribute-selector> | <pseudo-class-selector>
    /// ```
    fn subclass_selector(&mut self) -> Result<Option<SubclassSelector>, Error> {
        let t = self.peek()?;

        // <id-selector> = <hash-token>
        if t.kind == TokenKind::Hash {
            let t = self.next()?;
            return Ok(Some(SubclassSelector::Id {
                name: t.value,
                identifier: t.flag == TokenFlag::Id,
            }));
        }

        // <class-selector> = '.' <ident-token>
        if t.is_delim('.') {
            let _ = self.next()?;
            let ident = self.next()?;
            if ident.kind != TokenKind::Ident {
                return Err(Error::parse("expected identifier", ident.pos));
            }
            return Ok(Some(SubclassSelector::Class(ident.value)));
        }

        // <attribute-selector> = '[' ...
        if t.kind == TokenKind::BracketOpen {
            return Ok(Some(SubclassSelector::Attribute(
                self.attribute_selector()?,
            )));
        }

        if t.kind != TokenKind::Colon {
            return Ok(None);
        }

        // A second ':' means we've hit a <pseudo-element-selector>, which
        // is not a subclass selector; stop and let the compound's
        // pseudo-element loop take over.
        if self.peek_n(1)?.kind == TokenKind::Colon {
            return Ok(None);
        }

        Ok(Some(SubclassSelector::PseudoClass(
            self.pseudo_class_selector()?,
        )))
    }

    /// `PseudoElementGroup := '::' PseudoClassSelector (':' PseudoClassSelector)*`
    fn pseudo_element_selector(&mut self) -> Result<Option<PseudoElementSelector>, Error> {
        if self.peek()?.kind != TokenKind::Colon {
            return Ok(None);
        }
        if self.peek_n(1)?.kind != TokenKind::Colon {
            return Ok(None);
        }
        let _ = self.next()?; // the first ':'

        let element = self.pseudo_class_selector()?;
        let mut classes = Vec::new();
        loop {
            self.skip_whitespace()?;
            if self.peek()?.kind != TokenKind::Colon {
                break;
            }
            // '::' starts the next pseudo-element group.
            if self.peek_n(1)?.kind == TokenKind::Colon {
                break;
            }
            classes.push(self.pseudo_class_selector()?);
        }
        Ok(Some(PseudoElementSelector { element, classes }))
    }

    /// ```text
    /// <pseudo-class-selector> = ':' <ident-token> |
    ///                           ':' <function-token> <any-value> ')'
    /// ```
    ///
    /// Function arguments are collected verbatim as a balanced token
    /// sequence; they are interpreted later (the An+B micro-parser for the
    /// `nth-*` family).
    fn pseudo_class_selector(&mut self) -> Result<PseudoClassSelector, Error> {
        let colon = self.next()?;
        if colon.kind != TokenKind::Colon {
            return Err(Error::parse("expected ':'", colon.pos));
        }

        let t = self.next()?;
        if t.kind == TokenKind::Ident {
            return Ok(PseudoClassSelector {
                pos: colon.pos,
                kind: PseudoClassKind::Ident(t.value),
            });
        }
        if t.kind != TokenKind::Function {
            return Err(Error::parse("expected identifier or function", t.pos));
        }

        let args = self.any_value(TokenKind::ParenClose)?;
        let close = self.next()?;
        if close.kind != TokenKind::ParenClose {
            return Err(Error::parse("expected ')'", close.pos));
        }
        Ok(PseudoClassSelector {
            pos: colon.pos,
            kind: PseudoClassKind::Function {
                name: t.value,
                args,
            },
        })
    }

    /// [`<any-value>`](https://drafts.csswg.org/css-syntax-3/#typedef-any-value)
    ///
    /// Collect tokens up to (but not including) the `until` token at nesting
    /// depth zero, tracking `(`, `[`, `{` nesting. Unbalanced brackets are a
    /// parse error.
    fn any_value(&mut self, until: TokenKind) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        let mut want_closing: Vec<TokenKind> = Vec::new();
        loop {
            if want_closing.is_empty() {
                let t = self.peek()?;
                if t.kind == until {
                    return Ok(tokens);
                }
            }

            let t = self.next()?;
            match t.kind {
                TokenKind::Eof => {
                    return Err(Error::parse(
                        format!("unexpected end of input attempting to match '{until}'"),
                        t.pos,
                    ));
                }
                TokenKind::BracketOpen => want_closing.push(TokenKind::BracketClose),
                TokenKind::CurlyOpen => want_closing.push(TokenKind::CurlyClose),
                TokenKind::ParenOpen => want_closing.push(TokenKind::ParenClose),
                TokenKind::BracketClose | TokenKind::CurlyClose | TokenKind::ParenClose => {
                    if want_closing.last() != Some(&t.kind) {
                        return Err(Error::parse(format!("unmatched '{}'", t.raw), t.pos));
                    }
                    let _ = want_closing.pop();
                }
                _ => {}
            }
            tokens.push(t);
        }
    }

    /// ```text
    /// <attribute-selector> = '[' <wq-name> ']' |
    ///                        '[' <wq-name> <attr-matcher>
    ///                            [ <string-token> | <ident-token> ]
    ///                            <attr-modifier>? ']'
    /// <attr-matcher>       = [ '~' | '|' | '^' | '$' | '*' ]? '='
    /// <attr-modifier>      = i
    /// ```
    ///
    /// Whitespace is forbidden between the two code points of a matcher
    /// like `~=`, but allowed around the name, matcher, and value.
    fn attribute_selector(&mut self) -> Result<AttributeSelector, Error> {
        // '['
        let open = self.next()?;
        if open.kind != TokenKind::BracketOpen {
            return Err(Error::parse("expected '['", open.pos));
        }
        self.skip_whitespace()?;

        // <wq-name>
        let name = self.parse_name(false)?;
        self.skip_whitespace()?;

        let t = self.next()?;
        if t.kind == TokenKind::BracketClose {
            // Found ']', a bare presence check.
            return Ok(AttributeSelector {
                pos: open.pos,
                name,
                operator: AttrOperator::Presence,
                value: String::new(),
                case_insensitive: false,
            });
        }

        // <attr-matcher>
        if t.kind != TokenKind::Delim {
            return Err(Error::parse("expected '~', '|', '^', '$', '*' or '='", t.pos));
        }
        let operator = match t.value.as_str() {
            "=" => AttrOperator::Equals,
            "~" => AttrOperator::Includes,
            "|" => AttrOperator::DashMatch,
            "^" => AttrOperator::Prefix,
            "$" => AttrOperator::Suffix,
            "*" => AttrOperator::Substring,
            _ => {
                return Err(Error::parse("expected '~', '|', '^', '$', '*' or '='", t.pos));
            }
        };
        if operator != AttrOperator::Equals {
            let eq = self.next()?;
            if !eq.is_delim('=') {
                return Err(Error::parse("expected '='", eq.pos));
            }
        }
        self.skip_whitespace()?;

        // [ <string-token> | <ident-token> ]
        let value_token = self.next()?;
        if !(value_token.kind == TokenKind::String || value_token.kind == TokenKind::Ident) {
            return Err(Error::parse(
                "expected identifier or string",
                value_token.pos,
            ));
        }
        self.skip_whitespace()?;

        // <attr-modifier>?
        let mut case_insensitive = false;
        let mut t = self.next()?;
        if t.is_ident("i") {
            case_insensitive = true;
            self.skip_whitespace()?;
            t = self.next()?;
        }
        if t.kind != TokenKind::BracketClose {
            return Err(Error::parse("expected ']'", t.pos));
        }
        Ok(AttributeSelector {
            pos: open.pos,
            name,
            operator,
            value: value_token.value,
            case_insensitive,
        })
    }

    /// Parse either `<wq-name>` or `<type-selector>`, which are almost
    /// identical — `<type-selector>` additionally allows `*` as the final
    /// element.
    ///
    /// ```text
    /// <wq-name>       = <ns-prefix>? <ident-token>
    /// <type-selector> = <ns-prefix>? [ <ident-token> | '*' ]
    /// <ns-prefix>     = [ <ident-token> | '*' ]? '|'
    /// ```
    ///
    /// A bare identifier is speculatively checked for a following
    /// `'|' <ident>` with two tokens of lookahead; if the lookahead does not
    /// confirm the namespace form, the identifier stands alone. Once the
    /// decision is made it is not revisited.
    fn parse_name(&mut self, allow_star: bool) -> Result<WqName, Error> {
        let t = self.next()?;

        // '|' <ident> - explicit "no namespace".
        if t.is_delim('|') {
            let ident = self.next()?;
            if ident.kind != TokenKind::Ident {
                return Err(Error::parse("expected identifier", ident.pos));
            }
            return Ok(WqName {
                has_prefix: true,
                prefix: String::new(),
                value: ident.value,
            });
        }

        // '*' - either the universal selector or the "any namespace" prefix.
        if t.is_delim('*') {
            let delim = self.peek()?;
            if !delim.is_delim('|') {
                if allow_star {
                    return Ok(WqName {
                        has_prefix: false,
                        prefix: String::new(),
                        value: "*".to_string(),
                    });
                }
                return Err(Error::parse("expected '|'", delim.pos));
            }
            let _ = self.next()?; // consume the '|'
            let ident = self.next()?;
            if !(ident.kind == TokenKind::Ident || (allow_star && ident.is_delim('*'))) {
                return Err(Error::parse("expected identifier", ident.pos));
            }
            return Ok(WqName {
                has_prefix: true,
                prefix: "*".to_string(),
                value: ident.value,
            });
        }

        if t.kind != TokenKind::Ident {
            return Err(Error::parse("expected identifier", t.pos));
        }

        // See if the stream continues with '|' <ident>.
        let delim = self.peek()?;
        if !delim.is_delim('|') {
            return Ok(WqName {
                has_prefix: false,
                prefix: String::new(),
                value: t.value,
            });
        }
        let ident = self.peek_n(1)?;
        if !(ident.kind == TokenKind::Ident || (allow_star && ident.is_delim('*'))) {
            return Ok(WqName {
                has_prefix: false,
                prefix: String::new(),
                value: t.value,
            });
        }
        // Consume the peeked tokens.
        let _ = self.next()?;
        let ident = self.next()?;
        Ok(WqName {
            has_prefix: true,
            prefix: t.value,
            value: ident.value,
        })
    }
}
