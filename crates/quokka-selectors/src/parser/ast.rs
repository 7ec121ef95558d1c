//! Selector AST per [Selectors Level 4 § 4](https://www.w3.org/TR/selectors-4/#syntax).
//!
//! The AST is document-independent and immutable after parsing: the same
//! selector string always yields a structurally identical tree, no node
//! holds a reference into any document, and one parse result can be
//! compiled and matched against many documents. Every node records the byte
//! offset it was parsed at, for diagnostics.

use crate::tokenizer::Token;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two compound
    /// selectors."
    Descendant,
    /// [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// A greater-than sign (`>`): direct children.
    Child,
    /// [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// A plus sign (`+`): adjacent siblings.
    NextSibling,
    /// [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// A tilde (`~`): any siblings.
    SubsequentSibling,
    /// [Selectors 4 § 17](https://www.w3.org/TR/selectors-4/#table-pseudos)
    /// Two pipes (`||`): column combinator. Recognized by the grammar but
    /// rejected at compile time.
    Column,
}

/// A possibly namespace-qualified name.
///
/// `<wq-name> = <ns-prefix>? <ident-token>` with
/// `<ns-prefix> = [ <ident-token> | '*' ]? '|'`
///
/// Prefix semantics: no prefix at all means the name is unqualified; an
/// empty prefix (`|a`) means "no namespace"; `*` (`*|a`) means "any
/// namespace"; anything else names the namespace exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WqName {
    /// Whether a `|` namespace prefix was written.
    pub has_prefix: bool,
    /// The prefix value; only meaningful when `has_prefix` is set.
    pub prefix: String,
    /// The name itself. For type selectors this may be `*`.
    pub value: String,
}

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
///
/// `<type-selector> = <wq-name> | <ns-prefix>? '*'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSelector {
    /// Byte offset of the selector start.
    pub pos: usize,
    /// The (possibly qualified, possibly universal) element name.
    pub name: WqName,
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The value operator of an attribute selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOperator {
    /// `[attr]` - the attribute is present, any value.
    Presence,
    /// `[attr=v]` - the value is exactly `v`.
    Equals,
    /// `[attr~=v]` - the value, split on whitespace, contains the word `v`.
    Includes,
    /// `[attr|=v]` - the value is `v` or starts with `v-`.
    DashMatch,
    /// `[attr^=v]` - the value starts with `v`.
    Prefix,
    /// `[attr$=v]` - the value ends with `v`.
    Suffix,
    /// `[attr*=v]` - the value contains `v`.
    Substring,
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// ```text
/// <attribute-selector> = '[' <wq-name> ']' |
///                        '[' <wq-name> <attr-matcher>
///                            [ <string-token> | <ident-token> ]
///                            <attr-modifier>? ']'
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Byte offset of the opening `[`.
    pub pos: usize,
    /// The attribute name, possibly namespace-qualified.
    pub name: WqName,
    /// The value operator; `Presence` when no matcher was written.
    pub operator: AttrOperator,
    /// The expected value; empty for `Presence`.
    pub value: String,
    /// Whether the `i` modifier requested case-insensitive comparison.
    pub case_insensitive: bool,
}

/// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// Either a plain identifier (`:empty`) or a function with raw argument
/// tokens (`:nth-child(2n+1)`). Argument tokens are captured verbatim as a
/// balanced sequence; the An+B micro-parser re-reads them at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoClassSelector {
    /// Byte offset of the `:`.
    pub pos: usize,
    /// Identifier or function form.
    pub kind: PseudoClassKind,
}

/// The two shapes a pseudo-class can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClassKind {
    /// `:name`
    Ident(String),
    /// `:name( <any-value> )`
    Function {
        /// The function name, without the trailing parenthesis.
        name: String,
        /// The raw argument tokens, brackets balanced, closing parenthesis
        /// excluded.
        args: Vec<Token>,
    },
}

impl PseudoClassSelector {
    /// The pseudo-class name, for either shape.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.kind {
            PseudoClassKind::Ident(name) | PseudoClassKind::Function { name, .. } => name,
        }
    }
}

/// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
///
/// A pseudo-element (`::before`) together with the pseudo-classes scoped to
/// it. The grammar accepts these; the compiler rejects them (pseudo-element
/// matching is out of scope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoElementSelector {
    /// The pseudo-element itself (parsed with the pseudo-class shape).
    pub element: PseudoClassSelector,
    /// Pseudo-classes following the pseudo-element, e.g. `::before:hover`.
    pub classes: Vec<PseudoClassSelector>,
}

/// [§ 4.1 Structure](https://www.w3.org/TR/selectors-4/#structure)
///
/// `<subclass-selector> = <id-selector> | <class-selector> |
/// <attribute-selector> | <pseudo-class-selector>`
///
/// The subclass selectors of a compound are ANDed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubclassSelector {
    /// `#id` - an ID selector from a hash token. `identifier` records the
    /// hash token's type flag: `#123` parses but is not a valid identifier,
    /// which the compiler reports.
    Id {
        /// The hash value, `#` stripped.
        name: String,
        /// Whether the hash token's type flag was "id".
        identifier: bool,
    },
    /// `.class`
    Class(String),
    /// `[attr...]`
    Attribute(AttributeSelector),
    /// `:pseudo`
    PseudoClass(PseudoClassSelector),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Byte offset of the compound start.
    pub pos: usize,
    /// The optional leading type (or universal) selector.
    pub type_selector: Option<TypeSelector>,
    /// ID, class, attribute, and pseudo-class constraints, ANDed.
    pub subclasses: Vec<SubclassSelector>,
    /// Trailing pseudo-element groups.
    pub pseudo_elements: Vec<PseudoElementSelector>,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors
/// separated by combinators."
///
/// `div > p.foo` is stored as `first = div`, `rest = [(Child, p.foo)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Byte offset of the selector start.
    pub pos: usize,
    /// The leftmost compound selector.
    pub first: CompoundSelector,
    /// The remaining chain, left to right, each compound paired with the
    /// combinator that attaches it to the chain so far.
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

/// An An+B expression resolved to its linear coefficients.
///
/// [CSS Syntax § 6 The An+B microsyntax](https://drafts.csswg.org/css-syntax-3/#the-anb-type)
///
/// Describes the arithmetic progression `a·n + b` of 1-based element
/// positions used by the `:nth-*` pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// The step. Zero means "exactly position `b`".
    pub a: i64,
    /// The offset.
    pub b: i64,
}
