//! Selector parser module.

/// Selector AST types per [Selectors Level 4 § 4](https://www.w3.org/TR/selectors-4/#syntax).
pub mod ast;
/// The An+B micro-parser for `nth-*` arguments.
pub mod nth;
/// Recursive-descent parser implementation.
pub mod parser;

mod queue;

pub use ast::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth,
    PseudoClassKind, PseudoClassSelector, PseudoElementSelector, SubclassSelector, TypeSelector,
    WqName,
};
pub use nth::parse_nth;
pub use parser::{Parser, TokenSlice, TokenStream};
