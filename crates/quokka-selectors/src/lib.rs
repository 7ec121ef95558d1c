//! CSS selector compilation and matching for the quokka engine.
//!
//! # Scope
//!
//! This crate implements the selector pipeline end to end:
//!
//! - **Tokenizer** ([CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, hash, string, url, number,
//!     percentage, dimension, delims, CDO/CDC, brackets
//!   - Escape sequences, byte-accurate positions, hard errors for
//!     unterminated strings and URLs
//! - **Parser** ([Selectors Level 4 § 19](https://www.w3.org/TR/selectors-4/#grammar))
//!   - Selector lists, complex selectors with all combinators (including
//!     `||`), compound selectors, namespace-qualified names
//!   - Attribute selectors with every value operator and the `i` modifier
//!   - Pseudo-classes and pseudo-elements, with verbatim capture of
//!     balanced function arguments
//! - **An+B micro-parser** ([CSS Syntax § 6](https://drafts.csswg.org/css-syntax-3/#the-anb-type))
//! - **Compiler**
//!   - Tag names validated against a known-tag vocabulary
//!   - Pseudo-classes resolved to a closed predicate set
//!   - Namespace prefixes resolved to match policies
//!   - Bounded error accumulation
//! - **Matcher**
//!   - Depth-first, document-order search with combinator-specific
//!     traversal over a [`quokka_dom::DomTree`]
//!
//! # Not implemented
//!
//! - Pseudo-elements (`::before` and friends) are rejected at compile time
//! - Specificity computation and cascade resolution
//! - Author-defined pseudo-classes
//!
//! # Example
//!
//! ```
//! use quokka_dom::{DomTree, ElementData, NodeType};
//! use quokka_selectors::compile;
//!
//! let mut tree = DomTree::new();
//! let root = tree.root();
//! let div = tree.append(root, NodeType::Element(ElementData::new("div")));
//! let p = tree.append(div, NodeType::Element(ElementData::new("p").attr("class", "foo")));
//!
//! let selector = compile("div > p.foo").expect("selector compiles");
//! assert_eq!(selector.select(&tree, root), vec![p]);
//! assert!(selector.matches(&tree, p));
//! ```

/// Selector compiler: AST to executable matcher.
pub mod compiler;
/// Error taxonomy shared by all pipeline stages.
pub mod error;
/// Selector parser per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod parser;
/// Selector tokenizer per [CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/).
pub mod tokenizer;

mod matcher;

// Re-exports for convenience
pub use compiler::{Compiler, Selector};
pub use error::{CompileError, CompileErrorList, Error};
pub use parser::{Nth, Parser};
pub use tokenizer::{Token, TokenKind, Tokenizer};

/// Compile a selector string into an executable [`Selector`].
///
/// This is the single entry point combining tokenize, parse, and compile
/// with the default configuration (stop at the first semantic error). Use
/// [`Compiler`] directly to accumulate more than one error.
///
/// # Errors
///
/// Returns an [`Error`] carrying the byte offset of the problem: a fatal
/// tokenization or grammar error, or the accumulated semantic errors.
pub fn compile(selector: &str) -> Result<Selector, Error> {
    Compiler::new().compile(selector)
}
