//! Selector compiler: AST to executable matcher.
//!
//! The compiler resolves everything the grammar cannot check: tag names
//! against the known-tag vocabulary, pseudo-class names against the
//! built-in predicate set, An+B arguments into coefficients, and namespace
//! prefixes into a concrete match policy. Pseudo-elements are rejected here
//! (matching them is out of scope).
//!
//! Unlike tokenize and parse errors, semantic errors accumulate: the
//! compiler keeps going until a configurable error limit is reached, so
//! several problems can be surfaced in one pass.
//!
//! Predicates are a closed set of enum variants rather than trait objects:
//! the built-in pseudo-classes are a fixed vocabulary, and a tagged enum
//! keeps them exhaustively checkable.

/// The known-tag vocabulary used to validate type selectors.
pub mod tags;

use crate::error::{CompileError, CompileErrorList, Error};
use crate::parser::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Nth, Parser,
    PseudoClassKind, PseudoClassSelector, SubclassSelector, TypeSelector, WqName, parse_nth,
};

/// How an element's (or attribute's) namespace must relate to the
/// selector's namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespacePolicy {
    /// Any namespace, including none. Produced by `*|name` and by names
    /// written without a prefix.
    Any,
    /// No namespace at all. Produced by `|name`.
    None,
    /// Exactly this namespace string. Produced by `ns|name`.
    Exact(String),
}

impl NamespacePolicy {
    /// Whether the policy accepts the given namespace string.
    pub(crate) fn allows(&self, namespace: &str) -> bool {
        match self {
            NamespacePolicy::Any => true,
            NamespacePolicy::None => namespace.is_empty(),
            NamespacePolicy::Exact(ns) => namespace == ns,
        }
    }

    fn from_wq_name(name: &WqName) -> NamespacePolicy {
        if !name.has_prefix {
            return NamespacePolicy::Any;
        }
        match name.prefix.as_str() {
            "" => NamespacePolicy::None,
            "*" => NamespacePolicy::Any,
            _ => NamespacePolicy::Exact(name.prefix.clone()),
        }
    }
}

/// A resolved tag identity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCheck {
    /// `*` - any element type.
    Universal,
    /// A known element name, canonical lower-case form.
    Tag(&'static str),
}

/// Compiled form of a type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheck {
    /// The namespace the element must be in.
    pub namespace: NamespacePolicy,
    /// The tag identity the element must have.
    pub tag: TagCheck,
}

/// Compiled form of an attribute selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePredicate {
    /// The namespace the attribute must be in.
    pub namespace: NamespacePolicy,
    /// The attribute's local name.
    pub name: String,
    /// The value operator.
    pub operator: AttrOperator,
    /// The expected value; empty for a bare presence check.
    pub value: String,
    /// Whether both sides are lower-cased before comparison (`i` modifier).
    pub case_insensitive: bool,
}

/// One executable predicate of a compound matcher.
///
/// This is the closed set of built-in behaviors; each variant is
/// parameterized where needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `#id`
    Id(String),
    /// `.class` - the class attribute, split on whitespace, contains the
    /// word.
    Class(String),
    /// `[attr...]`
    Attribute(AttributePredicate),
    /// `:empty` - no element children.
    Empty,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:only-child`
    OnlyChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-of-type`
    OnlyOfType,
    /// `:root`
    Root,
    /// `:nth-child(an+b)`
    NthChild(Nth),
    /// `:nth-last-child(an+b)`
    NthLastChild(Nth),
    /// `:nth-of-type(an+b)`
    NthOfType(Nth),
    /// `:nth-last-of-type(an+b)`
    NthLastOfType(Nth),
}

/// Compiled form of a compound selector: an optional type check plus zero
/// or more predicates, all of which must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundMatcher {
    pub(crate) type_check: Option<TypeCheck>,
    pub(crate) predicates: Vec<Predicate>,
}

/// Compiled form of a complex selector: a chain of compound matchers
/// joined by combinators, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexMatcher {
    pub(crate) first: CompoundMatcher,
    pub(crate) rest: Vec<(Combinator, CompoundMatcher)>,
}

/// A compiled selector list, ready for matching.
///
/// Compiling is pure: the same selector text always produces a structurally
/// identical `Selector`, and one `Selector` can be matched against many
/// documents (see [`Selector::select`](crate::compiler::Selector::select)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub(crate) members: Vec<ComplexMatcher>,
}

/// Collects semantic errors during compilation.
///
/// "Have we hit the limit" is an explicit query so compilation sites can
/// decide when to bail out; the sink itself never aborts anything.
struct ErrorSink {
    errors: Vec<CompileError>,
    max_errors: usize,
}

impl ErrorSink {
    fn new(max_errors: usize) -> Self {
        Self {
            errors: Vec::new(),
            max_errors,
        }
    }

    fn report(&mut self, message: impl Into<String>, pos: usize) {
        self.errors.push(CompileError {
            message: message.into(),
            pos,
        });
    }

    fn should_stop(&self) -> bool {
        self.errors.len() >= self.max_errors
    }

    fn finish(self, selector: Selector) -> Result<Selector, Error> {
        if self.errors.is_empty() {
            Ok(selector)
        } else {
            Err(Error::Compile(CompileErrorList {
                errors: self.errors,
            }))
        }
    }
}

/// Compiles parsed selectors into executable matchers.
///
/// The default configuration stops at the first semantic error; raise
/// [`Compiler::max_errors`] to collect several problems in one pass.
#[derive(Debug, Clone)]
pub struct Compiler {
    max_errors: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler that stops at the first semantic error.
    #[must_use]
    pub fn new() -> Self {
        Self { max_errors: 1 }
    }

    /// Keep compiling until up to `limit` semantic errors have accumulated.
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn max_errors(mut self, limit: usize) -> Self {
        self.max_errors = limit.max(1);
        self
    }

    /// Tokenize, parse, and compile a selector string.
    ///
    /// # Errors
    ///
    /// Returns the first tokenization or grammar error, or the accumulated
    /// semantic errors.
    pub fn compile(&self, selector: &str) -> Result<Selector, Error> {
        let list = Parser::new(selector).parse()?;
        self.compile_selector_list(&list)
    }

    /// Compile an already-parsed selector list.
    ///
    /// # Errors
    ///
    /// Returns the accumulated semantic errors, bounded by
    /// [`Compiler::max_errors`].
    pub fn compile_selector_list(&self, list: &[ComplexSelector]) -> Result<Selector, Error> {
        let mut sink = ErrorSink::new(self.max_errors);
        let mut members = Vec::with_capacity(list.len());

        'list: for complex in list {
            let first = compile_compound(&complex.first, &mut sink);
            if sink.should_stop() {
                break;
            }
            let mut rest = Vec::with_capacity(complex.rest.len());
            for (combinator, compound) in &complex.rest {
                // The grammar knows the column combinator; the matcher has
                // no column semantics.
                if *combinator == Combinator::Column {
                    sink.report("unsupported combinator '||'", compound.pos);
                    if sink.should_stop() {
                        break 'list;
                    }
                }
                let compiled = compile_compound(compound, &mut sink);
                if sink.should_stop() {
                    break 'list;
                }
                rest.push((*combinator, compiled));
            }
            members.push(ComplexMatcher { first, rest });
        }

        sink.finish(Selector { members })
    }
}

/// Compile one compound selector, reporting semantic errors to the sink.
/// The returned matcher is only meaningful if the sink stays empty.
fn compile_compound(compound: &CompoundSelector, sink: &mut ErrorSink) -> CompoundMatcher {
    let type_check = compound
        .type_selector
        .as_ref()
        .and_then(|ts| compile_type_selector(ts, sink));

    let mut predicates = Vec::new();
    for subclass in &compound.subclasses {
        if sink.should_stop() {
            break;
        }
        match subclass {
            SubclassSelector::Id { name, identifier } => {
                // The tokenizer flags hashes like `#123` as unrestricted;
                // they parse, but are not valid ID selectors.
                if *identifier {
                    predicates.push(Predicate::Id(name.clone()));
                } else {
                    sink.report(
                        format!("ID selector \"#{name}\" is not a valid identifier"),
                        compound.pos,
                    );
                }
            }
            SubclassSelector::Class(name) => predicates.push(Predicate::Class(name.clone())),
            SubclassSelector::Attribute(attr) => {
                predicates.push(Predicate::Attribute(compile_attribute(attr)));
            }
            SubclassSelector::PseudoClass(pcs) => {
                if let Some(predicate) = compile_pseudo_class(pcs, sink) {
                    predicates.push(predicate);
                }
            }
        }
    }

    for group in &compound.pseudo_elements {
        if sink.should_stop() {
            break;
        }
        sink.report(
            format!("unsupported pseudo-element \"::{}\"", group.element.name()),
            group.element.pos,
        );
    }

    CompoundMatcher {
        type_check,
        predicates,
    }
}

/// Resolve a type selector's tag name and namespace prefix.
///
/// An unknown tag name is an error rather than a silent never-match, so
/// selector typos surface at compile time.
fn compile_type_selector(ts: &TypeSelector, sink: &mut ErrorSink) -> Option<TypeCheck> {
    let namespace = NamespacePolicy::from_wq_name(&ts.name);
    if ts.name.value == "*" {
        return Some(TypeCheck {
            namespace,
            tag: TagCheck::Universal,
        });
    }
    match tags::lookup(&ts.name.value) {
        Some(tag) => Some(TypeCheck {
            namespace,
            tag: TagCheck::Tag(tag),
        }),
        None => {
            sink.report(format!("unknown tag name \"{}\"", ts.name.value), ts.pos);
            None
        }
    }
}

fn compile_attribute(attr: &AttributeSelector) -> AttributePredicate {
    AttributePredicate {
        namespace: NamespacePolicy::from_wq_name(&attr.name),
        name: attr.name.value.clone(),
        operator: attr.operator,
        value: attr.value.clone(),
        case_insensitive: attr.case_insensitive,
    }
}

/// Map a pseudo-class to its built-in predicate.
fn compile_pseudo_class(pcs: &PseudoClassSelector, sink: &mut ErrorSink) -> Option<Predicate> {
    match &pcs.kind {
        PseudoClassKind::Ident(name) => match name.to_ascii_lowercase().as_str() {
            "empty" => Some(Predicate::Empty),
            "first-child" => Some(Predicate::FirstChild),
            "last-child" => Some(Predicate::LastChild),
            "first-of-type" => Some(Predicate::FirstOfType),
            "last-of-type" => Some(Predicate::LastOfType),
            "only-child" => Some(Predicate::OnlyChild),
            "only-of-type" => Some(Predicate::OnlyOfType),
            "root" => Some(Predicate::Root),
            _ => {
                sink.report(format!("unknown pseudo-class \":{name}\""), pcs.pos);
                None
            }
        },
        PseudoClassKind::Function { name, args } => {
            let make: fn(Nth) -> Predicate = match name.to_ascii_lowercase().as_str() {
                "nth-child" => Predicate::NthChild,
                "nth-last-child" => Predicate::NthLastChild,
                "nth-of-type" => Predicate::NthOfType,
                "nth-last-of-type" => Predicate::NthLastOfType,
                _ => {
                    sink.report(
                        format!("unknown pseudo-class function \":{name}()\""),
                        pcs.pos,
                    );
                    return None;
                }
            };
            match parse_nth(args) {
                Ok(nth) => Some(make(nth)),
                Err(err) => {
                    // Report at the pseudo-class itself so the position is
                    // deterministic regardless of where inside the
                    // arguments the micro-parser gave up.
                    let detail = match err {
                        Error::Tokenize { message, .. } | Error::Parse { message, .. } => message,
                        Error::Compile(list) => list.to_string(),
                    };
                    sink.report(format!("invalid An+B expression: {detail}"), pcs.pos);
                    None
                }
            }
        }
    }
}
