//! Error types for selector compilation.
//!
//! Three stages can fail, and they fail differently:
//! - tokenization errors are fatal and stop at the first malformed byte,
//! - parse errors are fatal and stop at the first grammar violation,
//! - compile errors are semantic and accumulate up to a configurable bound
//!   before compilation aborts.
//!
//! Every error carries the byte offset in the original selector string where
//! the problem was detected, so callers can render a caret-style diagnostic.

use core::fmt;

/// A single semantic error found while compiling a parsed selector.
///
/// Examples: an unknown tag name, an unsupported pseudo-element, a malformed
/// An+B argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CompileError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Byte offset into the selector string where the problem was detected.
    pub pos: usize,
}

/// The semantic errors accumulated during one compilation.
///
/// Compilation keeps going past non-fatal errors (up to
/// [`Compiler::max_errors`](crate::compiler::Compiler::max_errors)) so that
/// several problems can be surfaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrorList {
    /// The collected errors, in source order.
    pub errors: Vec<CompileError>,
}

impl fmt::Display for CompileErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrorList {}

/// Any failure produced by [`compile`](crate::compile).
///
/// `select` itself never fails: a compiled selector is guaranteed
/// well-formed, and traversal cannot fail against a finite, acyclic tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Malformed input below the token level: an unterminated string, an
    /// invalid escape, an unterminated URL. Fatal; reported at the first
    /// occurrence.
    #[error("tokenizing selector: {message}")]
    Tokenize {
        /// Human-readable description of the problem.
        message: String,
        /// Byte offset of the offending token.
        pos: usize,
    },

    /// The token stream does not match the selector grammar. Fatal; reported
    /// at the first occurrence.
    #[error("parsing selector: {message}")]
    Parse {
        /// Human-readable description of the problem.
        message: String,
        /// Byte offset of the offending token.
        pos: usize,
    },

    /// The selector is grammatically valid but semantically unsupported or
    /// invalid.
    #[error("compiling selector: {0}")]
    Compile(CompileErrorList),
}

impl Error {
    pub(crate) fn tokenize(message: impl Into<String>, pos: usize) -> Self {
        Error::Tokenize {
            message: message.into(),
            pos,
        }
    }

    pub(crate) fn parse(message: impl Into<String>, pos: usize) -> Self {
        Error::Parse {
            message: message.into(),
            pos,
        }
    }

    /// Byte offset into the original selector string where the (first)
    /// problem was detected.
    #[must_use]
    pub fn pos(&self) -> usize {
        match self {
            Error::Tokenize { pos, .. } | Error::Parse { pos, .. } => *pos,
            Error::Compile(list) => list.errors.first().map_or(0, |e| e.pos),
        }
    }
}
