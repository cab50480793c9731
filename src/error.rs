// Copyright (c) 2018 Fabian Schuiki

//! Errors reported while declaring a grammar or building its parse table.

use std::error;
use std::fmt;

use crate::grammar::RuleId;
use crate::token::{Nonterminal, Terminal, Token};

/// An error reported by the grammar builder.
///
/// All variants are fatal to the current `build`; the builder's state after
/// a failed build is unspecified and should be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A terminal or nonterminal numeric identity was declared twice.
    DuplicateToken(Token),
    /// A rule references a token that has not been declared.
    UndeclaredToken(Token),
    /// A declaration used a numeric identity outside the range of its kind.
    InvalidToken(Token),
    /// A rule alternative is empty, or uses ε next to other tokens.
    MalformedAlternative(Nonterminal),
    /// `build` was invoked without a production for the start nonterminal.
    NoStartRule,
    /// Two rules would occupy the same parse table cell after the grammar
    /// transformations: residual ambiguity or a FIRST/FOLLOW overlap.
    AmbiguousAfterTransform {
        /// The row of the contested cell.
        nonterminal: Nonterminal,
        /// The column of the contested cell.
        terminal: Terminal,
        /// The rule already occupying the cell.
        existing: RuleId,
        /// The rule that would overwrite it.
        conflicting: RuleId,
    },
    /// The grammar is left-recursive through a cycle of productions, which
    /// the direct elimination pass cannot remove.
    IndirectLeftRecursion(Nonterminal),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::DuplicateToken(token) => write!(f, "token {} declared twice", token),
            Error::UndeclaredToken(token) => write!(f, "token {} has not been declared", token),
            Error::InvalidToken(token) => {
                write!(f, "token {} is outside the range of its kind", token)
            }
            Error::MalformedAlternative(nonterm) => write!(
                f,
                "alternative of {} is empty or uses ε next to other tokens",
                nonterm
            ),
            Error::NoStartRule => write!(f, "no production for the start nonterminal"),
            Error::AmbiguousAfterTransform {
                nonterminal,
                terminal,
                existing,
                conflicting,
            } => write!(
                f,
                "grammar is ambiguous after transformation: cell [{}, {}] selects both {} and {}",
                nonterminal, terminal, existing, conflicting
            ),
            Error::IndirectLeftRecursion(nonterm) => {
                write!(f, "{} is left-recursive through a cycle of productions", nonterm)
            }
        }
    }
}

impl error::Error for Error {}
