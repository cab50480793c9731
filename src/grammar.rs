// Copyright (c) 2018 Fabian Schuiki

//! Data structures representing a grammar.

use std::fmt;

use indexmap::IndexMap;
use log::trace;

use crate::token::{Nonterminal, Terminal, Token};
use crate::token_set::TokenSet;
use crate::Pretty;

/// A grammar.
///
/// Stores the declared terminals and nonterminals with their display names,
/// the productions in declaration order, and the transformation map that
/// records which synthetic nonterminals were minted during rewriting. The
/// transformation passes mutate the productions in place; the declaration
/// order of productions is the canonical order for rule id assignment.
#[derive(Debug, Clone)]
pub struct Grammar {
    terminals: TokenSet,
    nonterminals: TokenSet,
    term_names: IndexMap<Terminal, String>,
    nonterm_names: IndexMap<Nonterminal, String>,
    productions: IndexMap<Nonterminal, Production>,
    transformations: IndexMap<Nonterminal, Nonterminal>,
}

impl Grammar {
    /// Create a new empty grammar.
    pub fn new() -> Grammar {
        Grammar {
            terminals: TokenSet::new(),
            nonterminals: TokenSet::new(),
            term_names: IndexMap::new(),
            nonterm_names: IndexMap::new(),
            productions: IndexMap::new(),
            transformations: IndexMap::new(),
        }
    }

    /// Register a terminal. The builder validates the declaration.
    pub(crate) fn declare_terminal<S: Into<String>>(&mut self, name: S, term: Terminal) {
        self.terminals.insert(term.token());
        self.term_names.insert(term, name.into());
    }

    /// Register a nonterminal. The builder validates the declaration.
    pub(crate) fn declare_nonterminal<S: Into<String>>(&mut self, name: S, nonterm: Nonterminal) {
        self.nonterminals.insert(nonterm.token());
        self.nonterm_names.insert(nonterm, name.into());
    }

    /// The declared terminals, in declaration order.
    pub fn terminals(&self) -> &TokenSet {
        &self.terminals
    }

    /// The declared nonterminals, in declaration order.
    ///
    /// Includes the synthetic nonterminals minted during rewriting.
    pub fn nonterminals(&self) -> &TokenSet {
        &self.nonterminals
    }

    /// Get the display name of a terminal.
    pub fn terminal_name(&self, term: Terminal) -> Option<&str> {
        self.term_names.get(&term).map(|s| s.as_str())
    }

    /// Get the display name of a nonterminal.
    pub fn nonterminal_name(&self, nonterm: Nonterminal) -> Option<&str> {
        self.nonterm_names.get(&nonterm).map(|s| s.as_str())
    }

    /// Get the display name of any token. ε prints as "ε".
    pub fn token_name(&self, token: Token) -> Option<&str> {
        if token.is_epsilon() {
            return Some("ε");
        }
        if let Some(term) = token.as_terminal() {
            return self.terminal_name(term);
        }
        token.as_nonterminal().and_then(|n| self.nonterminal_name(n))
    }

    /// Append an alternative to the production for `lhs`, creating the
    /// production if absent.
    pub(crate) fn add_alternative(&mut self, lhs: Nonterminal, alt: Vec<Token>) {
        self.productions
            .entry(lhs)
            .or_insert_with(|| Production {
                lhs,
                alts: Vec::new(),
            })
            .alts
            .push(alt);
    }

    /// Replace the alternatives of an existing production.
    pub(crate) fn replace_alternatives(&mut self, lhs: Nonterminal, alts: Vec<Vec<Token>>) {
        if let Some(prod) = self.productions.get_mut(&lhs) {
            prod.alts = alts;
        }
    }

    /// The production for a nonterminal.
    pub fn production(&self, lhs: Nonterminal) -> Option<&Production> {
        self.productions.get(&lhs)
    }

    /// Mutable access to the production for a nonterminal.
    pub(crate) fn production_mut(&mut self, lhs: Nonterminal) -> Option<&mut Production> {
        self.productions.get_mut(&lhs)
    }

    /// The productions in declaration order.
    pub fn productions(&self) -> impl Iterator<Item = &Production> {
        self.productions.values()
    }

    /// The number of productions.
    pub fn num_productions(&self) -> usize {
        self.productions.len()
    }

    /// Mint a fresh nonterminal for a rewrite of `origin`.
    ///
    /// The fresh identity is one past the largest declared nonterminal; the
    /// display name is the origin's name with a "Prime" suffix. The minting
    /// is recorded in the transformation map.
    pub(crate) fn mint_nonterminal(&mut self, origin: Nonterminal) -> Nonterminal {
        let max = self
            .nonterminals
            .iter()
            .map(|t| t.as_i32())
            .max()
            .unwrap_or(0);
        let fresh = Nonterminal::from_i32(max + 1);
        let name = match self.nonterminal_name(origin) {
            Some(name) => format!("{}Prime", name),
            None => format!("{}Prime", origin),
        };
        trace!("minted {} ({}) for {}", fresh, name, origin);
        self.nonterminals.insert(fresh.token());
        self.nonterm_names.insert(fresh, name);
        self.transformations.insert(fresh, origin);
        fresh
    }

    /// Iterate over the transformation map: each synthetic nonterminal paired
    /// with the nonterminal it was minted for, in minting order.
    pub fn transformations(&self) -> impl Iterator<Item = (Nonterminal, Nonterminal)> + '_ {
        self.transformations
            .iter()
            .map(|(&fresh, &origin)| (fresh, origin))
    }

    /// The nonterminal a synthetic nonterminal was minted for, if any.
    pub fn transformation_origin(&self, nonterm: Nonterminal) -> Option<Nonterminal> {
        self.transformations.get(&nonterm).copied()
    }

    /// Snapshot the productions for change detection.
    pub(crate) fn clone_productions(&self) -> Vec<Production> {
        self.productions.values().cloned().collect()
    }

    /// Compare the productions against an earlier snapshot.
    pub(crate) fn productions_changed(&self, snapshot: &[Production]) -> bool {
        !self.productions.values().eq(snapshot.iter())
    }
}

/// A production: the ordered alternatives for a single nonterminal.
///
/// There is at most one production per distinct left-hand side; an
/// alternative is a non-empty token sequence, and the sole way to express ε
/// is the single-element sequence `[ε]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    lhs: Nonterminal,
    alts: Vec<Vec<Token>>,
}

impl Production {
    /// The nonterminal this production derives.
    pub fn lhs(&self) -> Nonterminal {
        self.lhs
    }

    /// The alternatives, in declaration order.
    pub fn alternatives(&self) -> &[Vec<Token>] {
        &self.alts
    }

    /// Mutable access to the alternatives, for the rewrite passes.
    pub(crate) fn alternatives_mut(&mut self) -> &mut Vec<Vec<Token>> {
        &mut self.alts
    }

    /// Get a pretty printer for this production.
    pub fn pretty<'a>(&'a self, grammar: &'a Grammar) -> Pretty<&'a Grammar, &'a Self> {
        Pretty::new(grammar, self)
    }
}

impl<'a> fmt::Display for Pretty<&'a Grammar, &'a Production> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ->", self.item.lhs.pretty(self.ctx))?;
        for (index, alt) in self.item.alts.iter().enumerate() {
            if index > 0 {
                write!(f, " |")?;
            }
            for &token in alt {
                write!(f, " {}", token.pretty(self.ctx))?;
            }
        }
        Ok(())
    }
}

/// A unique rule identifier.
///
/// Rule ids are assigned densely from 1 in grammar order when the predict
/// sets are computed; they index the right-hand-side store of the parse
/// table. The value 0 is reserved as [`NO_RULE`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleId(u32);

/// The reserved rule id meaning "no rule": an empty parse table cell, which
/// a parse driver reports as a syntax error.
pub const NO_RULE: RuleId = RuleId(0);

impl RuleId {
    /// Create a rule id from a u32.
    pub fn from_u32(id: u32) -> RuleId {
        RuleId(id)
    }

    /// Obtain the id as a u32.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}
