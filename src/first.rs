// Copyright (c) 2018 Fabian Schuiki

//! First set computation.
//!
//! This module implements computation of the first sets for a grammar. The
//! first set of a symbol collects the terminals that can appear leftmost in
//! one of its derivations, plus ε if the symbol can derive the empty
//! string. The sets are seeded with the trivial terminal singletons and
//! grown to a fixed point over the productions.

use indexmap::IndexMap;
use log::debug;

use crate::grammar::Grammar;
use crate::token::{Token, EPSILON};
use crate::token_set::TokenSet;

/// All first sets of a grammar.
///
/// Keyed by token: every terminal maps to its singleton set, ε maps to
/// `{ε}`, and every nonterminal maps to its computed set.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstSets {
    sets: IndexMap<Token, TokenSet>,
}

impl FirstSets {
    /// Compute the first sets of a grammar.
    pub fn compute(grammar: &Grammar) -> FirstSets {
        let mut sets = IndexMap::new();
        for term in grammar.terminals().iter() {
            let mut set = TokenSet::new();
            set.insert(term);
            sets.insert(term, set);
        }
        let mut eps = TokenSet::new();
        eps.insert(EPSILON);
        sets.insert(EPSILON, eps);
        for nonterm in grammar.nonterminals().iter() {
            sets.insert(nonterm, TokenSet::new());
        }
        let mut fs = FirstSets { sets };

        let mut passes = 0;
        loop {
            passes += 1;
            let before = fs.sets.clone();
            for prod in grammar.productions() {
                let lhs = prod.lhs().token();
                for alt in prod.alternatives() {
                    let add = fs.first_of(alt);
                    if let Some(set) = fs.sets.get_mut(&lhs) {
                        set.extend(&add);
                    }
                }
            }
            if fs.sets == before {
                break;
            }
        }
        debug!("first sets stable after {} passes", passes);
        fs
    }

    /// Get the first set of a token.
    pub fn get(&self, token: Token) -> Option<&TokenSet> {
        self.sets.get(&token)
    }

    /// Compute the first set of a symbol sequence against these sets.
    ///
    /// Walks the sequence from the left, accumulating the first set of each
    /// symbol while the prefix stays nullable. The first set of the empty
    /// sequence is `{ε}`.
    pub fn first_of(&self, sequence: &[Token]) -> TokenSet {
        let mut result = TokenSet::new();
        for &sym in sequence {
            let nullable = match self.sets.get(&sym) {
                Some(set) => {
                    for token in set.iter() {
                        if token != EPSILON {
                            result.insert(token);
                        }
                    }
                    set.contains(EPSILON)
                }
                None => false,
            };
            if !nullable {
                return result;
            }
        }
        result.insert(EPSILON);
        result
    }
}
