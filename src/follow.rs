// Copyright (c) 2018 Fabian Schuiki

//! Follow set computation.
//!
//! The follow set of a nonterminal collects the terminals that can appear
//! immediately after it in some sentential form, plus the end-of-input
//! terminal if the nonterminal can end one. Computation runs against the
//! already-stable first sets and iterates to a fixed point.

use indexmap::IndexMap;
use log::debug;

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::token::{Nonterminal, Terminal, EPSILON};
use crate::token_set::TokenSet;

/// All follow sets of a grammar.
///
/// Keyed by nonterminal; terminals have no follow set.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowSets {
    sets: IndexMap<Nonterminal, TokenSet>,
}

impl FollowSets {
    /// Compute the follow sets of a grammar.
    pub fn compute(
        grammar: &Grammar,
        first: &FirstSets,
        start: Nonterminal,
        end: Terminal,
    ) -> FollowSets {
        let mut sets: IndexMap<Nonterminal, TokenSet> = IndexMap::new();
        for token in grammar.nonterminals().iter() {
            if let Some(nonterm) = token.as_nonterminal() {
                sets.insert(nonterm, TokenSet::new());
            }
        }
        if let Some(set) = sets.get_mut(&start) {
            set.insert(end.token());
        }

        let mut passes = 0;
        loop {
            passes += 1;
            let before = sets.clone();
            for prod in grammar.productions() {
                let lhs = prod.lhs();
                for alt in prod.alternatives() {
                    for (index, sym) in alt.iter().enumerate() {
                        let inner = match sym.as_nonterminal() {
                            Some(nonterm) => nonterm,
                            None => continue,
                        };
                        let beta = &alt[index + 1..];
                        let first_beta = first.first_of(beta);
                        let mut add = TokenSet::new();
                        for token in first_beta.iter() {
                            if token != EPSILON {
                                add.insert(token);
                            }
                        }
                        if beta.is_empty() || first_beta.contains(EPSILON) {
                            if let Some(follow_lhs) = sets.get(&lhs) {
                                add.extend(follow_lhs);
                            }
                        }
                        if let Some(set) = sets.get_mut(&inner) {
                            set.extend(&add);
                        }
                    }
                }
            }
            if sets == before {
                break;
            }
        }
        debug!("follow sets stable after {} passes", passes);
        FollowSets { sets }
    }

    /// Get the follow set of a nonterminal.
    pub fn get(&self, nonterm: Nonterminal) -> Option<&TokenSet> {
        self.sets.get(&nonterm)
    }
}
