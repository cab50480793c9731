// Copyright (c) 2018 Fabian Schuiki

//! Predict set computation and rule numbering.
//!
//! Once the first and follow sets are stable, every alternative of the
//! transformed grammar is assigned a rule id, densely from 1 in production
//! declaration order. The predict set of a rule is the lookahead that
//! selects it during predictive parsing: the first set of its right-hand
//! side, widened by the follow set of its left-hand side when the
//! right-hand side can derive ε.

use log::debug;

use crate::first::FirstSets;
use crate::follow::FollowSets;
use crate::grammar::{Grammar, RuleId};
use crate::token::{Nonterminal, Token, EPSILON};
use crate::token_set::TokenSet;

/// A rule of the transformed grammar, as numbered for the parse table.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedRule {
    /// The rule id.
    pub id: RuleId,
    /// The nonterminal the rule derives.
    pub lhs: Nonterminal,
    /// The right-hand side of the rule.
    pub rhs: Vec<Token>,
    /// The lookahead terminals that select this rule.
    pub predict: TokenSet,
}

/// The predict sets of a transformed grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictSets {
    rules: Vec<PredictedRule>,
}

impl PredictSets {
    /// Compute the predict sets of a grammar, assigning rule ids in grammar
    /// order.
    pub fn compute(grammar: &Grammar, first: &FirstSets, follow: &FollowSets) -> PredictSets {
        let mut rules = Vec::new();
        for prod in grammar.productions() {
            for alt in prod.alternatives() {
                let id = RuleId::from_u32(rules.len() as u32 + 1);
                let first_alt = first.first_of(alt);
                let mut predict = TokenSet::new();
                for token in first_alt.iter() {
                    if token != EPSILON {
                        predict.insert(token);
                    }
                }
                if first_alt.contains(EPSILON) {
                    if let Some(follow_lhs) = follow.get(prod.lhs()) {
                        predict.extend(follow_lhs);
                    }
                }
                rules.push(PredictedRule {
                    id,
                    lhs: prod.lhs(),
                    rhs: alt.clone(),
                    predict,
                });
            }
        }
        debug!("assigned {} rule ids", rules.len());
        PredictSets { rules }
    }

    /// The rules in id order.
    pub fn rules(&self) -> &[PredictedRule] {
        &self.rules
    }

    /// Get the predict set of a rule.
    pub fn get(&self, id: RuleId) -> Option<&TokenSet> {
        id.as_u32()
            .checked_sub(1)
            .and_then(|index| self.rules.get(index as usize))
            .map(|rule| &rule.predict)
    }
}
