// Copyright (c) 2018 Fabian Schuiki

//! The predictive parse table.

use indexmap::IndexMap;
use log::debug;

use crate::error::Error;
use crate::grammar::{RuleId, NO_RULE};
use crate::predict::PredictSets;
use crate::token::{Nonterminal, Terminal, Token};

/// An LL(1) parse table.
///
/// Maps `(nonterminal, lookahead terminal)` to the rule to predict; absent
/// cells read as [`NO_RULE`], which a parse driver reports as a syntax
/// error. The right-hand side registered for each rule id is retained for
/// the driver. The table is a self-contained value: it does not borrow from
/// the builder that produced it and may be shared freely.
#[derive(Debug, Clone)]
pub struct ParseTable {
    cells: IndexMap<(Nonterminal, Terminal), RuleId>,
    rhs: Vec<Vec<Token>>,
}

impl ParseTable {
    /// Pour the predict sets into a parse table.
    ///
    /// Each rule claims one cell per terminal in its predict set. A cell
    /// claimed by two distinct rules is residual ambiguity the grammar
    /// transformations could not remove and fails the build.
    pub(crate) fn emit(predict: &PredictSets) -> Result<ParseTable, Error> {
        let mut cells = IndexMap::new();
        let mut rhs = Vec::new();
        for rule in predict.rules() {
            for token in rule.predict.iter() {
                let term = match token.as_terminal() {
                    Some(term) => term,
                    None => continue,
                };
                if let Some(&existing) = cells.get(&(rule.lhs, term)) {
                    if existing != rule.id {
                        return Err(Error::AmbiguousAfterTransform {
                            nonterminal: rule.lhs,
                            terminal: term,
                            existing,
                            conflicting: rule.id,
                        });
                    }
                } else {
                    cells.insert((rule.lhs, term), rule.id);
                }
            }
            rhs.push(rule.rhs.clone());
        }
        debug!("emitted {} table cells over {} rules", cells.len(), rhs.len());
        Ok(ParseTable { cells, rhs })
    }

    /// Look up the rule predicted for a nonterminal and lookahead terminal.
    pub fn get(&self, nonterminal: Nonterminal, terminal: Terminal) -> RuleId {
        self.cells
            .get(&(nonterminal, terminal))
            .copied()
            .unwrap_or(NO_RULE)
    }

    /// The right-hand side bound to a rule id.
    ///
    /// Panics if called for [`NO_RULE`] or an id that was never assigned.
    pub fn rhs(&self, rule: RuleId) -> &[Token] {
        if rule == NO_RULE {
            panic!("rhs() called for NO_RULE");
        }
        &self.rhs[rule.as_u32() as usize - 1]
    }

    /// The number of rules behind the table.
    pub fn num_rules(&self) -> usize {
        self.rhs.len()
    }

    /// Iterate over the populated cells, in emission order.
    pub fn cells(&self) -> impl Iterator<Item = (Nonterminal, Terminal, RuleId)> + '_ {
        self.cells.iter().map(|(&(n, t), &r)| (n, t, r))
    }
}
