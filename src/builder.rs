// Copyright (c) 2018 Fabian Schuiki

//! The grammar builder and build pipeline.

use log::debug;

use crate::error::Error;
use crate::factor::left_factor;
use crate::first::FirstSets;
use crate::follow::FollowSets;
use crate::grammar::{Grammar, RuleId};
use crate::predict::PredictSets;
use crate::recursion::{eliminate_left_recursion, residual_left_recursion};
use crate::table::ParseTable;
use crate::token::{Nonterminal, Terminal, Token, END};
use crate::token_set::TokenSet;

/// A builder for LL(1) parse tables.
///
/// Terminals, nonterminals and rules are declared incrementally; [`build`]
/// runs the transformation pipeline and emits the parse table.
///
/// `build` rewrites the stored grammar **in place**: direct left recursion
/// is eliminated and colliding alternatives are left-factored, minting
/// fresh nonterminals as needed. Callers that want to keep the grammar as
/// declared should clone the builder first. Re-running `build` operates on
/// the already-rewritten grammar, finds nothing left to rewrite, and emits
/// the same table.
///
/// [`build`]: GrammarBuilder::build
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    grammar: Grammar,
    start: Option<Nonterminal>,
    end: Terminal,
    first: Option<FirstSets>,
    follow: Option<FollowSets>,
    predict: Option<PredictSets>,
}

impl GrammarBuilder {
    /// Create a new empty builder.
    pub fn new() -> GrammarBuilder {
        GrammarBuilder {
            grammar: Grammar::new(),
            start: None,
            end: END,
            first: None,
            follow: None,
            predict: None,
        }
    }

    /// Pick the end-of-input terminal. Defaults to [`END`].
    pub fn set_eof_token(&mut self, terminal: Terminal) {
        self.end = terminal;
    }

    /// Pick the start nonterminal. Defaults to the first nonterminal added.
    pub fn set_start_rule(&mut self, nonterminal: Nonterminal) {
        self.start = Some(nonterminal);
    }

    /// Declare a terminal with a display name and a numeric identity.
    ///
    /// The identity must be strictly negative and not yet declared.
    pub fn add_terminal<S: Into<String>>(&mut self, name: S, id: i32) -> Result<Terminal, Error> {
        let token = Token::from_i32(id);
        let term = token.as_terminal().ok_or(Error::InvalidToken(token))?;
        if self.grammar.terminals().contains(token) {
            return Err(Error::DuplicateToken(token));
        }
        self.grammar.declare_terminal(name, term);
        Ok(term)
    }

    /// Declare a nonterminal with a display name and a numeric identity.
    ///
    /// The identity must be strictly positive and not yet declared. The
    /// first nonterminal added becomes the default start rule.
    pub fn add_nonterminal<S: Into<String>>(
        &mut self,
        name: S,
        id: i32,
    ) -> Result<Nonterminal, Error> {
        let token = Token::from_i32(id);
        let nonterm = token.as_nonterminal().ok_or(Error::InvalidToken(token))?;
        if self.grammar.nonterminals().contains(token) {
            return Err(Error::DuplicateToken(token));
        }
        self.grammar.declare_nonterminal(name, nonterm);
        if self.start.is_none() {
            self.start = Some(nonterm);
        }
        Ok(nonterm)
    }

    /// Append an alternative to the production for `lhs`, creating the
    /// production if absent.
    ///
    /// Every token of the alternative must be declared; ε is accepted as
    /// the only token of an alternative.
    pub fn add_rule(&mut self, lhs: Nonterminal, rhs: Vec<Token>) -> Result<(), Error> {
        if !self.grammar.nonterminals().contains(lhs.token()) {
            return Err(Error::UndeclaredToken(lhs.token()));
        }
        if rhs.is_empty() || (rhs.len() > 1 && rhs.iter().any(|t| t.is_epsilon())) {
            return Err(Error::MalformedAlternative(lhs));
        }
        for &token in &rhs {
            if token.is_epsilon() {
                continue;
            }
            let declared = if token.is_terminal() {
                self.grammar.terminals().contains(token)
            } else {
                self.grammar.nonterminals().contains(token)
            };
            if !declared {
                return Err(Error::UndeclaredToken(token));
            }
        }
        self.grammar.add_alternative(lhs, rhs);
        Ok(())
    }

    /// Run the transformation pipeline and emit the parse table.
    pub fn build(&mut self) -> Result<ParseTable, Error> {
        let start = self.start.ok_or(Error::NoStartRule)?;
        if self.grammar.production(start).is_none() {
            return Err(Error::NoStartRule);
        }
        debug!("building parse table, start rule {}", start);

        eliminate_left_recursion(&mut self.grammar);
        left_factor(&mut self.grammar);

        let first = FirstSets::compute(&self.grammar);
        if let Some(nonterm) = residual_left_recursion(&self.grammar, &first) {
            return Err(Error::IndirectLeftRecursion(nonterm));
        }
        let follow = FollowSets::compute(&self.grammar, &first, start, self.end);
        let predict = PredictSets::compute(&self.grammar, &first, &follow);
        let table = ParseTable::emit(&predict)?;

        self.first = Some(first);
        self.follow = Some(follow);
        self.predict = Some(predict);
        Ok(table)
    }

    /// The grammar as currently stored.
    ///
    /// After `build` this is the rewritten grammar; its productions, display
    /// names and transformation map can be inspected by downstream tools.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// The end-of-input terminal.
    pub fn eof_token(&self) -> Terminal {
        self.end
    }

    /// The start nonterminal, if one is known.
    pub fn start_rule(&self) -> Option<Nonterminal> {
        self.start
    }

    /// The first set of a token, once `build` has run.
    pub fn first(&self, token: Token) -> Option<&TokenSet> {
        self.first.as_ref().and_then(|sets| sets.get(token))
    }

    /// The follow set of a nonterminal, once `build` has run.
    pub fn follow(&self, nonterminal: Nonterminal) -> Option<&TokenSet> {
        self.follow.as_ref().and_then(|sets| sets.get(nonterminal))
    }

    /// The predict set of a rule, once `build` has run.
    pub fn predict(&self, rule: RuleId) -> Option<&TokenSet> {
        self.predict.as_ref().and_then(|sets| sets.get(rule))
    }
}

impl Default for GrammarBuilder {
    fn default() -> GrammarBuilder {
        GrammarBuilder::new()
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::token::EPSILON;
    use pretty_assertions::assert_eq;

    #[test]
    fn declarations_are_validated() {
        let mut b = GrammarBuilder::new();
        assert_eq!(
            b.add_terminal("bad", 1),
            Err(Error::InvalidToken(Token::from_i32(1)))
        );
        assert_eq!(
            b.add_terminal("eps", 0),
            Err(Error::InvalidToken(Token::from_i32(0)))
        );
        assert_eq!(
            b.add_nonterminal("bad", -1),
            Err(Error::InvalidToken(Token::from_i32(-1)))
        );

        b.add_terminal("x", -2).unwrap();
        assert_eq!(
            b.add_terminal("again", -2),
            Err(Error::DuplicateToken(Token::from_i32(-2)))
        );
        b.add_nonterminal("A", 1).unwrap();
        assert_eq!(
            b.add_nonterminal("again", 1),
            Err(Error::DuplicateToken(Token::from_i32(1)))
        );
    }

    #[test]
    fn rules_are_validated() {
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let tx = b.add_terminal("x", -2).unwrap();

        assert_eq!(
            b.add_rule(Nonterminal::from_i32(9), vec![tx.into()]),
            Err(Error::UndeclaredToken(Token::from_i32(9)))
        );
        assert_eq!(
            b.add_rule(ntA, vec![Token::from_i32(-9)]),
            Err(Error::UndeclaredToken(Token::from_i32(-9)))
        );
        assert_eq!(
            b.add_rule(ntA, vec![Token::from_i32(9)]),
            Err(Error::UndeclaredToken(Token::from_i32(9)))
        );
        assert_eq!(b.add_rule(ntA, vec![]), Err(Error::MalformedAlternative(ntA)));
        assert_eq!(
            b.add_rule(ntA, vec![tx.into(), EPSILON]),
            Err(Error::MalformedAlternative(ntA))
        );
        assert_eq!(b.add_rule(ntA, vec![EPSILON]), Ok(()));
        assert_eq!(b.add_rule(ntA, vec![tx.into()]), Ok(()));
    }

    #[test]
    fn build_requires_a_start_rule() {
        let mut b = GrammarBuilder::new();
        assert_eq!(b.build().err(), Some(Error::NoStartRule));

        let _ntA = b.add_nonterminal("A", 1).unwrap();
        let ntB = b.add_nonterminal("B", 2).unwrap();
        let tx = b.add_terminal("x", -2).unwrap();
        b.add_rule(ntB, vec![tx.into()]).unwrap();
        // A is the default start but has no production.
        assert_eq!(b.build().err(), Some(Error::NoStartRule));

        b.set_start_rule(ntB);
        assert!(b.build().is_ok());
    }

    #[test]
    fn rebuild_is_idempotent_in_result() {
        let mut b = GrammarBuilder::new();
        let ntE = b.add_nonterminal("E", 1).unwrap();
        let ntP = b.add_nonterminal("P", 2).unwrap();
        let tplus = b.add_terminal("plus", -2).unwrap();
        let tone = b.add_terminal("one", -3).unwrap();
        b.add_rule(ntE, vec![ntE.into(), tplus.into(), ntE.into()]).unwrap();
        b.add_rule(ntE, vec![ntP.into()]).unwrap();
        b.add_rule(ntP, vec![tone.into()]).unwrap();

        let table1 = b.build().unwrap();
        let snapshot: Vec<_> = b.grammar().productions().cloned().collect();
        let table2 = b.build().unwrap();
        let again: Vec<_> = b.grammar().productions().cloned().collect();

        assert_eq!(snapshot, again);
        let cells1: Vec<_> = table1.cells().collect();
        let cells2: Vec<_> = table2.cells().collect();
        assert_eq!(cells1, cells2);
    }

    #[test]
    fn introspection_is_stable() {
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let tx = b.add_terminal("x", -2).unwrap();
        b.add_rule(ntA, vec![tx.into()]).unwrap();

        assert!(b.first(ntA.token()).is_none());
        b.build().unwrap();
        let first1: Vec<_> = b.first(ntA.token()).unwrap().iter().collect();
        let first2: Vec<_> = b.first(ntA.token()).unwrap().iter().collect();
        assert_eq!(first1, first2);
        let follow1: Vec<_> = b.follow(ntA).unwrap().iter().collect();
        assert_eq!(follow1, vec![END.token()]);
        let predict1: Vec<_> = b.predict(RuleId::from_u32(1)).unwrap().iter().collect();
        assert_eq!(predict1, vec![tx.token()]);
    }
}
