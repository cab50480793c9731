// Copyright (c) 2018 Fabian Schuiki

//! Elimination of direct left recursion.
//!
//! A production `A -> A α | β` cannot be parsed top-down: the parser would
//! expand `A` forever without consuming input. The pass rewrites every such
//! production into `A -> β A'` and `A' -> α A' | ε` with a fresh
//! nonterminal `A'`, which derives the same language with the recursion
//! moved to the right. The scan restarts after every rewrite and stops once
//! a full pass leaves the productions untouched.

use indexmap::IndexMap;
use log::{debug, trace};

use crate::first::FirstSets;
use crate::grammar::Grammar;
use crate::token::{Nonterminal, Token, EPSILON};

/// Rewrite every directly left-recursive production of a grammar.
pub fn eliminate_left_recursion(grammar: &mut Grammar) {
    loop {
        let before = grammar.clone_productions();
        if let Some(lhs) = find_left_recursive(grammar) {
            rewrite(grammar, lhs);
        }
        if !grammar.productions_changed(&before) {
            break;
        }
    }
}

/// Find the first production with an alternative that starts with its own
/// left-hand side.
fn find_left_recursive(grammar: &Grammar) -> Option<Nonterminal> {
    for prod in grammar.productions() {
        let head = prod.lhs().token();
        if prod
            .alternatives()
            .iter()
            .any(|alt| alt.first() == Some(&head))
        {
            return Some(prod.lhs());
        }
    }
    None
}

/// Rewrite a single directly left-recursive production.
fn rewrite(grammar: &mut Grammar, lhs: Nonterminal) {
    let head = lhs.token();
    let alts = match grammar.production(lhs) {
        Some(prod) => prod.alternatives().to_vec(),
        None => return,
    };

    let mut alphas: Vec<Vec<Token>> = Vec::new();
    let mut betas: Vec<Vec<Token>> = Vec::new();
    for alt in alts {
        if alt.first() == Some(&head) {
            let tail = alt[1..].to_vec();
            if tail.is_empty() {
                // `A -> A` derives nothing; drop the unit cycle.
                trace!("dropping unit cycle {} -> {}", lhs, lhs);
                continue;
            }
            alphas.push(tail);
        } else {
            betas.push(alt);
        }
    }

    let fresh = grammar.mint_nonterminal(lhs);
    debug!("eliminating left recursion in {} via {}", lhs, fresh);

    // α-expansion: a tail that still mentions the head is replaced by its
    // substitutions over every β. Tails without the head are kept verbatim.
    if !betas.is_empty() && alphas.iter().any(|alpha| alpha.contains(&head)) {
        let mut expanded = Vec::new();
        for alpha in &alphas {
            if alpha.contains(&head) {
                for beta in &betas {
                    expanded.push(substitute(alpha, head, beta));
                }
            } else {
                expanded.push(alpha.clone());
            }
        }
        alphas = expanded;
    }

    // A -> β A'. A production whose alternatives were all left-recursive has
    // no βs and collapses to the bare `A -> A'`.
    let rewritten: Vec<Vec<Token>> = if betas.is_empty() {
        vec![vec![fresh.token()]]
    } else {
        betas
            .iter()
            .map(|beta| append(beta.clone(), fresh.token()))
            .collect()
    };
    grammar.replace_alternatives(lhs, rewritten);

    // A' -> α A' | ε
    for alpha in alphas {
        let alt = append(alpha, fresh.token());
        grammar.add_alternative(fresh, alt);
    }
    grammar.add_alternative(fresh, vec![EPSILON]);
}

/// Replace every occurrence of `target` in `sequence` with the tokens of
/// `replacement`, keeping the result in canonical form: ε never appears
/// next to other tokens, and an empty result becomes `[ε]`.
fn substitute(sequence: &[Token], target: Token, replacement: &[Token]) -> Vec<Token> {
    let mut result = Vec::new();
    for &sym in sequence {
        if sym == target {
            result.extend(replacement.iter().copied().filter(|t| !t.is_epsilon()));
        } else if !sym.is_epsilon() {
            result.push(sym);
        }
    }
    if result.is_empty() {
        result.push(EPSILON);
    }
    result
}

/// Append a token to a sequence, dropping a lone ε first.
fn append(mut sequence: Vec<Token>, token: Token) -> Vec<Token> {
    sequence.retain(|t| !t.is_epsilon());
    sequence.push(token);
    sequence
}

/// Check for left recursion that survived the direct elimination pass.
///
/// Builds the left-corner relation (`A -> B` whenever `B` heads an
/// alternative of `A` behind a nullable prefix) and searches it for a
/// cycle. Any cycle means the grammar reaches a nonterminal from itself
/// without consuming input, which the direct pass cannot fix.
pub(crate) fn residual_left_recursion(
    grammar: &Grammar,
    first: &FirstSets,
) -> Option<Nonterminal> {
    let mut edges: IndexMap<Nonterminal, Vec<Nonterminal>> = IndexMap::new();
    for prod in grammar.productions() {
        let mut targets = Vec::new();
        for alt in prod.alternatives() {
            for &sym in alt {
                if let Some(nonterm) = sym.as_nonterminal() {
                    if !targets.contains(&nonterm) {
                        targets.push(nonterm);
                    }
                }
                let nullable = first
                    .get(sym)
                    .map(|set| set.contains(EPSILON))
                    .unwrap_or(false);
                if !nullable {
                    break;
                }
            }
        }
        edges.insert(prod.lhs(), targets);
    }

    let mut state: IndexMap<Nonterminal, u8> = IndexMap::new();
    for &node in edges.keys() {
        if state.get(&node).copied().unwrap_or(0) == 0 {
            if let Some(found) = visit(node, &edges, &mut state) {
                return Some(found);
            }
        }
    }
    None
}

fn visit(
    node: Nonterminal,
    edges: &IndexMap<Nonterminal, Vec<Nonterminal>>,
    state: &mut IndexMap<Nonterminal, u8>,
) -> Option<Nonterminal> {
    state.insert(node, 1);
    if let Some(targets) = edges.get(&node) {
        for &target in targets {
            match state.get(&target).copied().unwrap_or(0) {
                1 => return Some(target),
                0 => {
                    if let Some(found) = visit(target, edges, state) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
    }
    state.insert(node, 2);
    None
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::builder::GrammarBuilder;
    use pretty_assertions::assert_eq;

    fn alts(grammar: &Grammar, lhs: Nonterminal) -> Vec<Vec<Token>> {
        grammar
            .production(lhs)
            .expect("production exists")
            .alternatives()
            .to_vec()
    }

    #[test]
    fn rewrites_simple_recursion() {
        // E : E + E | P      becomes      E : P F
        // P : 1                           P : 1
        //                                 F : + P F | ε
        let mut b = GrammarBuilder::new();
        let ntE = b.add_nonterminal("E", 1).unwrap();
        let ntP = b.add_nonterminal("P", 2).unwrap();
        let tplus = b.add_terminal("plus", -2).unwrap();
        let tone = b.add_terminal("one", -3).unwrap();
        b.add_rule(ntE, vec![ntE.into(), tplus.into(), ntE.into()]).unwrap();
        b.add_rule(ntE, vec![ntP.into()]).unwrap();
        b.add_rule(ntP, vec![tone.into()]).unwrap();

        let mut g = b.grammar().clone();
        eliminate_left_recursion(&mut g);

        let ntF = Nonterminal::from_i32(3);
        assert_eq!(g.transformation_origin(ntF), Some(ntE));
        assert_eq!(g.nonterminal_name(ntF), Some("EPrime"));
        assert_eq!(alts(&g, ntE), vec![vec![ntP.into(), ntF.token()]]);
        assert_eq!(alts(&g, ntP), vec![vec![tone.into()]]);
        assert_eq!(
            alts(&g, ntF),
            vec![
                vec![tplus.into(), ntP.into(), ntF.token()],
                vec![EPSILON],
            ]
        );
    }

    #[test]
    fn expansion_keeps_recursion_free_tails() {
        // A : A x | A y A | b. The [y A] tail mentions A and expands over
        // the β set, while the [x] tail survives untouched.
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let tx = b.add_terminal("x", -2).unwrap();
        let ty = b.add_terminal("y", -3).unwrap();
        let tb = b.add_terminal("b", -4).unwrap();
        b.add_rule(ntA, vec![ntA.into(), tx.into()]).unwrap();
        b.add_rule(ntA, vec![ntA.into(), ty.into(), ntA.into()]).unwrap();
        b.add_rule(ntA, vec![tb.into()]).unwrap();

        let mut g = b.grammar().clone();
        eliminate_left_recursion(&mut g);

        let ntA_ = Nonterminal::from_i32(2);
        assert_eq!(alts(&g, ntA), vec![vec![tb.into(), ntA_.token()]]);
        assert_eq!(
            alts(&g, ntA_),
            vec![
                vec![tx.into(), ntA_.token()],
                vec![ty.into(), tb.into(), ntA_.token()],
                vec![EPSILON],
            ]
        );
    }

    #[test]
    fn all_recursive_alternatives_collapse() {
        // A : A x, with no β alternatives at all.
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let tx = b.add_terminal("x", -2).unwrap();
        b.add_rule(ntA, vec![ntA.into(), tx.into()]).unwrap();

        let mut g = b.grammar().clone();
        eliminate_left_recursion(&mut g);

        let ntA_ = Nonterminal::from_i32(2);
        assert_eq!(alts(&g, ntA), vec![vec![ntA_.token()]]);
        assert_eq!(
            alts(&g, ntA_),
            vec![vec![tx.into(), ntA_.token()], vec![EPSILON]]
        );
    }

    #[test]
    fn unit_cycle_is_dropped() {
        // A : A | b
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let tb = b.add_terminal("b", -2).unwrap();
        b.add_rule(ntA, vec![ntA.into()]).unwrap();
        b.add_rule(ntA, vec![tb.into()]).unwrap();

        let mut g = b.grammar().clone();
        eliminate_left_recursion(&mut g);

        let ntA_ = Nonterminal::from_i32(2);
        assert_eq!(alts(&g, ntA), vec![vec![tb.into(), ntA_.token()]]);
        assert_eq!(alts(&g, ntA_), vec![vec![EPSILON]]);
    }

    #[test]
    fn epsilon_base_case_is_normalized() {
        // A : A x | ε. The ε β must not leave an interior ε behind.
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let tx = b.add_terminal("x", -2).unwrap();
        b.add_rule(ntA, vec![ntA.into(), tx.into()]).unwrap();
        b.add_rule(ntA, vec![EPSILON]).unwrap();

        let mut g = b.grammar().clone();
        eliminate_left_recursion(&mut g);

        let ntA_ = Nonterminal::from_i32(2);
        assert_eq!(alts(&g, ntA), vec![vec![ntA_.token()]]);
        assert_eq!(
            alts(&g, ntA_),
            vec![vec![tx.into(), ntA_.token()], vec![EPSILON]]
        );
    }

    #[test]
    fn non_recursive_grammar_is_untouched() {
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let ntB = b.add_nonterminal("B", 2).unwrap();
        let tb = b.add_terminal("b", -2).unwrap();
        b.add_rule(ntA, vec![ntB.into()]).unwrap();
        b.add_rule(ntB, vec![tb.into()]).unwrap();

        let mut g = b.grammar().clone();
        let snapshot = g.clone_productions();
        eliminate_left_recursion(&mut g);
        assert!(!g.productions_changed(&snapshot));
        assert_eq!(g.transformations().count(), 0);
    }

    #[test]
    fn detects_indirect_recursion() {
        // A : B a
        // B : A b. No alternative starts with its own LHS, but the cycle
        // is still there.
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let ntB = b.add_nonterminal("B", 2).unwrap();
        let ta = b.add_terminal("a", -2).unwrap();
        let tb = b.add_terminal("b", -3).unwrap();
        b.add_rule(ntA, vec![ntB.into(), ta.into()]).unwrap();
        b.add_rule(ntB, vec![ntA.into(), tb.into()]).unwrap();

        let mut g = b.grammar().clone();
        eliminate_left_recursion(&mut g);
        let first = crate::first::FirstSets::compute(&g);
        assert!(residual_left_recursion(&g, &first).is_some());
    }

    #[test]
    fn nullable_prefix_counts_as_left_corner() {
        // A : B A c
        // B : ε. A reaches itself behind the nullable B.
        let mut b = GrammarBuilder::new();
        let ntA = b.add_nonterminal("A", 1).unwrap();
        let ntB = b.add_nonterminal("B", 2).unwrap();
        let tc = b.add_terminal("c", -2).unwrap();
        b.add_rule(ntA, vec![ntB.into(), ntA.into(), tc.into()]).unwrap();
        b.add_rule(ntB, vec![EPSILON]).unwrap();

        let g = b.grammar().clone();
        let first = crate::first::FirstSets::compute(&g);
        assert_eq!(residual_left_recursion(&g, &first), Some(ntA));
    }
}
