// Copyright (c) 2018 Fabian Schuiki

//! Left-factoring of common leading tokens.
//!
//! Two alternatives of the same production that start with the same token
//! are a FIRST/FIRST conflict no one-token lookahead can resolve. The pass
//! moves the shared leading token into a single alternative and pushes the
//! diverging tails into a fresh nonterminal. Only the leading token is
//! examined; longer common prefixes resolve over successive passes, one
//! token at a time, as the collision reappears inside the fresh
//! nonterminal.

use log::debug;

use crate::grammar::Grammar;
use crate::token::{Nonterminal, Token, EPSILON};

/// Factor every leading-token collision out of a grammar.
pub fn left_factor(grammar: &mut Grammar) {
    loop {
        let before = grammar.clone_productions();
        if let Some((lhs, head)) = find_collision(grammar) {
            factor(grammar, lhs, head);
        }
        if !grammar.productions_changed(&before) {
            break;
        }
    }
}

/// Find the first production with two or more alternatives that share a
/// leading token.
///
/// ε-alternatives are never grouping keys: their lookahead comes from the
/// follow set, not from a leading token.
fn find_collision(grammar: &Grammar) -> Option<(Nonterminal, Token)> {
    for prod in grammar.productions() {
        for alt in prod.alternatives() {
            let head = match alt.first() {
                Some(&head) => head,
                None => continue,
            };
            if head.is_epsilon() {
                continue;
            }
            let count = prod
                .alternatives()
                .iter()
                .filter(|other| other.first() == Some(&head))
                .count();
            if count > 1 {
                return Some((prod.lhs(), head));
            }
        }
    }
    None
}

/// Factor the alternatives of `lhs` that start with `head` into a fresh
/// tail nonterminal.
fn factor(grammar: &mut Grammar, lhs: Nonterminal, head: Token) {
    let fresh = grammar.mint_nonterminal(lhs);
    debug!("factoring {} out of {} via {}", head, lhs, fresh);

    let mut tails = Vec::new();
    if let Some(prod) = grammar.production_mut(lhs) {
        let mut kept = Vec::new();
        for alt in prod.alternatives_mut().drain(..) {
            if alt.first() == Some(&head) {
                let tail = alt[1..].to_vec();
                // An alternative equal to the factored prefix leaves an
                // empty tail, which becomes the canonical ε alternative.
                tails.push(if tail.is_empty() { vec![EPSILON] } else { tail });
            } else {
                kept.push(alt);
            }
        }
        kept.push(vec![head, fresh.token()]);
        *prod.alternatives_mut() = kept;
    }
    for tail in tails {
        grammar.add_alternative(fresh, tail);
    }
}
