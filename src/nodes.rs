// Copyright (c) 2018 Fabian Schuiki

//! Synthesis of tree node records from a transformed grammar.
//!
//! Every nonterminal the user declared maps to one record; the synthetic
//! nonterminals minted during rewriting are folded back into the record of
//! the nonterminal they were derived from. The records therefore mirror
//! the grammar as it was declared, not as it was transformed, which is
//! what a parse driver wants to hand out as its syntax tree.

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::grammar::Grammar;
use crate::token::{Nonterminal, Token};

/// A record synthesized for an original nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// The nonterminal this record mirrors.
    pub nonterminal: Nonterminal,
    /// The record name: the nonterminal's display name.
    pub name: String,
    /// The fields, in first-appearance order.
    pub fields: Vec<NodeField>,
}

/// A field of a synthesized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeField {
    /// The field name: the token's display name.
    pub name: String,
    /// The field type: the record name for nonterminals, `Token` otherwise.
    pub ty: String,
    /// The number of slots the field has.
    pub count: usize,
}

/// Synthesize the node records of a grammar.
///
/// Field multiplicity within one production is the maximum count of the
/// token across any single alternative; inlining a synthetic nonterminal
/// into its origin sums the counts field by field. ε never becomes a
/// field, and references between members of the same synthetic group are
/// dropped since the group collapses into one record.
pub fn synthesize(grammar: &Grammar) -> Vec<NodeRecord> {
    let mut fields: IndexMap<Nonterminal, IndexMap<String, (usize, bool)>> = IndexMap::new();
    for token in grammar.nonterminals().iter() {
        if let Some(nonterm) = token.as_nonterminal() {
            if grammar.transformation_origin(nonterm).is_none() {
                fields.insert(nonterm, IndexMap::new());
            }
        }
    }

    for prod in grammar.productions() {
        let root = resolve_origin(grammar, prod.lhs());

        // The widest use of each token across the production's alternatives.
        let mut maxima: IndexMap<String, (usize, bool)> = IndexMap::new();
        for alt in prod.alternatives() {
            let mut counts: IndexMap<String, (usize, bool)> = IndexMap::new();
            for &sym in alt {
                if sym.is_epsilon() {
                    continue;
                }
                if let Some(nonterm) = sym.as_nonterminal() {
                    if grammar.transformation_origin(nonterm).is_some()
                        && resolve_origin(grammar, nonterm) == root
                    {
                        continue;
                    }
                }
                let (name, is_nonterm) = field_key(grammar, sym);
                counts.entry(name).or_insert((0, is_nonterm)).0 += 1;
            }
            for (name, (count, is_nonterm)) in counts {
                let entry = maxima.entry(name).or_insert((0, is_nonterm));
                if count > entry.0 {
                    entry.0 = count;
                }
            }
        }

        let record = fields.entry(root).or_insert_with(IndexMap::new);
        for (name, (count, is_nonterm)) in maxima {
            record.entry(name).or_insert((0, is_nonterm)).0 += count;
        }
    }

    let records: Vec<NodeRecord> = fields
        .into_iter()
        .map(|(nonterminal, fields)| {
            let name = match grammar.nonterminal_name(nonterminal) {
                Some(name) => name.to_string(),
                None => nonterminal.to_string(),
            };
            NodeRecord {
                nonterminal,
                name,
                fields: fields
                    .into_iter()
                    .map(|(name, (count, is_nonterm))| NodeField {
                        ty: if is_nonterm {
                            name.clone()
                        } else {
                            "Token".to_string()
                        },
                        name,
                        count,
                    })
                    .collect(),
            }
        })
        .collect();
    debug!("synthesized {} node records", records.len());
    records
}

/// Chase the transformation chain of a nonterminal to the nonterminal the
/// user declared.
fn resolve_origin(grammar: &Grammar, mut nonterm: Nonterminal) -> Nonterminal {
    while let Some(origin) = grammar.transformation_origin(nonterm) {
        nonterm = origin;
    }
    nonterm
}

/// The field name and kind for a token.
///
/// Nonterminal references resolve through the transformation map so that a
/// reference to a synthetic nonterminal names the record of its origin.
fn field_key(grammar: &Grammar, sym: Token) -> (String, bool) {
    if let Some(nonterm) = sym.as_nonterminal() {
        let root = resolve_origin(grammar, nonterm);
        let name = match grammar.nonterminal_name(root) {
            Some(name) => name.to_string(),
            None => root.to_string(),
        };
        (name, true)
    } else {
        let name = match grammar.token_name(sym) {
            Some(name) => name.to_string(),
            None => sym.to_string(),
        };
        (name, false)
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "pub struct {} {{", self.name)?;
        for field in &self.fields {
            let ty = if field.count > 1 {
                format!("[{}; {}]", field.ty, field.count)
            } else {
                field.ty.clone()
            };
            writeln!(f, "    pub {}: {},", field_ident(&field.name), ty)?;
        }
        write!(f, "}}")
    }
}

/// Turn a display name into a usable field identifier.
fn field_ident(name: &str) -> String {
    let mut ident = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() {
            ident.extend(c.to_lowercase());
        } else {
            ident.push('_');
        }
    }
    if ident.chars().next().map(|c| c.is_numeric()).unwrap_or(true) {
        ident.insert(0, '_');
    }
    ident
}
