// Copyright (c) 2018 Fabian Schuiki
#[macro_use]
extern crate clap;
extern crate presage;

use clap::App;
use presage::builder::GrammarBuilder;
use presage::grammar::RuleId;
use presage::nodes;

#[allow(non_snake_case)]
fn main() {
    let _matches = App::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .get_matches();

    // The classic left-recursive expression grammar.
    let mut b = GrammarBuilder::new();
    let ntExpr = b.add_nonterminal("Expr", 1).unwrap();
    let ntTerm = b.add_nonterminal("Term", 2).unwrap();
    let ntFactor = b.add_nonterminal("Factor", 3).unwrap();
    let tPlus = b.add_terminal("plus", -2).unwrap();
    let tStar = b.add_terminal("star", -3).unwrap();
    let tLpar = b.add_terminal("lparen", -4).unwrap();
    let tRpar = b.add_terminal("rparen", -5).unwrap();
    let tNum = b.add_terminal("num", -6).unwrap();

    b.add_rule(ntExpr, vec![ntExpr.into(), tPlus.into(), ntTerm.into()])
        .unwrap();
    b.add_rule(ntExpr, vec![ntTerm.into()]).unwrap();
    b.add_rule(ntTerm, vec![ntTerm.into(), tStar.into(), ntFactor.into()])
        .unwrap();
    b.add_rule(ntTerm, vec![ntFactor.into()]).unwrap();
    b.add_rule(ntFactor, vec![tLpar.into(), ntExpr.into(), tRpar.into()])
        .unwrap();
    b.add_rule(ntFactor, vec![tNum.into()]).unwrap();

    let table = b.build().expect("grammar is not LL(1)");
    let g = b.grammar();

    println!("productions:");
    for prod in g.productions() {
        println!("  {}", prod.pretty(g));
    }

    println!("first/follow sets:");
    for token in g.nonterminals().iter() {
        let nonterm = match token.as_nonterminal() {
            Some(nonterm) => nonterm,
            None => continue,
        };
        println!(
            "  first({}) = {}  follow({}) = {}",
            nonterm.pretty(g),
            b.first(token).expect("first sets were computed").pretty(g),
            nonterm.pretty(g),
            b.follow(nonterm).expect("follow sets were computed").pretty(g),
        );
    }

    println!("predict sets:");
    for id in 1..=table.num_rules() as u32 {
        let rule = RuleId::from_u32(id);
        println!(
            "  predict({}) = {}",
            rule,
            b.predict(rule).expect("predict sets were computed").pretty(g),
        );
    }

    println!("table:");
    for (nonterm, term, rule) in table.cells() {
        println!("  [{}, {}] = {}", nonterm.pretty(g), term.pretty(g), rule);
    }

    println!("node records:");
    for record in nodes::synthesize(g) {
        println!("{}", record);
    }
}
