//! Elimination of unit production rules.

use crate::{
    grammar::{Grammar, Production, Symbol},
    types::{Map, Set},
};
use std::collections::VecDeque;

/// Rewrite the grammar so that no production has a single nonterminal as its
/// right-hand side, while generating the same language.
///
/// Each nonterminal `A` receives the non-unit productions of every nonterminal
/// reachable from `A` through unit productions (`A` included), in discovery
/// order and without duplicates. A nonterminal left without any production is
/// kept with an empty list.
pub fn eliminate_unit_rules(g: &Grammar) -> Grammar {
    let mut rules = Map::<Symbol, Vec<Production>>::default();
    for left in g.nonterminals() {
        let mut productions = vec![];
        for reachable in unit_reachable(g, left) {
            for production in g.productions(&reachable) {
                if is_unit(g, production) || productions.contains(production) {
                    continue;
                }
                productions.push(production.clone());
            }
        }
        if productions.is_empty() {
            tracing::debug!("{} has no production after unit rule elimination", left);
        }
        rules.insert(left.clone(), productions);
    }

    Grammar::from_parts(rules, g.start_symbol().clone())
}

/// Return whether the production consists of exactly one nonterminal.
pub fn is_unit(g: &Grammar, production: &Production) -> bool {
    matches!(production.symbols(), [symbol] if g.is_nonterminal(symbol))
}

/// Collect the nonterminals derivable from `left` using unit productions
/// only, breadth first. `left` is always the first element.
pub fn unit_reachable(g: &Grammar, left: &Symbol) -> Set<Symbol> {
    let mut reachable = Set::default();
    reachable.insert(left.clone());

    let mut pending = VecDeque::from([left.clone()]);
    while let Some(current) = pending.pop_front() {
        for production in g.productions(&current) {
            if !is_unit(g, production) {
                continue;
            }
            let next = &production.symbols()[0];
            if reachable.insert(next.clone()) {
                pending.push_back(next.clone());
            }
        }
    }

    reachable
}
