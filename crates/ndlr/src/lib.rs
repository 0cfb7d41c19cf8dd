//! A nondeterministic LR(0) recognizer generator.
//!
//! A grammar is compiled into an LR(0) automaton and a parse table whose
//! cells may hold several actions. The recognizer explores every
//! alternative, so any context-free grammar is accepted as input.

pub mod grammar;
pub mod lr0;
pub mod pipeline;
pub mod syntax;
pub mod table;
pub mod types;
pub mod unit_rules;
pub mod util;

pub use crate::{
    grammar::{Grammar, GrammarDefError, Production, Symbol},
    lr0::{LR0Automaton, StateID},
    pipeline::{construct, Config, Construction},
    table::{Action, ParseTable},
    unit_rules::eliminate_unit_rules,
};

/// Decide whether `input` is accepted by `table` started from `start`.
///
/// Each character is a terminal symbol. An input containing a character
/// outside the terminal alphabet is rejected without running the search.
pub fn recognize(input: &str, table: &ParseTable, start: StateID) -> bool {
    let mut tokens = Vec::with_capacity(input.len());
    for ch in input.chars() {
        let symbol = Symbol::from(ch);
        if !table.terminals().contains(&symbol) {
            tracing::debug!("`{}' is not in the terminal alphabet", ch);
            return false;
        }
        tokens.push(symbol);
    }
    ndlr_runtime::recognize(table, start, &tokens)
}
