//! Entry points chaining the construction stages.

use crate::{
    grammar::{Grammar, Symbol},
    lr0::{LR0Automaton, StateID},
    table::ParseTable,
    unit_rules::eliminate_unit_rules,
};

/// The products of the construction from a grammar.
#[derive(Debug)]
pub struct Construction {
    /// The grammar the automaton was built from, before augmentation.
    pub grammar: Grammar,
    pub automaton: LR0Automaton,
    pub table: ParseTable,
}

impl Construction {
    pub fn start_state(&self) -> StateID {
        self.automaton.start_state()
    }

    /// Decide whether `input` is a sentence of the grammar.
    pub fn recognize(&self, input: &str) -> bool {
        crate::recognize(input, &self.table, self.start_state())
    }
}

/// Build the automaton and the parse table of `g` started from `start`.
pub fn construct(g: &Grammar, start: &Symbol) -> Construction {
    construct_owned(g.clone(), start)
}

fn construct_owned(grammar: Grammar, start: &Symbol) -> Construction {
    let automaton = LR0Automaton::build(&grammar, start);
    let table = ParseTable::generate(&automaton);
    Construction {
        grammar,
        automaton,
        table,
    }
}

#[derive(Debug, Default)]
pub struct Config {
    eliminate_unit_rules: bool,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            eliminate_unit_rules: false,
        }
    }

    /// Rewrite the grammar without unit productions before building the
    /// automaton.
    pub fn eliminate_unit_rules(&mut self, enabled: bool) -> &mut Self {
        self.eliminate_unit_rules = enabled;
        self
    }

    /// Run the construction from the start symbol of `g`.
    pub fn build(&self, g: &Grammar) -> Construction {
        let grammar = if self.eliminate_unit_rules {
            eliminate_unit_rules(g)
        } else {
            g.clone()
        };
        let start = grammar.start_symbol().clone();
        construct_owned(grammar, &start)
    }
}
