//! Calculation of LR(0) parse table.
//!
//! No lookahead set is computed: a completed item reduces on every terminal.
//! Competing actions are therefore common, and they are all kept in the
//! table for the recognizer to explore.

use crate::{
    grammar::{Production, Symbol},
    lr0::{LR0Automaton, StateID},
    types::{Map, Set},
    util::{display_fn, push_unique},
};
use ndlr_runtime::{ParseAction, ParserDef};
use std::fmt;

/// The action that the automaton in a state performs on a particular
/// lookahead symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read a lookahead symbol and transition to the specified state.
    Shift(StateID),

    /// Reduce to the left-hand side using the specified right-hand side.
    Reduce(Symbol, Production),

    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift(next) => write!(f, "shift({:?})", next),
            Self::Reduce(left, production) => write!(f, "reduce({} -> {})", left, production),
            Self::Accept => f.write_str("accept"),
        }
    }
}

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct ParseTableRow {
    /// The actions per lookahead symbol. A cell may hold several
    /// alternatives.
    pub actions: Map<Symbol, Vec<Action>>,

    /// The successor states per nonterminal. A cell may hold several
    /// alternatives.
    pub gotos: Map<Symbol, Vec<StateID>>,
}

#[derive(Debug)]
pub struct ParseTable {
    pub states: Map<StateID, ParseTableRow>,
    terminals: Set<Symbol>,
}

impl ParseTable {
    /// Project the automaton into action and goto tables.
    pub fn generate(automaton: &LR0Automaton) -> Self {
        let g = &automaton.grammar;
        let terminals = g.terminals();

        let mut states = Map::default();
        for (&id, state) in &automaton.states {
            let mut row = ParseTableRow::default();
            for item in &state.items {
                let Some((left, production)) = g.production(item.production) else {
                    continue;
                };

                match item.next_symbol(g) {
                    Some(symbol) if g.is_nonterminal(symbol) => {
                        let gotos = row.gotos.entry(symbol.clone()).or_default();
                        for next in automaton.successors(id, symbol) {
                            push_unique(gotos, next);
                        }
                    }

                    Some(symbol) => {
                        let actions = row.actions.entry(symbol.clone()).or_default();
                        for next in automaton.successors(id, symbol) {
                            push_unique(actions, Action::Shift(next));
                        }
                    }

                    None if *left == automaton.augmented_start => {
                        let actions = row.actions.entry(Symbol::EOI).or_default();
                        push_unique(actions, Action::Accept);
                    }

                    None => {
                        let reduce = Action::Reduce(left.clone(), production.clone());
                        for lookahead in terminals.iter().chain(Some(&Symbol::EOI)) {
                            let actions = row.actions.entry(lookahead.clone()).or_default();
                            push_unique(actions, reduce.clone());
                        }
                    }
                }
            }
            states.insert(id, row);
        }

        let table = Self { states, terminals };
        tracing::debug!("{} conflicting cells", table.conflicts().count());
        table
    }

    /// Return the terminal alphabet, without the end-of-input marker.
    pub fn terminals(&self) -> &Set<Symbol> {
        &self.terminals
    }

    /// Return the actions of `state` on `lookahead`.
    pub fn actions(&self, state: StateID, lookahead: &Symbol) -> &[Action] {
        self.states
            .get(&state)
            .and_then(|row| row.actions.get(lookahead))
            .map_or(&[], |actions| &actions[..])
    }

    /// Return the successors of `state` after reducing to `nonterminal`.
    pub fn gotos(&self, state: StateID, nonterminal: &Symbol) -> &[StateID] {
        self.states
            .get(&state)
            .and_then(|row| row.gotos.get(nonterminal))
            .map_or(&[], |gotos| &gotos[..])
    }

    /// Iterate over the cells holding more than one action.
    pub fn conflicts(&self) -> impl Iterator<Item = (StateID, &Symbol, &[Action])> + '_ {
        self.states.iter().flat_map(|(&id, row)| {
            row.actions
                .iter()
                .filter(|(_, actions)| actions.len() > 1)
                .map(move |(symbol, actions)| (id, symbol, &actions[..]))
        })
    }

    pub fn display(&self) -> impl fmt::Display + '_ {
        display_fn(|f| {
            for (i, (id, row)) in self.states.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }

                writeln!(f, "#### State {:?}", id)?;
                writeln!(f, "## actions")?;
                for (symbol, actions) in &row.actions {
                    match &actions[..] {
                        [action] => writeln!(f, "- {} => {}", symbol, action)?,
                        actions => {
                            writeln!(f, "- {} => conflict", symbol)?;
                            for action in actions {
                                writeln!(f, "  - {}", action)?;
                            }
                        }
                    }
                }

                writeln!(f, "## gotos")?;
                for (symbol, gotos) in &row.gotos {
                    for next in gotos {
                        writeln!(f, "- {} => goto({:?})", symbol, next)?;
                    }
                }
            }
            Ok(())
        })
    }
}

impl ParserDef for ParseTable {
    type State = StateID;
    type Terminal = Symbol;
    type Nonterminal = Symbol;

    fn actions(
        &self,
        current: StateID,
        lookahead: Option<&Symbol>,
    ) -> Vec<ParseAction<StateID, Symbol>> {
        let lookahead = lookahead.unwrap_or(&Symbol::EOI);
        ParseTable::actions(self, current, lookahead)
            .iter()
            .map(|action| match action {
                Action::Shift(next) => ParseAction::Shift(*next),
                Action::Reduce(left, production) => {
                    ParseAction::Reduce(left.clone(), production.len())
                }
                Action::Accept => ParseAction::Accept,
            })
            .collect()
    }

    fn gotos(&self, current: StateID, lhs: &Symbol) -> Vec<StateID> {
        ParseTable::gotos(self, current, lhs).to_vec()
    }
}
