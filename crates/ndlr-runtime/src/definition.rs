//! Parser definition.

use std::{fmt, hash::Hash};

/// The trait for abstracting a compiled LR(0) parse table.
///
/// Unlike a deterministic table, every cell may hold any number of
/// alternatives. The recognizer explores all of them.
pub trait ParserDef {
    /// The number to identify the state of LR(0) automaton.
    type State: Copy + Eq + Hash + fmt::Debug;

    /// The type of lookahead symbols.
    type Terminal;

    /// The type of the left-hand sides passed to `gotos`.
    type Nonterminal: Clone + Eq + Hash + fmt::Debug;

    /// Return the actions registered for the specified state and lookahead
    /// symbol.
    ///
    /// If there is no lookahead symbol, a `None` is passed as the end of input.
    fn actions(
        &self,
        current: Self::State,
        lookahead: Option<&Self::Terminal>,
    ) -> Vec<ParseAction<Self::State, Self::Nonterminal>>;

    /// Return the successor states after reducing to `lhs` in `current`.
    fn gotos(&self, current: Self::State, lhs: &Self::Nonterminal) -> Vec<Self::State>;
}

impl<T: ?Sized> ParserDef for &T
where
    T: ParserDef,
{
    type State = T::State;
    type Terminal = T::Terminal;
    type Nonterminal = T::Nonterminal;

    fn actions(
        &self,
        current: Self::State,
        lookahead: Option<&Self::Terminal>,
    ) -> Vec<ParseAction<Self::State, Self::Nonterminal>> {
        (**self).actions(current, lookahead)
    }

    fn gotos(&self, current: Self::State, lhs: &Self::Nonterminal) -> Vec<Self::State> {
        (**self).gotos(current, lhs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAction<TState, TNonterminal> {
    /// Consume the lookahead symbol and push the specified state.
    Shift(TState),

    /// Pop the given number of states and consult the goto table with the
    /// left-hand side.
    Reduce(TNonterminal, usize),

    Accept,
}
