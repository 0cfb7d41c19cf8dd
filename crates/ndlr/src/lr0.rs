//! LR(0) automaton construction.

use crate::{
    grammar::{Grammar, ProductionID, Symbol},
    types::{Map, Set},
    util::display_fn,
};
use std::{collections::VecDeque, fmt};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateID(u32);
impl fmt::Debug for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S#{:03}", self.0)
    }
}
impl StateID {
    /// The state holding the closure of the augmented start item.
    pub const START: Self = Self::from_raw(0);

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u32 {
        self.0
    }
}

/// The LR(0) item, a production with a marker of how much of it was matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LR0Item {
    pub production: ProductionID,
    pub index: usize,
}

impl LR0Item {
    pub const fn new(production: ProductionID, index: usize) -> Self {
        Self { production, index }
    }

    /// Return the symbol right after the marker, if any.
    pub fn next_symbol<'g>(&self, g: &'g Grammar) -> Option<&'g Symbol> {
        let (_, production) = g.production(self.production)?;
        production.symbols().get(self.index)
    }

    /// Return whether the marker reached the end of the production.
    pub fn is_complete(&self, g: &Grammar) -> bool {
        g.production(self.production)
            .map_or(false, |(_, production)| self.index >= production.len())
    }

    fn advance(self) -> Self {
        Self {
            index: self.index + 1,
            ..self
        }
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(|f| {
            let Some((left, production)) = g.production(self.production) else {
                return f.write_str("<unknown>");
            };
            write!(f, "{} -> [", left)?;
            for (i, symbol) in production.symbols().iter().enumerate() {
                if i == self.index {
                    f.write_str(" .")?;
                }
                write!(f, " {}", symbol)?;
            }
            if production.len() == self.index {
                f.write_str(" .")?;
            }
            f.write_str(" ]")
        })
    }
}

/// A set of LR(0) items in canonical form.
///
/// The items are kept sorted and deduplicated, so two item sets compare and
/// hash equal whenever they hold the same items, regardless of the order in
/// which the items were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemSet {
    items: Vec<LR0Item>,
}

impl ItemSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &LR0Item) -> bool {
        self.items.binary_search(item).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LR0Item> {
        self.items.iter()
    }
}

impl FromIterator<LR0Item> for ItemSet {
    fn from_iter<I: IntoIterator<Item = LR0Item>>(iter: I) -> Self {
        let mut items: Vec<_> = iter.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a LR0Item;
    type IntoIter = std::slice::Iter<'a, LR0Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Expand the item set until every production of a nonterminal following a
/// marker is included with the marker at its beginning.
pub fn closure<I>(g: &Grammar, items: I) -> ItemSet
where
    I: IntoIterator<Item = LR0Item>,
{
    let mut items: Set<LR0Item> = items.into_iter().collect();
    // the items appended during the scan are scanned as well.
    let mut i = 0;
    while let Some(&item) = items.get_index(i) {
        if let Some(next) = item.next_symbol(g) {
            items.extend(g.production_ids(next).map(|p| LR0Item::new(p, 0)));
        }
        i += 1;
    }
    items.into_iter().collect()
}

/// Compute the item set reached from `items` by reading `symbol`.
///
/// An empty item set is returned if there is no such transition.
pub fn goto(g: &Grammar, items: &ItemSet, symbol: &Symbol) -> ItemSet {
    let kernels: Vec<_> = items
        .iter()
        .filter(|item| item.next_symbol(g) == Some(symbol))
        .map(|item| item.advance())
        .collect();
    if kernels.is_empty() {
        return ItemSet::default();
    }
    closure(g, kernels)
}

#[derive(Debug, Clone)]
pub struct LR0State {
    pub items: ItemSet,
}

/// The canonical collection of LR(0) item sets of an augmented grammar.
#[derive(Debug)]
pub struct LR0Automaton {
    /// The augmented working copy of the grammar the states refer to.
    pub grammar: Grammar,
    pub augmented_start: Symbol,
    pub states: Map<StateID, LR0State>,
    /// The successor states of each state per symbol.
    ///
    /// A cell may hold more than one successor.
    pub transitions: Map<(StateID, Symbol), Set<StateID>>,
}

impl LR0Automaton {
    /// Build the automaton of `g` started from `start`.
    ///
    /// The grammar is augmented on a copy; `g` itself is left untouched.
    pub fn build(g: &Grammar, start: &Symbol) -> Self {
        let span = tracing::debug_span!("lr0", start = %start);
        let _entered = span.enter();

        let (grammar, augmented_start) = g.augment(start);
        let symbols = grammar.symbols();

        let mut state_id = {
            let mut next_state_id = 0;
            move || {
                let id = StateID::from_raw(next_state_id);
                next_state_id += 1;
                id
            }
        };

        let initial = closure(
            &grammar,
            grammar
                .production_ids(&augmented_start)
                .map(|p| LR0Item::new(p, 0)),
        );
        let mut isocores = Map::<ItemSet, StateID>::default();
        let mut pending_states = VecDeque::<(StateID, ItemSet)>::new();
        let start_id = state_id();
        isocores.insert(initial.clone(), start_id);
        pending_states.push_back((start_id, initial));

        let mut states = Map::<StateID, LR0State>::default();
        let mut transitions = Map::<(StateID, Symbol), Set<StateID>>::default();
        while let Some((current, items)) = pending_states.pop_front() {
            for symbol in &symbols {
                let next_items = goto(&grammar, &items, symbol);
                if next_items.is_empty() {
                    continue;
                }
                let next = match isocores.get(&next_items) {
                    Some(id) => *id,
                    None => {
                        let id = state_id();
                        tracing::trace!("new state {:?} via {:?} --({})-->", id, current, symbol);
                        isocores.insert(next_items.clone(), id);
                        pending_states.push_back((id, next_items));
                        id
                    }
                };
                transitions
                    .entry((current, symbol.clone()))
                    .or_default()
                    .insert(next);
            }
            states.insert(current, LR0State { items });
        }

        tracing::debug!(
            "{} states, {} transitions",
            states.len(),
            transitions.len()
        );

        Self {
            grammar,
            augmented_start,
            states,
            transitions,
        }
    }

    pub fn start_state(&self) -> StateID {
        StateID::START
    }

    /// Iterate over the successors of `state` by `symbol`.
    pub fn successors(&self, state: StateID, symbol: &Symbol) -> impl Iterator<Item = StateID> + '_ {
        self.transitions
            .get(&(state, symbol.clone()))
            .into_iter()
            .flatten()
            .copied()
    }

    pub fn display(&self) -> impl fmt::Display + '_ {
        display_fn(|f| {
            for (i, (id, state)) in self.states.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "#### State {:?}", id)?;
                writeln!(f, "## items:")?;
                for item in &state.items {
                    writeln!(f, "- {}", item.display(&self.grammar))?;
                }
                let mut edges = self
                    .transitions
                    .iter()
                    .filter(|((from, _), _)| from == id)
                    .peekable();
                if edges.peek().is_some() {
                    writeln!(f, "## transitions:")?;
                    for ((_, symbol), targets) in edges {
                        for target in targets {
                            writeln!(f, "- {} => {:?}", symbol, target)?;
                        }
                    }
                }
            }
            Ok(())
        })
    }
}
