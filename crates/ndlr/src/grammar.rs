//! Grammar types.

use crate::{
    syntax::{self, RuleDesc, SyntaxError},
    types::{Map, Set},
    util::display_fn,
};
use std::{borrow::Cow, fmt, fs, io, marker::PhantomData, path::Path};

/// A grammar symbol, identified by its text.
///
/// Whether a symbol is a terminal or a nonterminal is not a property of the
/// symbol itself: it is a nonterminal exactly when the grammar defines
/// productions for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(Cow<'static, str>);

impl Symbol {
    /// Reserved symbol standing for the empty right-hand side.
    pub const EPSILON: Self = Self(Cow::Borrowed("ε"));

    /// Reserved symbol used as the lookahead at the end of input.
    pub const EOI: Self = Self(Cow::Borrowed("$"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_reserved(&self) -> bool {
        *self == Self::EPSILON || *self == Self::EOI
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Symbol {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<char> for Symbol {
    fn from(ch: char) -> Self {
        Self::new(ch.to_string())
    }
}

/// The right-hand side of a production rule.
///
/// The empty right-hand side is stored as the single symbol `ε`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    right: Vec<Symbol>,
}

impl Production {
    /// Create a production from its right-hand side. `ε` symbols are dropped.
    pub fn new<I>(right: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        let right: Vec<Symbol> = right
            .into_iter()
            .map(Into::into)
            .filter(|symbol| *symbol != Symbol::EPSILON)
            .collect();
        if right.is_empty() {
            Self::epsilon()
        } else {
            Self { right }
        }
    }

    pub fn epsilon() -> Self {
        Self {
            right: vec![Symbol::EPSILON],
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(&self.right[..], [symbol] if *symbol == Symbol::EPSILON)
    }

    /// Return the right-hand side as written, `ε` included.
    pub fn right(&self) -> &[Symbol] {
        &self.right[..]
    }

    /// Return the symbols to be matched, i.e. an empty slice for `ε`.
    pub fn symbols(&self) -> &[Symbol] {
        if self.is_epsilon() {
            &[]
        } else {
            &self.right[..]
        }
    }

    pub fn len(&self) -> usize {
        self.symbols().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols().is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.right.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Identifies a production by the position of its left-hand side in the
/// grammar and its position among the alternatives of that left-hand side.
///
/// The alternatives of a nonterminal never contain duplicates, hence two
/// identifiers in the same grammar are equal exactly when the productions are
/// structurally equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionID {
    nonterminal: u32,
    alternative: u32,
}

impl ProductionID {
    pub const fn new(nonterminal: u32, alternative: u32) -> Self {
        Self {
            nonterminal,
            alternative,
        }
    }
}

/// The grammar definition used to derive the parse tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    rules: Map<Symbol, Vec<Production>>,
    start_symbol: Symbol,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## terminals:")?;
        for terminal in &self.terminals() {
            writeln!(f, "{}", terminal)?;
        }

        writeln!(f, "\n## nonterminals:")?;
        for (left, productions) in &self.rules {
            write!(f, "{}", left)?;
            if *left == self.start_symbol {
                write!(f, " (start)")?;
            }
            if productions.is_empty() {
                write!(f, " (dead)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## rules:")?;
        for (left, productions) in &self.rules {
            if productions.is_empty() {
                continue;
            }
            write!(f, "{} ->", left)?;
            for (i, production) in productions.iter().enumerate() {
                if i > 0 {
                    write!(f, " |")?;
                }
                write!(f, " {}", production)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Grammar {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Grammar, GrammarDefError> {
        let source = fs::read_to_string(path).map_err(GrammarDefError::IO)?;
        Self::from_str(&source)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(source: &str) -> Result<Grammar, GrammarDefError> {
        let rules = syntax::parse(source)?;
        Grammar::define(|g| define_grammar_from_syntax(g, rules))
    }

    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef {
            rules: Map::default(),
            start: None,
            _marker: PhantomData,
        };
        f(&mut def)?;
        def.end()
    }

    pub(crate) fn from_parts(rules: Map<Symbol, Vec<Production>>, start_symbol: Symbol) -> Self {
        Self {
            rules,
            start_symbol,
        }
    }

    pub fn start_symbol(&self) -> &Symbol {
        &self.start_symbol
    }

    /// Iterate over the nonterminals and their productions in definition order.
    pub fn rules(&self) -> impl Iterator<Item = (&Symbol, &[Production])> + '_ {
        self.rules
            .iter()
            .map(|(left, productions)| (left, &productions[..]))
    }

    /// Return the productions of `left`, or an empty slice if it is not a
    /// nonterminal of this grammar.
    pub fn productions(&self, left: &Symbol) -> &[Production] {
        self.rules.get(left).map_or(&[], |productions| &productions[..])
    }

    pub fn is_nonterminal(&self, symbol: &Symbol) -> bool {
        self.rules.contains_key(symbol)
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.rules.keys()
    }

    /// Collect the terminal alphabet: every right-hand side symbol that is
    /// neither a nonterminal nor `ε`.
    pub fn terminals(&self) -> Set<Symbol> {
        self.rules
            .values()
            .flatten()
            .flat_map(|production| production.symbols())
            .filter(|symbol| !self.is_nonterminal(symbol))
            .cloned()
            .collect()
    }

    /// Collect every symbol of this grammar in order of first appearance,
    /// `ε` excluded.
    pub fn symbols(&self) -> Set<Symbol> {
        let mut symbols = Set::default();
        for (left, productions) in &self.rules {
            symbols.insert(left.clone());
            for production in productions {
                symbols.extend(production.symbols().iter().cloned());
            }
        }
        symbols
    }

    /// Return the length of the longest right-hand side.
    pub fn max_production_len(&self) -> usize {
        self.rules
            .values()
            .flatten()
            .map(Production::len)
            .max()
            .unwrap_or(0)
    }

    pub fn production(&self, id: ProductionID) -> Option<(&Symbol, &Production)> {
        let (left, productions) = self.rules.get_index(id.nonterminal as usize)?;
        let production = productions.get(id.alternative as usize)?;
        Some((left, production))
    }

    /// Iterate over the identifiers of the productions of `left`.
    pub fn production_ids(&self, left: &Symbol) -> impl Iterator<Item = ProductionID> {
        let (nonterminal, len) = match self.rules.get_full(left) {
            Some((index, _, productions)) => (index as u32, productions.len() as u32),
            None => (0, 0),
        };
        (0..len).map(move |alternative| ProductionID::new(nonterminal, alternative))
    }

    /// Return a copy of this grammar extended with a fresh start symbol whose
    /// only production is `start`.
    ///
    /// The fresh symbol is `start` followed by as many `'` as needed to keep it
    /// distinct from every symbol of the grammar. It becomes the first
    /// nonterminal and the start symbol of the returned grammar.
    pub fn augment(&self, start: &Symbol) -> (Grammar, Symbol) {
        let symbols = self.symbols();
        let mut fresh = Symbol::new(format!("{}'", start));
        while symbols.contains(&fresh) {
            fresh = Symbol::new(format!("{}'", fresh));
        }

        let mut rules = Map::default();
        rules.insert(fresh.clone(), vec![Production::new([start.clone()])]);
        rules.extend(
            self.rules
                .iter()
                .map(|(left, productions)| (left.clone(), productions.clone())),
        );
        // an undefined start symbol is still a nonterminal, with no production.
        rules.entry(start.clone()).or_default();

        (Grammar::from_parts(rules, fresh.clone()), fresh)
    }

    pub fn display_production<'g>(&'g self, id: ProductionID) -> impl fmt::Display + 'g {
        display_fn(move |f| match self.production(id) {
            Some((left, production)) => write!(f, "{} -> {}", left, production),
            None => f.write_str("<unknown>"),
        })
    }
}

fn define_grammar_from_syntax(
    g: &mut GrammarDef<'_>,
    rules: Vec<RuleDesc<'_>>,
) -> Result<(), GrammarDefError> {
    for RuleDesc {
        left, alternatives, ..
    } in rules
    {
        let left = Symbol::new(left.to_owned());
        for alternative in alternatives {
            let right = alternative
                .into_iter()
                .map(|symbol| Symbol::new(symbol.to_owned()));
            g.rule(left.clone(), right)?;
        }
    }
    Ok(())
}

/// The contextual values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef<'def> {
    rules: Map<Symbol, Vec<Production>>,
    start: Option<Symbol>,
    _marker: PhantomData<&'def mut ()>,
}

impl<'def> GrammarDef<'def> {
    /// Specify a production rule into this grammar.
    ///
    /// An empty right-hand side denotes the `ε` production. Repeated
    /// productions are ignored.
    pub fn rule<L, I>(&mut self, left: L, right: I) -> Result<(), GrammarDefError>
    where
        L: Into<Symbol>,
        I: IntoIterator,
        I::Item: Into<Symbol>,
    {
        let left = left.into();
        if !verify_name(&left) {
            return Err(format!("incorrect nonterminal name: `{}'", left).into());
        }

        let right: Vec<Symbol> = right.into_iter().map(Into::into).collect();
        for symbol in &right {
            if *symbol != Symbol::EPSILON && !verify_name(symbol) {
                return Err(format!("incorrect symbol name: `{}'", symbol).into());
            }
        }

        let production = Production::new(right);
        let productions = self.rules.entry(left).or_default();
        if productions.contains(&production) {
            tracing::debug!("ignoring duplicate production: {}", production);
            return Ok(());
        }
        productions.push(production);

        Ok(())
    }

    /// Specify the start symbol for this grammar.
    pub fn start_symbol(&mut self, symbol: impl Into<Symbol>) -> Result<(), GrammarDefError> {
        self.start.replace(symbol.into());
        Ok(())
    }

    fn end(mut self) -> Result<Grammar, GrammarDefError> {
        // fall back to the first defined nonterminal.
        let start = match self.start.take() {
            Some(start) => start,
            None => self
                .rules
                .keys()
                .next()
                .cloned()
                .ok_or_else(|| GrammarDefError::from("empty grammar"))?,
        };

        if !self.rules.contains_key(&start) {
            return Err(format!("missing production rule for the start symbol `{}'", start).into());
        }

        Ok(Grammar::from_parts(self.rules, start))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("IO error: {}", _0)]
    IO(io::Error),

    #[error("Syntax error: {}", _0)]
    Syntax(
        #[from]
        #[source]
        SyntaxError,
    ),

    #[error("Other error: {}", msg)]
    Other { msg: String },
}
impl From<&str> for GrammarDefError {
    fn from(msg: &str) -> Self {
        Self::Other { msg: msg.into() }
    }
}
impl From<String> for GrammarDefError {
    fn from(msg: String) -> Self {
        Self::Other { msg }
    }
}

fn verify_name(symbol: &Symbol) -> bool {
    let name = symbol.as_str();
    !name.is_empty() && !symbol.is_reserved() && !name.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_s_asb() -> Grammar {
        Grammar::define(|g| {
            g.rule("S", ["a", "S", "b"])?;
            g.rule("S", ["a", "b"])?;
            Ok(())
        })
        .unwrap()
    }

    #[test]
    fn define_uses_first_left_as_start() {
        let g = Grammar::define(|g| {
            g.rule("A", ["a"])?;
            g.rule("B", ["A", "b"])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(*g.start_symbol(), Symbol::from("A"));
        assert!(g.is_nonterminal(&Symbol::from("B")));
        assert!(!g.is_nonterminal(&Symbol::from("b")));
    }

    #[test]
    fn define_explicit_start() {
        let g = Grammar::define(|g| {
            g.rule("A", ["a"])?;
            g.rule("B", ["A", "b"])?;
            g.start_symbol("B")
        })
        .unwrap();
        assert_eq!(*g.start_symbol(), Symbol::from("B"));
    }

    #[test]
    fn define_rejects_bad_input() {
        assert!(matches!(
            Grammar::define(|_| Ok(())),
            Err(GrammarDefError::Other { .. })
        ));
        assert!(Grammar::define(|g| g.rule("$", ["a"])).is_err());
        assert!(Grammar::define(|g| g.rule("S", ["a b"])).is_err());
        assert!(Grammar::define(|g| g.rule("S", ["$"])).is_err());
        assert!(Grammar::define(|g| {
            g.rule("S", ["a"])?;
            g.start_symbol("T")
        })
        .is_err());
    }

    #[test]
    fn duplicate_productions_are_ignored() {
        let g = Grammar::define(|g| {
            g.rule("S", ["a"])?;
            g.rule("S", ["a"])?;
            g.rule("S", Vec::<Symbol>::new())?;
            g.rule("S", [Symbol::EPSILON])?;
            Ok(())
        })
        .unwrap();
        let productions = g.productions(&Symbol::from("S"));
        assert_eq!(productions.len(), 2);
        assert!(productions[1].is_epsilon());
        assert!(productions[1].symbols().is_empty());
        assert_eq!(productions[1].right(), &[Symbol::EPSILON]);
    }

    #[test]
    fn terminal_alphabet() {
        let g = Grammar::define(|g| {
            g.rule("S", ["a", "S", "B"])?;
            g.rule("S", Vec::<Symbol>::new())?;
            Ok(())
        })
        .unwrap();
        // `B` has no production and hence is a terminal.
        let terminals: Vec<_> = g.terminals().into_iter().collect();
        assert_eq!(terminals, [Symbol::from("a"), Symbol::from("B")]);

        let symbols: Vec<_> = g.symbols().into_iter().collect();
        assert_eq!(
            symbols,
            [Symbol::from("S"), Symbol::from("a"), Symbol::from("B")]
        );
    }

    #[test]
    fn production_ids_resolve() {
        let g = grammar_s_asb();
        let ids: Vec<_> = g.production_ids(&Symbol::from("S")).collect();
        assert_eq!(ids.len(), 2);
        let (left, production) = g.production(ids[1]).unwrap();
        assert_eq!(*left, Symbol::from("S"));
        assert_eq!(production.to_string(), "a b");
        assert_eq!(g.display_production(ids[0]).to_string(), "S -> a S b");

        assert_eq!(g.production_ids(&Symbol::from("a")).count(), 0);
        assert!(g.production(ProductionID::new(7, 0)).is_none());
        assert_eq!(g.max_production_len(), 3);
    }

    #[test]
    fn augment_leaves_input_untouched() {
        let g = grammar_s_asb();
        let (augmented, start) = g.augment(g.start_symbol());
        assert_eq!(start, Symbol::from("S'"));
        assert_eq!(*augmented.start_symbol(), start);
        assert_eq!(augmented.nonterminals().next(), Some(&start));
        assert_eq!(
            augmented.productions(&start),
            &[Production::new([Symbol::from("S")])]
        );
        assert!(!g.is_nonterminal(&start));
        assert_eq!(g.nonterminals().count(), 1);
    }

    #[test]
    fn augment_primed_start() {
        let g = Grammar::define(|g| {
            g.rule("S'", ["a", "S'"])?;
            g.rule("S'", ["a"])?;
            Ok(())
        })
        .unwrap();
        let (augmented, start) = g.augment(g.start_symbol());
        assert_eq!(start, Symbol::from("S''"));
        assert_eq!(
            augmented.productions(&start),
            &[Production::new([Symbol::from("S'")])]
        );
    }

    #[test]
    fn augment_picks_unused_name() {
        let g = Grammar::define(|g| {
            g.rule("S'", ["a", "S"])?;
            g.rule("S", ["b"])?;
            g.rule("S''", ["c"])?;
            Ok(())
        })
        .unwrap();
        let (augmented, start) = g.augment(g.start_symbol());
        assert_eq!(start, Symbol::from("S'''"));
        assert_eq!(augmented.nonterminals().count(), 4);
    }

    #[test]
    fn augment_registers_undefined_start() {
        let g = grammar_s_asb();
        let (augmented, start) = g.augment(&Symbol::from("T"));
        assert_eq!(start, Symbol::from("T'"));
        assert!(augmented.is_nonterminal(&Symbol::from("T")));
        assert!(augmented.productions(&Symbol::from("T")).is_empty());
    }

    #[test]
    fn display_lists_rules() {
        let g = grammar_s_asb();
        let text = g.to_string();
        assert!(text.contains("S (start)"));
        assert!(text.contains("S -> a S b | a b"));
    }
}
