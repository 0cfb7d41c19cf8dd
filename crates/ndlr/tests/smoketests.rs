use ndlr::{
    construct,
    grammar::{Grammar, Symbol},
    Config,
};
use std::{env, path::PathBuf};

fn load(name: &str) -> Grammar {
    let path = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap())
        .join(format!("tests/{}.grammar", name));
    Grammar::from_file(path).unwrap()
}

fn check(name: &str, accepted: &[&str], rejected: &[&str]) {
    let grammar = load(name);
    for eliminate in [false, true] {
        let construction = Config::new()
            .eliminate_unit_rules(eliminate)
            .build(&grammar);
        for word in accepted {
            assert!(
                construction.recognize(word),
                "{}: `{}' should be accepted (eliminate = {})",
                name,
                word,
                eliminate
            );
        }
        for word in rejected {
            assert!(
                !construction.recognize(word),
                "{}: `{}' should be rejected (eliminate = {})",
                name,
                word,
                eliminate
            );
        }
    }
}

/// Enumerate every word over `alphabet` up to `max_len` characters.
fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut words = vec![String::new()];
    let mut last = vec![String::new()];
    for _ in 0..max_len {
        last = last
            .iter()
            .flat_map(|word| {
                alphabet.iter().map(move |ch| {
                    let mut word = word.clone();
                    word.push(*ch);
                    word
                })
            })
            .collect();
        words.extend(last.iter().cloned());
    }
    words
}

macro_rules! define_smoketests {
    ($($name:ident),*$(,)?) => {$(
        #[test]
        fn $name() {
            let grammar = load(stringify!($name));
            eprintln!("grammar:\n{}", grammar);
            let construction = construct(&grammar, grammar.start_symbol());
            eprintln!("automaton:\n---\n{}", construction.automaton.display());
            eprintln!("table:\n---\n{}", construction.table.display());
            assert!(!construction.automaton.states.is_empty());
        }
    )*};
}

define_smoketests! {
    s_asb,
    unit_chain,
    ambiguous,
    expr,
    dyck,
    palindrome,
    epsilon_cycle,
    independent_epsilons,
    dead,
}

#[test]
fn recognize_s_asb() {
    check(
        "s_asb",
        &["ab", "aabb", "aaabbb"],
        &["", "a", "b", "ba", "abab", "aabbb", "aab", "abc"],
    );
}

#[test]
fn recognize_unit_chain() {
    check("unit_chain", &["a"], &["", "aa", "A"]);
}

#[test]
fn recognize_ambiguous() {
    check("ambiguous", &["", "a", "aa", "aaaaa"], &["b", "ab"]);
}

#[test]
fn recognize_expr() {
    check(
        "expr",
        &["i", "ipi", "imi", "ipimi", "lipirmi", "llirr"],
        &["", "p", "ip", "lir r", "lipi", "ii", "ril"],
    );
}

#[test]
fn recognize_dyck() {
    check(
        "dyck",
        &["", "lr", "lrlr", "llrr", "llrlrr"],
        &["l", "r", "rl", "lrr", "llr"],
    );
}

#[test]
fn recognize_palindromes() {
    // not LR(k) for any k, but all alternatives are explored.
    check(
        "palindrome",
        &["", "a", "b", "aa", "aba", "abba", "babbab"],
        &["ab", "ba", "abb", "aab", "abab"],
    );
}

#[test]
fn empty_reduction_cycles_terminate() {
    check("epsilon_cycle", &["a"], &["", "aa", "s"]);
}

#[test]
fn independent_empty_nonterminals() {
    check(
        "independent_epsilons",
        &["a"],
        &["", "aa", "aaab", "aaaaaaaaaaaaaaaa"],
    );
}

#[test]
fn long_input() {
    let grammar = load("s_asb");
    let construction = construct(&grammar, grammar.start_symbol());

    let mut word = "a".repeat(20_000);
    word.push_str(&"b".repeat(20_000));
    assert!(construction.recognize(&word));

    word.pop();
    assert!(!construction.recognize(&word));
}

#[test]
fn dead_nonterminals() {
    check("dead", &["s"], &["", "ss"]);
}

#[test]
fn eliminating_unit_rules_preserves_language() {
    for name in [
        "expr",
        "unit_chain",
        "epsilon_cycle",
        "independent_epsilons",
        "dead",
        "ambiguous",
    ] {
        let grammar = load(name);
        let plain = Config::new().build(&grammar);
        let eliminated = Config::new().eliminate_unit_rules(true).build(&grammar);

        let alphabet: Vec<char> = plain
            .table
            .terminals()
            .iter()
            .filter_map(|symbol| symbol.as_str().chars().next())
            .collect();
        for word in words(&alphabet, 4) {
            assert_eq!(
                plain.recognize(&word),
                eliminated.recognize(&word),
                "{}: `{}'",
                name,
                word
            );
        }
    }
}

#[test]
fn primed_start_symbol() {
    let grammar = Grammar::define(|g| {
        g.rule("S'", ["a", "S"])?;
        g.rule("S", ["b"])?;
        g.rule("S''", ["c"])?;
        Ok(())
    })
    .unwrap();
    let construction = construct(&grammar, grammar.start_symbol());
    assert_eq!(construction.automaton.augmented_start, Symbol::from("S'''"));
    assert!(construction.recognize("ab"));
    assert!(!construction.recognize("b"));
    assert!(!construction.recognize("c"));
}

#[test]
fn undefined_start_symbol() {
    let grammar = load("s_asb");
    let construction = construct(&grammar, &Symbol::from("T"));
    assert!(!construction.recognize(""));
    assert!(!construction.recognize("ab"));
}

#[test]
fn reserved_characters_are_rejected() {
    let grammar = load("ambiguous");
    let construction = construct(&grammar, grammar.start_symbol());
    assert!(!construction.recognize("$"));
    assert!(!construction.recognize("a$"));
    assert!(!construction.recognize("ε"));
}
