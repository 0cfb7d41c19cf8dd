use std::{env, path::PathBuf};

use criterion::{criterion_group, criterion_main, Criterion};
use ndlr::{grammar::Grammar, Config};

criterion_main!(benches);
criterion_group!(benches, bench_construction, bench_recognition);

fn load(grammar_name: &str) -> Grammar {
    let project_root = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .expect("missing environment variable: `CARGO_MANIFEST_DIR'");
    Grammar::from_file(project_root.join(format!("tests/{}.grammar", grammar_name))).unwrap()
}

fn bench_construction(c: &mut Criterion) {
    for grammar_name in ["expr", "palindrome", "epsilon_cycle"] {
        let grammar = load(grammar_name);
        let mut group = c.benchmark_group(grammar_name);
        group.bench_function("plain", |b| {
            b.iter(|| Config::new().build(&grammar));
        });
        group.bench_function("eliminate_unit_rules", |b| {
            b.iter(|| Config::new().eliminate_unit_rules(true).build(&grammar));
        });
        group.finish();
    }
}

fn bench_recognition(c: &mut Criterion) {
    let inputs = [
        ("expr", "lipirmlimipr"),
        ("palindrome", "abbaabbaabba"),
        ("ambiguous", "aaaaaaaa"),
        ("dyck", "llrlrrlr"),
    ];
    let mut group = c.benchmark_group("recognize");
    for (grammar_name, input) in inputs {
        let construction = Config::new().build(&load(grammar_name));
        group.bench_function(grammar_name, |b| {
            b.iter(|| construction.recognize(input));
        });
    }
    group.finish();
}
