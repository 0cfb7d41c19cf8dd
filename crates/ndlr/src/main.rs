use anyhow::Context as _;
use clap::Parser;
use ndlr::{grammar::Grammar, Config};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path of grammar definition file.
    grammar: PathBuf,

    /// The words to be recognized.
    words: Vec<String>,

    /// Read additional words from the file, one per line.
    #[arg(long, value_name = "FILE")]
    words_file: Option<PathBuf>,

    /// Eliminate unit production rules before building the automaton.
    #[arg(long)]
    eliminate_unit_rules: bool,

    /// Print the grammar used for the construction.
    #[arg(long)]
    dump_grammar: bool,

    /// Print the states and transitions of the LR(0) automaton.
    #[arg(long)]
    dump_automaton: bool,

    /// Print the action and goto tables.
    #[arg(long)]
    dump_table: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let grammar = Grammar::from_file(&args.grammar).with_context(|| {
        anyhow::anyhow!("failed to load the grammar from {}", args.grammar.display())
    })?;

    let mut words = args.words.clone();
    if let Some(words_file) = &args.words_file {
        let content = fs::read_to_string(words_file).with_context(|| {
            anyhow::anyhow!("failed to read the words from {}", words_file.display())
        })?;
        words.extend(content.lines().map(|line| line.trim().to_owned()));
    }

    let construction = Config::new()
        .eliminate_unit_rules(args.eliminate_unit_rules)
        .build(&grammar);
    if args.dump_grammar {
        println!("{}", construction.grammar);
    }
    if args.dump_automaton {
        println!("{}", construction.automaton.display());
    }
    if args.dump_table {
        println!("{}", construction.table.display());
    }

    let num_conflicts = construction.table.conflicts().count();
    if num_conflicts > 0 {
        let suffix = if num_conflicts == 1 { "" } else { "s" };
        eprintln!(
            "[info] The parse table has {} cell{} with multiple actions.",
            num_conflicts, suffix
        );
    }

    for word in &words {
        let verdict = if construction.recognize(word) {
            "accepted"
        } else {
            "rejected"
        };
        println!("{}: {}", word, verdict);
    }

    Ok(())
}
