//! Compile a set of named patterns into a lexer and tokenize a file with it

#![deny(
    clippy::disallowed_methods,
    clippy::suspicious,
    clippy::style,
    clippy::clone_on_ref_ptr,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::module_name_repetitions)]

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use munch::{Lexer, Token, re};
use tracing::{error, info, instrument};
use tracing_subscriber::{
    EnvFilter,
    fmt::format::{DefaultFields, Format},
    prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Automaton {
    Nfa,
    Dfa,
}

#[derive(Debug, clap::Parser)]
#[command(version, author, about)]
struct Opts {
    /// Log filter, using env_logger-like syntax
    #[arg(long, env = "RUST_LOG")]
    log_filter: Option<String>,

    /// A token definition, in priority order
    #[arg(
        short,
        long = "token",
        value_name = "NAME=PATTERN",
        required = true,
        value_parser = parse_token,
    )]
    tokens: Vec<(String, String)>,

    /// Print the prenex form of each pattern and exit
    #[arg(long, conflicts_with = "dot")]
    prenex: bool,

    /// Print the combined automaton in Graphviz format and exit
    #[arg(long, value_enum)]
    dot: Option<Automaton>,

    /// Include the sink state when printing a DFA
    #[arg(long, requires = "dot")]
    show_sink: bool,

    /// The file to tokenize, or standard input if omitted
    file: Option<PathBuf>,
}

fn parse_token(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, pattern)) if !name.is_empty() => Ok((name.into(), pattern.into())),
        _ => Err(format!("Expected NAME=PATTERN, got {s:?}")),
    }
}

macro_rules! init_error {
    ($($args:tt)*) => ({
        ::tracing::error!($($args)*);
        ::std::process::exit(1);
    })
}

fn fmt_layer<S>() -> tracing_subscriber::fmt::Layer<S, DefaultFields, Format, fn() -> io::Stderr> {
    tracing_subscriber::fmt::layer().with_writer(io::stderr as fn() -> io::Stderr)
}

#[instrument(name = "init_logger", skip(log_filter))]
fn init_subscriber(log_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(log_filter)
                .unwrap_or_else(|e| init_error!("Invalid log filter {log_filter:?}: {e}")),
        )
        .with(fmt_layer())
        .try_init()
        .unwrap_or_else(|e| init_error!("Error initializing logger: {e}"));
}

fn main() {
    let tmp_logger =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(fmt_layer()));

    let opts: Opts = clap::Parser::parse();
    init_subscriber(opts.log_filter.as_deref().unwrap_or("warn"));
    drop(tmp_logger);

    if let Err(e) = run(opts) {
        error!("{e:?}");
        std::process::exit(1);
    }
}

fn run(opts: Opts) -> Result<()> {
    let Opts {
        log_filter: _,
        tokens,
        prenex,
        dot,
        show_sink,
        file,
    } = opts;

    if prenex {
        for (name, pattern) in &tokens {
            let prenex = re::to_prenex(pattern)
                .with_context(|| format!("Invalid pattern for token {name:?}"))?;
            println!("{name}\t{prenex}");
        }

        return Ok(());
    }

    let lexer = Lexer::new(tokens.iter().map(|(k, v)| (k, v))).context("Error building lexer")?;

    match dot {
        Some(Automaton::Nfa) => {
            println!("{}", lexer.nfa().dot());
            return Ok(());
        },
        Some(Automaton::Dfa) => {
            println!("{}", lexer.dfa().dot(show_sink));
            return Ok(());
        },
        None => (),
    }

    let input = if let Some(path) = &file {
        fs::read_to_string(path).with_context(|| format!("Error reading {path:?}"))?
    } else {
        let mut s = String::new();
        io::stdin()
            .read_to_string(&mut s)
            .context("Error reading standard input")?;
        s
    };

    let mut out = io::stdout().lock();
    let mut count = 0_usize;

    for tok in lexer.scan(&input) {
        let Token { name, lexeme } = tok?;
        writeln!(out, "{name}\t{lexeme:?}").context("Error writing output")?;
        count += 1;
    }

    info!(count, "Tokenized input");
    Ok(())
}
