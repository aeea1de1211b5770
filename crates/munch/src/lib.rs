//! Lexer generator: compiles named regular expressions into a single DFA and
//! scans text with maximal-munch, rank-ordered semantics

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

mod closure_builder;
pub mod dfa;
pub mod dot;
pub mod lexer;
pub mod nfa;
pub mod re;

pub use dfa::Dfa;
pub use lexer::{LexError, Lexer, LexerError, Token, TokenConfig};
pub use nfa::{Nfa, StateId, Tag};
pub use re::{PatternError, Regex};

#[cfg(any(test, feature = "proptest"))]
pub mod prop {
    //! Strategies shared by the test suites and the fuzz crate

    use proptest::prelude::*;

    /// Characters that are safe to use as bare literals in an infix pattern
    pub fn symbol() -> impl Strategy<Value = char> + Clone { prop::char::range('a', 'd') }
}
