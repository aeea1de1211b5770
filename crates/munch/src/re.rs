//! Regular expression trees and their prenex (prefix) rendering

use std::fmt;

pub mod prenex;
pub mod syntax;

pub use syntax::{parse, to_prenex};

/// A parsed regular expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Regex {
    /// Either operand
    Union(Box<Regex>, Box<Regex>),
    /// Left operand followed by right operand
    Concat(Box<Regex>, Box<Regex>),
    /// Zero or more repetitions
    Star(Box<Regex>),
    /// One or more repetitions, equivalent to `Concat(x, Star(x))`
    Plus(Box<Regex>),
    /// Zero or one occurrence, equivalent to `Union(Eps, x)`
    Maybe(Box<Regex>),
    /// The empty string
    Eps,
    /// The empty language
    Void,
    /// A single literal character
    Lit(char),
    /// A literal character written as `'c'`, which keeps its quotes in
    /// prenex notation
    Quoted(char),
}

impl Regex {
    /// Match either `lhs` or `rhs`
    #[inline]
    #[must_use]
    pub fn union(lhs: Self, rhs: Self) -> Self { Self::Union(lhs.into(), rhs.into()) }

    /// Match `lhs` followed by `rhs`
    #[inline]
    #[must_use]
    pub fn concat(lhs: Self, rhs: Self) -> Self { Self::Concat(lhs.into(), rhs.into()) }

    /// Match zero or more repetitions of `inner`
    #[inline]
    #[must_use]
    pub fn star(inner: Self) -> Self { Self::Star(inner.into()) }

    /// Match one or more repetitions of `inner`
    #[inline]
    #[must_use]
    pub fn plus(inner: Self) -> Self { Self::Plus(inner.into()) }

    /// Match `inner` or the empty string
    #[inline]
    #[must_use]
    pub fn maybe(inner: Self) -> Self { Self::Maybe(inner.into()) }

    /// A literal for `c`, quoted if `c` could not be written bare
    #[must_use]
    pub fn lit(c: char) -> Self {
        if needs_quotes(c) {
            Self::Quoted(c)
        } else {
            Self::Lit(c)
        }
    }

    /// Concatenate the characters of `s` into a single expression, or
    /// [`Regex::Eps`] if `s` is empty
    #[must_use]
    pub fn literal(s: &str) -> Self {
        let mut chars = s.chars().rev();
        let Some(last) = chars.next() else {
            return Self::Eps;
        };

        chars.fold(Self::lit(last), |r, c| Self::concat(Self::lit(c), r))
    }

    fn keyword(&self) -> Option<&'static str> {
        Some(match self {
            Self::Union(..) => "UNION",
            Self::Concat(..) => "CONCAT",
            Self::Star(_) => "STAR",
            Self::Plus(_) => "PLUS",
            Self::Maybe(_) => "MAYBE",
            Self::Eps => "eps",
            Self::Void => "void",
            Self::Lit(_) | Self::Quoted(_) => return None,
        })
    }
}

/// Whether a literal must be wrapped in single quotes to survive a trip
/// through prenex or infix notation
pub(crate) fn needs_quotes(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '\'' | '(' | ')' | '[' | ']' | '|' | '*' | '+' | '?')
}

/// Renders the expression in prenex notation, e.g. `CONCAT a STAR b`
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(kw) = self.keyword() {
            f.write_str(kw)?;
        }

        match self {
            Self::Union(l, r) | Self::Concat(l, r) => write!(f, " {l} {r}"),
            Self::Star(r) | Self::Plus(r) | Self::Maybe(r) => write!(f, " {r}"),
            Self::Eps | Self::Void => Ok(()),
            &Self::Lit(c) if !needs_quotes(c) => write!(f, "{c}"),
            Self::Lit(c) | Self::Quoted(c) => write!(f, "'{c}'"),
        }
    }
}

/// An error encountered while reading an infix pattern or a prenex string
///
/// All positions are character offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The input, or a parenthesized group starting at the given offset,
    /// contains no expression
    #[error("Empty expression at {0}")]
    Empty(usize),
    /// An infix operator is missing one of its operands
    #[error("Missing operand for {op:?} at {at}")]
    MissingOperand {
        /// The operator symbol
        op: char,
        /// Offset of the operator
        at: usize,
    },
    /// A `)` with no matching `(`
    #[error("Found extraneous right parenthesis at {0}")]
    UnmatchedClose(usize),
    /// A `(` with no matching `)`
    #[error("Unclosed parenthesis at {0}")]
    UnclosedGroup(usize),
    /// A `[` not followed by `x-y]`
    #[error("Malformed character class at {0}, expected [x-y]")]
    MalformedClass(usize),
    /// A `[x-y]` class whose bounds are not an ascending digit, lowercase or
    /// uppercase range
    #[error("Character class {start:?}-{end:?} at {at} does not describe a digit or letter range")]
    EmptyClass {
        /// Lower bound as written
        start: char,
        /// Upper bound as written
        end: char,
        /// Offset of the opening bracket
        at: usize,
    },
    /// A `'` not followed by a character and a closing `'`
    #[error("Unterminated quoted character at {0}")]
    UnterminatedQuote(usize),
    /// A `]` outside of a character class
    #[error("Found stray right bracket at {0}")]
    StrayBracket(usize),
    /// A prenex word that is not a keyword, a single character or a quoted
    /// character
    #[error("Unknown prenex symbol {word:?} at {at}")]
    UnknownSymbol {
        /// The offending word
        word: String,
        /// Offset of the start of the word
        at: usize,
    },
    /// A prenex keyword without enough operands after it
    #[error("Missing operand for {keyword} at {at}")]
    MissingPrenexOperand {
        /// The keyword missing an operand
        keyword: &'static str,
        /// Offset of the keyword
        at: usize,
    },
    /// A prenex string holding more than one complete expression
    #[error("Found {0} trailing operands in prenex expression")]
    TrailingOperands(usize),
}

#[cfg(any(test, feature = "proptest"))]
pub use prop::*;

#[cfg(any(test, feature = "proptest"))]
mod prop {
    use proptest::prelude::*;

    use super::Regex;

    /// Generate arbitrary expression trees over the given literal strategy
    ///
    /// Characters that need quotes are always generated as
    /// [`Regex::Quoted`], so every tree renders to prenex and reads back
    /// unchanged.
    pub fn re(
        depth: u32,
        tree_size: u32,
        chr: impl Strategy<Value = char> + Clone + 'static,
    ) -> impl Strategy<Value = Regex> {
        prop_oneof![
            5 => chr.clone().prop_map(Regex::lit),
            1 => chr.prop_map(Regex::Quoted),
            1 => Just(Regex::Eps),
            1 => Just(Regex::Void),
        ]
        .prop_recursive(depth, tree_size, 2, |s| {
            prop_oneof![
                (s.clone(), s.clone()).prop_map(|(l, r)| Regex::union(l, r)),
                (s.clone(), s.clone()).prop_map(|(l, r)| Regex::concat(l, r)),
                s.clone().prop_map(Regex::star),
                s.clone().prop_map(Regex::plus),
                s.prop_map(Regex::maybe),
            ]
        })
    }
}
