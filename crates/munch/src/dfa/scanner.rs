//! Maximal-munch tokenization over a tagged [`Dfa`]

use std::{fmt, iter::FusedIterator};

use tracing::trace;

use super::Dfa;
use crate::nfa::{StateId, Tag};

/// A single token matched by a [`Scanner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'a> {
    /// The name of the token definition that matched
    pub name: &'a str,
    /// The matched slice of the input
    pub lexeme: &'a str,
}

/// Where in the input a scan failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// The character offset (not the byte offset) of the offending character
    Offset(usize),
    /// The input ended in the middle of a token
    Eof,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(o) => write!(f, "{o}"),
            Self::Eof => f.write_str("EOF"),
        }
    }
}

/// An error raised when no token definition matches at some point in the
/// input
///
/// `line` counts the newlines before the failure, and is therefore
/// zero-based.  For a failure at the end of input the last character of the
/// input is not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("No viable alternative at character {at}, line {line}")]
pub struct LexError {
    /// The failing position
    pub at: Position,
    /// The number of newlines preceding the failing position, or preceding
    /// the last character for [`Position::Eof`]
    pub line: usize,
}

/// Iterator over the tokens of an input string
///
/// The scanner always prefers the longest match, breaking ties between
/// matches of equal length by tag rank.  After yielding an error it yields
/// nothing further.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    dfa: &'a Dfa,
    input: &'a str,
    chars: Vec<(usize, char)>,
    /// Index into `chars` of the next character to consume
    pos: usize,
    /// Index into `chars` of the start of the current lexeme
    start: usize,
    state: StateId,
    last_accept: Option<(usize, &'a Tag)>,
    done: bool,
}

impl<'a> Scanner<'a> {
    /// Start scanning `input` from the beginning with the given automaton
    #[must_use]
    pub fn new(dfa: &'a Dfa, input: &'a str) -> Self {
        Self {
            dfa,
            input,
            chars: input.char_indices().collect(),
            pos: 0,
            start: 0,
            state: dfa.start(),
            last_accept: None,
            done: false,
        }
    }

    fn byte_offset(&self, pos: usize) -> usize {
        self.chars.get(pos).map_or(self.input.len(), |&(i, _)| i)
    }

    fn newlines_before(&self, pos: usize) -> usize {
        self.chars[..pos].iter().filter(|&&(_, c)| c == '\n').count()
    }

    /// Emit the longest match found so far and rewind to just after it
    fn accept(&mut self, end: usize, tag: &'a Tag) -> Token<'a> {
        let lexeme = &self.input[self.byte_offset(self.start)..self.byte_offset(end)];
        let tok = Token {
            name: tag.name(),
            lexeme,
        };
        trace!(name = tok.name, lexeme, "Scanned token");

        self.start = end;
        self.pos = end;
        self.state = self.dfa.start();

        tok
    }

    fn fail(&mut self, at: Position, before: usize) -> LexError {
        self.done = true;
        LexError {
            at,
            line: self.newlines_before(before),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let Some(&(_, c)) = self.chars.get(self.pos) else {
                if let Some((end, tag)) = self.last_accept.take() {
                    return Some(Ok(self.accept(end, tag)));
                }

                if self.start == self.chars.len() {
                    self.done = true;
                    return None;
                }

                let last = self.chars.len().saturating_sub(1);
                return Some(Err(self.fail(Position::Eof, last)));
            };

            self.state = self.dfa.step(self.state, c);
            self.pos += 1;

            if let Some(tag) = self.dfa.tag(self.state) {
                self.last_accept = Some((self.pos, tag));
            } else if self.dfa.is_sink(self.state) {
                if let Some((end, tag)) = self.last_accept.take() {
                    return Some(Ok(self.accept(end, tag)));
                }

                let at = self.pos - 1;
                return Some(Err(self.fail(Position::Offset(at), at)));
            }
        }
    }
}

impl FusedIterator for Scanner<'_> {}
