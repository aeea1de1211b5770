//! Lexers assembled from ordered lists of named patterns

use indexmap::IndexMap;
use tracing::debug;

pub use crate::dfa::scanner::{LexError, Position, Scanner, Token};
use crate::{
    dfa::Dfa,
    nfa::{Nfa, Tag},
    re::{self, PatternError},
};

/// Token definitions, mapping names to infix patterns
///
/// Earlier entries take priority over later ones when two tokens match
/// lexemes of the same length.
pub type TokenConfig = IndexMap<String, String>;

/// An error encountered while building a [`Lexer`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// A token's pattern could not be parsed
    #[error("Invalid pattern for token {name:?}")]
    Pattern {
        /// The name of the token
        name: String,
        /// The parse error
        #[source]
        source: PatternError,
    },
    /// The token list was empty
    #[error("No tokens were defined")]
    NoTokens,
}

/// A compiled lexer
#[derive(Debug, Clone)]
pub struct Lexer {
    nfa: Nfa,
    dfa: Dfa,
}

impl Lexer {
    /// Compile a lexer from `(name, pattern)` pairs, in priority order
    ///
    /// # Errors
    /// Returns an error if `config` is empty or any pattern fails to parse.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn new<I: IntoIterator<Item = (K, V)>, K: AsRef<str>, V: AsRef<str>>(
        config: I,
    ) -> Result<Self, LexerError> {
        let nfas = config
            .into_iter()
            .enumerate()
            .map(|(rank, (name, pattern))| {
                let name = name.as_ref();

                re::to_prenex(pattern.as_ref())
                    .and_then(|p| Nfa::from_prenex(&p))
                    .map(|mut nfa| {
                        nfa.tag_final(&Tag::new(name, rank));
                        nfa
                    })
                    .map_err(|source| LexerError::Pattern {
                        name: name.into(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tokens = nfas.len();
        let nfa = Nfa::merge(nfas).ok_or(LexerError::NoTokens)?;
        let dfa = Dfa::from_nfa(&nfa);

        debug!(
            tokens,
            nfa_states = nfa.len(),
            dfa_states = dfa.len(),
            alphabet = nfa.alphabet().len(),
            "Lexer compiled"
        );

        Ok(Self { nfa, dfa })
    }

    /// The combined automaton over every token definition
    #[inline]
    #[must_use]
    pub fn nfa(&self) -> &Nfa { &self.nfa }

    /// The deterministic automaton driving [`Lexer::scan`]
    #[inline]
    #[must_use]
    pub fn dfa(&self) -> &Dfa { &self.dfa }

    /// Lazily split `input` into tokens
    #[inline]
    #[must_use]
    pub fn scan<'a>(&'a self, input: &'a str) -> Scanner<'a> { Scanner::new(&self.dfa, input) }

    /// Split all of `input` into tokens
    ///
    /// # Errors
    /// Returns an error if some part of the input matches no token.
    pub fn lex<'a>(&'a self, input: &'a str) -> Result<Vec<Token<'a>>, LexError> {
        self.scan(input).collect()
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{Lexer, LexerError, TokenConfig};
    use crate::re::PatternError;

    fn lexer(tokens: &[(&str, &str)]) -> Lexer {
        Lexer::new(tokens.iter().copied()).unwrap_or_else(|e| panic!("Error building lexer: {e}"))
    }

    #[track_caller]
    fn assert_lex(lexer: &Lexer, input: &str, expected: &[(&str, &str)]) {
        let toks: Vec<_> = lexer
            .lex(input)
            .unwrap_or_else(|e| panic!("Error lexing {input:?}: {e}"))
            .into_iter()
            .map(|t| (t.name, t.lexeme))
            .collect();

        assert_eq!(toks, expected, "Wrong tokens for {input:?}");
    }

    #[track_caller]
    fn assert_fails(lexer: &Lexer, input: &str, expected: &str) {
        match lexer.lex(input) {
            Ok(t) => panic!("Lexing {input:?} should fail, got {t:?}"),
            Err(e) => assert_eq!(e.to_string(), expected, "Wrong error for {input:?}"),
        }
    }

    #[test]
    fn concat() {
        let lex = lexer(&[("A", "a"), ("BC", "bc"), ("DEF", "def")]);

        assert_lex(&lex, "a", &[("A", "a")]);
        assert_lex(&lex, "aa", &[("A", "a"), ("A", "a")]);
        assert_lex(&lex, "abca", &[("A", "a"), ("BC", "bc"), ("A", "a")]);
        assert_lex(&lex, "abcdefdefbca", &[
            ("A", "a"),
            ("BC", "bc"),
            ("DEF", "def"),
            ("DEF", "def"),
            ("BC", "bc"),
            ("A", "a"),
        ]);
        assert_lex(&lex, "", &[]);
    }

    #[test]
    fn union() {
        let lex = lexer(&[("AorB", "a|b"), ("DorE", "d|e")]);

        assert_lex(&lex, "abba", &[
            ("AorB", "a"),
            ("AorB", "b"),
            ("AorB", "b"),
            ("AorB", "a"),
        ]);
        assert_lex(&lex, "adbeb", &[
            ("AorB", "a"),
            ("DorE", "d"),
            ("AorB", "b"),
            ("DorE", "e"),
            ("AorB", "b"),
        ]);
    }

    #[test]
    fn priority() {
        let lex = lexer(&[("smallA", "a"), ("bigA", "aaaa")]);

        assert_lex(&lex, "a", &[("smallA", "a")]);
        assert_lex(&lex, "aa", &[("smallA", "a"), ("smallA", "a")]);
        assert_lex(&lex, "aaaa", &[("bigA", "aaaa")]);
        assert_lex(&lex, "aaaaaa", &[
            ("bigA", "aaaa"),
            ("smallA", "a"),
            ("smallA", "a"),
        ]);
        assert_lex(&lex, "aaaaaaaa", &[("bigA", "aaaa"), ("bigA", "aaaa")]);

        let lex = lexer(&[("KW", "if"), ("ID", "[a-z]+")]);
        assert_lex(&lex, "if", &[("KW", "if")]);
        assert_lex(&lex, "iff", &[("ID", "iff")]);

        let lex = lexer(&[("ID", "[a-z]+"), ("KW", "if")]);
        assert_lex(&lex, "if", &[("ID", "if")]);
    }

    #[test]
    fn spaces_and_zeros() {
        let lex = lexer(&[("SPACE", "' '"), ("ZEROS", "0+")]);

        assert_lex(&lex, "0000 0", &[
            ("ZEROS", "0000"),
            ("SPACE", " "),
            ("ZEROS", "0"),
        ]);
        assert_lex(&lex, " 0000", &[("SPACE", " "), ("ZEROS", "0000")]);
        assert_lex(&lex, "0 00 000 ", &[
            ("ZEROS", "0"),
            ("SPACE", " "),
            ("ZEROS", "00"),
            ("SPACE", " "),
            ("ZEROS", "000"),
            ("SPACE", " "),
        ]);
    }

    #[test]
    fn ones_and_twos() {
        let lex = lexer(&[("TWO", "2"), ("PATTERN", "11*(00)*101(0|1)(0|1)*")]);

        assert_lex(&lex, "1001010", &[("PATTERN", "1001010")]);
        assert_lex(&lex, "2110000101112", &[
            ("TWO", "2"),
            ("PATTERN", "11000010111"),
            ("TWO", "2"),
        ]);
        assert_lex(&lex, "111100001010211011", &[
            ("PATTERN", "111100001010"),
            ("TWO", "2"),
            ("PATTERN", "11011"),
        ]);
        assert_lex(&lex, "2211100000010111011000110110010022", &[
            ("TWO", "2"),
            ("TWO", "2"),
            ("PATTERN", "111000000101110110001101100100"),
            ("TWO", "2"),
            ("TWO", "2"),
        ]);
    }

    #[test]
    fn plus_and_star() {
        let lex = lexer(&[("C", "c"), ("ABS", "(ab)+"), ("BS", "b+")]);

        assert_lex(&lex, "ab", &[("ABS", "ab")]);
        assert_lex(&lex, "bbbbb", &[("BS", "bbbbb")]);
        assert_lex(&lex, "bbab", &[("BS", "bb"), ("ABS", "ab")]);
        assert_lex(&lex, "abababcb", &[("ABS", "ababab"), ("C", "c"), ("BS", "b")]);
        assert_lex(&lex, "bbbcbbabbc", &[
            ("BS", "bbb"),
            ("C", "c"),
            ("BS", "bb"),
            ("ABS", "ab"),
            ("BS", "b"),
            ("C", "c"),
        ]);
    }

    #[test]
    fn whitespace() {
        let lex = lexer(&[
            ("SPACE", "' '"),
            ("NEWLINE", "'\n'"),
            ("PATTERN1", "1' '0"),
            ("PATTERN2", "(10)+"),
            ("PATTERN3", "' '001' '"),
            ("PATTERN4", "(101' ')+"),
            ("PATTERN5", "1*01"),
        ]);

        assert_lex(&lex, "1 0", &[("PATTERN1", "1 0")]);
        assert_lex(&lex, "1 0 001 1 010 ", &[
            ("PATTERN1", "1 0"),
            ("PATTERN3", " 001 "),
            ("PATTERN1", "1 0"),
            ("PATTERN2", "10"),
            ("SPACE", " "),
        ]);
        assert_lex(&lex, "1 0 \n  001 1 0", &[
            ("PATTERN1", "1 0"),
            ("SPACE", " "),
            ("NEWLINE", "\n"),
            ("SPACE", " "),
            ("PATTERN3", " 001 "),
            ("PATTERN1", "1 0"),
        ]);
        assert_lex(&lex, "101 101 1 01010  ", &[
            ("PATTERN4", "101 101 "),
            ("PATTERN1", "1 0"),
            ("PATTERN2", "1010"),
            ("SPACE", " "),
            ("SPACE", " "),
        ]);
        assert_lex(&lex, "11101\n1 0  001 101 ", &[
            ("PATTERN5", "11101"),
            ("NEWLINE", "\n"),
            ("PATTERN1", "1 0"),
            ("SPACE", " "),
            ("PATTERN3", " 001 "),
            ("PATTERN4", "101 "),
        ]);
    }

    #[test]
    fn diverse() {
        let lex = lexer(&[
            ("SPACE", "' '"),
            ("DS", "d+"),
            ("ABS", "(ab)+"),
            ("ABCORC", "(abc)|c"),
            ("APLUSCD", "(a+)cd"),
            ("ABD", "abd"),
        ]);

        assert_lex(&lex, " acdaacdabd", &[
            ("SPACE", " "),
            ("APLUSCD", "acd"),
            ("APLUSCD", "aacd"),
            ("ABD", "abd"),
        ]);
        assert_lex(&lex, "abababcababdd", &[
            ("ABS", "ababab"),
            ("ABCORC", "c"),
            ("ABS", "abab"),
            ("DS", "dd"),
        ]);
        assert_lex(&lex, "ddddd acd abccdddddd ", &[
            ("DS", "ddddd"),
            ("SPACE", " "),
            ("APLUSCD", "acd"),
            ("SPACE", " "),
            ("ABCORC", "abc"),
            ("ABCORC", "c"),
            ("DS", "dddddd"),
            ("SPACE", " "),
        ]);
    }

    #[test]
    fn complex() {
        let lex = lexer(&[
            ("SPACE", "' '"),
            ("NEWLINE", "'\n'"),
            ("PATTERN1", "((b+|e)(a*|b+))+((e+fd)*|(c+a*)*)"),
            ("PATTERN2", "(((db)|d+)*(da)*(dc)*)|((dc)+|(a+|b+))+"),
            ("PATTERN3", "((e|(db))+|(e+e(e|f*)))+"),
            ("PATTERN4", "(((f*a+)|(a*d+))|((a*|e)daf+))+"),
            ("PATTERN5", "(((c|d)|f*)*|((f|a)+|(b|c)+))+"),
        ]);

        assert_lex(
            &lex,
            "babbbaadcabaaabbabdcbdcbdcbbbefdefdefdeeefdeefdeefddabbfcdadbacdcfcdcbcfddba\n",
            &[
                ("PATTERN2", "babbbaadcabaaabbabdcbdcbdcbbb"),
                ("PATTERN1", "e"),
                ("PATTERN5", "fd"),
                ("PATTERN1", "e"),
                ("PATTERN5", "fd"),
                ("PATTERN1", "e"),
                ("PATTERN5", "fd"),
                ("PATTERN1", "eeefdeefdeefd"),
                ("PATTERN5", "dabbfcdadbacdcfcdcbcfddba"),
                ("NEWLINE", "\n"),
            ],
        );
        assert_lex(
            &lex,
            "eefeefeeffdbedbedbedbdbee eefdefdeeeeeefdeefdefdeefd ",
            &[
                ("PATTERN3", "eefeefeeffdbedbedbedbdbee"),
                ("SPACE", " "),
                ("PATTERN1", "eefdefdeeeeeefdeefdefdeefd"),
                ("SPACE", " "),
            ],
        );
        assert_lex(
            &lex,
            "\needbeeeeeedbeefeeefffdbdb\ndbafcacdcfffdfbdcfbfccdad \nebbbacacacaccaaaacccaaaca",
            &[
                ("NEWLINE", "\n"),
                ("PATTERN3", "eedbeeeeeedbeefeeefffdbdb"),
                ("NEWLINE", "\n"),
                ("PATTERN5", "dbafcacdcfffdfbdcfbfccdad"),
                ("SPACE", " "),
                ("NEWLINE", "\n"),
                ("PATTERN1", "ebbbacacacaccaaaacccaaaca"),
            ],
        );
    }

    #[test]
    fn simple_errors() {
        let lex = lexer(&[("NEWLINE", "'\n'"), ("ABC", "a(b+)c")]);

        assert_fails(&lex, "a zzzz", "No viable alternative at character 1, line 0");
        assert_fails(&lex, "z zzzz", "No viable alternative at character 0, line 0");
        assert_fails(&lex, "abb zzzz", "No viable alternative at character 3, line 0");
        assert_fails(&lex, "a", "No viable alternative at character EOF, line 0");
        assert_fails(&lex, "abbb", "No viable alternative at character EOF, line 0");
        assert_fails(
            &lex,
            "abbbc\nabc\n\n\nabbbbbc\nabbbbb",
            "No viable alternative at character EOF, line 5",
        );
        assert_fails(&lex, "abc\nabc\nz", "No viable alternative at character 8, line 2");
        assert_fails(&lex, "abc\nabb\n", "No viable alternative at character 7, line 1");

        let lex = lexer(&[("A", "a'\n'b")]);
        assert_fails(&lex, "a\n", "No viable alternative at character EOF, line 0");
        assert_fails(&lex, "a\nba\n", "No viable alternative at character EOF, line 1");
    }

    #[test]
    fn complex_errors() {
        let lex = lexer(&[
            ("SPACE", "' '"),
            ("ABC", "a(b+)c"),
            ("AS", "(a)+"),
            ("BCS", "(bc)+"),
            ("DORC", "(d|c)+"),
        ]);

        assert_fails(
            &lex,
            "abcbcbcaabaad dccbca",
            "No viable alternative at character 10, line 0",
        );
        assert_fails(
            &lex,
            "d abdbc ccddabbbc",
            "No viable alternative at character 4, line 0",
        );
        assert_fails(
            &lex,
            "e abbbcbcaadc c",
            "No viable alternative at character 0, line 0",
        );
        assert_fails(
            &lex,
            "dccbcbcaaaa abbcf",
            "No viable alternative at character 16, line 0",
        );
        assert_fails(
            &lex,
            "abbcaaabc dcccabcb",
            "No viable alternative at character EOF, line 0",
        );
        assert_fails(
            &lex,
            "babbcbcbc abbbcaabc",
            "No viable alternative at character 1, line 0",
        );
    }

    #[test]
    fn lazy_scan() {
        let lex = lexer(&[("A", "a")]);
        let mut scan = lex.scan("aab");
        assert_eq!(scan.next().map(|t| t.map(|t| t.lexeme)), Some(Ok("a")));
        assert_eq!(scan.next().map(|t| t.map(|t| t.lexeme)), Some(Ok("a")));
        assert!(matches!(scan.next(), Some(Err(_))));
        assert!(scan.next().is_none());
    }

    #[test]
    fn config() {
        let config: TokenConfig = [("NUM", "[0-9]+"), ("WS", "' '+")]
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let lex = Lexer::new(&config).unwrap();
        assert_lex(&lex, "12 3", &[("NUM", "12"), ("WS", " "), ("NUM", "3")]);

        assert_eq!(
            Lexer::new(TokenConfig::new()).unwrap_err(),
            LexerError::NoTokens
        );
        assert_eq!(
            Lexer::new([("OK", "a"), ("BAD", "(b")]).unwrap_err(),
            LexerError::Pattern {
                name: "BAD".into(),
                source: PatternError::UnclosedGroup(0),
            }
        );
    }

    #[test]
    fn shared() {
        let lex = lexer(&[("A", "a+"), ("B", "b")]);

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| assert_lex(&lex, "aaba", &[("A", "aa"), ("B", "b"), ("A", "a")]));
            }
        });
    }

    proptest! {
        #[test]
        fn idempotent(s in "[a-d ]{0,24}") {
            let lex = lexer(&[("A", "a+"), ("AB", "ab"), ("CD", "c*d"), ("SP", "' '")]);
            assert_eq!(lex.lex(&s), lex.lex(&s));
        }

        #[test]
        fn covers_input(s in "[a-d]{0,24}") {
            let lex = lexer(&[("A", "a+"), ("B", "b|ab"), ("C", "c*d?")]);
            let toks = lex.lex(&s).unwrap();

            assert!(toks.iter().all(|t| !t.lexeme.is_empty()));
            assert_eq!(toks.iter().map(|t| t.lexeme).collect::<String>(), s);
        }

        #[test]
        fn longest_wins(n in 1_usize..32) {
            let lex = lexer(&[("ONE", "a"), ("MANY", "a+")]);
            let s = "a".repeat(n);
            let toks = lex.lex(&s).unwrap();

            assert_eq!(toks.len(), 1);
            assert_eq!(toks[0].name, if n == 1 { "ONE" } else { "MANY" });
        }
    }
}
