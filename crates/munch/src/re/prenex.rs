//! Reader for the prenex notation produced by [`Regex`]'s `Display` impl

use super::{PatternError, Regex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Unary,
    Binary,
}

#[derive(Debug)]
enum Word {
    Keyword(&'static str, Arity),
    Atom(Regex),
}

fn classify(word: &str, at: usize) -> Result<Word, PatternError> {
    Ok(match word {
        "UNION" => Word::Keyword("UNION", Arity::Binary),
        "CONCAT" => Word::Keyword("CONCAT", Arity::Binary),
        "STAR" => Word::Keyword("STAR", Arity::Unary),
        "PLUS" => Word::Keyword("PLUS", Arity::Unary),
        "MAYBE" => Word::Keyword("MAYBE", Arity::Unary),
        "eps" => Word::Atom(Regex::Eps),
        "void" => Word::Atom(Regex::Void),
        w => {
            let mut chars = w.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Word::Atom(Regex::lit(c)),
                _ => {
                    return Err(PatternError::UnknownSymbol {
                        word: w.into(),
                        at,
                    });
                },
            }
        },
    })
}

/// The character quoted as `'c'` at offset `i`, if the closing quote ends
/// the word
fn quoted_at(chars: &[char], i: usize) -> Option<char> {
    match *chars.get(i..)? {
        ['\'', lit, '\''] | ['\'', lit, '\'', ' ', ..] => Some(lit),
        _ => None,
    }
}

fn words(prenex: &str) -> Result<Vec<(Word, usize)>, PatternError> {
    let chars: Vec<char> = prenex.chars().collect();
    let mut out = vec![];
    let mut i = 0;

    while let Some(&c) = chars.get(i) {
        if c == ' ' {
            i += 1;
            continue;
        }

        if let Some(lit) = quoted_at(&chars, i) {
            out.push((Word::Atom(Regex::Quoted(lit)), i));
            i += 3;
            continue;
        }

        let end = chars[i..]
            .iter()
            .position(|&c| c == ' ')
            .map_or(chars.len(), |n| i + n);
        let word: String = chars[i..end].iter().collect();
        out.push((classify(&word, i)?, i));
        i = end;
    }

    Ok(out)
}

/// Read a prenex string such as `CONCAT a STAR b` into an expression tree
///
/// Words are separated by spaces.  Single characters are literals, and any
/// character (including a space) may be quoted as `'c'`.  A quoted character
/// must be followed by a space or the end of the string.
///
/// # Errors
/// Returns an error if the string is empty, contains an unknown word, or
/// has too few or too many operands for its keywords.
pub fn read(prenex: &str) -> Result<Regex, PatternError> {
    let mut stack: Vec<Regex> = vec![];

    for (word, at) in words(prenex)?.into_iter().rev() {
        let re = match word {
            Word::Atom(re) => re,
            Word::Keyword(keyword, arity) => {
                let mut pop = || {
                    stack
                        .pop()
                        .ok_or(PatternError::MissingPrenexOperand { keyword, at })
                };

                match arity {
                    Arity::Unary => {
                        let inner = pop()?;
                        match keyword {
                            "STAR" => Regex::star(inner),
                            "PLUS" => Regex::plus(inner),
                            _ => Regex::maybe(inner),
                        }
                    },
                    Arity::Binary => {
                        let lhs = pop()?;
                        let rhs = pop()?;
                        if keyword == "UNION" {
                            Regex::union(lhs, rhs)
                        } else {
                            Regex::concat(lhs, rhs)
                        }
                    },
                }
            },
        };

        stack.push(re);
    }

    match stack.len() {
        0 => Err(PatternError::Empty(0)),
        1 => Ok(stack.pop().unwrap_or_else(|| unreachable!())),
        n => Err(PatternError::TrailingOperands(n - 1)),
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::read;
    use crate::re::{self, PatternError, Regex};

    #[test]
    fn keywords() {
        assert_eq!(read("eps").unwrap(), Regex::Eps);
        assert_eq!(read("void").unwrap(), Regex::Void);
        assert_eq!(read("a").unwrap(), Regex::Lit('a'));
        assert_eq!(
            read("CONCAT a b").unwrap(),
            Regex::concat(Regex::Lit('a'), Regex::Lit('b'))
        );
        assert_eq!(
            read("STAR UNION a b").unwrap(),
            Regex::star(Regex::union(Regex::Lit('a'), Regex::Lit('b')))
        );
        assert_eq!(
            read("CONCAT UNION b STAR a STAR c").unwrap(),
            Regex::concat(
                Regex::union(Regex::Lit('b'), Regex::star(Regex::Lit('a'))),
                Regex::star(Regex::Lit('c')),
            )
        );
        assert_eq!(
            read("MAYBE PLUS e").unwrap(),
            Regex::maybe(Regex::plus(Regex::Lit('e')))
        );
    }

    #[test]
    fn quoted() {
        assert_eq!(read("' '").unwrap(), Regex::Quoted(' '));
        assert_eq!(read("'\n'").unwrap(), Regex::Quoted('\n'));
        assert_eq!(read("'''").unwrap(), Regex::Quoted('\''));
        assert_eq!(read("'a'").unwrap(), Regex::Quoted('a'));
        assert_eq!(read("*").unwrap(), Regex::Quoted('*'));
        assert_eq!(
            read("CONCAT ' ' '*'").unwrap(),
            Regex::concat(Regex::Quoted(' '), Regex::Quoted('*'))
        );
        assert_eq!(read("CONCAT 'a' b").unwrap().to_string(), "CONCAT 'a' b");
        assert_eq!(read("  UNION  a   b ").unwrap().to_string(), "UNION a b");
    }

    #[test]
    fn errors() {
        assert_eq!(read(""), Err(PatternError::Empty(0)));
        assert_eq!(read("   "), Err(PatternError::Empty(0)));
        assert_eq!(
            read("CONCAT a"),
            Err(PatternError::MissingPrenexOperand {
                keyword: "CONCAT",
                at: 0
            })
        );
        assert_eq!(
            read("STAR"),
            Err(PatternError::MissingPrenexOperand {
                keyword: "STAR",
                at: 0
            })
        );
        assert_eq!(read("a b"), Err(PatternError::TrailingOperands(1)));
        assert_eq!(
            read("CONCAT ab c"),
            Err(PatternError::UnknownSymbol {
                word: "ab".into(),
                at: 7
            })
        );
        assert_eq!(
            read("CONCAT 'a'b c"),
            Err(PatternError::UnknownSymbol {
                word: "'a'b".into(),
                at: 7
            })
        );
        assert_eq!(
            read("'' '"),
            Err(PatternError::UnknownSymbol {
                word: "''".into(),
                at: 0
            })
        );
    }

    proptest! {
        #[test]
        fn reads_rendered(r in re::re(6, 32, prop_oneof![
            crate::prop::symbol(),
            Just(' '),
            Just('\''),
            Just('*'),
            Just('\n'),
        ])) {
            assert_eq!(read(&r.to_string()).unwrap(), r);
        }
    }
}
