//! Infix pattern parser
//!
//! Patterns use literal characters, the operators `| * + ? ( )`, the
//! character class shorthand `[x-y]`, quoted characters `'c'` and the
//! epsilon literal `eps`.  Concatenation is implicit.

use super::{PatternError, Regex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    LPar,
    Pipe,
    Cat,
    Star,
    Plus,
    Maybe,
}

impl Op {
    fn priority(self) -> u8 {
        match self {
            Self::LPar => 0,
            Self::Pipe => 1,
            Self::Cat => 2,
            Self::Star | Self::Plus | Self::Maybe => 3,
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::LPar => '(',
            Self::Pipe => '|',
            Self::Cat => '&',
            Self::Star => '*',
            Self::Plus => '+',
            Self::Maybe => '?',
        }
    }
}

#[derive(Debug, Clone)]
enum Sym {
    Atom(Regex),
    Op(Op),
    RPar,
}

const CLASS_RUNS: [(char, char); 3] = [('0', '9'), ('a', 'z'), ('A', 'Z')];

fn expand_class(
    chars: &[char],
    at: usize,
    out: &mut Vec<(Sym, usize)>,
) -> Result<(), PatternError> {
    let (start, end) = match chars.get(at..at + 5) {
        Some(&['[', start, '-', end, ']']) => (start, end),
        _ => return Err(PatternError::MalformedClass(at)),
    };

    if !CLASS_RUNS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&start) && (start..=hi).contains(&end))
    {
        return Err(PatternError::EmptyClass { start, end, at });
    }

    out.push((Sym::Op(Op::LPar), at));
    for (i, c) in (start..=end).enumerate() {
        if i != 0 {
            out.push((Sym::Op(Op::Pipe), at));
        }

        out.push((Sym::Atom(Regex::Lit(c)), at));
    }
    out.push((Sym::RPar, at));

    Ok(())
}

/// Split a pattern into symbols, inserting explicit concatenation operators
fn preprocess(pattern: &str) -> Result<Vec<(Sym, usize)>, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = vec![];
    // True at the start of the pattern and after `(` or `|`
    let mut open = true;
    let mut i = 0;

    while let Some(&c) = chars.get(i) {
        if !open && !matches!(c, '+' | '*' | ')' | '?' | '|') {
            out.push((Sym::Op(Op::Cat), i));
        }

        let (sym, len) = match c {
            '[' => {
                expand_class(&chars, i, &mut out)?;
                open = false;
                i += 5;
                continue;
            },
            '\'' => match chars.get(i + 1..i + 3) {
                Some(&[c, '\'']) => (Sym::Atom(Regex::Quoted(c)), 3),
                _ => return Err(PatternError::UnterminatedQuote(i)),
            },
            'e' if chars.get(i + 1..i + 3) == Some(&['p', 's'][..]) => (Sym::Atom(Regex::Eps), 3),
            '(' => (Sym::Op(Op::LPar), 1),
            ')' => (Sym::RPar, 1),
            '|' => (Sym::Op(Op::Pipe), 1),
            '*' => (Sym::Op(Op::Star), 1),
            '+' => (Sym::Op(Op::Plus), 1),
            '?' => (Sym::Op(Op::Maybe), 1),
            ']' => return Err(PatternError::StrayBracket(i)),
            c => (Sym::Atom(Regex::lit(c)), 1),
        };

        open = matches!(sym, Sym::Op(Op::LPar | Op::Pipe));
        out.push((sym, i));
        i += len;
    }

    Ok(out)
}

#[derive(Debug, Default)]
struct Shunt {
    operands: Vec<Regex>,
    ops: Vec<(Op, usize)>,
}

impl Shunt {
    fn operand(&mut self, op: Op, at: usize) -> Result<Regex, PatternError> {
        self.operands.pop().ok_or(PatternError::MissingOperand {
            op: op.symbol(),
            at,
        })
    }

    fn apply_op(&mut self, op: Op, at: usize) -> Result<(), PatternError> {
        let re = match op {
            Op::LPar => return Err(PatternError::UnclosedGroup(at)),
            Op::Pipe | Op::Cat => {
                let rhs = self.operand(op, at)?;
                let lhs = self.operand(op, at)?;

                if op == Op::Pipe {
                    Regex::union(lhs, rhs)
                } else {
                    Regex::concat(lhs, rhs)
                }
            },
            Op::Star => Regex::star(self.operand(op, at)?),
            Op::Plus => Regex::plus(self.operand(op, at)?),
            Op::Maybe => Regex::maybe(self.operand(op, at)?),
        };

        self.operands.push(re);
        Ok(())
    }

    fn apply_top(&mut self) -> Result<(), PatternError> {
        let (op, at) = self.ops.pop().unwrap_or_else(|| unreachable!());
        self.apply_op(op, at)
    }
}

/// Parse an infix pattern into an expression tree
///
/// # Errors
/// Returns an error if the pattern is empty, has unbalanced parentheses, a
/// dangling operator, an unterminated quote or a malformed character class.
pub fn parse(pattern: &str) -> Result<Regex, PatternError> {
    let mut shunt = Shunt::default();
    // Whether the previous symbol ended an operand
    let mut after_operand = false;
    let mut last_lpar = None;

    for (sym, at) in preprocess(pattern)? {
        match sym {
            Sym::Atom(re) => {
                shunt.operands.push(re);
                after_operand = true;
            },
            Sym::Op(Op::LPar) => {
                shunt.ops.push((Op::LPar, at));
                last_lpar = Some(at);
                after_operand = false;
                continue;
            },
            Sym::RPar => {
                if !after_operand {
                    return Err(match (last_lpar, shunt.ops.last()) {
                        (Some(lpar), Some(&(Op::LPar, _))) => PatternError::Empty(lpar),
                        (_, Some(&(op, op_at))) => PatternError::MissingOperand {
                            op: op.symbol(),
                            at: op_at,
                        },
                        (_, None) => PatternError::UnmatchedClose(at),
                    });
                }

                loop {
                    match shunt.ops.last() {
                        None => return Err(PatternError::UnmatchedClose(at)),
                        Some((Op::LPar, _)) => break,
                        Some(_) => shunt.apply_top()?,
                    }
                }

                shunt.ops.pop();
                after_operand = true;
            },
            Sym::Op(op @ (Op::Star | Op::Plus | Op::Maybe)) => {
                if !after_operand {
                    return Err(PatternError::MissingOperand {
                        op: op.symbol(),
                        at,
                    });
                }

                // Postfix operators bind tighter than anything, so they apply
                // to the operand on top of the stack immediately
                shunt.apply_op(op, at)?;
            },
            Sym::Op(op) => {
                if !after_operand {
                    return Err(PatternError::MissingOperand {
                        op: op.symbol(),
                        at,
                    });
                }

                while shunt
                    .ops
                    .last()
                    .is_some_and(|&(top, _)| op.priority() < top.priority())
                {
                    shunt.apply_top()?;
                }

                shunt.ops.push((op, at));
                after_operand = false;
            },
        }

        last_lpar = None;
    }

    if !after_operand {
        return Err(match shunt.ops.last() {
            None => PatternError::Empty(0),
            Some(&(Op::LPar, at)) => PatternError::UnclosedGroup(at),
            Some(&(op, at)) => PatternError::MissingOperand {
                op: op.symbol(),
                at,
            },
        });
    }

    while !shunt.ops.is_empty() {
        shunt.apply_top()?;
    }

    let re = shunt.operands.pop().unwrap_or_else(|| unreachable!());
    debug_assert!(shunt.operands.is_empty());
    Ok(re)
}

/// Parse an infix pattern and render it in prenex notation
///
/// ```
/// assert_eq!(munch::re::to_prenex("a(b|c)*").unwrap(), "CONCAT a STAR UNION b c");
/// ```
///
/// # Errors
/// Returns an error under the same conditions as [`parse`].
pub fn to_prenex(pattern: &str) -> Result<String, PatternError> {
    parse(pattern).map(|r| r.to_string())
}
