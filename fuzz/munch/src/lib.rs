use arbitrary::Arbitrary;
use munch::{Dfa, Lexer, Nfa, re};

// Keeps subset construction from blowing up on pathological inputs
const MAX_PATTERN: usize = 48;

/// Check that every successfully parsed pattern survives a trip through its
/// prenex rendering
pub fn run_pattern(pattern: &str) {
    let Ok(parsed) = re::parse(pattern) else {
        return;
    };

    let prenex = parsed.to_string();
    let read = re::prenex::read(&prenex)
        .unwrap_or_else(|e| panic!("Error reading back {prenex:?} from {pattern:?}: {e}"));
    assert_eq!(read, parsed);
}

#[derive(Debug, Arbitrary)]
pub struct AcceptInput {
    pattern: String,
    inputs: Vec<String>,
}

impl AcceptInput {
    /// Check that the NFA and DFA for a pattern agree on every input
    pub fn run(self) {
        let Self { pattern, inputs } = self;

        if pattern.chars().count() > MAX_PATTERN {
            return;
        }

        let Ok(parsed) = re::parse(&pattern) else {
            return;
        };

        let nfa = Nfa::from_regex(&parsed);
        let dfa = Dfa::from_nfa(&nfa);

        for input in inputs {
            assert_eq!(
                nfa.accepts(&input),
                dfa.accepts(&input),
                "Automata for {pattern:?} disagree on {input:?}"
            );
        }
    }
}

#[derive(Debug, Arbitrary)]
pub struct LexInput {
    tokens: Vec<(String, String)>,
    input: String,
}

impl LexInput {
    /// Check that a successful scan covers its whole input, and that scanning
    /// is deterministic
    pub fn run(self) {
        let Self { tokens, input } = self;

        if tokens.iter().map(|(_, p)| p.chars().count()).sum::<usize>() > MAX_PATTERN {
            return;
        }

        let Ok(lexer) = Lexer::new(tokens.iter().map(|(k, v)| (k, v))) else {
            return;
        };

        let first = lexer.lex(&input);
        assert_eq!(first, lexer.lex(&input));

        if let Ok(toks) = first {
            assert!(toks.iter().all(|t| !t.lexeme.is_empty()));
            assert_eq!(toks.iter().map(|t| t.lexeme).collect::<String>(), input);
        }
    }
}
