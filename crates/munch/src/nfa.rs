//! Arena-allocated nondeterministic finite automata with epsilon edges

use std::{collections::BTreeSet, fmt, sync::Arc};

use self::builder::NfaBuilder;
use crate::{
    closure_builder::ClosureBuilder,
    dot,
    re::{self, PatternError, Regex},
};

mod builder;

/// Index of a state within an automaton's arena
pub type StateId = usize;

/// The lexical tag attached to an accepting state
///
/// Tags with a smaller rank take priority when a state accepts more than one
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: Arc<str>,
    rank: usize,
}

impl Tag {
    /// Create a tag for the token `name` with the given priority
    #[inline]
    #[must_use]
    pub fn new<S: Into<Arc<str>>>(name: S, rank: usize) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }

    /// The token name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// The token's priority, lower being stronger
    #[inline]
    #[must_use]
    pub fn rank(&self) -> usize { self.rank }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}

/// A single NFA state
#[derive(Debug, Clone, Default)]
pub struct State {
    edges: Vec<(Option<char>, StateId)>,
    start: bool,
    accept: bool,
    tag: Option<Tag>,
}

impl State {
    /// Outgoing edges, with `None` labelling an epsilon edge
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[(Option<char>, StateId)] { &self.edges }

    /// Whether this is the start state
    #[inline]
    #[must_use]
    pub fn is_start(&self) -> bool { self.start }

    /// Whether this state accepts
    #[inline]
    #[must_use]
    pub fn is_final(&self) -> bool { self.accept }

    /// The token accepted here, if any
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> { self.tag.as_ref() }
}

/// A nondeterministic finite automaton
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: StateId,
    alphabet: BTreeSet<char>,
}

impl Nfa {
    /// Create an automaton with a start state `0` and a final state `1`
    pub(crate) fn new() -> Self {
        let mut me = Self {
            states: vec![],
            start: 0,
            alphabet: BTreeSet::new(),
        };

        let head = me.insert();
        let tail = me.insert();
        me.states[head].start = true;
        me.states[tail].accept = true;

        me
    }

    pub(crate) fn insert(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(State::default());
        id
    }

    pub(crate) fn connect(&mut self, from: StateId, to: StateId, by: Option<char>) {
        debug_assert!(to < self.states.len());
        if let Some(c) = by {
            self.alphabet.insert(c);
        }

        self.states[from].edges.push((by, to));
    }

    /// Compile an expression tree with the Thompson construction
    #[must_use]
    pub fn from_regex(re: &Regex) -> Self { NfaBuilder::build(re) }

    /// Read a prenex string such as `CONCAT a STAR b` and compile it
    ///
    /// # Errors
    /// Returns an error if the prenex string is malformed.
    pub fn from_prenex(prenex: &str) -> Result<Self, PatternError> {
        re::prenex::read(prenex).map(|r| Self::from_regex(&r))
    }

    /// The start state
    #[inline]
    #[must_use]
    pub fn start(&self) -> StateId { self.start }

    /// Every state, indexed by [`StateId`]
    #[inline]
    #[must_use]
    pub fn states(&self) -> &[State] { &self.states }

    /// Number of states
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.states.len() }

    /// Whether the automaton has no states
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    /// The set of characters labelling at least one edge
    #[inline]
    #[must_use]
    pub fn alphabet(&self) -> &BTreeSet<char> { &self.alphabet }

    /// Attach `tag` to every final state
    pub fn tag_final(&mut self, tag: &Tag) {
        for state in self.states.iter_mut().filter(|s| s.accept) {
            state.tag = Some(tag.clone());
        }
    }

    /// Combine several automata into one whose language is the union of
    /// theirs
    ///
    /// The start state of the first automaton remains the start state, and
    /// gains an epsilon edge to the (former) start state of every other
    /// automaton.  Final states and tags are preserved.  Returns `None` if
    /// `nfas` is empty.
    pub fn merge<I: IntoIterator<Item = Nfa>>(nfas: I) -> Option<Self> {
        let mut nfas = nfas.into_iter();
        let mut me = nfas.next()?;

        for nfa in nfas {
            let Self {
                states,
                start,
                alphabet,
            } = nfa;
            let offset = me.states.len();

            me.states.extend(states.into_iter().map(|mut s| {
                s.start = false;
                for (_, to) in &mut s.edges {
                    *to += offset;
                }
                s
            }));

            me.states[me.start].edges.push((None, start + offset));
            me.alphabet.extend(alphabet);
        }

        Some(me)
    }

    fn epsilon_edges(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.states[state]
            .edges
            .iter()
            .filter_map(|&(by, to)| by.is_none().then_some(to))
    }

    /// Targets of the edges labelled `c` leaving `state`
    pub(crate) fn move_on(&self, state: StateId, c: char) -> impl Iterator<Item = StateId> + '_ {
        self.states[state]
            .edges
            .iter()
            .filter_map(move |&(by, to)| (by == Some(c)).then_some(to))
    }

    /// Add the epsilon-closure of `seeds` to `set`
    pub(crate) fn close(
        &self,
        closure: &mut ClosureBuilder,
        set: &mut BTreeSet<StateId>,
        seeds: impl IntoIterator<Item = StateId>,
    ) {
        closure.close(set, seeds, |s| self.epsilon_edges(s));
    }

    /// Simulate the automaton on `input`, tracking every reachable state
    #[must_use]
    pub fn accepts(&self, input: &str) -> bool {
        let mut closure = ClosureBuilder::default();
        let mut set = BTreeSet::new();
        self.close(&mut closure, &mut set, [self.start]);

        for c in input.chars() {
            let moved: Vec<_> = set.iter().flat_map(|&s| self.move_on(s, c)).collect();
            set.clear();

            if moved.is_empty() {
                return false;
            }

            self.close(&mut closure, &mut set, moved);
        }

        set.iter().any(|&s| self.states[s].accept)
    }

    /// Render the automaton as a Graphviz digraph
    #[must_use]
    pub fn dot(&self) -> dot::Graph<'_> {
        dot::Graph::state_machine(
            self.states.iter().enumerate().map(|(id, s)| {
                (
                    id,
                    s.accept,
                    s.tag.as_ref(),
                    s.edges.iter().map(|&(by, to)| (by, to)),
                )
            }),
            self.start,
        )
    }
}
