//! Deterministic automata produced by subset construction

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use self::builder::DfaBuilder;
use crate::{
    dot,
    nfa::{Nfa, StateId, Tag},
    re::{PatternError, Regex},
};

mod builder;
pub mod scanner;

/// A single DFA state
#[derive(Debug, Clone)]
pub struct State {
    nfa_states: Arc<[StateId]>,
    edges: BTreeMap<char, StateId>,
    start: bool,
    accept: bool,
    tag: Option<Tag>,
}

impl State {
    /// The sorted NFA states this state stands for
    #[inline]
    #[must_use]
    pub fn nfa_states(&self) -> &[StateId] { &self.nfa_states }

    /// Outgoing transitions by character.  Characters missing here lead to
    /// the sink.
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &BTreeMap<char, StateId> { &self.edges }

    /// Whether this is the start state
    #[inline]
    #[must_use]
    pub fn is_start(&self) -> bool { self.start }

    /// Whether this state accepts
    #[inline]
    #[must_use]
    pub fn is_final(&self) -> bool { self.accept }

    /// The highest-priority token accepted here, if any
    #[inline]
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> { self.tag.as_ref() }
}

/// A deterministic finite automaton with a total transition function
///
/// Every DFA owns a single non-accepting sink state, stored last, which all
/// otherwise-undefined transitions lead to.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<State>,
    start: StateId,
    sink: StateId,
    alphabet: BTreeSet<char>,
}

impl Dfa {
    /// Determinize an NFA
    #[must_use]
    pub fn from_nfa(nfa: &Nfa) -> Self { DfaBuilder::new(nfa).build() }

    /// Compile an expression tree and determinize the result
    #[must_use]
    pub fn from_regex(re: &Regex) -> Self { Self::from_nfa(&Nfa::from_regex(re)) }

    /// Read a prenex string, compile it and determinize the result
    ///
    /// # Errors
    /// Returns an error if the prenex string is malformed.
    pub fn from_prenex(prenex: &str) -> Result<Self, PatternError> {
        Nfa::from_prenex(prenex).map(|n| Self::from_nfa(&n))
    }

    /// The start state
    #[inline]
    #[must_use]
    pub fn start(&self) -> StateId { self.start }

    /// The sink state
    #[inline]
    #[must_use]
    pub fn sink(&self) -> StateId { self.sink }

    /// Whether `state` is the sink
    #[inline]
    #[must_use]
    pub fn is_sink(&self, state: StateId) -> bool { state == self.sink }

    /// Every state, indexed by [`StateId`]
    #[inline]
    #[must_use]
    pub fn states(&self) -> &[State] { &self.states }

    /// Number of states, including the sink
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize { self.states.len() }

    /// Always false, since every DFA has at least a start state and a
    /// sink
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool { self.states.is_empty() }

    /// The characters with at least one defined transition
    #[inline]
    #[must_use]
    pub fn alphabet(&self) -> &BTreeSet<char> { &self.alphabet }

    /// Follow the transition labelled `c`, falling into the sink if there is
    /// none
    #[inline]
    #[must_use]
    pub fn step(&self, state: StateId, c: char) -> StateId {
        self.states[state].edges.get(&c).copied().unwrap_or(self.sink)
    }

    /// The token accepted by `state`, if any
    #[inline]
    #[must_use]
    pub fn tag(&self, state: StateId) -> Option<&Tag> { self.states[state].tag.as_ref() }

    /// Whether `state` accepts
    #[inline]
    #[must_use]
    pub fn is_final(&self, state: StateId) -> bool { self.states[state].accept }

    /// Whether the automaton accepts all of `input`
    #[must_use]
    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.start;

        for c in input.chars() {
            state = self.step(state, c);
            if self.is_sink(state) {
                return false;
            }
        }

        self.is_final(state)
    }

    /// Render the automaton as a Graphviz digraph
    ///
    /// The sink and every edge leading into it are left out unless
    /// `show_sink` is set.
    #[must_use]
    pub fn dot(&self, show_sink: bool) -> dot::Graph<'_> {
        let sink = (!show_sink).then_some(self.sink);

        dot::Graph::state_machine(
            self.states
                .iter()
                .enumerate()
                .filter(move |&(id, _)| Some(id) != sink)
                .map(move |(id, s)| {
                    (
                        id,
                        s.accept,
                        s.tag.as_ref(),
                        s.edges
                            .iter()
                            .filter(move |&(_, &to)| Some(to) != sink)
                            .map(|(&c, &to)| (Some(c), to)),
                    )
                }),
            self.start,
        )
    }
}
