use std::{
    collections::{BTreeMap, BTreeSet, VecDeque},
    sync::Arc,
};

use hashbrown::HashMap;
use tracing::trace;

use super::{Dfa, State};
use crate::{
    closure_builder::ClosureBuilder,
    nfa::{Nfa, StateId},
};

/// A discovered state whose flags have not been computed yet
///
/// A `None` transition leads to the sink, whose index is only known once
/// every other state has been discovered.
struct Pending {
    set: Arc<[StateId]>,
    edges: BTreeMap<char, Option<StateId>>,
}

/// Subset construction over an [`Nfa`]
pub struct DfaBuilder<'a> {
    nfa: &'a Nfa,
    closure: ClosureBuilder,
    index: HashMap<Arc<[StateId]>, StateId>,
    states: Vec<Pending>,
    queue: VecDeque<StateId>,
}

impl<'a> DfaBuilder<'a> {
    pub fn new(nfa: &'a Nfa) -> Self {
        Self {
            nfa,
            closure: ClosureBuilder::default(),
            index: HashMap::new(),
            states: vec![],
            queue: VecDeque::new(),
        }
    }

    /// Look up the state for an epsilon-closed set, allocating and enqueueing
    /// it if it has not been seen yet
    fn intern(&mut self, set: BTreeSet<StateId>) -> StateId {
        let set: Arc<[StateId]> = set.into_iter().collect();

        if let Some(&id) = self.index.get(&set) {
            return id;
        }

        let id = self.states.len();
        trace!(id, nfa_states = ?set, "Discovered DFA state");

        self.index.insert(Arc::clone(&set), id);
        self.states.push(Pending {
            set,
            edges: BTreeMap::new(),
        });
        self.queue.push_back(id);

        id
    }

    pub fn build(mut self) -> Dfa {
        let nfa = self.nfa;

        let mut start = BTreeSet::new();
        nfa.close(&mut self.closure, &mut start, [nfa.start()]);
        let start = self.intern(start);

        while let Some(id) = self.queue.pop_front() {
            let set = Arc::clone(&self.states[id].set);

            for &c in nfa.alphabet() {
                let mut next = BTreeSet::new();
                nfa.close(
                    &mut self.closure,
                    &mut next,
                    set.iter().flat_map(|&s| nfa.move_on(s, c)),
                );

                let to = (!next.is_empty()).then(|| self.intern(next));
                self.states[id].edges.insert(c, to);
            }
        }

        let sink = self.states.len();
        let mut states: Vec<_> = self
            .states
            .into_iter()
            .map(|Pending { set, edges }| {
                let subsumed = || set.iter().map(|&s| &nfa.states()[s]);

                State {
                    start: subsumed().any(|s| s.is_start()),
                    accept: subsumed().any(|s| s.is_final()),
                    tag: subsumed()
                        .filter(|s| s.is_final())
                        .filter_map(|s| s.tag())
                        .min_by_key(|t| t.rank())
                        .cloned(),
                    edges: edges
                        .into_iter()
                        .map(|(c, to)| (c, to.unwrap_or(sink)))
                        .collect(),
                    nfa_states: set,
                }
            })
            .collect();

        states.push(State {
            nfa_states: Vec::new().into(),
            edges: BTreeMap::new(),
            start: false,
            accept: false,
            tag: None,
        });

        Dfa {
            states,
            start,
            sink,
            alphabet: nfa.alphabet().clone(),
        }
    }
}
