use std::collections::{BTreeSet, VecDeque};

use crate::nfa::StateId;

/// Worklist solver for closures of state sets under a successor function
#[derive(Debug, Default)]
pub struct ClosureBuilder {
    queue: VecDeque<StateId>,
}

impl ClosureBuilder {
    /// Add `seeds` and everything reachable from them through `next` to
    /// `set`
    ///
    /// States already present in `set` are treated as visited, so their
    /// successors are not re-explored.
    pub fn close<I: IntoIterator<Item = StateId>>(
        &mut self,
        set: &mut BTreeSet<StateId>,
        seeds: impl IntoIterator<Item = StateId>,
        next: impl Fn(StateId) -> I,
    ) {
        debug_assert!(self.queue.is_empty());
        self.queue.extend(seeds);

        while let Some(state) = self.queue.pop_front() {
            if set.insert(state) {
                self.queue.extend(next(state));
            }
        }
    }
}
