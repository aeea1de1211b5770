use super::{Nfa, StateId};
use crate::re::Regex;

/// Thompson construction of an [`Nfa`] from an expression tree
///
/// Every sub-expression is built between a head and a tail state supplied by
/// its parent, so the whole automaton keeps the single start and single
/// final state created by [`Nfa::new`].
pub struct NfaBuilder {
    nfa: Nfa,
}

impl NfaBuilder {
    pub fn build(re: &Regex) -> Nfa {
        let nfa = Nfa::new();
        let (head, tail) = (nfa.start, 1);
        let mut me = Self { nfa };
        me.build_in(re, head, tail);
        me.nfa
    }

    #[inline]
    fn fresh_node(&mut self) -> StateId { self.nfa.insert() }

    #[inline]
    fn connect(&mut self, from: StateId, to: StateId, by: Option<char>) {
        self.nfa.connect(from, to, by);
    }

    fn build_alt_in(&mut self, branches: [&Regex; 2], head: StateId, tail: StateId) {
        for re in branches {
            let h = self.fresh_node();
            let t = self.fresh_node();

            self.build_in(re, h, t);
            self.connect(head, h, None);
            self.connect(t, tail, None);
        }
    }

    fn build_star_in(&mut self, re: &Regex, head: StateId, tail: StateId) {
        let h = self.fresh_node();
        let t = self.fresh_node();

        self.build_in(re, h, t);
        self.connect(head, h, None);
        self.connect(t, tail, None);
        self.connect(head, tail, None);
        self.connect(t, h, None);
    }

    fn build_in(&mut self, re: &Regex, head: StateId, tail: StateId) {
        match re {
            Regex::Void => (),
            Regex::Eps => self.connect(head, tail, None),
            &(Regex::Lit(c) | Regex::Quoted(c)) => self.connect(head, tail, Some(c)),
            Regex::Concat(l, r) => {
                let mid = self.fresh_node();
                self.build_in(l, head, mid);
                self.build_in(r, mid, tail);
            },
            Regex::Union(l, r) => self.build_alt_in([&**l, &**r], head, tail),
            Regex::Star(r) => self.build_star_in(r, head, tail),
            Regex::Plus(r) => {
                let mid = self.fresh_node();
                self.build_in(r, head, mid);
                self.build_star_in(r, mid, tail);
            },
            Regex::Maybe(r) => self.build_alt_in([&Regex::Eps, &**r], head, tail),
        }
    }
}
