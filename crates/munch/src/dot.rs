//! Minimal Graphviz DOT writer used to visualize automata

use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt::{self, Display},
};

use indexmap::IndexMap;

use crate::{
    nfa::{StateId, Tag},
    re::needs_quotes,
};

macro_rules! attr {
    ($id:ident, $name:literal) => {
        #[doc = concat!("Set the `", $name, "` attribute")]
        pub fn $id<S: Into<Cow<'a, str>>>(&mut self, $id: S) {
            self.attrs.insert($name, $id.into());
        }
    };
}

/// Whether edges have a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GraphType {
    /// Rendered as `graph`, with `--` edges
    Undirected,
    /// Rendered as `digraph`, with `->` edges
    Directed,
}

impl GraphType {
    fn edge_op(self) -> &'static str {
        match self {
            Self::Undirected => "--",
            Self::Directed => "->",
        }
    }
}

impl Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undirected => "graph",
            Self::Directed => "digraph",
        })
    }
}

/// A graph with attributes on the graph, its nodes and its edges
///
/// Nodes and edges are printed in insertion order.
#[derive(Debug)]
pub struct Graph<'a> {
    ty: GraphType,
    attrs: BTreeMap<&'static str, Cow<'a, str>>,
    nodes: IndexMap<Cow<'a, str>, Node<'a>>,
    edges: IndexMap<(Cow<'a, str>, Cow<'a, str>), Vec<Edge<'a>>>,
}

impl<'a> Graph<'a> {
    attr!(label, "label");

    attr!(rank_dir, "rankdir");

    /// Create an empty graph
    #[must_use]
    pub fn new(ty: GraphType) -> Self {
        Self {
            ty,
            attrs: BTreeMap::new(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    /// Get a node by ID, creating it if it does not exist yet
    #[inline]
    pub fn node<S: Into<Cow<'a, str>>>(&mut self, id: S) -> &mut Node<'a> {
        self.nodes.entry(id.into()).or_default()
    }

    /// Add an edge, creating either endpoint if it does not exist yet
    ///
    /// Parallel edges are kept.
    pub fn edge<L: Into<Cow<'a, str>>, R: Into<Cow<'a, str>>>(
        &mut self,
        l: L,
        r: R,
    ) -> &mut Edge<'a> {
        let l = l.into();
        let r = r.into();
        self.node(l.clone());
        self.node(r.clone());
        let edges = self.edges.entry((l, r)).or_default();
        edges.push(Edge::default());
        edges.last_mut().unwrap_or_else(|| unreachable!())
    }

    pub(crate) fn state_machine<
        IN: IntoIterator<Item = (StateId, bool, Option<&'a Tag>, IE)>,
        IE: IntoIterator<Item = (Option<char>, StateId)>,
    >(
        states: IN,
        start: StateId,
    ) -> Self {
        let mut graph = Self::new(GraphType::Directed);
        graph.rank_dir("LR");

        for (state, accept, tag, edges) in states {
            let id = Cow::from(state.to_string());
            let node = graph.node(id.clone());

            node.label(match tag {
                Some(tag) => format!("{state}:{tag}"),
                None => state.to_string(),
            });

            if accept {
                node.border_count("2");
            }

            for (by, to) in edges {
                graph.edge(id.clone(), to.to_string()).label(match by {
                    None => "ϵ".into(),
                    Some(c) if needs_quotes(c) => format!("'{}'", c.escape_debug()),
                    Some(c) => c.to_string(),
                });
            }
        }

        let start_node = graph.node("_start");
        start_node.style("invis");
        start_node.shape("point");
        start_node.label("");
        graph.edge("_start", start.to_string());

        graph
    }
}

#[derive(Default)]
struct AttrState {
    any: bool,
}

impl AttrState {
    fn write_one(&mut self, f: &mut fmt::Formatter, key: &str, val: &str) -> fmt::Result {
        f.write_str(if self.any {
            ","
        } else {
            self.any = true;
            "["
        })?;

        write!(f, "{key}={val:?}")
    }

    fn write_all(
        mut self,
        f: &mut fmt::Formatter,
        attrs: &BTreeMap<&'static str, Cow<'_, str>>,
    ) -> fmt::Result {
        for (key, val) in attrs {
            self.write_one(f, key, val)?;
        }

        if self.any {
            f.write_str("]")
        } else {
            Ok(())
        }
    }
}

impl Display for Graph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Self {
            ty,
            attrs,
            nodes,
            edges,
        } = self;

        write!(f, "{ty} {{")?;

        for (key, val) in attrs {
            write!(f, "{key}={val:?};")?;
        }

        for (id, Node { attrs }) in nodes {
            write!(f, "{id:?}")?;
            AttrState::default().write_all(f, attrs)?;
            f.write_str(";")?;
        }

        for ((l, r), edges) in edges {
            for Edge { attrs } in edges {
                write!(f, "{l:?}{}{r:?}", ty.edge_op())?;
                AttrState::default().write_all(f, attrs)?;
                f.write_str(";")?;
            }
        }

        f.write_str("}")
    }
}

/// Attributes of a graph node
#[derive(Debug, Default)]
pub struct Node<'a> {
    attrs: BTreeMap<&'static str, Cow<'a, str>>,
}

impl<'a> Node<'a> {
    attr!(style, "style");

    attr!(shape, "shape");

    attr!(label, "label");

    attr!(border_count, "peripheries");
}

/// Attributes of a graph edge
#[derive(Debug, Default)]
pub struct Edge<'a> {
    attrs: BTreeMap<&'static str, Cow<'a, str>>,
}

impl<'a> Edge<'a> {
    attr!(label, "label");

    attr!(color, "color");
}
