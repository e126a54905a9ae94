//! The [`Network`] every algorithm in the workspace consumes.
//!
//! # Overview
//!
//! A `Network` wraps a [`petgraph`] directed graph whose node weights are
//! vertex names. Undirected networks store each edge once (in insertion
//! direction) and answer every neighbor query in [`NeighborMode::All`], so
//! the same storage serves both kinds.
//!
//! ## Names
//!
//! Every vertex has an immutable, unique name. Derived networks built with
//! [`Network::induced_subgraph`] keep the names, which is how values computed
//! on a subgraph are copied back onto the parent.
//!
//! ## Duplicate edges and self-loops
//!
//! Both are ignored on insertion. Neighbor lists on directed networks may
//! still list a vertex twice in `All` mode when the two vertices link each
//! other in both directions; degree counts follow the same rule.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, Neighbors, NodeIndex};

use crate::attr::{AttrColumn, AttrKey, AttributeStore};
use crate::error::GraphError;

/// Stable vertex handle within one [`Network`].
pub type VertexId = NodeIndex;

/// Which incident edges a neighbor query follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborMode {
    /// Sources of edges pointing at the vertex.
    In,
    /// Targets of edges leaving the vertex.
    Out,
    /// Both directions.
    All,
}

impl NeighborMode {
    /// The mode whose neighbor relation is the inverse of this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
            Self::All => Self::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// A graph of named vertices with typed per-vertex attributes.
#[derive(Debug, Clone)]
pub struct Network {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, VertexId>,
    directed: bool,
    attrs: AttributeStore,
}

impl Network {
    /// Create an empty network.
    #[must_use]
    pub fn new(directed: bool) -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            directed,
            attrs: AttributeStore::default(),
        }
    }

    /// Build a network from an edge list of vertex names.
    ///
    /// Vertices are created in order of first appearance.
    #[must_use]
    pub fn from_edges(directed: bool, edges: &[(&str, &str)]) -> Self {
        Self::with_vertices(directed, &[], edges)
    }

    /// Build a network from an explicit vertex list plus an edge list.
    ///
    /// `vertices` come first (in the given order), so isolated vertices can
    /// be declared; edge endpoints not listed are appended as they appear.
    #[must_use]
    pub fn with_vertices(directed: bool, vertices: &[&str], edges: &[(&str, &str)]) -> Self {
        let mut network = Self::new(directed);
        for name in vertices {
            network.add_vertex(name);
        }
        for (a, b) in edges {
            let ia = network.add_vertex(a);
            let ib = network.add_vertex(b);
            network.add_edge(ia, ib);
        }
        network
    }

    /// Add a vertex, or return the existing one with the same name.
    ///
    /// Attribute columns are not extended: reading a column stored before
    /// the vertex was added fails with [`GraphError::LengthMismatch`] until
    /// it is recomputed.
    pub fn add_vertex(&mut self, name: &str) -> VertexId {
        if let Some(&idx) = self.node_map.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_map.insert(name.to_string(), idx);
        idx
    }

    /// Add an edge `a → b` (or `a - b` on undirected networks).
    ///
    /// Returns `false` when the edge is a self-loop, already present, or an
    /// endpoint is not part of this network.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        let exists = if self.directed {
            self.graph.contains_edge(a, b)
        } else {
            self.graph.contains_edge(a, b) || self.graph.contains_edge(b, a)
        };
        if exists {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True if `v` is a vertex of this network.
    #[must_use]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.graph.node_count()
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        self.graph.node_indices()
    }

    /// The immutable name of a vertex.
    #[must_use]
    pub fn name(&self, v: VertexId) -> Option<&str> {
        self.graph.node_weight(v).map(String::as_str)
    }

    /// Look a vertex up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<VertexId> {
        self.node_map.get(name).copied()
    }

    fn effective(&self, mode: NeighborMode) -> NeighborMode {
        if self.directed { mode } else { NeighborMode::All }
    }

    /// Neighbors of `v` following `mode`.
    ///
    /// On undirected networks every mode behaves like [`NeighborMode::All`].
    #[must_use]
    pub fn neighbors(&self, v: VertexId, mode: NeighborMode) -> Neighbors<'_, ()> {
        match self.effective(mode) {
            NeighborMode::In => self.graph.neighbors_directed(v, Direction::Incoming),
            NeighborMode::Out => self.graph.neighbors_directed(v, Direction::Outgoing),
            NeighborMode::All => self.graph.neighbors_undirected(v),
        }
    }

    /// Neighbors of `v` as a sorted list without repeats.
    #[must_use]
    pub fn distinct_neighbors(&self, v: VertexId, mode: NeighborMode) -> Vec<VertexId> {
        let mut out: Vec<VertexId> = self.neighbors(v, mode).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Number of incident edges followed by `mode`.
    #[must_use]
    pub fn degree(&self, v: VertexId, mode: NeighborMode) -> usize {
        self.neighbors(v, mode).count()
    }

    /// Degree of every vertex, in vertex order.
    #[must_use]
    pub fn degrees(&self, mode: NeighborMode) -> Vec<usize> {
        self.vertices().map(|v| self.degree(v, mode)).collect()
    }

    /// The subnetwork induced by `vertices`.
    ///
    /// Kept vertices preserve their names and relative order; attributes are
    /// not carried over.
    #[must_use]
    pub fn induced_subgraph(&self, vertices: &[VertexId]) -> Self {
        let keep: HashSet<VertexId> = vertices.iter().copied().collect();
        let graph = self.graph.filter_map(
            |v, name| keep.contains(&v).then(|| name.clone()),
            |_, _| Some(()),
        );
        let node_map = graph
            .node_indices()
            .filter_map(|idx| graph.node_weight(idx).map(|name| (name.clone(), idx)))
            .collect();
        Self {
            graph,
            node_map,
            directed: self.directed,
            attrs: AttributeStore::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    fn check_len(&self, key: &AttrKey, found: usize) -> Result<(), GraphError> {
        let expected = self.vertex_count();
        if found == expected {
            Ok(())
        } else {
            Err(GraphError::LengthMismatch {
                key: key.clone(),
                expected,
                found,
            })
        }
    }

    /// Store a numeric column, replacing any previous one under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::LengthMismatch`] unless `values` holds exactly
    /// one entry per vertex.
    pub fn set_numeric(&mut self, key: AttrKey, values: Vec<f64>) -> Result<(), GraphError> {
        self.check_len(&key, values.len())?;
        self.attrs.insert(key, AttrColumn::Numeric(values));
        Ok(())
    }

    /// Store a text column, replacing any previous one under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::LengthMismatch`] unless `values` holds exactly
    /// one entry per vertex.
    pub fn set_text(&mut self, key: AttrKey, values: Vec<String>) -> Result<(), GraphError> {
        self.check_len(&key, values.len())?;
        self.attrs.insert(key, AttrColumn::Text(values));
        Ok(())
    }

    /// Read a numeric column.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingAttribute`] if nothing is stored under `key`,
    /// [`GraphError::WrongAttributeKind`] if the column holds text,
    /// [`GraphError::LengthMismatch`] if vertices were added since it was
    /// stored.
    pub fn numeric(&self, key: &AttrKey) -> Result<&[f64], GraphError> {
        match self.attrs.get(key) {
            Some(AttrColumn::Numeric(values)) => {
                self.check_len(key, values.len())?;
                Ok(values)
            }
            Some(AttrColumn::Text(_)) => Err(GraphError::WrongAttributeKind(key.clone())),
            None => Err(GraphError::MissingAttribute(key.clone())),
        }
    }

    /// Read a text column.
    ///
    /// # Errors
    ///
    /// [`GraphError::MissingAttribute`] if nothing is stored under `key`,
    /// [`GraphError::WrongAttributeKind`] if the column holds numbers,
    /// [`GraphError::LengthMismatch`] if vertices were added since it was
    /// stored.
    pub fn text(&self, key: &AttrKey) -> Result<&[String], GraphError> {
        match self.attrs.get(key) {
            Some(AttrColumn::Text(values)) => {
                self.check_len(key, values.len())?;
                Ok(values)
            }
            Some(AttrColumn::Numeric(_)) => Err(GraphError::WrongAttributeKind(key.clone())),
            None => Err(GraphError::MissingAttribute(key.clone())),
        }
    }

    /// One entry of a numeric column.
    ///
    /// # Errors
    ///
    /// As [`Network::numeric`], plus [`GraphError::UnknownVertex`] for an id
    /// outside the network.
    pub fn numeric_at(&self, key: &AttrKey, v: VertexId) -> Result<f64, GraphError> {
        self.numeric(key)?
            .get(v.index())
            .copied()
            .ok_or(GraphError::UnknownVertex(v.index()))
    }

    /// Overwrite one entry of an existing numeric column.
    ///
    /// # Errors
    ///
    /// As [`Network::numeric_at`].
    pub fn set_numeric_at(&mut self, key: &AttrKey, v: VertexId, value: f64) -> Result<(), GraphError> {
        let expected = self.vertex_count();
        match self.attrs.get_mut(key) {
            Some(AttrColumn::Numeric(values)) if values.len() != expected => Err(GraphError::LengthMismatch {
                key: key.clone(),
                expected,
                found: values.len(),
            }),
            Some(AttrColumn::Numeric(values)) => {
                let slot = values
                    .get_mut(v.index())
                    .ok_or(GraphError::UnknownVertex(v.index()))?;
                *slot = value;
                Ok(())
            }
            Some(AttrColumn::Text(_)) => Err(GraphError::WrongAttributeKind(key.clone())),
            None => Err(GraphError::MissingAttribute(key.clone())),
        }
    }

    #[must_use]
    pub fn has_attr(&self, key: &AttrKey) -> bool {
        self.attrs.contains(key)
    }

    /// Drop a column, returning it if it existed.
    pub fn remove_attr(&mut self, key: &AttrKey) -> Option<AttrColumn> {
        self.attrs.remove(key)
    }

    /// Keys of every stored column, in no particular order.
    pub fn attr_keys(&self) -> impl Iterator<Item = &AttrKey> {
        self.attrs.keys()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn path_abc() -> Network {
        Network::from_edges(false, &[("a", "b"), ("b", "c")])
    }

    #[test]
    fn vertices_created_in_first_appearance_order() {
        let net = path_abc();
        let names: Vec<&str> = net.vertices().filter_map(|v| net.name(v)).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(net.edge_count(), 2);
    }

    #[test]
    fn duplicate_and_reverse_edges_ignored_when_undirected() {
        let net = Network::from_edges(false, &[("a", "b"), ("b", "a"), ("a", "b")]);
        assert_eq!(net.edge_count(), 1);
    }

    #[test]
    fn reverse_edge_kept_when_directed() {
        let net = Network::from_edges(true, &[("a", "b"), ("b", "a")]);
        assert_eq!(net.edge_count(), 2);
        let a = net.find("a").expect("a");
        // igraph-style multiplicity in all mode.
        assert_eq!(net.degree(a, NeighborMode::All), 2);
        assert_eq!(net.distinct_neighbors(a, NeighborMode::All).len(), 1);
    }

    #[test]
    fn self_loops_ignored() {
        let mut net = Network::new(false);
        let a = net.add_vertex("a");
        assert!(!net.add_edge(a, a));
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn modes_collapse_on_undirected_networks() {
        let net = path_abc();
        let b = net.find("b").expect("b");
        assert_eq!(net.degree(b, NeighborMode::In), 2);
        assert_eq!(net.degree(b, NeighborMode::Out), 2);
    }

    #[test]
    fn directed_modes() {
        let net = Network::from_edges(true, &[("a", "b"), ("c", "b"), ("b", "d")]);
        let b = net.find("b").expect("b");
        assert_eq!(net.degree(b, NeighborMode::In), 2);
        assert_eq!(net.degree(b, NeighborMode::Out), 1);
        assert_eq!(net.degree(b, NeighborMode::All), 3);
    }

    #[test]
    fn induced_subgraph_keeps_names_and_order() {
        let net = Network::from_edges(false, &[("a", "b"), ("b", "c"), ("c", "d")]);
        let keep: Vec<VertexId> = ["d", "b", "c"].iter().filter_map(|n| net.find(n)).collect();
        let sub = net.induced_subgraph(&keep);
        let names: Vec<&str> = sub.vertices().filter_map(|v| sub.name(v)).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
        assert_eq!(sub.edge_count(), 2);
        assert!(sub.find("a").is_none());
    }

    #[test]
    fn attribute_length_is_checked() {
        let mut net = path_abc();
        let err = net
            .set_numeric(AttrKey::Coreness, vec![1.0])
            .expect_err("short column");
        assert!(matches!(err, GraphError::LengthMismatch { expected: 3, found: 1, .. }));
    }

    #[test]
    fn missing_and_wrong_kind_attributes_fail_fast() {
        let mut net = path_abc();
        assert_eq!(
            net.numeric(&AttrKey::Coreness),
            Err(GraphError::MissingAttribute(AttrKey::Coreness))
        );
        let key = AttrKey::Community("MLC".into());
        net.set_text(key.clone(), vec!["x".into(), "y".into(), "z".into()])
            .expect("text column");
        assert_eq!(net.numeric(&key), Err(GraphError::WrongAttributeKind(key.clone())));
        assert_eq!(net.text(&key).map(<[String]>::len), Ok(3));
        assert!(net.remove_attr(&key).is_some());
        assert!(!net.has_attr(&key));
    }

    #[test]
    fn single_entries_read_and_write() {
        let mut net = path_abc();
        let b = net.find("b").expect("b");
        net.set_numeric(AttrKey::Coreness, vec![1.0, 2.0, 3.0]).expect("column");
        assert_eq!(net.numeric_at(&AttrKey::Coreness, b), Ok(2.0));
        net.set_numeric_at(&AttrKey::Coreness, b, 9.0).expect("write");
        assert_eq!(net.numeric(&AttrKey::Coreness), Ok(&[1.0, 9.0, 3.0][..]));
        assert_eq!(
            net.numeric_at(&AttrKey::Coreness, VertexId::new(7)),
            Err(GraphError::UnknownVertex(7))
        );
        assert_eq!(
            net.set_numeric_at(&AttrKey::IksShell, b, 1.0),
            Err(GraphError::MissingAttribute(AttrKey::IksShell))
        );
    }

    #[test]
    fn columns_go_stale_when_vertices_are_added() {
        let mut net = path_abc();
        net.set_numeric(AttrKey::Coreness, vec![1.0; 3]).expect("numeric");
        let key = AttrKey::Community("MLC".into());
        net.set_text(key.clone(), vec!["x".into(); 3]).expect("text");

        let late = net.add_vertex("late");
        assert!(matches!(
            net.numeric(&AttrKey::Coreness),
            Err(GraphError::LengthMismatch { expected: 4, found: 3, .. })
        ));
        assert!(matches!(
            net.text(&key),
            Err(GraphError::LengthMismatch { expected: 4, found: 3, .. })
        ));
        assert!(net.numeric_at(&AttrKey::Coreness, late).is_err());

        net.set_numeric(AttrKey::Coreness, vec![0.0; 4]).expect("recomputed");
        assert_eq!(net.numeric_at(&AttrKey::Coreness, late), Ok(0.0));
    }
}
