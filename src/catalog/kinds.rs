//! kinds.rs
//! Quantity kinds and the broader-kind taxonomy between them.
//!
//! The taxonomy is a directed graph with edges pointing from a narrower kind to each of its
//! broader kinds (`Distance -> Length`). It is validated once at load: every reference must
//! resolve and the relation must be acyclic.

use crate::dimension::DimensionVector;
use crate::error::{QudtError, Result};
use crate::unit::literal::expand_uri;
use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;

pub const QUANTITY_KIND_VOCAB: &str = "http://qudt.org/vocab/quantitykind/";

#[derive(Debug, Clone, PartialEq)]
pub struct QuantityKind {
    label: String,
    uri: String,
    dimension_vector: DimensionVector,
    broader_kinds: Vec<String>,
}

impl QuantityKind {
    /// Local names are expanded into the quantity-kind vocabulary, for the kind and its broader
    /// references alike.
    pub fn new(
        label: impl Into<String>,
        uri: impl Into<String>,
        dimension_vector: DimensionVector,
        broader_kinds: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            uri: expand_uri(uri.into(), QUANTITY_KIND_VOCAB),
            dimension_vector,
            broader_kinds: broader_kinds
                .into_iter()
                .map(|b| expand_uri(b, QUANTITY_KIND_VOCAB))
                .collect(),
        }
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn uri(&self) -> &str { &self.uri }
    pub fn dimension_vector(&self) -> &DimensionVector { &self.dimension_vector }
    pub fn broader_kinds(&self) -> &[String] { &self.broader_kinds }
}

#[derive(Debug, Clone, Default)]
pub struct KindHierarchy {
    kinds: Vec<QuantityKind>,
    graph: DiGraph<usize, ()>,
    by_uri: HashMap<String, NodeIndex>,
}

impl KindHierarchy {
    pub fn build(kinds: Vec<QuantityKind>) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(kinds.len(), kinds.len());
        let mut by_uri = HashMap::with_capacity(kinds.len());

        for (i, kind) in kinds.iter().enumerate() {
            let node = graph.add_node(i);
            if by_uri.insert(kind.uri.clone(), node).is_some() {
                return Err(QudtError::Catalog(format!("duplicate quantity kind '{}'", kind.uri)));
            }
        }

        for kind in &kinds {
            let narrower = by_uri[&kind.uri];
            for broader in &kind.broader_kinds {
                let target = by_uri.get(broader).ok_or_else(|| {
                    QudtError::Catalog(format!(
                        "quantity kind '{}' refers to unknown broader kind '{}'",
                        kind.uri, broader
                    ))
                })?;
                graph.add_edge(narrower, *target, ());
            }
        }

        if is_cyclic_directed(&graph) {
            return Err(QudtError::Catalog("cycle detected in quantity-kind hierarchy".to_string()));
        }

        Ok(Self { kinds, graph, by_uri })
    }

    pub fn len(&self) -> usize { self.kinds.len() }
    pub fn is_empty(&self) -> bool { self.kinds.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &QuantityKind> {
        self.kinds.iter()
    }

    pub fn get(&self, uri: &str) -> Option<&QuantityKind> {
        self.by_uri.get(uri).map(|node| &self.kinds[self.graph[*node]])
    }

    /// Every kind reachable through broader links, excluding `uri` itself. Unknown kinds have
    /// no broader kinds.
    pub fn broader_closure(&self, uri: &str) -> Vec<&QuantityKind> {
        let Some(&start) = self.by_uri.get(uri) else {
            return Vec::new();
        };
        let mut closure = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(node) = dfs.next(&self.graph) {
            if node != start {
                closure.push(&self.kinds[self.graph[node]]);
            }
        }
        closure
    }

    /// Reflexive: every known kind is a kind of itself.
    pub fn is_kind_of(&self, narrower: &str, broader: &str) -> bool {
        match (self.by_uri.get(narrower), self.by_uri.get(broader)) {
            (Some(&n), Some(&b)) => has_path_connecting(&self.graph, n, b, None),
            _ => false,
        }
    }
}
