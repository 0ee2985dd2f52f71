//! Weighted co-occurrence graph.
//!
//! Pair events are counted into edge weights, the heaviest edges are kept,
//! and each surviving node gets a degree-centrality score.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cooccurrence::TermPair;

/// A term in the retained graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphNode {
    /// The term.
    pub term: String,
    /// Number of distinct neighbors.
    pub degree: usize,
    /// `degree / (nodes - 1)`, or 0 for graphs with one node or none.
    pub centrality: f64,
}

/// An undirected weighted edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphEdge {
    /// Lexicographically smaller endpoint.
    pub source: String,
    /// Lexicographically larger endpoint.
    pub target: String,
    /// Number of documents in which both terms appeared.
    pub weight: usize,
}

/// Co-occurrence network. Edges are sorted by weight, heaviest first; nodes
/// appear in the order their first edge was retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Graph {
    /// Terms with at least one retained edge.
    pub nodes: Vec<GraphNode>,
    /// Retained edges.
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Whether there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Look up a node by term.
    pub fn node(&self, term: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.term == term)
    }
}

/// Aggregate pair events into counts, ranked by count with ties kept in
/// first-occurrence order.
pub fn edge_weights(pairs: &[TermPair]) -> Vec<(TermPair, usize)> {
    let mut index: HashMap<&TermPair, usize> = HashMap::new();
    let mut weights: Vec<(TermPair, usize)> = Vec::new();

    for pair in pairs {
        if let Some(&i) = index.get(pair) {
            weights[i].1 += 1;
        } else {
            index.insert(pair, weights.len());
            weights.push((pair.clone(), 1));
        }
    }

    // sort_by is stable: equal weights keep first-occurrence order
    weights.sort_by(|a, b| b.1.cmp(&a.1));
    weights
}

/// Build the graph from the `edge_top_n` heaviest pairs.
///
/// `edge_top_n` larger than the number of distinct pairs keeps them all;
/// zero, or no pairs at all, gives an empty graph.
#[tracing::instrument(skip(pairs), fields(pair_events = pairs.len()))]
pub fn build_graph(pairs: &[TermPair], edge_top_n: usize) -> Graph {
    let mut ranked = edge_weights(pairs);
    ranked.truncate(edge_top_n);

    let mut order: Vec<&str> = Vec::new();
    let mut degree: HashMap<&str, usize> = HashMap::new();
    for (pair, _) in &ranked {
        for term in [pair.first.as_str(), pair.second.as_str()] {
            let d = degree.entry(term).or_insert_with(|| {
                order.push(term);
                0
            });
            *d += 1;
        }
    }

    let n = order.len();
    let nodes = order
        .iter()
        .map(|term| {
            let d = degree.get(term).copied().unwrap_or(0);
            GraphNode {
                term: (*term).to_string(),
                degree: d,
                centrality: if n > 1 { d as f64 / (n - 1) as f64 } else { 0.0 },
            }
        })
        .collect();

    let edges = ranked
        .iter()
        .map(|(pair, weight)| GraphEdge {
            source: pair.first.clone(),
            target: pair.second.clone(),
            weight: *weight,
        })
        .collect();

    let graph = Graph { nodes, edges };
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(a: &str, b: &str) -> TermPair {
        TermPair::new(a, b).unwrap()
    }

    fn example_pairs() -> Vec<TermPair> {
        vec![
            // document 1: {데몬, 애니메이션, 케이팝, 헌터스}
            p("데몬", "애니메이션"),
            p("데몬", "케이팝"),
            p("데몬", "헌터스"),
            p("애니메이션", "케이팝"),
            p("애니메이션", "헌터스"),
            p("케이팝", "헌터스"),
            // document 2: {애니메이션, 영화, 케이팝}
            p("애니메이션", "영화"),
            p("애니메이션", "케이팝"),
            p("영화", "케이팝"),
        ]
    }

    #[test]
    fn heaviest_edge_comes_first() {
        let g = build_graph(&example_pairs(), 10);
        assert_eq!(g.edges.len(), 8);
        assert_eq!(g.edges[0].source, "애니메이션");
        assert_eq!(g.edges[0].target, "케이팝");
        assert_eq!(g.edges[0].weight, 2);
        assert!(g.edges[1..].iter().all(|e| e.weight == 1));
    }

    #[test]
    fn ties_keep_first_occurrence_order() {
        let g = build_graph(&example_pairs(), 3);
        let kept: Vec<_> = g.edges.iter().map(|e| (e.source.as_str(), e.target.as_str())).collect();
        assert_eq!(
            kept,
            vec![("애니메이션", "케이팝"), ("데몬", "애니메이션"), ("데몬", "케이팝")]
        );
    }

    #[test]
    fn nodes_without_retained_edges_are_dropped() {
        let g = build_graph(&example_pairs(), 1);
        assert_eq!(g.nodes.len(), 2);
        assert!(g.node("데몬").is_none());
        assert!(g.node("영화").is_none());
    }

    #[test]
    fn degree_centrality_is_normalized() {
        let g = build_graph(&example_pairs(), 10);
        assert_eq!(g.nodes.len(), 5);
        let hub = g.node("케이팝").unwrap();
        assert_eq!(hub.degree, 4);
        assert!((hub.centrality - 1.0).abs() < f64::EPSILON);
        let leaf = g.node("영화").unwrap();
        assert_eq!(leaf.degree, 2);
        assert!((leaf.centrality - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn single_edge_graph() {
        let g = build_graph(&[p("a", "b")], 5);
        assert_eq!(g.nodes.len(), 2);
        assert!(g.nodes.iter().all(|n| (n.centrality - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn zero_top_n_gives_empty_graph() {
        let g = build_graph(&example_pairs(), 0);
        assert!(g.is_empty());
        assert!(g.nodes.is_empty());
    }

    #[test]
    fn no_pairs_gives_empty_graph() {
        let g = build_graph(&[], 50);
        assert!(g.nodes.is_empty());
        assert!(g.edges.is_empty());
    }

    #[test]
    fn edge_weights_count_documents() {
        let weights = edge_weights(&example_pairs());
        assert_eq!(weights.len(), 8);
        assert_eq!(weights[0], (p("애니메이션", "케이팝"), 2));
    }

    #[test]
    fn equal_weights_keep_first_occurrence() {
        let pairs = vec![
            p("나", "다"),
            p("가", "라"),
            p("마", "바"),
            p("가", "라"),
            p("마", "바"),
            p("가", "나"),
        ];
        let order: Vec<_> = edge_weights(&pairs).into_iter().map(|(pair, _)| pair).collect();
        assert_eq!(order, vec![p("가", "라"), p("마", "바"), p("나", "다"), p("가", "나")]);
    }
}
