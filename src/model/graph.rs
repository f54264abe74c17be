//! petgraph-based adjacency index over the flat block/connection lists.
//!
//! Built on demand by the validator; never stored on `StrategyGraph`, so the
//! model itself holds no back-references and cycle detection stays a
//! stateless traversal over ids.

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::StrategyGraph;

pub struct GraphIndex {
    pub graph: DiGraph<String, ()>,
    pub node_indices: HashMap<String, NodeIndex>,
}

impl GraphIndex {
    /// Index every block; connections with a missing endpoint are skipped
    /// here (the dangling-reference check reports them separately).
    pub fn build(strategy: &StrategyGraph) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for block in &strategy.blocks {
            let idx = graph.add_node(block.id.clone());
            node_indices.insert(block.id.clone(), idx);
        }

        for conn in &strategy.connections {
            if let (Some(&s), Some(&t)) = (
                node_indices.get(&conn.source_id),
                node_indices.get(&conn.target_id),
            ) {
                graph.add_edge(s, t, ());
            }
        }

        GraphIndex {
            graph,
            node_indices,
        }
    }

    /// One representative cycle per cyclic component: the strongly connected
    /// components of size ≥ 2, each as the block ids it spans. Self-loops are
    /// size-1 components and are reported by the self-connection check
    /// instead. Linear in blocks + connections.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() >= 2)
            .map(|scc| scc.iter().map(|&idx| self.graph[idx].clone()).collect())
            .collect()
    }
}
