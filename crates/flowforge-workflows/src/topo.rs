// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Topological ordering of workflow nodes.
//!
//! Produces an execution order that lists every node after all of its
//! predecessors. Ordering is deterministic: nodes are visited in authoring
//! order, so independent nodes keep their relative input positions.

use flowforge_dsl::Edge;
use std::collections::{HashMap, HashSet};

/// Raised when the dependency edges form a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// One node that lies on the detected cycle.
    pub node_id: String,
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cycle detected in workflow graph involving node '{}'. \
            Remove the edge that closes the loop.",
            self.node_id
        )
    }
}

impl std::error::Error for CycleError {}

#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    Visiting,
    Visited,
}

/// Order node ids so that every node appears after all of its predecessors.
///
/// Edges whose source or target id does not appear in `node_ids` are ignored
/// rather than rejected; the upstream validator reports dangling edges, the
/// compiler just tolerates them.
pub fn execution_order(node_ids: &[String], edges: &[Edge]) -> Result<Vec<String>, CycleError> {
    let known: HashSet<&str> = node_ids.iter().map(String::as_str).collect();

    // Predecessor sets: for each node, the sources of in-graph edges targeting it.
    let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        if known.contains(edge.source.as_str()) && known.contains(edge.target.as_str()) {
            predecessors
                .entry(edge.target.as_str())
                .or_default()
                .push(edge.source.as_str());
        }
    }

    let mut state: HashMap<&str, VisitState> = HashMap::new();
    let mut order = Vec::with_capacity(node_ids.len());

    for id in node_ids {
        visit(id, &predecessors, &mut state, &mut order)?;
    }

    Ok(order)
}

fn visit<'a>(
    id: &'a str,
    predecessors: &HashMap<&'a str, Vec<&'a str>>,
    state: &mut HashMap<&'a str, VisitState>,
    order: &mut Vec<String>,
) -> Result<(), CycleError> {
    match state.get(id) {
        Some(VisitState::Visited) => return Ok(()),
        Some(VisitState::Visiting) => {
            return Err(CycleError {
                node_id: id.to_string(),
            });
        }
        None => {}
    }

    state.insert(id, VisitState::Visiting);

    if let Some(preds) = predecessors.get(id) {
        for pred in preds {
            visit(pred, predecessors, state, order)?;
        }
    }

    state.insert(id, VisitState::Visited);
    order.push(id.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn edge(id: &str, source: &str, target: &str) -> Edge {
        Edge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_linear_chain() {
        let order =
            execution_order(&ids(&["a", "b", "c"]), &[edge("e1", "a", "b"), edge("e2", "b", "c")])
                .unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sources_precede_targets() {
        // c listed first but depends on both a and b
        let node_ids = ids(&["c", "a", "b"]);
        let edges = [edge("e1", "a", "c"), edge("e2", "b", "c")];
        let order = execution_order(&node_ids, &edges).unwrap();

        assert_eq!(order.len(), 3);
        for e in &edges {
            let s = order.iter().position(|n| *n == e.source).unwrap();
            let t = order.iter().position(|n| *n == e.target).unwrap();
            assert!(s < t, "{} must precede {}", e.source, e.target);
        }
    }

    #[test]
    fn test_independent_nodes_keep_input_order() {
        let order = execution_order(&ids(&["x", "m", "a"]), &[]).unwrap();
        assert_eq!(order, vec!["x", "m", "a"]);
    }

    #[test]
    fn test_diamond() {
        let order = execution_order(
            &ids(&["a", "b", "c", "d"]),
            &[
                edge("e1", "a", "b"),
                edge("e2", "a", "c"),
                edge("e3", "b", "d"),
                edge("e4", "c", "d"),
            ],
        )
        .unwrap();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_cycle_names_a_node_on_the_cycle() {
        let err = execution_order(
            &ids(&["a", "b", "c"]),
            &[edge("e1", "a", "b"), edge("e2", "b", "c"), edge("e3", "c", "a")],
        )
        .unwrap_err();
        assert!(["a", "b", "c"].contains(&err.node_id.as_str()));
    }

    #[test]
    fn test_self_edge_is_a_cycle() {
        let err = execution_order(&ids(&["a"]), &[edge("e1", "a", "a")]).unwrap_err();
        assert_eq!(err.node_id, "a");
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let order = execution_order(
            &ids(&["a", "b"]),
            &[edge("e1", "ghost", "a"), edge("e2", "b", "phantom")],
        )
        .unwrap();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_edges_tolerated() {
        let order = execution_order(
            &ids(&["a", "b"]),
            &[edge("e1", "a", "b"), edge("e2", "a", "b")],
        )
        .unwrap();
        assert_eq!(order, vec!["a", "b"]);
    }
}
