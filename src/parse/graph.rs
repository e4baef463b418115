//! petgraph-based adjacency view over a flow document.
//!
//! Borrows ids and handle tags from the document; building a graph never
//! fails. A connection to an id that is not in the document gets a
//! placeholder vertex with no outgoing edges, so traversal treats it as a
//! dead end.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Control, DfsEvent, depth_first_search};

use super::types::FlowDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeLabel<'a> {
    pub source_handle: Option<&'a str>,
}

pub struct FlowGraph<'a> {
    pub graph: DiGraph<&'a str, EdgeLabel<'a>>,
    pub node_indices: HashMap<&'a str, NodeIndex>,
}

impl<'a> FlowGraph<'a> {
    pub fn build(flow: &'a FlowDocument) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices: HashMap<&'a str, NodeIndex> = HashMap::new();

        // Duplicate ids share the first vertex
        for node in flow.all_nodes() {
            node_indices
                .entry(node.id.as_str())
                .or_insert_with(|| graph.add_node(node.id.as_str()));
        }

        for node in flow.all_nodes() {
            let source = node_indices[node.id.as_str()];
            for conn in &node.connections {
                let target = *node_indices
                    .entry(conn.target_node_id.as_str())
                    .or_insert_with(|| graph.add_node(conn.target_node_id.as_str()));
                graph.add_edge(
                    source,
                    target,
                    EdgeLabel {
                        source_handle: conn.source_handle.as_deref(),
                    },
                );
            }
        }

        FlowGraph {
            graph,
            node_indices,
        }
    }

    /// Ids reachable from `start` (inclusive), breadth-first along outgoing
    /// edges. Empty when `start` is not in the graph.
    pub fn reachable_from(&self, start: &str) -> HashSet<&'a str> {
        let mut reachable = HashSet::new();
        let Some(&start_idx) = self.node_indices.get(start) else {
            return reachable;
        };

        let mut bfs = Bfs::new(&self.graph, start_idx);
        while let Some(nx) = bfs.next(&self.graph) {
            reachable.insert(self.graph[nx]);
        }
        reachable
    }

    /// True if a depth-first walk from `start` meets an edge back into a
    /// vertex still on its recursion stack. Only cycles reachable from
    /// `start` count; which vertices form the cycle is not reported.
    pub fn has_cycle_from(&self, start: &str) -> bool {
        let Some(&start_idx) = self.node_indices.get(start) else {
            return false;
        };

        let result = depth_first_search(&self.graph, Some(start_idx), |event| match event {
            DfsEvent::BackEdge(_, _) => Control::Break(()),
            _ => Control::Continue,
        });
        result.break_value().is_some()
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return 0;
        };
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Source-handle tags on the node's outgoing edges, in edge order.
    pub fn outgoing_handles(&self, node_id: &str) -> Vec<Option<&'a str>> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        let mut handles: Vec<Option<&'a str>> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.weight().source_handle)
            .collect();
        // petgraph walks outgoing edges newest first
        handles.reverse();
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{Connection, FlowKind, FlowNode, NodeKind, NodeSpec};

    fn node(id: &str, kind: NodeKind, targets: &[&str]) -> FlowNode {
        let mut n = FlowNode::new(id, id, NodeSpec::default_for(kind));
        n.connections = targets.iter().map(|t| Connection::to(t)).collect();
        n
    }

    fn flow(trigger_targets: &[&str], nodes: Vec<FlowNode>) -> FlowDocument {
        let mut doc = FlowDocument::new_default("d", "f", "F", FlowKind::Traditional);
        let trigger = doc.trigger.as_mut().unwrap();
        trigger.id = "t".into();
        trigger.connections = trigger_targets.iter().map(|t| Connection::to(t)).collect();
        doc.nodes = nodes;
        doc
    }

    #[test]
    fn reachable_follows_outgoing_edges_only() {
        let doc = flow(
            &["a"],
            vec![
                node("a", NodeKind::Process, &["b"]),
                node("b", NodeKind::Terminal, &[]),
                node("c", NodeKind::Process, &["b"]),
            ],
        );
        let graph = FlowGraph::build(&doc);
        let reachable = graph.reachable_from("t");
        assert_eq!(reachable, HashSet::from(["t", "a", "b"]));
    }

    #[test]
    fn unknown_target_is_a_dead_end() {
        let doc = flow(&["ghost"], vec![]);
        let graph = FlowGraph::build(&doc);
        assert!(graph.reachable_from("t").contains("ghost"));
        assert_eq!(graph.outgoing_count("ghost"), 0);
        assert!(!graph.has_cycle_from("t"));
    }

    #[test]
    fn unknown_start_yields_nothing() {
        let doc = flow(&[], vec![]);
        let graph = FlowGraph::build(&doc);
        assert!(graph.reachable_from("missing").is_empty());
        assert!(!graph.has_cycle_from("missing"));
    }

    #[test]
    fn detects_back_edge() {
        let doc = flow(
            &["a"],
            vec![
                node("a", NodeKind::Process, &["b"]),
                node("b", NodeKind::Process, &["a"]),
            ],
        );
        assert!(FlowGraph::build(&doc).has_cycle_from("t"));
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let doc = flow(
            &["a", "b"],
            vec![
                node("a", NodeKind::Process, &["c"]),
                node("b", NodeKind::Process, &["c"]),
                node("c", NodeKind::Terminal, &[]),
            ],
        );
        assert!(!FlowGraph::build(&doc).has_cycle_from("t"));
    }

    #[test]
    fn cycle_outside_trigger_reach_is_ignored() {
        let doc = flow(
            &[],
            vec![
                node("a", NodeKind::Process, &["b"]),
                node("b", NodeKind::Process, &["a"]),
            ],
        );
        assert!(!FlowGraph::build(&doc).has_cycle_from("t"));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let doc = flow(&["a"], vec![node("a", NodeKind::Process, &["a"])]);
        assert!(FlowGraph::build(&doc).has_cycle_from("t"));
    }

    #[test]
    fn handles_are_reported_in_connection_order() {
        let mut decision = node("d", NodeKind::Decision, &[]);
        decision.connections = vec![
            Connection::from_handle("true", "x"),
            Connection::from_handle("false", "y"),
            Connection::to("z"),
        ];
        let doc = flow(&["d"], vec![decision]);
        let graph = FlowGraph::build(&doc);
        assert_eq!(
            graph.outgoing_handles("d"),
            vec![Some("true"), Some("false"), None]
        );
        assert_eq!(graph.outgoing_count("d"), 3);
    }
}
