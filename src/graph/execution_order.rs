//! Topological execution-order resolution.
//!
//! Built on the backward depth-first walk: each designated output is
//! explored fully (no pruning, no deduplication at the walk layer), the
//! per-output pre-order visitation sequences are concatenated and
//! reversed, and duplicates are then eliminated keeping the occurrence
//! closest to the front of the reversed sequence. That keeps the last
//! visitation of every node; every visit of a consumer is followed by a
//! visit of each of its producers, so the surviving occurrences still
//! satisfy producers-before-consumers.

use std::collections::HashSet;

use log::debug;

use super::{Graph, GraphError, Node, NodeId};

impl Graph {
    /// Resolves a deduplicated topological ordering of the subgraph
    /// reachable backward from the designated outputs.
    ///
    /// An empty `outputs` slice defaults to every sink-kind node in the
    /// graph, in id order. Designated outputs are processed in reverse of
    /// the supplied order so multi-output results stay stable after the
    /// final reversal. Every designated input must appear in the resolved
    /// set or the whole resolution fails with
    /// [`GraphError::DisconnectedInput`]; an expired input reference
    /// anywhere in the explored subgraph aborts with
    /// [`GraphError::GraphIntegrity`]. No partial result is returned on
    /// either failure.
    ///
    /// The optional callback is invoked once per node in resolved order;
    /// the order is returned regardless.
    pub fn execution_order(
        &self,
        inputs: &[NodeId],
        outputs: &[NodeId],
        mut callback: Option<&mut dyn FnMut(NodeId, &Node)>,
    ) -> Result<Vec<NodeId>, GraphError> {
        let outputs = if outputs.is_empty() {
            let mut sinks: Vec<NodeId> = self
                .nodes()
                .iter()
                .filter(|(_, node)| node.op().is_sink())
                .map(|(id, _)| *id)
                .collect();
            sinks.sort_unstable();
            sinks
        } else {
            outputs.to_vec()
        };

        let mut visitation = Vec::new();
        for output in outputs.iter().rev() {
            self.dfs_backward(*output, |node_id, _| {
                visitation.push(node_id);
                true
            })?;
        }
        visitation.reverse();

        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(visitation.len());
        for node_id in visitation {
            if seen.insert(node_id) {
                order.push(node_id);
            }
        }

        for input in inputs {
            if !seen.contains(input) {
                let node = self.node(*input).ok_or(GraphError::UnknownNode(*input))?;
                return Err(GraphError::DisconnectedInput {
                    node: node.name().to_string(),
                });
            }
        }

        debug!(
            "resolved execution order of {} nodes from {} outputs",
            order.len(),
            outputs.len()
        );

        if let Some(callback) = callback.as_mut() {
            for node_id in &order {
                if let Some(node) = self.node(*node_id) {
                    callback(*node_id, node);
                }
            }
        }
        Ok(order)
    }
}
