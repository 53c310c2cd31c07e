//! Generic graph walks.
//!
//! Four walks, forward/backward crossed with breadth-first/depth-first,
//! all driven by a per-node callback returning whether to keep exploring.
//! Stop semantics differ by family and are part of the contract:
//!
//! - BFS family: a `false` return halts the entire walk immediately.
//! - DFS family (pre-order, recursive): a `false` return only prunes
//!   descent from the current node; siblings still get visited.
//!
//! No walk deduplicates: a node reachable over several fan-in or fan-out
//! paths is revisited once per path. Sibling order follows registration
//! order (output list order going forward, input list order going
//! backward). Backward walks fail with [`GraphError::GraphIntegrity`] the
//! moment they must dereference an expired input; they never skip the
//! link.

use std::collections::VecDeque;

use super::{Graph, GraphError, Node, NodeId};

impl Graph {
    /// Level-order walk along producer→consumer edges.
    pub fn bfs_forward(
        &self,
        start: NodeId,
        mut callback: impl FnMut(NodeId, &Node) -> bool,
    ) -> Result<(), GraphError> {
        let mut queue = VecDeque::from([start]);
        while let Some(node_id) = queue.pop_front() {
            let node = self.nodes().get(&node_id).ok_or(GraphError::UnknownNode(node_id))?;
            if !callback(node_id, node) {
                return Ok(());
            }
            for output_id in node.outputs() {
                // Outputs of a live node are always live.
                if let Some(tensor) = self.tensors().get(output_id) {
                    queue.extend(tensor.consumers().iter().copied());
                }
            }
        }
        Ok(())
    }

    /// Level-order walk along consumer→producer edges.
    pub fn bfs_backward(
        &self,
        start: NodeId,
        mut callback: impl FnMut(NodeId, &Node) -> bool,
    ) -> Result<(), GraphError> {
        let mut queue = VecDeque::from([start]);
        while let Some(node_id) = queue.pop_front() {
            let node = self.nodes().get(&node_id).ok_or(GraphError::UnknownNode(node_id))?;
            if !callback(node_id, node) {
                return Ok(());
            }
            for (input_index, input_id) in node.inputs().iter().enumerate() {
                let tensor =
                    self.tensors()
                        .get(input_id)
                        .ok_or_else(|| GraphError::GraphIntegrity {
                            node: node.name().to_string(),
                            input_index,
                        })?;
                queue.push_back(tensor.producer());
            }
        }
        Ok(())
    }

    /// Pre-order walk along producer→consumer edges.
    pub fn dfs_forward(
        &self,
        start: NodeId,
        mut callback: impl FnMut(NodeId, &Node) -> bool,
    ) -> Result<(), GraphError> {
        self.dfs_forward_from(start, &mut callback)
    }

    fn dfs_forward_from(
        &self,
        node_id: NodeId,
        callback: &mut impl FnMut(NodeId, &Node) -> bool,
    ) -> Result<(), GraphError> {
        let node = self.nodes().get(&node_id).ok_or(GraphError::UnknownNode(node_id))?;
        if !callback(node_id, node) {
            return Ok(());
        }
        for output_id in node.outputs() {
            if let Some(tensor) = self.tensors().get(output_id) {
                for consumer in tensor.consumers() {
                    self.dfs_forward_from(*consumer, callback)?;
                }
            }
        }
        Ok(())
    }

    /// Pre-order walk along consumer→producer edges.
    pub fn dfs_backward(
        &self,
        start: NodeId,
        mut callback: impl FnMut(NodeId, &Node) -> bool,
    ) -> Result<(), GraphError> {
        self.dfs_backward_from(start, &mut callback)
    }

    fn dfs_backward_from(
        &self,
        node_id: NodeId,
        callback: &mut impl FnMut(NodeId, &Node) -> bool,
    ) -> Result<(), GraphError> {
        let node = self.nodes().get(&node_id).ok_or(GraphError::UnknownNode(node_id))?;
        if !callback(node_id, node) {
            return Ok(());
        }
        for (input_index, input_id) in node.inputs().iter().enumerate() {
            let tensor = self
                .tensors()
                .get(input_id)
                .ok_or_else(|| GraphError::GraphIntegrity {
                    node: node.name().to_string(),
                    input_index,
                })?;
            self.dfs_backward_from(tensor.producer(), callback)?;
        }
        Ok(())
    }
}
