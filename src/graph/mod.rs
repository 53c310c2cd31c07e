pub mod ops;
mod traversal;
mod execution_order;

use std::collections::HashMap;

use log::debug;

use crate::dtype::DType;
use crate::shape::Shape;
use ops::NodeOp;

pub type NodeId = usize;
pub type TensorId = usize;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("unknown node id {0}")]
    UnknownNode(NodeId),
    #[error("unknown tensor id {0}")]
    UnknownTensor(TensorId),
    #[error("operator {op} expects {expected} inputs, got {got}")]
    InvalidOperatorInputs {
        op: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("dtype mismatch for operator {op}: {left} vs {right}")]
    DTypeMismatch {
        op: &'static str,
        left: DType,
        right: DType,
    },
    #[error("shape mismatch for operator {op}: {left} vs {right}")]
    ShapeMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },
    #[error(
        "graph integrity violation: input {input_index} of node \"{node}\" refers to a tensor whose producer no longer exists"
    )]
    GraphIntegrity { node: String, input_index: usize },
    #[error("designated input node \"{node}\" is not an ancestor of any designated output")]
    DisconnectedInput { node: String },
}

/// Value edge of the graph: declared dtype and shape, a back-reference to
/// the node that produced it, and the nodes currently consuming it.
///
/// A descriptor is owned by its producer: removing the producer from the
/// [`Graph`] removes the descriptor as well. `consumers` is kept in
/// registration order, which is what makes traversal sibling order
/// deterministic.
#[derive(Clone, Debug)]
pub struct TensorDescriptor {
    dtype: DType,
    shape: Shape,
    producer: NodeId,
    consumers: Vec<NodeId>,
}

impl TensorDescriptor {
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn producer(&self) -> NodeId {
        self.producer
    }

    pub fn consumers(&self) -> &[NodeId] {
        &self.consumers
    }
}

/// Graph vertex: an op kind, an ordered list of weakly-held input tensor
/// ids, and an ordered list of owned output tensor ids.
///
/// Input ids are weak by convention: they keep their slot when the
/// producing node is removed, so the positional index stays stable, but
/// they no longer resolve through [`Graph::tensor`]. Dereferencing such an
/// entry during a backward walk is a [`GraphError::GraphIntegrity`]
/// failure, never a silent skip.
#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    op: NodeOp,
    inputs: Vec<TensorId>,
    outputs: Vec<TensorId>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn op(&self) -> &NodeOp {
        &self.op
    }

    pub fn inputs(&self) -> &[TensorId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorId] {
        &self.outputs
    }
}

/// Arena owning every node and tensor descriptor of one graph-construction
/// context. Ids are monotonically increasing and never reused, so "this id
/// is absent from the arena" doubles as the expiry check for weak input
/// references.
///
/// Single-threaded by design: every operation runs to completion on the
/// calling thread and the caller serializes access.
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    tensors: HashMap<TensorId, TensorDescriptor>,
    next_node_id: NodeId,
    next_tensor_id: TensorId,
    next_name_suffix: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            tensors: HashMap::new(),
            next_node_id: 0,
            next_tensor_id: 0,
            next_name_suffix: 0,
        }
    }

    /// Leaf node declaring exactly one output of the given dtype and shape.
    pub fn add_input(&mut self, dtype: DType, shape: impl Into<Shape>, name: Option<&str>) -> NodeId {
        self.add_node(
            NodeOp::Input {
                dtype,
                shape: shape.into(),
            },
            &[],
            name,
        )
        .unwrap_or_else(|_| unreachable!("leaf construction takes no inputs"))
    }

    /// Leaf node for a constant of the given dtype and shape.
    pub fn add_constant(&mut self, dtype: DType, shape: impl Into<Shape>, name: Option<&str>) -> NodeId {
        self.add_node(
            NodeOp::Constant {
                dtype,
                shape: shape.into(),
            },
            &[],
            name,
        )
        .unwrap_or_else(|_| unreachable!("leaf construction takes no inputs"))
    }

    /// Sink node marking a terminal result. Has no outputs of its own.
    pub fn add_output(&mut self, input: TensorId, name: Option<&str>) -> Result<NodeId, GraphError> {
        self.add_node(NodeOp::Output, &[input], name)
    }

    /// Derived node: links this node as a consumer on every live input,
    /// then runs the op's output derivation exactly once to populate the
    /// owned output descriptors.
    ///
    /// Expired input ids are tolerated in the input list (they simply never
    /// get a consumer registration), but ops whose derivation must inspect
    /// an expired input fail with [`GraphError::GraphIntegrity`].
    pub fn add_node(
        &mut self,
        op: NodeOp,
        inputs: &[TensorId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if inputs.len() != op.arity() {
            return Err(GraphError::InvalidOperatorInputs {
                op: op.kind_prefix(),
                expected: op.arity(),
                got: inputs.len(),
            });
        }

        let name = match name {
            Some(name) => name.to_string(),
            None => self.generate_name(op.kind_prefix()),
        };

        let resolved: Vec<Option<&TensorDescriptor>> =
            inputs.iter().map(|id| self.tensors.get(id)).collect();
        let derived = op.derive_outputs(&name, &resolved)?;

        let node_id = self.next_node_id;
        self.next_node_id += 1;

        for input_id in inputs {
            if let Some(tensor) = self.tensors.get_mut(input_id) {
                tensor.consumers.push(node_id);
            }
        }

        let mut outputs = Vec::with_capacity(derived.len());
        for (dtype, shape) in derived {
            let tensor_id = self.next_tensor_id;
            self.next_tensor_id += 1;
            self.tensors.insert(
                tensor_id,
                TensorDescriptor {
                    dtype,
                    shape,
                    producer: node_id,
                    consumers: Vec::new(),
                },
            );
            outputs.push(tensor_id);
        }

        debug!(
            "added node {node_id} \"{name}\" with {} inputs and {} outputs",
            inputs.len(),
            outputs.len()
        );

        self.nodes.insert(
            node_id,
            Node {
                name,
                op,
                inputs: inputs.to_vec(),
                outputs,
            },
        );
        Ok(node_id)
    }

    /// Unlink protocol for node destruction: deregisters the node from the
    /// consumer list of every still-live input descriptor, then removes the
    /// node's owned output descriptors from the arena. Input entries in
    /// still-live consumers keep their slot and report as expired from now
    /// on.
    ///
    /// Correct for any destruction order: producer before consumer, or
    /// consumer before producer.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let node = self
            .nodes
            .remove(&node_id)
            .ok_or(GraphError::UnknownNode(node_id))?;
        for input_id in &node.inputs {
            if let Some(tensor) = self.tensors.get_mut(input_id) {
                tensor.consumers.retain(|consumer| *consumer != node_id);
            }
        }
        for output_id in &node.outputs {
            self.tensors.remove(output_id);
        }
        debug!("removed node {node_id} \"{}\"", node.name);
        Ok(())
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn tensor(&self, tensor_id: TensorId) -> Option<&TensorDescriptor> {
        self.tensors.get(&tensor_id)
    }

    /// Liveness check for a weak input reference.
    pub fn is_expired(&self, tensor_id: TensorId) -> bool {
        !self.tensors.contains_key(&tensor_id)
    }

    /// First output of a node, the common single-output case.
    pub fn output_of(&self, node_id: NodeId) -> Option<TensorId> {
        self.nodes.get(&node_id)?.outputs.first().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.nodes
    }

    pub(crate) fn tensors(&self) -> &HashMap<TensorId, TensorDescriptor> {
        &self.tensors
    }

    /// Auto-generated names are unique within this construction context
    /// only; the counter is owned state, not a process-wide global.
    fn generate_name(&mut self, prefix: &str) -> String {
        let suffix = self.next_name_suffix;
        self.next_name_suffix += 1;
        format!("{prefix}_{suffix}")
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
