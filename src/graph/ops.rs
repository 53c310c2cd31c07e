use crate::dtype::DType;
use crate::shape::Shape;

use super::{GraphError, TensorDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum WhichBinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl WhichBinaryOp {
    fn kind_prefix(&self) -> &'static str {
        match self {
            WhichBinaryOp::Add => "add",
            WhichBinaryOp::Sub => "sub",
            WhichBinaryOp::Mul => "mul",
            WhichBinaryOp::Div => "div",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum WhichUnaryOp {
    Relu,
    Sigmoid,
    Tanh,
    Neg,
}

impl WhichUnaryOp {
    fn kind_prefix(&self) -> &'static str {
        match self {
            WhichUnaryOp::Relu => "relu",
            WhichUnaryOp::Sigmoid => "sigmoid",
            WhichUnaryOp::Tanh => "tanh",
            WhichUnaryOp::Neg => "neg",
        }
    }
}

/// Closed set of node kinds. Each variant carries its own output
/// derivation; the set is fixed by the system boundary, so a tagged enum is
/// used rather than an open trait object.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeOp {
    /// Leaf fed from outside the graph; declares one output.
    Input { dtype: DType, shape: Shape },
    /// Leaf holding a fixed value; declares one output.
    Constant { dtype: DType, shape: Shape },
    /// Elementwise two-input compute kind. Output mirrors the first input.
    Binary(WhichBinaryOp),
    /// Elementwise one-input compute kind. Output mirrors the input.
    Unary(WhichUnaryOp),
    /// Sink marking a terminal result; consumes one input, produces nothing.
    Output,
}

impl NodeOp {
    /// Prefix used for auto-generated node names.
    pub fn kind_prefix(&self) -> &'static str {
        match self {
            NodeOp::Input { .. } => "input",
            NodeOp::Constant { .. } => "const",
            NodeOp::Binary(which) => which.kind_prefix(),
            NodeOp::Unary(which) => which.kind_prefix(),
            NodeOp::Output => "output",
        }
    }

    /// Number of inputs this kind consumes.
    pub fn arity(&self) -> usize {
        match self {
            NodeOp::Input { .. } | NodeOp::Constant { .. } => 0,
            NodeOp::Unary(_) | NodeOp::Output => 1,
            NodeOp::Binary(_) => 2,
        }
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, NodeOp::Output)
    }

    /// Computes the declared dtype and shape of every output from the
    /// node's inputs. Invoked exactly once, at construction.
    ///
    /// Inputs arrive pre-resolved; an entry is `None` when the reference
    /// has already expired. Kinds that never inspect their inputs (leaves,
    /// sinks) tolerate that; compute kinds fail with a graph-integrity
    /// error at the offending position.
    pub(crate) fn derive_outputs(
        &self,
        node_name: &str,
        inputs: &[Option<&TensorDescriptor>],
    ) -> Result<Vec<(DType, Shape)>, GraphError> {
        match self {
            NodeOp::Input { dtype, shape } | NodeOp::Constant { dtype, shape } => {
                Ok(vec![(*dtype, shape.clone())])
            }
            NodeOp::Output => Ok(vec![]),
            NodeOp::Unary(_) => {
                let input = resolve(node_name, inputs, 0)?;
                Ok(vec![(input.dtype(), input.shape().clone())])
            }
            NodeOp::Binary(_) => {
                let a = resolve(node_name, inputs, 0)?;
                let b = resolve(node_name, inputs, 1)?;
                if a.dtype() != b.dtype() {
                    return Err(GraphError::DTypeMismatch {
                        op: self.kind_prefix(),
                        left: a.dtype(),
                        right: b.dtype(),
                    });
                }
                if a.shape() != b.shape() {
                    return Err(GraphError::ShapeMismatch {
                        op: self.kind_prefix(),
                        left: a.shape().clone(),
                        right: b.shape().clone(),
                    });
                }
                Ok(vec![(a.dtype(), a.shape().clone())])
            }
        }
    }
}

fn resolve<'a>(
    node_name: &str,
    inputs: &[Option<&'a TensorDescriptor>],
    index: usize,
) -> Result<&'a TensorDescriptor, GraphError> {
    inputs[index].ok_or_else(|| GraphError::GraphIntegrity {
        node: node_name.to_string(),
        input_index: index,
    })
}
