pub mod dataset;
pub mod dtype;
pub mod graph;
pub mod shape;

pub use dtype::{DType, DTypeOfPrimitive};
pub use graph::ops::{NodeOp, WhichBinaryOp, WhichUnaryOp};
pub use graph::{Graph, GraphError, Node, NodeId, TensorDescriptor, TensorId};
pub use shape::Shape;
