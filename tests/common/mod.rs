#![allow(dead_code)]

use tensor_graph::{DType, Graph, NodeId, NodeOp, WhichBinaryOp};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Seven-node fixture:
///
/// ```text
///   const_0   ________________
///      \     /                \
///       add_0 --- mul_0 --- add_1 --- result_0
///      /        /
///   input_0   const_1
/// ```
pub struct FakeGraph {
    pub graph: Graph,
    pub input_0: NodeId,
    pub const_0: NodeId,
    pub add_0: NodeId,
    pub const_1: NodeId,
    pub mul_0: NodeId,
    pub add_1: NodeId,
    pub result_0: NodeId,
}

pub fn build_fake_graph() -> FakeGraph {
    let mut graph = Graph::new();
    let input_0 = graph.add_input(DType::F32, [12], Some("input_0"));
    let const_0 = graph.add_constant(DType::F32, [12], Some("const_0"));
    let add_0 = graph
        .add_node(
            NodeOp::Binary(WhichBinaryOp::Add),
            &[
                graph.output_of(input_0).unwrap(),
                graph.output_of(const_0).unwrap(),
            ],
            Some("add_0"),
        )
        .unwrap();
    let const_1 = graph.add_constant(DType::F32, [12], Some("const_1"));
    let mul_0 = graph
        .add_node(
            NodeOp::Binary(WhichBinaryOp::Mul),
            &[
                graph.output_of(add_0).unwrap(),
                graph.output_of(const_1).unwrap(),
            ],
            Some("mul_0"),
        )
        .unwrap();
    let add_1 = graph
        .add_node(
            NodeOp::Binary(WhichBinaryOp::Add),
            &[
                graph.output_of(mul_0).unwrap(),
                graph.output_of(add_0).unwrap(),
            ],
            Some("add_1"),
        )
        .unwrap();
    let result_0 = graph
        .add_output(graph.output_of(add_1).unwrap(), Some("result_0"))
        .unwrap();
    FakeGraph {
        graph,
        input_0,
        const_0,
        add_0,
        const_1,
        mul_0,
        add_1,
        result_0,
    }
}

/// Checks the bidirectional bookkeeping invariant over the whole arena:
/// every descriptor's consumer list holds exactly the live nodes with a
/// non-expired reference to it, and every live node's live inputs list it
/// as a consumer.
pub fn assert_links_consistent(graph: &Graph) {
    for node_id in graph.node_ids() {
        let node = graph.node(node_id).unwrap();
        for input_id in node.inputs() {
            if let Some(tensor) = graph.tensor(*input_id) {
                assert!(
                    tensor.consumers().contains(&node_id),
                    "node {node_id} consumes tensor {input_id} but is missing from its consumer list"
                );
                assert!(
                    graph.node(tensor.producer()).is_some(),
                    "live tensor {input_id} has a dead producer"
                );
            }
        }
        for output_id in node.outputs() {
            let tensor = graph
                .tensor(*output_id)
                .unwrap_or_else(|| panic!("live node {node_id} owns a dead output {output_id}"));
            assert_eq!(tensor.producer(), node_id);
            for consumer in tensor.consumers() {
                let consumer_node = graph
                    .node(*consumer)
                    .unwrap_or_else(|| panic!("tensor {output_id} lists dead consumer {consumer}"));
                assert!(consumer_node.inputs().contains(output_id));
            }
        }
    }
}
