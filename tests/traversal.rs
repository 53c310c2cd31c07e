mod common;

use common::{build_fake_graph, init_logging};
use tensor_graph::GraphError;

fn joined_names(names: &[String]) -> String {
    names.iter().map(|name| format!("/{name}")).collect()
}

#[test]
fn forward_bfs_revisits_fan_in_nodes_per_path() {
    init_logging();
    let fixture = build_fake_graph();
    let mut visited = Vec::new();
    fixture
        .graph
        .bfs_forward(fixture.input_0, |_, node| {
            visited.push(node.name().to_string());
            true
        })
        .unwrap();
    assert_eq!(
        joined_names(&visited),
        "/input_0/add_0/mul_0/add_1/add_1/result_0/result_0"
    );
}

#[test]
fn backward_bfs_follows_input_order() {
    let fixture = build_fake_graph();
    let mut visited = Vec::new();
    fixture
        .graph
        .bfs_backward(fixture.result_0, |_, node| {
            visited.push(node.name().to_string());
            true
        })
        .unwrap();
    assert_eq!(
        joined_names(&visited),
        "/result_0/add_1/mul_0/add_0/add_0/const_1/input_0/const_0/input_0/const_0"
    );
}

#[test]
fn forward_dfs_is_preorder() {
    let fixture = build_fake_graph();
    let mut visited = Vec::new();
    fixture
        .graph
        .dfs_forward(fixture.input_0, |_, node| {
            visited.push(node.name().to_string());
            true
        })
        .unwrap();
    assert_eq!(
        joined_names(&visited),
        "/input_0/add_0/mul_0/add_1/result_0/add_1/result_0"
    );
}

#[test]
fn backward_dfs_is_preorder() {
    let fixture = build_fake_graph();
    let mut visited = Vec::new();
    fixture
        .graph
        .dfs_backward(fixture.result_0, |_, node| {
            visited.push(node.name().to_string());
            true
        })
        .unwrap();
    assert_eq!(
        joined_names(&visited),
        "/result_0/add_1/mul_0/add_0/input_0/const_0/const_1/add_0/input_0/const_0"
    );
}

// BFS family: a false return halts the entire walk, queued branches
// included.
#[test]
fn bfs_stop_halts_whole_walk() {
    let fixture = build_fake_graph();
    let mut visited = Vec::new();
    fixture
        .graph
        .bfs_forward(fixture.input_0, |_, node| {
            visited.push(node.name().to_string());
            node.name() != "add_0"
        })
        .unwrap();
    assert_eq!(joined_names(&visited), "/input_0/add_0");

    let mut visited = Vec::new();
    fixture
        .graph
        .bfs_backward(fixture.result_0, |_, node| {
            visited.push(node.name().to_string());
            node.name() != "mul_0"
        })
        .unwrap();
    assert_eq!(joined_names(&visited), "/result_0/add_1/mul_0");
}

// DFS family: a false return only prunes descent from the current node;
// siblings still get visited.
#[test]
fn dfs_stop_prunes_locally() {
    let fixture = build_fake_graph();
    let mut visited = Vec::new();
    fixture
        .graph
        .dfs_forward(fixture.input_0, |_, node| {
            visited.push(node.name().to_string());
            node.name() != "mul_0"
        })
        .unwrap();
    assert_eq!(joined_names(&visited), "/input_0/add_0/mul_0/add_1/result_0");

    let mut visited = Vec::new();
    fixture
        .graph
        .dfs_backward(fixture.result_0, |_, node| {
            visited.push(node.name().to_string());
            node.name() != "mul_0"
        })
        .unwrap();
    assert_eq!(
        joined_names(&visited),
        "/result_0/add_1/mul_0/add_0/input_0/const_0"
    );
}

#[test]
fn backward_bfs_fails_on_expired_input() {
    let mut fixture = build_fake_graph();
    fixture.graph.remove_node(fixture.input_0).unwrap();
    let err = fixture
        .graph
        .bfs_backward(fixture.result_0, |_, _| true)
        .unwrap_err();
    match err {
        GraphError::GraphIntegrity { node, input_index } => {
            assert_eq!(node, "add_0");
            assert_eq!(input_index, 0);
        }
        other => panic!("expected GraphIntegrity, got {other:?}"),
    }
}

#[test]
fn backward_dfs_fails_on_expired_input() {
    let mut fixture = build_fake_graph();
    fixture.graph.remove_node(fixture.input_0).unwrap();
    let err = fixture
        .graph
        .dfs_backward(fixture.result_0, |_, _| true)
        .unwrap_err();
    match err {
        GraphError::GraphIntegrity { node, input_index } => {
            assert_eq!(node, "add_0");
            assert_eq!(input_index, 0);
        }
        other => panic!("expected GraphIntegrity, got {other:?}"),
    }
}

#[test]
fn forward_walks_ignore_removed_subgraphs() {
    let mut fixture = build_fake_graph();
    // Removing a downstream consumer must not disturb forward walks from
    // upstream: the consumer is gone from every consumer list.
    fixture.graph.remove_node(fixture.add_1).unwrap();
    let mut visited = Vec::new();
    fixture
        .graph
        .bfs_forward(fixture.input_0, |_, node| {
            visited.push(node.name().to_string());
            true
        })
        .unwrap();
    assert_eq!(joined_names(&visited), "/input_0/add_0/mul_0");
}

#[test]
fn traversal_from_unknown_node_fails() {
    let mut fixture = build_fake_graph();
    fixture.graph.remove_node(fixture.result_0).unwrap();
    let err = fixture
        .graph
        .bfs_forward(fixture.result_0, |_, _| true)
        .unwrap_err();
    assert!(matches!(err, GraphError::UnknownNode(_)));
}
