//! Property tests comparing the service against a reference graph model.

use super::helpers::Board;
use boardgraph::dependency::{
    domain::TaskId,
    services::{AddDependencyRequest, DependencyServiceError, RemoveDependencyRequest},
};
use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::graphmap::DiGraphMap;
use proptest::prelude::*;
use tokio::runtime::Runtime;

const TASKS: usize = 7;

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(usize, usize),
    Remove(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..TASKS, 0..TASKS).prop_map(|(from, to)| Op::Add(from, to)),
        1 => (0..TASKS, 0..TASKS).prop_map(|(from, to)| Op::Remove(from, to)),
    ]
}

fn task_at(tasks: &[TaskId], index: usize) -> TaskId {
    tasks.get(index).copied().expect("index within the board")
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime should build")
}

/// Expected outcome of adding `from -> to` to `model`.
fn expected_add(model: &DiGraphMap<usize, ()>, from: usize, to: usize) -> &'static str {
    if from == to {
        "self"
    } else if model.contains_edge(from, to) {
        "duplicate"
    } else if has_path_connecting(model, to, from, None) {
        "cycle"
    } else {
        "ok"
    }
}

fn outcome_of<T>(result: &Result<T, DependencyServiceError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(DependencyServiceError::SelfDependency(_)) => "self",
        Err(DependencyServiceError::DuplicateEdge(_)) => "duplicate",
        Err(DependencyServiceError::CycleDetected(_)) => "cycle",
        Err(DependencyServiceError::NotFound { .. }) => "missing",
        Err(_) => "other",
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn service_matches_reference_model(ops in prop::collection::vec(op(), 1..48)) {
        let rt = runtime();
        let board = Board::new();
        let tasks = board.tasks(TASKS);
        let mut model: DiGraphMap<usize, ()> = DiGraphMap::new();
        for index in 0..TASKS {
            model.add_node(index);
        }

        for op in ops {
            match op {
                Op::Add(from, to) => {
                    let expected = expected_add(&model, from, to);
                    let request = AddDependencyRequest::new(
                        task_at(&tasks, from),
                        task_at(&tasks, to),
                        "prop",
                    );
                    let result = rt.block_on(board.service.add_dependency(request));
                    prop_assert_eq!(outcome_of(&result), expected, "adding {} -> {}", from, to);
                    if expected == "ok" {
                        model.add_edge(from, to, ());
                    }
                }
                Op::Remove(from, to) => {
                    let expected = if model.contains_edge(from, to) { "ok" } else { "missing" };
                    let request = RemoveDependencyRequest::new(
                        task_at(&tasks, from),
                        task_at(&tasks, to),
                        "prop",
                    );
                    let result = rt.block_on(board.service.remove_dependency(request));
                    prop_assert_eq!(outcome_of(&result), expected, "removing {} -> {}", from, to);
                    if expected == "ok" {
                        model.remove_edge(from, to);
                    }
                }
            }
            prop_assert!(!is_cyclic_directed(&board.graph()));
        }

        prop_assert_eq!(board.graph().edge_count(), model.edge_count());
    }
}
