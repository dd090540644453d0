//! Racing writers must never jointly close a cycle.

use super::helpers::Board;
use boardgraph::dependency::{
    domain::TaskId,
    services::{AddDependencyRequest, DependencyServiceError},
};
use petgraph::algo::is_cyclic_directed;

const ROUNDS: usize = 64;

async fn race(
    board: &Board,
    edges: &[(TaskId, TaskId)],
) -> Vec<Result<(), DependencyServiceError>> {
    let handles: Vec<_> = edges
        .iter()
        .map(|&(dependent, prerequisite)| {
            let service = board.service.clone();
            tokio::spawn(async move {
                service
                    .add_dependency(AddDependencyRequest::new(dependent, prerequisite, "racer"))
                    .await
                    .map(drop)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.expect("writer task should not panic"));
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn opposite_edges_race_to_one_winner() {
    for _ in 0..ROUNDS {
        let board = Board::new();
        let [a, b] = [board.task("A"), board.task("B")];

        let results = race(&board, &[(a, b), (b, a)]).await;

        let winners = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(winners, 1, "unexpected outcome: {results:?}");
        assert!(results.iter().all(|result| matches!(
            result,
            Ok(()) | Err(DependencyServiceError::CycleDetected(_))
        )));
        assert!(!is_cyclic_directed(&board.graph()));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn triangle_race_leaves_graph_acyclic() {
    for _ in 0..ROUNDS {
        let board = Board::new();
        let [t1, t2, t3] = [board.task("T1"), board.task("T2"), board.task("T3")];

        let results = race(&board, &[(t1, t2), (t2, t3), (t3, t1)]).await;

        let winners = results.iter().filter(|result| result.is_ok()).count();
        assert_eq!(winners, 2, "unexpected outcome: {results:?}");
        assert!(!is_cyclic_directed(&board.graph()));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn identical_edges_race_to_one_insert() {
    for _ in 0..ROUNDS {
        let board = Board::new();
        let [a, b] = [board.task("A"), board.task("B")];

        let results = race(&board, &[(a, b), (a, b), (a, b)]).await;

        let duplicates = results
            .iter()
            .filter(|result| matches!(result, Err(DependencyServiceError::DuplicateEdge(_))))
            .count();
        assert_eq!(duplicates, 2, "unexpected outcome: {results:?}");
        assert_eq!(board.graph().edge_count(), 1);
    }
}
