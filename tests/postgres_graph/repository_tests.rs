//! Edge CRUD and constraint mapping against `PostgreSQL`.

use super::helpers::{TestSchema, dependency, schema};
use boardgraph::dependency::{
    domain::{DependencyEdge, ProjectId, TaskId},
    ports::{DependencyRepository, DependencyRepositoryError},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stores_and_reads_edges(schema: Option<TestSchema>) {
    let Some(schema) = schema else { return };
    let repo = schema.repository();
    let project_id = ProjectId::new();
    let [hub, first, second] = [TaskId::new(), TaskId::new(), TaskId::new()];
    let stored = dependency(project_id, hub, first);
    repo.insert(&stored).await.expect("first insert");
    repo.insert(&dependency(project_id, hub, second))
        .await
        .expect("second insert");

    let found = repo
        .find_by_pair(stored.edge())
        .await
        .expect("lookup should succeed");
    assert_eq!(found.map(|row| row.id()), Some(stored.id()));
    assert!(repo.exists(stored.edge()).await.expect("exists"));
    assert!(!repo.exists(stored.edge().reversed()).await.expect("exists"));

    let prerequisites = repo
        .find_prerequisites_of(hub)
        .await
        .expect("lookup should succeed");
    assert_eq!(prerequisites.len(), 2);
    let dependents = repo
        .find_dependents_of(first)
        .await
        .expect("lookup should succeed");
    assert_eq!(dependents.len(), 1);
    assert_eq!(repo.count_in_project(project_id).await.expect("count"), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_pair_maps_to_duplicate_edge(schema: Option<TestSchema>) {
    let Some(schema) = schema else { return };
    let repo = schema.repository();
    let project_id = ProjectId::new();
    let [a, b] = [TaskId::new(), TaskId::new()];
    repo.insert(&dependency(project_id, a, b))
        .await
        .expect("first insert");

    let result = repo.insert(&dependency(project_id, a, b)).await;

    assert!(
        matches!(result, Err(DependencyRepositoryError::DuplicateEdge(edge))
            if edge.dependent_id() == a && edge.prerequisite_id() == b),
        "expected DuplicateEdge, got: {result:?}"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_refuses_edges_that_close_a_cycle(schema: Option<TestSchema>) {
    let Some(schema) = schema else { return };
    let repo = schema.repository();
    let project_id = ProjectId::new();
    let [t1, t2, t3] = [TaskId::new(), TaskId::new(), TaskId::new()];
    repo.insert(&dependency(project_id, t1, t2)).await.expect("t1 -> t2");
    repo.insert(&dependency(project_id, t2, t3)).await.expect("t2 -> t3");

    let result = repo.insert(&dependency(project_id, t3, t1)).await;

    assert!(
        matches!(result, Err(DependencyRepositoryError::WouldCycle(_))),
        "expected WouldCycle, got: {result:?}"
    );
    assert_eq!(repo.count_in_project(project_id).await.expect("count"), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_refuses_edges_past_the_ceiling(schema: Option<TestSchema>) {
    let Some(schema) = schema else { return };
    let repo = schema.repository_with_ceiling(2);
    let project_id = ProjectId::new();
    let hub = TaskId::new();
    for _ in 0..2 {
        repo.insert(&dependency(project_id, hub, TaskId::new()))
            .await
            .expect("insert below the ceiling");
    }

    let result = repo.insert(&dependency(project_id, hub, TaskId::new())).await;

    assert!(
        matches!(
            result,
            Err(DependencyRepositoryError::EdgeLimitReached { project_id: full, limit: 2 })
                if full == project_id
        ),
        "expected EdgeLimitReached, got: {result:?}"
    );
    repo.insert(&dependency(ProjectId::new(), hub, TaskId::new()))
        .await
        .expect("other projects keep their own ceiling");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_by_pair_returns_the_removed_row(schema: Option<TestSchema>) {
    let Some(schema) = schema else { return };
    let repo = schema.repository();
    let project_id = ProjectId::new();
    let stored = dependency(project_id, TaskId::new(), TaskId::new());
    repo.insert(&stored).await.expect("insert");

    let removed = repo
        .delete_by_pair(stored.edge())
        .await
        .expect("delete should succeed");
    assert_eq!(removed.id(), stored.id());

    let again = repo.delete_by_pair(stored.edge()).await;
    assert!(matches!(again, Err(DependencyRepositoryError::NotFound(_))));

    let never = DependencyEdge::new(TaskId::new(), TaskId::new()).expect("distinct tasks");
    assert!(repo.find_by_pair(never).await.expect("lookup").is_none());
}
