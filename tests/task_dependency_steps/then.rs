//! Then steps for task dependency BDD scenarios.

use super::world::{DependencyWorld, run_async};
use boardgraph::dependency::{
    domain::Dependency,
    ports::DependencyRepository,
    services::{DependencyServiceError, DependencyServiceResult},
};
use rstest_bdd_macros::then;

fn last_result(
    world: &DependencyWorld,
) -> Result<&DependencyServiceResult<Dependency>, eyre::Report> {
    world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result in scenario world"))
}

fn expect_rejection(
    world: &DependencyWorld,
    label: &str,
    predicate: impl Fn(&DependencyServiceError) -> bool,
) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    match result {
        Err(err) if predicate(err) => Ok(()),
        other => Err(eyre::eyre!("expected {label} rejection, got {other:?}")),
    }
}

#[then("the request is accepted")]
fn request_accepted(world: &DependencyWorld) -> Result<(), eyre::Report> {
    let result = last_result(world)?;
    if let Err(err) = result {
        return Err(eyre::eyre!("expected success, got {err}"));
    }
    Ok(())
}

#[then("the request is rejected as a cycle")]
fn rejected_as_cycle(world: &DependencyWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, "cycle", |err| {
        matches!(err, DependencyServiceError::CycleDetected(_))
    })
}

#[then("the request is rejected as a duplicate")]
fn rejected_as_duplicate(world: &DependencyWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, "duplicate", |err| {
        matches!(err, DependencyServiceError::DuplicateEdge(_))
    })
}

#[then("the request is rejected as a self-dependency")]
fn rejected_as_self_dependency(world: &DependencyWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, "self-dependency", |err| {
        matches!(err, DependencyServiceError::SelfDependency(_))
    })
}

#[then("the request is rejected as crossing projects")]
fn rejected_as_cross_project(world: &DependencyWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, "cross-project", |err| {
        matches!(err, DependencyServiceError::CrossProjectDependency { .. })
    })
}

#[then("the request is rejected as not found")]
fn rejected_as_not_found(world: &DependencyWorld) -> Result<(), eyre::Report> {
    expect_rejection(world, "not found", |err| {
        matches!(err, DependencyServiceError::NotFound { .. })
    })
}

#[then("the project has {count:usize} dependencies")]
fn project_edge_count(world: &DependencyWorld, count: usize) -> Result<(), eyre::Report> {
    let stored = run_async(world.repository.count_in_project(world.project_id))
        .map_err(|err| eyre::eyre!("count failed: {err}"))?;
    if stored != count {
        return Err(eyre::eyre!("expected {count} dependencies, found {stored}"));
    }
    Ok(())
}

#[then(r#"the latest activity reads "{description}""#)]
fn latest_activity_reads(world: &DependencyWorld, description: String) -> Result<(), eyre::Report> {
    let recent = world
        .activity_log
        .recent_project_activities(world.project_id, 1)
        .map_err(|err| eyre::eyre!("activity feed unreadable: {err}"))?;
    let latest = recent
        .first()
        .ok_or_else(|| eyre::eyre!("activity feed is empty"))?;
    if latest.description() != description {
        return Err(eyre::eyre!(
            "expected activity '{description}', found '{}'",
            latest.description()
        ));
    }
    Ok(())
}
