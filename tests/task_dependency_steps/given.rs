//! Given steps for task dependency BDD scenarios.

use super::world::{DependencyWorld, run_async};
use boardgraph::dependency::{domain::ProjectId, services::AddDependencyRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a project with tasks "{names}""#)]
fn project_with_tasks(world: &mut DependencyWorld, names: String) -> Result<(), eyre::Report> {
    for name in names.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let task_id = world
            .directory
            .add_task(world.project_id, name)
            .wrap_err("register scenario task")?;
        world.tasks.insert(name.to_owned(), task_id);
    }
    Ok(())
}

#[given(r#"a task "{name}" in another project"#)]
fn task_in_other_project(world: &mut DependencyWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world
        .directory
        .add_task(ProjectId::new(), name.as_str())
        .wrap_err("register foreign task")?;
    world.tasks.insert(name, task_id);
    Ok(())
}

#[given(r#""{dependent}" already depends on "{prerequisite}""#)]
fn existing_dependency(
    world: &mut DependencyWorld,
    dependent: String,
    prerequisite: String,
) -> Result<(), eyre::Report> {
    let request =
        AddDependencyRequest::new(world.task(&dependent)?, world.task(&prerequisite)?, "alice");
    run_async(world.service.add_dependency(request)).wrap_err("add background dependency")?;
    Ok(())
}
