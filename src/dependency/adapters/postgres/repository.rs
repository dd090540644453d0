//! `PostgreSQL` repository implementation for dependency edge storage.

use super::{
    models::{CycleProbeRow, DependencyRow, NewDependencyRow},
    schema::task_dependencies,
};
use crate::config::{ConfigError, DependencyGraphConfig};
use crate::dependency::{
    domain::{
        Dependency, DependencyEdge, DependencyId, PersistedDependencyData, ProjectId, TaskId,
    },
    ports::{DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by dependency adapters.
pub type DependencyPgPool = Pool<ConnectionManager<PgConnection>>;

const PAIR_UNIQUE_CONSTRAINT: &str = "idx_task_dependencies_pair_unique";

/// `PostgreSQL`-backed dependency repository.
///
/// Inserts run in one transaction that takes a project-scoped advisory lock
/// and re-checks the edge ceiling and reachability before writing, so writers
/// in other processes cannot jointly close a cycle or overfill a project.
#[derive(Debug, Clone)]
pub struct PostgresDependencyRepository {
    pool: DependencyPgPool,
    max_edges_per_project: usize,
}

impl PostgresDependencyRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool, using
    /// the default edge ceiling.
    #[must_use]
    pub fn new(pool: DependencyPgPool) -> Self {
        Self {
            pool,
            max_edges_per_project: DependencyGraphConfig::default().max_edges_per_project,
        }
    }

    /// Replaces the edge ceiling enforced at commit time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] when a limit is zero.
    pub fn with_config(mut self, config: DependencyGraphConfig) -> Result<Self, ConfigError> {
        self.max_edges_per_project = config.validate()?.max_edges_per_project;
        Ok(self)
    }

    async fn run_blocking<F, T>(&self, f: F) -> DependencyRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DependencyRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DependencyRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DependencyRepositoryError::persistence)?
    }
}

/// Failure inside the insert transaction.
#[derive(Debug)]
enum InsertFailure {
    Database(DieselError),
    WouldCycle,
    EdgeLimitReached,
}

impl From<DieselError> for InsertFailure {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

#[async_trait]
impl DependencyRepository for PostgresDependencyRepository {
    async fn insert(&self, dependency: &Dependency) -> DependencyRepositoryResult<()> {
        let edge = dependency.edge();
        let project_id = dependency.project_id();
        let project_key = project_id.to_string();
        let limit = self.max_edges_per_project;
        let new_row = to_new_row(dependency);

        self.run_blocking(move |connection| {
            connection
                .build_transaction()
                .read_write()
                .run(|conn| {
                    diesel::sql_query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                        .bind::<diesel::sql_types::Text, _>(project_key.as_str())
                        .execute(conn)?;

                    if project_edge_count(conn, project_id)? >= limit {
                        return Err(InsertFailure::EdgeLimitReached);
                    }
                    if closes_cycle(conn, edge)? {
                        return Err(InsertFailure::WouldCycle);
                    }

                    diesel::insert_into(task_dependencies::table)
                        .values(&new_row)
                        .execute(conn)?;
                    Ok(())
                })
                .map_err(|failure| match failure {
                    InsertFailure::WouldCycle => DependencyRepositoryError::WouldCycle(edge),
                    InsertFailure::EdgeLimitReached => {
                        DependencyRepositoryError::EdgeLimitReached { project_id, limit }
                    }
                    InsertFailure::Database(DieselError::DatabaseError(
                        DatabaseErrorKind::UniqueViolation,
                        ref info,
                    )) if is_pair_unique_violation(info.as_ref()) => {
                        DependencyRepositoryError::DuplicateEdge(edge)
                    }
                    InsertFailure::Database(err) => DependencyRepositoryError::persistence(err),
                })
        })
        .await
    }

    async fn delete_by_pair(&self, edge: DependencyEdge) -> DependencyRepositoryResult<Dependency> {
        self.run_blocking(move |connection| {
            let row = diesel::delete(
                task_dependencies::table
                    .filter(task_dependencies::dependent_id.eq(edge.dependent_id().into_inner()))
                    .filter(
                        task_dependencies::prerequisite_id.eq(edge.prerequisite_id().into_inner()),
                    ),
            )
            .returning(DependencyRow::as_returning())
            .get_result::<DependencyRow>(connection)
            .optional()
            .map_err(DependencyRepositoryError::persistence)?;

            row.map_or(Err(DependencyRepositoryError::NotFound(edge)), row_to_dependency)
        })
        .await
    }

    async fn find_by_pair(
        &self,
        edge: DependencyEdge,
    ) -> DependencyRepositoryResult<Option<Dependency>> {
        self.run_blocking(move |connection| {
            let row = task_dependencies::table
                .filter(task_dependencies::dependent_id.eq(edge.dependent_id().into_inner()))
                .filter(task_dependencies::prerequisite_id.eq(edge.prerequisite_id().into_inner()))
                .select(DependencyRow::as_select())
                .first::<DependencyRow>(connection)
                .optional()
                .map_err(DependencyRepositoryError::persistence)?;
            row.map(row_to_dependency).transpose()
        })
        .await
    }

    async fn exists(&self, edge: DependencyEdge) -> DependencyRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(
                task_dependencies::table
                    .filter(task_dependencies::dependent_id.eq(edge.dependent_id().into_inner()))
                    .filter(
                        task_dependencies::prerequisite_id.eq(edge.prerequisite_id().into_inner()),
                    ),
            ))
            .get_result::<bool>(connection)
            .map_err(DependencyRepositoryError::persistence)
        })
        .await
    }

    async fn find_prerequisites_of(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<Dependency>> {
        self.run_blocking(move |connection| {
            let rows = task_dependencies::table
                .filter(task_dependencies::dependent_id.eq(task_id.into_inner()))
                .order((task_dependencies::created_at.asc(), task_dependencies::id.asc()))
                .select(DependencyRow::as_select())
                .load::<DependencyRow>(connection)
                .map_err(DependencyRepositoryError::persistence)?;
            rows.into_iter().map(row_to_dependency).collect()
        })
        .await
    }

    async fn find_dependents_of(
        &self,
        task_id: TaskId,
    ) -> DependencyRepositoryResult<Vec<Dependency>> {
        self.run_blocking(move |connection| {
            let rows = task_dependencies::table
                .filter(task_dependencies::prerequisite_id.eq(task_id.into_inner()))
                .order((task_dependencies::created_at.asc(), task_dependencies::id.asc()))
                .select(DependencyRow::as_select())
                .load::<DependencyRow>(connection)
                .map_err(DependencyRepositoryError::persistence)?;
            rows.into_iter().map(row_to_dependency).collect()
        })
        .await
    }

    async fn count_in_project(&self, project_id: ProjectId) -> DependencyRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            project_edge_count(connection, project_id)
                .map_err(DependencyRepositoryError::persistence)
        })
        .await
    }
}

const fn to_new_row(dependency: &Dependency) -> NewDependencyRow {
    NewDependencyRow {
        id: dependency.id().into_inner(),
        project_id: dependency.project_id().into_inner(),
        dependent_id: dependency.dependent_id().into_inner(),
        prerequisite_id: dependency.prerequisite_id().into_inner(),
        created_at: dependency.created_at(),
    }
}

fn row_to_dependency(row: DependencyRow) -> DependencyRepositoryResult<Dependency> {
    let DependencyRow {
        id,
        project_id,
        dependent_id,
        prerequisite_id,
        created_at,
    } = row;

    let data = PersistedDependencyData {
        id: DependencyId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        dependent_id: TaskId::from_uuid(dependent_id),
        prerequisite_id: TaskId::from_uuid(prerequisite_id),
        created_at,
    };
    Dependency::from_persisted(data).map_err(DependencyRepositoryError::persistence)
}

fn is_pair_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == PAIR_UNIQUE_CONSTRAINT)
}

fn project_edge_count(
    connection: &mut PgConnection,
    project_id: ProjectId,
) -> Result<usize, DieselError> {
    let count = task_dependencies::table
        .filter(task_dependencies::project_id.eq(project_id.into_inner()))
        .count()
        .get_result::<i64>(connection)?;
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}

/// Returns whether the prerequisite already reaches the dependent through
/// committed edges.
fn closes_cycle(connection: &mut PgConnection, edge: DependencyEdge) -> Result<bool, DieselError> {
    let query = diesel::sql_query(concat!(
        "WITH RECURSIVE reachable(task_id) AS (",
        "SELECT prerequisite_id FROM task_dependencies WHERE dependent_id = $1 ",
        "UNION ",
        "SELECT d.prerequisite_id FROM task_dependencies d ",
        "JOIN reachable r ON d.dependent_id = r.task_id",
        ") ",
        "SELECT EXISTS (SELECT 1 FROM reachable WHERE task_id = $2) AS closes_cycle",
    ))
    .bind::<diesel::sql_types::Uuid, _>(edge.prerequisite_id().into_inner())
    .bind::<diesel::sql_types::Uuid, _>(edge.dependent_id().into_inner());

    let probe = query.get_result::<CycleProbeRow>(connection)?;
    Ok(probe.closes_cycle)
}
