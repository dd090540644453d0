//! Shared helpers for `PostgreSQL` dependency store tests.

use boardgraph::config::DependencyGraphConfig;
use boardgraph::dependency::{
    adapters::postgres::{DependencyPgPool, PostgresDependencyRepository},
    domain::{Dependency, DependencyEdge, ProjectId, TaskId},
};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use mockable::DefaultClock;
use rstest::fixture;
use uuid::Uuid;

/// Boxed error type for test setup.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the database used by these tests.
pub const DATABASE_URL_ENV: &str = "BOARDGRAPH_TEST_DATABASE_URL";

/// SQL creating the dependency table.
pub const CREATE_DEPENDENCIES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_task_dependencies/up.sql");

/// Pins every pooled connection to the test's private schema.
#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated, throwaway schema inside the test database.
pub struct TestSchema {
    url: String,
    name: String,
    /// Pool whose connections resolve tables in this schema.
    pub pool: DependencyPgPool,
}

impl TestSchema {
    /// Creates and migrates a fresh schema, or returns `None` when no test
    /// database is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or migrated.
    pub fn create() -> Result<Option<Self>, BoxError> {
        let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
            return Ok(None);
        };
        let name = format!("boardgraph_test_{}", Uuid::new_v4().simple());

        let mut admin = PgConnection::establish(&url)?;
        admin.batch_execute(&format!("CREATE SCHEMA {name}"))?;
        admin.batch_execute(&format!("SET search_path TO {name}"))?;
        admin.batch_execute(CREATE_DEPENDENCIES_SQL)?;

        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SearchPath(name.clone())))
            .build(ConnectionManager::<PgConnection>::new(url.as_str()))?;
        Ok(Some(Self { url, name, pool }))
    }

    /// Returns a repository over this schema.
    #[must_use]
    pub fn repository(&self) -> PostgresDependencyRepository {
        PostgresDependencyRepository::new(self.pool.clone())
    }

    /// Returns a repository over this schema that refuses edges past
    /// `max_edges_per_project`.
    ///
    /// # Panics
    ///
    /// Panics if `max_edges_per_project` is zero.
    #[must_use]
    pub fn repository_with_ceiling(
        &self,
        max_edges_per_project: usize,
    ) -> PostgresDependencyRepository {
        self.repository()
            .with_config(ceiling(max_edges_per_project))
            .expect("ceiling should be valid")
    }
}

/// Graph limits with the given per-project edge ceiling.
#[must_use]
pub fn ceiling(max_edges_per_project: usize) -> DependencyGraphConfig {
    DependencyGraphConfig {
        max_edges_per_project,
        ..DependencyGraphConfig::default()
    }
}

impl Drop for TestSchema {
    fn drop(&mut self) {
        let dropped = PgConnection::establish(&self.url).and_then(|mut conn| {
            conn.batch_execute(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name))
                .map_err(ConnectionError::CouldntSetupConfiguration)
        });
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.name, error = %err, "failed to drop test schema");
        }
    }
}

/// Provides a migrated schema when a test database is configured.
#[fixture]
pub fn schema() -> Option<TestSchema> {
    TestSchema::create().expect("test schema setup")
}

/// Builds an edge row for `project_id`.
///
/// # Panics
///
/// Panics if both tasks are the same.
#[must_use]
pub fn dependency(project_id: ProjectId, dependent: TaskId, prerequisite: TaskId) -> Dependency {
    let edge = DependencyEdge::new(dependent, prerequisite).expect("distinct tasks");
    Dependency::new(project_id, edge, &DefaultClock)
}
