//! Boardgraph: task dependency graph engine for a multi-tenant board manager.
//!
//! Projects contain lists, lists contain tasks, and tasks may declare that
//! other tasks of the same project must finish first. This crate owns those
//! dependency edges and guarantees the graph never contains a self-loop, a
//! duplicate edge, a cross-project edge, or a cycle.
//!
//! # Architecture
//!
//! Boardgraph follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`dependency`]: Dependency edges, cycle prevention, and queries
//! - [`config`]: Graph limits loaded from defaults, JSON, or environment
//! - [`telemetry`]: Tracing subscriber installation

pub mod config;
pub mod dependency;
pub mod telemetry;
