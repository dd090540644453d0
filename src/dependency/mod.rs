//! Task dependency graph engine.
//!
//! Tasks declare "must-finish-before" relationships to other tasks of the
//! same project. The engine keeps the resulting graph free of self-loops,
//! duplicate edges, cross-project edges and cycles, including under
//! concurrent writers, and reports every change to the project activity
//! feed. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
