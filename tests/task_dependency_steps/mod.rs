//! Step definitions for task dependency behaviour tests.

pub mod given;
pub mod then;
