//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod diagram_repo;

pub use diagram_repo::DiagramRepo;
