//! Domain logic for the sudoku diagram service.
//!
//! Everything here is synchronous and free of I/O so it can be exercised
//! directly from unit tests and reused by the persistence and HTTP layers.

pub mod diagram;
pub mod error;
pub mod listing;
pub mod sudoku;
pub mod types;
