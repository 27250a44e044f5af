//! Row structs for the diagram tables.

pub mod diagram;
