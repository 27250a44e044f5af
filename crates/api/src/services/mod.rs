//! Use-case layer sitting between the HTTP handlers and the store.

pub mod diagram_service;

pub use diagram_service::DiagramService;
