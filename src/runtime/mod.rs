//! Observability-facing API surface.

pub mod api;

pub use api::{health, snapshot, DispatchSnapshot, Health};
