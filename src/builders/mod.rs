//! Builders that turn a validated [`crate::config::DispatchConfig`] into
//! ready-to-use components.

pub mod dispatch_builder;

pub use dispatch_builder::{build_recovery_manager, build_resource_pool, build_scheduler};
