//! Core pipeline orchestration and domain logic for routemap.
//!
//! This crate ties together the route catalog, the content sources, route
//! aggregation, rendering and artifact writing into the `generate` workflow.

pub mod aggregator;
pub mod catalog;
pub mod pipeline;
pub mod writer;

pub use aggregator::{AggregatedRoutes, EMBEDDED_PREFIX, REMOTE_PREFIX, aggregate, build_routes};
pub use catalog::{STATIC_ROUTES, list_static_routes};
pub use pipeline::{GenerationResult, ProgressReporter, SilentProgress, generate, generate_on};
pub use writer::{ArtifactMeta, write_artifacts};
