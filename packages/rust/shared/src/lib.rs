//! Shared types, error model, and configuration for routemap.
//!
//! This crate is the foundation depended on by all other routemap crates.
//! It provides:
//! - [`RouteMapError`], the unified error type
//! - Domain types ([`RouteEntry`], [`ContentId`], [`Priority`], [`ChangeFrequency`], [`RunId`])
//! - Configuration ([`AppConfig`], [`GenerateConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, EnvironmentConfig, GenerateConfig, OutputConfig, PolicyRule, RoutePolicy,
    SiteConfig, SourcesConfig, config_dir, default_config_toml, discover_config_path,
    home_config_path, init_config, load_config, load_config_from,
};
pub use error::{Result, RouteMapError};
pub use types::{ChangeFrequency, ContentId, Priority, RouteClass, RouteEntry, RunId, SourceCounts};
