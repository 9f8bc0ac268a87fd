//! # Feedback Service
//!
//! Role-aware feedback collection for an academic institution: students and
//! staff rate questions scoped to their department and year, directors manage
//! the catalogue and read aggregated statistics.
//!
//! ## Architecture
//!
//! - **domain**: entities, lifecycle and role types, repository traits
//! - **application**: access policy, visibility filter, services, aggregation
//! - **infrastructure**: SeaORM persistence, in-memory store, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime wiring and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

pub use interfaces::http::create_api_router;
