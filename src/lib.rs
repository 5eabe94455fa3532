//! account-service - user registration and login over a credential store.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: User record and password hashing
//! - **services**: Registration and login use cases
//! - **infra**: Database handle, migrations, user repository
//! - **api**: HTTP handlers, extractors, and routes
//! - **types**: Shared response bodies
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Password, User, WorkFactor};
pub use errors::{AppError, AppResult};
pub use infra::Database;
