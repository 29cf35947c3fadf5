//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and schema creation (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Poster file storage (media)
//! - Repository implementations (repositories)
//! - Demo data (seed)
//! - Application state (state)

pub mod config;
pub mod db;
pub mod media;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod state;

pub use repositories::*;
pub use state::AppState;
