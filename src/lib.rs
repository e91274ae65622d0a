//! Access Console - Backend Library
//!
//! RBAC admin console managing users, roles and permissions over PostgreSQL.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod seed;

pub use config::Config;
pub use error::{AppError, Result};
