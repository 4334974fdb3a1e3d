//! # GradeMaster Application
//!
//! Server, CLI and collaborators around [`grademaster_core`]:
//!
//! - [`api`]: axum REST API over the in-memory gradebook
//! - [`cli`]: clap commands for points, boundaries and course files
//! - [`config`]: TOML configuration with environment overrides
//! - [`advisor`]: optional HTTP client for written feedback
//! - [`course_file`]: course files on disk and the startup gradebook

pub mod advisor;
pub mod api;
pub mod cli;
pub mod config;
pub mod course_file;
mod error;

pub use error::AppError;
