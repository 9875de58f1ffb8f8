//! Core types and shared functionality for stockroom.
//!
//! This crate provides:
//! - On-disk page cache with SHA-256 keys and gzip bodies
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Namespace, PageCache};
pub use config::{AppConfig, ConfigError, render_listing_url};
pub use error::Error;
