//! Common utilities and shared types for photoshare-rs.
//!
//! This crate provides foundational components used across all photoshare-rs
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Pagination**: Fixed-size page-number pagination via [`Paginator`]
//! - **Storage**: File storage backends (local, S3-compatible)
//!
//! # Example
//!
//! ```no_run
//! use photoshare_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use pagination::{Page, Paginator};
pub use storage::{
    LocalStorage, StorageBackend, StorageConfig, UploadedFile, generate_storage_key,
};
