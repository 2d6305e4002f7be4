//! Smallgraphs - catalog of small graphs and graph families
//!
//! Small graphs, families and union families linked by their complements,
//! with complement-mirrored derivation of union family subfamilies.

pub mod config;
pub mod context;
pub mod error;
pub mod functional;
pub mod models;
pub mod repositories;
pub mod services;

pub use context::Context;
pub use error::AppError;
