//! Data access layer for the small graph catalog.
//!
//! Repositories own catalog entities and resolve the id references
//! between them.

mod smallgraph;

pub use smallgraph::SmallGraphRepository;
