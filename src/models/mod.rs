//! Domain models for the small graph catalog.

mod note;
mod smallgraph;

pub use note::Note;
pub use smallgraph::{GraphId, GraphKind, SmallGraph, UnionFamily};
