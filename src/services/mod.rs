//! Business logic services for the small graph catalog.
//!
//! Services borrow the registry from the [`Context`](crate::context::Context)
//! and enforce the rules around union families and complements.

mod family;
mod validation;

pub use family::{subfamily_count, FamilyService, UnionFamilySummary};
pub use validation::{same_members, ValidationIssue, ValidationService};
