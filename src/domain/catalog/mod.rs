//! Catalog module - pure services that produce stage lists.
//!
//! - `StageTemplate` - deterministic template built from idea attributes
//! - `DraftValidator` - turns AI stage drafts into a valid catalog
//! - `CatalogBounds` - allowed stage counts
//!
//! No I/O happens here; the application layer wires these to the AI client.

mod bounds;
mod drafts;
mod template;

pub use bounds::CatalogBounds;
pub use drafts::{DraftValidator, GenerationError};
pub use template::{Phase, StageTemplate};
