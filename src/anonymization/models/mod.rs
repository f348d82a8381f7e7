//! Anonymization data models

pub mod resolved;
pub mod result;
pub mod span;

pub use resolved::ResolvedSpans;
pub use result::{AnonymizationOutput, ItemResult, MappingEntry, MappingStore, TransformationResult};
pub use span::Span;
