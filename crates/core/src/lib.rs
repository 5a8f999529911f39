//! `skuforge-core`: shared catalog building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! typed identifiers and the variant error taxonomy.

pub mod error;
pub mod id;

pub use error::{AttributeKindName, VariantError, VariantResult};
pub use id::{AttributeId, AttributeValueId, RemoteVariantId, TemplateId, VariantId};
