//! Variant generation and identity reconciliation.
//!
//! This crate expands a base product's attribute selections into concrete
//! variants (codes, names, quantities) and compares variant sets by identity.
//! Everything here is deterministic domain logic (no IO, no storage).

pub mod attribute;
pub mod code;
pub mod combination;
pub mod config;
pub mod detect;
pub mod distribute;
pub mod name;
pub mod reconcile;
pub mod resolve;
pub mod signature;
pub mod synthesizer;
pub mod variant;

pub use attribute::{
    AttributeKind, AttributeLine, AttributeRegistry, AttributeValue, CatalogError,
    StaticAttributeCatalog,
};
pub use code::{CodeAssigner, DEFAULT_MAX_COLLISION_RETRIES, code_fragment, naive_code};
pub use combination::{Combination, Combinations, cardinality, generate_combinations};
pub use config::{DistributionConfig, RemainderPolicy, SynthesisConfig};
pub use detect::{AttributeDetector, CatalogDetector, Detection};
pub use distribute::{Distribution, PerVariant, QuantityDistributor};
pub use name::compose_name;
pub use reconcile::{VariantDiff, VariantMatch, diff};
pub use resolve::{LineResolution, resolve_lines};
pub use signature::{Signature, signature, signature_of};
pub use synthesizer::{RejectedCombination, Synthesis, VariantSynthesizer};
pub use variant::{BaseProduct, GeneratedVariant};
