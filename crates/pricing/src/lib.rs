//! Orderstack Pricing - dynamic pricing resolution for B2B line items.
//!
//! This crate contains the pricing engine for the Orderstack platform.
//! It is storage-agnostic: the calling layer fetches the candidate pricing
//! rows for a product/organization pair and hands them to the resolver
//! together with the evaluation instant. The resolver performs no I/O.

pub mod errors;
pub mod pricing;

// Re-export common types
pub use pricing::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
