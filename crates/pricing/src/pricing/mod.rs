//! Pricing module - domain models, services, and traits.

mod pricing_model;
mod pricing_service;
mod pricing_traits;

pub use pricing_model::{
    ContractPrice, CustomerProductPrice, DiscountType, PriceLock, PricingCandidates,
    PricingContext, PricingDetails, PricingResult, PricingSource, PricingTier, Product,
    PromoApplicability, PromoCodeValidation, PromotionalCode, VolumePricing,
};
pub use pricing_service::PricingService;
pub use pricing_traits::PricingServiceTrait;
