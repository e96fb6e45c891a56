use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::Result;

use super::pricing_model::{
    PricingCandidates, PricingContext, PricingResult, PromoCodeValidation, PromotionalCode,
};

/// Trait defining the contract for pricing resolution.
pub trait PricingServiceTrait: Send + Sync {
    /// Resolve the unit price for one line item.
    ///
    /// `now` is the evaluation instant every validity window is checked
    /// against; callers resolve it once per request so repeated calls are
    /// deterministic.
    fn calculate_price(
        &self,
        context: &PricingContext,
        candidates: &PricingCandidates,
        now: DateTime<Utc>,
    ) -> Result<PricingResult>;

    /// Pre-flight a promotional code against a cart without pricing
    /// anything, collecting every failing condition.
    fn validate_promo_code(
        &self,
        promo: &PromotionalCode,
        order_subtotal: Decimal,
        product_ids: &[String],
        now: DateTime<Utc>,
    ) -> PromoCodeValidation;
}
