use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::errors::{Result, ValidationError};

use super::pricing_model::{
    ContractPrice, CustomerProductPrice, DiscountType, PriceLock, PricingCandidates,
    PricingContext, PricingDetails, PricingResult, PricingSource, PricingTier,
    PromoApplicability, PromoCodeValidation, PromotionalCode, VolumePricing,
};
use super::pricing_traits::PricingServiceTrait;

/// Stateless resolver for line-item pricing.
///
/// Evaluates the candidate pricing mechanisms in strict priority order and
/// returns the first qualifying result:
///
/// 1. Price locks (time-limited guaranteed prices)
/// 2. Contract prices (negotiated contract rates)
/// 3. Customer-specific prices
/// 4. Promotional codes
/// 5. Volume pricing (quantity-based percentage discounts)
/// 6. Pricing tiers (quantity-banded absolute prices)
/// 7. Base price
///
/// The evaluation instant is an explicit parameter; the resolver never reads
/// wall-clock time, performs no I/O, and holds no state, so it is safe to
/// call concurrently across a cart's line items.
pub struct PricingService;

/// A successfully applied promotional discount, before result assembly.
struct AppliedPromo {
    unit_price: Decimal,
    line_total: Decimal,
    discount_amount: Decimal,
    discount_percentage: Decimal,
}

/// Outcome of one short-circuiting promo code evaluation.
enum PromoOutcome {
    Applied(AppliedPromo),
    Rejected(String),
}

impl PricingService {
    pub fn new() -> Self {
        PricingService
    }

    /// Shared arithmetic for the override mechanisms (lock, contract,
    /// customer-specific, tier): the unit price is taken directly from the
    /// candidate row and discounts are derived from the base price.
    ///
    /// Discount fields are clamped non-negative; the unit price is not, so
    /// an override above base price passes through unclamped.
    fn override_price_result(
        base_price: Decimal,
        unit_price: Decimal,
        quantity: Decimal,
        pricing_source: PricingSource,
        pricing_details: PricingDetails,
        warnings: Vec<String>,
    ) -> PricingResult {
        let line_total = unit_price * quantity;
        let discount_amount = ((base_price - unit_price) * quantity).max(Decimal::ZERO);
        let discount_percentage =
            ((base_price - unit_price) / base_price * Decimal::ONE_HUNDRED).max(Decimal::ZERO);

        PricingResult {
            unit_price,
            line_total,
            base_price,
            discount_amount,
            discount_percentage,
            pricing_source,
            pricing_details,
            warnings,
        }
    }

    /// First lock (input order, no tie-break) that is active and whose
    /// deadline is strictly in the future.
    fn find_active_price_lock(price_locks: &[PriceLock], now: DateTime<Utc>) -> Option<&PriceLock> {
        price_locks
            .iter()
            .find(|lock| lock.is_active && lock.locked_until > now)
    }

    /// First contract price (input order) whose row is active, whose
    /// contract lifecycle status is "active", and whose window contains now.
    fn find_active_contract_price(
        contract_prices: &[ContractPrice],
        now: DateTime<Utc>,
    ) -> Option<&ContractPrice> {
        contract_prices.iter().find(|contract| {
            contract.is_active
                && contract.contract_status == "active"
                && contract.contract_start_date <= now
                && contract.contract_end_date >= now
        })
    }

    /// First active customer-specific price. No temporal check.
    fn find_active_customer_price(
        customer_prices: &[CustomerProductPrice],
    ) -> Option<&CustomerProductPrice> {
        customer_prices.iter().find(|price| price.is_active)
    }

    /// Among breakpoints the quantity has reached, the highest discount
    /// percentage wins. First seen kept on an exact tie.
    fn find_volume_discount(
        volume_pricing: &[VolumePricing],
        quantity: u32,
    ) -> Option<&VolumePricing> {
        volume_pricing
            .iter()
            .filter(|vp| vp.is_active && quantity >= vp.min_quantity)
            .reduce(|max, current| {
                if current.discount_percentage > max.discount_percentage {
                    current
                } else {
                    max
                }
            })
    }

    /// Among tiers whose band contains the quantity, the lowest priority
    /// number wins, independent of input order. First seen kept on a tie.
    fn find_pricing_tier(pricing_tiers: &[PricingTier], quantity: u32) -> Option<&PricingTier> {
        pricing_tiers
            .iter()
            .filter(|tier| {
                tier.is_active
                    && quantity >= tier.min_quantity
                    && tier.max_quantity.is_none_or(|max| quantity <= max)
            })
            .reduce(|best, current| {
                if current.priority < best.priority {
                    current
                } else {
                    best
                }
            })
    }

    /// Short-circuiting promo evaluation: the first failing check rejects
    /// the code with a single warning and the cascade moves on.
    fn apply_promotional_code(
        base_price: Decimal,
        quantity: Decimal,
        promo: &PromotionalCode,
        order_subtotal: Decimal,
        product_id: &str,
        now: DateTime<Utc>,
    ) -> PromoOutcome {
        if !promo.is_active {
            return PromoOutcome::Rejected("Promotional code is not active".to_string());
        }

        if promo.valid_from > now {
            return PromoOutcome::Rejected("Promotional code is not yet valid".to_string());
        }

        if promo.valid_until < now {
            return PromoOutcome::Rejected("Promotional code has expired".to_string());
        }

        if promo.uses_count >= promo.max_uses {
            return PromoOutcome::Rejected(
                "Promotional code has reached maximum usage limit".to_string(),
            );
        }

        if order_subtotal < promo.min_order_value {
            return PromoOutcome::Rejected(format!(
                "Order must be at least ${} to use this promo code",
                promo.min_order_value
            ));
        }

        if promo.applicable_to == PromoApplicability::Specific
            && !promo.applies_to_product(product_id)
        {
            return PromoOutcome::Rejected(
                "Promotional code is not applicable to this product".to_string(),
            );
        }

        match promo.discount_type {
            DiscountType::Percentage => {
                let discount_percentage = promo.discount_value;
                let unit_price =
                    base_price * (Decimal::ONE - discount_percentage / Decimal::ONE_HUNDRED);

                PromoOutcome::Applied(AppliedPromo {
                    unit_price,
                    line_total: unit_price * quantity,
                    discount_amount: (base_price - unit_price) * quantity,
                    discount_percentage,
                })
            }
            DiscountType::FixedAmount => {
                // Applied to the line total, not per unit. The reported
                // discount_amount stays nominal even when the max(0) floor
                // caps the effective reduction.
                let line_total = base_price * quantity;
                let discounted_line_total = (line_total - promo.discount_value).max(Decimal::ZERO);
                let unit_price = discounted_line_total / quantity;

                PromoOutcome::Applied(AppliedPromo {
                    unit_price,
                    line_total: unit_price * quantity,
                    discount_amount: promo.discount_value,
                    discount_percentage: promo.discount_value / line_total * Decimal::ONE_HUNDRED,
                })
            }
            DiscountType::FreeShipping => {
                // Order-level effect, handled by the caller. The code is
                // still the winning mechanism, with the unit price untouched.
                PromoOutcome::Applied(AppliedPromo {
                    unit_price: base_price,
                    line_total: base_price * quantity,
                    discount_amount: Decimal::ZERO,
                    discount_percentage: Decimal::ZERO,
                })
            }
        }
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingServiceTrait for PricingService {
    fn calculate_price(
        &self,
        context: &PricingContext,
        candidates: &PricingCandidates,
        now: DateTime<Utc>,
    ) -> Result<PricingResult> {
        if context.quantity == 0 {
            return Err(ValidationError::InvalidQuantity(context.quantity).into());
        }

        let mut warnings: Vec<String> = Vec::new();
        let base_price = context.product.base_price;
        let quantity = Decimal::from(context.quantity);

        // 1. Price locks (highest priority)
        if let Some(lock) = Self::find_active_price_lock(&candidates.price_locks, now) {
            debug!(
                "price lock {} applied for product {}",
                lock.id, context.product.id
            );
            let details = PricingDetails {
                applied_discount: Some(
                    lock.reason
                        .clone()
                        .unwrap_or_else(|| "Price lock applied".to_string()),
                ),
                ..Default::default()
            };
            return Ok(Self::override_price_result(
                base_price,
                lock.locked_price,
                quantity,
                PricingSource::PriceLock,
                details,
                warnings,
            ));
        }

        // 2. Contract prices
        if let Some(contract) = Self::find_active_contract_price(&candidates.contract_prices, now) {
            debug!(
                "contract {} pricing applied for product {}",
                contract.contract_id, context.product.id
            );
            let details = PricingDetails {
                contract_id: Some(contract.contract_id.clone()),
                applied_discount: Some("Contract pricing applied".to_string()),
                ..Default::default()
            };
            return Ok(Self::override_price_result(
                base_price,
                contract.contract_price,
                quantity,
                PricingSource::Contract,
                details,
                warnings,
            ));
        }

        // 3. Customer-specific prices
        if let Some(price) = Self::find_active_customer_price(&candidates.customer_prices) {
            let details = PricingDetails {
                applied_discount: Some("Customer-specific pricing applied".to_string()),
                ..Default::default()
            };
            return Ok(Self::override_price_result(
                base_price,
                price.custom_price,
                quantity,
                PricingSource::CustomerSpecific,
                details,
                warnings,
            ));
        }

        // 4. Promotional code. Rejection is non-terminal: the warning rides
        // along and the cascade continues with volume pricing.
        if let (Some(_), Some(promo)) = (&context.promo_code, &candidates.promo_code) {
            match Self::apply_promotional_code(
                base_price,
                quantity,
                promo,
                context.order_subtotal.unwrap_or(Decimal::ZERO),
                &context.product.id,
                now,
            ) {
                PromoOutcome::Applied(applied) => {
                    let description = promo
                        .description
                        .clone()
                        .unwrap_or_else(|| promo.code.clone());
                    let details = PricingDetails {
                        promo_code: Some(promo.code.clone()),
                        applied_discount: Some(format!("Promo code: {}", description)),
                        ..Default::default()
                    };
                    return Ok(PricingResult {
                        unit_price: applied.unit_price,
                        line_total: applied.line_total,
                        base_price,
                        discount_amount: applied.discount_amount,
                        discount_percentage: applied.discount_percentage,
                        pricing_source: PricingSource::Promotional,
                        pricing_details: details,
                        warnings,
                    });
                }
                PromoOutcome::Rejected(warning) => {
                    warn!("promo code {} rejected: {}", promo.code, warning);
                    warnings.push(warning);
                }
            }
        }

        // 5. Volume pricing
        if let Some(volume) = Self::find_volume_discount(&candidates.volume_pricing, context.quantity)
        {
            let discount_percentage = volume.discount_percentage;
            let unit_price =
                base_price * (Decimal::ONE - discount_percentage / Decimal::ONE_HUNDRED);
            let details = PricingDetails {
                volume_discount: Some(discount_percentage),
                applied_discount: Some(format!(
                    "{}% volume discount for {}+ units",
                    discount_percentage, context.quantity
                )),
                ..Default::default()
            };
            return Ok(PricingResult {
                unit_price,
                line_total: unit_price * quantity,
                base_price,
                discount_amount: (base_price - unit_price) * quantity,
                discount_percentage,
                pricing_source: PricingSource::Volume,
                pricing_details: details,
                warnings,
            });
        }

        // 6. Pricing tiers
        if let Some(tier) = Self::find_pricing_tier(&candidates.pricing_tiers, context.quantity) {
            let details = PricingDetails {
                tier_name: Some(tier.tier_name.clone()),
                applied_discount: Some(format!("{} tier pricing", tier.tier_name)),
                ..Default::default()
            };
            return Ok(Self::override_price_result(
                base_price,
                tier.unit_price,
                quantity,
                PricingSource::Tier,
                details,
                warnings,
            ));
        }

        // 7. Base price fallback
        Ok(PricingResult {
            unit_price: base_price,
            line_total: base_price * quantity,
            base_price,
            discount_amount: Decimal::ZERO,
            discount_percentage: Decimal::ZERO,
            pricing_source: PricingSource::Base,
            pricing_details: PricingDetails::default(),
            warnings,
        })
    }

    /// Cart pre-flight: runs every check and collects all failing
    /// conditions instead of short-circuiting. The product restriction
    /// passes if any product in the cart is covered.
    fn validate_promo_code(
        &self,
        promo: &PromotionalCode,
        order_subtotal: Decimal,
        product_ids: &[String],
        now: DateTime<Utc>,
    ) -> PromoCodeValidation {
        let mut errors: Vec<String> = Vec::new();

        if !promo.is_active {
            errors.push("Promotional code is not active".to_string());
        }

        if promo.valid_from > now {
            errors.push("Promotional code is not yet valid".to_string());
        }

        if promo.valid_until < now {
            errors.push("Promotional code has expired".to_string());
        }

        if promo.uses_count >= promo.max_uses {
            errors.push("Promotional code has reached maximum usage limit".to_string());
        }

        if order_subtotal < promo.min_order_value {
            errors.push(format!(
                "Order must be at least ${} to use this promo code",
                promo.min_order_value
            ));
        }

        if promo.applicable_to == PromoApplicability::Specific {
            let has_applicable_product =
                product_ids.iter().any(|id| promo.applies_to_product(id));

            if !has_applicable_product {
                errors.push(
                    "Promotional code is not applicable to any products in your cart".to_string(),
                );
            }
        }

        PromoCodeValidation {
            valid: errors.is_empty(),
            errors,
        }
    }
}
