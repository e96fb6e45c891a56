//! Property-based tests for the pricing resolver.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use orderstack_pricing::{
    PriceLock, PricingCandidates, PricingContext, PricingService, PricingServiceTrait,
    PricingSource, PricingTier, Product, VolumePricing,
};

// =============================================================================
// Generators
// =============================================================================

fn eval_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

/// Generates a monetary amount between 0.01 and 1000.00 with cent precision.
fn arb_money() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generates a discount percentage between 0 and 100 with two decimals.
fn arb_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|basis_points| Decimal::new(basis_points, 2))
}

fn arb_quantity() -> impl Strategy<Value = u32> {
    1u32..1000
}

fn arb_context() -> impl Strategy<Value = PricingContext> {
    (arb_money(), arb_quantity()).prop_map(|(base_price, quantity)| PricingContext {
        product: Product {
            id: "prod-1".to_string(),
            sku: "SKU-001".to_string(),
            name: "Widget".to_string(),
            base_price,
            organization_id: "org-supplier".to_string(),
        },
        quantity,
        customer_organization_id: "org-customer".to_string(),
        supplier_organization_id: "org-supplier".to_string(),
        promo_code: None,
        order_subtotal: None,
    })
}

fn arb_volume_rows() -> impl Strategy<Value = Vec<VolumePricing>> {
    proptest::collection::vec(
        (1u32..500, arb_percentage(), any::<bool>()).prop_map(|(min_quantity, pct, is_active)| {
            VolumePricing {
                id: format!("v-{}", min_quantity),
                min_quantity,
                discount_percentage: pct,
                is_active,
            }
        }),
        0..8,
    )
}

fn arb_tier_rows() -> impl Strategy<Value = Vec<PricingTier>> {
    proptest::collection::vec(
        (
            1u32..500,
            proptest::option::of(500u32..2000),
            arb_money(),
            0i32..100,
            any::<bool>(),
        )
            .prop_map(|(min_quantity, max_quantity, unit_price, priority, is_active)| {
                PricingTier {
                    id: format!("t-{}", min_quantity),
                    tier_name: format!("tier-{}", priority),
                    min_quantity,
                    max_quantity,
                    unit_price,
                    priority,
                    is_active,
                }
            }),
        0..8,
    )
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// With no candidates in any category, resolution always lands on the
    /// base price with zero discount.
    #[test]
    fn prop_empty_candidates_resolve_to_base(context in arb_context()) {
        let result = PricingService::new()
            .calculate_price(&context, &PricingCandidates::default(), eval_time())
            .unwrap();

        prop_assert_eq!(result.pricing_source, PricingSource::Base);
        prop_assert_eq!(result.unit_price, context.product.base_price);
        prop_assert_eq!(result.discount_amount, Decimal::ZERO);
        prop_assert_eq!(
            result.line_total,
            context.product.base_price * Decimal::from(context.quantity)
        );
    }

    /// `unit_price * quantity == line_total` holds exactly for every
    /// non-promotional path.
    #[test]
    fn prop_line_total_round_trip(
        context in arb_context(),
        volume_pricing in arb_volume_rows(),
        pricing_tiers in arb_tier_rows(),
    ) {
        let candidates = PricingCandidates {
            volume_pricing,
            pricing_tiers,
            ..Default::default()
        };
        let result = PricingService::new()
            .calculate_price(&context, &candidates, eval_time())
            .unwrap();

        prop_assert_eq!(
            result.line_total,
            result.unit_price * Decimal::from(context.quantity)
        );
    }

    /// Reported discount fields are never negative, even when a tier's
    /// absolute unit price sits above the base price.
    #[test]
    fn prop_discount_fields_are_non_negative(
        context in arb_context(),
        volume_pricing in arb_volume_rows(),
        pricing_tiers in arb_tier_rows(),
    ) {
        let candidates = PricingCandidates {
            volume_pricing,
            pricing_tiers,
            ..Default::default()
        };
        let result = PricingService::new()
            .calculate_price(&context, &candidates, eval_time())
            .unwrap();

        prop_assert!(result.discount_amount >= Decimal::ZERO);
        prop_assert!(result.discount_percentage >= Decimal::ZERO);
    }

    /// A valid price lock always wins, regardless of what else is supplied.
    #[test]
    fn prop_valid_lock_always_wins(
        context in arb_context(),
        locked_price in arb_money(),
        volume_pricing in arb_volume_rows(),
        pricing_tiers in arb_tier_rows(),
    ) {
        let candidates = PricingCandidates {
            price_locks: vec![PriceLock {
                id: "lock-1".to_string(),
                locked_price,
                locked_until: eval_time() + Duration::days(1),
                is_active: true,
                reason: None,
            }],
            volume_pricing,
            pricing_tiers,
            ..Default::default()
        };
        let result = PricingService::new()
            .calculate_price(&context, &candidates, eval_time())
            .unwrap();

        prop_assert_eq!(result.pricing_source, PricingSource::PriceLock);
        prop_assert_eq!(result.unit_price, locked_price);
    }

    /// Two calls with identical inputs and the same injected instant return
    /// identical results.
    #[test]
    fn prop_resolution_is_idempotent(
        context in arb_context(),
        volume_pricing in arb_volume_rows(),
        pricing_tiers in arb_tier_rows(),
    ) {
        let candidates = PricingCandidates {
            volume_pricing,
            pricing_tiers,
            ..Default::default()
        };
        let service = PricingService::new();

        let first = service
            .calculate_price(&context, &candidates, eval_time())
            .unwrap();
        let second = service
            .calculate_price(&context, &candidates, eval_time())
            .unwrap();

        prop_assert_eq!(first, second);
    }

    /// Fixed-amount promo: the line total is computed first and the unit
    /// price derived by division, so the round-trip holds within a small
    /// tolerance of the floored target.
    #[test]
    fn prop_fixed_amount_promo_round_trip(
        context in arb_context(),
        discount_value in arb_money(),
    ) {
        let mut context = context;
        context.promo_code = Some("SAVE".to_string());
        let candidates = PricingCandidates {
            promo_code: Some(orderstack_pricing::PromotionalCode {
                id: "promo-1".to_string(),
                code: "SAVE".to_string(),
                description: None,
                discount_type: orderstack_pricing::DiscountType::FixedAmount,
                discount_value,
                min_order_value: Decimal::ZERO,
                max_uses: 100,
                uses_count: 0,
                valid_from: eval_time() - Duration::days(1),
                valid_until: eval_time() + Duration::days(1),
                is_active: true,
                applicable_to: orderstack_pricing::PromoApplicability::All,
                applicable_product_ids: None,
                applicable_category_ids: None,
            }),
            ..Default::default()
        };
        let result = PricingService::new()
            .calculate_price(&context, &candidates, eval_time())
            .unwrap();

        let quantity = Decimal::from(context.quantity);
        let target = (context.product.base_price * quantity - discount_value)
            .max(Decimal::ZERO);

        prop_assert_eq!(result.pricing_source, PricingSource::Promotional);
        prop_assert_eq!(result.line_total, result.unit_price * quantity);
        prop_assert!((result.line_total - target).abs() < dec!(0.000001));
        // The reported discount is the nominal value, not the capped one.
        prop_assert_eq!(result.discount_amount, discount_value);
    }
}
