//! Pricing domain models.
//!
//! Candidate rows mirror the platform's pricing tables. Each collection is
//! fetched fresh by the caller, scoped to one product/organization pair, and
//! handed to the resolver as-is; the resolver never mutates them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product snapshot the resolver prices against.
///
/// Only `id` and `base_price` participate in resolution; `sku` and `name`
/// are carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub base_price: Decimal,
    pub organization_id: String,
}

/// Time-limited guaranteed price for one customer/product pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLock {
    pub id: String,
    pub locked_price: Decimal,
    pub locked_until: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Negotiated contract rate, valid only while the contract itself is.
///
/// The row's own `is_active` flag and the contract's lifecycle status plus
/// temporal window are independent checks; all three must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractPrice {
    pub id: String,
    pub contract_price: Decimal,
    pub is_active: bool,
    pub contract_id: String,
    pub contract_status: String,
    pub contract_start_date: DateTime<Utc>,
    pub contract_end_date: DateTime<Utc>,
}

/// Flat override price for one customer/product pair, no time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProductPrice {
    pub id: String,
    pub custom_price: Decimal,
    pub is_active: bool,
}

/// How a promotional code discounts the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    FixedAmount,
    /// Valid code, but the effect is order-level shipping; the resolver
    /// leaves the unit price untouched.
    FreeShipping,
}

/// Which products a promotional code can discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromoApplicability {
    All,
    Specific,
}

/// Promotional code row, shared across many orders.
///
/// `uses_count` is advisory input: the resolver checks it against `max_uses`
/// but never increments it. That side effect belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionalCode {
    pub id: String,
    pub code: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_value: Decimal,
    pub max_uses: u32,
    pub uses_count: u32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub is_active: bool,
    pub applicable_to: PromoApplicability,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_product_ids: Option<Vec<String>>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_category_ids: Option<Vec<String>>,
}

impl PromotionalCode {
    /// Whether this code's product restriction covers the given product.
    /// Only meaningful when `applicable_to` is `Specific`.
    pub fn applies_to_product(&self, product_id: &str) -> bool {
        self.applicable_product_ids
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id == product_id))
    }
}

/// One quantity breakpoint for percentage volume discounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumePricing {
    pub id: String,
    pub min_quantity: u32,
    pub discount_percentage: Decimal,
    pub is_active: bool,
}

/// Quantity-banded tier with an absolute unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub id: String,
    pub tier_name: String,
    pub min_quantity: u32,
    /// None = unbounded above.
    #[serde(default)]
    pub max_quantity: Option<u32>,
    pub unit_price: Decimal,
    /// Lower number = higher precedence.
    pub priority: i32,
    pub is_active: bool,
}

/// One line-item pricing request.
///
/// Invariant: `quantity > 0`. `base_price > 0` is assumed valid on input and
/// not re-validated by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingContext {
    pub product: Product,
    pub quantity: u32,
    pub customer_organization_id: String,
    pub supplier_organization_id: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_subtotal: Option<Decimal>,
}

/// The candidate rows the caller fetched for one resolution call.
/// Every collection may be empty; an empty collection is "no match",
/// never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCandidates {
    pub price_locks: Vec<PriceLock>,
    pub contract_prices: Vec<ContractPrice>,
    pub customer_prices: Vec<CustomerProductPrice>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<PromotionalCode>,
    pub volume_pricing: Vec<VolumePricing>,
    pub pricing_tiers: Vec<PricingTier>,
}

/// Which mechanism produced the resolved price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingSource {
    PriceLock,
    Contract,
    CustomerSpecific,
    Promotional,
    Volume,
    Tier,
    Base,
}

/// Diagnostic metadata attached to a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDetails {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_discount: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier_name: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_discount: Option<Decimal>,
}

/// Resolved price for one line item.
///
/// `discount_amount` and `discount_percentage` are clamped non-negative;
/// `unit_price` is not clamped and may exceed `base_price` when a lock,
/// contract, or custom price happens to sit above it. No rounding is
/// performed; display precision is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub base_price: Decimal,
    pub discount_amount: Decimal,
    pub discount_percentage: Decimal,
    pub pricing_source: PricingSource,
    pub pricing_details: PricingDetails,
    pub warnings: Vec<String>,
}

/// Outcome of the validation-only promo code pre-flight.
/// Collects every failing condition, not just the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}
