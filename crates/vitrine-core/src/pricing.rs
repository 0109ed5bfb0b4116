//! # Pricing Engine
//!
//! Pure function from cart contents + selected payment method to a
//! price breakdown.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal  = Σ (unit price × quantity)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  shipping  = 0 if subtotal ≥ threshold, else flat fee   (step function) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total     = subtotal + shipping                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  discount  = total × rate, only for the discount-eligible method (PIX)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  final     = total - discount                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All values are integer centavos ([`Money`]); the breakdown reproduces
//! exactly under repeated computation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartItem, PaymentMethod};

// =============================================================================
// Pricing Rules
// =============================================================================

/// The storefront's pricing knobs.
///
/// These are business constants for the current deployment, kept as
/// named, overridable values rather than scattered literals. The
/// defaults are the live storefront's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRules {
    /// Subtotal at or above which shipping is waived.
    pub free_shipping_threshold: Money,
    /// Flat shipping fee below the threshold.
    pub shipping_fee: Money,
    /// The single payment method that triggers a discount.
    pub discount_method: PaymentMethod,
    /// Discount rate in basis points (500 = 5%).
    pub discount_bps: u32,
}

impl Default for PricingRules {
    /// Free shipping from R$ 150.00, R$ 15.00 flat fee otherwise,
    /// 5% off for PIX.
    fn default() -> Self {
        PricingRules {
            free_shipping_threshold: Money::from_cents(15_000),
            shipping_fee: Money::from_cents(1_500),
            discount_method: PaymentMethod::Pix,
            discount_bps: 500,
        }
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// The computed price of an order.
///
/// ## Invariants
/// - `total = subtotal + shipping`
/// - `discount = total × discount_bps / 10000` (half-up), zero unless
///   the selected method is the discount-eligible one
/// - `final_total = total - discount`, never negative for sane rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Zero at or above the free-shipping threshold.
    pub shipping: Money,
    /// Order value before discount.
    pub total: Money,
    /// Applied discount rate in basis points (0 when not eligible).
    pub discount_bps: u32,
    /// Discount amount.
    pub discount: Money,
    /// What the customer pays.
    pub final_total: Money,
}

impl PriceBreakdown {
    /// True when shipping was waived.
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// True when a discount applies.
    pub fn discounted(&self) -> bool {
        self.discount.is_positive()
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a cart for the given payment method.
///
/// Pure: same items + method + rules always produce the same breakdown.
/// `method` is optional because the form may not have a selection yet;
/// no selection means no discount.
pub fn price_cart(
    items: &[CartItem],
    method: Option<PaymentMethod>,
    rules: &PricingRules,
) -> PriceBreakdown {
    let subtotal: Money = items.iter().map(CartItem::line_total).sum();

    let shipping = if subtotal >= rules.free_shipping_threshold {
        Money::zero()
    } else {
        rules.shipping_fee
    };

    let total = subtotal + shipping;

    let discount_bps = match method {
        Some(m) if m == rules.discount_method => rules.discount_bps,
        _ => 0,
    };
    let discount = total.percentage_of(discount_bps);

    PriceBreakdown {
        subtotal,
        shipping,
        total,
        discount_bps,
        discount,
        final_total: total - discount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
