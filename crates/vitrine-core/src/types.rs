//! # Domain Types
//!
//! Core domain types for the checkout workflow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────────┐  │
//! │  │    CartItem     │   │   CustomerInfo   │   │  DeliveryAddress    │  │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────────  │  │
//! │  │  id             │   │  name            │   │  cep (8 digits,     │  │
//! │  │  name           │   │  cpf (11 digits) │   │   regional prefix)  │  │
//! │  │  unit_price     │   │  phone (11 dig.) │   │  street/number/...  │  │
//! │  │  quantity       │   │  email (opt.)    │   │  city+state fixed   │  │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────────┐  │
//! │  │ PaymentMethod   │   │ PaymentSelection │   │       Order         │  │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────────  │  │
//! │  │  Pix            │   │  method (opt.)   │   │  everything above + │  │
//! │  │  CreditCard     │   │  needs_change    │   │  PriceBreakdown;    │  │
//! │  │  DebitCard      │   │  change_amount   │   │  only constructible │  │
//! │  │  Cash           │   │                  │   │  from valid input   │  │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{price_cart, PriceBreakdown, PricingRules};
use crate::validate::{validate_checkout, DeliveryArea};

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the shopping cart.
///
/// Owned by the cart collaborator; the checkout core only reads it.
/// The unit price is frozen when the item enters the cart, so the
/// order snapshot is immune to later catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog identifier.
    pub id: String,

    /// Display name shown in the cart and in the order message.
    pub name: String,

    /// Unit price in centavos at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart (always >= 1; the cart enforces this).
    pub quantity: i64,

    /// Product image reference for the cart display.
    pub image: Option<String>,

    /// When this item was added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart item, freezing the price now.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price_cents: i64,
        quantity: i64,
        image: Option<String>,
    ) -> Self {
        CartItem {
            id: id.into(),
            name: name.into(),
            unit_price_cents,
            quantity,
            image,
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// The customer block of the checkout form.
///
/// Created empty at checkout entry and mutated only by user edits
/// through the orchestrator. `cpf` and `phone` hold the normalized
/// display form; validation strips formatting before counting digits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    /// Full name.
    pub name: String,
    /// CPF, normalized as "###.###.###-##".
    pub cpf: String,
    /// WhatsApp phone, normalized as "(##) #####-####".
    pub phone: String,
    /// Optional; empty string means not provided.
    pub email: String,
}

impl CustomerInfo {
    /// True when the customer provided an email.
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

// =============================================================================
// Delivery Address
// =============================================================================

/// The delivery block of the checkout form.
///
/// City and state are fixed for this deployment (single-region
/// delivery); the form renders them read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// CEP, normalized as "#####-###".
    pub cep: String,
    pub street: String,
    pub number: String,
    /// Always optional (apartment, block, etc.).
    pub complement: String,
    pub neighborhood: String,
    /// Fixed for the deployment's delivery area.
    pub city: String,
    /// Fixed for the deployment's delivery area.
    pub state: String,
}

impl DeliveryAddress {
    /// An empty address pre-filled with the area's fixed city/state.
    pub fn for_area(area: &DeliveryArea) -> Self {
        DeliveryAddress {
            cep: String::new(),
            street: String::new(),
            number: String::new(),
            complement: String::new(),
            neighborhood: String::new(),
            city: area.city.clone(),
            state: area.state.clone(),
        }
    }

    /// True when the customer filled a complement.
    pub fn has_complement(&self) -> bool {
        !self.complement.trim().is_empty()
    }
}

impl Default for DeliveryAddress {
    fn default() -> Self {
        DeliveryAddress::for_area(&DeliveryArea::default())
    }
}

// =============================================================================
// Payment
// =============================================================================

/// The payment methods the storefront accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant bank transfer; the discount-eligible method.
    Pix,
    CreditCard,
    DebitCard,
    /// Cash on delivery; may need change.
    Cash,
}

impl PaymentMethod {
    /// Human-readable name as shown in the order message.
    pub const fn display_name(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "Cartão de Crédito",
            PaymentMethod::DebitCard => "Cartão de Débito",
            PaymentMethod::Cash => "Dinheiro",
        }
    }
}

/// The payment block of the checkout form.
///
/// `needs_change` and `change_amount` are only meaningful for cash;
/// selecting any method resets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSelection {
    pub method: Option<PaymentMethod>,
    pub needs_change: bool,
    /// Raw numeric string as typed ("100.00"); presence-validated only.
    pub change_amount: String,
}

impl PaymentSelection {
    /// Selects a method, resetting the change fields (a new selection
    /// invalidates any previous cash answer).
    pub fn select(&mut self, method: PaymentMethod) {
        self.method = Some(method);
        self.needs_change = false;
        self.change_amount.clear();
    }

    /// The amount to bring change for, when applicable: cash selected,
    /// change requested, and an amount provided.
    pub fn change_for(&self) -> Option<&str> {
        match self.method {
            Some(PaymentMethod::Cash) if self.needs_change => {
                let amount = self.change_amount.trim();
                (!amount.is_empty()).then_some(amount)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A validated order, ready for handoff.
///
/// Ephemeral: composed into the outbound message, handed to the
/// messaging channel, and discarded. Never persisted.
///
/// ## Invariant
/// The only constructor is [`Order::place`], which re-runs the full
/// validator; an `Order` therefore always represents a valid form over
/// a non-empty cart with terms accepted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Ephemeral order id (UUID v4) for log correlation.
    pub id: String,
    pub customer: CustomerInfo,
    pub address: DeliveryAddress,
    pub payment: PaymentSelection,
    /// Cart snapshot at submission time.
    pub items: Vec<CartItem>,
    /// Free-form notes; empty means none.
    pub observations: String,
    pub pricing: PriceBreakdown,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order from the submitted form and a cart snapshot.
    ///
    /// Validation is recomputed here, never trusted from an earlier
    /// attempt: field values may have changed since the form was last
    /// checked.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] when the snapshot has no items
    /// - [`CoreError::Rejected`] with the full per-field record when
    ///   any rule fails or terms are not accepted
    #[allow(clippy::too_many_arguments)]
    pub fn place(
        customer: CustomerInfo,
        address: DeliveryAddress,
        payment: PaymentSelection,
        terms_accepted: bool,
        items: Vec<CartItem>,
        observations: String,
        area: &DeliveryArea,
        rules: &PricingRules,
    ) -> CoreResult<Order> {
        if items.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let errors = validate_checkout(&customer, &address, &payment, terms_accepted, area);
        if !errors.is_empty() {
            return Err(CoreError::Rejected(errors));
        }

        let pricing = price_cart(&items, payment.method, rules);

        Ok(Order {
            id: Uuid::new_v4().to_string(),
            customer,
            address,
            payment,
            items,
            observations,
            pricing,
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Field;

    fn valid_parts() -> (CustomerInfo, DeliveryAddress, PaymentSelection) {
        let customer = CustomerInfo {
            name: "Maria da Silva".to_string(),
            cpf: "123.456.789-01".to_string(),
            phone: "(21) 99999-8888".to_string(),
            email: String::new(),
        };
        let address = DeliveryAddress {
            cep: "22000-000".to_string(),
            street: "Rua Voluntários da Pátria".to_string(),
            number: "45".to_string(),
            complement: String::new(),
            neighborhood: "Botafogo".to_string(),
            city: "Rio de Janeiro".to_string(),
            state: "RJ".to_string(),
        };
        let mut payment = PaymentSelection::default();
        payment.select(PaymentMethod::Pix);
        (customer, address, payment)
    }

    #[test]
    fn test_cart_item_line_total() {
        let item = CartItem::new("p1", "Produto", 299, 3, None);
        assert_eq!(item.line_total().cents(), 897);
    }

    #[test]
    fn test_payment_selection_resets_change_fields() {
        let mut payment = PaymentSelection::default();
        payment.select(PaymentMethod::Cash);
        payment.needs_change = true;
        payment.change_amount = "100.00".to_string();

        payment.select(PaymentMethod::Pix);
        assert!(!payment.needs_change);
        assert!(payment.change_amount.is_empty());
    }

    #[test]
    fn test_change_for() {
        let mut payment = PaymentSelection::default();
        payment.select(PaymentMethod::Cash);
        assert_eq!(payment.change_for(), None);

        payment.needs_change = true;
        assert_eq!(payment.change_for(), None);

        payment.change_amount = "100.00".to_string();
        assert_eq!(payment.change_for(), Some("100.00"));

        // Not cash: never applicable
        payment.select(PaymentMethod::Pix);
        assert_eq!(payment.change_for(), None);
    }

    #[test]
    fn test_place_valid_order() {
        let (customer, address, payment) = valid_parts();
        let items = vec![CartItem::new("p1", "Produto", 20_000, 1, None)];

        let order = Order::place(
            customer,
            address,
            payment,
            true,
            items,
            String::new(),
            &DeliveryArea::default(),
            &PricingRules::default(),
        )
        .unwrap();

        assert_eq!(order.pricing.final_total.cents(), 19_000);
        assert_eq!(order.items.len(), 1);
        assert!(!order.id.is_empty());
    }

    #[test]
    fn test_place_rejects_invalid_form() {
        let (customer, mut address, payment) = valid_parts();
        address.cep = "30000-000".to_string();
        let items = vec![CartItem::new("p1", "Produto", 20_000, 1, None)];

        let err = Order::place(
            customer,
            address,
            payment,
            true,
            items,
            String::new(),
            &DeliveryArea::default(),
            &PricingRules::default(),
        )
        .unwrap_err();

        match err {
            CoreError::Rejected(errors) => {
                assert!(errors.contains(Field::Cep));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_place_rejects_unaccepted_terms() {
        let (customer, address, payment) = valid_parts();
        let items = vec![CartItem::new("p1", "Produto", 20_000, 1, None)];

        let err = Order::place(
            customer,
            address,
            payment,
            false,
            items,
            String::new(),
            &DeliveryArea::default(),
            &PricingRules::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Rejected(e) if e.contains(Field::Terms)));
    }

    #[test]
    fn test_place_rejects_empty_cart() {
        let (customer, address, payment) = valid_parts();

        let err = Order::place(
            customer,
            address,
            payment,
            true,
            Vec::new(),
            String::new(),
            &DeliveryArea::default(),
            &PricingRules::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }
}
