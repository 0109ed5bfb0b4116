//! # vitrine-core: Pure Business Logic for the Vitrine Storefront
//!
//! This crate is the **heart** of the Vitrine checkout. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Vitrine Checkout Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront Frontend                          │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout Form ──► WhatsApp        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              vitrine-checkout (Orchestration)                   │   │
//! │  │    cart state, form state, submission flow, channel handoff     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vitrine-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ normalize │  │ validate  │  │   │
//! │  │   │  Order    │  │   Money   │  │ CPF/CEP/  │  │   rules   │  │   │
//! │  │   │ CartItem  │  │  (cents)  │  │  phone    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  pricing  │  │  message  │                                 │   │
//! │  │   │ shipping, │  │ WhatsApp  │                                 │   │
//! │  │   │ discount  │  │ composer  │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CartItem, CustomerInfo, Order, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`normalize`] - Keystroke normalization for CPF, phone and CEP
//! - [`validate`] - Checkout form validation rules
//! - [`pricing`] - Shipping and payment-discount computation
//! - [`message`] - WhatsApp order-message composer
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centavos (i64) to avoid float errors
//! 4. **Errors vs. Rejections**: Field failures are data (`ValidationErrors`),
//!    never `Err`; only structural failures are typed errors
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrine_core::money::Money;
//! use vitrine_core::normalize::format_cpf;
//!
//! // Create money from centavos (never from floats!)
//! let price = Money::from_cents(1099); // R$ 10.99
//!
//! // 5% PIX discount, half-up rounding
//! let discount = price.percentage_of(500);
//! assert_eq!(discount.cents(), 55);
//!
//! // Normalize as the customer types
//! assert_eq!(format_cpf("12345678901"), "123.456.789-01");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod message;
pub mod money;
pub mod normalize;
pub mod pricing;
pub mod types;
pub mod validate;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vitrine_core::Money` instead of
// `use vitrine_core::money::Money`

pub use error::{CoreError, CoreResult};
pub use message::compose_order_message;
pub use money::Money;
pub use normalize::{digits, format_cep, format_cpf, format_phone, DigitFormat};
pub use pricing::{price_cart, PriceBreakdown, PricingRules};
pub use types::*;
pub use validate::{validate_checkout, DeliveryArea, Field, ValidationErrors};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps the composed order message within
/// what the messaging channel accepts in a single URL.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
