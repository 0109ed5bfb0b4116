//! # Vitrine Checkout Library
//!
//! Orchestration layer for the Vitrine storefront checkout.
//! This crate owns everything vitrine-core is not allowed to touch:
//! shared state, the clock, the environment, and the outward seams.
//!
//! ## Module Organization
//! ```text
//! vitrine_checkout/
//! ├── lib.rs          ◄─── You are here (exports & logging setup)
//! ├── cart.rs         ◄─── Shared cart state (Arc<Mutex<Cart>>)
//! ├── config.rs       ◄─── Deployment configuration (env + defaults)
//! ├── checkout.rs     ◄─── The checkout session & submission flow
//! ├── handoff.rs      ◄─── Click-to-chat link + MessagingChannel seam
//! ├── navigation.rs   ◄─── Storefront routing seam
//! └── error.rs        ◄─── Submission flow errors
//! ```
//!
//! ## State Management
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout State Management                           │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    CartState     │ │ Checkout (inner) │ │   CheckoutConfig     │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Cart items    │ │  • Form fields   │ │  • Branding          │   │
//! │  │  • Shared with   │ │  • Phase         │ │  • Delivery area     │   │
//! │  │    storefront UI │ │  • Error record  │ │  • Pricing rules     │   │
//! │  │  (Arc<Mutex>)    │ │  (Mutex)         │ │  (read-only)         │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  WHY: The cart outlives any checkout session; the form dies with it.   │
//! │       Config is immutable after startup, so it needs no lock at all.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod handoff;
pub mod navigation;

use tracing_subscriber::EnvFilter;

pub use cart::{Cart, CartError, CartState};
pub use checkout::{Checkout, CheckoutForm, CheckoutPhase, SubmitOutcome, SUBMITTED_STATUS};
pub use config::{BrandingConfig, CheckoutConfig};
pub use error::CheckoutError;
pub use handoff::{order_link, HandoffError, MessagingChannel};
pub use navigation::{Destination, Navigator};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vitrine=trace` - Show trace for vitrine crates only
/// - Default: INFO level, DEBUG for vitrine crates
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vitrine=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
