//! # Checkout Error Type
//!
//! Failures of the submission flow itself.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Checkout                           │
//! │                                                                         │
//! │  submit()                                                               │
//! │     │                                                                   │
//! │     ├── Field failures? ──► NOT an error: Ok(SubmitOutcome::Rejected)   │
//! │     │                       with the per-field record for the form      │
//! │     │                                                                   │
//! │     ├── Cart empty? ──────► CheckoutError::EmptyCart                    │
//! │     │                       (flow redirects to the catalog)             │
//! │     │                                                                   │
//! │     └── Channel failed? ──► CheckoutError::Handoff                      │
//! │                             (state rolled back, user can retry)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::handoff::HandoffError;

/// Submission flow errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was reached (or the cart was emptied) with no items.
    #[error("checkout requires a non-empty cart")]
    EmptyCart,

    /// The messaging channel could not be opened; the order was not
    /// handed off and the cart is intact.
    #[error(transparent)]
    Handoff(#[from] HandoffError),
}
