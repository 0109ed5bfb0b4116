//! # Error Types
//!
//! Domain-specific error types for vitrine-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vitrine-core errors (this file)                                        │
//! │  └── CoreError          - Order construction failures                   │
//! │                                                                         │
//! │  Field-level validation failures are NOT errors: they travel as the     │
//! │  ValidationErrors record (validate module) so every failing field       │
//! │  surfaces at once next to its input.                                    │
//! │                                                                         │
//! │  vitrine-checkout errors (separate crate)                               │
//! │  ├── CheckoutError      - Submission failures (handoff, empty cart)     │
//! │  └── HandoffError       - Messaging-channel link failures               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Recoverable field problems are data, not errors

use thiserror::Error;

use crate::validate::ValidationErrors;

// =============================================================================
// Core Error
// =============================================================================

/// Order construction errors.
///
/// An `Order` is only constructible from a valid form over a non-empty
/// cart; these variants are the two ways construction can fail.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// The cart snapshot had no items. Checkout should never have been
    /// reachable; the orchestrator redirects instead of surfacing this
    /// to the user.
    #[error("order has no items")]
    EmptyCart,

    /// One or more fields failed validation, or terms were not
    /// accepted. Carries the full per-field record for display.
    #[error("order rejected: {0}")]
    Rejected(ValidationErrors),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
