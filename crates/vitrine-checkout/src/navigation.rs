//! # Navigation Seam
//!
//! The checkout flow redirects the customer at three points: away from
//! an empty checkout, back home after a successful order, and never
//! anywhere on rejection. The flow itself doesn't know how the
//! storefront routes; it talks to this trait.

use serde::{Deserialize, Serialize};

/// Storefront destinations the checkout flow can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// The storefront landing page.
    Home,
    /// The product catalog.
    Catalog,
}

impl Destination {
    /// The storefront route for this destination.
    pub const fn path(self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::Catalog => "/produtos",
        }
    }
}

/// Routes the customer within the storefront.
///
/// `status` carries a user-facing message to show after the redirect
/// (e.g. the post-submission confirmation).
pub trait Navigator {
    fn navigate(&self, destination: Destination, status: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_paths() {
        assert_eq!(Destination::Home.path(), "/");
        assert_eq!(Destination::Catalog.path(), "/produtos");
    }
}
