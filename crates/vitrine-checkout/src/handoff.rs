//! # Channel Handoff
//!
//! Builds the click-to-chat link that carries the composed order
//! message, and defines the seam to whatever actually opens it.
//!
//! ## Handoff Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Order Handoff                                    │
//! │                                                                         │
//! │  composed message ──► percent-encode ──► https://wa.me/<number>         │
//! │                                              ?text=<encoded>            │
//! │                                                   │                     │
//! │                                                   ▼                     │
//! │                                     MessagingChannel::open(link)        │
//! │                                     (browser tab, webview, test mock)   │
//! │                                                                         │
//! │  The store never talks to the WhatsApp API: the link opens the          │
//! │  customer's own client with the message pre-filled, and the customer    │
//! │  presses send.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use url::Url;

/// Handoff failures.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// The configured base URL or recipient doesn't form a valid link.
    #[error("invalid channel link: {0}")]
    InvalidLink(#[from] url::ParseError),

    /// The channel could not be opened (popup blocked, no browser, ...).
    #[error("failed to open messaging channel: {0}")]
    OpenFailed(String),
}

/// Builds the click-to-chat link for an order message.
///
/// The message is percent-encoded into the `text` query parameter;
/// spaces become `%20` (not `+`), which every WhatsApp client decodes
/// correctly. A trailing slash on the base is tolerated.
pub fn order_link(base: &str, recipient: &str, message: &str) -> Result<Url, HandoffError> {
    let base = base.trim_end_matches('/');
    let encoded = urlencoding::encode(message);
    let url = Url::parse(&format!("{base}/{recipient}?text={encoded}"))?;
    Ok(url)
}

/// Opens the messaging channel with a pre-filled order link.
///
/// Production implementations open a browser tab or webview; tests
/// record the link.
pub trait MessagingChannel {
    fn open(&self, link: &Url) -> Result<(), HandoffError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_link_encodes_message() {
        let link = order_link("https://wa.me/", "5521999990000", "Olá mundo").unwrap();
        assert_eq!(
            link.as_str(),
            "https://wa.me/5521999990000?text=Ol%C3%A1%20mundo"
        );
    }

    #[test]
    fn test_order_link_without_trailing_slash() {
        let link = order_link("https://wa.me", "5521999990000", "oi").unwrap();
        assert_eq!(link.as_str(), "https://wa.me/5521999990000?text=oi");
    }

    #[test]
    fn test_order_link_encodes_structural_characters() {
        // '&', '=' and '#' in the message must not break the query
        let link = order_link("https://wa.me/", "5521999990000", "a&b=c#d").unwrap();
        assert_eq!(
            link.as_str(),
            "https://wa.me/5521999990000?text=a%26b%3Dc%23d"
        );
    }

    #[test]
    fn test_order_link_rejects_bad_base() {
        let err = order_link("not a url", "5521999990000", "oi").unwrap_err();
        assert!(matches!(err, HandoffError::InvalidLink(_)));
    }
}
