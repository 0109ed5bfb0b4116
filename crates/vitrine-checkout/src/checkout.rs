//! # Checkout Flow
//!
//! Drives a checkout session from form entry to WhatsApp handoff.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Submission                               │
//! │                                                                         │
//! │  submit()                                                               │
//! │     │                                                                   │
//! │     ├── phase != Idle ─────────────► Ok(InFlight)   (idempotent guard)  │
//! │     │                                                                   │
//! │     ├── Order::place(form, cart snapshot)                               │
//! │     │      │                                                            │
//! │     │      ├── Rejected ───────────► Ok(Rejected)   (errors stored,     │
//! │     │      │                          phase stays Idle, cart intact)    │
//! │     │      └── EmptyCart ──────────► Err + redirect to catalog          │
//! │     │                                                                   │
//! │     ├── phase = Submitting                                              │
//! │     ├── compose message, build link, processing pause                   │
//! │     │                                                                   │
//! │     ├── channel.open(link)                                              │
//! │     │      │                                                            │
//! │     │      ├── Err ────────────────► phase = Idle, cart intact,         │
//! │     │      │                          Err(Handoff)  (user retries)      │
//! │     │      └── Ok ─────────────────► cart cleared, phase = Submitted,   │
//! │     │                                 redirect home with confirmation   │
//! │     ▼                                                                   │
//! │  Ok(Submitted)                                                          │
//! │                                                                         │
//! │  NOTE: The mutex is never held across an await point. The phase         │
//! │        guard is what makes concurrent submits collapse to one.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, error, info};

use vitrine_core::{
    compose_order_message, format_cep, format_cpf, format_phone, CoreError, CustomerInfo,
    DeliveryAddress, DeliveryArea, Field, Order, PaymentMethod, PaymentSelection,
    PriceBreakdown, ValidationErrors,
};

use crate::cart::{Cart, CartState};
use crate::config::CheckoutConfig;
use crate::error::CheckoutError;
use crate::handoff::{order_link, MessagingChannel};
use crate::navigation::{Destination, Navigator};

/// Confirmation shown after a successful handoff.
pub const SUBMITTED_STATUS: &str =
    "Pedido enviado! Você será redirecionado para o WhatsApp para finalizar.";

// =============================================================================
// Form
// =============================================================================

/// The checkout form as the customer sees it.
///
/// Starts empty (apart from the fixed city/state) and is mutated only
/// through the [`Checkout`] setters, which normalize as they write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub customer: CustomerInfo,
    pub address: DeliveryAddress,
    pub payment: PaymentSelection,
    pub observations: String,
    pub terms_accepted: bool,
}

impl CheckoutForm {
    /// An empty form pre-filled with the area's fixed city/state.
    pub fn for_area(area: &DeliveryArea) -> Self {
        CheckoutForm {
            customer: CustomerInfo::default(),
            address: DeliveryAddress::for_area(area),
            payment: PaymentSelection::default(),
            observations: String::new(),
            terms_accepted: false,
        }
    }
}

// =============================================================================
// Phase & Outcome
// =============================================================================

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Form editable, submission possible.
    Idle,
    /// A submission is in flight; further submits are no-ops.
    Submitting,
    /// Handoff done; the session is over.
    Submitted,
}

/// What a call to [`Checkout::submit`] accomplished.
///
/// All three are *outcomes*, not errors: the flow behaved as designed.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The order was handed off to the messaging channel.
    Submitted,
    /// The form failed validation; the record is also stored for the UI.
    Rejected(ValidationErrors),
    /// Another submission was already in flight; nothing was done.
    InFlight,
}

// =============================================================================
// Checkout Session
// =============================================================================

/// Mutable session state behind the mutex.
#[derive(Debug)]
struct Inner {
    form: CheckoutForm,
    phase: CheckoutPhase,
    errors: ValidationErrors,
}

/// A checkout session.
///
/// Generic over the two outward seams so the flow is testable without a
/// browser: `M` opens the messaging channel, `N` routes the storefront.
#[derive(Debug)]
pub struct Checkout<M, N> {
    config: CheckoutConfig,
    cart: CartState,
    channel: M,
    navigator: N,
    inner: Mutex<Inner>,
}

impl<M, N> Checkout<M, N>
where
    M: MessagingChannel,
    N: Navigator,
{
    /// Opens a checkout session over the given cart.
    ///
    /// An empty cart never reaches the form: the customer is sent back
    /// to the catalog and no session is created.
    pub fn enter(
        config: CheckoutConfig,
        cart: CartState,
        channel: M,
        navigator: N,
    ) -> Result<Self, CheckoutError> {
        if cart.with_cart(Cart::is_empty) {
            debug!("checkout entered with empty cart, redirecting to catalog");
            navigator.navigate(Destination::Catalog, None);
            return Err(CheckoutError::EmptyCart);
        }

        let form = CheckoutForm::for_area(&config.area);
        Ok(Checkout {
            config,
            cart,
            channel,
            navigator,
            inner: Mutex::new(Inner {
                form,
                phase: CheckoutPhase::Idle,
                errors: ValidationErrors::new(),
            }),
        })
    }

    // -------------------------------------------------------------------------
    // Form edits
    // -------------------------------------------------------------------------
    // Each setter writes the (normalized) value and unflags the field's
    // stale validation message; the next submit re-checks everything.

    fn edit<F>(&self, field: Option<Field>, f: F)
    where
        F: FnOnce(&mut CheckoutForm),
    {
        let mut inner = self.inner.lock().expect("Checkout mutex poisoned");
        f(&mut inner.form);
        if let Some(field) = field {
            inner.errors.clear(field);
        }
    }

    pub fn set_name(&self, raw: &str) {
        self.edit(Some(Field::Name), |form| form.customer.name = raw.to_string());
    }

    /// Normalizes to "###.###.###-##" as the customer types.
    pub fn set_cpf(&self, raw: &str) {
        self.edit(Some(Field::Cpf), |form| form.customer.cpf = format_cpf(raw));
    }

    /// Normalizes to "(##) #####-####" as the customer types.
    pub fn set_phone(&self, raw: &str) {
        self.edit(Some(Field::Phone), |form| {
            form.customer.phone = format_phone(raw)
        });
    }

    pub fn set_email(&self, raw: &str) {
        self.edit(None, |form| form.customer.email = raw.to_string());
    }

    /// Normalizes to "#####-###" as the customer types.
    pub fn set_cep(&self, raw: &str) {
        self.edit(Some(Field::Cep), |form| form.address.cep = format_cep(raw));
    }

    pub fn set_street(&self, raw: &str) {
        self.edit(Some(Field::Street), |form| form.address.street = raw.to_string());
    }

    pub fn set_number(&self, raw: &str) {
        self.edit(Some(Field::Number), |form| form.address.number = raw.to_string());
    }

    pub fn set_complement(&self, raw: &str) {
        self.edit(None, |form| form.address.complement = raw.to_string());
    }

    pub fn set_neighborhood(&self, raw: &str) {
        self.edit(Some(Field::Neighborhood), |form| {
            form.address.neighborhood = raw.to_string()
        });
    }

    /// Selecting a method resets the cash-change answers.
    pub fn select_payment(&self, method: PaymentMethod) {
        let mut inner = self.inner.lock().expect("Checkout mutex poisoned");
        inner.form.payment.select(method);
        inner.errors.clear(Field::PaymentMethod);
        inner.errors.clear(Field::ChangeAmount);
    }

    pub fn set_needs_change(&self, needs_change: bool) {
        self.edit(Some(Field::ChangeAmount), |form| {
            form.payment.needs_change = needs_change;
            if !needs_change {
                form.payment.change_amount.clear();
            }
        });
    }

    pub fn set_change_amount(&self, raw: &str) {
        self.edit(Some(Field::ChangeAmount), |form| {
            form.payment.change_amount = raw.to_string()
        });
    }

    pub fn set_observations(&self, raw: &str) {
        self.edit(None, |form| form.observations = raw.to_string());
    }

    pub fn set_terms_accepted(&self, accepted: bool) {
        self.edit(Some(Field::Terms), |form| form.terms_accepted = accepted);
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Snapshot of the form for rendering.
    pub fn form(&self) -> CheckoutForm {
        self.inner.lock().expect("Checkout mutex poisoned").form.clone()
    }

    /// The validation record from the last rejected submission.
    pub fn errors(&self) -> ValidationErrors {
        self.inner.lock().expect("Checkout mutex poisoned").errors.clone()
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.inner.lock().expect("Checkout mutex poisoned").phase
    }

    /// Live price preview for the order summary panel.
    ///
    /// Recomputed on demand so toggling the payment method immediately
    /// reflects the discount.
    pub fn preview(&self) -> PriceBreakdown {
        let method = {
            let inner = self.inner.lock().expect("Checkout mutex poisoned");
            inner.form.payment.method
        };
        self.cart.with_cart(|cart| {
            vitrine_core::price_cart(&cart.items, method, &self.config.rules)
        })
    }

    /// Notifies the session that the cart changed underneath it.
    ///
    /// An emptied cart sends the customer back to the catalog, unless a
    /// submission is already in flight (that one clears the cart itself).
    pub fn cart_changed(&self) {
        let redirect = {
            let inner = self.inner.lock().expect("Checkout mutex poisoned");
            inner.phase == CheckoutPhase::Idle && self.cart.with_cart(Cart::is_empty)
        };
        if redirect {
            debug!("cart emptied during checkout, redirecting to catalog");
            self.navigator.navigate(Destination::Catalog, None);
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    fn reset_to_idle(&self) {
        let mut inner = self.inner.lock().expect("Checkout mutex poisoned");
        inner.phase = CheckoutPhase::Idle;
    }

    /// Submits the form.
    ///
    /// Validation runs over the current field values and a fresh cart
    /// snapshot on every call; nothing is trusted from earlier attempts.
    /// Concurrent calls collapse to one handoff via the phase guard.
    ///
    /// ## Errors
    /// - [`CheckoutError::EmptyCart`] when the cart was emptied before
    ///   submission (the customer is redirected to the catalog)
    /// - [`CheckoutError::Handoff`] when the channel could not be
    ///   opened; the session rolls back to `Idle` with the cart intact
    pub async fn submit(&self) -> Result<SubmitOutcome, CheckoutError> {
        let order = {
            let mut inner = self.inner.lock().expect("Checkout mutex poisoned");

            if inner.phase != CheckoutPhase::Idle {
                debug!(phase = ?inner.phase, "submission already in flight, ignoring");
                return Ok(SubmitOutcome::InFlight);
            }

            let items = self.cart.with_cart(|cart| cart.items.clone());
            match Order::place(
                inner.form.customer.clone(),
                inner.form.address.clone(),
                inner.form.payment.clone(),
                inner.form.terms_accepted,
                items,
                inner.form.observations.clone(),
                &self.config.area,
                &self.config.rules,
            ) {
                Ok(order) => {
                    inner.errors = ValidationErrors::new();
                    inner.phase = CheckoutPhase::Submitting;
                    order
                }
                Err(CoreError::Rejected(errors)) => {
                    debug!(%errors, "submission rejected");
                    inner.errors = errors.clone();
                    return Ok(SubmitOutcome::Rejected(errors));
                }
                Err(CoreError::EmptyCart) => {
                    drop(inner);
                    debug!("cart emptied before submission, redirecting to catalog");
                    self.navigator.navigate(Destination::Catalog, None);
                    return Err(CheckoutError::EmptyCart);
                }
            }
        };

        info!(
            order_id = %order.id,
            items = order.items.len(),
            total = %order.pricing.final_total,
            "order accepted, preparing handoff"
        );

        let message = compose_order_message(&order, &self.config.branding.store_name);
        let link = match order_link(
            &self.config.branding.channel_base,
            &self.config.branding.whatsapp_number,
            &message,
        ) {
            Ok(link) => link,
            Err(e) => {
                error!(order_id = %order.id, error = %e, "could not build channel link");
                self.reset_to_idle();
                return Err(e.into());
            }
        };

        // Lets the storefront show its processing state before the
        // channel window steals focus
        sleep(Duration::from_millis(self.config.submit_delay_ms)).await;

        if let Err(e) = self.channel.open(&link) {
            error!(order_id = %order.id, error = %e, "handoff failed, order kept editable");
            self.reset_to_idle();
            return Err(e.into());
        }

        self.cart.with_cart_mut(Cart::clear);
        {
            let mut inner = self.inner.lock().expect("Checkout mutex poisoned");
            inner.phase = CheckoutPhase::Submitted;
        }
        info!(order_id = %order.id, "order handed off");
        self.navigator
            .navigate(Destination::Home, Some(SUBMITTED_STATUS));

        Ok(SubmitOutcome::Submitted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use url::Url;
    use vitrine_core::CartItem;

    use super::*;
    use crate::handoff::HandoffError;

    /// Channel mock: counts calls, records the last link, optionally fails.
    #[derive(Debug, Clone, Default)]
    struct RecordingChannel {
        calls: Arc<AtomicUsize>,
        last: Arc<Mutex<Option<Url>>>,
        fail: Arc<AtomicBool>,
    }

    impl MessagingChannel for RecordingChannel {
        fn open(&self, link: &Url) -> Result<(), HandoffError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(HandoffError::OpenFailed("popup blocked".to_string()));
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(link.clone());
            Ok(())
        }
    }

    /// Navigator mock: records every redirect with its status message.
    #[derive(Debug, Clone, Default)]
    struct RecordingNavigator {
        visits: Arc<Mutex<Vec<(Destination, Option<String>)>>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, destination: Destination, status: Option<&str>) {
            self.visits
                .lock()
                .unwrap()
                .push((destination, status.map(ToString::to_string)));
        }
    }

    fn cart_with_item(price_cents: i64, quantity: i64) -> CartState {
        let cart = CartState::new();
        cart.with_cart_mut(|c| {
            c.add_item(CartItem::new(
                "p1",
                "Caneca Carioca",
                price_cents,
                quantity,
                None,
            ))
        })
        .unwrap();
        cart
    }

    fn session(
        cart: CartState,
    ) -> (
        Checkout<RecordingChannel, RecordingNavigator>,
        RecordingChannel,
        RecordingNavigator,
    ) {
        let channel = RecordingChannel::default();
        let navigator = RecordingNavigator::default();
        let checkout = Checkout::enter(
            CheckoutConfig::default(),
            cart,
            channel.clone(),
            navigator.clone(),
        )
        .unwrap();
        (checkout, channel, navigator)
    }

    fn fill_valid_form(checkout: &Checkout<RecordingChannel, RecordingNavigator>) {
        checkout.set_name("Maria da Silva");
        checkout.set_cpf("12345678901");
        checkout.set_phone("21999998888");
        checkout.set_cep("22000000");
        checkout.set_street("Rua Voluntários da Pátria");
        checkout.set_number("45");
        checkout.set_neighborhood("Botafogo");
        checkout.select_payment(PaymentMethod::Pix);
        checkout.set_terms_accepted(true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_happy_path() {
        let cart = cart_with_item(20_000, 1);
        let (checkout, channel, navigator) = session(cart.clone());
        fill_valid_form(&checkout);

        let outcome = checkout.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(checkout.phase(), CheckoutPhase::Submitted);

        // Exactly one handoff, carrying the composed message
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
        let link = channel.last.lock().unwrap().clone().unwrap();
        assert!(link.as_str().starts_with("https://wa.me/5521999990000?text="));
        let text = link
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(text.contains("*NOVO PEDIDO - Vitrine Carioca*"));
        assert!(text.contains("*TOTAL: R$ 190.00*"));
        assert_eq!(text.matches("• ").count(), 1);

        // Cart cleared, customer sent home with the confirmation
        assert!(cart.with_cart(Cart::is_empty));
        let visits = navigator.visits.lock().unwrap();
        assert_eq!(
            visits.as_slice(),
            &[(Destination::Home, Some(SUBMITTED_STATUS.to_string()))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_rejected_has_no_side_effects() {
        let cart = cart_with_item(20_000, 1);
        let (checkout, channel, navigator) = session(cart.clone());
        // Form left empty on purpose

        let outcome = checkout.submit().await.unwrap();
        let errors = match outcome {
            SubmitOutcome::Rejected(errors) => errors,
            other => panic!("expected Rejected, got {other:?}"),
        };
        assert_eq!(errors.len(), 9);
        assert_eq!(checkout.errors(), errors);

        assert_eq!(checkout.phase(), CheckoutPhase::Idle);
        assert_eq!(channel.calls.load(Ordering::SeqCst), 0);
        assert!(navigator.visits.lock().unwrap().is_empty());
        assert!(!cart.with_cart(Cart::is_empty));
    }

    #[tokio::test(start_paused = true)]
    async fn test_handoff_failure_rolls_back_and_allows_retry() {
        let cart = cart_with_item(20_000, 1);
        let (checkout, channel, navigator) = session(cart.clone());
        fill_valid_form(&checkout);

        channel.fail.store(true, Ordering::SeqCst);
        let err = checkout.submit().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Handoff(_)));

        // Rolled back: cart intact, form editable, no redirect
        assert_eq!(checkout.phase(), CheckoutPhase::Idle);
        assert!(!cart.with_cart(Cart::is_empty));
        assert!(navigator.visits.lock().unwrap().is_empty());

        // Retry succeeds without re-entering the form
        channel.fail.store(false, Ordering::SeqCst);
        let outcome = checkout.submit().await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_collapses_to_one_handoff() {
        let cart = cart_with_item(20_000, 1);
        let (checkout, channel, _navigator) = session(cart);
        fill_valid_form(&checkout);

        let (first, second) = tokio::join!(checkout.submit(), checkout.submit());

        assert_eq!(first.unwrap(), SubmitOutcome::Submitted);
        assert_eq!(second.unwrap(), SubmitOutcome::InFlight);
        assert_eq!(channel.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_with_empty_cart_redirects() {
        let channel = RecordingChannel::default();
        let navigator = RecordingNavigator::default();

        let result = Checkout::enter(
            CheckoutConfig::default(),
            CartState::new(),
            channel,
            navigator.clone(),
        );

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert_eq!(
            navigator.visits.lock().unwrap().as_slice(),
            &[(Destination::Catalog, None)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cart_emptied_mid_session_redirects() {
        let cart = cart_with_item(20_000, 1);
        let (checkout, _channel, navigator) = session(cart.clone());

        cart.with_cart_mut(|c| c.remove_item("p1")).unwrap();
        checkout.cart_changed();

        assert_eq!(
            navigator.visits.lock().unwrap().as_slice(),
            &[(Destination::Catalog, None)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_setters_normalize_and_clear_errors() {
        let cart = cart_with_item(20_000, 1);
        let (checkout, _channel, _navigator) = session(cart);

        // A rejected submission flags the empty fields
        let _ = checkout.submit().await.unwrap();
        assert!(checkout.errors().contains(Field::Cpf));

        checkout.set_cpf("12345678901");
        assert_eq!(checkout.form().customer.cpf, "123.456.789-01");
        assert!(!checkout.errors().contains(Field::Cpf));

        // Untouched fields stay flagged until the next submit
        assert!(checkout.errors().contains(Field::Name));
    }

    #[test]
    fn test_phase_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(CheckoutPhase::Submitting).unwrap(),
            "submitting"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_follows_payment_method() {
        let cart = cart_with_item(10_000, 1);
        let (checkout, _channel, _navigator) = session(cart);

        // No method yet: fee applies, no discount
        let before = checkout.preview();
        assert_eq!(before.total.cents(), 11_500);
        assert!(before.discount.is_zero());

        checkout.select_payment(PaymentMethod::Pix);
        let after = checkout.preview();
        assert_eq!(after.discount.cents(), 575);
        assert_eq!(after.final_total.cents(), 10_925);
    }
}
