//! # Order Message Composer
//!
//! Renders a validated [`Order`] into the WhatsApp order message.
//!
//! ## Message Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  🛍️ *NOVO PEDIDO - <store>*                                             │
//! │                                                                         │
//! │  👤 *DADOS DO CLIENTE:*        name / CPF / phone / email (if given)    │
//! │  📍 *ENDEREÇO DE ENTREGA:*     street, number [- complement]            │
//! │                                neighborhood - city/state, CEP           │
//! │  🛒 *PRODUTOS:*                one bullet per cart line                 │
//! │  💰 *VALORES:*                 subtotal, shipping, discount, total      │
//! │  💳 *FORMA DE PAGAMENTO:*      method [+ change request]                │
//! │  📝 *OBSERVAÇÕES:*             only when notes were left                │
//! │  ✅ closing confirmation line                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The output is deterministic: the same order and store name always
//! produce the same bytes. Optional sections are omitted entirely, never
//! rendered empty. Amounts come straight from the order's stored
//! [`PriceBreakdown`](crate::pricing::PriceBreakdown); nothing is
//! recomputed here.

use std::fmt::Write;

use crate::types::Order;

/// Renders the discount rate for display: 500 bps → "5", 750 → "7.5".
fn percent_label(bps: u32) -> String {
    if bps % 100 == 0 {
        format!("{}", bps / 100)
    } else {
        format!("{}", f64::from(bps) / 100.0)
    }
}

/// Composes the outbound order message for a validated order.
pub fn compose_order_message(order: &Order, store_name: &str) -> String {
    let mut msg = String::new();

    // Infallible: fmt::Write on String never errors
    let _ = write!(msg, "🛍️ *NOVO PEDIDO - {store_name}*\n\n");

    msg.push_str("👤 *DADOS DO CLIENTE:*\n");
    let _ = writeln!(msg, "Nome: {}", order.customer.name);
    let _ = writeln!(msg, "CPF: {}", order.customer.cpf);
    let _ = writeln!(msg, "Telefone: {}", order.customer.phone);
    if order.customer.has_email() {
        let _ = writeln!(msg, "Email: {}", order.customer.email);
    }

    msg.push_str("\n📍 *ENDEREÇO DE ENTREGA:*\n");
    let _ = write!(msg, "{}, {}", order.address.street, order.address.number);
    if order.address.has_complement() {
        let _ = write!(msg, " - {}", order.address.complement);
    }
    let _ = writeln!(msg);
    let _ = writeln!(
        msg,
        "{} - {}/{}",
        order.address.neighborhood, order.address.city, order.address.state
    );
    let _ = writeln!(msg, "CEP: {}", order.address.cep);

    msg.push_str("\n🛒 *PRODUTOS:*\n");
    for item in &order.items {
        let _ = writeln!(msg, "• {}", item.name);
        let _ = writeln!(msg, "  Qtd: {} | Valor: {}", item.quantity, item.line_total());
    }

    msg.push_str("\n💰 *VALORES:*\n");
    let _ = writeln!(msg, "Subtotal: {}", order.pricing.subtotal);
    if order.pricing.free_shipping() {
        msg.push_str("Frete: GRÁTIS\n");
    } else {
        let _ = writeln!(msg, "Frete: {}", order.pricing.shipping);
    }
    if order.pricing.discounted() {
        // An applied discount implies a selected method
        if let Some(method) = order.payment.method {
            let _ = writeln!(
                msg,
                "Desconto {} ({}%): -{}",
                method.display_name(),
                percent_label(order.pricing.discount_bps),
                order.pricing.discount
            );
        }
    }
    let _ = writeln!(msg, "*TOTAL: {}*", order.pricing.final_total);

    msg.push_str("\n💳 *FORMA DE PAGAMENTO:*\n");
    if let Some(method) = order.payment.method {
        msg.push_str(method.display_name());
    }
    if let Some(change) = order.payment.change_for() {
        let _ = write!(msg, " (Troco para R$ {change})");
    }

    let observations = order.observations.trim();
    if !observations.is_empty() {
        let _ = write!(msg, "\n\n📝 *OBSERVAÇÕES:*\n{observations}");
    }

    msg.push_str("\n\n✅ Pedido confirmado pelo site. Aguardando confirmação para entrega.");

    msg
}

// =============================================================================
// Unit Tests
// =============================================================================
