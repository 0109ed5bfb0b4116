//! # Checkout Validator
//!
//! Pure validation of the three checkout input groups (customer,
//! address, payment) plus the terms-acceptance flag.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Input masks and max-length (via the normalizer formats)           │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust, pure)                                     │
//! │  ├── Every rule evaluated independently per field                      │
//! │  ├── ALL failures collected into one ValidationErrors record           │
//! │  └── Recomputed on every submission attempt, never cached              │
//! │                                                                         │
//! │  There is no Layer 3: orders are never persisted, the human            │
//! │  fulfilling the WhatsApp order is the last line of defense.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field-level failures are data, not `Err`: the record maps each
//! failing field to a human-readable message, and the form is
//! submittable iff the record is empty.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::{digits, DigitFormat};
use crate::types::{CustomerInfo, DeliveryAddress, PaymentMethod, PaymentSelection};

// =============================================================================
// Fields
// =============================================================================

/// The closed set of validated form fields.
///
/// `ValidationErrors` keys are drawn from this enum, which is what
/// guarantees the invariant that error keys are always recognized field
/// names. Serialized names match the frontend's input ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Cpf,
    Phone,
    Cep,
    Street,
    Number,
    Neighborhood,
    PaymentMethod,
    ChangeAmount,
    Terms,
}

impl Field {
    /// The serialized field name, as the frontend sees it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Cpf => "cpf",
            Field::Phone => "phone",
            Field::Cep => "cep",
            Field::Street => "street",
            Field::Number => "number",
            Field::Neighborhood => "neighborhood",
            Field::PaymentMethod => "paymentMethod",
            Field::ChangeAmount => "changeAmount",
            Field::Terms => "terms",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Record of per-field validation failures.
///
/// Absence of a key means the field is valid; an empty record means the
/// whole form is valid. Ordered by field so serialization and display
/// are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags a field with a message. A second flag on the same field
    /// replaces the first.
    pub fn flag(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Unflags a field. Used when the user edits a field: its stale
    /// message disappears until the next submission re-checks it.
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    /// True when no field is flagged.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of flagged fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when the given field is flagged.
    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// The message for a flagged field, if any.
    pub fn message(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Iterates flagged fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid fields: ")?;
        for (i, field) in self.errors.keys().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Delivery Area
// =============================================================================

/// The region this storefront delivers to.
///
/// Delivery outside the area is a hard business rule rejected at
/// validation time, not at fulfillment time. The prefix set encodes the
/// metropolitan region: Rio de Janeiro CEPs start with 20-23.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryArea {
    /// Fixed city for this deployment.
    pub city: String,
    /// Fixed state for this deployment.
    pub state: String,
    /// Allowed 2-digit CEP prefixes.
    pub cep_prefixes: Vec<String>,
}

impl Default for DeliveryArea {
    fn default() -> Self {
        DeliveryArea {
            city: "Rio de Janeiro".to_string(),
            state: "RJ".to_string(),
            cep_prefixes: ["20", "21", "22", "23"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl DeliveryArea {
    /// Checks a CEP against the area: exactly 8 digits after stripping
    /// formatting AND an allowed 2-digit prefix.
    pub fn accepts_cep(&self, cep: &str) -> bool {
        let clean = digits(cep);
        clean.len() == DigitFormat::Cep.digit_count()
            && self.cep_prefixes.iter().any(|p| clean.starts_with(p.as_str()))
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates the whole checkout form.
///
/// Every rule is evaluated independently; all failures are collected,
/// never short-circuited. Callers must re-run this on each submission
/// attempt since field values may have changed.
pub fn validate_checkout(
    customer: &CustomerInfo,
    address: &DeliveryAddress,
    payment: &PaymentSelection,
    terms_accepted: bool,
    area: &DeliveryArea,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    // Customer
    if customer.name.trim().is_empty() {
        errors.flag(Field::Name, "Nome é obrigatório");
    }
    if digits(&customer.cpf).len() != DigitFormat::Cpf.digit_count() {
        errors.flag(Field::Cpf, "CPF inválido");
    }
    if digits(&customer.phone).len() != DigitFormat::Phone.digit_count() {
        errors.flag(Field::Phone, "Telefone inválido");
    }

    // Address
    if !area.accepts_cep(&address.cep) {
        errors.flag(Field::Cep, "CEP inválido ou fora da área de entrega");
    }
    if address.street.trim().is_empty() {
        errors.flag(Field::Street, "Rua é obrigatória");
    }
    if address.number.trim().is_empty() {
        errors.flag(Field::Number, "Número é obrigatório");
    }
    if address.neighborhood.trim().is_empty() {
        errors.flag(Field::Neighborhood, "Bairro é obrigatório");
    }
    // complement is always optional

    // Payment
    match payment.method {
        None => errors.flag(Field::PaymentMethod, "Selecione uma forma de pagamento"),
        Some(PaymentMethod::Cash) => {
            if payment.needs_change && payment.change_amount.trim().is_empty() {
                errors.flag(Field::ChangeAmount, "Informe o valor para troco");
            }
        }
        Some(_) => {}
    }

    // Terms
    if !terms_accepted {
        errors.flag(Field::Terms, "Você deve aceitar os termos");
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================
