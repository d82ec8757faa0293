//! Order checkout state machine.
//!
//! Valid transitions:
//! `Idle -> Submitting -> Succeeded`
//! `Idle -> Submitting -> Failed -> Submitting -> ...`
//!
//! The original flow had no failure path at all; here a rejected submission
//! moves to `Failed` and the form can be resubmitted. While `Submitting`,
//! the session rejects cart edits and a second submission.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::OrderId;

/// Errors from checkout transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// An order submission is already in flight.
    #[error("an order submission is already in flight")]
    AlreadySubmitting,

    /// The cart has no line items to order.
    #[error("cannot submit an order for an empty cart")]
    EmptyCart,

    /// A completion was signalled with no submission in flight.
    #[error("no order submission in flight")]
    NotSubmitting,
}

/// Delivery details captured from the order form.
///
/// Field names match the order form's input names (`tel`, not `phone`), so
/// the struct both deserializes the submitted form and form-encodes onto the
/// wire unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub name: String,
    pub email: String,
    #[serde(rename = "tel")]
    pub phone: String,
    pub address: String,
}

impl Default for DeliveryDetails {
    /// Placeholder prefill shown in a freshly opened order form.
    fn default() -> Self {
        Self {
            name: "Santa Claus".to_owned(),
            email: "john@gmail.com".to_owned(),
            phone: "+1234567".to_owned(),
            address: "North, Lapland, Snow Home".to_owned(),
        }
    }
}

/// Where an order submission currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// No submission attempted yet (or the previous one finished).
    #[default]
    Idle,
    /// Details serialized and sent; awaiting completion.
    Submitting { details: DeliveryDetails },
    /// The order endpoint accepted the submission.
    Succeeded { order: OrderId },
    /// The order endpoint rejected the submission; the form is re-armed.
    Failed { reason: String },
}

/// The checkout state machine.
#[derive(Debug, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    /// Start in `Idle`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// True while a submission is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.state, CheckoutState::Submitting { .. })
    }

    /// Move to `Submitting` with the serialized form details.
    ///
    /// # Errors
    ///
    /// `AlreadySubmitting` if a submission is already in flight.
    pub fn begin(&mut self, details: DeliveryDetails) -> Result<(), CheckoutError> {
        if self.is_busy() {
            return Err(CheckoutError::AlreadySubmitting);
        }
        self.state = CheckoutState::Submitting { details };
        Ok(())
    }

    /// Record a successful submission.
    ///
    /// # Errors
    ///
    /// `NotSubmitting` if no submission is in flight.
    pub fn succeed(&mut self, order: OrderId) -> Result<(), CheckoutError> {
        if !self.is_busy() {
            return Err(CheckoutError::NotSubmitting);
        }
        self.state = CheckoutState::Succeeded { order };
        Ok(())
    }

    /// Record a rejected submission; a new `begin` is allowed afterwards.
    ///
    /// # Errors
    ///
    /// `NotSubmitting` if no submission is in flight.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), CheckoutError> {
        if !self.is_busy() {
            return Err(CheckoutError::NotSubmitting);
        }
        self.state = CheckoutState::Failed {
            reason: reason.into(),
        };
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut checkout = Checkout::new();
        assert_eq!(checkout.state(), &CheckoutState::Idle);
        assert!(!checkout.is_busy());

        checkout.begin(DeliveryDetails::default()).unwrap();
        assert!(checkout.is_busy());

        let order = OrderId::generate();
        checkout.succeed(order.clone()).unwrap();
        assert_eq!(checkout.state(), &CheckoutState::Succeeded { order });
        assert!(!checkout.is_busy());
    }

    #[test]
    fn test_double_begin_is_rejected() {
        let mut checkout = Checkout::new();
        checkout.begin(DeliveryDetails::default()).unwrap();

        let err = checkout.begin(DeliveryDetails::default()).unwrap_err();
        assert_eq!(err, CheckoutError::AlreadySubmitting);
        assert!(checkout.is_busy());
    }

    #[test]
    fn test_failure_rearms_the_form() {
        let mut checkout = Checkout::new();
        checkout.begin(DeliveryDetails::default()).unwrap();
        checkout.fail("order endpoint returned 500").unwrap();

        assert!(matches!(checkout.state(), CheckoutState::Failed { .. }));
        // A new submission is allowed after a failure
        checkout.begin(DeliveryDetails::default()).unwrap();
        assert!(checkout.is_busy());
    }

    #[test]
    fn test_completion_without_submission_is_rejected() {
        let mut checkout = Checkout::new();
        assert_eq!(
            checkout.succeed(OrderId::generate()).unwrap_err(),
            CheckoutError::NotSubmitting
        );
        assert_eq!(
            checkout.fail("nope").unwrap_err(),
            CheckoutError::NotSubmitting
        );
    }

    #[test]
    fn test_delivery_details_form_field_names() {
        let details = DeliveryDetails::default();
        let encoded = serde_json::to_value(&details).unwrap();
        // The wire format uses the form's input names
        assert!(encoded.get("tel").is_some());
        assert!(encoded.get("phone").is_none());
    }
}
