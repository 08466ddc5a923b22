//! Payment details and the simulated payment gateway.
//!
//! There is no real processor behind checkout: [`SimulatedPayment`] waits a
//! fixed settle delay and then approves or declines.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use faucet_store_core::{OrderId, Price};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{BackendError, PaymentGateway};

/// Card details entered on the checkout form.
#[derive(Clone)]
pub struct PaymentDetails {
    pub card_number: SecretString,
    pub expiry: String,
    pub cvv: SecretString,
    pub card_holder: String,
}

impl PaymentDetails {
    #[must_use]
    pub fn new(card_number: &str, expiry: &str, cvv: &str, card_holder: &str) -> Self {
        Self {
            card_number: SecretString::from(card_number.to_owned()),
            expiry: expiry.trim().to_owned(),
            cvv: SecretString::from(cvv.to_owned()),
            card_holder: card_holder.trim().to_owned(),
        }
    }

    /// Labels of form fields left blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.card_number.expose_secret().trim().is_empty() {
            missing.push("card number");
        }
        if self.expiry.is_empty() {
            missing.push("expiry date");
        }
        if self.cvv.expose_secret().trim().is_empty() {
            missing.push("CVV");
        }
        if self.card_holder.is_empty() {
            missing.push("name on card");
        }
        missing
    }

    /// Last four digits of the card number, for logs and receipts.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits
            .iter()
            .skip(digits.len().saturating_sub(4))
            .collect()
    }
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &format_args!("****{}", self.last_four()))
            .field("expiry", &self.expiry)
            .field("cvv", &"[REDACTED]")
            .field("card_holder", &self.card_holder)
            .finish()
    }
}

/// Settlement result reported by a gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    Declined(String),
}

/// Gateway that settles after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedPayment {
    settle: Duration,
    approve: bool,
}

impl SimulatedPayment {
    /// A gateway that approves every payment after `settle`.
    #[must_use]
    pub const fn approving(settle: Duration) -> Self {
        Self {
            settle,
            approve: true,
        }
    }

    /// A gateway that declines every payment after `settle`.
    #[must_use]
    pub const fn declining(settle: Duration) -> Self {
        Self {
            settle,
            approve: false,
        }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPayment {
    #[instrument(skip(self, details), fields(card = %details.last_four()))]
    async fn confirm(
        &self,
        order: &OrderId,
        amount: Price,
        details: &PaymentDetails,
    ) -> Result<PaymentOutcome, BackendError> {
        tokio::time::sleep(self.settle).await;
        if self.approve {
            tracing::debug!(%order, %amount, "simulated payment approved");
            Ok(PaymentOutcome::Approved)
        } else {
            tracing::debug!(%order, %amount, "simulated payment declined");
            Ok(PaymentOutcome::Declined("card declined".to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let details = PaymentDetails::new("", "12/29", " ", "Ada");
        assert_eq!(details.missing_fields(), vec!["card number", "CVV"]);
        assert!(
            PaymentDetails::new("4242 4242 4242 4242", "12/29", "123", "Ada")
                .missing_fields()
                .is_empty()
        );
    }

    #[test]
    fn test_debug_masks_card() {
        let details = PaymentDetails::new("4242 4242 4242 1234", "12/29", "123", "Ada");
        let debug = format!("{details:?}");
        assert!(debug.contains("****1234"));
        assert!(!debug.contains("4242"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_after_delay() {
        let gateway = SimulatedPayment::approving(Duration::from_millis(1500));
        let details = PaymentDetails::new("4242424242424242", "12/29", "123", "Ada");
        let started = tokio::time::Instant::now();
        let outcome = gateway
            .confirm(&OrderId::new("o1"), Price::from_minor(100), &details)
            .await;
        assert_eq!(outcome, Ok(PaymentOutcome::Approved));
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_declining_gateway() {
        let gateway = SimulatedPayment::declining(Duration::ZERO);
        let details = PaymentDetails::new("4242424242424242", "12/29", "123", "Ada");
        let outcome = gateway
            .confirm(&OrderId::new("o1"), Price::from_minor(100), &details)
            .await;
        assert!(matches!(outcome, Ok(PaymentOutcome::Declined(_))));
    }
}
