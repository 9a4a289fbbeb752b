//! Synthetic payment authorization
//!
//! `authorize` stands in for a real payment gateway; the rest of checkout
//! only depends on its decision, so a gateway integration replaces this
//! one function.

use serde::Deserialize;

/// Payment attempt details submitted at checkout
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentAttempt {
    pub card_number: String,
    pub name: String,
    pub cvv: String,
    pub expiry: String,
}

/// Gateway decision for a payment attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentDecision {
    Approved,
    Declined { reason: String },
}

/// Decide a payment attempt. Demo rule: a card number ending in the digit
/// `0` is declined, any other ending is approved.
pub fn authorize(attempt: &PaymentAttempt) -> PaymentDecision {
    if attempt.card_number.trim().ends_with('0') {
        PaymentDecision::Declined {
            reason: "payment declined, please try again".to_string(),
        }
    } else {
        PaymentDecision::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(card_number: &str) -> PaymentAttempt {
        PaymentAttempt {
            card_number: card_number.to_string(),
            name: "Ada Lovelace".to_string(),
            cvv: "123".to_string(),
            expiry: "12/30".to_string(),
        }
    }

    #[test]
    fn card_ending_in_zero_is_declined() {
        assert!(matches!(
            authorize(&attempt("4111111111111110")),
            PaymentDecision::Declined { .. }
        ));
        // Trailing whitespace does not change the decision.
        assert!(matches!(
            authorize(&attempt("4111111111111110  ")),
            PaymentDecision::Declined { .. }
        ));
    }

    #[test]
    fn other_endings_are_approved() {
        for digit in 1..=9 {
            let card = format!("411111111111111{digit}");
            assert_eq!(authorize(&attempt(&card)), PaymentDecision::Approved);
        }
    }
}
