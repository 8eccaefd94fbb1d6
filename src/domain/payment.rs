use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One installment received against a membership. Never edited once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub amount_cents: i64,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    pub screenshot_ref: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(membership_id: Uuid, details: PaymentDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            membership_id,
            amount_cents: details.amount_cents,
            payment_date: details.payment_date,
            method: details.method,
            screenshot_ref: details.screenshot_ref,
            notes: details.notes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    Cheque,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Cheque => "Cheque",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Cash" => Some(PaymentMethod::Cash),
            "Card" => Some(PaymentMethod::Card),
            "UPI" => Some(PaymentMethod::Upi),
            "Bank Transfer" => Some(PaymentMethod::BankTransfer),
            "Cheque" => Some(PaymentMethod::Cheque),
            "Other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

/// The money side of a payment, shared by standalone payments and the
/// initial payment that comes with a purchase or renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub payment_date: NaiveDate,
    pub screenshot_ref: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordPaymentRequest {
    pub membership_id: Uuid,
    #[serde(flatten)]
    pub details: PaymentDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_names() {
        for method in [
            PaymentMethod::Cash,
            PaymentMethod::Card,
            PaymentMethod::Upi,
            PaymentMethod::BankTransfer,
            PaymentMethod::Cheque,
            PaymentMethod::Other,
        ] {
            assert_eq!(PaymentMethod::from_str(method.as_str()), Some(method));
            assert_eq!(
                serde_json::to_value(method).unwrap(),
                serde_json::Value::String(method.as_str().to_string())
            );
        }
        assert_eq!(PaymentMethod::from_str("Bitcoin"), None);
    }
}
