use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw order row from CSV ingestion. Timestamp columns stay as text here;
/// the cleaning step coerces them into typed values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCsv {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String,
    pub order_purchase_timestamp: String,
    pub order_approved_at: Option<String>,
    pub order_delivered_carrier_date: Option<String>,
    pub order_delivered_customer_date: Option<String>,
    pub order_estimated_delivery_date: String,
}

/// Raw customer row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCsv {
    pub customer_id: String,
    pub customer_unique_id: String,
    pub customer_zip_code_prefix: String,
    pub customer_city: String,
    pub customer_state: String,
}

/// Raw order line item row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCsv {
    pub order_id: String,
    pub order_item_id: i32,
    pub product_id: String,
    pub seller_id: String,
    pub shipping_limit_date: String,
    pub price: f64,
    pub freight_value: f64,
}

/// Raw product row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCsv {
    pub product_id: String,
    pub product_category_name: Option<String>,
    pub product_weight_g: Option<f64>,
    pub product_length_cm: Option<f64>,
    pub product_height_cm: Option<f64>,
    pub product_width_cm: Option<f64>,
}

/// Raw seller row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerCsv {
    pub seller_id: String,
    pub seller_zip_code_prefix: String,
    pub seller_city: String,
    pub seller_state: String,
}

/// Raw payment row. One order may have several rows (installments,
/// split payments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCsv {
    pub order_id: String,
    pub payment_sequential: i32,
    pub payment_type: String,
    pub payment_installments: i32,
    pub payment_value: f64,
}

/// Raw review row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCsv {
    pub review_id: String,
    pub order_id: String,
    pub review_score: i32,
    pub review_creation_date: String,
    pub review_answer_timestamp: Option<String>,
}

/// Payment method enum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum PaymentType {
    CreditCard,
    DebitCard,
    Boleto,
    Voucher,
    NotDefined,
    Other(String),
}

impl From<&str> for PaymentType {
    fn from(s: &str) -> Self {
        match s {
            "credit_card" => PaymentType::CreditCard,
            "debit_card" => PaymentType::DebitCard,
            "boleto" => PaymentType::Boleto,
            "voucher" => PaymentType::Voucher,
            "not_defined" => PaymentType::NotDefined,
            other => PaymentType::Other(other.to_string()),
        }
    }
}

impl PaymentType {
    pub fn as_str(&self) -> &str {
        match self {
            PaymentType::CreditCard => "credit_card",
            PaymentType::DebitCard => "debit_card",
            PaymentType::Boleto => "boleto",
            PaymentType::Voucher => "voucher",
            PaymentType::NotDefined => "not_defined",
            PaymentType::Other(s) => s,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery outcome for one order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DeliveryStatus {
    OnTime,
    Late(i64),
    Pending,
}

/// Cleaned order record with typed timestamps and derived delivery metrics.
///
/// The two metric fields start out empty and are filled in by the metrics
/// step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub status: String,
    pub purchased_at: Option<NaiveDateTime>,
    pub delivered_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
    pub delivery_time_days: Option<i64>,
    pub late_delivery_days: i64,
}

impl Order {
    /// Classify the delivery outcome. An order with no delivered timestamp
    /// is `Pending`; the numeric late metric alone cannot tell it apart
    /// from an on-time delivery.
    pub fn delivery_status(&self) -> DeliveryStatus {
        match self.delivered_at {
            None => DeliveryStatus::Pending,
            Some(_) if self.late_delivery_days > 0 => {
                DeliveryStatus::Late(self.late_delivery_days)
            }
            Some(_) => DeliveryStatus::OnTime,
        }
    }
}

/// Cleaned payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub order_id: String,
    pub sequential: i32,
    pub payment_type: PaymentType,
    pub installments: i32,
    pub value: f64,
}

impl PaymentCsv {
    pub fn to_payment(&self) -> Payment {
        Payment {
            order_id: self.order_id.clone(),
            sequential: self.payment_sequential,
            payment_type: PaymentType::from(self.payment_type.as_str()),
            installments: self.payment_installments,
            value: self.payment_value,
        }
    }
}
