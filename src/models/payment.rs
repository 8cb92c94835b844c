use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::BookingStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: Option<f64>,
    pub method: Option<String>,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<NaiveDateTime>,
    // Only populated when payments are looked up by customer email.
    pub booking_id: Option<String>,
    pub booking_status: Option<BookingStatus>,
    pub tour_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "PENDING" => PaymentStatus::Pending,
            "SUCCESS" => PaymentStatus::Success,
            "FAILED" => PaymentStatus::Failed,
            "REFUNDED" => PaymentStatus::Refunded,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PaymentStatus::Pending => "Chờ thanh toán",
            PaymentStatus::Success => "Thành công",
            PaymentStatus::Failed => "Thất bại",
            PaymentStatus::Refunded => "Đã hoàn tiền",
            PaymentStatus::Other(code) => code,
        }
    }
}
