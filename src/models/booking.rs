use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A booking joined with the tour snapshot, the owning user and the
/// promotion it was placed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub booking_date: Option<NaiveDateTime>,
    pub num_adults: i64,
    pub num_children: Option<i64>,
    pub total_price: Option<f64>,
    pub status: BookingStatus,
    pub special_request: Option<String>,
    pub tour_title: String,
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub customer_name: Option<String>,
    pub promotion_code: Option<String>,
    pub promotion_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Other(String),
}

impl BookingStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "PENDING" => BookingStatus::Pending,
            "CONFIRMED" => BookingStatus::Confirmed,
            "CANCELLED" => BookingStatus::Cancelled,
            "COMPLETED" => BookingStatus::Completed,
            other => BookingStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BookingStatus::Pending => "Chờ xác nhận",
            BookingStatus::Confirmed => "Đã xác nhận",
            BookingStatus::Cancelled => "Đã hủy",
            BookingStatus::Completed => "Hoàn thành",
            BookingStatus::Other(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(BookingStatus::parse("PENDING"), BookingStatus::Pending);
        assert_eq!(BookingStatus::parse("CONFIRMED"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::parse("CANCELLED"), BookingStatus::Cancelled);
        assert_eq!(BookingStatus::parse("COMPLETED"), BookingStatus::Completed);
        assert_eq!(BookingStatus::parse("confirmed").label(), "confirmed");
    }

    #[test]
    fn test_unknown_code_kept_raw() {
        let status = BookingStatus::parse("REFUND_REQUESTED");
        assert_eq!(status, BookingStatus::Other("REFUND_REQUESTED".to_string()));
        assert_eq!(status.label(), "REFUND_REQUESTED");
    }
}
