use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TourList,
    TourSearch,
    BookingLookup,
    BookingLookupByEmail,
    BookingLookupByPhone,
    PaymentStatus,
    PaymentLookupByEmail,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TourList => "tour_list",
            Intent::TourSearch => "tour_search",
            Intent::BookingLookup => "booking_lookup",
            Intent::BookingLookupByEmail => "booking_lookup_by_email",
            Intent::BookingLookupByPhone => "booking_lookup_by_phone",
            Intent::PaymentStatus => "payment_status",
            Intent::PaymentLookupByEmail => "payment_lookup_by_email",
            Intent::General => "general",
        }
    }
}

/// Parameters pulled out of the utterance. Which fields are set depends on
/// the intent; `tour_list` and `general` carry none.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntentParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl IntentParams {
    pub fn is_empty(&self) -> bool {
        self == &IntentParams::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    pub params: IntentParams,
}

impl Classification {
    pub fn bare(intent: Intent) -> Self {
        Self {
            intent,
            params: IntentParams::default(),
        }
    }
}
