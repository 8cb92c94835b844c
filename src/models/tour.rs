use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tour {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub itinerary: Option<String>,
    pub destination: Option<String>,
    pub region: Option<String>,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub price_adult: Option<f64>,
    pub price_child: Option<f64>,
    pub capacity: i64,
    /// Seats still open for booking.
    pub availability: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub avg_rating: Option<f64>,
    pub review_count: i64,
}
