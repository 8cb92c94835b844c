//! Intent → store lookups → context block.

use anyhow::Context;

use crate::db::{TourFilter, TravelStore};
use crate::models::{Classification, Intent};
use crate::services::formatters;

/// Number of upcoming tours shown for a generic tour question.
pub const TOUR_LIST_LIMIT: usize = 5;

/// The lookups one intent needs. Built from a classification; an intent
/// whose required parameter is missing has no plan.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan {
    TourList { limit: usize },
    TourSearch { destination: String, filter: TourFilter },
    Booking { booking_id: String },
    BookingsByEmail { email: String },
    BookingsByPhone { phone: String },
    PaymentsByEmail { email: String },
    /// Booking details followed by its payment history.
    BookingWithPayments { booking_id: String },
}

impl FetchPlan {
    pub fn for_classification(classification: &Classification) -> Option<Self> {
        let params = &classification.params;

        match classification.intent {
            Intent::TourList => Some(FetchPlan::TourList {
                limit: TOUR_LIST_LIMIT,
            }),
            Intent::TourSearch => params.destination.clone().map(|destination| {
                FetchPlan::TourSearch {
                    filter: TourFilter::destination(destination.as_str()),
                    destination,
                }
            }),
            Intent::BookingLookup => params
                .booking_id
                .clone()
                .map(|booking_id| FetchPlan::Booking { booking_id }),
            Intent::BookingLookupByEmail => params
                .email
                .clone()
                .map(|email| FetchPlan::BookingsByEmail { email }),
            Intent::BookingLookupByPhone => params
                .phone
                .clone()
                .map(|phone| FetchPlan::BookingsByPhone { phone }),
            Intent::PaymentLookupByEmail => params
                .email
                .clone()
                .map(|email| FetchPlan::PaymentsByEmail { email }),
            Intent::PaymentStatus => params
                .booking_id
                .clone()
                .map(|booking_id| FetchPlan::BookingWithPayments { booking_id }),
            Intent::General => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Tours,
    Booking,
    Payment,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Tours => "[DỮ LIỆU TOUR TỪ HỆ THỐNG]",
            Section::Booking => "[THÔNG TIN BOOKING]",
            Section::Payment => "[TRẠNG THÁI THANH TOÁN]",
        }
    }
}

/// Run `plan` against the store and render the result. Sections are
/// label-prefixed and separated by a blank line.
pub fn assemble(store: &dyn TravelStore, plan: &FetchPlan) -> anyhow::Result<String> {
    let sections = match plan {
        FetchPlan::TourList { limit } => {
            let tours = store
                .active_tours(*limit)
                .context("failed to list active tours")?;
            vec![(Section::Tours, formatters::format_tour_list(&tours))]
        }
        FetchPlan::TourSearch {
            destination,
            filter,
        } => {
            let tours = store
                .search_tours(filter)
                .context("failed to search tours")?;
            vec![(
                Section::Tours,
                formatters::format_tour_search(destination, &tours),
            )]
        }
        FetchPlan::Booking { booking_id } => {
            vec![(Section::Booking, booking_section(store, booking_id)?)]
        }
        FetchPlan::BookingsByEmail { email } => {
            let bookings = store
                .bookings_by_email(email)
                .context("failed to fetch bookings by email")?;
            vec![(Section::Booking, formatters::format_booking_list(&bookings))]
        }
        FetchPlan::BookingsByPhone { phone } => {
            let bookings = store
                .bookings_by_phone(phone)
                .context("failed to fetch bookings by phone")?;
            vec![(Section::Booking, formatters::format_booking_list(&bookings))]
        }
        FetchPlan::PaymentsByEmail { email } => {
            let payments = store
                .payments_by_email(email)
                .context("failed to fetch payments by email")?;
            vec![(
                Section::Payment,
                formatters::format_payments_by_email(&payments),
            )]
        }
        FetchPlan::BookingWithPayments { booking_id } => {
            let booking = booking_section(store, booking_id)?;
            let payments = store
                .payments_for_booking(booking_id)
                .context("failed to fetch payment history")?;
            vec![
                (Section::Booking, booking),
                (
                    Section::Payment,
                    formatters::format_payment_history(&payments),
                ),
            ]
        }
    };

    Ok(sections
        .iter()
        .map(|(section, body)| format!("{}\n{body}", section.label()))
        .collect::<Vec<_>>()
        .join("\n\n"))
}

fn booking_section(store: &dyn TravelStore, booking_id: &str) -> anyhow::Result<String> {
    let booking = store
        .booking_by_id(booking_id)
        .context("failed to fetch booking")?;
    Ok(match booking {
        Some(booking) => formatters::format_booking(&booking),
        None => formatters::format_booking_not_found(booking_id),
    })
}

/// Context block for a classified message, or `None` when the intent has
/// nothing to look up.
pub fn build_context(
    store: &dyn TravelStore,
    classification: &Classification,
) -> anyhow::Result<Option<String>> {
    let Some(plan) = FetchPlan::for_classification(classification) else {
        return Ok(None);
    };
    assemble(store, &plan).map(Some)
}
