use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, Payment, PaymentStatus, Tour};

/// Upper bound on rows returned by a tour search, to keep prompts small.
pub const SEARCH_LIMIT: usize = 5;
/// Upper bound on rows returned by email/phone history lookups.
pub const HISTORY_LIMIT: usize = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ── Query Builder ──

/// Accumulates `AND` predicates over a base `SELECT`. Values are always
/// bound, never spliced into the SQL text.
struct QueryBuilder {
    sql: String,
    params: Vec<Box<dyn ToSql>>,
}

impl QueryBuilder {
    fn new(base: &str) -> Self {
        Self {
            sql: base.to_string(),
            params: vec![],
        }
    }

    /// `predicate` must contain exactly one `?` placeholder.
    fn and<T: ToSql + 'static>(&mut self, predicate: &str, value: T) -> &mut Self {
        self.sql.push_str(" AND ");
        self.sql.push_str(predicate);
        self.params.push(Box::new(value));
        self
    }

    fn and_opt<T: ToSql + 'static>(&mut self, predicate: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.and(predicate, value);
        }
        self
    }

    fn order_and_limit(&mut self, order_by: &str, limit: usize) -> &mut Self {
        self.sql.push_str(" ORDER BY ");
        self.sql.push_str(order_by);
        self.sql.push_str(" LIMIT ?");
        self.params.push(Box::new(limit as i64));
        self
    }

    fn query_tours(&self, conn: &Connection) -> anyhow::Result<Vec<Tour>> {
        let mut stmt = conn.prepare(&self.sql)?;
        let params_refs: Vec<&dyn ToSql> = self.params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_tour_row(row)))?;

        let mut tours = vec![];
        for row in rows {
            tours.push(row??);
        }
        Ok(tours)
    }
}

/// Escape `LIKE` wildcards so user text only ever matches literally.
fn like_contains(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

// ── Tours ──

const TOUR_SELECT: &str = "SELECT t.tour_id, t.title, t.description, t.itinerary, t.destination, t.region, \
     t.category, t.duration, t.price_adult, t.price_child, t.capacity, t.availability, \
     t.start_date, t.end_date, r.avg_rating, COALESCE(r.review_count, 0) \
     FROM tours t \
     LEFT JOIN (SELECT tour_id, AVG(rating) AS avg_rating, COUNT(*) AS review_count \
                FROM reviews GROUP BY tour_id) r ON r.tour_id = t.tour_id \
     WHERE t.is_active = 1";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourFilter {
    pub destination: Option<String>,
    pub region: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub start_from: Option<NaiveDate>,
    pub start_until: Option<NaiveDate>,
    /// Minimum number of open seats.
    pub party_size: Option<i64>,
    /// Clamped to [`SEARCH_LIMIT`].
    pub limit: Option<usize>,
}

impl TourFilter {
    pub fn destination(destination: impl Into<String>) -> Self {
        Self {
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(SEARCH_LIMIT).min(SEARCH_LIMIT)
    }
}

pub fn list_active_tours(conn: &Connection, limit: usize) -> anyhow::Result<Vec<Tour>> {
    let mut query = QueryBuilder::new(TOUR_SELECT);
    query.order_and_limit("t.start_date ASC, t.tour_id ASC", limit);
    query.query_tours(conn)
}

pub fn search_tours(conn: &Connection, filter: &TourFilter) -> anyhow::Result<Vec<Tour>> {
    let mut query = QueryBuilder::new(TOUR_SELECT);
    query
        .and_opt(
            "fold(t.destination) LIKE ? ESCAPE '\\'",
            filter
                .destination
                .as_deref()
                .map(|d| like_contains(&crate::text::fold(d))),
        )
        .and_opt("fold(t.region) = fold(?)", filter.region.clone())
        .and_opt("fold(t.category) = fold(?)", filter.category.clone())
        .and_opt("t.price_adult >= ?", filter.min_price)
        .and_opt("t.price_adult <= ?", filter.max_price)
        .and_opt("r.avg_rating >= ?", filter.min_rating)
        .and_opt(
            "t.start_date >= ?",
            filter.start_from.map(|d| d.format(DATE_FORMAT).to_string()),
        )
        .and_opt(
            "t.start_date <= ?",
            filter.start_until.map(|d| d.format(DATE_FORMAT).to_string()),
        )
        .and_opt("COALESCE(t.availability, t.capacity) >= ?", filter.party_size)
        .order_and_limit("t.start_date ASC, t.tour_id ASC", filter.effective_limit());

    query.query_tours(conn)
}

fn parse_tour_row(row: &rusqlite::Row) -> anyhow::Result<Tour> {
    let start_date: Option<String> = row.get(12)?;
    let end_date: Option<String> = row.get(13)?;

    Ok(Tour {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        itinerary: row.get(3)?,
        destination: row.get(4)?,
        region: row.get(5)?,
        category: row.get(6)?,
        duration: row.get(7)?,
        price_adult: row.get(8)?,
        price_child: row.get(9)?,
        capacity: row.get(10)?,
        availability: row.get(11)?,
        start_date: start_date.as_deref().and_then(parse_date),
        end_date: end_date.as_deref().and_then(parse_date),
        avg_rating: row.get(14)?,
        review_count: row.get(15)?,
    })
}

// ── Bookings ──

const BOOKING_SELECT: &str = "SELECT b.booking_id, b.booking_date, b.num_adults, b.num_children, \
     b.total_price, b.status, b.special_request, \
     t.title, t.destination, t.start_date, t.end_date, \
     u.full_name, \
     p.code, p.description \
     FROM bookings b \
     JOIN tours t ON b.tour_id = t.tour_id \
     JOIN users u ON b.user_id = u.user_id \
     LEFT JOIN promotions p ON b.promotion_id = p.promotion_id";

/// Canonical lowercase hyphenated form of a booking id, or `None` when the
/// text is not a UUID.
pub fn normalize_booking_id(raw: &str) -> Option<String> {
    uuid::Uuid::parse_str(raw.trim())
        .ok()
        .map(|id| id.hyphenated().to_string())
}

pub fn get_booking_by_id(conn: &Connection, booking_id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("{BOOKING_SELECT} WHERE lower(b.booking_id) = ?1"),
        params![booking_id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_bookings_by_email(
    conn: &Connection,
    email: &str,
    limit: usize,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "{BOOKING_SELECT} WHERE lower(u.email) = lower(?1) ORDER BY b.booking_date DESC LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![email.trim(), limit as i64], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

/// Digits of `phone` reduced to the last nine, which is what stored numbers
/// are matched on. `None` when there is nothing to match.
pub fn phone_match_key(phone: &str) -> Option<String> {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let start = digits.len().saturating_sub(9);
    Some(digits[start..].iter().collect())
}

pub fn get_bookings_by_phone(
    conn: &Connection,
    phone: &str,
    limit: usize,
) -> anyhow::Result<Vec<Booking>> {
    let Some(key) = phone_match_key(phone) else {
        return Ok(vec![]);
    };

    let mut stmt = conn.prepare(&format!(
        "{BOOKING_SELECT} \
         WHERE REPLACE(REPLACE(REPLACE(u.phone, ' ', ''), '-', ''), '.', '') LIKE ?1 ESCAPE '\\' \
         ORDER BY b.booking_date DESC LIMIT ?2"
    ))?;

    let rows = stmt.query_map(params![like_contains(&key), limit as i64], |row| {
        Ok(parse_booking_row(row))
    })?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let booking_date: Option<String> = row.get(1)?;
    let status_str: String = row.get(5)?;
    let start_date: Option<String> = row.get(9)?;
    let end_date: Option<String> = row.get(10)?;

    Ok(Booking {
        id: row.get(0)?,
        booking_date: booking_date.as_deref().and_then(parse_datetime),
        num_adults: row.get(2)?,
        num_children: row.get(3)?,
        total_price: row.get(4)?,
        status: BookingStatus::parse(&status_str),
        special_request: row.get(6)?,
        tour_title: row.get(7)?,
        destination: row.get(8)?,
        start_date: start_date.as_deref().and_then(parse_date),
        end_date: end_date.as_deref().and_then(parse_date),
        customer_name: row.get(11)?,
        promotion_code: row.get(12)?,
        promotion_description: row.get(13)?,
    })
}

// ── Payments ──

pub fn get_payments_for_booking(
    conn: &Connection,
    booking_id: &str,
) -> anyhow::Result<Vec<Payment>> {
    let mut stmt = conn.prepare(
        "SELECT payment_id, amount, payment_method, payment_date, status, transaction_id
         FROM payments WHERE lower(booking_id) = ?1 ORDER BY payment_date DESC",
    )?;

    let rows = stmt.query_map(params![booking_id], |row| {
        Ok(parse_payment_row(row, false))
    })?;

    let mut payments = vec![];
    for row in rows {
        payments.push(row??);
    }
    Ok(payments)
}

pub fn get_payments_by_email(
    conn: &Connection,
    email: &str,
    limit: usize,
) -> anyhow::Result<Vec<Payment>> {
    let mut stmt = conn.prepare(
        "SELECT p.payment_id, p.amount, p.payment_method, p.payment_date, p.status, p.transaction_id,
                b.booking_id, b.status, t.title
         FROM payments p
         JOIN bookings b ON p.booking_id = b.booking_id
         JOIN tours t ON b.tour_id = t.tour_id
         JOIN users u ON b.user_id = u.user_id
         WHERE lower(u.email) = lower(?1)
         ORDER BY p.payment_date DESC
         LIMIT ?2",
    )?;

    let rows = stmt.query_map(params![email.trim(), limit as i64], |row| {
        Ok(parse_payment_row(row, true))
    })?;

    let mut payments = vec![];
    for row in rows {
        payments.push(row??);
    }
    Ok(payments)
}

fn parse_payment_row(row: &rusqlite::Row, with_booking: bool) -> anyhow::Result<Payment> {
    let paid_at: Option<String> = row.get(3)?;
    let status_str: String = row.get(4)?;

    let (booking_id, booking_status, tour_title) = if with_booking {
        let booking_status: Option<String> = row.get(7)?;
        (
            row.get(6)?,
            booking_status.as_deref().map(BookingStatus::parse),
            row.get(8)?,
        )
    } else {
        (None, None, None)
    };

    Ok(Payment {
        id: row.get(0)?,
        amount: row.get(1)?,
        method: row.get(2)?,
        status: PaymentStatus::parse(&status_str),
        transaction_id: row.get(5)?,
        paid_at: paid_at.as_deref().and_then(parse_datetime),
        booking_id,
        booking_status,
        tour_title,
    })
}

// ── Helpers ──

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), DATE_FORMAT).ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}
