//! Deterministic text renderings of store records, injected into the
//! model prompt as context.
//!
//! Every formatter is pure: the same record always renders to the same
//! bytes.

pub mod bookings;
pub mod payments;
pub mod tours;

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};

pub use bookings::{format_booking, format_booking_list, format_booking_not_found};
pub use payments::{format_payment_history, format_payments_by_email};
pub use tours::{format_tour_list, format_tour_search};

/// Shown in place of a missing price. A missing price is never rendered as zero.
pub const CONTACT_PLACEHOLDER: &str = "Liên hệ";
pub const NOT_AVAILABLE: &str = "N/A";
pub const ELLIPSIS: &str = "...";
pub const CURRENCY: &str = "₫";

// Character budgets for free text. These bound prompt size.
pub const DESCRIPTION_BUDGET: usize = 500;
pub const ITINERARY_BUDGET: usize = 500;
pub const SPECIAL_REQUEST_BUDGET: usize = 200;

const SHORT_ID_LEN: usize = 8;

// ── Values ──

/// `2500000.0` → `"2.500.000₫"`. Rounded to whole units.
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}{CURRENCY}", group_thousands(v.round() as i64)),
        _ => CONTACT_PLACEHOLDER.to_string(),
    }
}

/// A listed tour price. Catalog prices are never legitimately zero, so a
/// non-positive price means "ask us" just like a missing one.
pub fn format_price(value: Option<f64>) -> String {
    format_money(value.filter(|v| *v > 0.0))
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Cut `text` to `budget` characters, appending [`ELLIPSIS`] only when
/// something was cut.
pub fn truncate(text: &str, budget: usize) -> Cow<'_, str> {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// First eight characters of an identifier followed by [`ELLIPSIS`].
pub fn short_id(id: &str) -> String {
    truncate(id, SHORT_ID_LEN).into_owned()
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_datetime(dt: Option<NaiveDateTime>) -> String {
    dt.map(|d| d.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `"10/03/2027 - 13/03/2027"`, or `None` when neither end is known.
pub fn format_schedule(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<String> {
    if start.is_none() && end.is_none() {
        return None;
    }
    Some(format!("{} - {}", format_date(start), format_date(end)))
}

pub fn format_guests(adults: i64, children: Option<i64>) -> String {
    format!("{adults} người lớn, {} trẻ em", children.unwrap_or(0))
}

// ── Label tables ──

pub fn region_label(code: &str) -> &str {
    match code {
        "NORTH" => "Miền Bắc",
        "CENTRAL" => "Miền Trung",
        "SOUTH" => "Miền Nam",
        other => other,
    }
}

pub fn category_label(code: &str) -> &str {
    match code {
        "BEACH" => "Biển đảo",
        "MOUNTAIN" => "Núi rừng",
        "CULTURE" => "Văn hóa - Lịch sử",
        "ADVENTURE" => "Khám phá - Mạo hiểm",
        "FAMILY" => "Gia đình",
        "RELAX" => "Nghỉ dưỡng",
        other => other,
    }
}

// ── Layout ──

/// A `Label: value` field. Fields with no value are dropped on render.
pub(crate) fn field(label: &str, value: impl Into<Option<String>>) -> Option<String> {
    value.into().map(|v| format!("{label}: {v}"))
}

/// One record in a list: a marker, a heading line, then indented rows of
/// `|`-separated fields.
pub(crate) struct Item {
    marker: &'static str,
    heading: String,
    rows: Vec<String>,
}

impl Item {
    pub(crate) fn new(marker: &'static str, heading: String) -> Self {
        Self {
            marker,
            heading,
            rows: vec![],
        }
    }

    pub(crate) fn row<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let fields: Vec<String> = fields.into_iter().flatten().collect();
        if !fields.is_empty() {
            self.rows.push(fields.join(" | "));
        }
        self
    }

    fn render(&self) -> String {
        let mut out = format!("{} {}", self.marker, self.heading);
        for row in &self.rows {
            out.push_str("\n   ");
            out.push_str(row);
        }
        out
    }
}

pub(crate) fn render_list(header: &str, items: &[Item]) -> String {
    let mut out = header.to_string();
    for item in items {
        out.push('\n');
        out.push_str(&item.render());
    }
    out
}

/// One field per line, for a single record.
pub(crate) fn render_fields<I>(fields: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    fields.into_iter().flatten().collect::<Vec<_>>().join("\n")
}
