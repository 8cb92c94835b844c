//! Rule-based intent detection.
//!
//! Rules are evaluated top to bottom and the first one that fires decides
//! the intent. Several signals can co-occur in one message (an email next
//! to a booking id, a phone number next to a city name), so the order of
//! [`RULES`] is part of the contract.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::models::{Classification, Intent, IntentParams};
use crate::text::{contains_word, fold};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid email regex"));

/// Vietnamese mobile prefix followed by eight digits.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:0[35789])+[0-9]{8}\b").expect("valid mobile regex"));

static TEN_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{10}\b").expect("valid ten digit regex"));

/// Digit groups joined by a space, dash or dot, e.g. `090-123-4567`.
static GROUPED_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9]{2,4}(?:[ .\-][0-9]{2,4})+\b").expect("valid grouped digits regex")
});

static MOBILE_EXACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[35789][0-9]{8}$").expect("valid exact mobile regex"));

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}")
        .expect("valid uuid regex")
});

const PAYMENT_KEYWORDS: &[&str] = &["thanh toán", "payment", "tiền", "hóa đơn"];

const TOUR_KEYWORDS: &[&str] = &["tour", "du lịch", "chuyến đi", "điểm đến"];

/// Known destinations. Earlier entries win when several appear.
pub const GAZETTEER: &[&str] = &[
    "đà nẵng",
    "hà nội",
    "hồ chí minh",
    "sài gòn",
    "phú quốc",
    "nha trang",
    "đà lạt",
    "huế",
    "hội an",
    "sapa",
    "hạ long",
    "quy nhơn",
    "phan thiết",
];

static FOLDED_GAZETTEER: LazyLock<Vec<(String, &'static str)>> =
    LazyLock::new(|| GAZETTEER.iter().map(|name| (fold(name), *name)).collect());

/// The utterance in the forms the rules match against.
struct Utterance<'a> {
    raw: &'a str,
    /// NFC + lowercase, for keyword lists.
    lower: String,
    /// Lowercase without diacritics, for the gazetteer.
    folded: String,
}

impl<'a> Utterance<'a> {
    fn new(raw: &'a str) -> Self {
        let lower = raw.nfc().collect::<String>().to_lowercase();
        let folded = fold(&lower);
        Self { raw, lower, folded }
    }

    fn mentions_payment(&self) -> bool {
        contains_any(&self.lower, PAYMENT_KEYWORDS)
    }
}

type Rule = fn(&Utterance) -> Option<Classification>;

const RULES: &[(&str, Rule)] = &[
    ("email", email_rule),
    ("phone", phone_rule),
    ("booking_id", booking_id_rule),
    ("destination", destination_rule),
    ("tour_keyword", tour_keyword_rule),
];

/// Map a message to exactly one intent. Never fails; falls back to
/// [`Intent::General`].
pub fn classify(message: &str) -> Classification {
    let utterance = Utterance::new(message);

    RULES
        .iter()
        .find_map(|(name, rule)| {
            let matched = rule(&utterance)?;
            tracing::debug!(rule = *name, intent = matched.intent.as_str(), "intent rule matched");
            Some(matched)
        })
        .unwrap_or_else(|| Classification::bare(Intent::General))
}

fn email_rule(u: &Utterance) -> Option<Classification> {
    let email = EMAIL_RE.find(u.raw)?.as_str().to_string();
    let intent = if u.mentions_payment() {
        Intent::PaymentLookupByEmail
    } else {
        Intent::BookingLookupByEmail
    };

    Some(Classification {
        intent,
        params: IntentParams {
            email: Some(email),
            ..IntentParams::default()
        },
    })
}

fn phone_rule(u: &Utterance) -> Option<Classification> {
    let phone = find_phone(u.raw)?;

    Some(Classification {
        intent: Intent::BookingLookupByPhone,
        params: IntentParams {
            phone: Some(phone),
            ..IntentParams::default()
        },
    })
}

/// Prefixed mobile number, then any bare ten-digit run, then separator
/// grouped digits that compact to a prefixed mobile number. Returns digits
/// only.
fn find_phone(text: &str) -> Option<String> {
    if let Some(m) = MOBILE_RE.find(text).or_else(|| TEN_DIGITS_RE.find(text)) {
        return Some(m.as_str().to_string());
    }

    GROUPED_DIGITS_RE
        .find_iter(text)
        .find_map(|m| mobile_in_groups(m.as_str()))
}

/// A grouped match can swallow neighbouring numbers (`"12 090-123-4567"`),
/// so every contiguous run of its groups is tried, leftmost first.
fn mobile_in_groups(grouped: &str) -> Option<String> {
    let groups: Vec<&str> = grouped
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();

    (0..groups.len()).find_map(|start| {
        let mut digits = String::new();
        for group in &groups[start..] {
            digits.push_str(group);
            if digits.len() >= 10 {
                break;
            }
        }
        MOBILE_EXACT_RE.is_match(&digits).then_some(digits)
    })
}

fn booking_id_rule(u: &Utterance) -> Option<Classification> {
    let booking_id = UUID_RE.find(u.raw)?.as_str().to_string();
    let intent = if u.mentions_payment() {
        Intent::PaymentStatus
    } else {
        Intent::BookingLookup
    };

    Some(Classification {
        intent,
        params: IntentParams {
            booking_id: Some(booking_id),
            ..IntentParams::default()
        },
    })
}

fn destination_rule(u: &Utterance) -> Option<Classification> {
    let (_, name) = FOLDED_GAZETTEER
        .iter()
        .find(|(folded, _)| contains_word(&u.folded, folded))?;

    Some(Classification {
        intent: Intent::TourSearch,
        params: IntentParams {
            destination: Some(name.to_string()),
            ..IntentParams::default()
        },
    })
}

fn tour_keyword_rule(u: &Utterance) -> Option<Classification> {
    contains_any(&u.lower, TOUR_KEYWORDS).then(|| Classification::bare(Intent::TourList))
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
