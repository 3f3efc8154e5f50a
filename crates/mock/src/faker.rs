//! Realistic-looking fake values
//!
//! Every generator takes the random source explicitly so a run seeded with
//! the same value produces the same output.

use chrono::{NaiveDate, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "alpha", "amber", "anchor", "aurora", "basil", "beacon", "birch", "breeze", "canyon",
    "cedar", "cobalt", "comet", "coral", "delta", "ember", "falcon", "fern", "glacier",
    "harbor", "hazel", "indigo", "island", "jasper", "lagoon", "lantern", "maple", "meadow",
    "nebula", "oasis", "orbit", "pebble", "prairie", "quartz", "raven", "ridge", "saffron",
    "sierra", "summit", "thistle", "timber", "tundra", "velvet", "willow", "zephyr",
];

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Amara", "Boris", "Carmen", "Chen", "Dmitri", "Elena", "Farah", "Grace",
    "Hiro", "Ines", "Jonas", "Keiko", "Liam", "Maya", "Nadia", "Omar", "Priya", "Quinn",
    "Rosa", "Sven", "Tariq", "Uma", "Viktor", "Wen", "Yara", "Zane",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hughes",
    "Ivanova", "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Patel",
    "Quintero", "Rossi", "Schmidt", "Tanaka", "Umarov", "Vasquez", "Walker", "Yilmaz",
];

const CITIES: &[&str] = &[
    "Amsterdam", "Austin", "Barcelona", "Berlin", "Bogota", "Cairo", "Denver", "Dublin",
    "Helsinki", "Kyoto", "Lagos", "Lisbon", "Lyon", "Melbourne", "Montreal", "Nairobi",
    "Oslo", "Porto", "Seoul", "Toronto", "Valencia", "Vienna",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Australia", "Brazil", "Canada", "Chile", "Denmark", "Egypt", "Finland",
    "France", "Germany", "India", "Ireland", "Japan", "Kenya", "Mexico", "Netherlands",
    "New Zealand", "Nigeria", "Norway", "Portugal", "South Korea", "Spain", "Sweden",
];

const STREET_SUFFIXES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Boulevard", "Way"];

const DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const TLDS: &[&str] = &["com", "io", "net", "org", "dev"];

/// Allowed values for `status`-named fields
pub const STATUSES: &[&str] = &["active", "inactive", "pending"];

/// What a string field's name says about its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Time,
    Uuid,
    Email,
    FirstName,
    LastName,
    FullName,
    City,
    Country,
    Phone,
    Postal,
    Address,
    Status,
    Description,
    Title,
    Url,
    Word,
}

/// Classify a field by case-insensitive substring match on its name.
/// Rules are checked in priority order; the first match wins.
pub fn classify_field(field_name: &str) -> FieldKind {
    let field = field_name.to_lowercase();
    let has = |needle: &str| field.contains(needle);

    if has("date") {
        FieldKind::Date
    } else if has("time") {
        FieldKind::Time
    } else if has("uuid") || has("id") {
        FieldKind::Uuid
    } else if has("email") {
        FieldKind::Email
    } else if has("name") && has("first") {
        FieldKind::FirstName
    } else if has("name") && has("last") {
        FieldKind::LastName
    } else if has("name") {
        FieldKind::FullName
    } else if has("city") {
        FieldKind::City
    } else if has("country") {
        FieldKind::Country
    } else if has("phone") {
        FieldKind::Phone
    } else if has("postal") || has("zip") {
        FieldKind::Postal
    } else if has("address") {
        FieldKind::Address
    } else if has("status") {
        FieldKind::Status
    } else if has("description") {
        FieldKind::Description
    } else if has("title") {
        FieldKind::Title
    } else if has("url") || has("link") {
        FieldKind::Url
    } else {
        FieldKind::Word
    }
}

/// Fake string value for a field, chosen by its name
pub fn fake_string<R: Rng + ?Sized>(field_name: &str, rng: &mut R) -> String {
    match classify_field(field_name) {
        FieldKind::Date => date(rng),
        FieldKind::Time => time(rng),
        FieldKind::Uuid => uuid(rng),
        FieldKind::Email => email(rng),
        FieldKind::FirstName => pick(FIRST_NAMES, rng).to_string(),
        FieldKind::LastName => pick(LAST_NAMES, rng).to_string(),
        FieldKind::FullName => full_name(rng),
        FieldKind::City => pick(CITIES, rng).to_string(),
        FieldKind::Country => pick(COUNTRIES, rng).to_string(),
        FieldKind::Phone => phone(rng),
        FieldKind::Postal => format!("{:05}", rng.gen_range(0..100_000)),
        FieldKind::Address => address(rng),
        FieldKind::Status => pick(STATUSES, rng).to_string(),
        FieldKind::Description => sentence(rng, 5),
        FieldKind::Title => sentence(rng, 3),
        FieldKind::Url => url(rng),
        FieldKind::Word => word(rng),
    }
}

fn pick<R: Rng + ?Sized>(choices: &'static [&'static str], rng: &mut R) -> &'static str {
    choices.choose(rng).copied().unwrap_or_default()
}

/// A single generic word
pub fn word<R: Rng + ?Sized>(rng: &mut R) -> String {
    pick(WORDS, rng).to_string()
}

/// Capitalized sentence of `words` words ending in a period
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let mut text = (0..words)
        .map(|_| pick(WORDS, rng))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = text.get(..1) {
        let upper = first.to_uppercase();
        text.replace_range(..1, &upper);
    }
    text.push('.');
    text
}

/// Integer in `[1, 1000]`
pub fn number<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(1..=1000)
}

/// `ERR_` followed by three digits
pub fn error_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("ERR_{:03}", rng.gen_range(0..1000))
}

/// Random version 4 UUID drawn from `rng`
pub fn uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.gen())
        .into_uuid()
        .to_string()
}

/// `YYYY-MM-DD`
pub fn date<R: Rng + ?Sized>(rng: &mut R) -> String {
    let year = rng.gen_range(1970..=2030);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    NaiveDate::from_ymd_opt(year, month, day)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| format!("{year:04}-{month:02}-{day:02}"))
}

/// `HH:MM:SS`
pub fn time<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (h, m, s) = (rng.gen_range(0..24), rng.gen_range(0..60), rng.gen_range(0..60));
    NaiveTime::from_hms_opt(h, m, s)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{h:02}:{m:02}:{s:02}"))
}

pub fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng))
}

pub fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}.{}@{}",
        pick(FIRST_NAMES, rng).to_lowercase(),
        pick(LAST_NAMES, rng).to_lowercase(),
        pick(DOMAINS, rng)
    )
}

pub fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}{:02}{:07}",
        rng.gen_range(2..10),
        rng.gen_range(0..100),
        rng.gen_range(0..10_000_000)
    )
}

pub fn address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut street = pick(WORDS, rng).to_string();
    if let Some(first) = street.get(..1) {
        let upper = first.to_uppercase();
        street.replace_range(..1, &upper);
    }
    format!(
        "{} {} {}, {}",
        rng.gen_range(1..10_000),
        street,
        pick(STREET_SUFFIXES, rng),
        pick(CITIES, rng)
    )
}

pub fn url<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "https://www.{}{}.{}/{}",
        pick(WORDS, rng),
        pick(WORDS, rng),
        pick(TLDS, rng),
        pick(WORDS, rng)
    )
}
