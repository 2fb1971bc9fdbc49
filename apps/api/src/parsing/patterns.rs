//! Shared regex vocabulary used by more than one extractor: dates, locations,
//! role/tech keywords and the bullet rule.

use std::sync::LazyLock;

use regex::Regex;

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.?";

const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

const STATE_NAMES: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas",
    "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
    "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah",
    "Vermont", "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

const CITIES: &[&str] = &[
    "New York", "San Francisco", "Los Angeles", "Seattle", "Austin", "Boston", "Chicago",
    "Denver", "Atlanta", "Miami", "Portland", "San Diego", "San Jose", "Philadelphia", "Dallas",
    "Houston", "Pittsburgh", "Palo Alto", "Mountain View", "Remote",
];

fn alternation(items: &[&str]) -> String {
    items
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|")
}

fn state_pattern() -> String {
    format!("(?:{}|{})", alternation(STATE_CODES), alternation(STATE_NAMES))
}

fn date_range_pattern() -> String {
    format!(r"\b{MONTH}\s+\d{{4}}\s*[–—-]\s*(?:{MONTH}\s+\d{{4}}|Present|Current|Now)\b")
}

/// `Month YYYY – Month YYYY` (en dash, em dash or hyphen), open-ended with Present/Current/Now.
pub static DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){}", date_range_pattern())).unwrap());

/// A tab immediately followed by a date range, i.e. a `Company<TAB>Dates` header.
pub static TAB_DATE_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\t\s*{}", date_range_pattern())).unwrap());

static YEAR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:19|20)\d{2}\s*[–—-]\s*(?:(?:19|20)\d{2}|Present|Current)\b").unwrap()
});

static SINGLE_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\b{MONTH}\s+\d{{4}}\b")).unwrap());

static CITY_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b[A-Z][a-zA-Z.]+(?: [A-Z][a-zA-Z.]+){{0,2}},\s*{}\b",
        state_pattern()
    ))
    .unwrap()
});

static GAZETTEER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:{})(?:,\s*{})?\b",
        alternation(CITIES),
        state_pattern()
    ))
    .unwrap()
});

static LOCATION_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    let state = state_pattern();
    Regex::new(&format!(
        r"^(?:(?:{cities})(?:,\s*{state})?|[A-Z][a-zA-Z.]+(?: [A-Z][a-zA-Z.]+){{0,2}},\s*{state}|{state})$",
        cities = alternation(CITIES),
    ))
    .unwrap()
});

static CITY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z.]+(?: [A-Z][a-zA-Z.]+){0,2},?$").unwrap());

static STATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", state_pattern())).unwrap());

static ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:engineer|developer|lead|analyst|manager|designer|founder|architect)\b")
        .unwrap()
});

static TECH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:python|java|javascript|typescript|react|node(?:\.js)?|aws|gcp|azure|docker|kubernetes|sql|postgres(?:ql)?|mongodb|golang|rust|graphql|redis|kafka|spark|terraform|django|flask|html|css)\b|c\+\+)",
    )
    .unwrap()
});

static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[•·▪◦‣●○■□➢►✓*–—-]\s*|\d{1,2}[.)]\s+)").unwrap()
});

/// First date in `text`, tried in order: month range, year range.
pub fn find_date_range(text: &str) -> Option<String> {
    [&*DATE_RANGE, &*YEAR_RANGE]
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

/// Like [`find_date_range`] but also accepts a lone `Month YYYY` (e.g. an expected graduation).
pub fn find_any_date(text: &str) -> Option<String> {
    find_date_range(text).or_else(|| {
        SINGLE_MONTH_YEAR
            .find(text)
            .map(|m| m.as_str().trim().to_string())
    })
}

pub fn is_date_range(text: &str) -> bool {
    DATE_RANGE.is_match(text) || YEAR_RANGE.is_match(text)
}

/// First location in `text`: gazetteer city (with optional state) first, then `City, ST`.
pub fn find_location(text: &str) -> Option<String> {
    [&*GAZETTEER, &*CITY_STATE]
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
}

/// Whole-string check: the text is nothing but a location.
pub fn looks_like_location(text: &str) -> bool {
    LOCATION_EXACT.is_match(text.trim())
}

pub fn is_city_line(text: &str) -> bool {
    CITY_LINE.is_match(text.trim())
}

pub fn is_state_line(text: &str) -> bool {
    STATE_LINE.is_match(text.trim())
}

pub fn mentions_role(text: &str) -> bool {
    ROLE.is_match(text)
}

/// Tech/skills text: a comma-separated list or a known technology token.
pub fn looks_like_tech(text: &str) -> bool {
    text.contains(',') || TECH.is_match(text)
}

/// Strips a leading bullet glyph or `1.` / `1)` numbering, if any.
pub fn strip_bullet_prefix(line: &str) -> Option<&str> {
    BULLET_PREFIX
        .find(line)
        .map(|m| line[m.end()..].trim())
}

/// Lines carrying a bullet glyph or numbering, with the marker stripped. When
/// no line qualifies, every non-empty line becomes a bullet.
pub fn bulletize<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: Vec<&str> = lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let marked: Vec<String> = lines
        .iter()
        .filter_map(|l| strip_bullet_prefix(l))
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    if !marked.is_empty() {
        return marked;
    }
    lines.into_iter().map(String::from).collect()
}
