//! Spanish date and time labels used by scanner screens and chart axes

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

const MONTHS_LONG: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Format `"HH:MM"` (or `"HH:MM:SS"`) as a 12-hour clock label.
///
/// `"14:30"` becomes `"2:30 p.m."`. Empty input gives an empty label and
/// anything unparseable is returned unchanged.
pub fn format_time(time: &str) -> String {
    let trimmed = time.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"));

    match parsed {
        Ok(parsed) => {
            let (is_pm, hour) = parsed.hour12();
            let suffix = if is_pm { "p.m." } else { "a.m." };
            format!("{}:{:02} {}", hour, parsed.minute(), suffix)
        }
        Err(_) => time.to_string(),
    }
}

/// Format an ISO date (`YYYY-MM-DD`, optionally followed by a time) as a
/// long Spanish date: `"5 de marzo de 2024"`.
pub fn format_date(date: &str) -> String {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match parse_leading_date(trimmed) {
        Some(parsed) => format!(
            "{} de {} de {}",
            parsed.day(),
            MONTHS_LONG[parsed.month0() as usize],
            parsed.year()
        ),
        None => date.to_string(),
    }
}

/// Short day/month axis label: `"5 mar"`
pub fn short_day_month(date: NaiveDate) -> String {
    format!("{} {}", date.day(), MONTHS_SHORT[date.month0() as usize])
}

/// Human label for a location code, or the code itself when unmapped
pub fn location_label(location: &str, labels: &HashMap<String, String>) -> String {
    labels
        .get(location)
        .cloned()
        .unwrap_or_else(|| location.to_string())
}

fn parse_leading_date(text: &str) -> Option<NaiveDate> {
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
