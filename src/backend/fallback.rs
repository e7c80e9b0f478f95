//! Deterministic rule-based extraction, English and Spanish.
//!
//! The fallback parser is the layer of last resort: always enabled, never
//! fails, same input always produces the same output (relative dates are
//! resolved against the invocation instant). It only needs to handle a
//! bounded set of date/time/type phrasings, not arbitrary language.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use regex::Regex;

use super::{BackendError, ExtractionBackend};
use crate::intent::RawIntent;
use crate::segment;

/// Truncation limit for generated titles.
const TITLE_MAX_LEN: usize = 50;

static REMINDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"remind(?:er)?|alert|notify|recordar|alertar|avisar|recordatorio")
        .expect("reminder keyword pattern")
});

static EVENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"meet(?:ing)?|call|discuss|talk|conversation|reuni[óo]n|llamada|charla|hablar|discutir")
        .expect("event keyword pattern")
});

static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // English 12h/24h: "14:30", "2:30 pm"
        r"(\d{1,2}):(\d{2})(?:\s*(am|pm))?",
        // Spanish 12h with periods: "2:30 p.m."
        r"(\d{1,2}):(\d{2})(?:\s*(a\.?m\.?|p\.?m\.?))?",
        // Spanish time of day: "2:30 de la tarde"
        r"(\d{1,2}):(\d{2})(?:\s*(?:de la\s+)?(mañana|tarde|noche))?",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("time pattern"))
    .collect()
});

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("iso date pattern"));

static SLASH_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").expect("slash date pattern"));

static RELATIVE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"today|tomorrow|next\s+\w+|hoy|mañana|proximo\s+\w+|próximo\s+\w+")
        .expect("relative date pattern")
});

static TEXTUAL_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+(?:de\s+)?([a-záéíóú]+)").expect("textual date pattern")
});

/// Weekday name to offset from Monday, English and Spanish.
fn weekday_number(name: &str) -> Option<u32> {
    let n = match name {
        "monday" | "lunes" => 0,
        "tuesday" | "martes" => 1,
        "wednesday" | "miércoles" | "miercoles" => 2,
        "thursday" | "jueves" => 3,
        "friday" | "viernes" => 4,
        "saturday" | "sábado" | "sabado" => 5,
        "sunday" | "domingo" => 6,
        _ => return None,
    };
    Some(n)
}

/// Month name (or common abbreviation) to month number, English and Spanish.
fn month_number(name: &str) -> Option<u32> {
    let n = match name {
        "jan" | "january" | "ene" | "enero" => 1,
        "feb" | "february" | "febrero" => 2,
        "mar" | "march" | "marzo" => 3,
        "apr" | "april" | "abr" | "abril" => 4,
        "may" | "mayo" => 5,
        "jun" | "june" | "junio" => 6,
        "jul" | "july" | "julio" => 7,
        "aug" | "august" | "ago" | "agosto" => 8,
        "sep" | "september" | "septiembre" => 9,
        "oct" | "october" | "octubre" => 10,
        "nov" | "november" | "noviembre" => 11,
        "dec" | "december" | "dic" | "diciembre" => 12,
        _ => return None,
    };
    Some(n)
}

/// Rule-based extraction backend. Always enabled, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackParser;

impl FallbackParser {
    pub fn new() -> Self {
        FallbackParser
    }

    /// Produces a best-effort raw intent for one phrase.
    pub fn parse(&self, text: &str) -> RawIntent {
        self.parse_at(text, Local::now().date_naive())
    }

    /// Same as [`parse`](Self::parse) with an explicit "today", so tests
    /// can pin relative-date resolution.
    pub fn parse_at(&self, text: &str, today: NaiveDate) -> RawIntent {
        let title = if text.chars().count() > TITLE_MAX_LEN {
            let truncated: String = text.chars().take(TITLE_MAX_LEN).collect();
            format!("{truncated}...")
        } else {
            text.to_string()
        };

        let raw = RawIntent {
            task_type: infer_kind(text).to_string(),
            title,
            description: text.to_string(),
            date: Some(extract_date(text, today)),
            time: extract_time(text),
            invitees: None,
        };
        debug!("rule-based extraction for '{text}': {raw:?}");
        raw
    }
}

/// Kind inference, checked in priority order: a sentence can contain both
/// ("remind me to call"), and the most specific intent wins.
fn infer_kind(text: &str) -> &'static str {
    let text = text.to_lowercase();
    if REMINDER_RE.is_match(&text) {
        "reminder"
    } else if EVENT_RE.is_match(&text) {
        "event"
    } else {
        "task"
    }
}

fn is_valid_time(hour: u32, minute: u32) -> bool {
    hour <= 23 && minute <= 59
}

/// Extracts a 24-hour `HH:MM` time.
///
/// Each pattern is tried in order; an out-of-range match is rejected and
/// scanning continues with the next pattern. The plain `HH:MM` core is
/// shared, so among valid matches the one covering the longest span wins.
/// That keeps "2:30 de la tarde" from being read as a bare "02:30".
fn extract_time(text: &str) -> Option<String> {
    let text = text.to_lowercase();
    let mut best: Option<(usize, String)> = None;

    for pattern in TIME_PATTERNS.iter() {
        let Some(caps) = pattern.captures(&text) else {
            continue;
        };
        let (Ok(mut hour), Ok(minute)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) else {
            continue;
        };

        if let Some(meridian) = caps.get(3) {
            let meridian = meridian.as_str().replace('.', "");
            match meridian.as_str() {
                "pm" | "tarde" | "noche" if hour < 12 => hour += 12,
                "am" | "mañana" if hour == 12 => hour = 0,
                _ => {}
            }
        }

        if !is_valid_time(hour, minute) {
            continue;
        }

        let span = caps.get(0).map_or(0, |m| m.len());
        if best.as_ref().is_none_or(|(len, _)| span > *len) {
            best = Some((span, format!("{hour:02}:{minute:02}")));
        }
    }

    best.map(|(_, time)| time)
}

fn parse_iso_date(matched: &str, _today: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(matched, "%Y-%m-%d").ok()
}

/// Slash dates try month/day/year first, then day/month/year; the first
/// that is a valid calendar date wins.
fn parse_slash_date(matched: &str, _today: NaiveDate) -> Option<NaiveDate> {
    ["%m/%d/%Y", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(matched, fmt).ok())
}

/// Relative keywords: today/hoy, tomorrow/mañana, "next <weekday>" and
/// "próximo <día>". A weekday offset of zero or less means next week, so
/// "next monday" said on a Monday is seven days out, never today.
fn parse_relative_date(matched: &str, today: NaiveDate) -> Option<NaiveDate> {
    match matched {
        "today" | "hoy" => return Some(today),
        "tomorrow" | "mañana" => return today.succ_opt(),
        _ => {}
    }

    if matched.starts_with("next ")
        || matched.starts_with("proximo ")
        || matched.starts_with("próximo ")
    {
        let day_name = matched.split_whitespace().nth(1)?;
        let target = weekday_number(day_name)?;
        let current = today.weekday().num_days_from_monday();
        let mut days_ahead = target as i64 - current as i64;
        if days_ahead <= 0 {
            days_ahead += 7;
        }
        return today.checked_add_days(chrono::Days::new(days_ahead as u64));
    }
    None
}

/// Day plus month name ("15th January", "15 de enero") against the current
/// year, rolled forward a year if the date has already passed.
fn parse_textual_date(matched: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = TEXTUAL_DATE_RE.captures(matched)?;
    let day = caps[1].parse::<u32>().ok()?;
    let month = month_number(&caps[2])?;

    let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if date < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(date)
    }
}

/// Date extraction in strict order: ISO, slash, relative keyword, textual
/// month name. Defaults to today when nothing matches.
fn extract_date(text: &str, today: NaiveDate) -> String {
    let text = text.to_lowercase();
    let parsers: [(&Regex, fn(&str, NaiveDate) -> Option<NaiveDate>); 4] = [
        (&ISO_DATE_RE, parse_iso_date),
        (&SLASH_DATE_RE, parse_slash_date),
        (&RELATIVE_DATE_RE, parse_relative_date),
        (&TEXTUAL_DATE_RE, parse_textual_date),
    ];

    for (pattern, parser) in parsers {
        if let Some(m) = pattern.find(&text) {
            if let Some(date) = parser(m.as_str(), today) {
                return date.format("%Y-%m-%d").to_string();
            }
        }
    }

    today.format("%Y-%m-%d").to_string()
}

#[async_trait]
impl ExtractionBackend for FallbackParser {
    fn name(&self) -> &str {
        "RuleBased"
    }

    fn enabled(&self) -> bool {
        true
    }

    async fn check_connection(&self) -> bool {
        true
    }

    async fn extract(&self, text: &str) -> Result<RawIntent, BackendError> {
        Ok(self.parse(text))
    }

    async fn split_text(&self, text: &str) -> Result<Vec<String>, BackendError> {
        Ok(segment::segment(text))
    }
}
