//! Spoken and typed birthdate parsing
//!
//! Turns free text such as "12 januára 1990", "dvadsiateho prvého mája 2001"
//! or "12.1.1990" into an ISO `YYYY-MM-DD` date. The spoken scan runs first,
//! then the typed fallbacks (ISO, delimited, digit runs). Text that cannot be
//! turned into a real calendar date is returned cleaned but unparsed, so the
//! birthdate validator decides whether it is acceptable.

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use super::clean_word;

/// Earliest accepted birth year
const MIN_YEAR: i32 = 1900;

/// Two-digit years above this belong to the 1900s, the rest to the 2000s
const CENTURY_PIVOT: i32 = 30;

/// Ordinal adjective endings stripped before looking up a day word, longest first
const ORDINAL_SUFFIXES: &[&str] = &["teho", "eho", "ho", "te", "e", "a", "u", "y", "o"];

/// Characters that can never be part of a date
static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^0-9./\s\-A-Za-zÁÄČĎÉÍĹĽŇÓÔŔŠŤÚÝŽáäčďéíĺľňóôŕšťúýž]").unwrap()
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static DATE_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[./\s\-]+").unwrap());

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());

/// Month names in nominative and genitive, folded to ASCII
const MONTH_WORDS: &[(&str, u32)] = &[
    ("januar", 1),
    ("januara", 1),
    ("januari", 1),
    ("februar", 2),
    ("februara", 2),
    ("marec", 3),
    ("marca", 3),
    ("april", 4),
    ("aprila", 4),
    ("maj", 5),
    ("maja", 5),
    ("jun", 6),
    ("juna", 6),
    ("jul", 7),
    ("jula", 7),
    ("august", 8),
    ("augusta", 8),
    ("september", 9),
    ("septembra", 9),
    ("oktober", 10),
    ("oktobra", 10),
    ("november", 11),
    ("novembra", 11),
    ("december", 12),
    ("decembra", 12),
];

/// Day words (ordinal stems and a few cardinals) with their value
const DAY_WORDS: &[(&str, u32)] = &[
    ("prv", 1),
    ("prve", 1),
    ("prvy", 1),
    ("jeden", 1),
    ("jedn", 1),
    ("druh", 2),
    ("druhe", 2),
    ("druhy", 2),
    ("dva", 2),
    ("tret", 3),
    ("tretie", 3),
    ("tri", 3),
    ("stvrt", 4),
    ("stvrte", 4),
    ("stvrty", 4),
    ("styri", 4),
    ("pat", 5),
    ("piat", 5),
    ("sest", 6),
    ("siest", 6),
    ("sieste", 6),
    ("sedem", 7),
    ("siedm", 7),
    ("siedme", 7),
    ("osem", 8),
    ("osm", 8),
    ("osme", 8),
    ("devat", 9),
    ("deviat", 9),
    ("deviate", 9),
    ("desat", 10),
    ("desiat", 10),
    ("desiate", 10),
    ("desiaty", 10),
    ("jedenast", 11),
    ("jedenaste", 11),
    ("dvanast", 12),
    ("dvanaste", 12),
    ("trinast", 13),
    ("trinaste", 13),
    ("strnast", 14),
    ("strnaste", 14),
    ("styrnast", 14),
    ("styrnaste", 14),
    ("patnast", 15),
    ("patnaste", 15),
    ("sestnast", 16),
    ("sestnaste", 16),
    ("sedemnast", 17),
    ("sedemnaste", 17),
    ("osemnast", 18),
    ("osemnaste", 18),
    ("devatnast", 19),
    ("devatnaste", 19),
    ("dvadsiate", 20),
    ("dvadsiaty", 20),
    ("tridsiate", 30),
];

/// Tens stems that may be followed by a unit word ("dvadsiat" + "prvy" = 21)
const DAY_TENS: &[(&str, u32)] = &[("dvadsiat", 20), ("tridsiat", 30)];

fn lookup(table: &[(&str, u32)], word: &str) -> Option<u32> {
    table
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, value)| *value)
}

/// Parse a spoken or typed date, accepting years up to the current one.
///
/// Returns an ISO date when the input describes a real calendar date, the
/// cleaned input otherwise, and an empty string when nothing is left.
pub fn parse_spoken_date(text: &str) -> String {
    parse_spoken_date_until(text, Local::now().year())
}

/// Same as [`parse_spoken_date`] with an explicit latest accepted year.
pub fn parse_spoken_date_until(text: &str, max_year: i32) -> String {
    let cleaned = clean_input(text);
    if cleaned.is_empty() {
        return cleaned;
    }

    if let Some(iso) = resolve_spoken(&cleaned, max_year) {
        return iso;
    }

    if let Some(caps) = ISO_DATE.captures(&cleaned) {
        if let Some(iso) = build_from_parts(&caps[3], &caps[2], &caps[1], max_year) {
            return iso;
        }
    }

    let parts: Vec<&str> = DATE_DELIMITERS
        .split(&cleaned)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() >= 3 {
        if let Some(iso) = build_from_parts(parts[0], parts[1], parts[2], max_year) {
            return iso;
        }
    }

    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
    if matches!(digits.len(), 6 | 8) {
        if let Some(iso) = build_from_parts(&digits[..2], &digits[2..4], &digits[4..], max_year) {
            return iso;
        }
    }

    cleaned
}

/// Replace anything that cannot be part of a date with spaces and collapse whitespace
fn clean_input(text: &str) -> String {
    let replaced = DISALLOWED_CHARS.replace_all(text, " ");
    WHITESPACE_RUN.replace_all(&replaced, " ").trim().to_string()
}

/// Scan tokens left to right for a day, a month word and a four-digit year
fn resolve_spoken(cleaned: &str, max_year: i32) -> Option<String> {
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    let mut day: Option<u32> = None;
    let mut month: Option<u32> = None;
    let mut year: Option<i32> = None;

    let mut i = 0;
    while i < tokens.len() {
        let raw = tokens[i];
        let numeric: String = raw.chars().filter(char::is_ascii_digit).collect();

        if year.is_none() && numeric.len() == 4 {
            year = numeric.parse().ok();
            i += 1;
            continue;
        }

        if day.is_none() && (1..=2).contains(&numeric.len()) {
            if let Some(value) = numeric.parse::<u32>().ok().filter(|d| (1..=31).contains(d)) {
                day = Some(value);
                i += 1;
                continue;
            }
        }

        if month.is_none() {
            if let Some(value) = lookup(MONTH_WORDS, &clean_word(raw)) {
                month = Some(value);
                i += 1;
                continue;
            }
        }

        if day.is_none() {
            if let Some((value, consumed)) = parse_day_words(&tokens[i..]) {
                day = Some(value);
                i += consumed;
                continue;
            }
        }

        i += 1;
    }

    build_iso_date(day?, month?, year?, max_year)
}

/// Parse a day spelled out in words at the start of `tokens`.
///
/// Returns the day value and how many tokens it used.
fn parse_day_words(tokens: &[&str]) -> Option<(u32, usize)> {
    let value = day_word_value(tokens.first()?)?;

    if value >= 20 && value % 10 == 0 {
        let unit = tokens
            .get(1)
            .and_then(|next| day_word_value(next))
            .filter(|unit| *unit < 10);
        if let Some(unit) = unit {
            return Some((value + unit, 2));
        }
    }

    Some((value, 1))
}

/// Look up a single day word, trying the bare word before each suffix strip
fn day_word_value(token: &str) -> Option<u32> {
    let word = clean_word(token);

    std::iter::once(word.as_str())
        .chain(
            ORDINAL_SUFFIXES
                .iter()
                .filter_map(|suffix| word.strip_suffix(suffix)),
        )
        .filter(|stem| !stem.is_empty())
        .find_map(|stem| lookup(DAY_WORDS, stem).or_else(|| lookup(DAY_TENS, stem)))
}

/// Build a date from textual day, month and year parts (two-digit years expanded)
fn build_from_parts(day: &str, month: &str, year: &str, max_year: i32) -> Option<String> {
    let day: u32 = day.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let mut year_value: i32 = year.parse().ok()?;
    if year.len() == 2 {
        year_value += if year_value > CENTURY_PIVOT { 1900 } else { 2000 };
    }
    build_iso_date(day, month, year_value, max_year)
}

/// Validate the combination against the calendar and format it as ISO
fn build_iso_date(day: u32, month: u32, year: i32, max_year: i32) -> Option<String> {
    if !(MIN_YEAR..=max_year).contains(&year) {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}
