//! Utilitaires date/heure : noms de jours, format canonique des dates,
//! chevauchement de créneaux.

use crate::model::Interval;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

/// Format canonique des dates (libellé de projection et sélecteur `ExactDate`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Noms des jours, dans l'ordre ISO (lundi en premier).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Nom de jour -> `Weekday`, insensible à la casse.
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    let raw = raw.trim();
    WEEKDAY_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(raw))
        .map(|idx| WEEKDAYS[idx])
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
}

pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}

/// `HH:MM`, ou `HH:MM:SS` quand les secondes ne sont pas nulles.
pub fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S").or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
}

/// Chevauchement sur des intervalles semi-ouverts `[start, end)` :
/// deux créneaux qui se touchent ne sont pas en conflit.
pub fn intervals_conflict(a: &Interval, b: &Interval) -> bool {
    a.start < b.end && b.start < a.end
}

/// Itère les dates de `start` à `end` inclus ; vide si `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let first = (start <= end).then_some(start);
    std::iter::successors(first, move |current| {
        current.succ_opt().filter(|next| *next <= end)
    })
}
