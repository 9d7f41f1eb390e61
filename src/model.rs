use crate::calendar;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Identifiant fort pour AttendanceRule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Erreurs de saisie sur le modèle (créneau, sélecteur de jour).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid interval {start}-{end}: end must be after start")]
    InvalidInterval { start: String, end: String },
    #[error("invalid day selector: {0} (expected `daily`, a weekday name or YYYY-MM-DD)")]
    InvalidDay(String),
    #[error("invalid time: {0} (expected HH:MM or HH:MM:SS)")]
    InvalidTime(String),
    #[error("invalid interval: {0} (expected HH:MM-HH:MM)")]
    InvalidIntervalFormat(String),
}

/// Créneau horaire `[start, end)` sans composante date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    #[serde(with = "time_format")]
    pub start: NaiveTime,
    #[serde(with = "time_format")]
    pub end: NaiveTime,
}

impl Interval {
    /// Crée un créneau en validant que `end > start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ModelError> {
        if end <= start {
            return Err(ModelError::InvalidInterval {
                start: calendar::format_time(start),
                end: calendar::format_time(end),
            });
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            calendar::format_time(self.start),
            calendar::format_time(self.end)
        )
    }
}

/// `HH:MM-HH:MM`
impl FromStr for Interval {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ModelError::InvalidIntervalFormat(s.trim().to_string()))?;
        let start = calendar::parse_time(start)
            .map_err(|_| ModelError::InvalidTime(start.trim().to_string()))?;
        let end = calendar::parse_time(end)
            .map_err(|_| ModelError::InvalidTime(end.trim().to_string()))?;
        Interval::new(start, end)
    }
}

#[derive(Deserialize)]
struct RawInterval {
    #[serde(with = "time_format")]
    start: NaiveTime,
    #[serde(with = "time_format")]
    end: NaiveTime,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ModelError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

mod time_format {
    use crate::calendar;
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&calendar::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        calendar::parse_time(&raw).map_err(de::Error::custom)
    }
}

/// Dates auxquelles une règle s'applique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DaySelector {
    Daily,
    Weekday(Weekday),
    ExactDate(NaiveDate),
}

impl DaySelector {
    pub const DAILY: &'static str = "daily";

    /// Vrai si la règle s'applique à `date`.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DaySelector::Daily => true,
            DaySelector::Weekday(day) => calendar::weekday_of(date) == *day,
            DaySelector::ExactDate(exact) => *exact == date,
        }
    }
}

impl fmt::Display for DaySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaySelector::Daily => f.write_str(Self::DAILY),
            DaySelector::Weekday(day) => f.write_str(calendar::weekday_name(*day)),
            DaySelector::ExactDate(date) => f.write_str(&calendar::format_date(*date)),
        }
    }
}

impl FromStr for DaySelector {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case(Self::DAILY) {
            return Ok(DaySelector::Daily);
        }
        if let Some(day) = calendar::parse_weekday(raw) {
            return Ok(DaySelector::Weekday(day));
        }
        calendar::parse_date(raw)
            .map(DaySelector::ExactDate)
            .map_err(|_| ModelError::InvalidDay(raw.to_string()))
    }
}

impl TryFrom<String> for DaySelector {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DaySelector> for String {
    fn from(value: DaySelector) -> Self {
        value.to_string()
    }
}

/// Demande de création : sélecteur + créneaux, sans identifiant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRule {
    pub day: DaySelector,
    #[serde(default)]
    pub intervals: Vec<Interval>,
}

impl NewRule {
    pub fn new(day: DaySelector, intervals: Vec<Interval>) -> Self {
        Self { day, intervals }
    }
}

/// Règle de présence persistée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRule {
    pub id: RuleId,
    pub day: DaySelector,
    #[serde(default)]
    pub intervals: Vec<Interval>,
}

impl AttendanceRule {
    /// Construit une règle avec un identifiant neuf, sans validation.
    pub fn build(input: NewRule) -> Self {
        Self {
            id: RuleId::random(),
            day: input.day,
            intervals: input.intervals,
        }
    }
}

/// Une date concrète et les créneaux qui s'y appliquent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedDay {
    /// Date au format canonique (`YYYY-MM-DD`).
    #[serde(rename = "day")]
    pub label: String,
    pub intervals: Vec<Interval>,
}
