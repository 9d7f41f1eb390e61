use crate::calendar;
use crate::model::{
    AttendanceRule, DaySelector, Interval, ModelError, NewRule, ProjectedDay, RuleId,
};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    SelfOverlap,
    StoredRule,
}

/// Motif du refus d'une règle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub candidate: Interval,
    pub existing: Interval,
    /// Règle stockée en cause (`None` pour un chevauchement interne).
    pub rule: Option<RuleId>,
}

/// Résultat d'une sauvegarde : la règle créée, ou le conflit qui l'a refusée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(AttendanceRule),
    Rejected(Conflict),
}

impl SaveOutcome {
    pub fn created(&self) -> Option<&AttendanceRule> {
        match self {
            SaveOutcome::Created(rule) => Some(rule),
            SaveOutcome::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, SaveOutcome::Rejected(_))
    }
}

/// Filtre de lecture : les deux dates ensemble, sinon liste brute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RuleQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Construit la requête depuis les deux paramètres texte ; un paramètre
    /// vide compte comme absent.
    pub fn from_params(start: Option<&str>, end: Option<&str>) -> Result<Self, RuleError> {
        Ok(Self {
            start: parse_param(start)?,
            end: parse_param(end)?,
        })
    }

    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start.zip(self.end)
    }
}

fn parse_param(raw: Option<&str>) -> Result<Option<NaiveDate>, RuleError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => calendar::parse_date(raw)
            .map(Some)
            .map_err(|_| RuleError::InvalidDate(raw.to_string())),
    }
}

impl NewRule {
    /// Lit une saisie texte : sélecteur (`daily`, `monday`, `2024-01-01`)
    /// et créneaux `HH:MM-HH:MM`.
    pub fn parse<I, T>(day: &str, intervals: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let day: DaySelector = day.parse()?;
        let intervals = intervals
            .into_iter()
            .map(|raw| raw.as_ref().parse::<Interval>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NewRule::new(day, intervals))
    }
}

/// Réponse d'une lecture : règles brutes, ou projection jour par jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RuleListing {
    Rules(Vec<AttendanceRule>),
    Days(Vec<ProjectedDay>),
}

impl RuleListing {
    pub fn len(&self) -> usize {
        match self {
            RuleListing::Rules(rules) => rules.len(),
            RuleListing::Days(days) => days.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_needs_both_dates() {
        let q = RuleQuery::from_params(Some("2024-01-01"), None).unwrap();
        assert_eq!(q.range(), None);
        let q = RuleQuery::from_params(Some("2024-01-01"), Some("  ")).unwrap();
        assert_eq!(q.range(), None);
        let q = RuleQuery::from_params(Some("2024-01-01"), Some("2024-01-03")).unwrap();
        assert!(q.range().is_some());
    }

    #[test]
    fn query_rejects_malformed_date() {
        let err = RuleQuery::from_params(Some("01/02/2024"), Some("2024-01-03")).unwrap_err();
        assert!(matches!(err, RuleError::InvalidDate(_)));
    }

    #[test]
    fn parse_new_rule_from_text() {
        let input = NewRule::parse("Monday", ["09:00-10:00", "14:00-15:30"]).unwrap();
        assert_eq!(input.day, DaySelector::Weekday(chrono::Weekday::Mon));
        assert_eq!(
            input.intervals,
            vec![
                "09:00-10:00".parse::<Interval>().unwrap(),
                "14:00-15:30".parse::<Interval>().unwrap()
            ]
        );
    }

    #[test]
    fn parse_new_rule_reports_model_errors() {
        let err = NewRule::parse("someday", ["09:00-10:00"]).unwrap_err();
        assert!(matches!(err, RuleError::Model(ModelError::InvalidDay(_))));

        let err = NewRule::parse("daily", ["10:00-09:00"]).unwrap_err();
        assert!(matches!(err, RuleError::Model(ModelError::InvalidInterval { .. })));

        let err = NewRule::parse("daily", ["10:00"]).unwrap_err();
        assert!(matches!(err, RuleError::Model(ModelError::InvalidIntervalFormat(_))));
    }
}
