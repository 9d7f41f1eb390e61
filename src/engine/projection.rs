use crate::calendar;
use crate::model::{AttendanceRule, DaySelector, Interval, ProjectedDay};
use chrono::NaiveDate;

/// Projette les règles sur chaque date de `[start, end]`.
///
/// Les créneaux d'une date sont concaténés dans l'ordre : règles `Daily`,
/// puis `Weekday`, puis `ExactDate`. Les dates sans créneau sont omises ;
/// `start > end` donne une liste vide.
pub fn project(rules: &[AttendanceRule], start: NaiveDate, end: NaiveDate) -> Vec<ProjectedDay> {
    calendar::days_inclusive(start, end)
        .filter_map(|date| {
            let intervals = intervals_on(rules, date);
            if intervals.is_empty() {
                return None;
            }
            Some(ProjectedDay {
                label: calendar::format_date(date),
                intervals,
            })
        })
        .collect()
}

/// Créneaux applicables à une date donnée.
pub fn intervals_on(rules: &[AttendanceRule], date: NaiveDate) -> Vec<Interval> {
    let selectors = [
        DaySelector::Daily,
        DaySelector::Weekday(calendar::weekday_of(date)),
        DaySelector::ExactDate(date),
    ];
    let mut out = Vec::new();
    for wanted in selectors {
        out.extend(
            rules
                .iter()
                .filter(|rule| rule.day == wanted)
                .flat_map(|rule| rule.intervals.iter().copied()),
        );
    }
    out
}
