use super::{Conflict, ConflictKind};
use crate::calendar;
use crate::model::{AttendanceRule, DaySelector, Interval};

/// Premier conflit trouvé pour `candidate` face aux règles stockées.
pub fn find_conflict(candidate: &AttendanceRule, existing: &[AttendanceRule]) -> Option<Conflict> {
    self_conflict(&candidate.intervals).or_else(|| stored_conflict(candidate, existing))
}

pub fn is_non_conflicting(candidate: &AttendanceRule, existing: &[AttendanceRule]) -> bool {
    find_conflict(candidate, existing).is_none()
}

/// Paires non ordonnées de positions distinctes, sans répétition.
pub(super) fn self_conflict(intervals: &[Interval]) -> Option<Conflict> {
    for (idx, a) in intervals.iter().enumerate() {
        for b in intervals.iter().skip(idx + 1) {
            if calendar::intervals_conflict(a, b) {
                return Some(Conflict {
                    kind: ConflictKind::SelfOverlap,
                    candidate: *a,
                    existing: *b,
                    rule: None,
                });
            }
        }
    }
    None
}

fn stored_conflict(candidate: &AttendanceRule, existing: &[AttendanceRule]) -> Option<Conflict> {
    let scope = applicable_rules(candidate.day, existing);
    for rule in scope {
        for stored in &rule.intervals {
            if let Some(mine) = candidate
                .intervals
                .iter()
                .find(|mine| calendar::intervals_conflict(mine, stored))
            {
                return Some(Conflict {
                    kind: ConflictKind::StoredRule,
                    candidate: *mine,
                    existing: *stored,
                    rule: Some(rule.id.clone()),
                });
            }
        }
    }
    None
}

/// Règles stockées dont les créneaux doivent rester disjoints de ceux du candidat.
///
/// - `Daily` : toutes les règles.
/// - `Weekday(w)` : règles `Daily`, `Weekday(w)` et `ExactDate(d)` avec `d` un jour `w`.
/// - `ExactDate(d)` : règles `Daily`, `Weekday(jour de d)` et `ExactDate(d)`.
pub(super) fn applicable_rules(
    selector: DaySelector,
    existing: &[AttendanceRule],
) -> impl Iterator<Item = &AttendanceRule> {
    existing.iter().filter(move |rule| match (selector, rule.day) {
        (DaySelector::Daily, _) | (_, DaySelector::Daily) => true,
        (DaySelector::Weekday(mine), DaySelector::Weekday(theirs)) => mine == theirs,
        (DaySelector::Weekday(mine), DaySelector::ExactDate(theirs)) => {
            calendar::weekday_of(theirs) == mine
        }
        (DaySelector::ExactDate(mine), DaySelector::Weekday(theirs)) => {
            calendar::weekday_of(mine) == theirs
        }
        (DaySelector::ExactDate(mine), DaySelector::ExactDate(theirs)) => mine == theirs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewRule, RuleId};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn iv(start: (u32, u32), end: (u32, u32)) -> Interval {
        Interval::new(
            NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
            NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
        )
        .unwrap()
    }

    fn rule(id: &str, day: DaySelector, intervals: Vec<Interval>) -> AttendanceRule {
        AttendanceRule {
            id: RuleId::new(id),
            day,
            intervals,
        }
    }

    fn candidate(day: DaySelector, intervals: Vec<Interval>) -> AttendanceRule {
        AttendanceRule::build(NewRule::new(day, intervals))
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn zero_or_one_interval_never_self_conflicts() {
        assert!(self_conflict(&[]).is_none());
        assert!(self_conflict(&[iv((8, 0), (9, 0))]).is_none());
    }

    #[test]
    fn equal_intervals_self_conflict() {
        let same = iv((8, 0), (9, 0));
        let conflict = self_conflict(&[same, same]).unwrap();
        assert_eq!(conflict.kind, ConflictKind::SelfOverlap);
        assert_eq!(conflict.rule, None);
    }

    #[test]
    fn later_pair_self_conflict_found() {
        let ints = [iv((8, 0), (9, 0)), iv((10, 0), (11, 0)), iv((10, 30), (12, 0))];
        let conflict = self_conflict(&ints).unwrap();
        assert_eq!(conflict.candidate, ints[1]);
        assert_eq!(conflict.existing, ints[2]);
    }

    #[test]
    fn daily_candidate_checks_every_rule() {
        let stored = vec![rule(
            "date",
            DaySelector::ExactDate(monday()),
            vec![iv((12, 0), (13, 0))],
        )];
        let c = candidate(DaySelector::Daily, vec![iv((12, 30), (14, 0))]);
        let conflict = find_conflict(&c, &stored).unwrap();
        assert_eq!(conflict.kind, ConflictKind::StoredRule);
        assert_eq!(conflict.rule, Some(RuleId::new("date")));
    }

    #[test]
    fn exact_date_checks_its_weekday_rules() {
        let stored = vec![rule(
            "mon",
            DaySelector::Weekday(Weekday::Mon),
            vec![iv((9, 0), (10, 0))],
        )];
        let c = candidate(DaySelector::ExactDate(monday()), vec![iv((9, 30), (9, 45))]);
        assert!(!is_non_conflicting(&c, &stored));

        let tuesday = monday().succ_opt().unwrap();
        let c = candidate(DaySelector::ExactDate(tuesday), vec![iv((9, 30), (9, 45))]);
        assert!(is_non_conflicting(&c, &stored));
    }

    #[test]
    fn weekday_candidate_checks_exact_dates_on_that_weekday() {
        let stored = vec![rule(
            "date",
            DaySelector::ExactDate(monday()),
            vec![iv((9, 0), (10, 0))],
        )];
        let c = candidate(DaySelector::Weekday(Weekday::Mon), vec![iv((9, 0), (10, 0))]);
        let conflict = find_conflict(&c, &stored).unwrap();
        assert_eq!(conflict.kind, ConflictKind::StoredRule);
        assert_eq!(conflict.rule, Some(RuleId::new("date")));

        let c = candidate(DaySelector::Weekday(Weekday::Tue), vec![iv((9, 0), (10, 0))]);
        assert!(is_non_conflicting(&c, &stored));
    }

    #[test]
    fn weekday_candidate_checks_daily_and_same_weekday() {
        let stored = vec![
            rule("daily", DaySelector::Daily, vec![iv((7, 0), (8, 0))]),
            rule("tue", DaySelector::Weekday(Weekday::Tue), vec![iv((9, 0), (10, 0))]),
        ];
        let c = candidate(DaySelector::Weekday(Weekday::Mon), vec![iv((9, 0), (10, 0))]);
        assert!(is_non_conflicting(&c, &stored));
        let c = candidate(DaySelector::Weekday(Weekday::Mon), vec![iv((7, 30), (7, 45))]);
        assert_eq!(find_conflict(&c, &stored).unwrap().rule, Some(RuleId::new("daily")));
    }

    fn scope_ids(selector: DaySelector, stored: &[AttendanceRule]) -> Vec<&str> {
        applicable_rules(selector, stored)
            .map(|rule| rule.id.as_str())
            .collect()
    }

    #[test]
    fn scope_by_selector() {
        let stored = vec![
            rule("daily", DaySelector::Daily, vec![]),
            rule("mon", DaySelector::Weekday(Weekday::Mon), vec![]),
            rule("fri", DaySelector::Weekday(Weekday::Fri), vec![]),
            rule("same", DaySelector::ExactDate(monday()), vec![]),
            rule("other", DaySelector::ExactDate(monday().succ_opt().unwrap()), vec![]),
        ];
        assert_eq!(
            scope_ids(DaySelector::ExactDate(monday()), &stored),
            ["daily", "mon", "same"]
        );
        assert_eq!(
            scope_ids(DaySelector::Weekday(Weekday::Mon), &stored),
            ["daily", "mon", "same"]
        );
        assert_eq!(
            scope_ids(DaySelector::Weekday(Weekday::Tue), &stored),
            ["daily", "other"]
        );
        assert_eq!(scope_ids(DaySelector::Daily, &stored).len(), 5);
    }

    #[test]
    fn touching_stored_interval_is_accepted() {
        let stored = vec![rule("daily", DaySelector::Daily, vec![iv((8, 0), (9, 0))])];
        let c = candidate(DaySelector::Daily, vec![iv((9, 0), (10, 0))]);
        assert!(is_non_conflicting(&c, &stored));
    }
}
