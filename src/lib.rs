#![forbid(unsafe_code)]
//! Attendance rules : créneaux de présence par jour, stockés dans un seul
//! document JSON.
//!
//! - Sélecteur de jour : tous les jours, un jour de semaine, ou une date.
//! - Refus des règles dont les créneaux se chevauchent (entre eux ou avec
//!   les règles déjà stockées qui s'appliquent aux mêmes dates).
//! - Projection des règles sur une plage de dates.
//! - Créneaux semi-ouverts `[start, end)` : deux créneaux contigus ne sont
//!   pas en conflit.

pub mod calendar;
pub mod engine;
pub mod io;
pub mod model;
pub mod storage;

pub use engine::{
    find_conflict, is_non_conflicting, project, Conflict, ConflictKind, RuleEngine, RuleError,
    RuleListing, RuleQuery, SaveOutcome,
};
pub use model::{AttendanceRule, DaySelector, Interval, ModelError, NewRule, ProjectedDay, RuleId};
pub use storage::{JsonStore, MemoryStore, RuleStore};
