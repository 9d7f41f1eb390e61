mod projection;
mod types;
mod validate;

pub use projection::{intervals_on, project};
pub use types::{Conflict, ConflictKind, RuleError, RuleListing, RuleQuery, SaveOutcome};
pub use validate::{find_conflict, is_non_conflicting};

use crate::model::{AttendanceRule, NewRule, RuleId};
use crate::storage::RuleStore;

/// Moteur de règles : chaque opération charge le document une fois,
/// calcule, puis réécrit le document complet si besoin.
#[derive(Debug)]
pub struct RuleEngine<S> {
    store: S,
}

impl<S: RuleStore> RuleEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Construit une règle avec un id neuf, sans validation.
    pub fn build_rule(input: NewRule) -> AttendanceRule {
        AttendanceRule::build(input)
    }

    /// Valide puis enregistre une nouvelle règle.
    ///
    /// Un conflit n'est pas une erreur : le document n'est pas touché et
    /// `SaveOutcome::Rejected` décrit le chevauchement.
    pub fn save_new_rule(&self, input: NewRule) -> Result<SaveOutcome, RuleError> {
        let mut rules = self.store.load()?;
        let candidate = Self::build_rule(input);

        if let Some(conflict) = find_conflict(&candidate, &rules) {
            tracing::warn!(
                day = %candidate.day,
                kind = ?conflict.kind,
                candidate = %conflict.candidate,
                existing = %conflict.existing,
                rule = conflict.rule.as_ref().map(RuleId::as_str),
                "attendance rule rejected"
            );
            return Ok(SaveOutcome::Rejected(conflict));
        }

        rules.push(candidate.clone());
        self.store.save_all(&rules)?;
        tracing::info!(id = %candidate.id, day = %candidate.day, "attendance rule created");
        Ok(SaveOutcome::Created(candidate))
    }

    /// Règles brutes, ou projection jour par jour si la requête porte les deux dates.
    pub fn rules(&self, query: &RuleQuery) -> Result<RuleListing, RuleError> {
        let rules = self.store.load()?;
        match query.range() {
            Some((start, end)) => {
                tracing::debug!(%start, %end, "projecting attendance rules");
                Ok(RuleListing::Days(project(&rules, start, end)))
            }
            None => Ok(RuleListing::Rules(rules)),
        }
    }

    pub fn rule(&self, id: &RuleId) -> Result<Option<AttendanceRule>, RuleError> {
        let rules = self.store.load()?;
        Ok(rules.into_iter().find(|rule| &rule.id == id))
    }

    /// Supprime la règle `id` ; `None` si elle n'existe pas (document intact).
    pub fn delete_rule(&self, id: &RuleId) -> Result<Option<AttendanceRule>, RuleError> {
        let mut rules = self.store.load()?;
        let Some(pos) = rules.iter().position(|rule| &rule.id == id) else {
            tracing::debug!(%id, "attendance rule not found");
            return Ok(None);
        };
        let removed = rules.remove(pos);
        self.store.save_all(&rules)?;
        tracing::info!(%id, "attendance rule deleted");
        Ok(Some(removed))
    }
}
