use crate::model::AttendanceRule;
use anyhow::Context;
use std::cell::RefCell;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait RuleStore {
    /// Charge toutes les règles ; vide si le document n'existe pas encore.
    fn load(&self) -> anyhow::Result<Vec<AttendanceRule>>;
    /// Remplace le document complet.
    fn save_all(&self, rules: &[AttendanceRule]) -> anyhow::Result<()>;
}

/// Document JSON unique (tableau de règles) sur disque.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleStore for JsonStore {
    fn load(&self) -> anyhow::Result<Vec<AttendanceRule>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no rules document yet");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let rules: Vec<AttendanceRule> = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), count = rules.len(), "rules loaded");
        Ok(rules)
    }

    fn save_all(&self, rules: &[AttendanceRule]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(rules)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        tracing::debug!(path = %self.path.display(), count = rules.len(), "rules saved");
        Ok(())
    }
}

/// Stockage en mémoire (tests, intégration dans un autre processus).
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: RefCell<Vec<AttendanceRule>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<AttendanceRule>) -> Self {
        Self {
            rules: RefCell::new(rules),
        }
    }

    pub fn snapshot(&self) -> Vec<AttendanceRule> {
        self.rules.borrow().clone()
    }
}

impl RuleStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Vec<AttendanceRule>> {
        Ok(self.rules.borrow().clone())
    }

    fn save_all(&self, rules: &[AttendanceRule]) -> anyhow::Result<()> {
        *self.rules.borrow_mut() = rules.to_vec();
        Ok(())
    }
}

impl<S: RuleStore + ?Sized> RuleStore for &S {
    fn load(&self) -> anyhow::Result<Vec<AttendanceRule>> {
        (**self).load()
    }

    fn save_all(&self, rules: &[AttendanceRule]) -> anyhow::Result<()> {
        (**self).save_all(rules)
    }
}
