//! Persistence of combatant rosters between battles.

use crate::creature::Creature;
use crate::errors::{StoreError, StoreResult};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Supplies and receives creature lists keyed by combatant name.
pub trait RosterStore {
    /// `Ok(None)` when nothing has been saved under `name`.
    fn load(&self, name: &str) -> StoreResult<Option<Vec<Creature>>>;
    fn save(&mut self, name: &str, roster: &[Creature]) -> StoreResult<()>;
}

/// In-memory store, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryRosterStore {
    rosters: HashMap<String, Vec<Creature>>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }
}

impl RosterStore for MemoryRosterStore {
    fn load(&self, name: &str) -> StoreResult<Option<Vec<Creature>>> {
        Ok(self.rosters.get(name).cloned())
    }

    fn save(&mut self, name: &str, roster: &[Creature]) -> StoreResult<()> {
        self.rosters.insert(name.to_string(), roster.to_vec());
        Ok(())
    }
}

/// One pretty-printed JSON file per combatant, `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonRosterStore {
    dir: PathBuf,
}

impl JsonRosterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == ' ');
        if !valid {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl RosterStore for JsonRosterStore {
    fn load(&self, name: &str) -> StoreResult<Option<Vec<Creature>>> {
        let path = self.path_for(name)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let roster = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "roster loaded");
        Ok(Some(roster))
    }

    fn save(&mut self, name: &str, roster: &[Creature]) -> StoreResult<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(roster)?;

        // Atomic replace: temp file, then rename.
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;
        tracing::debug!(path = %path.display(), creatures = roster.len(), "roster saved");
        Ok(())
    }
}
