//! JSON file backend

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::BestScoreStore;
use crate::error::{GameError, Result};

/// Best scores persisted as a flat JSON object, e.g. `{"BestScoreEasy": 120}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u32>,
}

impl JsonFileStore {
    /// Open a store, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No best scores at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(GameError::io(&path, e)),
        };
        Ok(Self { path, values })
    }

    /// Open a store, discarding a corrupt or unreadable file
    pub fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Ignoring best scores at {}: {e}", path.display());
                Self {
                    path,
                    values: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write all values to disk (temp file, then rename over the target)
    pub fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| GameError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| GameError::io(&self.path, e))?;
        Ok(())
    }
}

impl BestScoreStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<u32> {
        self.values.get(key).copied()
    }

    fn write(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
        match self.flush() {
            Ok(()) => log::info!("Best score saved ({key} = {value})"),
            Err(e) => log::warn!("Failed to save best score {key}: {e}"),
        }
    }
}
