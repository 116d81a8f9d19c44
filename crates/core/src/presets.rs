//! File-backed storage of saved scenarios
//!
//! A preset captures location, date and object height so a scenario can be
//! recalled later. The whole collection lives in one JSON array using the
//! camelCase field names the web client stored under `solar_presets`.

use crate::error::{Error, ErrorCode, Result};
use crate::model::{parse_date, Coordinates};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A saved scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Observer location
    pub location: Coordinates,
    /// `YYYY-MM-DD`
    pub date: String,
    /// Meters
    pub object_height: f64,
    /// RFC 3339
    pub created_at: String,
    /// Starred; absent in older files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl Preset {
    /// Whether the preset is starred
    #[must_use]
    pub fn favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }
}

/// Presets persisted to a JSON file
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    presets: Vec<Preset>,
}

impl PresetStore {
    /// Default location: `<data dir>/sunpath/presets.json`
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(".sunpath"))
            .join("sunpath")
            .join("presets.json")
    }

    /// Open the store at the default location
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Open a store. A missing file is an empty store; an unreadable or
    /// corrupt file is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let presets = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(presets) => presets,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load presets");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load presets");
                Vec::new()
            }
        };

        debug!(path = %path.display(), count = presets.len(), "Opened preset store");
        Ok(Self { path, presets })
    }

    /// File backing this store
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of presets
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Favorites first, then the rest; insertion order within each group
    #[must_use]
    pub fn list(&self) -> Vec<&Preset> {
        let (favorites, regular): (Vec<&Preset>, Vec<&Preset>) =
            self.presets.iter().partition(|p| p.favorite());
        favorites.into_iter().chain(regular).collect()
    }

    /// Find a preset by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Save the current scenario under `name` and persist
    pub fn save(
        &mut self,
        name: &str,
        location: Coordinates,
        date: &str,
        object_height: f64,
    ) -> Result<&Preset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::new(ErrorCode::InvalidInput, "Preset name cannot be empty"));
        }
        location.validate()?;
        parse_date(date)?;

        let mut next = self.presets.clone();
        next.push(Preset {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            location,
            date: date.to_string(),
            object_height,
            created_at: Utc::now().to_rfc3339(),
            is_favorite: None,
        });
        self.commit(next)?;

        let saved = &self.presets[self.presets.len() - 1];
        debug!(id = %saved.id, name = %saved.name, "Saved preset");
        Ok(saved)
    }

    /// Remove a preset and persist
    pub fn delete(&mut self, id: &str) -> Result<Preset> {
        let index = self.index_of(id)?;
        let mut next = self.presets.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Flip the favorite flag and persist; returns the new state
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let index = self.index_of(id)?;
        let mut next = self.presets.clone();
        let favorite = !next[index].favorite();
        next[index].is_favorite = Some(favorite);
        self.commit(next)?;
        Ok(favorite)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.presets
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::preset_not_found(id))
    }

    /// Replace the in-memory list only once `next` is on disk
    fn commit(&mut self, next: Vec<Preset>) -> Result<()> {
        self.persist(&next)?;
        self.presets = next;
        Ok(())
    }

    /// Write through a sibling temp file so a crash never leaves half a file
    fn persist(&self, presets: &[Preset]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(presets)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
