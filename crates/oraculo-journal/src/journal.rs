use crate::model::{AltarItem, Reading, UserProfile};
use crate::store::KeyValueStore;
use crate::JournalError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const PROFILE_KEY: &str = "oraculo7_profile";
pub const HISTORY_KEY: &str = "oraculo7_history";
pub const ALTAR_KEY: &str = "oraculo7_altar";

/// Profile, reading history and altar on top of a key-value store.
///
/// History and altar are stored newest first.
pub struct Journal<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Journal<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, JournalError> {
        match self.store.get(key)? {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| JournalError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), JournalError> {
        let text = serde_json::to_string(value).map_err(|source| JournalError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &text)?;
        Ok(())
    }

    pub fn save_profile(&mut self, profile: &UserProfile) -> Result<(), JournalError> {
        self.save(PROFILE_KEY, profile)
    }

    pub fn profile(&self) -> Result<Option<UserProfile>, JournalError> {
        self.load(PROFILE_KEY)
    }

    /// All readings, newest first.
    pub fn history(&self) -> Result<Vec<Reading>, JournalError> {
        Ok(self.load(HISTORY_KEY)?.unwrap_or_default())
    }

    /// Put a reading at the top of the history.
    pub fn save_reading(&mut self, reading: Reading) -> Result<(), JournalError> {
        let mut history = self.history()?;
        log::info!("journal: saving reading {} ({})", reading.id, reading.portal_id);
        history.insert(0, reading);
        self.save(HISTORY_KEY, &history)
    }

    /// Replace the reading with the same id, keeping its position.
    pub fn update_reading(&mut self, updated: Reading) -> Result<(), JournalError> {
        let mut history = self.history()?;
        let slot = history
            .iter_mut()
            .find(|r| r.id == updated.id)
            .ok_or_else(|| JournalError::ReadingNotFound(updated.id.clone()))?;
        *slot = updated;
        self.save(HISTORY_KEY, &history)
    }

    pub fn find_reading(&self, id: &str) -> Result<Option<Reading>, JournalError> {
        Ok(self.history()?.into_iter().find(|r| r.id == id))
    }

    /// Attach journaling notes to a reading. Blank notes clear the field.
    pub fn set_reading_notes(&mut self, id: &str, notes: &str) -> Result<Reading, JournalError> {
        let mut reading = self
            .find_reading(id)?
            .ok_or_else(|| JournalError::ReadingNotFound(id.to_string()))?;
        let trimmed = notes.trim();
        reading.notes = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self.update_reading(reading.clone())?;
        Ok(reading)
    }

    /// Saved altar items, newest first.
    pub fn altar(&self) -> Result<Vec<AltarItem>, JournalError> {
        Ok(self.load(ALTAR_KEY)?.unwrap_or_default())
    }

    pub fn add_altar_item(&mut self, item: AltarItem) -> Result<(), JournalError> {
        let mut items = self.altar()?;
        items.insert(0, item);
        self.save(ALTAR_KEY, &items)
    }

    /// Remove an altar item. Returns whether anything was removed.
    pub fn remove_altar_item(&mut self, id: &str) -> Result<bool, JournalError> {
        let mut items = self.altar()?;
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(ALTAR_KEY, &items)?;
        Ok(true)
    }

    /// Forget the profile and the reading history. The altar is kept.
    pub fn clear(&mut self) -> Result<(), JournalError> {
        log::warn!("journal: clearing profile and history");
        self.store.remove(PROFILE_KEY)?;
        self.store.remove(HISTORY_KEY)?;
        Ok(())
    }
}
