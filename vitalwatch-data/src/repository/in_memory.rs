use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::errors::RepositoryError;
use crate::models::patient::PatientProfile;

/// In-memory storage implementation for patient profiles
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    /// Stored profiles keyed by patient id
    profiles: Arc<Mutex<HashMap<String, PatientProfile>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a profile, replacing any previous profile with the same id
    pub async fn store_profile(&self, profile: &PatientProfile) -> Result<PatientProfile, RepositoryError> {
        let mut store = self.profiles.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        store.insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }

    /// Get a profile by patient id
    pub async fn get_profile(&self, id: &str) -> Result<Option<PatientProfile>, RepositoryError> {
        let store = self.profiles.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(store.get(id).cloned())
    }

    /// Get all stored profiles
    pub async fn all_profiles(&self) -> Result<Vec<PatientProfile>, RepositoryError> {
        let store = self.profiles.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(store.values().cloned().collect())
    }

    /// Remove a profile by patient id, returning it if it was present
    pub async fn remove_profile(&self, id: &str) -> Result<Option<PatientProfile>, RepositoryError> {
        let mut store = self.profiles.lock().map_err(|e| RepositoryError::Lock(e.to_string()))?;
        Ok(store.remove(id))
    }
}
