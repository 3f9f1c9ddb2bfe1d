use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use crate::models::patient::{CreatePatientRequest, PatientProfile};

/// Repository trait for patient profiles
#[async_trait]
pub trait PatientRepositoryTrait {
    /// Enroll a new patient from a request, minting a fresh id
    async fn add(&self, request: CreatePatientRequest) -> Result<PatientProfile, RepositoryError>;

    /// Get a patient profile by id
    async fn get_by_id(&self, id: &str) -> Result<Option<PatientProfile>, RepositoryError>;

    /// Get all enrolled patient profiles
    async fn get_all(&self) -> Result<Vec<PatientProfile>, RepositoryError>;

    /// Replace the stored profile of an already enrolled patient
    async fn update(&self, profile: PatientProfile) -> Result<PatientProfile, RepositoryError>;

    /// Remove a patient profile by id, returning the removed profile
    async fn remove(&self, id: &str) -> Result<PatientProfile, RepositoryError>;
}

/// Repository for patient profiles.
/// Durable persistence is an external concern; this implementation keeps the
/// enrolled profiles in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct PatientRepository {
    /// In-memory profile storage
    storage: InMemoryStorage,
}

impl PatientRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }

    /// Validate an enrollment request
    fn validate_request(request: &CreatePatientRequest) -> Result<(), RepositoryError> {
        if let Err(validation_errors) = request.validate() {
            let error_message = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let messages: Vec<String> = errors
                        .iter()
                        .map(|err| match &err.message {
                            Some(message) => message.to_string(),
                            None => format!("Invalid {}", field),
                        })
                        .collect();
                    format!("{}: {}", field, messages.join(", "))
                })
                .collect::<Vec<String>>()
                .join("; ");

            return Err(RepositoryError::Validation(error_message));
        }

        // Baseline sanity: systolic is always the higher number
        let pressure = request.baseline.normal_blood_pressure;
        if pressure.systolic <= pressure.diastolic {
            return Err(RepositoryError::Validation(
                "Systolic pressure must be greater than diastolic pressure".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl PatientRepositoryTrait for PatientRepository {
    /// Enroll a new patient from a request
    async fn add(&self, request: CreatePatientRequest) -> Result<PatientProfile, RepositoryError> {
        Self::validate_request(&request)?;

        // Generate a unique ID
        let id = Uuid::new_v4();

        let profile = PatientProfile {
            id: id.to_string(),
            given_name: request.given_name,
            family_name: request.family_name,
            date_of_birth: request.date_of_birth,
            baseline: request.baseline,
        };

        debug!("Enrolling patient profile: {}", profile.id);
        self.storage.store_profile(&profile).await
    }

    /// Get a patient profile by id
    async fn get_by_id(&self, id: &str) -> Result<Option<PatientProfile>, RepositoryError> {
        debug!("Looking up patient profile: {}", id);
        self.storage.get_profile(id).await
    }

    /// Get all enrolled patient profiles
    async fn get_all(&self) -> Result<Vec<PatientProfile>, RepositoryError> {
        self.storage.all_profiles().await
    }

    /// Replace the stored profile of an already enrolled patient
    async fn update(&self, profile: PatientProfile) -> Result<PatientProfile, RepositoryError> {
        // Only already enrolled patients can be updated
        if self.storage.get_profile(&profile.id).await?.is_none() {
            return Err(RepositoryError::NotFound(format!(
                "Patient with id {} is not enrolled",
                profile.id
            )));
        }

        debug!("Updating patient profile: {}", profile.id);
        self.storage.store_profile(&profile).await
    }

    /// Remove a patient profile by id
    async fn remove(&self, id: &str) -> Result<PatientProfile, RepositoryError> {
        debug!("Removing patient profile: {}", id);
        self.storage.remove_profile(id).await?.ok_or_else(|| {
            RepositoryError::NotFound(format!("Patient with id {} is not enrolled", id))
        })
    }
}

/// Mock patient repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;

    /// Mock implementation of PatientRepository for testing
    pub struct MockPatientRepository {
        profiles: Vec<PatientProfile>,
    }

    impl Default for MockPatientRepository {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockPatientRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self { profiles: Vec::new() }
        }

        /// Create a mock repository with predefined profiles
        pub fn with_profiles(profiles: Vec<PatientProfile>) -> Self {
            Self { profiles }
        }

        /// Create a mock repository holding a single profile
        pub fn with_profile(profile: PatientProfile) -> Self {
            Self { profiles: vec![profile] }
        }
    }

    #[async_trait]
    impl PatientRepositoryTrait for MockPatientRepository {
        async fn add(&self, request: CreatePatientRequest) -> Result<PatientProfile, RepositoryError> {
            let profile = PatientProfile {
                id: Uuid::new_v4().to_string(),
                given_name: request.given_name,
                family_name: request.family_name,
                date_of_birth: request.date_of_birth,
                baseline: request.baseline,
            };

            Ok(profile)
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<PatientProfile>, RepositoryError> {
            let profile = self.profiles.iter().find(|p| p.id == id).cloned();

            Ok(profile)
        }

        async fn get_all(&self) -> Result<Vec<PatientProfile>, RepositoryError> {
            Ok(self.profiles.clone())
        }

        async fn update(&self, profile: PatientProfile) -> Result<PatientProfile, RepositoryError> {
            if self.profiles.iter().any(|p| p.id == profile.id) {
                Ok(profile)
            } else {
                Err(RepositoryError::NotFound(format!(
                    "Patient with id {} is not enrolled",
                    profile.id
                )))
            }
        }

        async fn remove(&self, id: &str) -> Result<PatientProfile, RepositoryError> {
            self.profiles.iter().find(|p| p.id == id).cloned().ok_or_else(|| {
                RepositoryError::NotFound(format!("Patient with id {} is not enrolled", id))
            })
        }
    }
}
