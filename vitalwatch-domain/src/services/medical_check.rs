use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::debug;

use crate::services::alert::{AlertError, AlertSinkTrait, LogAlertSink};
use vitalwatch_data::models::patient::{BloodPressure, PatientProfile};
use vitalwatch_data::repository::{PatientRepository, PatientRepositoryTrait, RepositoryError};

/// Largest temperature deviation from baseline, in degrees Celsius, that is
/// still considered normal. Only deviations strictly above this trigger an
/// alert; a deviation of exactly 1.5 does not.
pub const TEMPERATURE_TOLERANCE: Decimal = dec!(1.5);

/// Medical check service errors
#[derive(Debug, Error)]
pub enum MedicalCheckServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No profile exists for the requested patient
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Alert delivery error
    #[error("Alert error: {0}")]
    AlertError(#[from] AlertError),
}

/// Trait for vital-sign check operations
#[async_trait]
pub trait MedicalCheckServiceTrait {
    /// Compare an observed blood pressure against the patient's baseline and
    /// dispatch an alert if either component deviates
    async fn check_blood_pressure(
        &self,
        patient_id: &str,
        pressure: BloodPressure,
    ) -> Result<(), MedicalCheckServiceError>;

    /// Compare an observed temperature against the patient's baseline and
    /// dispatch an alert if it deviates by more than the tolerance
    async fn check_temperature(
        &self,
        patient_id: &str,
        temperature: Decimal,
    ) -> Result<(), MedicalCheckServiceError>;
}

/// Medical check service for vital-sign monitoring.
/// Loads the patient's baseline on every check; baselines are never cached
/// between calls, so repository updates take effect immediately.
pub struct MedicalCheckService<R: PatientRepositoryTrait, A: AlertSinkTrait> {
    repository: R,
    alert_sink: A,
}

impl<R: PatientRepositoryTrait, A: AlertSinkTrait> MedicalCheckService<R, A> {
    /// Create a new medical check service
    pub fn new(repository: R, alert_sink: A) -> Self {
        Self {
            repository,
            alert_sink,
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> MedicalCheckServiceError {
        match err {
            RepositoryError::NotFound(msg) => MedicalCheckServiceError::PatientNotFound(msg),
            RepositoryError::Validation(msg) => MedicalCheckServiceError::ValidationError(msg),
            _ => MedicalCheckServiceError::RepositoryError(err.to_string()),
        }
    }

    /// Load the patient profile backing a check
    async fn load_patient(&self, patient_id: &str) -> Result<PatientProfile, MedicalCheckServiceError> {
        if patient_id.trim().is_empty() {
            return Err(MedicalCheckServiceError::ValidationError(
                "Patient id must not be empty".to_string(),
            ));
        }

        let profile = self
            .repository
            .get_by_id(patient_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| {
                MedicalCheckServiceError::PatientNotFound(format!(
                    "Patient with id {} not found",
                    patient_id
                ))
            })?;

        Ok(profile)
    }

    /// Format and dispatch the alert for a deviating patient
    async fn dispatch_alert(&self, profile: &PatientProfile) -> Result<(), MedicalCheckServiceError> {
        let message = format!("Warning, patient with id: {}, need help", profile.id);
        self.alert_sink.send(&message).await?;
        Ok(())
    }
}

#[async_trait]
impl<R: PatientRepositoryTrait + Send + Sync, A: AlertSinkTrait + Send + Sync> MedicalCheckServiceTrait
    for MedicalCheckService<R, A>
{
    /// Compare an observed blood pressure against the patient's baseline
    async fn check_blood_pressure(
        &self,
        patient_id: &str,
        pressure: BloodPressure,
    ) -> Result<(), MedicalCheckServiceError> {
        let profile = self.load_patient(patient_id).await?;
        let baseline = profile.baseline.normal_blood_pressure;

        // A deviation in either component counts; there is no tolerance band
        if pressure != baseline {
            debug!(
                "Observed pressure {} deviates from baseline {} for patient {}",
                pressure, baseline, profile.id
            );
            return self.dispatch_alert(&profile).await;
        }

        debug!(
            "Observed pressure {} matches baseline for patient {}",
            pressure, profile.id
        );
        Ok(())
    }

    /// Compare an observed temperature against the patient's baseline
    async fn check_temperature(
        &self,
        patient_id: &str,
        temperature: Decimal,
    ) -> Result<(), MedicalCheckServiceError> {
        let profile = self.load_patient(patient_id).await?;
        let deviation = (temperature - profile.baseline.normal_temperature).abs();

        if deviation > TEMPERATURE_TOLERANCE {
            debug!(
                "Observed temperature {} deviates from baseline {} by {} for patient {}",
                temperature, profile.baseline.normal_temperature, deviation, profile.id
            );
            return self.dispatch_alert(&profile).await;
        }

        debug!(
            "Observed temperature {} is within tolerance for patient {}",
            temperature, profile.id
        );
        Ok(())
    }
}

/// Create a default medical check service backed by the in-memory patient
/// repository and the log alert sink
pub fn create_default_medical_check_service() -> impl MedicalCheckServiceTrait + Send + Sync {
    MedicalCheckService::new(PatientRepository::new(), LogAlertSink::new())
}

/// Create a mock medical check service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_medical_check_service() -> impl MedicalCheckServiceTrait + Send {
    crate::testing::MockMedicalCheckService::new()
}
