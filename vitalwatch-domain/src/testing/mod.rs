// Testing utilities and mock implementations for the domain layer
// Available in unit tests and when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use vitalwatch_data::repository::tests::MockPatientRepository;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::services::alert::{AlertError, AlertSinkTrait};
use crate::services::medical_check::{
    MedicalCheckServiceError, MedicalCheckServiceTrait, TEMPERATURE_TOLERANCE,
};
use vitalwatch_data::models::patient::{BloodPressure, PatientProfile};

/// Alert sink that records every delivered message for later assertions.
/// Clones share the same message buffer, so a handle kept by the test sees
/// the deliveries made through the service.
#[derive(Debug, Clone)]
pub struct RecordingAlertSink {
    /// Messages delivered so far
    messages: Arc<Mutex<Vec<String>>>,
    should_fail_delivery: bool,
}

impl Default for RecordingAlertSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingAlertSink {
    /// Create a new recording sink
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            should_fail_delivery: false,
        }
    }

    /// Configure the sink to fail delivery
    pub fn with_delivery_failure(mut self) -> Self {
        self.should_fail_delivery = true;
        self
    }

    /// Messages delivered so far
    pub fn sent_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Number of messages delivered so far
    pub fn sent_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl AlertSinkTrait for RecordingAlertSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        if self.should_fail_delivery {
            return Err(AlertError::ChannelUnavailable(
                "Delivery failed - sink is configured to fail".to_string(),
            ));
        }

        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Mock implementation of the MedicalCheckServiceTrait for testing.
/// Checks run against canned profiles and alerts are kept in memory instead
/// of going through an alert sink.
pub struct MockMedicalCheckService {
    profiles: RwLock<HashMap<String, PatientProfile>>,
    alerts: Mutex<Vec<String>>,
    should_fail_delivery: bool,
}

impl Default for MockMedicalCheckService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMedicalCheckService {
    /// Create a new mock medical check service
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            alerts: Mutex::new(Vec::new()),
            should_fail_delivery: false,
        }
    }

    /// Configure the mock to fail alert delivery
    pub fn with_delivery_failure(mut self) -> Self {
        self.should_fail_delivery = true;
        self
    }

    /// Add a pre-defined patient profile to the mock
    pub fn with_profile(self, profile: PatientProfile) -> Self {
        {
            let mut profiles = self.profiles.write().unwrap();
            profiles.insert(profile.id.clone(), profile);
        }
        self
    }

    /// Add multiple pre-defined patient profiles to the mock
    pub fn with_profiles(self, profiles: Vec<PatientProfile>) -> Self {
        {
            let mut profiles_map = self.profiles.write().unwrap();
            for profile in profiles {
                profiles_map.insert(profile.id.clone(), profile);
            }
        }
        self
    }

    /// Alert messages dispatched so far
    pub fn dispatched_alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    fn lookup(&self, patient_id: &str) -> Result<PatientProfile, MedicalCheckServiceError> {
        let profiles = self.profiles.read().unwrap();
        profiles.get(patient_id).cloned().ok_or_else(|| {
            MedicalCheckServiceError::PatientNotFound(format!(
                "Patient with id {} not found",
                patient_id
            ))
        })
    }

    fn record_alert(&self, patient_id: &str) -> Result<(), MedicalCheckServiceError> {
        if self.should_fail_delivery {
            return Err(MedicalCheckServiceError::AlertError(
                AlertError::ChannelUnavailable(
                    "Delivery failed - mock is configured to fail".to_string(),
                ),
            ));
        }

        self.alerts
            .lock()
            .unwrap()
            .push(format!("Warning, patient with id: {}, need help", patient_id));
        Ok(())
    }
}

#[async_trait]
impl MedicalCheckServiceTrait for MockMedicalCheckService {
    async fn check_blood_pressure(
        &self,
        patient_id: &str,
        pressure: BloodPressure,
    ) -> Result<(), MedicalCheckServiceError> {
        let profile = self.lookup(patient_id)?;

        if pressure != profile.baseline.normal_blood_pressure {
            self.record_alert(&profile.id)?;
        }

        Ok(())
    }

    async fn check_temperature(
        &self,
        patient_id: &str,
        temperature: Decimal,
    ) -> Result<(), MedicalCheckServiceError> {
        let profile = self.lookup(patient_id)?;

        if (temperature - profile.baseline.normal_temperature).abs() > TEMPERATURE_TOLERANCE {
            self.record_alert(&profile.id)?;
        }

        Ok(())
    }
}

/// Factory function to create a recording alert sink
pub fn create_recording_alert_sink() -> RecordingAlertSink {
    RecordingAlertSink::new()
}

/// Factory function to create a mock medical check service
pub fn create_mock_medical_check_service() -> impl MedicalCheckServiceTrait {
    MockMedicalCheckService::new()
}
