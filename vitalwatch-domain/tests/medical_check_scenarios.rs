use std::sync::Once;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use mockall::predicate::eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use vitalwatch_data::models::patient::{
    BloodPressure, CreatePatientRequest, HealthBaseline, PatientProfile,
};
use vitalwatch_data::repository::{PatientRepository, PatientRepositoryTrait, RepositoryError};
use vitalwatch_domain::services::alert::{AlertError, AlertSinkTrait, LogAlertSink};
use vitalwatch_domain::services::medical_check::{
    create_default_medical_check_service, MedicalCheckService, MedicalCheckServiceError,
    MedicalCheckServiceTrait,
};

// Initialize tracing once for all tests
static INIT: Once = Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

mock! {
    PatientRepo {}

    #[async_trait]
    impl PatientRepositoryTrait for PatientRepo {
        async fn add(&self, request: CreatePatientRequest) -> Result<PatientProfile, RepositoryError>;
        async fn get_by_id(&self, id: &str) -> Result<Option<PatientProfile>, RepositoryError>;
        async fn get_all(&self) -> Result<Vec<PatientProfile>, RepositoryError>;
        async fn update(&self, profile: PatientProfile) -> Result<PatientProfile, RepositoryError>;
        async fn remove(&self, id: &str) -> Result<PatientProfile, RepositoryError>;
    }
}

mock! {
    AlertSink {}

    #[async_trait]
    impl AlertSinkTrait for AlertSink {
        async fn send(&self, message: &str) -> Result<(), AlertError>;
    }
}

const WARNING_MESSAGE: &str = "Warning, patient with id: test-id, need help";

fn enrolled_profile(normal_temperature: Decimal, normal_pressure: BloodPressure) -> PatientProfile {
    PatientProfile {
        id: "test-id".to_string(),
        given_name: "Jane".to_string(),
        family_name: "Doe".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1984, 3, 15).unwrap(),
        baseline: HealthBaseline::new(normal_temperature, normal_pressure),
    }
}

#[tokio::test]
async fn test_blood_pressure_deviation_dispatches_warning_message() {
    initialize();

    let mut repository = MockPatientRepo::new();
    repository
        .expect_get_by_id()
        .with(eq("test-id"))
        .times(1)
        .returning(|_| Ok(Some(enrolled_profile(dec!(36.6), BloodPressure::new(120, 80)))));

    let mut alert_sink = MockAlertSink::new();
    alert_sink
        .expect_send()
        .with(eq(WARNING_MESSAGE))
        .times(1)
        .returning(|_| Ok(()));

    let service = MedicalCheckService::new(repository, alert_sink);
    service
        .check_blood_pressure("test-id", BloodPressure::new(100, 70))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_temperature_deviation_dispatches_warning_message() {
    initialize();

    let mut repository = MockPatientRepo::new();
    repository
        .expect_get_by_id()
        .with(eq("test-id"))
        .times(1)
        .returning(|_| Ok(Some(enrolled_profile(dec!(36.9), BloodPressure::new(120, 80)))));

    let mut alert_sink = MockAlertSink::new();
    alert_sink
        .expect_send()
        .with(eq(WARNING_MESSAGE))
        .times(1)
        .returning(|_| Ok(()));

    let service = MedicalCheckService::new(repository, alert_sink);
    service.check_temperature("test-id", dec!(35.0)).await.unwrap();
}

#[tokio::test]
async fn test_normal_readings_dispatch_no_alerts() {
    initialize();

    let mut repository = MockPatientRepo::new();
    repository
        .expect_get_by_id()
        .with(eq("test-id"))
        .times(2)
        .returning(|_| Ok(Some(enrolled_profile(dec!(36.6), BloodPressure::new(120, 80)))));

    let mut alert_sink = MockAlertSink::new();
    alert_sink.expect_send().never();

    let service = MedicalCheckService::new(repository, alert_sink);
    service
        .check_blood_pressure("test-id", BloodPressure::new(120, 80))
        .await
        .unwrap();
    service.check_temperature("test-id", dec!(36.6)).await.unwrap();
}

#[tokio::test]
async fn test_missing_patient_aborts_the_check() {
    initialize();

    let mut repository = MockPatientRepo::new();
    repository
        .expect_get_by_id()
        .with(eq("absent-id"))
        .times(1)
        .returning(|_| Ok(None));

    let mut alert_sink = MockAlertSink::new();
    alert_sink.expect_send().never();

    let service = MedicalCheckService::new(repository, alert_sink);
    let result = service
        .check_blood_pressure("absent-id", BloodPressure::new(100, 70))
        .await;

    assert!(matches!(
        result,
        Err(MedicalCheckServiceError::PatientNotFound(_))
    ));
}

#[tokio::test]
async fn test_repository_failure_propagates_to_the_caller() {
    initialize();

    let mut repository = MockPatientRepo::new();
    repository
        .expect_get_by_id()
        .times(1)
        .returning(|_| Err(RepositoryError::Lock("storage mutex poisoned".to_string())));

    let mut alert_sink = MockAlertSink::new();
    alert_sink.expect_send().never();

    let service = MedicalCheckService::new(repository, alert_sink);
    let result = service.check_temperature("test-id", dec!(36.6)).await;

    assert!(matches!(
        result,
        Err(MedicalCheckServiceError::RepositoryError(_))
    ));
}

#[tokio::test]
async fn test_failed_alert_delivery_propagates_to_the_caller() {
    initialize();

    let mut repository = MockPatientRepo::new();
    repository
        .expect_get_by_id()
        .times(1)
        .returning(|_| Ok(Some(enrolled_profile(dec!(36.6), BloodPressure::new(120, 80)))));

    let mut alert_sink = MockAlertSink::new();
    alert_sink
        .expect_send()
        .times(1)
        .returning(|_| Err(AlertError::ChannelUnavailable("pager gateway offline".to_string())));

    let service = MedicalCheckService::new(repository, alert_sink);
    let result = service
        .check_blood_pressure("test-id", BloodPressure::new(100, 70))
        .await;

    assert!(matches!(
        result,
        Err(MedicalCheckServiceError::AlertError(_))
    ));
}

#[tokio::test]
async fn test_checks_run_against_enrolled_patients() {
    initialize();

    // Full wiring: real repository, real log sink
    let repository = PatientRepository::new();
    let profile = repository
        .add(CreatePatientRequest {
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1984, 3, 15).unwrap(),
            baseline: HealthBaseline::new(dec!(36.6), BloodPressure::new(120, 80)),
        })
        .await
        .unwrap();

    let service = MedicalCheckService::new(repository, LogAlertSink::new());
    service
        .check_blood_pressure(&profile.id, BloodPressure::new(100, 70))
        .await
        .unwrap();
    service.check_temperature(&profile.id, dec!(36.8)).await.unwrap();
}

#[tokio::test]
async fn test_baseline_updates_take_effect_on_the_next_check() {
    initialize();

    let repository = PatientRepository::new();
    let profile = repository
        .add(CreatePatientRequest {
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1984, 3, 15).unwrap(),
            baseline: HealthBaseline::new(dec!(36.6), BloodPressure::new(120, 80)),
        })
        .await
        .unwrap();

    let expected_message = format!("Warning, patient with id: {}, need help", profile.id);
    let mut alert_sink = MockAlertSink::new();
    alert_sink
        .expect_send()
        .withf(move |message| message == expected_message)
        .times(1)
        .returning(|_| Ok(()));

    // Repository clones share the same store, so updates made after the
    // service takes its handle are visible to later checks
    let service = MedicalCheckService::new(repository.clone(), alert_sink);

    // Within tolerance of the enrolled 36.6 baseline; stays quiet
    service.check_temperature(&profile.id, dec!(38.0)).await.unwrap();

    // Lower the baseline; the same reading now deviates past the tolerance
    let mut updated = profile.clone();
    updated.baseline.normal_temperature = dec!(36.0);
    repository.update(updated).await.unwrap();

    service.check_temperature(&profile.id, dec!(38.0)).await.unwrap();
}

#[tokio::test]
async fn test_default_service_reports_unknown_patients() {
    initialize();

    let service = create_default_medical_check_service();
    let result = service.check_temperature("missing-id", dec!(36.6)).await;

    assert!(matches!(
        result,
        Err(MedicalCheckServiceError::PatientNotFound(_))
    ));
}
