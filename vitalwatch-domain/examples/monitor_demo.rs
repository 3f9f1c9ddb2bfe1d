//! Minimal wiring of the medical check service against the in-memory
//! patient repository, with alerts delivered to the log.
//!
//! Run with: cargo run --example monitor_demo -p vitalwatch_domain

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use vitalwatch_data::models::patient::{BloodPressure, CreatePatientRequest, HealthBaseline};
use vitalwatch_data::repository::{PatientRepository, PatientRepositoryTrait};
use vitalwatch_domain::services::alert::LogAlertSink;
use vitalwatch_domain::services::medical_check::{MedicalCheckService, MedicalCheckServiceTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Enroll a patient with their baseline readings
    let repository = PatientRepository::new();
    let profile = repository
        .add(CreatePatientRequest {
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1984, 3, 15)
                .ok_or("invalid date of birth")?,
            baseline: HealthBaseline::new(dec!(36.6), BloodPressure::new(120, 80)),
        })
        .await?;
    tracing::info!(
        "Enrolled patient {} {} with id {}",
        profile.given_name,
        profile.family_name,
        profile.id
    );

    let service = MedicalCheckService::new(repository, LogAlertSink::new());

    // A reading within tolerance leaves the log quiet
    service.check_temperature(&profile.id, dec!(36.8)).await?;

    // A deviating blood pressure reading raises a warning in the log
    service
        .check_blood_pressure(&profile.id, BloodPressure::new(100, 70))
        .await?;

    Ok(())
}
