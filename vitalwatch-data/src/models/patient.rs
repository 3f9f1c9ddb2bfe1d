use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Arterial blood pressure measurement in mmHg
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BloodPressure {
    /// Systolic pressure (the higher number)
    pub systolic: u16,

    /// Diastolic pressure (the lower number)
    pub diastolic: u16,
}

impl BloodPressure {
    /// Create a new blood pressure value
    pub fn new(systolic: u16, diastolic: u16) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// A patient's normal vital signs, recorded at enrollment.
/// Temperature is kept as a decimal so tolerance comparisons stay exact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthBaseline {
    /// Normal body temperature in degrees Celsius
    pub normal_temperature: Decimal,

    /// Normal resting blood pressure
    pub normal_blood_pressure: BloodPressure,
}

impl HealthBaseline {
    /// Create a new baseline
    pub fn new(normal_temperature: Decimal, normal_blood_pressure: BloodPressure) -> Self {
        Self {
            normal_temperature,
            normal_blood_pressure,
        }
    }
}

/// Stored profile for an enrolled patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientProfile {
    /// Unique identifier for the patient
    pub id: String,

    /// Given name
    pub given_name: String,

    /// Family name
    pub family_name: String,

    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// Baseline vitals recorded at enrollment
    pub baseline: HealthBaseline,
}

/// Request payload for enrolling a new patient.
/// The repository mints the patient id on enrollment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePatientRequest {
    /// Given name
    #[validate(length(min = 1, max = 100, message = "Given name must be between 1 and 100 characters"))]
    pub given_name: String,

    /// Family name
    #[validate(length(min = 1, max = 100, message = "Family name must be between 1 and 100 characters"))]
    pub family_name: String,

    /// Date of birth
    pub date_of_birth: NaiveDate,

    /// Baseline vitals to record for the patient
    pub baseline: HealthBaseline,
}
