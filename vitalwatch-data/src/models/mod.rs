// Patient data models and value objects
pub mod patient;

// Re-export common types for easier imports
pub use patient::{BloodPressure, CreatePatientRequest, HealthBaseline, PatientProfile};
